use super::load_attachments;
use crate::output::{print_json, print_table};
use anyhow::Context;
use intake_core::config::EngineConfig;
use intake_core::form::FormFlow;
use intake_core::sink::YamlFileSink;
use intake_core::types::{FieldName, ServiceCategory};
use std::path::PathBuf;

pub struct FormArgs {
    pub set: Vec<String>,
    pub category: Option<ServiceCategory>,
    pub attach: Vec<PathBuf>,
    pub detach: Vec<usize>,
    pub analyze: bool,
    pub submit: Option<PathBuf>,
}

/// Indices refer to the attachment list as given, so they are removed
/// highest first.
fn detach(flow: &mut FormFlow, indices: &[usize]) {
    let mut indices = indices.to_vec();
    indices.sort_unstable_by(|a, b| b.cmp(a));
    indices.dedup();
    for index in indices {
        match flow.detach_file(index) {
            Some(removed) => tracing::debug!(index, name = %removed.name, "detached"),
            None => tracing::warn!(index, "no attachment at this position"),
        }
    }
}

pub fn run(config: EngineConfig, args: FormArgs, json: bool) -> anyhow::Result<()> {
    let mut flow = FormFlow::new(config);

    if let Some(category) = args.category {
        flow.set_field(FieldName::Category, category.label());
    }
    for assignment in &args.set {
        let (field, value) = assignment
            .split_once('=')
            .with_context(|| format!("expected FIELD=VALUE, got '{assignment}'"))?;
        let field = field.trim();
        if field.parse::<FieldName>().is_err() {
            tracing::warn!(field, "unrecognized field ignored");
        }
        flow.apply_field_edit(field, value.trim());
    }
    let files = load_attachments(&args.attach)?;
    flow.attach_files(files);
    detach(&mut flow, &args.detach);

    let analysis = args.analyze.then(|| flow.analyze());

    if let Some(path) = &args.submit {
        flow.submit(&mut YamlFileSink::new(path))
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if json {
        print_json(&serde_json::json!({
            "profile": flow.profile(),
            "completeness": flow.completeness(),
            "analysis": analysis,
        }))?;
        return Ok(());
    }

    let profile = flow.profile();
    let mut rows: Vec<Vec<String>> = FieldName::all()
        .iter()
        .map(|f| {
            let value = profile.field(*f);
            let shown = if value.is_empty() { "-" } else { value };
            vec![f.to_string(), shown.to_string()]
        })
        .collect();
    rows.push(vec![
        "attachments".to_string(),
        profile.attachments.len().to_string(),
    ]);
    print_table(&["FIELD", "VALUE"], rows);
    println!();
    println!("Completeness: {}%", flow.completeness());

    if let Some(analysis) = analysis {
        println!();
        println!("{}", analysis.summary);
    }
    if let Some(path) = &args.submit {
        println!();
        println!("Request written to {}", path.display());
    }
    Ok(())
}
