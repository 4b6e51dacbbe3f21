use crate::output::{print_json, print_table, truncate};
use anyhow::Context;
use intake_core::catalog::{BrowseQuery, Catalog};
use intake_core::config::EngineConfig;
use std::path::Path;

fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    match path {
        Some(p) => Catalog::load(p).with_context(|| format!("failed to load catalog {}", p.display())),
        None => Catalog::demo().context("bundled catalog is invalid"),
    }
}

// ---------------------------------------------------------------------------
// browse
// ---------------------------------------------------------------------------

pub fn run_browse(catalog: Option<&Path>, query: BrowseQuery, json: bool) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog)?;
    let providers = catalog.browse(&query);

    if json {
        print_json(&providers)?;
        return Ok(());
    }

    if providers.is_empty() {
        println!("No providers match.");
        return Ok(());
    }

    let rows = providers
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.name.clone(),
                format!("{:.1} ({})", p.rating, p.reviews),
                p.category.clone(),
                match p.distance_miles {
                    Some(d) => format!("{} ({d:.1} mi)", p.location),
                    None => p.location.clone(),
                },
                p.price.clone(),
                if p.verified { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    print_table(
        &["ID", "NAME", "RATING", "CATEGORY", "LOCATION", "PRICE", "VERIFIED"],
        rows,
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// provider
// ---------------------------------------------------------------------------

pub fn run_provider(catalog: Option<&Path>, id: &str, json: bool) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog)?;
    let provider = catalog
        .provider(id)
        .with_context(|| format!("no provider '{id}'"))?;

    if json {
        print_json(provider)?;
        return Ok(());
    }

    println!("{}{}", provider.name, if provider.verified { " (verified)" } else { "" });
    println!("  rating:    {:.1} ({} reviews)", provider.rating, provider.reviews);
    if provider.subcategory.is_empty() {
        println!("  category:  {}", provider.category);
    } else {
        println!("  category:  {} / {}", provider.category, provider.subcategory);
    }
    match provider.distance_miles {
        Some(d) => println!("  location:  {} ({d:.1} mi)", provider.location),
        None => println!("  location:  {}", provider.location),
    }
    println!("  price:     {}", provider.price);
    if !provider.description.is_empty() {
        println!();
        println!("{}", provider.description);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// messages
// ---------------------------------------------------------------------------

/// Open one conversation thread.
pub fn run_thread(
    catalog: Option<&Path>,
    id: &str,
    config: EngineConfig,
    no_delay: bool,
    json: bool,
) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog)?;
    let conversation = catalog
        .conversation(id)
        .with_context(|| format!("no conversation '{id}'"))?
        .clone();
    super::thread::run(conversation, config, no_delay, json)
}

pub fn run_messages(catalog: Option<&Path>, query: Option<&str>, json: bool) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog)?;
    let conversations = catalog.search_conversations(query.unwrap_or(""));

    if json {
        print_json(&conversations)?;
        return Ok(());
    }

    if conversations.is_empty() {
        println!("No conversations.");
        return Ok(());
    }

    let rows = conversations
        .iter()
        .map(|c| {
            vec![
                if c.unread { "*" } else { "" }.to_string(),
                c.id.clone(),
                c.provider.name.clone(),
                c.request.title.clone(),
                truncate(&c.last_message, 48),
                c.timestamp.clone(),
            ]
        })
        .collect();
    print_table(&["", "ID", "PROVIDER", "REQUEST", "LAST MESSAGE", "WHEN"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// matches
// ---------------------------------------------------------------------------

pub fn run_matches(catalog: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let catalog = load_catalog(catalog)?;
    let matches = catalog.matches_by_compatibility();

    if json {
        print_json(&matches)?;
        return Ok(());
    }

    let rows = matches
        .iter()
        .map(|m| {
            vec![
                m.name.clone(),
                format!("{}%", m.compatibility),
                m.last_active.clone(),
                if m.online { "online" } else { "" }.to_string(),
            ]
        })
        .collect();
    print_table(&["NAME", "COMPATIBILITY", "LAST ACTIVE", "STATUS"], rows);
    Ok(())
}
