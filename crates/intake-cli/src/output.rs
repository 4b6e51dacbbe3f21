use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    print!("{}", render_table(headers, &rows));
}

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header. Cells beyond the header count are dropped.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = (0..headers.len())
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .fold(headers[col].chars().count(), usize::max)
        })
        .collect();

    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();

    let mut out = pad_line(headers.iter().copied(), &widths);
    out.push_str(&pad_line(rule.iter().map(String::as_str), &widths));
    for row in rows {
        out.push_str(&pad_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn pad_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    let mut line = padded.join("  ").trim_end().to_string();
    line.push('\n');
    line
}

/// Shorten `text` to at most `max` characters, marking the cut with "...".
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_to_widest_cell() {
        let text = render_table(
            &["NAME", "SCORE"],
            &[
                vec!["MoveMasters".to_string(), "81%".to_string()],
                vec!["Ann".to_string(), "92%".to_string()],
            ],
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "NAME         SCORE");
        assert_eq!(lines[1], "-----------  -----");
        assert_eq!(lines[2], "MoveMasters  81%");
        assert_eq!(lines[3], "Ann          92%");
    }

    #[test]
    fn table_ignores_extra_cells() {
        let text = render_table(&["A"], &[vec!["x".to_string(), "extra".to_string()]]);
        assert!(!text.contains("extra"));
    }

    #[test]
    fn truncate_short_text_untouched() {
        assert_eq!(truncate("leak", 10), "leak");
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("kitchen sink leak", 10), "kitchen...");
    }
}
