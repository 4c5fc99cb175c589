//! Category display formatting

use crate::config::Settings;
use crate::services::CategoryUsage;

use super::transaction::truncate;

/// Format categories with their transaction counts and net amounts
pub fn format_category_usage(usage: &[CategoryUsage], settings: &Settings) -> String {
    if usage.is_empty() {
        return "No categories found.\n".to_string();
    }

    let title_width = usage
        .iter()
        .map(|u| u.category.title.chars().count())
        .max()
        .unwrap_or(5)
        .clamp(5, 30);

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:width$} {:>6} {:>14}\n",
        "ID",
        "Title",
        "Count",
        "Net",
        width = title_width
    ));
    output.push_str(&"-".repeat(12 + title_width + 23));
    output.push('\n');

    for entry in usage {
        output.push_str(&format!(
            "{:12} {} {:>6} {:>14}\n",
            entry.category.id.to_string(),
            truncate(&entry.category.title, title_width),
            entry.transaction_count,
            entry.net.format_with_symbol(&settings.currency_symbol)
        ));
    }

    output
}
