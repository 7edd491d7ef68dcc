//! Item display formatting

use crate::models::{format_currency, Money};
use crate::services::ItemSummary;

/// Format one item with its sharers and each sharer's portion
pub fn format_item_details(summary: &ItemSummary, group_name: &str, unit: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", summary.item.format_with_unit(unit)));
    output.push_str(&format!("  ID:        {}\n", summary.item.id));
    output.push_str(&format!("  Group:     {}\n", group_name));
    output.push_str(&format!("  Shared by: {}\n", summary.sharers.len()));

    if summary.sharers.is_empty() {
        output.push_str("  (not shared with anyone)\n");
        return output;
    }

    let portion = format_currency(Money::from_f64_rounded(summary.user_cost), unit);
    for user in &summary.sharers {
        output.push_str(&format!("    {:<20} {:>12}\n", user.name, portion));
    }

    output
}
