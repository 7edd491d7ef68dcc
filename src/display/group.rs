//! Group display formatting
//!
//! Formats groups, their items and member balances for terminal output.

use crate::models::{format_currency, Money};
use crate::services::{GroupOverview, MemberBalance};

/// Format a list of groups as a table
pub fn format_group_list(overviews: &[GroupOverview], unit: &str) -> String {
    if overviews.is_empty() {
        return "No groups found.\n\nCreate one with 'splitter group create <NAME>'.".to_string();
    }

    let name_width = overviews
        .iter()
        .map(|o| o.group.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:>7}  {:>5}  {:>12}  {}\n",
        "Name",
        "Members",
        "Items",
        "Total",
        "ID",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->7}  {:->5}  {:->12}  {:-<12}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for overview in overviews {
        output.push_str(&format!(
            "{:<name_width$}  {:>7}  {:>5}  {:>12}  {}\n",
            overview.group.name,
            overview.members.len(),
            overview.items.len(),
            format_currency(overview.total_cost(), unit),
            overview.group.id,
            name_width = name_width,
        ));
    }

    output
}

/// Format one group with its members and items
pub fn format_group_details(overview: &GroupOverview, unit: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Group: {}\n", overview.group.name));
    output.push_str(&format!("ID:    {}\n", overview.group.id));
    output.push_str(&format!(
        "Total: {}\n",
        format_currency(overview.total_cost(), unit)
    ));

    output.push_str("\nMembers:\n");
    if overview.members.is_empty() {
        output.push_str("  (no members)\n");
    }
    for member in &overview.members {
        output.push_str(&format!("  {} ({})\n", member.name, member.id));
    }

    output.push_str("\nItems:\n");
    if overview.items.is_empty() {
        output.push_str("  (no items)\n");
    }
    for (i, summary) in overview.items.iter().enumerate() {
        let is_last = i == overview.items.len() - 1;
        let prefix = if is_last { "└── " } else { "├── " };
        let sharers = if summary.sharers.is_empty() {
            "unshared".to_string()
        } else {
            let names: Vec<_> = summary.sharers.iter().map(|u| u.name.as_str()).collect();
            format!(
                "{} each: {}",
                format_currency(Money::from_f64_rounded(summary.user_cost), unit),
                names.join(", ")
            )
        };
        output.push_str(&format!(
            "  {}{} ({})\n",
            prefix,
            summary.item.format_with_unit(unit),
            sharers
        ));
    }

    output
}

/// Format what each member owes
pub fn format_balances(group_name: &str, balances: &[MemberBalance], unit: &str) -> String {
    if balances.is_empty() {
        return format!("{} has no members.", group_name);
    }

    let name_width = balances
        .iter()
        .map(|b| b.user.name.chars().count())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = format!("Balances for {}\n\n", group_name);
    output.push_str(&format!(
        "{:<name_width$}  {:>6}  {:>12}\n",
        "Member",
        "Items",
        "Owes",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:->6}  {:->12}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for balance in balances {
        output.push_str(&format!(
            "{:<name_width$}  {:>6}  {:>12}\n",
            balance.user.name,
            balance.shared_items,
            format_currency(Money::from_f64_rounded(balance.total), unit),
            name_width = name_width,
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Group, Item, User};
    use crate::services::ItemSummary;

    fn overview() -> GroupOverview {
        let group = Group::new("Roommates");
        let alice = User::new("Alice");
        let bob = User::new("Bob");
        let pizza = Item::build(group.id, "pizza", "12").unwrap();
        let soda = Item::build(group.id, "soda", "3.5").unwrap();

        GroupOverview {
            group,
            members: vec![alice.clone(), bob.clone()],
            items: vec![
                ItemSummary {
                    item: pizza,
                    sharers: vec![alice, bob],
                    user_cost: 6.0,
                },
                ItemSummary {
                    item: soda,
                    sharers: vec![],
                    user_cost: 0.0,
                },
            ],
        }
    }

    #[test]
    fn test_group_list() {
        let output = format_group_list(&[overview()], "$");
        assert!(output.contains("Roommates"));
        assert!(output.contains("$15.50"));
    }

    #[test]
    fn test_empty_group_list() {
        assert!(format_group_list(&[], "$").starts_with("No groups found."));
    }

    #[test]
    fn test_group_details() {
        let output = format_group_details(&overview(), "$");
        assert!(output.contains("Group: Roommates"));
        assert!(output.contains("├── Pizza: $12.00 ($6.00 each: Alice, Bob)"));
        assert!(output.contains("└── Soda: $3.50 (unshared)"));
    }

    #[test]
    fn test_balances() {
        let balances = vec![MemberBalance {
            user: User::new("Alice"),
            shared_items: 2,
            total: 306.0,
        }];
        let output = format_balances("Roommates", &balances, "€");
        assert!(output.contains("Alice"));
        assert!(output.contains("€306.00"));
        assert_eq!(
            format_balances("Empty", &[], "$"),
            "Empty has no members."
        );
    }
}
