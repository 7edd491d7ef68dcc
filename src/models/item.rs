//! Item model
//!
//! An item is one cost line belonging to a group. Its name is normalized to
//! Title Case before validation, and its cost is split evenly between the
//! users it is shared with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, ItemId};
use super::money::{format_currency, validate_currency, Money, BLANK_MESSAGE};
use super::validation::{Field, ValidationErrors};

pub const NAME_MAX_LENGTH: usize = 20;
pub const NAME_MIN_LENGTH: usize = 1;

/// A shareable cost line within a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier
    pub id: ItemId,

    /// Owning group; fixed at creation
    group_id: GroupId,

    /// Title-cased name, 1-20 characters
    pub name: String,

    /// Total cost of the item
    pub cost: Money,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Normalize and validate raw input, producing a new item
    ///
    /// All failing fields are reported together.
    pub fn build(group_id: GroupId, name: &str, cost: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = normalize_name(name);
        validate_name(&name, &mut errors);
        let cost = validate_cost(cost, &mut errors);

        match cost {
            Some(cost) if errors.is_empty() => {
                let now = Utc::now();
                Ok(Self {
                    id: ItemId::new(),
                    group_id,
                    name,
                    cost,
                    created_at: now,
                    updated_at: now,
                })
            }
            _ => Err(errors),
        }
    }

    /// Apply an edit; the item is left untouched if any field is invalid
    pub fn apply_changes(
        &mut self,
        name: Option<&str>,
        cost: Option<&str>,
    ) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let new_name = name.map(normalize_name);
        if let Some(n) = &new_name {
            validate_name(n, &mut errors);
        }
        let new_cost = cost.and_then(|c| validate_cost(c, &mut errors));

        if !errors.is_empty() {
            return Err(errors);
        }

        if let Some(n) = new_name {
            self.name = n;
        }
        if let Some(c) = new_cost {
            self.cost = c;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// The group this item belongs to
    pub fn group_id(&self) -> GroupId {
        self.group_id
    }

    /// Re-check an already constructed item (e.g. one loaded from disk)
    ///
    /// Callers normalize the name first; a name that normalizes differently
    /// is not an error here.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_name(&self.name, &mut errors);
        if self.cost.is_negative() {
            errors.add(Field::Cost, super::money::INVALID_CURRENCY_MESSAGE);
        }
        errors.into_result(())
    }

    /// `"<name>: <cost>"` using a custom currency unit
    pub fn format_with_unit(&self, unit: &str) -> String {
        format!("{}: {}", self.name, format_currency(self.cost, unit))
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with_unit("$"))
    }
}

/// Lower-case, split on whitespace, capitalize each word, join with single spaces
///
/// `"  tv   DINNER"` becomes `"Tv Dinner"`.
pub fn normalize_name(raw: &str) -> String {
    raw.to_lowercase()
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title-case one lower-cased word
///
/// Only the first character of an uppercase expansion stays upper, so "ß"
/// becomes "Ss" rather than "SS" and normalizing twice changes nothing.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut upper = first.to_uppercase();
    let mut out = String::with_capacity(word.len() + 1);
    out.extend(upper.next());
    out.extend(upper.flat_map(char::to_lowercase));
    out.extend(chars);
    out
}

/// Share of `cost` owed by each of `sharers` users
///
/// Computed as `cost * (1.0 / sharers)`; the reciprocal-then-multiply order
/// is part of the observable result. Zero sharers owe exactly 0.
pub fn split_cost(cost: Money, sharers: usize) -> f64 {
    if sharers == 0 {
        return 0.0;
    }
    cost.to_f64() * (1.0 / sharers as f64)
}

fn validate_name(name: &str, errors: &mut ValidationErrors) {
    let len = name.chars().count();
    if name.is_empty() {
        errors.add(Field::Name, BLANK_MESSAGE);
    }
    if len < NAME_MIN_LENGTH {
        errors.add(
            Field::Name,
            format!("is too short (minimum is {} character)", NAME_MIN_LENGTH),
        );
    }
    if len > NAME_MAX_LENGTH {
        errors.add(
            Field::Name,
            format!("is too long (maximum is {} characters)", NAME_MAX_LENGTH),
        );
    }
}

fn validate_cost(cost: &str, errors: &mut ValidationErrors) -> Option<Money> {
    match validate_currency(cost) {
        Ok(amount) => Some(amount),
        Err(message) => {
            errors.add(Field::Cost, message);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  tv   dinner"), "Tv Dinner");
        assert_eq!(normalize_name("PIZZA"), "Pizza");
        assert_eq!(normalize_name("  pizza"), "Pizza");
        assert_eq!(normalize_name("mcDonald's\tfries\n"), "Mcdonald's Fries");
        assert_eq!(normalize_name("   "), "");
        assert_eq!(normalize_name("éclair tart"), "Éclair Tart");
        assert_eq!(normalize_name("straße ßeer"), "Straße Sseer");
        assert_eq!(normalize_name("\u{1C6}ungla"), "\u{1C4}ungla");
    }

    #[test]
    fn test_normalize_name_is_stable() {
        for raw in ["straße ßeer", "ßeer", "ǆungla", "ﬁsh tacos", "İstanbul kebab", "ŉ"] {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once, "renormalizing {:?}", raw);
        }
    }

    #[test]
    fn test_build_normalizes_and_validates() {
        let group_id = GroupId::new();
        let item = Item::build(group_id, "  pizza", "12.00").unwrap();
        assert_eq!(item.name, "Pizza");
        assert_eq!(item.cost, Money::from_cents(1200));
        assert_eq!(item.group_id(), group_id);
    }

    #[test]
    fn test_name_length_bounds() {
        let group_id = GroupId::new();
        assert!(Item::build(group_id, "a", "1").is_ok());
        assert!(Item::build(group_id, &"a".repeat(20), "1").is_ok());

        let errors = Item::build(group_id, &"a".repeat(21), "1").unwrap_err();
        assert_eq!(
            errors.on(Field::Name),
            vec!["is too long (maximum is 20 characters)"]
        );

        let errors = Item::build(group_id, "   ", "1").unwrap_err();
        assert!(errors.on(Field::Name).contains(&"can't be blank"));
        assert!(!errors.has(Field::Cost));
    }

    #[test]
    fn test_length_measured_after_normalization() {
        // extra whitespace does not count toward the limit
        let item = Item::build(GroupId::new(), "  abcdefghi   abcdefghij", "1");
        assert_eq!(item.unwrap().name, "Abcdefghi Abcdefghij");
    }

    #[test]
    fn test_cost_validation() {
        let group_id = GroupId::new();
        for bad in ["-1.00", "1.234", "abc", ""] {
            let errors = Item::build(group_id, "Pizza", bad).unwrap_err();
            assert!(errors.has(Field::Cost), "expected cost error for {:?}", bad);
        }
        assert!(Item::build(group_id, "Pizza", "$1,250.50").is_ok());
    }

    #[test]
    fn test_reports_all_fields() {
        let errors = Item::build(GroupId::new(), "", "").unwrap_err();
        assert!(errors.has(Field::Name));
        assert!(errors.has(Field::Cost));
    }

    #[test]
    fn test_apply_changes_is_all_or_nothing() {
        let mut item = Item::build(GroupId::new(), "pizza", "12").unwrap();
        let before = item.clone();

        let result = item.apply_changes(Some("big pizza"), Some("-3"));
        assert!(result.is_err());
        assert_eq!(item, before);

        item.apply_changes(Some("big   PIZZA"), None).unwrap();
        assert_eq!(item.name, "Big Pizza");
        assert_eq!(item.cost, before.cost);
    }

    #[test]
    fn test_display() {
        let item = Item::build(GroupId::new(), "pizza", "12").unwrap();
        assert_eq!(item.to_string(), "Pizza: $12.00");

        let rent = Item::build(GroupId::new(), "rent", "1250").unwrap();
        assert_eq!(rent.to_string(), "Rent: $1,250.00");
    }

    #[test]
    fn test_split_cost() {
        let cost = Money::from_cents(1200);
        assert_eq!(split_cost(cost, 0), 0.0);
        assert_eq!(split_cost(cost, 2), 12.0 * (1.0 / 2.0));
        assert_eq!(split_cost(cost, 2), 6.0);

        let odd = Money::from_cents(1000);
        assert_eq!(split_cost(odd, 3), 10.0 * (1.0 / 3.0));
    }

    #[test]
    fn test_validate_loaded_item() {
        let mut item = Item::build(GroupId::new(), "pizza", "12").unwrap();
        assert!(item.validate().is_ok());
        item.name = "lower case".into();
        assert!(item.validate().is_ok());
        item.name = "a".repeat(21);
        assert!(item.validate().unwrap_err().has(Field::Name));
        item.name = "Pizza".into();
        item.cost = Money::from_cents(-1);
        assert!(item.validate().unwrap_err().has(Field::Cost));
    }

    #[test]
    fn test_serialization_keeps_group() {
        let item = Item::build(GroupId::new(), "pizza", "12").unwrap();
        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back.group_id(), item.group_id());
        assert_eq!(back, item);
    }
}
