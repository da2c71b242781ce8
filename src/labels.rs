//! Numeric container labels
//!
//! Labels are free-form, but purely numeric ones form a sequence. The next
//! label handed out is always the smallest positive integer no container
//! currently uses, so numbering heals itself after deletions and manual edits.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::model::Container;

/// Parse a label that consists of ASCII digits only (surrounding whitespace
/// is ignored). Signs, decimals and embedded text disqualify the label.
pub fn parse_numeric_label(label: &str) -> Option<u64> {
    let trimmed = label.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Smallest positive integer not used as a numeric label by `containers`
pub fn smallest_available_numeric_label<'a>(
    containers: impl IntoIterator<Item = &'a Container>,
) -> u64 {
    let used: HashSet<u64> = containers
        .into_iter()
        .filter_map(|c| parse_numeric_label(&c.label))
        .collect();
    (1..).find(|candidate| !used.contains(candidate)).unwrap_or(1)
}

/// Ordering used by the occupant report: numeric labels numerically,
/// everything else by label text.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (parse_numeric_label(a), parse_numeric_label(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rotation;
    use std::collections::BTreeMap;

    fn labelled(label: &str) -> Container {
        Container {
            id: label.to_string(),
            kind: "10ft".to_string(),
            width_ft: 10.0,
            x: 0.0,
            y: 0.0,
            rotation: Rotation::Deg0,
            label: label.to_string(),
            renter: String::new(),
            monthly_rate: String::new(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            start_date: String::new(),
            occupied: false,
            doors: vec![],
            custom_values: BTreeMap::new(),
        }
    }

    #[test]
    fn test_parse_numeric_label() {
        assert_eq!(parse_numeric_label("42"), Some(42));
        assert_eq!(parse_numeric_label(" 7 "), Some(7));
        assert_eq!(parse_numeric_label("007"), Some(7));
        assert_eq!(parse_numeric_label("-3"), None);
        assert_eq!(parse_numeric_label("+3"), None);
        assert_eq!(parse_numeric_label("3.0"), None);
        assert_eq!(parse_numeric_label("A3"), None);
        assert_eq!(parse_numeric_label(""), None);
        assert_eq!(parse_numeric_label("99999999999999999999999"), None);
    }

    #[test]
    fn test_empty_collection_starts_at_one() {
        let none: Vec<Container> = Vec::new();
        assert_eq!(smallest_available_numeric_label(&none), 1);
    }

    #[test]
    fn test_fills_first_gap() {
        let containers: Vec<_> = ["1", "3", "4", "Office"].into_iter().map(labelled).collect();
        assert_eq!(smallest_available_numeric_label(&containers), 2);
    }

    #[test]
    fn test_non_numeric_labels_do_not_block() {
        let containers: Vec<_> = ["A", "B-2", "2.5"].into_iter().map(labelled).collect();
        assert_eq!(smallest_available_numeric_label(&containers), 1);
    }

    #[test]
    fn test_deleted_label_becomes_available() {
        let mut containers: Vec<_> = ["1", "2", "3", "4"].into_iter().map(labelled).collect();
        assert_eq!(smallest_available_numeric_label(&containers), 5);
        containers.retain(|c| c.label != "3");
        assert_eq!(smallest_available_numeric_label(&containers), 3);
        assert_eq!(smallest_available_numeric_label(&containers), 3);
    }

    #[test]
    fn test_compare_labels() {
        assert_eq!(compare_labels("2", "10"), Ordering::Less);
        assert_eq!(compare_labels("B", "A"), Ordering::Greater);
        assert_eq!(compare_labels("10", "A"), Ordering::Less);
    }
}
