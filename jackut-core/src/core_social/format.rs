//! Brace-list rendering for relation and membership queries

use std::fmt::Display;

/// Render items as `{a,b,c}` (no spaces), or `{}` when empty.
///
/// Items are emitted in the iterator's order, so callers control ordering by the
/// collection they pass in.
pub fn format_set<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    let joined = items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{}}}", joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_social::types::Login;

    #[test]
    fn test_empty_set() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(format_set(empty), "{}");
    }

    #[test]
    fn test_single_item() {
        assert_eq!(format_set(["alice"]), "{alice}");
    }

    #[test]
    fn test_preserves_iteration_order() {
        let logins = vec![Login::from("carol"), Login::from("alice"), Login::from("bob")];
        assert_eq!(format_set(&logins), "{carol,alice,bob}");
    }
}
