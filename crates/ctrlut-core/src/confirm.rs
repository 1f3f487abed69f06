//! Confirmation gate for destructive batch removals.

/// Asks the user a yes/no question. Returning `false` aborts the operation.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Result of a gated batch removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// Nothing matched the selection; no question was asked.
    NothingSelected,
    /// The user declined; nothing was detached.
    Declined,
    /// These entries were detached, in order.
    Removed(Vec<String>),
}

/// Prompt shown before deleting `names`.
///
/// A single item is named; several are counted.
pub fn removal_prompt(names: &[&str]) -> String {
    match names {
        [one] => format!("Are you sure you want to delete {one}? This cannot be undone!"),
        many => format!(
            "Are you sure you want to delete the ({}) selected nodes? This cannot be undone!",
            many.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_selection_names_item() {
        assert_eq!(
            removal_prompt(&["Fresnel"]),
            "Are you sure you want to delete Fresnel? This cannot be undone!"
        );
    }

    #[test]
    fn test_multi_selection_counts_items() {
        assert!(removal_prompt(&["A", "B", "C"]).contains("(3) selected nodes"));
    }
}
