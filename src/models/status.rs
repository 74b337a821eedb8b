// src/models/status.rs

//! Expected PEP statuses per preview code.

use std::collections::HashMap;
use std::fmt;

/// Statuses accepted for one preview code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedStatuses(Vec<&'static str>);

impl AcceptedStatuses {
    pub fn contains(&self, status: &str) -> bool {
        self.0.iter().any(|s| *s == status)
    }
}

impl fmt::Display for AcceptedStatuses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// Immutable mapping from preview code (possibly empty) to accepted statuses.
#[derive(Debug, Clone)]
pub struct StatusExpectations {
    table: HashMap<String, AcceptedStatuses>,
}

impl StatusExpectations {
    /// Look up the accepted statuses; `None` means the code is unknown.
    pub fn accepted(&self, code: &str) -> Option<&AcceptedStatuses> {
        self.table.get(code)
    }
}

impl Default for StatusExpectations {
    fn default() -> Self {
        let entries: [(&str, &[&'static str]); 8] = [
            ("A", &["Active", "Accepted"]),
            ("D", &["Deferred"]),
            ("F", &["Final"]),
            ("P", &["Provisional"]),
            ("R", &["Rejected"]),
            ("S", &["Superseded"]),
            ("W", &["Withdrawn"]),
            ("", &["Draft", "Active"]),
        ];

        let table = entries
            .into_iter()
            .map(|(code, statuses)| (code.to_string(), AcceptedStatuses(statuses.to_vec())))
            .collect();

        Self { table }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_expected(code: &str, status: &str) -> Option<bool> {
        StatusExpectations::default()
            .accepted(code)
            .map(|accepted| accepted.contains(status))
    }

    #[test]
    fn test_empty_code_accepts_draft_and_active() {
        assert_eq!(is_expected("", "Draft"), Some(true));
        assert_eq!(is_expected("", "Active"), Some(true));
        assert_eq!(is_expected("", "Final"), Some(false));
    }

    #[test]
    fn test_rejected_code_refuses_final() {
        assert_eq!(is_expected("R", "Final"), Some(false));
        assert_eq!(is_expected("R", "Rejected"), Some(true));
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(is_expected("X", "Final"), None);
        for code in ["A", "D", "F", "P", "R", "S", "W", ""] {
            assert!(is_expected(code, "Draft").is_some());
        }
    }

    #[test]
    fn test_display_lists_all_statuses() {
        let expectations = StatusExpectations::default();
        assert_eq!(
            expectations.accepted("A").unwrap().to_string(),
            "(Active, Accepted)"
        );
    }
}
