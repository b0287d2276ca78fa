//! Subscription set every query of a batch is scoped to.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered, duplicate-free list of subscription ids.
///
/// Built once per run and never modified afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct AccountSet(Vec<String>);

impl AccountSet {
    /// Build from ids in arrival order. Later duplicates are dropped.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AccountSet(ids.into_iter().map(Into::into).unique().collect())
    }

    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AccountSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_first_occurrence_order() {
        let set = AccountSet::new(["sub-b", "sub-a", "sub-b", "sub-c", "sub-a"]);
        assert_eq!(set.ids(), &["sub-b", "sub-a", "sub-c"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let set = AccountSet::new(["sub-a"]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["sub-a"]"#);
    }

    #[test]
    fn test_display() {
        let set = AccountSet::new(["a", "b"]);
        assert_eq!(set.to_string(), "[a, b]");
    }
}
