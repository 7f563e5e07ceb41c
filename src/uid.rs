use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier stamped on every run artifact.
#[derive(Eq, PartialEq, Hash, Debug, Clone, Serialize, Deserialize)]
pub struct RunId(String);

impl From<&str> for RunId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RunId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl RunId {
    pub fn new() -> Self {
        Self(Self::random())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn random() -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }

    #[test]
    fn test_run_id_from_str() {
        let id = RunId::from("run-42");
        assert_eq!(id.as_str(), "run-42");
        assert_eq!(id.to_string(), "run-42");
    }
}
