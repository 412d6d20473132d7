//! Run identifiers
//!
//! Each validation run gets a short unique id so that its log lines can be
//! told apart when several runs share one process.

use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Alphabet without look-alike characters, easier to read back from logs
const ID_ALPHABET: [char; 32] = [
    '2', '3', '4', '5', '6', '7', '8', '9',
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h',
    'j', 'k', 'm', 'n', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', '0',
];

/// Validation run ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl RunId {
    /// Create a new run ID
    pub fn new() -> Self {
        Self(generate_id_with_prefix("run"))
    }

    /// Create from string
    pub fn from_string(id: String) -> Self {
        Self(id)
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generate a 10-character id with a `prefix-` in front
pub fn generate_id_with_prefix(prefix: &str) -> String {
    format!("{}-{}", prefix, nanoid!(10, &ID_ALPHABET))
}
