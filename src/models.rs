use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id :    i64,
    pub short : String,
    pub long :  String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id :           i64,
    pub username :     String,
    pub manage_links : bool,
    pub manage_users : bool,
    #[serde(default)]
    pub disabled :     bool,
    /// The seed account. Its permissions can't be edited.
    pub orig :         bool,
}

/// Identifies a table row and prefixes every element id inside it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RowKey {
    Id(i64),
    Short(String),
}

impl RowKey {
    pub fn dom_id(&self, suffix : &str) -> String {
        format!("{}-{}", self, suffix)
    }

    pub fn row_id(&self) -> String {
        self.dom_id("row")
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f : &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Id(id) => write!(f, "{}", id),
            RowKey::Short(short) => f.write_str(short),
        }
    }
}

impl From<i64> for RowKey {
    fn from(id : i64) -> Self {
        RowKey::Id(id)
    }
}

impl From<&str> for RowKey {
    fn from(short : &str) -> Self {
        RowKey::Short(short.to_string())
    }
}
