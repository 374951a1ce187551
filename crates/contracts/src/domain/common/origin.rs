use serde::{Deserialize, Serialize};

/// Where a hotel, room or review came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Local database row
    Local,
    /// Third-party hotel data provider
    Provider,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Local => "local",
            Origin::Provider => "provider",
        }
    }

    /// Value of the `dataByApi` flag for records of this origin
    pub fn is_api(&self) -> bool {
        matches!(self, Origin::Provider)
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
