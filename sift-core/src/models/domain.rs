use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse content category driving the starting similarity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Code,
    Text,
    Data,
    Documentation,
}

impl Domain {
    pub const ALL: [Domain; 4] = [Domain::Code, Domain::Text, Domain::Data, Domain::Documentation];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Code => "code",
            Domain::Text => "text",
            Domain::Data => "data",
            Domain::Documentation => "documentation",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = String;

    /// Exact, case-sensitive match on the lowercase name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown domain: {s}"))
    }
}
