use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three progressive cleanup phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupPhase {
    Daily,
    Weekly,
    Monthly,
}

impl CleanupPhase {
    /// Fixed execution order.
    pub const ALL: [CleanupPhase; 3] = [CleanupPhase::Daily, CleanupPhase::Weekly, CleanupPhase::Monthly];

    pub fn as_str(&self) -> &'static str {
        match self {
            CleanupPhase::Daily => "daily",
            CleanupPhase::Weekly => "weekly",
            CleanupPhase::Monthly => "monthly",
        }
    }
}

impl fmt::Display for CleanupPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
