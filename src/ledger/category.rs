use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Usage bucket tracked by the ledger. The declaration order is the order every report uses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Education,
    Games,
    Entertainment,
    Video,
    // Older ledgers call this bucket SNS.
    #[serde(alias = "SNS", alias = "sns")]
    Social,
    Messaging,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Education,
        Category::Games,
        Category::Entertainment,
        Category::Video,
        Category::Social,
        Category::Messaging,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Education => "education",
            Category::Games => "games",
            Category::Entertainment => "entertainment",
            Category::Video => "video",
            Category::Social => "social",
            Category::Messaging => "messaging",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("sns") {
            return Ok(Category::Social);
        }
        Category::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow!("Unknown category {s:?}"))
    }
}
