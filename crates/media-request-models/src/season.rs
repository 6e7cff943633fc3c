use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which season(s) of a show a TV request asks for
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SeasonMode {
    /// Only the first regular season
    First,
    /// Only the most recent season
    #[default]
    Latest,
    /// Every season
    All,
}

impl SeasonMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonMode::First => "first",
            SeasonMode::Latest => "latest",
            SeasonMode::All => "all",
        }
    }
}

impl fmt::Display for SeasonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSeasonMode(pub String);

impl fmt::Display for UnknownSeasonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown season mode '{}' (expected first, latest or all)", self.0)
    }
}

impl std::error::Error for UnknownSeasonMode {}

impl FromStr for SeasonMode {
    type Err = UnknownSeasonMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(SeasonMode::First),
            "latest" => Ok(SeasonMode::Latest),
            "all" => Ok(SeasonMode::All),
            other => Err(UnknownSeasonMode(other.to_string())),
        }
    }
}
