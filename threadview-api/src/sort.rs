use std::{fmt, str::FromStr};

use crate::Error;

#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Top,
    Worst,
    New,
    Old,
    Controversial,
}

impl SortMode {
    pub const ALL: [SortMode; 5] = [
        SortMode::Top,
        SortMode::Worst,
        SortMode::New,
        SortMode::Old,
        SortMode::Controversial,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SortMode::Top => "top",
            SortMode::Worst => "worst",
            SortMode::New => "new",
            SortMode::Old => "old",
            SortMode::Controversial => "controversial",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<SortMode, Error> {
        SortMode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownSortMode(s.to_string()))
    }
}
