use chrono::TimeZone;

use crate::{Error, Thing, Time, COMMENT_PREFIX};

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct CommentId(pub String);

impl CommentId {
    /// Builds a comment fullname out of the short id placeholders list their children by
    pub fn from_short(short: &str) -> CommentId {
        CommentId(format!("{COMMENT_PREFIX}{short}"))
    }

    /// The id without its kind prefix
    pub fn short(&self) -> &str {
        self.0.strip_prefix(COMMENT_PREFIX).unwrap_or(&self.0)
    }

    pub fn is_fullname(name: &str) -> bool {
        name.starts_with(COMMENT_PREFIX)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CommentData {
    pub name: CommentId,

    /// Fullname of either the parent comment or the post
    pub parent_id: String,

    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub body: Option<String>,

    /// Seconds since the unix epoch
    #[serde(default)]
    pub created_utc: Option<f64>,

    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub score_hidden: bool,

    /// Upstream's own controversy flag, 0 or 1
    #[serde(default)]
    pub controversiality: u8,

    #[serde(default)]
    pub depth: u32,

    #[serde(default)]
    pub replies: Vec<Thing>,
}

impl CommentData {
    pub fn created(&self) -> Option<Time> {
        let secs = self.created_utc?;
        if !secs.is_finite() {
            return None;
        }
        let nanos = (secs.fract() * 1e9) as u32;
        chrono::Utc.timestamp_opt(secs.trunc() as i64, nanos).single()
    }

    pub fn is_controversial(&self) -> bool {
        self.controversiality > 0
    }

    // See comments on other `validate` functions throughout threadview-api
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.name.0)?;
        crate::validate_string(&self.parent_id)?;
        crate::validate_opt_string(&self.author)?;
        crate::validate_opt_string(&self.body)?;
        for r in &self.replies {
            r.validate()?;
        }
        Ok(())
    }
}
