use crate::Error;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct MoreId(pub String);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct MoreData {
    pub name: MoreId,

    /// Fullname of either the parent comment or the post
    pub parent_id: String,

    #[serde(default)]
    pub depth: u32,

    /// Number of not-yet-fetched comments this stands for, descendants included
    #[serde(default)]
    pub count: u32,

    /// Short ids of the direct children to request
    #[serde(default)]
    pub children: Vec<String>,
}

impl MoreData {
    // See comments on other `validate` functions throughout threadview-api
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.name.0)?;
        crate::validate_string(&self.parent_id)?;
        for c in &self.children {
            crate::validate_string(c)?;
        }
        Ok(())
    }
}
