use crate::POST_PREFIX;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct PostId(pub String);

impl PostId {
    pub fn stub() -> PostId {
        PostId(format!("{POST_PREFIX}stub"))
    }

    pub fn is_fullname(name: &str) -> bool {
        name.starts_with(POST_PREFIX)
    }
}
