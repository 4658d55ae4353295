use chrono::Utc;

mod comment;
pub use comment::{CommentData, CommentId};

mod error;
pub use error::Error;

mod more;
pub use more::{MoreData, MoreId};

mod post;
pub use post::PostId;

mod sort;
pub use sort::SortMode;

mod thing;
pub use thing::{ParentId, Thing};

pub type Time = chrono::DateTime<Utc>;

/// Upper bound on the number of child ids a single more-children request may carry
// See https://www.reddit.com/dev/api/#GET_api_morechildren
pub const MAX_CHILDREN_PER_REQUEST: usize = 100;

pub const COMMENT_PREFIX: &str = "t1_";
pub const POST_PREFIX: &str = "t3_";

// All the functions in this crate that are named `validate` check that the
// payload can be safely stored and displayed. The remote is not trusted to
// have sanitized it.
pub fn validate_string(s: &str) -> Result<(), Error> {
    if s.contains('\0') {
        return Err(Error::NullByteInString(s.to_string()));
    }
    Ok(())
}

pub fn validate_opt_string(s: &Option<String>) -> Result<(), Error> {
    match s {
        None => Ok(()),
        Some(s) => validate_string(s),
    }
}
