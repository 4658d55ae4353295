mod tree;
pub use tree::{Comment, CommentIdx, CommentTree, More, MoreParent, Node};

mod hierarchy;
pub use hierarchy::Ancestors;

mod merge;

mod sort;
pub use sort::{ControversyRule, Side, SortModeExt};

mod flatten;
pub use flatten::{condense, DisplayItem, DisplayStats, Flattener};

mod expansion;
pub use expansion::Expansion;

mod batch;
pub use batch::{batch, batch_all, batch_at, Batch};

mod download;
pub use download::{fetch_one, Downloader, Progress, Remote};

mod config;
pub use config::{Config, CONFIG_ENV_VAR};

pub mod api {
    pub use threadview_api::*;
}

pub mod prelude {
    pub use crate::SortModeExt;
}
