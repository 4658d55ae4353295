use std::collections::VecDeque;

use crate::{
    api::{Error, MoreId, PostId, SortMode, Thing},
    batch_all, Batch, CommentIdx, CommentTree,
};

/// Where the children of placeholders get fetched from
#[async_trait::async_trait]
pub trait Remote: Send {
    /// Fetches the comments with short ids `ids`, along with whatever replies
    /// the remote chooses to inline
    async fn more_children(
        &mut self,
        post: &PostId,
        ids: &[String],
        sort: SortMode,
    ) -> Result<Vec<Thing>, Error>;
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

/// Fetches a planned sequence of batches, one request at a time
///
/// Each response is merged into the tree before the next request goes out.
#[derive(Clone, Debug)]
pub struct Downloader {
    sort: SortMode,
    remaining: VecDeque<Batch>,
    progress: Progress,
}

impl Downloader {
    pub fn plan(tree: &CommentTree, sort: SortMode, max_batches: usize) -> Downloader {
        let remaining = VecDeque::from(batch_all(tree, sort, max_batches));
        tracing::info!(post = ?tree.post(), num_batches = remaining.len(), "planned download");
        Downloader {
            sort,
            progress: Progress {
                completed: 0,
                total: remaining.len(),
            },
            remaining,
        }
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn remaining(&self) -> impl Iterator<Item = &Batch> {
        self.remaining.iter()
    }

    /// Downloads and merges the next batch
    ///
    /// Returns `None` once every batch got downloaded. On failure the batch
    /// stays queued, so calling this again retries it.
    pub async fn download_next<R: Remote + ?Sized>(
        &mut self,
        tree: &mut CommentTree,
        remote: &mut R,
    ) -> Result<Option<Vec<CommentIdx>>, Error> {
        let batch = match self.remaining.front() {
            None => return Ok(None),
            Some(b) => b,
        };
        let things = match remote
            .more_children(tree.post(), &batch.children, self.sort)
            .await
        {
            Ok(things) => things,
            Err(e) => {
                tracing::error!(
                    post = ?tree.post(),
                    batch = self.progress.completed,
                    kind = e.kind(),
                    transient = e.is_transient(),
                    error = %e,
                    "failed downloading batch"
                );
                return Err(e);
            }
        };
        let merged = tree.merge_more_children(&batch.mores, things);
        self.remaining.pop_front();
        self.progress.completed += 1;
        tracing::info!(
            completed = self.progress.completed,
            total = self.progress.total,
            num_merged = merged.len(),
            "downloaded batch"
        );
        Ok(Some(merged))
    }

    /// Downloads every remaining batch, stopping at the first failure
    pub async fn run<R: Remote + ?Sized>(
        &mut self,
        tree: &mut CommentTree,
        remote: &mut R,
    ) -> Result<Progress, Error> {
        while self.download_next(tree, remote).await?.is_some() {}
        Ok(self.progress)
    }
}

/// Expands a single placeholder, as when the user taps it
pub async fn fetch_one<R: Remote + ?Sized>(
    tree: &mut CommentTree,
    remote: &mut R,
    more: &MoreId,
    sort: SortMode,
) -> Result<Vec<CommentIdx>, Error> {
    let children = match tree.more(more) {
        Some(m) => m.children.clone(),
        None => return Err(Error::UnknownPlaceholder(more.clone())),
    };
    let things = remote.more_children(tree.post(), &children, sort).await?;
    Ok(tree.merge_more_children(std::slice::from_ref(more), things))
}
