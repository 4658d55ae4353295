use std::cmp::Ordering;

use chrono::Utc;

use crate::{
    api::{MoreId, SortMode, Time, MAX_CHILDREN_PER_REQUEST},
    CommentTree, More,
};

/// Placeholders to expand with a single request
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Batch {
    pub mores: Vec<MoreId>,

    /// Short ids of the children to request, across all of `mores`
    pub children: Vec<String>,
}

impl Batch {
    fn new() -> Batch {
        Batch {
            mores: Vec::new(),
            children: Vec::new(),
        }
    }

    fn push(&mut self, more: &More) {
        self.mores.push(more.id.clone());
        self.children.extend(more.children.iter().cloned());
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// What a placeholder is estimated to be worth, derived from its ancestors
#[derive(Clone, Copy, Debug)]
struct Value {
    top_level: bool,
    num_ancestors: usize,
    score: i64,
    age_ms: i64,
    controversy: i64,
}

impl Value {
    fn of(tree: &CommentTree, more: &More, now: Time) -> Value {
        let mut v = Value {
            top_level: more.is_top_level(),
            num_ancestors: 0,
            score: 0,
            age_ms: 0,
            controversy: 0,
        };
        let parent = match more.parent_comment() {
            Some(p) => p,
            None => return v,
        };
        if let Some(created) = tree.comment(parent).created {
            v.age_ms = (now - created).num_milliseconds();
        }
        for a in tree.ancestors(parent) {
            let c = tree.comment(a);
            v.num_ancestors += 1;
            v.score = v.score.saturating_add(c.score);
            let hidden = if c.score_hidden { 100_000 } else { 0 };
            v.controversy = v
                .controversy
                .saturating_add(hidden)
                .saturating_add(100_000i64.saturating_sub(c.score));
        }
        v
    }

    /// `Less` if `self` should be fetched first
    fn compare(&self, other: &Value, mode: SortMode) -> Ordering {
        other.top_level.cmp(&self.top_level).then_with(|| match mode {
            SortMode::Top => other.score.cmp(&self.score),
            SortMode::Worst => self.score.cmp(&other.score),
            SortMode::New => self.age_ms.cmp(&other.age_ms),
            SortMode::Old => other.age_ms.cmp(&self.age_ms),
            SortMode::Controversial => other
                .controversy
                .cmp(&self.controversy)
                .then_with(|| other.num_ancestors.cmp(&self.num_ancestors)),
        })
    }
}

/// Groups `placeholders` into at most `max_batches` requests, most valuable first
///
/// Each batch stays within `MAX_CHILDREN_PER_REQUEST` children, except for a
/// single placeholder that alone goes over it. Once `max_batches` batches are
/// full the remaining placeholders are left out.
pub fn batch(
    tree: &CommentTree,
    placeholders: &[&More],
    mode: SortMode,
    max_batches: usize,
) -> Vec<Batch> {
    batch_at(tree, placeholders, mode, max_batches, Utc::now())
}

/// Same as `batch`, with the ages of the comments computed as of `now`
pub fn batch_at(
    tree: &CommentTree,
    placeholders: &[&More],
    mode: SortMode,
    max_batches: usize,
    now: Time,
) -> Vec<Batch> {
    let mut batches = Vec::new();
    if max_batches == 0 || placeholders.is_empty() {
        return batches;
    }

    let mut sorted = placeholders
        .iter()
        .map(|m| (Value::of(tree, m, now), *m))
        .collect::<Vec<_>>();
    sorted.sort_by(|(l, _), (r, _)| l.compare(r, mode));

    let mut current = Batch::new();
    let mut iter = sorted.iter().map(|(_, m)| *m).peekable();
    while let Some(more) = iter.next() {
        current.push(more);
        let next = match iter.peek() {
            None => break,
            Some(next) => next,
        };
        if current.child_count() + next.children.len() > MAX_CHILDREN_PER_REQUEST {
            batches.push(std::mem::replace(&mut current, Batch::new()));
            if batches.len() >= max_batches {
                tracing::debug!(
                    num_batches = batches.len(),
                    num_placeholders = placeholders.len(),
                    "batch limit reached, leaving placeholders out"
                );
                return batches;
            }
        }
    }
    batches.push(current);
    tracing::debug!(?mode, num_batches = batches.len(), "planned batches");
    batches
}

/// Batches every placeholder of `tree`
pub fn batch_all(tree: &CommentTree, mode: SortMode, max_batches: usize) -> Vec<Batch> {
    let mores = tree.mores().collect::<Vec<_>>();
    batch(tree, &mores, mode, max_batches)
}
