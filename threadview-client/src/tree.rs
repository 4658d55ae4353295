use std::collections::{BTreeMap, HashMap};

use crate::api::{CommentData, CommentId, MoreData, MoreId, PostId, Time};

/// Index of a comment in its `CommentTree`
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CommentIdx(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub author: Option<String>,
    pub body: Option<String>,
    pub created: Option<Time>,
    pub score: i64,
    pub score_hidden: bool,

    /// Upstream flagged this comment as controversial
    pub controversial: bool,

    /// Distance from the post, top-level comments being at 0
    pub depth: u32,

    /// Rank among direct siblings, as originally sent by the remote
    pub order: i64,

    pub parent: Option<CommentIdx>,

    /// Sorted by `order`
    pub children: Vec<CommentIdx>,

    /// Placeholder for the children not fetched yet
    pub more: Option<MoreId>,
}

impl Comment {
    fn from_data(data: &CommentData, parent: Option<CommentIdx>, order: i64) -> Comment {
        Comment {
            id: data.name.clone(),
            author: data.author.clone(),
            body: data.body.clone(),
            created: data.created(),
            score: data.score,
            score_hidden: data.score_hidden,
            controversial: data.is_controversial(),
            depth: data.depth,
            order,
            parent,
            children: Vec::new(),
            more: None,
        }
    }

    fn update_from(&mut self, data: &CommentData) {
        self.author = data.author.clone();
        self.body = data.body.clone();
        self.created = data.created();
        self.score = data.score;
        self.score_hidden = data.score_hidden;
        self.controversial = data.is_controversial();
        self.depth = data.depth;
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoreParent {
    Post,
    Comment(CommentIdx),
}

/// Stand-in for children of a comment (or of the post) that were not fetched yet
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct More {
    pub id: MoreId,
    pub depth: u32,
    pub count: u32,

    /// Short ids to request
    pub children: Vec<String>,

    pub parent: MoreParent,
}

impl More {
    pub fn parent_comment(&self) -> Option<CommentIdx> {
        match self.parent {
            MoreParent::Post => None,
            MoreParent::Comment(c) => Some(c),
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent == MoreParent::Post
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Node<'a> {
    Comment(CommentIdx),
    More(&'a More),
}

/// In-memory comment tree of a single post
///
/// Comments live in an arena and are never removed, placeholders are keyed by
/// their id and get dropped once the batch requesting them has been merged.
#[derive(Clone, Debug)]
pub struct CommentTree {
    post: PostId,
    pub(crate) comments: Vec<Comment>,
    by_id: HashMap<CommentId, CommentIdx>,
    roots: Vec<CommentIdx>,
    mores: BTreeMap<MoreId, More>,
    post_more: Option<MoreId>,
}

impl CommentTree {
    pub fn new(post: PostId) -> CommentTree {
        CommentTree {
            post,
            comments: Vec::new(),
            by_id: HashMap::new(),
            roots: Vec::new(),
            mores: BTreeMap::new(),
            post_more: None,
        }
    }

    pub fn post(&self) -> &PostId {
        &self.post
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Panics if `idx` does not come from this tree
    pub fn comment(&self, idx: CommentIdx) -> &Comment {
        &self.comments[idx.0]
    }

    pub fn get(&self, id: &CommentId) -> Option<CommentIdx> {
        self.by_id.get(id).copied()
    }

    pub fn comments(&self) -> impl Iterator<Item = (CommentIdx, &Comment)> {
        self.comments
            .iter()
            .enumerate()
            .map(|(i, c)| (CommentIdx(i), c))
    }

    /// Top-level comments, sorted by `order`
    pub fn roots(&self) -> &[CommentIdx] {
        &self.roots
    }

    /// Children of `parent`, or top-level comments for `None`
    pub fn children(&self, parent: Option<CommentIdx>) -> &[CommentIdx] {
        match parent {
            None => &self.roots,
            Some(p) => &self.comments[p.0].children,
        }
    }

    pub fn more(&self, id: &MoreId) -> Option<&More> {
        self.mores.get(id)
    }

    pub fn mores(&self) -> impl Iterator<Item = &More> {
        self.mores.values()
    }

    pub fn num_mores(&self) -> usize {
        self.mores.len()
    }

    pub fn post_more(&self) -> Option<&More> {
        self.post_more.as_ref().and_then(|m| self.mores.get(m))
    }

    pub fn trailing_more(&self, idx: CommentIdx) -> Option<&More> {
        self.comments[idx.0]
            .more
            .as_ref()
            .and_then(|m| self.mores.get(m))
    }

    /// Every comment and placeholder, in no particular order
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> {
        (0..self.comments.len())
            .map(|i| Node::Comment(CommentIdx(i)))
            .chain(self.mores.values().map(Node::More))
    }

    fn children_mut(&mut self, parent: Option<CommentIdx>) -> &mut Vec<CommentIdx> {
        match parent {
            None => &mut self.roots,
            Some(p) => &mut self.comments[p.0].children,
        }
    }

    fn attach(&mut self, idx: CommentIdx, parent: Option<CommentIdx>) {
        let mut siblings = std::mem::take(self.children_mut(parent));
        let order = self.comments[idx.0].order;
        let pos = siblings.partition_point(|s| self.comments[s.0].order <= order);
        siblings.insert(pos, idx);
        *self.children_mut(parent) = siblings;
        self.comments[idx.0].parent = parent;
    }

    fn detach(&mut self, idx: CommentIdx) {
        let parent = self.comments[idx.0].parent;
        self.children_mut(parent).retain(|c| *c != idx);
    }

    /// One past the highest `order` among the children of `parent`
    pub(crate) fn next_order(&self, parent: Option<CommentIdx>) -> i64 {
        self.children(parent)
            .iter()
            .map(|c| self.comments[c.0].order + 1)
            .max()
            .unwrap_or(0)
    }

    /// Creates or updates the comment described by `data`
    ///
    /// `order` is only applied to existing comments when set; new comments
    /// without an explicit order go after their last sibling.
    pub(crate) fn upsert_comment(
        &mut self,
        data: &CommentData,
        parent: Option<CommentIdx>,
        order: Option<i64>,
    ) -> CommentIdx {
        let idx = match self.by_id.get(&data.name) {
            Some(idx) => *idx,
            None => {
                let order = order.unwrap_or_else(|| self.next_order(parent));
                let idx = CommentIdx(self.comments.len());
                self.comments.push(Comment::from_data(data, None, order));
                self.by_id.insert(data.name.clone(), idx);
                self.attach(idx, parent);
                return idx;
            }
        };
        self.comments[idx.0].update_from(data);
        let old_parent = self.comments[idx.0].parent;
        let parent = match parent {
            Some(p) if self.is_ancestor_or_self(idx, p) => {
                tracing::warn!(
                    comment = ?data.name,
                    "refusing to move a comment under its own subtree"
                );
                old_parent
            }
            p => p,
        };
        let reorder = order.map_or(false, |o| o != self.comments[idx.0].order);
        if parent != old_parent || reorder {
            self.detach(idx);
            if let Some(o) = order {
                self.comments[idx.0].order = o;
            } else if parent != old_parent {
                self.comments[idx.0].order = self.next_order(parent);
            }
            self.attach(idx, parent);
        }
        idx
    }

    /// Installs `data` as the trailing placeholder of `parent`, replacing any
    /// previous one
    pub(crate) fn set_more(&mut self, data: &MoreData, parent: MoreParent) -> Option<MoreId> {
        if data.count == 0 {
            tracing::debug!(more = ?data.name, "ignoring empty placeholder");
            return None;
        }
        let previous = match parent {
            MoreParent::Post => self.post_more.clone(),
            MoreParent::Comment(c) => self.comments[c.0].more.clone(),
        };
        if let Some(previous) = previous {
            self.remove_more(&previous);
        }
        if let Some(stale) = self.mores.get(&data.name).cloned() {
            // the same placeholder moved to another parent
            self.remove_more(&stale.id);
        }
        let more = More {
            id: data.name.clone(),
            depth: data.depth,
            count: data.count,
            children: data.children.clone(),
            parent,
        };
        match parent {
            MoreParent::Post => self.post_more = Some(more.id.clone()),
            MoreParent::Comment(c) => self.comments[c.0].more = Some(more.id.clone()),
        }
        let id = more.id.clone();
        self.mores.insert(id.clone(), more);
        Some(id)
    }

    pub fn remove_more(&mut self, id: &MoreId) -> Option<More> {
        let more = self.mores.remove(id)?;
        match more.parent {
            MoreParent::Post => {
                if self.post_more.as_ref() == Some(id) {
                    self.post_more = None;
                }
            }
            MoreParent::Comment(c) => {
                let slot = &mut self.comments[c.0].more;
                if slot.as_ref() == Some(id) {
                    *slot = None;
                }
            }
        }
        Some(more)
    }
}
