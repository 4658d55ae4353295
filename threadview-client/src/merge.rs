use crate::{
    api::{MoreId, ParentId, Thing},
    CommentIdx, CommentTree, MoreParent,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum MergeKind {
    /// A complete listing: sibling order comes from the payload and a
    /// comment's replies are exhaustive
    Listing,

    /// Response to a more-children request: nodes are appended after their
    /// existing siblings
    MoreChildren,
}

impl CommentTree {
    /// Merges the listing of a post's comments
    ///
    /// Returns every comment that was created or updated.
    pub fn merge_listing(&mut self, things: Vec<Thing>) -> Vec<CommentIdx> {
        let mut merged = Vec::new();
        self.merge_level(None, things, MergeKind::Listing, &mut merged);
        tracing::debug!(post = ?self.post(), num_merged = merged.len(), "merged listing");
        merged
    }

    /// Merges the response to a request for the children of `requested`
    ///
    /// The requested placeholders are dropped, and each returned node is
    /// placed under the parent its payload names.
    pub fn merge_more_children(
        &mut self,
        requested: &[MoreId],
        things: Vec<Thing>,
    ) -> Vec<CommentIdx> {
        for id in requested {
            if self.remove_more(id).is_none() {
                tracing::debug!(more = ?id, "requested placeholder was already gone");
            }
        }
        let mut merged = Vec::new();
        for t in things {
            let parent = self.resolve_parent(&t);
            self.merge_thing(parent, t, None, MergeKind::MoreChildren, &mut merged);
        }
        tracing::debug!(
            post = ?self.post(),
            num_requested = requested.len(),
            num_merged = merged.len(),
            "merged more children"
        );
        merged
    }

    fn resolve_parent(&self, t: &Thing) -> Option<CommentIdx> {
        match t.parent() {
            ParentId::Post(p) if p == *self.post() => None,
            ParentId::Comment(c) => match self.get(&c) {
                Some(idx) => Some(idx),
                None => {
                    // Also add as a top-level node if the parent could not be found
                    tracing::warn!(parent = ?c, "parent comment is not in the tree, attaching to post");
                    None
                }
            },
            parent => {
                tracing::warn!(?parent, post = ?self.post(), "unexpected parent, attaching to post");
                None
            }
        }
    }

    fn merge_level(
        &mut self,
        parent: Option<CommentIdx>,
        things: Vec<Thing>,
        kind: MergeKind,
        merged: &mut Vec<CommentIdx>,
    ) {
        let mut order = 0;
        for t in things {
            let is_comment = matches!(t, Thing::Comment(_));
            self.merge_thing(parent, t, Some(order), kind, merged);
            if is_comment {
                order += 1;
            }
        }
    }

    fn merge_thing(
        &mut self,
        parent: Option<CommentIdx>,
        thing: Thing,
        order: Option<i64>,
        kind: MergeKind,
        merged: &mut Vec<CommentIdx>,
    ) {
        match thing {
            Thing::Comment(mut data) => {
                let replies = std::mem::take(&mut data.replies);
                let idx = self.upsert_comment(&data, parent, order);
                merged.push(idx);
                if kind == MergeKind::Listing || !replies.is_empty() {
                    if let Some(old) = self.comment(idx).more.clone() {
                        self.remove_more(&old);
                    }
                }
                match kind {
                    MergeKind::Listing => self.merge_level(Some(idx), replies, kind, merged),
                    MergeKind::MoreChildren => {
                        for r in replies {
                            self.merge_thing(Some(idx), r, None, kind, merged);
                        }
                    }
                }
            }
            Thing::More(data) => {
                let parent = match parent {
                    None => MoreParent::Post,
                    Some(c) => MoreParent::Comment(c),
                };
                self.set_more(&data, parent);
            }
        }
    }
}
