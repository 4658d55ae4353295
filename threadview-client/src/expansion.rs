use std::collections::HashSet;

use crate::{api::CommentId, CommentTree};

/// Which comments the user collapsed
///
/// Kept beside the tree rather than inside it: merging a response never
/// resets what the user chose to hide.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Expansion {
    collapsed: HashSet<CommentId>,
}

impl Expansion {
    pub fn is_expanded(&self, id: &CommentId) -> bool {
        !self.collapsed.contains(id)
    }

    pub fn collapse(&mut self, id: CommentId) {
        self.collapsed.insert(id);
    }

    pub fn expand(&mut self, id: &CommentId) {
        self.collapsed.remove(id);
    }

    /// Returns whether the comment is expanded afterwards
    pub fn toggle(&mut self, id: CommentId) -> bool {
        if self.collapsed.remove(&id) {
            true
        } else {
            self.collapsed.insert(id);
            false
        }
    }

    pub fn num_collapsed(&self) -> usize {
        self.collapsed.len()
    }

    /// Forgets about comments that are not in `tree`
    pub fn prune(&mut self, tree: &CommentTree) {
        self.collapsed.retain(|id| tree.get(id).is_some());
    }
}
