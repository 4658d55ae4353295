use crate::{CommentIdx, CommentTree};

/// Iterator from a comment up to its top-level ancestor, both included
pub struct Ancestors<'a> {
    tree: &'a CommentTree,
    next: Option<CommentIdx>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = CommentIdx;

    fn next(&mut self) -> Option<CommentIdx> {
        let current = self.next?;
        self.next = self.tree.comment(current).parent;
        Some(current)
    }
}

impl CommentTree {
    pub fn ancestors(&self, idx: CommentIdx) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(idx),
        }
    }

    /// Earliest ancestor first, ending with `idx` itself
    pub fn ancestor_chain(&self, idx: CommentIdx) -> Vec<CommentIdx> {
        let mut chain = self.ancestors(idx).collect::<Vec<_>>();
        chain.reverse();
        chain
    }

    pub fn is_ancestor_or_self(&self, ancestor: CommentIdx, of: CommentIdx) -> bool {
        self.ancestors(of).any(|a| a == ancestor)
    }
}
