use std::cmp::Ordering;

use crate::{api::SortMode, Comment, CommentIdx, CommentTree, MoreParent, Node};

/// Marks which arguments of a comparison stand for the end of their comment's
/// subtree rather than for the comment itself
///
/// A placeholder is compared as if it were its parent comment with the side
/// flag set, so that it lands right after the last descendant of that parent.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Side {
    pub left: bool,
    pub right: bool,
}

impl Side {
    pub const NONE: Side = Side {
        left: false,
        right: false,
    };
    pub const LEFT: Side = Side {
        left: true,
        right: false,
    };
    pub const RIGHT: Side = Side {
        left: false,
        right: true,
    };
    pub const BOTH: Side = Side {
        left: true,
        right: true,
    };
}

/// Decides which comments count as controversial
///
/// Only the net score is known, so this can only be a heuristic: upstream's own
/// flag, a hidden score, or a score close enough to zero.
#[derive(
    Clone, Copy, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize,
)]
pub struct ControversyRule {
    pub score_threshold: Option<i64>,
}

impl ControversyRule {
    pub fn is_controversial(&self, c: &Comment) -> bool {
        c.controversial
            || c.score_hidden
            || self
                .score_threshold
                .map_or(false, |t| c.score.unsigned_abs() <= t.unsigned_abs())
    }
}

pub trait SortModeExt {
    /// Compares two comments that share a parent
    fn direct(&self, rule: &ControversyRule, lhs: &Comment, rhs: &Comment) -> Ordering;

    /// Compares two comments anywhere in the tree
    ///
    /// Comments are ordered by their first diverging ancestors, so a whole
    /// subtree always sorts as a block.
    fn compare_comments(
        &self,
        tree: &CommentTree,
        rule: &ControversyRule,
        lhs: CommentIdx,
        rhs: CommentIdx,
        side: Side,
    ) -> Ordering;

    fn compare_nodes(
        &self,
        tree: &CommentTree,
        rule: &ControversyRule,
        lhs: Node<'_>,
        rhs: Node<'_>,
    ) -> Ordering;

    fn sort_comments(&self, tree: &CommentTree, rule: &ControversyRule, comments: &mut [CommentIdx]);

    fn sort_nodes(&self, tree: &CommentTree, rule: &ControversyRule, nodes: &mut [Node<'_>]);
}

impl SortModeExt for SortMode {
    fn direct(&self, rule: &ControversyRule, lhs: &Comment, rhs: &Comment) -> Ordering {
        match self {
            SortMode::Top => rhs
                .score
                .cmp(&lhs.score)
                .then_with(|| oldest_first(lhs, rhs)),
            SortMode::Worst => lhs
                .score
                .cmp(&rhs.score)
                .then_with(|| oldest_first(lhs, rhs)),
            SortMode::New => rhs
                .created
                .cmp(&lhs.created)
                .then_with(|| fallback(lhs, rhs)),
            SortMode::Old => oldest_first(lhs, rhs),
            SortMode::Controversial => controversy(rule, lhs, rhs)
                .then_with(|| oldest_first(lhs, rhs)),
        }
    }

    fn compare_comments(
        &self,
        tree: &CommentTree,
        rule: &ControversyRule,
        lhs: CommentIdx,
        rhs: CommentIdx,
        side: Side,
    ) -> Ordering {
        if lhs == rhs {
            return match (side.left, side.right) {
                (false, true) => Ordering::Less,
                (true, false) => Ordering::Greater,
                _ => Ordering::Equal,
            };
        }
        let (l, r) = (tree.comment(lhs), tree.comment(rhs));
        if l.parent == r.parent {
            return self.direct(rule, l, r);
        }
        let lhs_chain = tree.ancestor_chain(lhs);
        let rhs_chain = tree.ancestor_chain(rhs);
        for (l, r) in lhs_chain.iter().zip(rhs_chain.iter()) {
            if l != r {
                return self.direct(rule, tree.comment(*l), tree.comment(*r));
            }
        }
        // One is an ancestor of the other
        match lhs_chain.len() < rhs_chain.len() {
            true if side.left => Ordering::Greater,
            true => Ordering::Less,
            false if side.right => Ordering::Less,
            false => Ordering::Greater,
        }
    }

    fn compare_nodes(
        &self,
        tree: &CommentTree,
        rule: &ControversyRule,
        lhs: Node<'_>,
        rhs: Node<'_>,
    ) -> Ordering {
        match (lhs, rhs) {
            (Node::Comment(l), Node::Comment(r)) => {
                self.compare_comments(tree, rule, l, r, Side::NONE)
            }
            (Node::Comment(c), Node::More(m)) => match m.parent {
                MoreParent::Post => Ordering::Less,
                MoreParent::Comment(p) => self.compare_comments(tree, rule, c, p, Side::RIGHT),
            },
            (Node::More(m), Node::Comment(c)) => match m.parent {
                MoreParent::Post => Ordering::Greater,
                MoreParent::Comment(p) => self.compare_comments(tree, rule, p, c, Side::LEFT),
            },
            (Node::More(l), Node::More(r)) => match (l.parent, r.parent) {
                (MoreParent::Post, MoreParent::Post) => l.id.cmp(&r.id),
                (MoreParent::Comment(_), MoreParent::Post) => Ordering::Less,
                (MoreParent::Post, MoreParent::Comment(_)) => Ordering::Greater,
                (MoreParent::Comment(lp), MoreParent::Comment(rp)) => self
                    .compare_comments(tree, rule, lp, rp, Side::BOTH)
                    .then_with(|| l.id.cmp(&r.id)),
            },
        }
    }

    fn sort_comments(&self, tree: &CommentTree, rule: &ControversyRule, comments: &mut [CommentIdx]) {
        comments.sort_by(|l, r| self.compare_comments(tree, rule, *l, *r, Side::NONE))
    }

    fn sort_nodes(&self, tree: &CommentTree, rule: &ControversyRule, nodes: &mut [Node<'_>]) {
        nodes.sort_by(|l, r| self.compare_nodes(tree, rule, *l, *r))
    }
}

fn oldest_first(lhs: &Comment, rhs: &Comment) -> Ordering {
    lhs.created
        .cmp(&rhs.created)
        .then_with(|| fallback(lhs, rhs))
}

/// Last-resort ordering when scores and dates are equal
///
/// Authors, then bodies, only count when known on both sides. Siblings that
/// are still equal keep the order the remote sent them in.
fn fallback(lhs: &Comment, rhs: &Comment) -> Ordering {
    if_both_known(&lhs.author, &rhs.author)
        .then_with(|| if_both_known(&lhs.body, &rhs.body))
        .then_with(|| lhs.order.cmp(&rhs.order))
        .then_with(|| lhs.id.cmp(&rhs.id))
}

fn if_both_known(lhs: &Option<String>, rhs: &Option<String>) -> Ordering {
    match (lhs, rhs) {
        (Some(l), Some(r)) => l.cmp(r),
        _ => Ordering::Equal,
    }
}

fn controversy(rule: &ControversyRule, lhs: &Comment, rhs: &Comment) -> Ordering {
    match (rule.is_controversial(lhs), rule.is_controversial(rhs)) {
        (false, false) => lhs.score.cmp(&rhs.score),
        (true, true) => lhs.score.unsigned_abs().cmp(&rhs.score.unsigned_abs()),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
    }
}
