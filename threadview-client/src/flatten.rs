use crate::{
    api::{CommentId, MoreId, SortMode},
    CommentIdx, CommentTree, ControversyRule, Expansion, More, SortModeExt,
};

/// One row of the display sequence
///
/// Owned, so that the display layer can diff two successive flattenings by
/// identifier.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum DisplayItem {
    Comment { id: CommentId, depth: u32 },
    More { id: MoreId, depth: u32, count: u32 },
}

impl DisplayItem {
    fn more(m: &More) -> DisplayItem {
        DisplayItem::More {
            id: m.id.clone(),
            depth: m.depth,
            count: m.count,
        }
    }

    pub fn depth(&self) -> u32 {
        match self {
            DisplayItem::Comment { depth, .. } => *depth,
            DisplayItem::More { depth, .. } => *depth,
        }
    }

    pub fn comment_id(&self) -> Option<&CommentId> {
        match self {
            DisplayItem::Comment { id, .. } => Some(id),
            DisplayItem::More { .. } => None,
        }
    }

    pub fn is_more(&self) -> bool {
        matches!(self, DisplayItem::More { .. })
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Flattener {
    pub mode: SortMode,
    pub rule: ControversyRule,

    /// Whether placeholders are displayed at all, they are pointless offline
    pub show_more: bool,
}

enum Visit<'a> {
    Comment(CommentIdx),
    More(&'a More),
}

impl Flattener {
    pub fn new(mode: SortMode) -> Flattener {
        Flattener {
            mode,
            rule: ControversyRule::default(),
            show_more: true,
        }
    }

    /// Depth-first display sequence of the subtrees rooted at `roots`
    ///
    /// Each comment is followed by its sorted children, then by its trailing
    /// placeholder. The post's own placeholder comes last.
    pub fn flatten(&self, tree: &CommentTree, roots: &[CommentIdx]) -> Vec<DisplayItem> {
        let mut res = Vec::with_capacity(tree.len() + tree.num_mores());
        let mut roots = roots.to_vec();
        self.mode.sort_comments(tree, &self.rule, &mut roots);
        let mut stack = roots.into_iter().rev().map(Visit::Comment).collect::<Vec<_>>();
        while let Some(next) = stack.pop() {
            match next {
                Visit::More(m) => res.push(DisplayItem::more(m)),
                Visit::Comment(idx) => {
                    let c = tree.comment(idx);
                    res.push(DisplayItem::Comment {
                        id: c.id.clone(),
                        depth: c.depth,
                    });
                    if self.show_more {
                        if let Some(m) = tree.trailing_more(idx) {
                            stack.push(Visit::More(m));
                        }
                    }
                    let mut children = c.children.clone();
                    self.mode.sort_comments(tree, &self.rule, &mut children);
                    stack.extend(children.into_iter().rev().map(Visit::Comment));
                }
            }
        }
        if self.show_more {
            if let Some(m) = tree.post_more() {
                res.push(DisplayItem::more(m));
            }
        }
        res
    }
}

impl CommentTree {
    pub fn flatten(&self, mode: SortMode) -> Vec<DisplayItem> {
        Flattener::new(mode).flatten(self, self.roots())
    }
}

/// Hides the descendants of every collapsed comment
pub fn condense(items: &[DisplayItem], expansion: &Expansion) -> Vec<DisplayItem> {
    let mut condensed: Option<u32> = None;
    items
        .iter()
        .filter(|item| {
            if let Some(depth) = condensed {
                if item.depth() > depth {
                    return false;
                }
                condensed = None;
            }
            if let DisplayItem::Comment { id, depth } = item {
                if !expansion.is_expanded(id) {
                    condensed = Some(*depth);
                }
            }
            true
        })
        .cloned()
        .collect()
}

/// Counts of what is available offline and what is left to fetch
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DisplayStats {
    pub saved: usize,
    pub to_expand: u64,
}

impl DisplayStats {
    pub fn of(items: &[DisplayItem]) -> DisplayStats {
        items.iter().fold(DisplayStats::default(), |mut s, item| {
            match item {
                DisplayItem::Comment { .. } => s.saved += 1,
                DisplayItem::More { count, .. } => s.to_expand += u64::from(*count),
            }
            s
        })
    }
}
