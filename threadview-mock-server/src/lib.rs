use std::collections::HashMap;

use threadview_client::{
    api::{
        CommentData, CommentId, Error, MoreData, MoreId, PostId, SortMode, Thing,
        MAX_CHILDREN_PER_REQUEST,
    },
    Remote,
};

/// Serves a complete thread the way the upstream site would: a listing where
/// every level is cut after `page_size` comments, and more-children requests
/// for what was cut.
pub struct MockRemote {
    post: PostId,

    // keyed by short id, replies stripped
    comments: HashMap<String, CommentData>,
    children: HashMap<Option<String>, Vec<String>>,

    page_size: usize,
    fail_next: usize,
    requests: Vec<Vec<String>>,
}

impl MockRemote {
    pub fn new(post: PostId, thread: Vec<Thing>, page_size: usize) -> MockRemote {
        let mut res = MockRemote {
            post,
            comments: HashMap::new(),
            children: HashMap::new(),
            page_size,
            fail_next: 0,
            requests: Vec::new(),
        };
        res.index(None, thread);
        res
    }

    pub fn from_json(post: PostId, body: &[u8], page_size: usize) -> Result<MockRemote, Error> {
        Ok(MockRemote::new(post, Thing::parse_listing(body)?, page_size))
    }

    fn index(&mut self, parent: Option<&str>, things: Vec<Thing>) {
        for t in things {
            match t {
                Thing::Comment(mut c) => {
                    let replies = std::mem::take(&mut c.replies);
                    let short = c.name.short().to_string();
                    self.children
                        .entry(parent.map(String::from))
                        .or_default()
                        .push(short.clone());
                    self.comments.insert(short.clone(), c);
                    self.index(Some(&short), replies);
                }
                Thing::More(m) => {
                    tracing::warn!(more = ?m.name, "ignoring placeholder in the complete thread")
                }
            }
        }
    }

    pub fn post(&self) -> &PostId {
        &self.post
    }

    pub fn num_comments(&self) -> usize {
        self.comments.len()
    }

    /// Child ids of every request received so far
    pub fn requests(&self) -> &[Vec<String>] {
        &self.requests
    }

    /// Makes the next `n` requests fail
    pub fn fail_next(&mut self, n: usize) {
        self.fail_next = n;
    }

    /// The whole thread, without any placeholder
    pub fn full_listing(&self) -> Vec<Thing> {
        self.render_level(None, usize::MAX)
    }

    /// What the first request for the post's comments would return
    pub fn listing(&self) -> Vec<Thing> {
        self.render_level(None, self.page_size)
    }

    pub fn listing_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(&self.listing())?)
    }

    fn children_of(&self, parent: Option<&str>) -> &[String] {
        self.children
            .get(&parent.map(String::from))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn num_descendants(&self, short: &str) -> usize {
        self.children_of(Some(short))
            .iter()
            .map(|c| 1 + self.num_descendants(c))
            .sum()
    }

    fn render(&self, short: &str, page_size: usize) -> Option<Thing> {
        let mut data = self.comments.get(short)?.clone();
        data.replies = self.render_level(Some(short), page_size);
        Some(Thing::Comment(data))
    }

    fn render_level(&self, parent: Option<&str>, page_size: usize) -> Vec<Thing> {
        let children = self.children_of(parent);
        let (shown, rest) = children.split_at(children.len().min(page_size));
        let mut res = shown
            .iter()
            .filter_map(|c| self.render(c, page_size))
            .collect::<Vec<_>>();
        if !rest.is_empty() {
            let count = rest.iter().map(|c| 1 + self.num_descendants(c)).sum::<usize>();
            let (parent_id, depth) = match parent {
                None => (self.post.0.clone(), 0),
                Some(p) => (
                    CommentId::from_short(p).0,
                    self.comments.get(p).map_or(0, |c| c.depth + 1),
                ),
            };
            res.push(Thing::More(MoreData {
                name: MoreId(format!("more_{}", parent.unwrap_or("post"))),
                parent_id,
                depth,
                count: u32::try_from(count).unwrap_or(u32::MAX),
                children: rest.to_vec(),
            }));
        }
        res
    }
}

#[async_trait::async_trait]
impl Remote for MockRemote {
    async fn more_children(
        &mut self,
        post: &PostId,
        ids: &[String],
        sort: SortMode,
    ) -> Result<Vec<Thing>, Error> {
        self.requests.push(ids.to_vec());
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(Error::FetchFailed(String::from("mock remote set to fail")));
        }
        if *post != self.post {
            return Err(Error::FetchFailed(format!("unknown post {post:?}")));
        }
        if ids.len() > MAX_CHILDREN_PER_REQUEST {
            tracing::warn!(num_ids = ids.len(), "request over the children limit, serving anyway");
        }
        tracing::debug!(?sort, num_ids = ids.len(), "serving more children");
        let things = ids
            .iter()
            .filter_map(|id| match self.render(id, self.page_size) {
                Some(t) => Some(t),
                None => {
                    tracing::debug!(?id, "requested unknown comment");
                    None
                }
            })
            .collect::<Vec<_>>();
        // go through the wire format, like a real response would
        let body = serde_json::to_vec(&things)?;
        Thing::parse_listing(&body)
    }
}

#[cfg(test)]
mod tests {
    use threadview_client::{CommentTree, Downloader};

    use super::*;

    fn post() -> PostId {
        PostId(String::from("t3_post"))
    }

    fn comment(name: &str, parent: Option<&str>, depth: u32, replies: Vec<Thing>) -> Thing {
        Thing::Comment(CommentData {
            name: CommentId::from_short(name),
            parent_id: match parent {
                None => post().0,
                Some(p) => CommentId::from_short(p).0,
            },
            author: Some(format!("u_{name}")),
            body: Some(format!("body of {name}")),
            created_utc: Some(1_600_000_000.0),
            score: 1,
            score_hidden: false,
            controversiality: 0,
            depth,
            replies,
        })
    }

    fn thread() -> Vec<Thing> {
        vec![
            comment(
                "a",
                None,
                0,
                vec![
                    comment("a1", Some("a"), 1, vec![comment("a11", Some("a1"), 2, vec![])]),
                    comment("a2", Some("a"), 1, vec![]),
                    comment("a3", Some("a"), 1, vec![]),
                ],
            ),
            comment("b", None, 0, vec![]),
            comment("c", None, 0, vec![comment("c1", Some("c"), 1, vec![])]),
        ]
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn listing_is_truncated_into_placeholders() {
        let remote = MockRemote::new(post(), thread(), 1);
        assert_eq!(remote.num_comments(), 7);
        let listing = remote.listing();
        assert_eq!(listing.len(), 2);
        match &listing[1] {
            Thing::More(m) => {
                assert_eq!(m.name, MoreId(String::from("more_post")));
                assert_eq!(m.children, vec!["b", "c"]);
                assert_eq!(m.count, 3);
            }
            t => panic!("expected a placeholder, got {t:?}"),
        }
        match &listing[0] {
            Thing::Comment(a) => match &a.replies[1] {
                Thing::More(m) => {
                    assert_eq!(m.parent_id, "t1_a");
                    assert_eq!(m.depth, 1);
                    assert_eq!(m.children, vec!["a2", "a3"]);
                }
                t => panic!("expected a placeholder, got {t:?}"),
            },
            t => panic!("expected a comment, got {t:?}"),
        }

        let json = remote.listing_json().unwrap();
        assert_eq!(Thing::parse_listing(json.as_bytes()).unwrap(), listing);
    }

    #[test]
    fn full_listing_has_no_placeholder() {
        let remote = MockRemote::new(post(), thread(), 1);
        assert_eq!(remote.full_listing(), thread());
    }

    #[test]
    fn serves_requested_children() {
        let mut remote = MockRemote::new(post(), thread(), 1);
        let rt = runtime();
        let ids = vec![String::from("c"), String::from("nope")];
        let res = rt
            .block_on(remote.more_children(&post(), &ids, SortMode::Top))
            .unwrap();
        assert_eq!(res, vec![comment("c", None, 0, vec![comment("c1", Some("c"), 1, vec![])])]);

        remote.fail_next(1);
        let err = rt
            .block_on(remote.more_children(&post(), &ids, SortMode::Top))
            .unwrap_err();
        assert!(err.is_transient());
        assert_eq!(remote.requests().len(), 2);
    }

    #[test]
    fn downloads_until_complete() {
        let mut remote = MockRemote::new(post(), thread(), 1);
        let mut tree = CommentTree::new(post());
        tree.merge_listing(remote.listing());
        assert_eq!(tree.len(), 3);
        let rt = runtime();
        while tree.num_mores() > 0 {
            let mut d = Downloader::plan(&tree, SortMode::Top, 5);
            rt.block_on(d.run(&mut tree, &mut remote)).unwrap();
        }
        assert_eq!(tree.len(), remote.num_comments());
    }
}
