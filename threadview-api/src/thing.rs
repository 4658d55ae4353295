use crate::{CommentData, CommentId, Error, MoreData, PostId};

/// One node of a listing as sent by the remote
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "kind", content = "data")]
pub enum Thing {
    #[serde(rename = "t1")]
    Comment(CommentData),
    #[serde(rename = "more")]
    More(MoreData),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParentId {
    Post(PostId),
    Comment(CommentId),
    Unknown(String),
}

impl ParentId {
    pub fn parse(fullname: &str) -> ParentId {
        if CommentId::is_fullname(fullname) {
            ParentId::Comment(CommentId(fullname.to_string()))
        } else if PostId::is_fullname(fullname) {
            ParentId::Post(PostId(fullname.to_string()))
        } else {
            ParentId::Unknown(fullname.to_string())
        }
    }
}

impl Thing {
    pub fn parent(&self) -> ParentId {
        match self {
            Thing::Comment(c) => ParentId::parse(&c.parent_id),
            Thing::More(m) => ParentId::parse(&m.parent_id),
        }
    }

    pub fn depth(&self) -> u32 {
        match self {
            Thing::Comment(c) => c.depth,
            Thing::More(m) => m.depth,
        }
    }

    // See comments on other `validate` functions throughout threadview-api
    pub fn validate(&self) -> Result<(), Error> {
        match self {
            Thing::Comment(c) => c.validate(),
            Thing::More(m) => m.validate(),
        }
    }

    /// Parses and validates a listing body
    pub fn parse_listing(body: &[u8]) -> Result<Vec<Thing>, Error> {
        let things: Vec<Thing> = serde_json::from_slice(body)?;
        for t in &things {
            t.validate()?;
        }
        Ok(things)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_listing() {
        let body = br#"[
            {"kind": "t1", "data": {
                "name": "t1_a", "parent_id": "t3_p", "score": 3, "depth": 0,
                "replies": [
                    {"kind": "more", "data": {
                        "name": "m1", "parent_id": "t1_a", "depth": 1,
                        "count": 2, "children": ["b", "c"]
                    }}
                ]
            }},
            {"kind": "more", "data": {
                "name": "m0", "parent_id": "t3_p", "depth": 0,
                "count": 1, "children": ["d"]
            }}
        ]"#;
        let things = Thing::parse_listing(body).unwrap();
        assert_eq!(things.len(), 2);
        match &things[0] {
            Thing::Comment(c) => {
                assert_eq!(c.name, CommentId(String::from("t1_a")));
                assert_eq!(c.replies.len(), 1);
                assert_eq!(
                    c.replies[0].parent(),
                    ParentId::Comment(CommentId(String::from("t1_a")))
                );
            }
            t => panic!("expected a comment, got {t:?}"),
        }
        assert_eq!(things[1].parent(), ParentId::Post(PostId(String::from("t3_p"))));
        assert_eq!(things[1].depth(), 0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Thing::parse_listing(b"{\"kind\": \"t2\"}"),
            Err(Error::ParseFailed(_))
        ));
        let body = br#"[{"kind": "t1", "data": {"name": "t1_a", "parent_id": "t3_p", "body": "a\u0000b"}}]"#;
        assert!(matches!(
            Thing::parse_listing(body),
            Err(Error::NullByteInString(_))
        ));
    }

    #[test]
    fn unknown_parents() {
        assert_eq!(
            ParentId::parse("t5_sub"),
            ParentId::Unknown(String::from("t5_sub"))
        );
    }
}
