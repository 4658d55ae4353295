use rand::Rng;
use threadview_api::{CommentData, CommentId, PostId, Thing};

const FIRST_CREATED: f64 = 1_600_000_000.0;
const MAX_REPLY_DELAY_SECS: u32 = 36_000;

const TOP_LEVEL_PROBABILITY: f64 = 0.3;
const DELETED_PROBABILITY: f64 = 0.05;
const HIDDEN_SCORE_PROBABILITY: f64 = 0.05;
const CONTROVERSIAL_PROBABILITY: f64 = 0.1;

const MAX_BODY_WORDS: usize = 40;

struct Generated {
    data: CommentData,
    children: Vec<usize>,
}

/// Random complete thread of `num_comments` comments under `post`
pub fn generate_thread(rng: &mut impl Rng, post: &PostId, num_comments: usize) -> Vec<Thing> {
    let mut comments: Vec<Generated> = Vec::with_capacity(num_comments);
    let mut roots = Vec::new();
    for i in 0..num_comments {
        let parent = match i == 0 || rng.gen_bool(TOP_LEVEL_PROBABILITY) {
            true => None,
            false => Some(rng.gen_range(0..i)),
        };
        let (parent_id, depth, after) = match parent {
            None => (post.0.clone(), 0, FIRST_CREATED),
            Some(p) => {
                let p = &comments[p].data;
                (p.name.0.clone(), p.depth + 1, p.created_utc.unwrap_or(FIRST_CREATED))
            }
        };
        let (author, body) = match rng.gen_bool(DELETED_PROBABILITY) {
            true => (None, None),
            false => {
                let num_words = rng.gen_range(1..=MAX_BODY_WORDS);
                (
                    Some(lipsum::lipsum_words_with_rng(&mut *rng, 1)),
                    Some(lipsum::lipsum_words_with_rng(&mut *rng, num_words)),
                )
            }
        };
        let data = CommentData {
            name: CommentId::from_short(&format!("{:x}", 0x1000 + i)),
            parent_id,
            author,
            body,
            created_utc: Some(after + f64::from(rng.gen_range(1..=MAX_REPLY_DELAY_SECS))),
            score: rng.gen_range(-20..200),
            score_hidden: rng.gen_bool(HIDDEN_SCORE_PROBABILITY),
            controversiality: u8::from(rng.gen_bool(CONTROVERSIAL_PROBABILITY)),
            depth,
            replies: Vec::new(),
        };
        comments.push(Generated {
            data,
            children: Vec::new(),
        });
        match parent {
            None => roots.push(i),
            Some(p) => comments[p].children.push(i),
        }
    }
    roots.iter().map(|r| nest(&comments, *r)).collect()
}

fn nest(comments: &[Generated], i: usize) -> Thing {
    let mut data = comments[i].data.clone();
    data.replies = comments[i].children.iter().map(|c| nest(comments, *c)).collect();
    Thing::Comment(data)
}
