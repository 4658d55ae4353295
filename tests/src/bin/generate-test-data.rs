use anyhow::Context;
use threadview_api::PostId;

const NUM_COMMENTS: usize = 500;

fn main() -> anyhow::Result<()> {
    // optional first argument: number of comments
    let num_comments = match std::env::args().nth(1) {
        None => NUM_COMMENTS,
        Some(n) => n
            .parse()
            .with_context(|| format!("parsing number of comments {n:?}"))?,
    };
    let post = PostId(format!("{}testdata", threadview_api::POST_PREFIX));
    let thread = tests::generate_thread(&mut rand::thread_rng(), &post, num_comments);
    println!(
        "{}",
        serde_json::to_string_pretty(&thread).context("serializing thread")?
    );
    Ok(())
}
