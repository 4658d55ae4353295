use std::path::{Path, PathBuf};

use anyhow::Context;
use threadview_client::{
    api::{CommentId, ParentId, PostId, SortMode, Thing},
    batch_all, condense, CommentTree, Config, DisplayItem, DisplayStats, Downloader, Expansion,
};
use threadview_mock_server::MockRemote;
use tracing_subscriber::EnvFilter;

#[derive(structopt::StructOpt)]
struct Opt {
    /// Configuration file, defaults to the one THREADVIEW_CONFIG points to
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// Thread listing, as a JSON array of comments and placeholders
    #[structopt(parse(from_os_str))]
    thread: PathBuf,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Print the comments in display order
    Flatten {
        #[structopt(short, long)]
        sort: Option<SortMode>,

        /// Short ids of the comments to collapse
        #[structopt(long)]
        collapse: Vec<String>,

        /// Do not print placeholders
        #[structopt(long)]
        hide_more: bool,
    },

    /// Print the requests a bulk download would issue
    Batches {
        #[structopt(short, long)]
        sort: Option<SortMode>,

        /// Maximum number of requests
        #[structopt(short, long)]
        max: Option<usize>,
    },

    /// Simulate downloading the whole thread from a server that truncates its
    /// listings
    Download {
        #[structopt(short, long)]
        sort: Option<SortMode>,

        /// Maximum number of requests per round
        #[structopt(short, long)]
        max: Option<usize>,

        /// Number of comments the server returns per level
        #[structopt(long, default_value = "5")]
        page_size: usize,
    },

    /// Count the comments available and the ones left to fetch
    Stats,
}

fn load_thread(path: &Path) -> anyhow::Result<(PostId, Vec<Thing>)> {
    let body = std::fs::read(path).with_context(|| format!("reading thread file {path:?}"))?;
    let things =
        Thing::parse_listing(&body).with_context(|| format!("parsing thread file {path:?}"))?;
    let post = things
        .iter()
        .find_map(|t| match t.parent() {
            ParentId::Post(p) => Some(p),
            _ => None,
        })
        .unwrap_or_else(PostId::stub);
    Ok((post, things))
}

fn print_items(tree: &CommentTree, items: &[DisplayItem]) {
    for item in items {
        let indent = "  ".repeat(item.depth() as usize);
        match item {
            DisplayItem::Comment { id, .. } => {
                let c = match tree.get(id) {
                    Some(c) => tree.comment(c),
                    None => continue,
                };
                let body = c.body.as_deref().unwrap_or("[deleted]");
                println!(
                    "{indent}{} [{}] {}: {}",
                    id.short(),
                    if c.score_hidden { String::from("?") } else { c.score.to_string() },
                    c.author.as_deref().unwrap_or("[deleted]"),
                    body.lines().next().unwrap_or(""),
                );
            }
            DisplayItem::More { count, .. } => println!("{indent}[{count} more]"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "threadview=info".into()),
        )
        .init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let config = match &opt.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::from_env()?,
    };
    let (post, things) = load_thread(&opt.thread)?;

    match opt.cmd {
        Command::Flatten {
            sort,
            collapse,
            hide_more,
        } => {
            let mut tree = CommentTree::new(post);
            tree.merge_listing(things);
            let mut flattener = config.flattener();
            flattener.mode = sort.unwrap_or(config.sort);
            flattener.show_more &= !hide_more;
            let mut expansion = Expansion::default();
            for c in collapse {
                expansion.collapse(CommentId::from_short(&c));
            }
            let items = condense(&flattener.flatten(&tree, tree.roots()), &expansion);
            print_items(&tree, &items);
        }
        Command::Batches { sort, max } => {
            let mut tree = CommentTree::new(post);
            tree.merge_listing(things);
            let batches = batch_all(
                &tree,
                sort.unwrap_or(config.sort),
                max.unwrap_or(config.batch_count),
            );
            for (i, b) in batches.iter().enumerate() {
                let mores = b.mores.iter().map(|m| m.0.as_str()).collect::<Vec<_>>();
                println!("{i}: {} children from {}", b.child_count(), mores.join(", "));
            }
        }
        Command::Download {
            sort,
            max,
            page_size,
        } => {
            let sort = sort.unwrap_or(config.sort);
            let max = max.unwrap_or(config.batch_count);
            anyhow::ensure!(max > 0, "downloading needs at least one request per round");
            let mut remote = MockRemote::new(post.clone(), things, page_size);
            let mut tree = CommentTree::new(post);
            tree.merge_listing(remote.listing());
            let mut round = 0;
            while tree.num_mores() > 0 {
                round += 1;
                let mut downloader = Downloader::plan(&tree, sort, max);
                let progress = downloader
                    .run(&mut tree, &mut remote)
                    .await
                    .with_context(|| format!("downloading round {round}"))?;
                tracing::info!(round, completed = progress.completed, "finished round");
            }
            println!(
                "downloaded {} of {} comments in {} requests",
                tree.len(),
                remote.num_comments(),
                remote.requests().len(),
            );
        }
        Command::Stats => {
            let mut tree = CommentTree::new(post);
            tree.merge_listing(things);
            let stats = DisplayStats::of(&tree.flatten(config.sort));
            println!("{} comments saved, {} to expand", stats.saved, stats.to_expand);
        }
    }

    Ok(())
}
