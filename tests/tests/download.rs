use rand::SeedableRng;
use threadview_client::{
    api::{PostId, SortMode},
    CommentTree, Downloader,
};
use threadview_mock_server::MockRemote;

fn post() -> PostId {
    PostId(String::from("t3_download"))
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

#[test]
fn full_download_reproduces_the_thread() {
    let rt = runtime();
    for seed in 0..4 {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let thread = tests::generate_thread(&mut rng, &post(), 300);
        let mut remote = MockRemote::new(post(), thread, 3);

        let mut full = CommentTree::new(post());
        full.merge_listing(remote.full_listing());
        assert_eq!(full.len(), 300);

        let mut tree = CommentTree::new(post());
        tree.merge_listing(remote.listing());
        assert!(tree.len() < full.len());
        let mut rounds = 0;
        while tree.num_mores() > 0 {
            rounds += 1;
            assert!(rounds < 1000, "download does not make progress");
            let mut d = Downloader::plan(&tree, SortMode::ALL[seed as usize], 5);
            assert!(d.progress().total <= 5);
            rt.block_on(d.run(&mut tree, &mut remote)).unwrap();
        }

        assert_eq!(tree.len(), full.len());
        for mode in SortMode::ALL {
            assert_eq!(tree.flatten(mode), full.flatten(mode), "seed {seed}, {mode}");
        }
    }
}

#[test]
fn failures_are_resumable() {
    let rt = runtime();
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let thread = tests::generate_thread(&mut rng, &post(), 100);
    let mut remote = MockRemote::new(post(), thread, 2);
    let mut tree = CommentTree::new(post());
    tree.merge_listing(remote.listing());

    let mut d = Downloader::plan(&tree, SortMode::New, 3);
    let total = d.progress().total;
    assert!(total > 0);
    remote.fail_next(1);
    let err = rt.block_on(d.run(&mut tree, &mut remote)).unwrap_err();
    assert!(err.is_transient());
    assert_eq!(d.progress().completed, 0);

    let progress = rt.block_on(d.run(&mut tree, &mut remote)).unwrap();
    assert_eq!(progress.completed, total);
    assert_eq!(remote.requests().len(), total + 1);
}
