//! Offline graph: crawl-to-graph, scoring, search and persistence.

use url::Url;
use wayfind::testing::SiteBuilder;
use wayfind::{FeatureWeights, PageGraph};

fn campus_site() -> wayfind::testing::MockFetcher {
    SiteBuilder::new("https://campus.edu")
        .page_with_paragraphs(
            "/",
            "campus home",
            &[
                ("/alumni", "Alumni", "News for our alumni community"),
                ("/parking", "Parking", "Where to park on campus"),
            ],
        )
        .page_with_paragraphs(
            "/alumni",
            "alumni landing page",
            &[("/alumni/reunion", "Reunion", "The annual alumni reunion")],
        )
        .page("/parking", "parking rules", &[])
        .page("/alumni/reunion", "reunion dinner on june 6", &[])
        .build()
}

#[test]
fn crawl_materializes_nodes_edges_and_bodies() {
    let fetcher = campus_site();
    let seed = Url::parse("https://campus.edu/").unwrap();

    let graph = tokio_test::block_on(PageGraph::from_crawl(&fetcher, &seed, 2));

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 3);
    assert_eq!(graph.body("https://campus.edu/alumni"), Some("alumni landing page"));

    let edge = graph
        .out_edges("https://campus.edu/")
        .find(|e| e.to == "https://campus.edu/alumni")
        .unwrap();
    assert_eq!(edge.link_text, "Alumni");
    assert_eq!(edge.paragraph, "News for our alumni community");
}

#[test]
fn scores_guide_the_offline_search_to_the_goal() {
    let fetcher = campus_site();
    let seed = Url::parse("https://campus.edu/").unwrap();

    let graph = tokio_test::block_on(PageGraph::from_crawl(&fetcher, &seed, 2));
    let scores = graph.heuristic_scores("alumni", FeatureWeights::WITH_BODY);

    // The alumni branch outscores parking
    assert!(scores["https://campus.edu/alumni"] > scores["https://campus.edu/parking"]);

    let path = graph
        .best_first("https://campus.edu/", "reunion dinner", &scores)
        .unwrap();
    assert_eq!(
        path,
        [
            "https://campus.edu/",
            "https://campus.edu/alumni",
            "https://campus.edu/alumni/reunion"
        ]
    );
}

#[test]
fn graph_survives_a_save_load_cycle() {
    let fetcher = campus_site();
    let seed = Url::parse("https://campus.edu/").unwrap();
    let graph = tokio_test::block_on(PageGraph::from_crawl(&fetcher, &seed, 2));

    let path = std::env::temp_dir().join(format!("wayfind-graph-{}.json", std::process::id()));
    graph.save(&path).unwrap();
    let restored = PageGraph::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(restored.node_count(), graph.node_count());
    assert_eq!(restored.edge_count(), graph.edge_count());
    assert_eq!(
        restored.body("https://campus.edu/alumni/reunion"),
        Some("reunion dinner on june 6")
    );

    // A search over the restored graph behaves identically
    let scores = restored.heuristic_scores("alumni", FeatureWeights::WITH_BODY);
    assert!(restored
        .best_first("https://campus.edu/", "reunion dinner", &scores)
        .is_some());
}
