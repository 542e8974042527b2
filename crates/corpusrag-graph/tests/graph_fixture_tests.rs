use std::path::PathBuf;

use corpusrag_core::error::Error;
use corpusrag_graph::{load_knowledge_graph, GraphExpander, GraphNode, NodeType};

fn fixture(name: &str) -> PathBuf {
    // crates/corpusrag-graph -> crates -> repo root
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap().join("test_data").join(name)
}

async fn expander() -> GraphExpander {
    let graph = load_knowledge_graph(&fixture("graph_nodes.json"), &fixture("graph_edges.json")).await.unwrap();
    GraphExpander::new(graph)
}

fn ids<'a>(nodes: &[&'a GraphNode]) -> Vec<&'a str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

#[tokio::test]
async fn fixture_graph_loads_every_node_and_edge() {
    let g = expander().await;
    assert_eq!(g.graph().nodes().len(), 13);
    assert_eq!(g.graph().edges().len(), 10);
    let podcast = g.graph().node("podcast_game_music").unwrap();
    assert_eq!(podcast.node_type, NodeType::Other("podcast".into()));
}

#[tokio::test]
async fn two_game_query_targets_both_essays() {
    let g = expander().await;
    let e = g.expand("Ocarina and Galaxy");
    assert_eq!(
        ids(&e.seeds),
        vec!["work_zelda_ocarina", "work_mario_galaxy", "game_ocarina", "game_galaxy", "media_trailer"]
    );
    assert_eq!(&ids(&e.nodes)[5..], &["concept_leitmotif", "artist_kondo"]);
    assert_eq!(e.target_doc_ids.iter().map(String::as_str).collect::<Vec<_>>(), vec!["mario_galaxy", "zelda_ocarina"]);
}

#[tokio::test]
async fn short_title_and_neighbours_resolve_portal() {
    let g = expander().await;
    let e = g.expand("portal");
    assert_eq!(ids(&e.seeds), vec!["work_portal", "game_portal"]);
    assert!(ids(&e.nodes).contains(&"perf_still_alive"));
    assert!(ids(&e.nodes).contains(&"podcast_game_music"));
    // artist_coulton is two hops away through the performance
    assert!(!ids(&e.nodes).contains(&"artist_coulton"));
    assert_eq!(e.target_doc_ids.len(), 1);
    assert!(e.target_doc_ids.contains("portal_still_alive"));
}

#[tokio::test]
async fn stopword_terms_still_match_entities() {
    let g = expander().await;
    // "the" is a stopword for keyword scoring but appears in a game name
    let e = g.expand("the");
    assert_eq!(ids(&e.seeds), vec!["game_ocarina"]);
    assert!(e.target_doc_ids.contains("zelda_ocarina"));
}

#[tokio::test]
async fn expanding_the_same_query_twice_is_deterministic() {
    let g = expander().await;
    let first = g.expand("Ocarina of Time");
    let second = g.expand("Ocarina of Time");
    assert_eq!(ids(&first.nodes), ids(&second.nodes));
    assert_eq!(ids(&g.expand_neighbors(&first.seeds)), ids(&first.nodes));
    assert_eq!(first.target_doc_ids.len(), 1);
    // expansion stops after one hop; feeding `nodes` back in reaches Galaxy through Kondo
    assert!(!ids(&first.nodes).contains(&"game_galaxy"));
    assert!(ids(&g.expand_neighbors(&first.nodes)).contains(&"game_galaxy"));
}

#[tokio::test]
async fn object_shaped_files_fail_fast() {
    let dir = tempfile::tempdir().unwrap();
    let nodes = dir.path().join("nodes.json");
    std::fs::write(&nodes, r#"{"nodes": []}"#).unwrap();
    let err = load_knowledge_graph(&nodes, &fixture("graph_edges.json")).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::MalformedGraph(_))));

    let missing = dir.path().join("missing.json");
    assert!(load_knowledge_graph(&missing, &fixture("graph_edges.json")).await.is_err());
}
