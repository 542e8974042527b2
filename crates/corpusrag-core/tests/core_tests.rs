use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

use corpusrag_core::data_processor::DataProcessor;

fn fixture_corpus() -> PathBuf {
    // crates/corpusrag-core -> crates -> repo root
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap().to_path_buf();
    root.join("test_data/corpus")
}

#[test]
fn process_directory_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let file_path = dir.join("a.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "Short text").unwrap();

    let processor = DataProcessor::new();
    let chunks = processor.process_directory(dir).expect("process");

    assert_eq!(chunks.len(), 1, "one small paragraph becomes one chunk");
    assert_eq!(chunks[0].text, "Short text");
    assert_eq!(chunks[0].doc_id, "a");
}

#[test]
fn only_top_level_txt_files_are_documents() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("b.TXT"), "bravo").unwrap();
    fs::write(dir.join("a.txt"), "alpha").unwrap();
    fs::write(dir.join("notes.md"), "ignored").unwrap();
    fs::create_dir(dir.join("nested")).unwrap();
    fs::write(dir.join("nested/c.txt"), "ignored too").unwrap();

    let docs = DataProcessor::new().load_documents(dir).expect("load");
    let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(docs[1].filename, "b.TXT");
}

#[test]
fn missing_directory_is_an_error() {
    let tmp = TempDir::new().unwrap();
    assert!(DataProcessor::new().load_documents(&tmp.path().join("nope")).is_err());
}

#[test]
fn fixture_corpus_respects_chunk_limit() {
    let processor = DataProcessor::with_max_chars(400);
    let chunks = processor.process_directory(&fixture_corpus()).expect("process fixtures");
    assert!(!chunks.is_empty());
    for c in &chunks {
        assert!(c.text.chars().count() <= 400, "chunk {}:{} too long", c.doc_id, c.chunk_index);
        assert!(!c.text.trim().is_empty());
    }
}
