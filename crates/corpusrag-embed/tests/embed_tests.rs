use corpusrag_core::config::Settings;
use corpusrag_core::error::Error;
use corpusrag_core::traits::EmbedProvider;
use corpusrag_embed::{get_default_embedder, FakeEmbedder, FAKE_EMBEDDING_DIM};

#[tokio::test]
async fn fake_embedder_batches_preserve_order() {
    let e = FakeEmbedder::new(32);
    let texts = vec!["koji kondo".to_string(), "aperture science".to_string()];
    let batch = e.embed_batch(&texts).await.unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0], e.embed_text("koji kondo"));
    assert_eq!(batch[1], e.embed_text("aperture science"));
    assert_eq!(e.embed("koji kondo").await.unwrap(), batch[0]);
}

#[tokio::test]
async fn shared_words_raise_similarity() {
    let e = FakeEmbedder::new(FAKE_EMBEDDING_DIM);
    let a = e.embed_text("ocarina melody song of storms");
    let b = e.embed_text("the ocarina melody returns");
    let c = e.embed_text("portal turret opera");
    let dot = |x: &[f32], y: &[f32]| x.iter().zip(y).map(|(p, q)| p * q).sum::<f32>();
    assert!(dot(&a, &b) > dot(&a, &c));
}

// Both env-dependent cases live in one test so they never race each other.
#[test]
fn default_embedder_follows_environment() {
    std::env::set_var("APP_USE_FAKE_EMBEDDINGS", "1");
    let e = get_default_embedder(&Settings::default()).unwrap();
    assert_eq!(e.model_id(), format!("fake:xxh64:d{FAKE_EMBEDDING_DIM}"));

    std::env::remove_var("APP_USE_FAKE_EMBEDDINGS");
    std::env::remove_var("OPENAI_API_KEY");
    let err = get_default_embedder(&Settings::default()).err().unwrap();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidConfig(_))));

    let mut settings = Settings::default();
    settings.api.key = Some("sk-test".into());
    let e = get_default_embedder(&settings).unwrap();
    assert_eq!(e.model_id(), "text-embedding-3-small");
}
