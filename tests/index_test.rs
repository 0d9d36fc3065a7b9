//! Offline build -> persisted artifacts -> pipeline over the reloaded store

mod common;

use std::sync::Arc;

use common::*;
use sqlfeedback::index::IndexBuilder;
use sqlfeedback::rag::FeedbackPipeline;
use sqlfeedback::FeedbackError;
use sqlfeedback::VectorStore;

const DATASET: &str = r#"{"query":"SELCT Name FROM Workers;","error_type":"Syntax Error","error_subtype":"misspelling","feedback":"Check the spelling of SELECT.","emotion":"Happiness"}
{"query":"SELECT Salary FROM Workers;","error_type":"Schema Error","error_subtype":"undefined column","feedback":"Workers has no Salary column."}

{"query":"SELECT * FROM Employees JOIN Robots;","error_type":"Logic Error","error_subtype":"incorrect JOIN usage","feedback":"Add an ON condition."}
"#;

fn dataset_embedder() -> TableEmbedder {
    TableEmbedder::new(vec![0.0, 0.0, 0.0])
        .with("SELCT Name FROM Workers;", vec![1.0, 0.0, 0.0])
        .with("SELECT Salary FROM Workers;", vec![0.0, 1.0, 0.0])
        .with("SELECT * FROM Employees JOIN Robots;", vec![0.0, 0.0, 1.0])
        .with("SELECT * FROM Staff JOIN Robots;", vec![0.1, 0.0, 0.9])
}

#[tokio::test]
async fn test_built_index_serves_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("few_shot_examples.jsonl");
    std::fs::write(&input, DATASET).unwrap();
    let index_path = dir.path().join("db").join("embeddings.idx");
    let metadata_path = dir.path().join("db").join("example_meta.json");

    let embedder = Arc::new(dataset_embedder());
    let built = IndexBuilder::new(embedder.clone())
        .with_batch_size(2)
        .build_from_file(&input, &index_path, &metadata_path)
        .await
        .unwrap();
    assert_eq!(built.len(), 3);
    assert_eq!(embedder.calls(), 3);

    let store = Arc::new(VectorStore::load(&index_path, &metadata_path).unwrap());
    assert_eq!(store.examples(), built.examples());

    let llm = Arc::new(ScriptedCompletion::new(
        r#"{"error_type":"Logic Error","error_subtype":"incorrect JOIN usage","personalized_feedback":"Join on a key."}"#,
    ));
    let pipeline =
        FeedbackPipeline::from_services(store, embedder, llm.clone(), TIMEOUT, TIMEOUT)
            .with_default_k(1);

    let response = pipeline
        .run(sqlfeedback::rag::FeedbackRequest {
            query: "SELECT * FROM Staff JOIN Robots;".to_string(),
            profile: happy_profile(),
            k: 1,
        })
        .await
        .unwrap();

    assert_eq!(response.examples.len(), 1);
    assert_eq!(response.examples[0].error_subtype, "incorrect JOIN usage");
    assert!(llm.prompts()[0].contains("SQL Query: SELECT * FROM Employees JOIN Robots;"));
}

#[tokio::test]
async fn test_query_dimension_must_match_index() {
    let store = Arc::new(sample_store());
    let embedder = Arc::new(TableEmbedder::new(vec![0.0; DIMENSION + 1]));
    let llm = Arc::new(ScriptedCompletion::new("{}"));
    let pipeline = FeedbackPipeline::from_services(store, embedder, llm.clone(), TIMEOUT, TIMEOUT);

    let err = pipeline
        .generate("SELECT 1;", &happy_profile())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FeedbackError::DimensionMismatch {
            expected: 3,
            actual: 4
        }
    ));
    assert_eq!(llm.calls(), 0);
}
