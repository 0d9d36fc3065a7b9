//! Example index: an exact L2 vector store plus its aligned metadata.
//!
//! The store is loaded once at startup and never mutated afterwards.
//! [`IndexBuilder`] produces the persisted artifacts offline.

pub mod builder;
pub mod persist;
pub mod store;

pub use builder::load_examples_jsonl;
pub use builder::IndexBuilder;
pub use store::ScoredExample;
pub use store::VectorStore;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FeedbackError;
    use crate::models::Example;

    fn example(query: &str) -> Example {
        Example {
            query: query.to_string(),
            error_type: "Schema Error".to_string(),
            error_subtype: "undefined column".to_string(),
            feedback: "Check the columns.".to_string(),
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("embeddings.idx");
        let metadata_path = dir.path().join("example_meta.json");

        let store = VectorStore::new(
            3,
            vec![vec![0.0, 1.0, 2.0], vec![3.0, 4.0, 5.0]],
            vec![example("SELECT Salary FROM Employees;"), example("SELECT Time FROM Logs;")],
        )
        .unwrap();
        store.save(&index_path, &metadata_path).unwrap();

        let loaded = VectorStore::load(&index_path, &metadata_path).unwrap();
        assert_eq!(loaded.dimension(), 3);
        assert_eq!(loaded.examples(), store.examples());
        assert_eq!(
            loaded.search(&[3.0, 4.0, 4.0], 2).unwrap(),
            store.search(&[3.0, 4.0, 4.0], 2).unwrap()
        );
    }

    #[test]
    fn test_extra_metadata_record_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("embeddings.idx");
        let metadata_path = dir.path().join("example_meta.json");

        persist::write_index(&index_path, 2, &[0.0, 1.0]).unwrap();
        persist::write_metadata(&metadata_path, &[example("a"), example("b")]).unwrap();

        assert!(matches!(
            VectorStore::load(&index_path, &metadata_path),
            Err(FeedbackError::IndexCorruption(_))
        ));
    }

    #[test]
    fn test_metadata_not_examples_is_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let index_path = dir.path().join("embeddings.idx");
        let metadata_path = dir.path().join("example_meta.json");

        persist::write_index(&index_path, 2, &[0.0, 1.0]).unwrap();
        std::fs::write(&metadata_path, r#"{"not": "a list"}"#).unwrap();

        assert!(matches!(
            VectorStore::load(&index_path, &metadata_path),
            Err(FeedbackError::IndexCorruption(_))
        ));
    }
}
