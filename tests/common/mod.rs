//! In-process fakes shared by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use sqlfeedback::embeddings::Embedder;
use sqlfeedback::llm::CompletionClient;
use sqlfeedback::models::BehavioralProfile;
use sqlfeedback::models::Emotion;
use sqlfeedback::models::Example;
use sqlfeedback::rag::FeedbackPipeline;
use sqlfeedback::FeedbackError;
use sqlfeedback::Result;
use sqlfeedback::VectorStore;

pub const DIMENSION: usize = 3;

/// Returns a fixed vector per known text and `fallback` otherwise
pub struct TableEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    fallback: Vec<f32>,
    calls: AtomicUsize,
}

impl TableEmbedder {
    pub fn new(fallback: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for TableEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .vectors
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Replies with a canned text and records every prompt it receives
pub struct ScriptedCompletion {
    reply: String,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn delayed(reply: &str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(reply)
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.reply.clone())
    }
}

/// Every completion call fails like an unavailable upstream
pub struct FailingCompletion {
    calls: AtomicUsize,
}

impl FailingCompletion {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for FailingCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FeedbackError::CompletionError(
            "503 Service Unavailable".to_string(),
        ))
    }
}

fn example(query: &str, error_type: &str, error_subtype: &str, feedback: &str) -> Example {
    Example {
        query: query.to_string(),
        error_type: error_type.to_string(),
        error_subtype: error_subtype.to_string(),
        feedback: feedback.to_string(),
    }
}

/// Five labeled examples laid out along distinct axes
pub fn sample_store() -> VectorStore {
    VectorStore::new(
        DIMENSION,
        vec![
            vec![1.0, 0.0, 0.0],
            vec![0.9, 0.1, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.5, 0.5],
        ],
        vec![
            example(
                "SELCT Name FROM Workers;",
                "Syntax Error",
                "misspelling",
                "Check the spelling of SELECT.",
            ),
            example(
                "SELECT Name FRM Workers;",
                "Syntax Error",
                "misspelling",
                "FROM is misspelled.",
            ),
            example(
                "SELECT Salary FROM Workers;",
                "Schema Error",
                "undefined column",
                "Workers has no Salary column.",
            ),
            example(
                "SELECT * FROM Employees JOIN Robots;",
                "Logic Error",
                "incorrect JOIN usage",
                "Add an ON condition to the JOIN.",
            ),
            example(
                "SELECT Name FROM Employees WHERE Age > '30';",
                "Syntax Error",
                "data type mismatch",
                "Compare numbers with numbers.",
            ),
        ],
    )
    .unwrap()
}

pub fn happy_profile() -> BehavioralProfile {
    BehavioralProfile {
        typing_speed: 4.0,
        avg_flight_time: 150.0,
        avg_dwell_time: 80.0,
        backspace_rate: 0.01,
        delete_rate: 0.0,
        retry_count: 0,
        emotion: Emotion::Happy,
        learner_type: None,
    }
}

pub const TIMEOUT: Duration = Duration::from_secs(5);

pub fn pipeline(
    embedder: Arc<TableEmbedder>,
    llm: Arc<ScriptedCompletion>,
) -> FeedbackPipeline {
    FeedbackPipeline::from_services(Arc::new(sample_store()), embedder, llm, TIMEOUT, TIMEOUT)
}
