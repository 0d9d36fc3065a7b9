//! Request-scoped and persisted records shared across the pipeline

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::errors::FeedbackError;

/// Labeled worked example stored alongside its embedding in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub query: String,
    pub error_type: String,
    pub error_subtype: String,
    pub feedback: String,
}

/// Learner emotion captured with the behavioral profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Emotion {
    Angry,
    Sad,
    Happy,
    Calm,
    Neutral,
}

impl Emotion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Angry => "angry",
            Self::Sad => "sad",
            Self::Happy => "happy",
            Self::Calm => "calm",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "angry" | "anger" => Ok(Self::Angry),
            "sad" | "sadness" => Ok(Self::Sad),
            "happy" | "happiness" => Ok(Self::Happy),
            "calm" | "calmness" => Ok(Self::Calm),
            "neutral" => Ok(Self::Neutral),
            other => Err(FeedbackError::InvalidProfile(format!(
                "unknown emotion: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for Emotion {
    type Error = FeedbackError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Typing dynamics and emotion for a single request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehavioralProfile {
    /// Keys per second
    pub typing_speed: f64,
    /// Milliseconds between consecutive keys
    pub avg_flight_time: f64,
    /// Milliseconds a key is held down
    pub avg_dwell_time: f64,
    pub backspace_rate: f64,
    pub delete_rate: f64,
    pub retry_count: u32,
    pub emotion: Emotion,
    /// Presentation-only label; never sent to the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learner_type: Option<String>,
}

/// Structured model verdict for a learner query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedbackResult {
    pub error_type: String,
    pub error_subtype: String,
    pub personalized_feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_aliases() {
        assert_eq!("anger".parse::<Emotion>().unwrap(), Emotion::Angry);
        assert_eq!("Sadness".parse::<Emotion>().unwrap(), Emotion::Sad);
        assert_eq!(" happy ".parse::<Emotion>().unwrap(), Emotion::Happy);
        assert!(matches!(
            "bored".parse::<Emotion>(),
            Err(FeedbackError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_emotion_deserializes_any_case() {
        let emotions: Vec<Emotion> =
            serde_json::from_str(r#"["ANGRY", "Anger", " calm ", "NEUTRAL"]"#).unwrap();
        assert_eq!(
            emotions,
            vec![Emotion::Angry, Emotion::Angry, Emotion::Calm, Emotion::Neutral]
        );
        assert_eq!(serde_json::to_string(&Emotion::Sad).unwrap(), "\"sad\"");

        let err = serde_json::from_str::<Emotion>(r#""bored""#).unwrap_err();
        assert!(err.to_string().contains("unknown emotion: bored"));
    }

    #[test]
    fn test_profile_deserializes_dataset_spelling() {
        let profile: BehavioralProfile = serde_json::from_str(
            r#"{"typing_speed":2.5,"avg_flight_time":200.0,"avg_dwell_time":100.0,
                "backspace_rate":0.03,"delete_rate":0.01,"retry_count":1,
                "emotion":"Happiness","learner_type":"steady_learner"}"#,
        )
        .unwrap();

        assert_eq!(profile.emotion, Emotion::Happy);
        assert_eq!(profile.learner_type.as_deref(), Some("steady_learner"));
    }

    #[test]
    fn test_example_serde_field_names() {
        let example = Example {
            query: "SELCT * FROM Robots;".to_string(),
            error_type: "Syntax Error".to_string(),
            error_subtype: "misspelling".to_string(),
            feedback: "Check the first keyword.".to_string(),
        };
        let json = serde_json::to_value(&example).unwrap();
        assert_eq!(json["error_subtype"], "misspelling");
    }
}
