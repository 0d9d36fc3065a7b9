//! Prompt construction for SQL feedback generation.
//!
//! The static sections below are part of the model-facing contract. Their
//! wording, indentation and order are reproduced exactly on every request;
//! changing any of them changes model behavior.

use crate::errors::Result;
use crate::models::BehavioralProfile;
use crate::models::Example;
use crate::rag::profile::interpret;
use crate::rag::profile::InterpretedProfile;

pub const SCHEMA: &str = r"
    ### Database Schema
        Employees(
            Employee_ID INT PK, 
            Name TEXT, 
            Job_Role TEXT, 
            Division TEXT, 
            Last_Login_Time DATETIME
        )

        Robots(
            Robot_ID INT PK, 
            Model TEXT, 
            Manufacturing_Date DATETIME, 
            Status TEXT, 
            Last_Software_Update DATETIME, 
            Employee_ID INT FK
        )

        Logs(
            Log_ID INT PK, 
            Employee_ID INT FK, 
            Action_Description TEXT, 
            Timestamp DATETIME, 
            Robot_ID INT FK
        )

        Incidents(
            Incident_ID INT PK, 
            Description TEXT, 
            Timestamp DATETIME, 
            Robot_ID INT FK, 
            Employee_ID INT FK
        )

        Access_Codes(
            Access_Code_ID INT PK, 
            Employee_ID INT FK, 
            Level_of_Access TEXT, 
            Timestamp_of_Last_Use DATETIME  
        )
    ";

pub const TAXONOMY: &str = r"
    Error Types:
    1. Syntax Error
        - misspelling
        - missing quotes
        - missing commas
        - missing semicolons
        - non-standard operators
        - unmatched brackets
        - data type mismatch
        - incorrect wildcard usage
        - incomplete query
        - incorrect SELECT usage
        - incorrect DISTINCT usage
        - wrong positioning
        - aggregation misuse
    
    2. Schema Error
        - undefined table
        - undefined column
        - undefined function

    3. Logic Error
        - ambiguous reference
        - incorrect GROUP BY usage
        - incorrect HAVING clause
        - incorrect JOIN usage
        - incorrect ORDER BY usage
        - operator misuse
    
    4. Construction Error
        - inefficient query
    ";

pub const USER_BEHAVIOR_RULES: &str = r"
    ### User Behavior Interpretation Rules 

    Typing Speed:
    - < 2.1 keys/s → slow and careful 
    - 2.1–3.4 keys/s → normal pace 
    - > 3.4 keys/s → fast and energetic 

    Dwell Time:
    - < 90 ms → quick decisive keypresses
    - 90–122 ms → normal dwell time 
    - > 122 ms → thoughtful, cautious pressing 

    Flight Time:
    - < 195 ms → very fast transitions 
    - 195–380 ms → normal transitions 
    - > 380 ms → longer pauses, possible uncertainty

    Correction Rate (backspace/delete combined):
    - < 0.02 → very low correction behavior
    - 0.02–0.08 → normal corrections
    - > 0.08 → high correction behavior
    ";

pub const SQL_SEMICOLON_RULE: &str = r#"
    ### Semicolon Rules
    - Single SQL statements typically don't require semicolons in most environments
    - Mark Error type as "Syntax" and Error subtype as "missing semicolons" if it ends without a semicolon
    "#;

/// Output contract and tone policy
pub const TASK_INSTRUCTIONS: &str = r#"### Task
Given the new SQL query, analyze it using the style shown in the examples.
Return **strict JSON** in the following format:

{
  "error_type": "",
  "error_subtype": "",
  "personalized_feedback": ""
}

Rules for personalized_feedback:
- Structure: [Behavior observation] + [Emotion acknowledgment] + [Technical hint] + [Emotional support]
- Tone adaptation based on emotion AND behavior:
  * angry + fast typing → "I see you're working quickly through this challenge. [hint]. Take a breath, you've got this!"
  * sad + slow typing → "It's okay to take your time. [hint]. Every step forward counts!"
  * happy + normal typing → "Great energy! [hint]. Keep up the momentum!"
  * neutral + any → Focus on behavior and hint
  
- Behavior observation examples:
  * Fast typing: "Your quick pace shows you're eager to solve this"
  * Slow typing: "Taking a thoughtful approach is smart"
  * High corrections: "I notice you're refining your work carefully"
  * Low corrections: "Your confident keystrokes show good focus"

- Emotion-specific encouragement:
  * angry → Calming: "Take a breath", "One step at a time", "You're closer than you think"
  * sad → Uplifting: "You're doing better than you realize", "Every attempt is progress", "This is how learning happens"
  * happy → Reinforcing: "Great energy!", "Keep that momentum!", "You're on the right track"
  * neutral → Standard: "Keep going!", "You've got this!", "Almost there!"

- Technical hint: Must be specific to the error but not reveal the answer

- Length: 2-3 sentences total"#;

/// Deterministic prompt builder for the feedback pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer;

impl PromptComposer {
    /// Build the prompt for `query`, validating and interpreting `profile`.
    ///
    /// Identical inputs always produce byte-identical output. Examples are
    /// rendered in the order given.
    pub fn compose(
        &self,
        query: &str,
        examples: &[Example],
        profile: &BehavioralProfile,
    ) -> Result<String> {
        let interpreted = interpret(profile)?;
        Ok(self.compose_interpreted(query, examples, profile, &interpreted))
    }

    /// Build the prompt from an already interpreted profile
    pub fn compose_interpreted(
        &self,
        query: &str,
        examples: &[Example],
        profile: &BehavioralProfile,
        interpreted: &InterpretedProfile,
    ) -> String {
        let user_text = render_profile(profile, interpreted);
        let shots = render_examples(examples);

        format!(
            r"
You are an intelligent SQL debugging tutor.

{SCHEMA}
{TAXONOMY}
{USER_BEHAVIOR_RULES}
{SQL_SEMICOLON_RULE}
{user_text}

{TASK_INSTRUCTIONS}

### Few-Shot Examples
{shots}

### New SQL Query
{query}

### JSON Response:
"
        )
    }
}

/// Render the few-shot block, one entry per example in retrieval order
pub fn render_examples(examples: &[Example]) -> String {
    examples
        .iter()
        .enumerate()
        .map(|(i, ex)| {
            format!(
                "### Example {}\nSQL Query: {}\nError Type: {}\nError Subtype: {}\nFeedback: {}\n",
                i + 1,
                ex.query,
                ex.error_type,
                ex.error_subtype,
                ex.feedback
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render raw signals followed by their interpreted bands
pub fn render_profile(profile: &BehavioralProfile, interpreted: &InterpretedProfile) -> String {
    format!(
        "
### User Profile
Typing Speed: {} keys/sec
Flight Time: {} ms
Dwell Time: {} ms
Backspace Rate: {}
Delete Rate: {}
Retry Count: {}
Emotion: {}

### Interpreted Behavior
Pace: {}
Dwell: {}
Flight: {}
Correction Behavior: {} (combined rate {})
",
        number(profile.typing_speed),
        number(profile.avg_flight_time),
        number(profile.avg_dwell_time),
        number(profile.backspace_rate),
        number(profile.delete_rate),
        profile.retry_count,
        profile.emotion,
        interpreted.pace,
        interpreted.dwell,
        interpreted.flight,
        interpreted.correction,
        number(interpreted.correction_rate),
    )
}

/// Shortest round-trip float text, always with a fractional part (`4.0`, `0.01`)
fn number(value: f64) -> String {
    format!("{value:?}")
}
