//! Behavioral profile interpretation.
//!
//! Raw typing signals are mapped onto qualitative bands through one table.
//! Every band is half-open: a value equal to a threshold belongs to the
//! higher band (typing speed 2.1 is "normal pace").

use serde::Serialize;

use crate::errors::FeedbackError;
use crate::errors::Result;
use crate::models::BehavioralProfile;

/// Three ordered bands split by two thresholds
#[derive(Debug, Clone, Copy)]
pub struct BandTable {
    pub signal: &'static str,
    pub thresholds: [f64; 2],
    pub labels: [&'static str; 3],
}

impl BandTable {
    pub fn classify(&self, value: f64) -> &'static str {
        if value < self.thresholds[0] {
            self.labels[0]
        } else if value < self.thresholds[1] {
            self.labels[1]
        } else {
            self.labels[2]
        }
    }
}

pub const TYPING_SPEED_BANDS: BandTable = BandTable {
    signal: "typing_speed",
    thresholds: [2.1, 3.4],
    labels: ["slow and careful", "normal pace", "fast and energetic"],
};

pub const DWELL_TIME_BANDS: BandTable = BandTable {
    signal: "avg_dwell_time",
    thresholds: [90.0, 122.0],
    labels: [
        "quick decisive keypresses",
        "normal dwell time",
        "thoughtful, cautious pressing",
    ],
};

pub const FLIGHT_TIME_BANDS: BandTable = BandTable {
    signal: "avg_flight_time",
    thresholds: [195.0, 380.0],
    labels: [
        "very fast transitions",
        "normal transitions",
        "longer pauses, possible uncertainty",
    ],
};

pub const CORRECTION_RATE_BANDS: BandTable = BandTable {
    signal: "correction_rate",
    thresholds: [0.02, 0.08],
    labels: ["very low", "normal", "high"],
};

/// Qualitative reading of a [`BehavioralProfile`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterpretedProfile {
    pub pace: &'static str,
    pub dwell: &'static str,
    pub flight: &'static str,
    pub correction: &'static str,
    /// backspace_rate + delete_rate, not capped at 1.0
    pub correction_rate: f64,
}

impl InterpretedProfile {
    pub fn labels(&self) -> [&'static str; 4] {
        [self.pace, self.dwell, self.flight, self.correction]
    }
}

/// Classify a profile's typing signals. Pure and deterministic.
pub fn interpret(profile: &BehavioralProfile) -> Result<InterpretedProfile> {
    validate(profile)?;

    let correction_rate = profile.backspace_rate + profile.delete_rate;

    Ok(InterpretedProfile {
        pace: TYPING_SPEED_BANDS.classify(profile.typing_speed),
        dwell: DWELL_TIME_BANDS.classify(profile.avg_dwell_time),
        flight: FLIGHT_TIME_BANDS.classify(profile.avg_flight_time),
        correction: CORRECTION_RATE_BANDS.classify(correction_rate),
        correction_rate,
    })
}

fn validate(profile: &BehavioralProfile) -> Result<()> {
    non_negative("typing_speed", profile.typing_speed)?;
    non_negative("avg_flight_time", profile.avg_flight_time)?;
    non_negative("avg_dwell_time", profile.avg_dwell_time)?;
    unit_interval("backspace_rate", profile.backspace_rate)?;
    unit_interval("delete_rate", profile.delete_rate)?;
    Ok(())
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FeedbackError::InvalidProfile(format!(
            "{field} must be a finite non-negative number, got {value}"
        )))
    }
}

fn unit_interval(field: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FeedbackError::InvalidProfile(format!(
            "{field} must be within [0, 1], got {value}"
        )))
    }
}
