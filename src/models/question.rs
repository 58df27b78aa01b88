use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub week_number: Option<u32>,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub text: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub model_answer: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "foundational" | "easy" => Ok(Difficulty::Beginner),
            "intermediate" | "application" | "medium" => Ok(Difficulty::Intermediate),
            "advanced" | "deep dive" | "deep_dive" | "hard" => Ok(Difficulty::Advanced),
            other => Err(format!("Unknown difficulty: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    #[default]
    Entry,
    Experienced,
}

/// Target share of each difficulty for one experience level.
///
/// Beginner is never rounded on its own: it takes whatever is left of a week's
/// quota once intermediate and advanced targets are fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyRatioProfile {
    pub beginner: f64,
    pub intermediate: f64,
    pub advanced: f64,
}

impl ExperienceLevel {
    pub fn ratio_profile(&self) -> DifficultyRatioProfile {
        match self {
            ExperienceLevel::Entry => DifficultyRatioProfile {
                beginner: 0.5,
                intermediate: 0.35,
                advanced: 0.15,
            },
            ExperienceLevel::Experienced => DifficultyRatioProfile {
                beginner: 0.2,
                intermediate: 0.4,
                advanced: 0.4,
            },
        }
    }
}
