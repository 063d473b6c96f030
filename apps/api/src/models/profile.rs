use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder the resume extractor uses for every field it could not fill.
pub const NOT_FOUND: &str = "Not Found";

/// Preferred employment type. Known values map to variants; anything else
/// (including the extractor's "Not Found") is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobType {
    FullTime,
    PartTime,
    Internship,
    Contract,
    Remote,
    Other(String),
}

impl JobType {
    pub fn as_str(&self) -> &str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Internship => "Internship",
            JobType::Contract => "Contract",
            JobType::Remote => "Remote",
            JobType::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for JobType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Full-time" => JobType::FullTime,
            "Part-time" => JobType::PartTime,
            "Internship" => JobType::Internship,
            "Contract" => JobType::Contract,
            "Remote" => JobType::Remote,
            _ => JobType::Other(value),
        }
    }
}

impl From<&str> for JobType {
    fn from(value: &str) -> Self {
        JobType::from(value.to_string())
    }
}

impl From<JobType> for String {
    fn from(value: JobType) -> Self {
        match value {
            JobType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user is looking for. Never stored as a record: only hashed into a
/// cache key or rendered into prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub skills: String,
    pub experience: String,
    pub location: String,
    pub job_type: JobType,
}

impl UserProfile {
    pub fn new(
        skills: impl Into<String>,
        experience: impl Into<String>,
        location: impl Into<String>,
        job_type: impl Into<JobType>,
    ) -> Self {
        Self {
            skills: skills.into(),
            experience: experience.into(),
            location: location.into(),
            job_type: job_type.into(),
        }
    }

    /// Sentinel returned when resume extraction fails for any reason.
    pub fn not_found() -> Self {
        Self::new(NOT_FOUND, NOT_FOUND, NOT_FOUND, NOT_FOUND)
    }

    /// One-sentence rendering used as the similarity query and in the
    /// recommendation prompt.
    pub fn describe(&self) -> String {
        format!(
            "{} experience with skills in {}, preferring {} roles in {}.",
            self.experience, self.skills, self.job_type, self.location
        )
    }

    pub fn is_blank(&self) -> bool {
        [
            self.skills.as_str(),
            self.experience.as_str(),
            self.location.as_str(),
            self.job_type.as_str(),
        ]
        .iter()
        .all(|f| f.trim().is_empty())
    }
}
