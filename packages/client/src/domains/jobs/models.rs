use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::common::{JobId, UserId};

// ============================================================================
// Job Type
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Freelance,
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobType::FullTime => write!(f, "FULL_TIME"),
            JobType::PartTime => write!(f, "PART_TIME"),
            JobType::Contract => write!(f, "CONTRACT"),
            JobType::Freelance => write!(f, "FREELANCE"),
        }
    }
}

impl std::str::FromStr for JobType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace(['-', ' '], "_").as_str() {
            "FULL_TIME" => Ok(JobType::FullTime),
            "PART_TIME" => Ok(JobType::PartTime),
            "CONTRACT" => Ok(JobType::Contract),
            "FREELANCE" => Ok(JobType::Freelance),
            _ => Err(anyhow::anyhow!("Invalid job type: {}", s)),
        }
    }
}

// ============================================================================
// Job Model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct Job {
    #[builder(default)]
    pub id: JobId,

    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub salary: String,

    #[builder(default)]
    pub requirements: Vec<String>,

    pub posted_by: UserId,
    #[builder(default = Utc::now())]
    pub posted_date: DateTime<Utc>,

    #[serde(rename = "type")]
    #[builder(default)]
    pub job_type: JobType,
}

impl Job {
    /// Split free-form requirement text into one requirement per line.
    ///
    /// Lines are trimmed and blank lines dropped.
    pub fn parse_requirements(text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Newest posting first.
pub fn sort_jobs(jobs: &mut [Job]) {
    jobs.sort_by(|a, b| b.posted_date.cmp(&a.posted_date));
}

// ============================================================================
// Job Filter
// ============================================================================

/// Search text plus optional job type, as entered on the job board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobFilter {
    pub query: String,
    pub job_type: Option<JobType>,
}

impl JobFilter {
    /// Case-insensitive match of the query against title, company, or
    /// location, combined with the type filter.
    pub fn matches(&self, job: &Job) -> bool {
        let query = self.query.trim().to_lowercase();
        let text_matches = query.is_empty()
            || [&job.title, &job.company, &job.location]
                .iter()
                .any(|field| field.to_lowercase().contains(&query));
        let type_matches = self.job_type.map_or(true, |t| t == job.job_type);
        text_matches && type_matches
    }

    pub fn apply<'a>(&self, jobs: &'a [Job]) -> Vec<&'a Job> {
        jobs.iter().filter(|job| self.matches(job)).collect()
    }
}
