use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::domain::{
    Application, ApplicationId, JobId, JobPosting, JobStatus, Role, User, UserId,
};
use super::profile::SeekerProfile;

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Account storage. Usernames and emails are unique.
pub trait UserRepository: Send + Sync {
    fn insert_user(&self, user: User) -> Result<User, RepositoryError>;
    fn update_user(&self, user: User) -> Result<(), RepositoryError>;
    fn fetch_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;
    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    fn login_taken(&self, username: &str, email: &str) -> Result<bool, RepositoryError>;
    fn users_by_role(&self, role: Role) -> Result<Vec<User>, RepositoryError>;
}

pub trait JobRepository: Send + Sync {
    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError>;
    fn update_job(&self, job: JobPosting) -> Result<(), RepositoryError>;
    fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError>;
    fn jobs_by_employer(&self, employer: &UserId) -> Result<Vec<JobPosting>, RepositoryError>;
    fn jobs_by_status(&self, status: JobStatus) -> Result<Vec<JobPosting>, RepositoryError>;
    /// ACTIVE postings matching the criteria, ordered by [`JobSearch::order`].
    fn search_jobs(&self, criteria: &JobSearch) -> Result<Vec<JobListing>, RepositoryError>;
}

/// Application storage. At most one application exists per (seeker, job) pair;
/// a second insert for the same pair is a [`RepositoryError::Conflict`].
pub trait ApplicationRepository: Send + Sync {
    fn insert_application(&self, application: Application)
        -> Result<Application, RepositoryError>;
    fn update_application(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError>;
    fn find_application(
        &self,
        seeker: &UserId,
        job: &JobId,
    ) -> Result<Option<Application>, RepositoryError>;
    fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, RepositoryError>;
    fn applications_for_seeker(&self, seeker: &UserId)
        -> Result<Vec<Application>, RepositoryError>;
    fn all_applications(&self) -> Result<Vec<Application>, RepositoryError>;
}

pub trait ProfileRepository: Send + Sync {
    /// Inserts or replaces the profile keyed by its user id.
    fn save_profile(&self, profile: SeekerProfile) -> Result<(), RepositoryError>;
    fn fetch_profile(&self, user: &UserId) -> Result<Option<SeekerProfile>, RepositoryError>;
    fn delete_profile(&self, user: &UserId) -> Result<(), RepositoryError>;
    /// Profiles matching the criteria, ordered by [`CandidateSearch::order`].
    fn search_candidates(
        &self,
        criteria: &CandidateSearch,
    ) -> Result<Vec<SeekerProfile>, RepositoryError>;
}

/// Full store contract used by the lifecycle managers.
pub trait RecruitmentStore:
    UserRepository + JobRepository + ApplicationRepository + ProfileRepository
{
    /// Removes every application referencing the job, then the job, as one unit.
    /// Returns the number of applications removed. On error nothing is removed.
    fn delete_job_cascade(&self, job: &JobId) -> Result<usize, RepositoryError>;

    /// Writes every record in the batch as one unit. On error nothing is written.
    fn commit(&self, batch: WriteBatch) -> Result<(), RepositoryError>;
}

/// Updates that must land together. Users and jobs must already exist;
/// profiles are inserted or replaced.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    pub users: Vec<User>,
    pub jobs: Vec<JobPosting>,
    pub profiles: Vec<SeekerProfile>,
}

impl WriteBatch {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.jobs.is_empty() && self.profiles.is_empty()
    }
}

/// Posting joined with the owning employer's company name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobListing {
    #[serde(flatten)]
    pub job: JobPosting,
    pub company_name: String,
}

/// Filters over ACTIVE postings. Blank values impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JobSearch {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub job_types: Vec<String>,
}

const ANY_CATEGORY: &str = "All Categories";

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn constraint(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl JobSearch {
    pub fn matches(&self, job: &JobPosting, company_name: &str) -> bool {
        if job.status != JobStatus::Active {
            return false;
        }

        if let Some(keyword) = constraint(&self.keyword) {
            if !contains_ci(&job.title, keyword) && !contains_ci(company_name, keyword) {
                return false;
            }
        }

        if let Some(location) = constraint(&self.location) {
            let city = job.location_city.as_deref().unwrap_or_default();
            if !contains_ci(city, location) {
                return false;
            }
        }

        if let Some(category) = constraint(&self.category) {
            if !category.eq_ignore_ascii_case(ANY_CATEGORY)
                && !job
                    .category
                    .as_deref()
                    .is_some_and(|value| value.eq_ignore_ascii_case(category))
            {
                return false;
            }
        }

        let wanted: Vec<&str> = self
            .job_types
            .iter()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .collect();
        if !wanted.is_empty() {
            let job_type = job.job_type.as_deref().unwrap_or_default();
            if !wanted.iter().any(|value| value.eq_ignore_ascii_case(job_type)) {
                return false;
            }
        }

        true
    }

    /// Featured first, then newest first.
    pub fn order(left: &JobPosting, right: &JobPosting) -> Ordering {
        right
            .featured
            .cmp(&left.featured)
            .then_with(|| right.posted_at.cmp(&left.posted_at))
    }
}

/// Employer-side candidate filters. Only honored for tiers with search filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CandidateSearch {
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl CandidateSearch {
    pub fn is_unfiltered(&self) -> bool {
        constraint(&self.skills).is_none()
            && constraint(&self.city).is_none()
            && constraint(&self.title).is_none()
    }

    pub fn matches(&self, profile: &SeekerProfile) -> bool {
        let checks = [
            (constraint(&self.skills), profile.skills.as_deref()),
            (constraint(&self.city), profile.city.as_deref()),
            (constraint(&self.title), profile.current_title.as_deref()),
        ];

        checks.iter().all(|(wanted, actual)| match wanted {
            Some(wanted) => actual.is_some_and(|actual| contains_ci(actual, wanted)),
            None => true,
        })
    }

    /// Featured first, then most recently created.
    pub fn order(left: &SeekerProfile, right: &SeekerProfile) -> Ordering {
        right
            .featured
            .cmp(&left.featured)
            .then_with(|| right.created_at.cmp(&left.created_at))
    }
}
