use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    validate_salary_range, ApplicationStatus, Caller, JobDraft, JobEdit, JobId, JobPosting,
    JobStatus, Role, UserId,
};
use super::error::RecruitmentError;
use super::notices;
use super::repository::{JobListing, JobSearch, RecruitmentStore, WriteBatch};
use super::tier::WorkflowLimits;

const JOB_NOT_FOUND: &str = "Job not found.";
const MIN_SUGGESTION_QUERY: usize = 3;

/// Result of posting a job. A held posting is saved but not submitted for review.
#[derive(Debug, Clone, Serialize)]
pub struct PostedJob {
    pub job: JobPosting,
    pub held: bool,
    pub notice: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDecision {
    pub job: JobPosting,
    pub notice: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReleasedJobs {
    pub released: usize,
    pub notice: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedJob {
    pub job_id: JobId,
    pub removed_applications: usize,
    pub notice: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployerJobSummary {
    #[serde(flatten)]
    pub job: JobPosting,
    pub applicant_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployerOverview {
    pub jobs: Vec<EmployerJobSummary>,
    pub job_counts: BTreeMap<&'static str, usize>,
    pub application_counts: BTreeMap<&'static str, usize>,
    pub can_release_held: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyActivity {
    pub new_jobs: usize,
    pub new_seekers: usize,
    pub new_employers: usize,
    pub new_applications: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    pub pending_jobs: Vec<JobPosting>,
    pub active_jobs: Vec<JobPosting>,
    pub users_by_role: BTreeMap<&'static str, usize>,
    pub this_month: MonthlyActivity,
}

/// Moderation, activation, and hold rules for job postings.
pub struct JobLifecycle<S> {
    store: Arc<S>,
    limits: WorkflowLimits,
}

impl<S> JobLifecycle<S>
where
    S: RecruitmentStore + 'static,
{
    pub fn new(store: Arc<S>, limits: WorkflowLimits) -> Self {
        Self { store, limits }
    }

    pub fn post(&self, caller: &Caller, draft: JobDraft) -> Result<PostedJob, RecruitmentError> {
        let company = caller.employer_company().map_err(|_| {
            RecruitmentError::unauthorized(
                "Cannot post job: Your account is not associated with a company.",
            )
        })?;
        if draft.title.trim().is_empty() {
            return Err(RecruitmentError::validation("Job title is required."));
        }
        validate_salary_range(draft.salary_min, draft.salary_max)?;

        let entitlements = caller.entitlements();
        let open_postings = self
            .store
            .jobs_by_employer(&caller.id)?
            .iter()
            .filter(|job| job.status.counts_toward_cap())
            .count();
        let held = self.limits.job_cap_reached(entitlements, open_postings);
        let status = if held {
            JobStatus::OnHold
        } else {
            JobStatus::PendingAdmin
        };

        let job = JobPosting::from_draft(caller.id, draft, status, entitlements.featured_listing);
        let job = self.store.insert_job(job)?;

        let notice = if held {
            warn!(job_id = %job.id, company, open_postings, "job placed on hold at basic cap");
            notices::held_job_notice(self.limits.basic_job_post_cap)
        } else {
            info!(job_id = %job.id, company, "job submitted for approval");
            notices::JOB_SUBMITTED.to_string()
        };

        Ok(PostedJob { job, held, notice })
    }

    pub fn approve(&self, caller: &Caller, job_id: &JobId) -> Result<JobDecision, RecruitmentError> {
        caller.require_admin()?;
        let mut job = self
            .store
            .fetch_job(job_id)?
            .ok_or_else(|| RecruitmentError::not_found(JOB_NOT_FOUND))?;

        match job.status {
            JobStatus::PendingAdmin => {
                job.status = JobStatus::Active;
                job.updated_at = Utc::now();
                self.store.update_job(job.clone())?;
                info!(job_id = %job.id, "job approved");
            }
            JobStatus::Active => {}
            JobStatus::OnHold => {
                return Err(RecruitmentError::validation(
                    "Held jobs must be released by the employer before approval.",
                ))
            }
        }

        let notice = format!("Job ID {} approved and set to ACTIVE.", job.id);
        Ok(JobDecision { job, notice })
    }

    /// Manual release by a paid employer.
    pub fn release_held(&self, caller: &Caller) -> Result<ReleasedJobs, RecruitmentError> {
        caller.employer_company()?;
        if !caller.tier.is_paid() {
            return Err(RecruitmentError::unauthorized(
                "You must be Premium to release held jobs.",
            ));
        }

        let released = self.held_jobs_released(&caller.id)?;
        let count = released.len();
        self.store.commit(WriteBatch {
            jobs: released,
            ..WriteBatch::default()
        })?;
        if count > 0 {
            info!(employer_id = %caller.id, released = count, "held jobs released for approval");
        }
        Ok(ReleasedJobs {
            released: count,
            notice: format!("Successfully released {count} jobs!"),
        })
    }

    /// Every ON_HOLD posting of the employer, moved to PENDING_ADMIN and featured.
    /// Nothing is written; callers commit the postings with their own changes.
    pub(crate) fn held_jobs_released(
        &self,
        employer: &UserId,
    ) -> Result<Vec<JobPosting>, RecruitmentError> {
        let now = Utc::now();
        Ok(self
            .store
            .jobs_by_employer(employer)?
            .into_iter()
            .filter(|job| job.status == JobStatus::OnHold)
            .map(|mut job| {
                job.status = JobStatus::PendingAdmin;
                job.featured = true;
                job.updated_at = now;
                job
            })
            .collect())
    }

    pub fn delete(&self, caller: &Caller, job_id: &JobId) -> Result<DeletedJob, RecruitmentError> {
        caller.require_admin()?;
        if self.store.fetch_job(job_id)?.is_none() {
            return Err(RecruitmentError::not_found(JOB_NOT_FOUND));
        }

        let removed_applications = self.store.delete_job_cascade(job_id)?;
        info!(job_id = %job_id, removed_applications, "job deleted");

        Ok(DeletedJob {
            job_id: *job_id,
            removed_applications,
            notice: format!("Job ID {job_id} and all its applications successfully deleted."),
        })
    }

    pub fn edit(
        &self,
        caller: &Caller,
        job_id: &JobId,
        edit: JobEdit,
    ) -> Result<JobPosting, RecruitmentError> {
        caller.require_admin()?;
        let mut job = self
            .store
            .fetch_job(job_id)?
            .ok_or_else(|| RecruitmentError::not_found(JOB_NOT_FOUND))?;

        if edit
            .title
            .as_deref()
            .is_some_and(|title| title.trim().is_empty())
        {
            return Err(RecruitmentError::validation("Job title is required."));
        }
        validate_salary_range(
            edit.salary_min.or(job.salary_min),
            edit.salary_max.or(job.salary_max),
        )?;

        job.apply_edit(edit);
        self.store.update_job(job.clone())?;
        Ok(job)
    }

    pub fn search(&self, criteria: &JobSearch) -> Result<Vec<JobListing>, RecruitmentError> {
        Ok(self.store.search_jobs(criteria)?)
    }

    /// Distinct ACTIVE titles containing the query. Short queries return nothing.
    pub fn suggest_titles(&self, query: &str) -> Result<Vec<String>, RecruitmentError> {
        let query = query.trim();
        if query.chars().count() < MIN_SUGGESTION_QUERY {
            return Ok(Vec::new());
        }

        let needle = query.to_lowercase();
        let titles: BTreeSet<String> = self
            .store
            .jobs_by_status(JobStatus::Active)?
            .into_iter()
            .filter(|job| job.title.to_lowercase().contains(&needle))
            .map(|job| job.title)
            .collect();
        Ok(titles.into_iter().collect())
    }

    /// Active postings found by a keyword built from the seeker's skills and current title.
    /// Location, category, and job-type filters from `criteria` still apply.
    pub fn recommended(
        &self,
        caller: &Caller,
        criteria: &JobSearch,
    ) -> Result<Vec<JobListing>, RecruitmentError> {
        caller.require_seeker("Recommendations are available to job seekers.")?;
        if !caller.tier.is_paid() {
            return Err(RecruitmentError::unauthorized(
                "Recommended jobs require a Premium subscription.",
            ));
        }

        let profile = self.store.fetch_profile(&caller.id)?;
        let threshold = self.limits.profile_completion_threshold;
        let Some(profile) = profile.filter(|profile| profile.completeness >= threshold) else {
            return Err(RecruitmentError::validation(format!(
                "Complete at least {threshold}% of your profile to unlock recommendations."
            )));
        };

        let keyword = recommendation_keyword(
            profile.skills.as_deref().unwrap_or_default(),
            profile.current_title.as_deref().unwrap_or_default(),
        );
        let search = JobSearch {
            keyword: Some(keyword),
            ..criteria.clone()
        };
        Ok(self.store.search_jobs(&search)?)
    }

    /// Public detail view. Only ACTIVE and PENDING_ADMIN postings are visible.
    pub fn view(&self, job_id: &JobId) -> Result<JobListing, RecruitmentError> {
        let job = self
            .store
            .fetch_job(job_id)?
            .filter(|job| matches!(job.status, JobStatus::Active | JobStatus::PendingAdmin))
            .ok_or_else(|| RecruitmentError::not_found("Job not found or is no longer active."))?;

        let company_name = self
            .store
            .fetch_user(&job.employer_id)?
            .and_then(|owner| owner.company.map(|company| company.name))
            .unwrap_or_default();
        Ok(JobListing { job, company_name })
    }

    pub fn employer_overview(
        &self,
        caller: &Caller,
        status: Option<JobStatus>,
    ) -> Result<EmployerOverview, RecruitmentError> {
        caller.employer_company()?;
        let jobs = self.store.jobs_by_employer(&caller.id)?;

        let mut job_counts: BTreeMap<&'static str, usize> =
            JobStatus::ALL.iter().map(|status| (status.label(), 0)).collect();
        let mut application_counts: BTreeMap<&'static str, usize> = ApplicationStatus::ALL
            .iter()
            .map(|status| (status.label(), 0))
            .collect();

        let mut summaries = Vec::new();
        for job in jobs {
            *job_counts.entry(job.status.label()).or_default() += 1;
            let applications = self.store.applications_for_job(&job.id)?;
            for application in &applications {
                *application_counts
                    .entry(application.status.label())
                    .or_default() += 1;
            }
            if status.map_or(true, |wanted| wanted == job.status) {
                summaries.push(EmployerJobSummary {
                    applicant_count: applications.len(),
                    job,
                });
            }
        }

        let can_release_held = caller.tier.is_paid()
            && job_counts
                .get(JobStatus::OnHold.label())
                .is_some_and(|held| *held > 0);

        Ok(EmployerOverview {
            jobs: summaries,
            job_counts,
            application_counts,
            can_release_held,
        })
    }

    pub fn admin_overview(
        &self,
        caller: &Caller,
        now: DateTime<Utc>,
    ) -> Result<AdminOverview, RecruitmentError> {
        caller.require_admin()?;
        let same_month =
            |at: DateTime<Utc>| at.year() == now.year() && at.month() == now.month();

        let pending_jobs = self.store.jobs_by_status(JobStatus::PendingAdmin)?;
        let active_jobs = self.store.jobs_by_status(JobStatus::Active)?;
        let held_jobs = self.store.jobs_by_status(JobStatus::OnHold)?;

        let mut users_by_role = BTreeMap::new();
        let mut new_users: HashMap<Role, usize> = HashMap::new();
        for role in [Role::Admin, Role::Employer, Role::JobSeeker] {
            let users = self.store.users_by_role(role)?;
            users_by_role.insert(role.label(), users.len());
            new_users.insert(
                role,
                users.iter().filter(|user| same_month(user.created_at)).count(),
            );
        }

        let new_jobs = pending_jobs
            .iter()
            .chain(active_jobs.iter())
            .chain(held_jobs.iter())
            .filter(|job| same_month(job.posted_at))
            .count();
        let new_applications = self
            .store
            .all_applications()?
            .iter()
            .filter(|application| same_month(application.applied_at))
            .count();

        Ok(AdminOverview {
            pending_jobs,
            active_jobs,
            users_by_role,
            this_month: MonthlyActivity {
                new_jobs,
                new_seekers: new_users.get(&Role::JobSeeker).copied().unwrap_or_default(),
                new_employers: new_users.get(&Role::Employer).copied().unwrap_or_default(),
                new_applications,
            },
        })
    }
}

/// Skills and title joined by a space, trimmed, keeping only ASCII letters, digits, commas, and spaces.
pub(crate) fn recommendation_keyword(skills: &str, title: &str) -> String {
    format!("{skills} {title}")
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ',' || *c == ' ')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::recommendation_keyword;

    #[test]
    fn recommendation_keyword_strips_punctuation() {
        assert_eq!(
            recommendation_keyword("Rust, C++; Tokio", "Backend-Engineer"),
            "Rust, C Tokio BackendEngineer"
        );
        assert_eq!(recommendation_keyword("", "Acme"), "Acme");
    }
}
