use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    Application, ApplicationId, JobId, JobPosting, JobStatus, Role, User, UserId,
};
use super::profile::SeekerProfile;
use super::repository::{
    ApplicationRepository, CandidateSearch, JobListing, JobRepository, JobSearch,
    ProfileRepository, RecruitmentStore, RepositoryError, UserRepository, WriteBatch,
};

#[derive(Default)]
struct StoreState {
    users: HashMap<UserId, User>,
    jobs: HashMap<JobId, JobPosting>,
    applications: HashMap<ApplicationId, Application>,
    profiles: HashMap<UserId, SeekerProfile>,
}

/// Process-local store. A single lock keeps cascading deletes atomic.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl UserRepository for InMemoryStore {
    fn insert_user(&self, user: User) -> Result<User, RepositoryError> {
        let mut guard = self.state()?;
        let duplicate = guard.users.values().any(|existing| {
            existing.id == user.id
                || existing.username.eq_ignore_ascii_case(&user.username)
                || existing.email.eq_ignore_ascii_case(&user.email)
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn update_user(&self, user: User) -> Result<(), RepositoryError> {
        let mut guard = self.state()?;
        match guard.users.get_mut(&user.id) {
            Some(slot) => {
                *slot = user;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.state()?.users.get(id).cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let guard = self.state()?;
        Ok(guard
            .users
            .values()
            .find(|user| user.username.eq_ignore_ascii_case(username.trim()))
            .cloned())
    }

    fn login_taken(&self, username: &str, email: &str) -> Result<bool, RepositoryError> {
        let guard = self.state()?;
        Ok(guard.users.values().any(|user| {
            user.username.eq_ignore_ascii_case(username.trim())
                || user.email.eq_ignore_ascii_case(email.trim())
        }))
    }

    fn users_by_role(&self, role: Role) -> Result<Vec<User>, RepositoryError> {
        let guard = self.state()?;
        let mut users: Vec<User> = guard
            .users
            .values()
            .filter(|user| user.role == role)
            .cloned()
            .collect();
        users.sort_by(|left, right| left.created_at.cmp(&right.created_at));
        Ok(users)
    }
}

impl JobRepository for InMemoryStore {
    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError> {
        let mut guard = self.state()?;
        if guard.jobs.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    fn update_job(&self, job: JobPosting) -> Result<(), RepositoryError> {
        let mut guard = self.state()?;
        match guard.jobs.get_mut(&job.id) {
            Some(slot) => {
                *slot = job;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        Ok(self.state()?.jobs.get(id).cloned())
    }

    fn jobs_by_employer(&self, employer: &UserId) -> Result<Vec<JobPosting>, RepositoryError> {
        let guard = self.state()?;
        let mut jobs: Vec<JobPosting> = guard
            .jobs
            .values()
            .filter(|job| &job.employer_id == employer)
            .cloned()
            .collect();
        jobs.sort_by(|left, right| right.posted_at.cmp(&left.posted_at));
        Ok(jobs)
    }

    fn jobs_by_status(&self, status: JobStatus) -> Result<Vec<JobPosting>, RepositoryError> {
        let guard = self.state()?;
        let mut jobs: Vec<JobPosting> = guard
            .jobs
            .values()
            .filter(|job| job.status == status)
            .cloned()
            .collect();
        jobs.sort_by(JobSearch::order);
        Ok(jobs)
    }

    fn search_jobs(&self, criteria: &JobSearch) -> Result<Vec<JobListing>, RepositoryError> {
        let guard = self.state()?;
        let mut jobs: Vec<JobListing> = guard
            .jobs
            .values()
            .filter_map(|job| {
                let company_name = guard
                    .users
                    .get(&job.employer_id)
                    .and_then(User::company_name)
                    .unwrap_or_default();
                criteria.matches(job, company_name).then(|| JobListing {
                    job: job.clone(),
                    company_name: company_name.to_string(),
                })
            })
            .collect();
        jobs.sort_by(|left, right| JobSearch::order(&left.job, &right.job));
        Ok(jobs)
    }
}

impl ApplicationRepository for InMemoryStore {
    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut guard = self.state()?;
        let duplicate = guard.applications.values().any(|existing| {
            existing.id == application.id
                || (existing.seeker_id == application.seeker_id
                    && existing.job_id == application.job_id)
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard
            .applications
            .insert(application.id, application.clone());
        Ok(application)
    }

    fn update_application(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = self.state()?;
        match guard.applications.get_mut(&application.id) {
            Some(slot) => {
                *slot = application;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        Ok(self.state()?.applications.get(id).cloned())
    }

    fn find_application(
        &self,
        seeker: &UserId,
        job: &JobId,
    ) -> Result<Option<Application>, RepositoryError> {
        let guard = self.state()?;
        Ok(guard
            .applications
            .values()
            .find(|application| &application.seeker_id == seeker && &application.job_id == job)
            .cloned())
    }

    fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.state()?;
        let mut applications: Vec<Application> = guard
            .applications
            .values()
            .filter(|application| &application.job_id == job)
            .cloned()
            .collect();
        applications.sort_by(|left, right| left.applied_at.cmp(&right.applied_at));
        Ok(applications)
    }

    fn applications_for_seeker(
        &self,
        seeker: &UserId,
    ) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.state()?;
        let mut applications: Vec<Application> = guard
            .applications
            .values()
            .filter(|application| &application.seeker_id == seeker)
            .cloned()
            .collect();
        applications.sort_by(|left, right| right.applied_at.cmp(&left.applied_at));
        Ok(applications)
    }

    fn all_applications(&self) -> Result<Vec<Application>, RepositoryError> {
        Ok(self.state()?.applications.values().cloned().collect())
    }
}

impl ProfileRepository for InMemoryStore {
    fn save_profile(&self, profile: SeekerProfile) -> Result<(), RepositoryError> {
        let mut guard = self.state()?;
        guard.profiles.insert(profile.user_id, profile);
        Ok(())
    }

    fn fetch_profile(&self, user: &UserId) -> Result<Option<SeekerProfile>, RepositoryError> {
        Ok(self.state()?.profiles.get(user).cloned())
    }

    fn delete_profile(&self, user: &UserId) -> Result<(), RepositoryError> {
        self.state()?.profiles.remove(user);
        Ok(())
    }

    fn search_candidates(
        &self,
        criteria: &CandidateSearch,
    ) -> Result<Vec<SeekerProfile>, RepositoryError> {
        let guard = self.state()?;
        let mut profiles: Vec<SeekerProfile> = guard
            .profiles
            .values()
            .filter(|profile| criteria.matches(profile))
            .cloned()
            .collect();
        profiles.sort_by(CandidateSearch::order);
        Ok(profiles)
    }
}

impl RecruitmentStore for InMemoryStore {
    fn delete_job_cascade(&self, job: &JobId) -> Result<usize, RepositoryError> {
        let mut guard = self.state()?;
        if !guard.jobs.contains_key(job) {
            return Err(RepositoryError::NotFound);
        }
        let before = guard.applications.len();
        guard
            .applications
            .retain(|_, application| &application.job_id != job);
        let removed = before - guard.applications.len();
        guard.jobs.remove(job);
        Ok(removed)
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), RepositoryError> {
        let mut guard = self.state()?;
        let known = batch.users.iter().all(|user| guard.users.contains_key(&user.id))
            && batch.jobs.iter().all(|job| guard.jobs.contains_key(&job.id));
        if !known {
            return Err(RepositoryError::NotFound);
        }

        for user in batch.users {
            guard.users.insert(user.id, user);
        }
        for job in batch.jobs {
            guard.jobs.insert(job.id, job);
        }
        for profile in batch.profiles {
            guard.profiles.insert(profile.user_id, profile);
        }
        Ok(())
    }
}
