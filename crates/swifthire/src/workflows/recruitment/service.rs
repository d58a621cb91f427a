use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use super::accounts::AccountService;
use super::applications::ApplicationLifecycle;
use super::assistant::{Assistant, CandidateAnalysis, CompletionClient, JobDescriptionBrief, MatchAnalysis};
use super::domain::{Caller, JobId, JobStatus, Role, UserId};
use super::error::RecruitmentError;
use super::jobs::JobLifecycle;
use super::profiles::ProfileService;
use super::repository::RecruitmentStore;
use super::support::SupportDesk;
use super::tier::WorkflowLimits;

#[derive(Debug, Clone, Serialize)]
pub struct AssistantReply {
    pub reply: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDescription {
    pub description: String,
}

/// Entry point wiring every lifecycle manager over one store and one completion client.
pub struct RecruitmentService<S, C> {
    store: Arc<S>,
    limits: WorkflowLimits,
    jobs: Arc<JobLifecycle<S>>,
    applications: ApplicationLifecycle<S>,
    support: SupportDesk<S>,
    accounts: AccountService<S>,
    profiles: ProfileService<S>,
    assistant: Assistant<C>,
}

impl<S, C> RecruitmentService<S, C>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    pub fn new(store: Arc<S>, assistant: Assistant<C>, limits: WorkflowLimits) -> Self {
        let jobs = Arc::new(JobLifecycle::new(store.clone(), limits));
        Self {
            applications: ApplicationLifecycle::new(store.clone(), limits),
            support: SupportDesk::new(store.clone()),
            accounts: AccountService::new(store.clone(), jobs.clone()),
            profiles: ProfileService::new(store.clone()),
            jobs,
            assistant,
            limits,
            store,
        }
    }

    /// Resolves a stored account into the explicit identity every operation takes.
    pub fn caller(&self, user_id: &UserId) -> Result<Caller, RecruitmentError> {
        let user = self
            .store
            .fetch_user(user_id)?
            .ok_or_else(|| RecruitmentError::not_found("User not found."))?;
        Caller::from_user(&user)
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn limits(&self) -> WorkflowLimits {
        self.limits
    }

    pub fn jobs(&self) -> &JobLifecycle<S> {
        &self.jobs
    }

    pub fn applications(&self) -> &ApplicationLifecycle<S> {
        &self.applications
    }

    pub fn support(&self) -> &SupportDesk<S> {
        &self.support
    }

    pub fn accounts(&self) -> &AccountService<S> {
        &self.accounts
    }

    pub fn profiles(&self) -> &ProfileService<S> {
        &self.profiles
    }

    pub async fn seeker_chat(
        &self,
        caller: &Caller,
        message: &str,
    ) -> Result<AssistantReply, RecruitmentError> {
        caller.require_seeker("Only Job Seekers can use the career assistant.")?;
        if !caller.entitlements().ai_features {
            warn!(caller_id = %caller.id, "assistant chat refused for basic tier");
            return Err(RecruitmentError::unauthorized(
                "This feature requires a SwiftHire Premium subscription.",
            ));
        }
        if message.trim().is_empty() {
            return Err(RecruitmentError::validation("Message cannot be empty."));
        }

        Ok(AssistantReply {
            reply: self.assistant.chat(message).await,
        })
    }

    pub async fn generate_job_description(
        &self,
        caller: &Caller,
        brief: JobDescriptionBrief,
    ) -> Result<GeneratedDescription, RecruitmentError> {
        caller.employer_company()?;
        if !caller.entitlements().ai_features {
            return Err(RecruitmentError::unauthorized(
                "Upgrade to Premium to use AI generation.",
            ));
        }
        if brief.title.trim().is_empty() {
            return Err(RecruitmentError::validation("Job title is required."));
        }

        Ok(GeneratedDescription {
            description: self.assistant.job_description(&brief).await,
        })
    }

    /// Scores the calling seeker against an open posting.
    pub async fn match_score(
        &self,
        caller: &Caller,
        job_id: &JobId,
    ) -> Result<MatchAnalysis, RecruitmentError> {
        caller.require_seeker("Only Job Seekers can request a match score.")?;
        if !caller.entitlements().ai_features {
            return Err(RecruitmentError::unauthorized("Premium subscription required"));
        }

        let job = self
            .store
            .fetch_job(job_id)?
            .filter(|job| job.status != JobStatus::OnHold)
            .ok_or_else(|| RecruitmentError::not_found("Job not found."))?;

        let profile = self.profiles.profile(caller)?;
        if profile.completeness < self.limits.match_profile_minimum {
            return Err(RecruitmentError::validation("Profile incomplete"));
        }

        Ok(self
            .assistant
            .match_candidate(&job.description, &profile.summary_text())
            .await)
    }

    /// Recruiter-style summary of a seeker for an employer.
    pub async fn analyze_candidate(
        &self,
        caller: &Caller,
        candidate_id: &UserId,
    ) -> Result<CandidateAnalysis, RecruitmentError> {
        caller.employer_company()?;
        if !caller.entitlements().ai_features {
            return Err(RecruitmentError::unauthorized("Premium required."));
        }

        let candidate = self
            .store
            .fetch_user(candidate_id)?
            .filter(|user| user.role == Role::JobSeeker)
            .ok_or_else(|| RecruitmentError::not_found("Candidate not found."))?;
        let profile = self
            .store
            .fetch_profile(&candidate.id)?
            .ok_or_else(|| RecruitmentError::not_found("Candidate profile not found."))?;

        Ok(self.assistant.analyze_candidate(&profile.summary_text()).await)
    }
}
