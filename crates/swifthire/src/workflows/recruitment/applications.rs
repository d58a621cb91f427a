use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, Caller, CallerKind, ExamRecord, JobId,
    JobPosting, JobStatus, OfferDetails, Role, User, UserId,
};
use super::error::RecruitmentError;
use super::messaging::Message;
use super::notices;
use super::repository::{RecruitmentStore, RepositoryError};
use super::tier::WorkflowLimits;

const APPLICATION_NOT_FOUND: &str = "Application not found.";
const NOT_YOUR_APPLICATION: &str = "You are not authorized to manage this application.";
const DEFAULT_COMPANY: &str = "our team";

/// Employer request to attach an exam to an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamAssignment {
    pub questions: Value,
    #[serde(default)]
    pub answers_template: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicantView {
    pub application: Application,
    pub seeker_name: String,
    pub seeker_email: String,
    pub completeness: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackedApplication {
    pub application: Application,
    pub job_title: String,
    pub company_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeekerTracker {
    pub applications: Vec<TrackedApplication>,
    pub active_count: usize,
    pub limit_reached: bool,
}

/// Application, posting, and employer company resolved for an employer-side mutation.
struct EmployerScope {
    application: Application,
    job: JobPosting,
    company: String,
}

/// Review states, exam and offer sub-flows, and per-application messaging.
pub struct ApplicationLifecycle<S> {
    store: Arc<S>,
    limits: WorkflowLimits,
}

impl<S> ApplicationLifecycle<S>
where
    S: RecruitmentStore + 'static,
{
    pub fn new(store: Arc<S>, limits: WorkflowLimits) -> Self {
        Self { store, limits }
    }

    /// Guards run in a fixed order; the first failing guard decides the message.
    pub fn apply(&self, caller: &Caller, job_id: &JobId) -> Result<Application, RecruitmentError> {
        caller.require_seeker("Only Job Seekers can apply for jobs.")?;

        let job = self
            .store
            .fetch_job(job_id)?
            .filter(|job| job.status == JobStatus::Active)
            .ok_or_else(|| RecruitmentError::not_found("Job not found or is no longer active."))?;

        let completeness = self
            .store
            .fetch_profile(&caller.id)?
            .map(|profile| profile.completeness)
            .unwrap_or_default();
        let threshold = self.limits.profile_completion_threshold;
        if completeness < threshold {
            return Err(RecruitmentError::validation(format!(
                "Your profile is incomplete! Please update your profile to at least {threshold}% to apply."
            )));
        }

        if self.store.find_application(&caller.id, job_id)?.is_some() {
            return Err(already_applied());
        }

        let active = self
            .store
            .applications_for_seeker(&caller.id)?
            .iter()
            .filter(|application| application.status.is_active())
            .count();
        if self
            .limits
            .application_cap_reached(caller.entitlements(), active)
        {
            return Err(RecruitmentError::validation(format!(
                "Application Limit Reached! You have {active} active applications. Upgrade to Premium for unlimited."
            )));
        }

        let company = self
            .company_of(&job.employer_id)?
            .unwrap_or_else(|| DEFAULT_COMPANY.to_string());
        let mut application = Application::new(caller.id, job.id, ApplicationStatus::Applied);
        application.messages.append(Message::hiring_team(
            job.employer_id,
            &company,
            notices::application_receipt(&caller.first_name, &job.title, &company),
        ))?;

        let application = match self.store.insert_application(application) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(already_applied()),
            Err(other) => return Err(other.into()),
        };

        info!(application_id = %application.id, job_id = %job.id, "application submitted");
        Ok(application)
    }

    pub fn assign_exam(
        &self,
        caller: &Caller,
        application_id: &ApplicationId,
        assignment: ExamAssignment,
    ) -> Result<Application, RecruitmentError> {
        let EmployerScope {
            mut application, ..
        } = self.employer_scope(caller, application_id)?;

        if is_blank(&assignment.questions) {
            return Err(RecruitmentError::validation("Exam questions cannot be empty."));
        }
        if !application.status.is_active() {
            return Err(RecruitmentError::validation(
                "Exams can only be assigned to open applications.",
            ));
        }

        application.exam = Some(ExamRecord {
            questions: assignment.questions,
            answers: assignment.answers_template,
            submitted: false,
            score: 0,
        });
        application.touch();
        self.store.update_application(application.clone())?;

        info!(application_id = %application.id, "exam assigned");
        Ok(application)
    }

    /// Accepts the seeker's answers once. A submitted exam is final regardless of payload.
    pub fn submit_exam(
        &self,
        caller: &Caller,
        application_id: &ApplicationId,
        answers: &str,
    ) -> Result<Application, RecruitmentError> {
        let mut application = self.seeker_scope(caller, application_id)?;

        let exam = application.exam.as_mut().ok_or_else(|| {
            RecruitmentError::validation("No exam has been assigned to this application.")
        })?;
        if exam.submitted {
            warn!(application_id = %application_id, "exam resubmission refused");
            return Err(RecruitmentError::validation("Exam already submitted."));
        }
        if answers.trim().is_empty() {
            return Err(RecruitmentError::validation("Answers cannot be empty."));
        }

        let parsed: Vec<serde_json::Map<String, Value>> = serde_json::from_str(answers)
            .map_err(|_| {
                RecruitmentError::validation(
                    "Exam answers must be a JSON list of answer objects.",
                )
            })?;

        exam.answers = Some(Value::Array(parsed.into_iter().map(Value::Object).collect()));
        exam.submitted = true;

        if application.status.is_active() {
            application.status = ApplicationStatus::Reviewed;
        }
        application.messages.append(Message::new(
            Some(caller.id),
            caller.first_name.as_str(),
            caller.last_name.as_str(),
            caller.sender_role(),
            notices::EXAM_SUBMITTED,
        ))?;
        application.touch();
        self.store.update_application(application.clone())?;

        info!(application_id = %application.id, "exam submitted");
        Ok(application)
    }

    pub fn score_exam(
        &self,
        caller: &Caller,
        application_id: &ApplicationId,
        score: u8,
    ) -> Result<Application, RecruitmentError> {
        let EmployerScope {
            mut application, ..
        } = self.employer_scope(caller, application_id)?;

        if score > 100 {
            return Err(RecruitmentError::validation(
                "Exam score must be between 0 and 100.",
            ));
        }
        match application.exam.as_mut() {
            Some(exam) if exam.submitted => exam.score = score,
            _ => {
                return Err(RecruitmentError::validation(
                    "Cannot score unsubmitted exam.",
                ))
            }
        }

        application.touch();
        self.store.update_application(application.clone())?;
        Ok(application)
    }

    pub fn update_status(
        &self,
        caller: &Caller,
        application_id: &ApplicationId,
        next: ApplicationStatus,
    ) -> Result<Application, RecruitmentError> {
        let EmployerScope {
            mut application,
            job,
            company,
        } = self.employer_scope(caller, application_id)?;

        if next == ApplicationStatus::Hired {
            return Err(RecruitmentError::validation(
                "Cannot set status to HIRED manually without sending a final Job Offer first.",
            ));
        }
        if next == ApplicationStatus::Accepted && application.exam_outstanding() {
            return Err(RecruitmentError::validation(
                "Cannot accept: The applicant has not yet submitted the required exam.",
            ));
        }
        if !application.status.can_transition_to(next) {
            return Err(RecruitmentError::validation(format!(
                "Cannot move an application from {} to {}.",
                application.status.label(),
                next.label()
            )));
        }

        let previous = application.status;
        application.status = next;
        if let Some(body) = notices::status_notice(next, &job.title, &company) {
            application
                .messages
                .append(Message::hiring_team(caller.id, &company, body))?;
        }
        application.touch();
        self.store.update_application(application.clone())?;

        info!(
            application_id = %application.id,
            from = previous.label(),
            to = next.label(),
            "application status changed"
        );
        Ok(application)
    }

    /// Records the final offer and moves the application to HIRED.
    pub fn send_offer(
        &self,
        caller: &Caller,
        application_id: &ApplicationId,
        offer: OfferDetails,
    ) -> Result<Application, RecruitmentError> {
        let EmployerScope {
            mut application,
            job,
            company,
        } = self.employer_scope(caller, application_id)?;

        if application.status != ApplicationStatus::Accepted {
            return Err(RecruitmentError::validation(
                "Offer can only be set for an 'ACCEPTED' application.",
            ));
        }
        if offer.location.trim().is_empty() {
            return Err(RecruitmentError::validation("Offer location is required."));
        }

        application.offer = Some(offer);
        application.status = ApplicationStatus::Hired;
        if let Some(body) = notices::status_notice(ApplicationStatus::Hired, &job.title, &company) {
            application
                .messages
                .append(Message::hiring_team(caller.id, &company, body))?;
        }
        application.touch();
        self.store.update_application(application.clone())?;

        info!(application_id = %application.id, "offer sent, applicant hired");
        Ok(application)
    }

    /// Free-text message from the application's seeker or its owning employer.
    pub fn post_message(
        &self,
        caller: &Caller,
        application_id: &ApplicationId,
        body: &str,
    ) -> Result<Application, RecruitmentError> {
        let mut application = match caller.kind {
            CallerKind::Seeker => self.seeker_scope(caller, application_id)?,
            CallerKind::Employer { .. } => self.employer_scope(caller, application_id)?.application,
            CallerKind::Admin => return Err(RecruitmentError::unauthorized(NOT_YOUR_APPLICATION)),
        };

        application.messages.append(Message::new(
            Some(caller.id),
            caller.first_name.as_str(),
            caller.last_name.as_str(),
            caller.sender_role(),
            body,
        ))?;
        application.touch();
        self.store.update_application(application.clone())?;
        Ok(application)
    }

    pub fn messages(
        &self,
        caller: &Caller,
        application_id: &ApplicationId,
    ) -> Result<Vec<Message>, RecruitmentError> {
        let application = match caller.kind {
            CallerKind::Seeker => self.seeker_scope(caller, application_id)?,
            CallerKind::Employer { .. } => self.employer_scope(caller, application_id)?.application,
            CallerKind::Admin => self
                .store
                .fetch_application(application_id)?
                .ok_or_else(|| RecruitmentError::not_found(APPLICATION_NOT_FOUND))?,
        };
        Ok(application.messages.entries().to_vec())
    }

    /// Opens (or reuses) a conversation with a seeker on one of the employer's active postings.
    pub fn contact_candidate(
        &self,
        caller: &Caller,
        candidate_id: &UserId,
    ) -> Result<Application, RecruitmentError> {
        let company = caller.employer_company()?.to_string();
        if !caller.entitlements().direct_candidate_contact {
            return Err(RecruitmentError::unauthorized(
                "Direct contact is a Premium feature.",
            ));
        }

        let candidate = self
            .store
            .fetch_user(candidate_id)?
            .filter(|user| user.role == Role::JobSeeker)
            .ok_or_else(|| RecruitmentError::not_found("Candidate not found."))?;

        let jobs = self.store.jobs_by_employer(&caller.id)?;
        for job in &jobs {
            if let Some(existing) = self.store.find_application(&candidate.id, &job.id)? {
                return Ok(existing);
            }
        }

        let job = jobs
            .iter()
            .find(|job| job.status == JobStatus::Active)
            .ok_or_else(|| {
                RecruitmentError::validation(
                    "You need at least one Active job post to initiate contact.",
                )
            })?;

        let mut application =
            Application::new(candidate.id, job.id, ApplicationStatus::Reviewed);
        application.messages.append(Message::new(
            Some(caller.id),
            company.as_str(),
            "(Direct)",
            caller.sender_role(),
            notices::direct_contact(&candidate.first_name),
        ))?;
        let application = self.store.insert_application(application)?;

        info!(application_id = %application.id, candidate_id = %candidate.id, "candidate contacted directly");
        Ok(application)
    }

    pub fn applicants_for_job(
        &self,
        caller: &Caller,
        job_id: &JobId,
    ) -> Result<Vec<ApplicantView>, RecruitmentError> {
        let company = caller.employer_company()?;
        let job = self
            .store
            .fetch_job(job_id)?
            .ok_or_else(|| RecruitmentError::not_found("Job not found."))?;
        if self.company_of(&job.employer_id)?.as_deref() != Some(company) {
            return Err(RecruitmentError::unauthorized(
                "You are not authorized to view applicants for this job.",
            ));
        }

        let mut views = Vec::new();
        for application in self.store.applications_for_job(job_id)? {
            let seeker = self.store.fetch_user(&application.seeker_id)?;
            let completeness = self
                .store
                .fetch_profile(&application.seeker_id)?
                .map(|profile| profile.completeness)
                .unwrap_or_default();
            views.push(ApplicantView {
                seeker_name: seeker.as_ref().map(User::full_name).unwrap_or_default(),
                seeker_email: seeker.map(|user| user.email).unwrap_or_default(),
                completeness,
                application,
            });
        }
        Ok(views)
    }

    pub fn seeker_tracker(&self, caller: &Caller) -> Result<SeekerTracker, RecruitmentError> {
        caller.require_seeker("Only Job Seekers have an application tracker.")?;

        let mut tracked = Vec::new();
        for application in self.store.applications_for_seeker(&caller.id)? {
            let job = self.store.fetch_job(&application.job_id)?;
            let (job_title, company_name) = match job {
                Some(job) => {
                    let company = self.company_of(&job.employer_id)?.unwrap_or_default();
                    (job.title, company)
                }
                None => (String::new(), String::new()),
            };
            tracked.push(TrackedApplication {
                application,
                job_title,
                company_name,
            });
        }

        let active_count = tracked
            .iter()
            .filter(|entry| entry.application.status.is_active())
            .count();
        Ok(SeekerTracker {
            limit_reached: self
                .limits
                .application_cap_reached(caller.entitlements(), active_count),
            active_count,
            applications: tracked,
        })
    }

    fn company_of(&self, employer: &UserId) -> Result<Option<String>, RecruitmentError> {
        Ok(self
            .store
            .fetch_user(employer)?
            .and_then(|owner| owner.company.map(|company| company.name)))
    }

    /// Loads the application and verifies the caller's company owns the posting.
    fn employer_scope(
        &self,
        caller: &Caller,
        application_id: &ApplicationId,
    ) -> Result<EmployerScope, RecruitmentError> {
        let company = caller.employer_company()?;
        let application = self
            .store
            .fetch_application(application_id)?
            .ok_or_else(|| RecruitmentError::not_found(APPLICATION_NOT_FOUND))?;
        let job = self
            .store
            .fetch_job(&application.job_id)?
            .ok_or_else(|| RecruitmentError::not_found("Job not found."))?;

        match self.company_of(&job.employer_id)? {
            Some(owner_company) if owner_company == company => Ok(EmployerScope {
                application,
                job,
                company: owner_company,
            }),
            _ => {
                warn!(application_id = %application_id, caller_id = %caller.id, "employer scope mismatch");
                Err(RecruitmentError::unauthorized(NOT_YOUR_APPLICATION))
            }
        }
    }

    fn seeker_scope(
        &self,
        caller: &Caller,
        application_id: &ApplicationId,
    ) -> Result<Application, RecruitmentError> {
        caller.require_seeker(NOT_YOUR_APPLICATION)?;
        let application = self
            .store
            .fetch_application(application_id)?
            .ok_or_else(|| RecruitmentError::not_found(APPLICATION_NOT_FOUND))?;
        if application.seeker_id != caller.id {
            warn!(application_id = %application_id, caller_id = %caller.id, "seeker scope mismatch");
            return Err(RecruitmentError::unauthorized(NOT_YOUR_APPLICATION));
        }
        Ok(application)
    }
}

fn already_applied() -> RecruitmentError {
    RecruitmentError::validation("You have already applied to this job.")
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
