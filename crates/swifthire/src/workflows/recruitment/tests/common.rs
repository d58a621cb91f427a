use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::recruitment::assistant::{
    Assistant, AssistantError, CompletionClient, CompletionRequest,
};
use crate::workflows::recruitment::domain::{
    Application, ApplicationId, Caller, JobDraft, JobId, JobPosting, JobStatus, Role, User, UserId,
};
use crate::workflows::recruitment::memory::InMemoryStore;
use crate::workflows::recruitment::profile::{
    Education, ProfileUpdate, SeekerProfile, WorkExperience,
};
use crate::workflows::recruitment::repository::{
    ApplicationRepository, CandidateSearch, JobListing, JobRepository, JobSearch,
    ProfileRepository, RecruitmentStore, RepositoryError, UserRepository, WriteBatch,
};
use crate::workflows::recruitment::tier::{PremiumTier, WorkflowLimits};
use crate::workflows::recruitment::{recruitment_router, Registration, RecruitmentService};

pub(super) type TestService = RecruitmentService<InMemoryStore, ScriptedCompletion>;

/// Completion client that replays queued replies and records every request.
#[derive(Default)]
pub(super) struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String, AssistantError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
    stall: bool,
}

impl ScriptedCompletion {
    pub(super) fn replying(reply: &str) -> Self {
        let completion = Self::default();
        completion.push(Ok(reply.to_string()));
        completion
    }

    pub(super) fn failing() -> Self {
        let completion = Self::default();
        completion.push(Err(AssistantError::Transport("connection reset".to_string())));
        completion
    }

    pub(super) fn stalled() -> Self {
        Self {
            stall: true,
            ..Self::default()
        }
    }

    pub(super) fn push(&self, reply: Result<String, AssistantError>) {
        self.replies.lock().expect("replies mutex").push_back(reply);
    }

    pub(super) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("requests mutex").clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AssistantError> {
        self.requests.lock().expect("requests mutex").push(request);
        if self.stall {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        self.replies
            .lock()
            .expect("replies mutex")
            .pop_front()
            .unwrap_or(Err(AssistantError::NotConfigured))
    }
}

pub(super) struct Fixture {
    pub(super) service: Arc<TestService>,
    pub(super) store: Arc<InMemoryStore>,
    pub(super) completion: Arc<ScriptedCompletion>,
}

pub(super) fn build_fixture() -> Fixture {
    build_fixture_with(ScriptedCompletion::default())
}

pub(super) fn build_fixture_with(completion: ScriptedCompletion) -> Fixture {
    let store = Arc::new(InMemoryStore::new());
    let completion = Arc::new(completion);
    let assistant = Assistant::new(completion.clone(), Duration::from_millis(50));
    let service = Arc::new(RecruitmentService::new(
        store.clone(),
        assistant,
        WorkflowLimits::default(),
    ));
    Fixture {
        service,
        store,
        completion,
    }
}

/// Store over a shared [`InMemoryStore`] that refuses every write once its budget is spent.
pub(super) struct FlakyStore {
    inner: Arc<InMemoryStore>,
    writes_left: AtomicUsize,
}

impl FlakyStore {
    pub(super) fn new(inner: Arc<InMemoryStore>, writes_allowed: usize) -> Self {
        Self {
            inner,
            writes_left: AtomicUsize::new(writes_allowed),
        }
    }

    fn write(&self) -> Result<(), RepositoryError> {
        self.writes_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .map(|_| ())
            .map_err(|_| RepositoryError::Unavailable("write refused".to_string()))
    }
}

impl UserRepository for FlakyStore {
    fn insert_user(&self, user: User) -> Result<User, RepositoryError> {
        self.write()?;
        self.inner.insert_user(user)
    }

    fn update_user(&self, user: User) -> Result<(), RepositoryError> {
        self.write()?;
        self.inner.update_user(user)
    }

    fn fetch_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        self.inner.fetch_user(id)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        self.inner.find_by_username(username)
    }

    fn login_taken(&self, username: &str, email: &str) -> Result<bool, RepositoryError> {
        self.inner.login_taken(username, email)
    }

    fn users_by_role(&self, role: Role) -> Result<Vec<User>, RepositoryError> {
        self.inner.users_by_role(role)
    }
}

impl JobRepository for FlakyStore {
    fn insert_job(&self, job: JobPosting) -> Result<JobPosting, RepositoryError> {
        self.write()?;
        self.inner.insert_job(job)
    }

    fn update_job(&self, job: JobPosting) -> Result<(), RepositoryError> {
        self.write()?;
        self.inner.update_job(job)
    }

    fn fetch_job(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        self.inner.fetch_job(id)
    }

    fn jobs_by_employer(&self, employer: &UserId) -> Result<Vec<JobPosting>, RepositoryError> {
        self.inner.jobs_by_employer(employer)
    }

    fn jobs_by_status(&self, status: JobStatus) -> Result<Vec<JobPosting>, RepositoryError> {
        self.inner.jobs_by_status(status)
    }

    fn search_jobs(&self, criteria: &JobSearch) -> Result<Vec<JobListing>, RepositoryError> {
        self.inner.search_jobs(criteria)
    }
}

impl ApplicationRepository for FlakyStore {
    fn insert_application(
        &self,
        application: Application,
    ) -> Result<Application, RepositoryError> {
        self.write()?;
        self.inner.insert_application(application)
    }

    fn update_application(&self, application: Application) -> Result<(), RepositoryError> {
        self.write()?;
        self.inner.update_application(application)
    }

    fn fetch_application(
        &self,
        id: &ApplicationId,
    ) -> Result<Option<Application>, RepositoryError> {
        self.inner.fetch_application(id)
    }

    fn find_application(
        &self,
        seeker: &UserId,
        job: &JobId,
    ) -> Result<Option<Application>, RepositoryError> {
        self.inner.find_application(seeker, job)
    }

    fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, RepositoryError> {
        self.inner.applications_for_job(job)
    }

    fn applications_for_seeker(
        &self,
        seeker: &UserId,
    ) -> Result<Vec<Application>, RepositoryError> {
        self.inner.applications_for_seeker(seeker)
    }

    fn all_applications(&self) -> Result<Vec<Application>, RepositoryError> {
        self.inner.all_applications()
    }
}

impl ProfileRepository for FlakyStore {
    fn save_profile(&self, profile: SeekerProfile) -> Result<(), RepositoryError> {
        self.write()?;
        self.inner.save_profile(profile)
    }

    fn fetch_profile(&self, user: &UserId) -> Result<Option<SeekerProfile>, RepositoryError> {
        self.inner.fetch_profile(user)
    }

    fn delete_profile(&self, user: &UserId) -> Result<(), RepositoryError> {
        self.write()?;
        self.inner.delete_profile(user)
    }

    fn search_candidates(
        &self,
        criteria: &CandidateSearch,
    ) -> Result<Vec<SeekerProfile>, RepositoryError> {
        self.inner.search_candidates(criteria)
    }
}

impl RecruitmentStore for FlakyStore {
    fn delete_job_cascade(&self, job: &JobId) -> Result<usize, RepositoryError> {
        self.write()?;
        self.inner.delete_job_cascade(job)
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), RepositoryError> {
        self.write()?;
        self.inner.commit(batch)
    }
}

/// Service over the fixture's records whose store allows only `writes_allowed` writes.
pub(super) fn flaky_service(
    fixture: &Fixture,
    writes_allowed: usize,
) -> RecruitmentService<FlakyStore, ScriptedCompletion> {
    let store = Arc::new(FlakyStore::new(fixture.store.clone(), writes_allowed));
    let assistant = Assistant::new(
        Arc::new(ScriptedCompletion::default()),
        Duration::from_millis(50),
    );
    RecruitmentService::new(store, assistant, WorkflowLimits::default())
}

pub(super) fn registration(username: &str, role: Role) -> Registration {
    Registration {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        first_name: "Alex".to_string(),
        last_name: "Rivera".to_string(),
        phone_number: None,
        role,
        company_name: None,
        security_question: None,
        security_answer: None,
    }
}

fn store_user(fixture: &Fixture, user: User) -> Caller {
    fixture.store.update_user(user.clone()).expect("user update");
    fixture.service.caller(&user.id).expect("caller resolves")
}

pub(super) fn admin(fixture: &Fixture) -> Caller {
    let mut user = fixture
        .service
        .accounts()
        .register(registration("root", Role::Admin))
        .expect("admin registers");
    user.enabled = true;
    store_user(fixture, user)
}

pub(super) fn employer(fixture: &Fixture, username: &str, company: &str, tier: PremiumTier) -> Caller {
    let mut form = registration(username, Role::Employer);
    form.company_name = Some(company.to_string());
    let mut user = fixture
        .service
        .accounts()
        .register(form)
        .expect("employer registers");
    user.premium_tier = tier;
    store_user(fixture, user)
}

pub(super) fn seeker(fixture: &Fixture, username: &str, tier: PremiumTier) -> Caller {
    let mut user = fixture
        .service
        .accounts()
        .register(registration(username, Role::JobSeeker))
        .expect("seeker registers");
    user.premium_tier = tier;
    store_user(fixture, user)
}

pub(super) fn complete_profile(fixture: &Fixture, caller: &Caller) {
    let profiles = fixture.service.profiles();
    profiles
        .save_profile(
            caller,
            ProfileUpdate {
                full_name: Some("Alex Rivera".to_string()),
                phone_number: Some("555-0100".to_string()),
                city: Some("Denver".to_string()),
                current_title: Some("Backend Engineer".to_string()),
                headline: Some("Rust services and data pipelines".to_string()),
                years_experience: Some(6),
                skills: Some("Rust, Tokio, PostgreSQL".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .expect("profile saves");
    profiles
        .attach_resume(caller, "resume-alex.pdf")
        .expect("resume attaches");
    profiles
        .add_work(
            caller,
            WorkExperience {
                title: "Engineer".to_string(),
                company: "Initech".to_string(),
                start_date: Some("2019-01".to_string()),
                end_date: None,
                description: None,
            },
        )
        .expect("work entry adds");
    profiles
        .add_education(
            caller,
            Education {
                institution: "State University".to_string(),
                degree: "BSc".to_string(),
                field_of_study: Some("Computer Science".to_string()),
                graduation_year: Some(2018),
            },
        )
        .expect("education entry adds");
}

pub(super) fn draft(title: &str) -> JobDraft {
    JobDraft {
        title: title.to_string(),
        description: format!("{title} working on Rust services."),
        required_skills: "Rust, SQL".to_string(),
        location_city: Some("Denver".to_string()),
        job_type: Some("Full-time".to_string()),
        category: Some("Engineering".to_string()),
        salary_min: Some(90_000),
        salary_max: Some(120_000),
        remote_option: Some("Hybrid".to_string()),
    }
}

/// Posts and approves a job so it is open for applications.
pub(super) fn active_job(fixture: &Fixture, employer: &Caller, admin: &Caller, title: &str) -> JobPosting {
    let posted = fixture
        .service
        .jobs()
        .post(employer, draft(title))
        .expect("job posts");
    fixture
        .service
        .jobs()
        .approve(admin, &posted.job.id)
        .expect("job approves")
        .job
}

pub(super) fn router(fixture: &Fixture) -> axum::Router {
    recruitment_router(fixture.service.clone())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
