use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::accounts::{CheckoutQuote, CheckoutReceipt, CompanyUpdate, Registration, UserUpdate};
use super::applications::{ApplicantView, ExamAssignment, SeekerTracker};
use super::assistant::{CandidateAnalysis, CompletionClient, JobDescriptionBrief, MatchAnalysis};
use super::domain::{
    Application, ApplicationId, ApplicationStatus, Caller, JobDraft, JobEdit, JobId, JobPosting,
    JobStatus, OfferDetails, Role, SecurityQuestion, User, UserId,
};
use super::error::RecruitmentError;
use super::jobs::{
    AdminOverview, DeletedJob, EmployerOverview, JobDecision, PostedJob, ReleasedJobs,
};
use super::messaging::Message;
use super::profile::{Education, EntryId, ProfileUpdate, SeekerProfile, WorkExperience};
use super::profiles::CandidateSummary;
use super::repository::{CandidateSearch, JobListing, JobSearch, RecruitmentStore};
use super::service::{AssistantReply, GeneratedDescription, RecruitmentService};
use super::support::SupportThreadSummary;

/// Header carrying the authenticated account id, set by the upstream auth layer.
pub const CALLER_HEADER: &str = "x-user-id";

type Shared<S, C> = State<Arc<RecruitmentService<S, C>>>;
type ApiResult<T> = Result<Json<T>, RecruitmentError>;

/// JSON endpoints over every recruitment operation.
pub fn recruitment_router<S, C>(service: Arc<RecruitmentService<S, C>>) -> Router
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    Router::new()
        .route("/api/v1/accounts/register", post(register::<S, C>))
        .route(
            "/api/v1/accounts/security-question",
            get(security_question::<S, C>),
        )
        .route(
            "/api/v1/accounts/security-answer",
            post(verify_security_answer::<S, C>),
        )
        .route("/api/v1/jobs", get(search_jobs::<S, C>).post(post_job::<S, C>))
        .route("/api/v1/jobs/suggestions", get(suggest_titles::<S, C>))
        .route("/api/v1/jobs/recommended", get(recommended_jobs::<S, C>))
        .route("/api/v1/jobs/release-held", post(release_held::<S, C>))
        .route("/api/v1/jobs/:job_id", get(view_job::<S, C>))
        .route(
            "/api/v1/jobs/:job_id/applications",
            get(applicants::<S, C>).post(apply::<S, C>),
        )
        .route("/api/v1/jobs/:job_id/match", get(match_score::<S, C>))
        .route(
            "/api/v1/applications/:application_id/exam",
            post(assign_exam::<S, C>),
        )
        .route(
            "/api/v1/applications/:application_id/exam/submission",
            post(submit_exam::<S, C>),
        )
        .route(
            "/api/v1/applications/:application_id/exam/score",
            post(score_exam::<S, C>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            put(update_status::<S, C>),
        )
        .route(
            "/api/v1/applications/:application_id/offer",
            post(send_offer::<S, C>),
        )
        .route(
            "/api/v1/applications/:application_id/messages",
            get(application_messages::<S, C>).post(post_application_message::<S, C>),
        )
        .route("/api/v1/employer/overview", get(employer_overview::<S, C>))
        .route("/api/v1/employer/company", put(update_company::<S, C>))
        .route(
            "/api/v1/employer/job-description",
            post(generate_job_description::<S, C>),
        )
        .route("/api/v1/candidates", get(search_candidates::<S, C>))
        .route(
            "/api/v1/candidates/:user_id/contact",
            post(contact_candidate::<S, C>),
        )
        .route(
            "/api/v1/candidates/:user_id/analysis",
            get(analyze_candidate::<S, C>),
        )
        .route("/api/v1/seeker/applications", get(seeker_tracker::<S, C>))
        .route(
            "/api/v1/seeker/profile",
            get(seeker_profile::<S, C>).put(save_profile::<S, C>),
        )
        .route("/api/v1/seeker/profile/work", post(add_work::<S, C>))
        .route(
            "/api/v1/seeker/profile/work/:entry_id",
            delete(remove_work::<S, C>),
        )
        .route("/api/v1/seeker/profile/education", post(add_education::<S, C>))
        .route(
            "/api/v1/seeker/profile/education/:entry_id",
            delete(remove_education::<S, C>),
        )
        .route("/api/v1/seeker/profile/resume", put(attach_resume::<S, C>))
        .route("/api/v1/seeker/profile/picture", put(attach_picture::<S, C>))
        .route("/api/v1/seeker/assistant", post(seeker_chat::<S, C>))
        .route(
            "/api/v1/support",
            get(support_thread::<S, C>).post(post_support::<S, C>),
        )
        .route("/api/v1/checkout/quote", post(checkout_quote::<S, C>))
        .route("/api/v1/checkout/complete", post(complete_checkout::<S, C>))
        .route("/api/v1/admin/overview", get(admin_overview::<S, C>))
        .route(
            "/api/v1/admin/jobs/:job_id",
            delete(delete_job::<S, C>).patch(edit_job::<S, C>),
        )
        .route("/api/v1/admin/jobs/:job_id/approve", post(approve_job::<S, C>))
        .route("/api/v1/admin/users", get(list_users::<S, C>))
        .route("/api/v1/admin/users/:user_id", patch(update_user::<S, C>))
        .route("/api/v1/admin/support", get(support_inbox::<S, C>))
        .route(
            "/api/v1/admin/support/:user_id",
            get(admin_support_thread::<S, C>).post(admin_support_reply::<S, C>),
        )
        .with_state(service)
}

/// Resolves the caller from the auth header before any operation runs.
fn caller<S, C>(
    service: &RecruitmentService<S, C>,
    headers: &HeaderMap,
) -> Result<Caller, RecruitmentError>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let id = headers
        .get(CALLER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
        .ok_or_else(|| RecruitmentError::unauthorized("Authentication required."))?;
    service.caller(&UserId(id))
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobSearchQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    category: Option<String>,
    /// Comma-separated job types.
    #[serde(default)]
    job_types: Option<String>,
}

impl From<JobSearchQuery> for JobSearch {
    fn from(query: JobSearchQuery) -> Self {
        let job_types = query
            .job_types
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        JobSearch {
            keyword: query.q,
            location: query.location,
            category: query.category,
            job_types,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SuggestionQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverviewQuery {
    #[serde(default)]
    status: Option<JobStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoleQuery {
    role: Role,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsernameQuery {
    username: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SecurityAnswer {
    username: String,
    question: SecurityQuestion,
    answer: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SecurityAnswerVerdict {
    accepted: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct SecurityPrompt {
    question: SecurityQuestion,
    prompt: &'static str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageBody {
    message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExamAnswers {
    answers: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExamScore {
    score: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusChange {
    status: ApplicationStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TierChoice {
    tier: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileReference {
    filename: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AddedEntry {
    entry_id: EntryId,
    profile: SeekerProfile,
}

async fn register<S, C>(
    State(service): Shared<S, C>,
    Json(registration): Json<Registration>,
) -> Result<(StatusCode, Json<User>), RecruitmentError>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let user = service.accounts().register(registration)?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn security_question<S, C>(
    State(service): Shared<S, C>,
    Query(query): Query<UsernameQuery>,
) -> ApiResult<SecurityPrompt>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let question = service.accounts().security_question(&query.username)?;
    Ok(Json(SecurityPrompt {
        question,
        prompt: question.prompt(),
    }))
}

async fn verify_security_answer<S, C>(
    State(service): Shared<S, C>,
    Json(body): Json<SecurityAnswer>,
) -> ApiResult<SecurityAnswerVerdict>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let accepted =
        service
            .accounts()
            .verify_security_answer(&body.username, body.question, &body.answer)?;
    Ok(Json(SecurityAnswerVerdict { accepted }))
}

async fn search_jobs<S, C>(
    State(service): Shared<S, C>,
    Query(query): Query<JobSearchQuery>,
) -> ApiResult<Vec<JobListing>>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    Ok(Json(service.jobs().search(&query.into())?))
}

async fn suggest_titles<S, C>(
    State(service): Shared<S, C>,
    Query(query): Query<SuggestionQuery>,
) -> ApiResult<Vec<String>>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    Ok(Json(service.jobs().suggest_titles(&query.q)?))
}

async fn recommended_jobs<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Query(query): Query<JobSearchQuery>,
) -> ApiResult<Vec<JobListing>>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.jobs().recommended(&caller, &query.into())?))
}

async fn view_job<S, C>(
    State(service): Shared<S, C>,
    Path(job_id): Path<JobId>,
) -> ApiResult<JobListing>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    Ok(Json(service.jobs().view(&job_id)?))
}

async fn post_job<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Result<(StatusCode, Json<PostedJob>), RecruitmentError>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    let posted = service.jobs().post(&caller, draft)?;
    Ok((StatusCode::CREATED, Json(posted)))
}

async fn release_held<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
) -> ApiResult<ReleasedJobs>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.jobs().release_held(&caller)?))
}

async fn apply<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(job_id): Path<JobId>,
) -> Result<(StatusCode, Json<Application>), RecruitmentError>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    let application = service.applications().apply(&caller, &job_id)?;
    Ok((StatusCode::CREATED, Json(application)))
}

async fn applicants<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(job_id): Path<JobId>,
) -> ApiResult<Vec<ApplicantView>>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.applications().applicants_for_job(&caller, &job_id)?))
}

async fn match_score<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(job_id): Path<JobId>,
) -> ApiResult<MatchAnalysis>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.match_score(&caller, &job_id).await?))
}

async fn assign_exam<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(application_id): Path<ApplicationId>,
    Json(assignment): Json<ExamAssignment>,
) -> ApiResult<Application>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.applications().assign_exam(
        &caller,
        &application_id,
        assignment,
    )?))
}

async fn submit_exam<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(application_id): Path<ApplicationId>,
    Json(body): Json<ExamAnswers>,
) -> ApiResult<Application>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    // Answers may arrive as an already-serialized string or as inline JSON.
    let answers = match body.answers {
        Value::String(text) => text,
        other => other.to_string(),
    };
    Ok(Json(service.applications().submit_exam(
        &caller,
        &application_id,
        &answers,
    )?))
}

async fn score_exam<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(application_id): Path<ApplicationId>,
    Json(body): Json<ExamScore>,
) -> ApiResult<Application>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.applications().score_exam(
        &caller,
        &application_id,
        body.score,
    )?))
}

async fn update_status<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(application_id): Path<ApplicationId>,
    Json(body): Json<StatusChange>,
) -> ApiResult<Application>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.applications().update_status(
        &caller,
        &application_id,
        body.status,
    )?))
}

async fn send_offer<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(application_id): Path<ApplicationId>,
    Json(offer): Json<OfferDetails>,
) -> ApiResult<Application>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.applications().send_offer(
        &caller,
        &application_id,
        offer,
    )?))
}

async fn application_messages<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(application_id): Path<ApplicationId>,
) -> ApiResult<Vec<Message>>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.applications().messages(&caller, &application_id)?))
}

async fn post_application_message<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(application_id): Path<ApplicationId>,
    Json(body): Json<MessageBody>,
) -> ApiResult<Application>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.applications().post_message(
        &caller,
        &application_id,
        &body.message,
    )?))
}

async fn employer_overview<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Query(query): Query<OverviewQuery>,
) -> ApiResult<EmployerOverview>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.jobs().employer_overview(&caller, query.status)?))
}

async fn update_company<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Json(update): Json<CompanyUpdate>,
) -> ApiResult<User>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.accounts().update_company(&caller, update)?))
}

async fn generate_job_description<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Json(brief): Json<JobDescriptionBrief>,
) -> ApiResult<GeneratedDescription>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.generate_job_description(&caller, brief).await?))
}

async fn search_candidates<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Query(criteria): Query<CandidateSearch>,
) -> ApiResult<Vec<CandidateSummary>>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.profiles().search_candidates(&caller, criteria)?))
}

async fn contact_candidate<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(user_id): Path<UserId>,
) -> ApiResult<Application>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.applications().contact_candidate(&caller, &user_id)?))
}

async fn analyze_candidate<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(user_id): Path<UserId>,
) -> ApiResult<CandidateAnalysis>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.analyze_candidate(&caller, &user_id).await?))
}

async fn seeker_tracker<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
) -> ApiResult<SeekerTracker>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.applications().seeker_tracker(&caller)?))
}

async fn seeker_profile<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
) -> ApiResult<SeekerProfile>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.profiles().profile(&caller)?))
}

async fn save_profile<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<SeekerProfile>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.profiles().save_profile(&caller, update)?))
}

async fn add_work<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Json(entry): Json<WorkExperience>,
) -> Result<(StatusCode, Json<AddedEntry>), RecruitmentError>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    let (entry_id, profile) = service.profiles().add_work(&caller, entry)?;
    Ok((StatusCode::CREATED, Json(AddedEntry { entry_id, profile })))
}

async fn remove_work<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(entry_id): Path<EntryId>,
) -> ApiResult<SeekerProfile>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.profiles().remove_work(&caller, entry_id)?))
}

async fn add_education<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Json(entry): Json<Education>,
) -> Result<(StatusCode, Json<AddedEntry>), RecruitmentError>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    let (entry_id, profile) = service.profiles().add_education(&caller, entry)?;
    Ok((StatusCode::CREATED, Json(AddedEntry { entry_id, profile })))
}

async fn remove_education<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(entry_id): Path<EntryId>,
) -> ApiResult<SeekerProfile>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.profiles().remove_education(&caller, entry_id)?))
}

async fn attach_resume<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Json(file): Json<FileReference>,
) -> ApiResult<SeekerProfile>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.profiles().attach_resume(&caller, &file.filename)?))
}

async fn attach_picture<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Json(file): Json<FileReference>,
) -> ApiResult<SeekerProfile>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.profiles().attach_picture(&caller, &file.filename)?))
}

async fn seeker_chat<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Json(body): Json<MessageBody>,
) -> ApiResult<AssistantReply>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.seeker_chat(&caller, &body.message).await?))
}

async fn support_thread<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
) -> ApiResult<Vec<Message>>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.support().thread(&caller)?))
}

async fn post_support<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Json(body): Json<MessageBody>,
) -> ApiResult<Vec<Message>>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.support().post(&caller, &body.message)?))
}

async fn checkout_quote<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Json(body): Json<TierChoice>,
) -> ApiResult<CheckoutQuote>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.accounts().checkout_quote(&caller, &body.tier)?))
}

async fn complete_checkout<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Json(body): Json<TierChoice>,
) -> ApiResult<CheckoutReceipt>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.accounts().complete_checkout(&caller, &body.tier)?))
}

async fn admin_overview<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
) -> ApiResult<AdminOverview>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.jobs().admin_overview(&caller, Utc::now())?))
}

async fn approve_job<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(job_id): Path<JobId>,
) -> ApiResult<JobDecision>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.jobs().approve(&caller, &job_id)?))
}

async fn delete_job<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(job_id): Path<JobId>,
) -> ApiResult<DeletedJob>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.jobs().delete(&caller, &job_id)?))
}

async fn edit_job<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(job_id): Path<JobId>,
    Json(edit): Json<JobEdit>,
) -> ApiResult<JobPosting>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.jobs().edit(&caller, &job_id, edit)?))
}

async fn list_users<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Query(query): Query<RoleQuery>,
) -> ApiResult<Vec<User>>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.accounts().list_users(&caller, query.role)?))
}

async fn update_user<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(user_id): Path<UserId>,
    Json(update): Json<UserUpdate>,
) -> ApiResult<User>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.accounts().update_user(&caller, &user_id, update)?))
}

async fn support_inbox<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
) -> ApiResult<Vec<SupportThreadSummary>>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.support().inbox(&caller)?))
}

async fn admin_support_thread<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(user_id): Path<UserId>,
) -> ApiResult<Vec<Message>>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.support().admin_thread(&caller, &user_id)?))
}

async fn admin_support_reply<S, C>(
    State(service): Shared<S, C>,
    headers: HeaderMap,
    Path(user_id): Path<UserId>,
    Json(body): Json<MessageBody>,
) -> ApiResult<Vec<Message>>
where
    S: RecruitmentStore + 'static,
    C: CompletionClient + 'static,
{
    let caller = caller(&service, &headers)?;
    Ok(Json(service.support().admin_reply(&caller, &user_id, &body.message)?))
}
