//! Role-based recruitment workflow: job moderation, application review with exam and
//! offer sub-flows, tier-gated features, chat logs, and profile completeness.
//!
//! Every operation takes an explicit [`Caller`] resolved from a stored account, so
//! ownership and tier checks never depend on ambient session state.

pub mod accounts;
pub mod applications;
pub mod assistant;
pub mod domain;
pub mod error;
pub mod jobs;
pub mod memory;
pub mod messaging;
pub(crate) mod notices;
pub mod profile;
pub mod profiles;
pub mod repository;
pub mod router;
pub mod service;
pub mod support;
pub mod tier;

#[cfg(test)]
mod tests;

pub use accounts::{
    AccountService, CheckoutQuote, CheckoutReceipt, CompanyUpdate, Registration, UserUpdate,
};
pub use applications::{
    ApplicantView, ApplicationLifecycle, ExamAssignment, SeekerTracker, TrackedApplication,
};
pub use assistant::{
    Assistant, AssistantError, CandidateAnalysis, CompletionClient, CompletionRequest,
    ConfiguredCompletion, DisabledCompletion, JobDescriptionBrief, MatchAnalysis,
    OpenRouterClient,
};
pub use domain::{
    Application, ApplicationId, ApplicationStatus, Caller, CallerKind, CompanyProfile,
    ExamRecord, JobDraft, JobEdit, JobId, JobPosting, JobStatus, OfferDetails, Role,
    SecurityQuestion, User, UserId,
};
pub use error::RecruitmentError;
pub use jobs::{
    AdminOverview, DeletedJob, EmployerOverview, JobDecision, JobLifecycle, PostedJob,
    ReleasedJobs,
};
pub use memory::InMemoryStore;
pub use messaging::{ChatLog, Message, SenderRole};
pub use profile::{
    score_completeness, Education, EntryId, ProfileUpdate, SeekerProfile, WorkExperience,
};
pub use profiles::{CandidateSummary, ProfileService};
pub use repository::{
    ApplicationRepository, CandidateSearch, JobListing, JobRepository, JobSearch,
    ProfileRepository, RecruitmentStore, RepositoryError, UserRepository, WriteBatch,
};
pub use router::{recruitment_router, CALLER_HEADER};
pub use service::{AssistantReply, GeneratedDescription, RecruitmentService};
pub use support::{SupportDesk, SupportThreadSummary};
pub use tier::{entitlements_for, Entitlements, PremiumTier, SubscriptionPlan, WorkflowLimits};
