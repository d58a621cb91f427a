use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::RecruitmentError;
use super::messaging::{ChatLog, SenderRole};
use super::tier::{Entitlements, PremiumTier};

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

identifier!(
    /// Identifier for any account: admin, employer, or seeker.
    UserId
);
identifier!(
    /// Identifier for a job posting.
    JobId
);
identifier!(
    /// Identifier for a seeker's application to a posting.
    ApplicationId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Employer,
    JobSeeker,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Employer => "EMPLOYER",
            Role::JobSeeker => "JOB_SEEKER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    PendingAdmin,
    Active,
    OnHold,
}

impl JobStatus {
    pub const ALL: [JobStatus; 3] = [JobStatus::PendingAdmin, JobStatus::Active, JobStatus::OnHold];

    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::PendingAdmin => "PENDING_ADMIN",
            JobStatus::Active => "ACTIVE",
            JobStatus::OnHold => "ON_HOLD",
        }
    }

    /// Postings that count toward the basic-tier posting cap.
    pub const fn counts_toward_cap(self) -> bool {
        matches!(self, JobStatus::PendingAdmin | JobStatus::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    Reviewed,
    Accepted,
    Rejected,
    Hired,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Hired,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::Reviewed => "REVIEWED",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Hired => "HIRED",
        }
    }

    /// Applications that still occupy a slot against the basic-tier cap.
    pub const fn is_active(self) -> bool {
        !matches!(self, ApplicationStatus::Rejected | ApplicationStatus::Hired)
    }

    /// Transitions an employer may request directly. `Hired` is only reachable
    /// through an offer, so no state lists it here.
    pub const fn can_transition_to(self, next: ApplicationStatus) -> bool {
        use ApplicationStatus::*;
        matches!(
            (self, next),
            (Applied, Reviewed)
                | (Applied, Rejected)
                | (Reviewed, Accepted)
                | (Reviewed, Rejected)
                | (Accepted, Rejected)
                | (Rejected, Reviewed)
        )
    }
}

/// Fixed catalogue of password-reset prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityQuestion {
    Pet,
    Car,
    MaidenName,
    HighSchool,
    FirstSchool,
    BirthCity,
    Movie,
    Food,
    BestFriend,
    Street,
}

impl SecurityQuestion {
    pub const ALL: [SecurityQuestion; 10] = [
        SecurityQuestion::Pet,
        SecurityQuestion::Car,
        SecurityQuestion::MaidenName,
        SecurityQuestion::HighSchool,
        SecurityQuestion::FirstSchool,
        SecurityQuestion::BirthCity,
        SecurityQuestion::Movie,
        SecurityQuestion::Food,
        SecurityQuestion::BestFriend,
        SecurityQuestion::Street,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            SecurityQuestion::Pet => "pet",
            SecurityQuestion::Car => "car",
            SecurityQuestion::MaidenName => "maiden_name",
            SecurityQuestion::HighSchool => "high_school",
            SecurityQuestion::FirstSchool => "first_school",
            SecurityQuestion::BirthCity => "birth_city",
            SecurityQuestion::Movie => "movie",
            SecurityQuestion::Food => "food",
            SecurityQuestion::BestFriend => "best_friend",
            SecurityQuestion::Street => "street",
        }
    }

    pub const fn prompt(self) -> &'static str {
        match self {
            SecurityQuestion::Pet => "What is the name of your first pet?",
            SecurityQuestion::Car => "What was your first car?",
            SecurityQuestion::MaidenName => "What is your mother's maiden name?",
            SecurityQuestion::HighSchool => "What high school did you attend?",
            SecurityQuestion::FirstSchool => "What is the name of your first school?",
            SecurityQuestion::BirthCity => "In what city were you born?",
            SecurityQuestion::Movie => "What is your favorite movie?",
            SecurityQuestion::Food => "What is your favorite food?",
            SecurityQuestion::BestFriend => "What is the name of your childhood best friend?",
            SecurityQuestion::Street => "What street did you grow up on?",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL.into_iter().find(|question| question.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityChallenge {
    pub question: SecurityQuestion,
    pub answer: String,
}

impl SecurityChallenge {
    pub fn accepts(&self, question: SecurityQuestion, answer: &str) -> bool {
        self.question == question && self.answer.trim().eq_ignore_ascii_case(answer.trim())
    }
}

/// Company details carried only by employer accounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub description: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl CompanyProfile {
    pub const DEFAULT_DESCRIPTION: &'static str = "Please update your company profile.";
    pub const DEFAULT_LOCATION: &'static str = "TBD";

    pub fn named(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            description: Self::DEFAULT_DESCRIPTION.to_string(),
            location: Self::DEFAULT_LOCATION.to_string(),
            logo: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub role: Role,
    pub enabled: bool,
    pub premium_tier: PremiumTier,
    pub company: Option<CompanyProfile>,
    #[serde(skip_serializing)]
    pub security: Option<SecurityChallenge>,
    #[serde(default, skip_serializing)]
    pub support_log: ChatLog,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company.as_ref().map(|company| company.name.as_str())
    }
}

/// Employer-supplied fields for a new posting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub required_skills: String,
    #[serde(default)]
    pub location_city: Option<String>,
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub salary_min: Option<u32>,
    #[serde(default)]
    pub salary_max: Option<u32>,
    #[serde(default)]
    pub remote_option: Option<String>,
}

/// Admin edit whitelist. Absent fields are left untouched; status never changes here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobEdit {
    pub title: Option<String>,
    pub description: Option<String>,
    pub required_skills: Option<String>,
    pub location_city: Option<String>,
    pub job_type: Option<String>,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub remote_option: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub employer_id: UserId,
    pub title: String,
    pub description: String,
    pub required_skills: String,
    pub location_city: Option<String>,
    pub job_type: Option<String>,
    pub category: Option<String>,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub remote_option: Option<String>,
    pub status: JobStatus,
    pub featured: bool,
    pub posted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobPosting {
    pub fn from_draft(employer_id: UserId, draft: JobDraft, status: JobStatus, featured: bool) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::generate(),
            employer_id,
            title: draft.title.trim().to_string(),
            description: draft.description,
            required_skills: draft.required_skills,
            location_city: draft.location_city,
            job_type: draft.job_type,
            category: normalize_category(draft.category),
            salary_min: draft.salary_min,
            salary_max: draft.salary_max,
            remote_option: draft.remote_option,
            status,
            featured,
            posted_at: now,
            updated_at: now,
        }
    }

    pub fn apply_edit(&mut self, edit: JobEdit) {
        if let Some(title) = edit.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = edit.description {
            self.description = description;
        }
        if let Some(skills) = edit.required_skills {
            self.required_skills = skills;
        }
        if let Some(city) = edit.location_city {
            self.location_city = Some(city);
        }
        if let Some(job_type) = edit.job_type {
            self.job_type = Some(job_type);
        }
        if let Some(min) = edit.salary_min {
            self.salary_min = Some(min);
        }
        if let Some(max) = edit.salary_max {
            self.salary_max = Some(max);
        }
        if let Some(remote) = edit.remote_option {
            self.remote_option = Some(remote);
        }
        if edit.category.is_some() {
            self.category = normalize_category(edit.category);
        }
        self.updated_at = Utc::now();
    }
}

/// Blank categories are stored as absent.
pub fn normalize_category(category: Option<String>) -> Option<String> {
    category
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn validate_salary_range(min: Option<u32>, max: Option<u32>) -> Result<(), RecruitmentError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(RecruitmentError::validation(
            "Minimum salary cannot exceed maximum salary.",
        )),
        _ => Ok(()),
    }
}

/// Employer-assigned exam. Questions and answers stay as structured JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamRecord {
    pub questions: serde_json::Value,
    pub answers: Option<serde_json::Value>,
    pub submitted: bool,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferDetails {
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub location: String,
    #[serde(default)]
    pub required_papers: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub seeker_id: UserId,
    pub job_id: JobId,
    pub status: ApplicationStatus,
    pub messages: ChatLog,
    pub exam: Option<ExamRecord>,
    pub offer: Option<OfferDetails>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn new(seeker_id: UserId, job_id: JobId, status: ApplicationStatus) -> Self {
        let now = Utc::now();
        Self {
            id: ApplicationId::generate(),
            seeker_id,
            job_id,
            status,
            messages: ChatLog::default(),
            exam: None,
            offer: None,
            applied_at: now,
            updated_at: now,
        }
    }

    /// True when an exam was assigned and the seeker has not submitted it yet.
    pub fn exam_outstanding(&self) -> bool {
        self.exam.as_ref().is_some_and(|exam| !exam.submitted)
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Role-specific identity of the account performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerKind {
    Admin,
    Employer { company_name: String },
    Seeker,
}

/// Explicit identity passed into every lifecycle operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub tier: PremiumTier,
    pub kind: CallerKind,
}

impl Caller {
    pub fn from_user(user: &User) -> Result<Self, RecruitmentError> {
        if !user.enabled {
            return Err(RecruitmentError::unauthorized("This account is disabled."));
        }

        let kind = match user.role {
            Role::Admin => CallerKind::Admin,
            Role::JobSeeker => CallerKind::Seeker,
            Role::Employer => match user.company_name() {
                Some(name) if !name.trim().is_empty() => CallerKind::Employer {
                    company_name: name.to_string(),
                },
                _ => {
                    return Err(RecruitmentError::unauthorized(
                        "Your account is not associated with a company.",
                    ))
                }
            },
        };

        Ok(Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            tier: user.premium_tier,
            kind,
        })
    }

    pub fn entitlements(&self) -> Entitlements {
        self.tier.entitlements()
    }

    pub const fn role(&self) -> Role {
        match self.kind {
            CallerKind::Admin => Role::Admin,
            CallerKind::Employer { .. } => Role::Employer,
            CallerKind::Seeker => Role::JobSeeker,
        }
    }

    pub const fn sender_role(&self) -> SenderRole {
        match self.kind {
            CallerKind::Admin => SenderRole::Admin,
            CallerKind::Employer { .. } => SenderRole::Employer,
            CallerKind::Seeker => SenderRole::JobSeeker,
        }
    }

    pub fn require_admin(&self) -> Result<(), RecruitmentError> {
        match self.kind {
            CallerKind::Admin => Ok(()),
            _ => Err(RecruitmentError::unauthorized(
                "This action is restricted to administrators.",
            )),
        }
    }

    pub fn require_seeker(&self, denial: &str) -> Result<(), RecruitmentError> {
        match self.kind {
            CallerKind::Seeker => Ok(()),
            _ => Err(RecruitmentError::unauthorized(denial)),
        }
    }

    /// Company name of an employer caller.
    pub fn employer_company(&self) -> Result<&str, RecruitmentError> {
        match &self.kind {
            CallerKind::Employer { company_name } => Ok(company_name),
            _ => Err(RecruitmentError::unauthorized(
                "This action is restricted to employers.",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_never_reaches_hired_directly() {
        for from in ApplicationStatus::ALL {
            assert!(!from.can_transition_to(ApplicationStatus::Hired));
        }
        assert!(ApplicationStatus::Applied.can_transition_to(ApplicationStatus::Reviewed));
        assert!(ApplicationStatus::Reviewed.can_transition_to(ApplicationStatus::Accepted));
        assert!(!ApplicationStatus::Applied.can_transition_to(ApplicationStatus::Accepted));
        assert!(!ApplicationStatus::Hired.can_transition_to(ApplicationStatus::Rejected));
    }

    #[test]
    fn security_answer_ignores_case_and_whitespace() {
        let challenge = SecurityChallenge {
            question: SecurityQuestion::Pet,
            answer: "Rex".to_string(),
        };
        assert!(challenge.accepts(SecurityQuestion::Pet, "  rEX "));
        assert!(!challenge.accepts(SecurityQuestion::Car, "Rex"));
        assert!(!challenge.accepts(SecurityQuestion::Pet, "Max"));
    }

    #[test]
    fn blank_category_normalizes_to_none() {
        assert_eq!(normalize_category(Some("   ".to_string())), None);
        assert_eq!(
            normalize_category(Some(" IT ".to_string())),
            Some("IT".to_string())
        );
    }
}
