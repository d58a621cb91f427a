use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::domain::{
    Caller, CallerKind, CompanyProfile, Role, SecurityChallenge, SecurityQuestion, User, UserId,
};
use super::error::RecruitmentError;
use super::jobs::JobLifecycle;
use super::messaging::ChatLog;
use super::profile::{present, SeekerProfile};
use super::repository::{RecruitmentStore, RepositoryError, WriteBatch};
use super::tier::{PremiumTier, SubscriptionPlan};

const LOGIN_TAKEN: &str = "Username or Email already in use.";
const USER_NOT_FOUND: &str = "User not found.";

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub security_question: Option<SecurityQuestion>,
    #[serde(default)]
    pub security_answer: Option<String>,
}

/// Admin-side account edit.
#[derive(Debug, Clone, Deserialize)]
pub struct UserUpdate {
    pub role: Role,
    pub enabled: bool,
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutQuote {
    pub tier: PremiumTier,
    pub amount: String,
    pub description: &'static str,
    pub payment_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    pub tier: PremiumTier,
    pub released_jobs: usize,
    pub notice: String,
}

/// Registration, mock checkout, and admin account management.
pub struct AccountService<S> {
    store: Arc<S>,
    jobs: Arc<JobLifecycle<S>>,
}

impl<S> AccountService<S>
where
    S: RecruitmentStore + 'static,
{
    pub fn new(store: Arc<S>, jobs: Arc<JobLifecycle<S>>) -> Self {
        Self { store, jobs }
    }

    pub fn register(&self, registration: Registration) -> Result<User, RecruitmentError> {
        let username = registration.username.trim().to_string();
        let email = registration.email.trim().to_string();
        if username.is_empty() || email.is_empty() {
            return Err(RecruitmentError::validation(
                "Username and email are required.",
            ));
        }
        if self.store.login_taken(&username, &email)? {
            return Err(RecruitmentError::validation(LOGIN_TAKEN));
        }

        let security = match (registration.security_question, registration.security_answer) {
            (Some(question), Some(answer)) if !answer.trim().is_empty() => {
                Some(SecurityChallenge {
                    question,
                    answer: answer.trim().to_string(),
                })
            }
            _ => None,
        };

        let (company, enabled) = match registration.role {
            Role::Employer => {
                let name = present(&registration.company_name).ok_or_else(|| {
                    RecruitmentError::validation("Company name is required for employers.")
                })?;
                (Some(CompanyProfile::named(&name)), true)
            }
            Role::JobSeeker => (None, true),
            Role::Admin => (None, false),
        };

        let user = User {
            id: UserId::generate(),
            username,
            email,
            first_name: registration.first_name.trim().to_string(),
            last_name: registration.last_name.trim().to_string(),
            phone_number: present(&registration.phone_number),
            role: registration.role,
            enabled,
            premium_tier: PremiumTier::Basic,
            company,
            security,
            support_log: ChatLog::default(),
            created_at: Utc::now(),
        };

        let user = match self.store.insert_user(user) {
            Ok(user) => user,
            Err(RepositoryError::Conflict) => return Err(RecruitmentError::validation(LOGIN_TAKEN)),
            Err(other) => return Err(other.into()),
        };

        if user.role == Role::JobSeeker {
            let mut profile = SeekerProfile::empty(user.id);
            profile.refresh(user.phone_number.as_deref());
            self.store.save_profile(profile)?;
        }

        info!(user_id = %user.id, role = user.role.label(), enabled, "account registered");
        Ok(user)
    }

    pub fn checkout_quote(
        &self,
        caller: &Caller,
        tier: &str,
    ) -> Result<CheckoutQuote, RecruitmentError> {
        let plan = subscription_plan(caller, tier)?;
        Ok(CheckoutQuote {
            tier: plan.tier,
            amount: plan.display_amount(),
            description: plan.description,
            payment_id: format!("mock-{}", Uuid::new_v4().simple()),
        })
    }

    /// Applies the tier without payment. Employers get held postings released,
    /// seekers get a featured profile.
    pub fn complete_checkout(
        &self,
        caller: &Caller,
        tier: &str,
    ) -> Result<CheckoutReceipt, RecruitmentError> {
        let plan = subscription_plan(caller, tier)?;
        let mut user = self.user(&caller.id)?;
        user.premium_tier = plan.tier;

        let mut batch = WriteBatch::default();
        match caller.kind {
            CallerKind::Employer { .. } => {
                batch.jobs = self.jobs.held_jobs_released(&caller.id)?;
            }
            CallerKind::Seeker => {
                let mut profile = match self.store.fetch_profile(&caller.id)? {
                    Some(profile) => profile,
                    None => SeekerProfile::empty(caller.id),
                };
                profile.featured = true;
                profile.refresh(user.phone_number.as_deref());
                batch.profiles.push(profile);
            }
            CallerKind::Admin => {}
        }
        let released_jobs = batch.jobs.len();
        batch.users.push(user);
        self.store.commit(batch)?;

        let mut notice = format!(
            "Upgrade successful! Your account is now {}.",
            plan.tier.label()
        );
        if released_jobs > 0 {
            notice.push_str(&format!(
                " {released_jobs} previously held job(s) have been submitted for Admin approval."
            ));
        }

        info!(user_id = %caller.id, tier = plan.tier.label(), released_jobs, "subscription upgraded");
        Ok(CheckoutReceipt {
            tier: plan.tier,
            released_jobs,
            notice,
        })
    }

    /// Admin role and enabled-flag edit. Keeps company fields in step with the role.
    pub fn update_user(
        &self,
        caller: &Caller,
        user_id: &UserId,
        update: UserUpdate,
    ) -> Result<User, RecruitmentError> {
        caller.require_admin()?;
        let mut user = self.user(user_id)?;
        let previous = user.role;

        match update.role {
            Role::Employer => {
                let name = present(&update.company_name)
                    .or_else(|| user.company_name().map(str::to_string))
                    .filter(|name| !name.trim().is_empty())
                    .ok_or_else(|| {
                        RecruitmentError::validation("Company name is required for employers.")
                    })?;
                user.company = match user.company.take() {
                    Some(mut company) => {
                        company.name = name;
                        Some(company)
                    }
                    None => Some(CompanyProfile::named(&name)),
                };
                if previous == Role::JobSeeker {
                    self.store.delete_profile(user_id)?;
                }
            }
            Role::JobSeeker | Role::Admin => {
                user.company = None;
            }
        }

        user.role = update.role;
        user.enabled = update.enabled;
        self.store.update_user(user.clone())?;

        if user.role == Role::JobSeeker && self.store.fetch_profile(user_id)?.is_none() {
            let mut profile = SeekerProfile::empty(user.id);
            profile.refresh(user.phone_number.as_deref());
            self.store.save_profile(profile)?;
        }

        info!(
            user_id = %user.id,
            from = previous.label(),
            to = user.role.label(),
            enabled = user.enabled,
            "account updated by admin"
        );
        Ok(user)
    }

    pub fn list_users(&self, caller: &Caller, role: Role) -> Result<Vec<User>, RecruitmentError> {
        caller.require_admin()?;
        Ok(self.store.users_by_role(role)?)
    }

    pub fn security_question(&self, username: &str) -> Result<SecurityQuestion, RecruitmentError> {
        self.store
            .find_by_username(username)?
            .and_then(|user| user.security.map(|challenge| challenge.question))
            .ok_or_else(|| {
                RecruitmentError::not_found("No security question is set for this account.")
            })
    }

    /// Answer comparison ignores case and surrounding whitespace.
    pub fn verify_security_answer(
        &self,
        username: &str,
        question: SecurityQuestion,
        answer: &str,
    ) -> Result<bool, RecruitmentError> {
        let user = self
            .store
            .find_by_username(username)?
            .ok_or_else(|| RecruitmentError::not_found(USER_NOT_FOUND))?;

        let accepted = user
            .security
            .as_ref()
            .is_some_and(|challenge| challenge.accepts(question, answer));
        if !accepted {
            warn!(user_id = %user.id, "security answer rejected");
        }
        Ok(accepted)
    }

    pub fn update_company(
        &self,
        caller: &Caller,
        update: CompanyUpdate,
    ) -> Result<User, RecruitmentError> {
        caller.employer_company()?;
        let mut user = self.user(&caller.id)?;
        let Some(company) = user.company.as_mut() else {
            return Err(RecruitmentError::unauthorized(
                "Your account is not associated with a company.",
            ));
        };

        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(RecruitmentError::validation("Company name cannot be empty."));
            }
            company.name = name.to_string();
        }
        if let Some(description) = present(&update.description) {
            company.description = description;
        }
        if let Some(location) = present(&update.location) {
            company.location = location;
        }
        if let Some(logo) = present(&update.logo) {
            company.logo = Some(logo);
        }

        self.store.update_user(user.clone())?;
        Ok(user)
    }

    fn user(&self, user_id: &UserId) -> Result<User, RecruitmentError> {
        self.store
            .fetch_user(user_id)?
            .ok_or_else(|| RecruitmentError::not_found(USER_NOT_FOUND))
    }
}

fn subscription_plan(caller: &Caller, tier: &str) -> Result<SubscriptionPlan, RecruitmentError> {
    if caller.kind == CallerKind::Admin {
        return Err(RecruitmentError::unauthorized(
            "Subscriptions are available to employers and job seekers.",
        ));
    }
    PremiumTier::parse_paid(tier)
        .and_then(PremiumTier::plan)
        .ok_or_else(|| RecruitmentError::validation("Invalid subscription tier selected."))
}
