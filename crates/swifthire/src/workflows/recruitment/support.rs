use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::domain::{Caller, CallerKind, Role, User, UserId};
use super::error::RecruitmentError;
use super::messaging::{Message, SenderRole};
use super::notices;
use super::profile::SeekerProfile;
use super::repository::RecruitmentStore;

#[derive(Debug, Clone, Serialize)]
pub struct SupportThreadSummary {
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
    pub message_count: usize,
    pub last_message_at: Option<DateTime<Utc>>,
}

/// Support channel between a seeker or employer and the admins.
///
/// Seeker threads live on the seeker profile, employer threads on the user record.
pub struct SupportDesk<S> {
    store: Arc<S>,
}

impl<S> SupportDesk<S>
where
    S: RecruitmentStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Appends the caller's message. The first seeker message gets a bot acknowledgement.
    pub fn post(&self, caller: &Caller, body: &str) -> Result<Vec<Message>, RecruitmentError> {
        let message = Message::new(
            Some(caller.id),
            caller.first_name.as_str(),
            caller.last_name.as_str(),
            caller.sender_role(),
            body,
        );

        match caller.kind {
            CallerKind::Seeker => {
                let mut profile = self.seeker_profile(&caller.id)?;
                let first_contact = profile.support_log.is_empty();
                profile.support_log.append(message)?;
                if first_contact {
                    profile.support_log.append(Message::new(
                        None,
                        "Support",
                        "Bot",
                        SenderRole::SystemBot,
                        notices::SUPPORT_ACKNOWLEDGEMENT,
                    ))?;
                }
                self.store.save_profile(profile)?;
            }
            CallerKind::Employer { .. } => {
                let mut user = self.user(&caller.id)?;
                user.support_log.append(message)?;
                self.store.update_user(user)?;
            }
            CallerKind::Admin => {
                return Err(RecruitmentError::unauthorized(
                    "Admins reply to support threads from the admin inbox.",
                ))
            }
        }

        info!(user_id = %caller.id, role = caller.role().label(), "support message logged");
        self.thread(caller)
    }

    /// Caller's own thread with the synthetic welcome in front.
    pub fn thread(&self, caller: &Caller) -> Result<Vec<Message>, RecruitmentError> {
        match caller.kind {
            CallerKind::Seeker => {
                let log = self
                    .store
                    .fetch_profile(&caller.id)?
                    .map(|profile| profile.support_log)
                    .unwrap_or_default();
                Ok(log.with_greeting(support_greeting(notices::seeker_support_welcome(
                    &caller.first_name,
                ))))
            }
            CallerKind::Employer { .. } => {
                let user = self.user(&caller.id)?;
                Ok(user.support_log.with_greeting(support_greeting(
                    notices::EMPLOYER_SUPPORT_WELCOME.to_string(),
                )))
            }
            CallerKind::Admin => Err(RecruitmentError::unauthorized(
                "Admins do not have a personal support thread.",
            )),
        }
    }

    /// Stored messages only, without the greeting.
    pub fn admin_thread(
        &self,
        caller: &Caller,
        user_id: &UserId,
    ) -> Result<Vec<Message>, RecruitmentError> {
        caller.require_admin()?;
        let user = self.user(user_id)?;
        let messages = match user.role {
            Role::JobSeeker => self
                .store
                .fetch_profile(user_id)?
                .map(|profile| profile.support_log.entries().to_vec())
                .unwrap_or_default(),
            Role::Employer => user.support_log.entries().to_vec(),
            Role::Admin => {
                return Err(RecruitmentError::validation(
                    "Admin accounts have no support thread.",
                ))
            }
        };
        Ok(messages)
    }

    pub fn admin_reply(
        &self,
        caller: &Caller,
        user_id: &UserId,
        body: &str,
    ) -> Result<Vec<Message>, RecruitmentError> {
        caller.require_admin()?;
        let message = Message::new(Some(caller.id), "Admin", "Support", SenderRole::Admin, body);

        let mut user = self.user(user_id)?;
        match user.role {
            Role::JobSeeker => {
                let mut profile = self.seeker_profile(user_id)?;
                profile.support_log.append(message)?;
                self.store.save_profile(profile)?;
            }
            Role::Employer => {
                user.support_log.append(message)?;
                self.store.update_user(user)?;
            }
            Role::Admin => {
                return Err(RecruitmentError::validation(
                    "Admin accounts have no support thread.",
                ))
            }
        }

        info!(user_id = %user_id, "admin replied to support thread");
        self.admin_thread(caller, user_id)
    }

    /// Threads with at least one stored message, most recent first.
    pub fn inbox(&self, caller: &Caller) -> Result<Vec<SupportThreadSummary>, RecruitmentError> {
        caller.require_admin()?;

        let mut threads = Vec::new();
        for user in self.store.users_by_role(Role::Employer)? {
            if !user.support_log.is_empty() {
                threads.push(summary(&user, user.support_log.len(), user.support_log.last()));
            }
        }
        for user in self.store.users_by_role(Role::JobSeeker)? {
            if let Some(profile) = self.store.fetch_profile(&user.id)? {
                if !profile.support_log.is_empty() {
                    threads.push(summary(
                        &user,
                        profile.support_log.len(),
                        profile.support_log.last(),
                    ));
                }
            }
        }

        threads.sort_by(|left, right| right.last_message_at.cmp(&left.last_message_at));
        Ok(threads)
    }

    fn user(&self, user_id: &UserId) -> Result<User, RecruitmentError> {
        self.store
            .fetch_user(user_id)?
            .ok_or_else(|| RecruitmentError::not_found("User not found."))
    }

    fn seeker_profile(&self, user_id: &UserId) -> Result<SeekerProfile, RecruitmentError> {
        match self.store.fetch_profile(user_id)? {
            Some(profile) => Ok(profile),
            None => {
                let phone = self.user(user_id)?.phone_number;
                let mut profile = SeekerProfile::empty(*user_id);
                profile.refresh(phone.as_deref());
                Ok(profile)
            }
        }
    }
}

fn support_greeting(body: String) -> Message {
    Message::new(None, "Global", "Admin", SenderRole::Admin, body)
}

fn summary(user: &User, message_count: usize, last: Option<&Message>) -> SupportThreadSummary {
    SupportThreadSummary {
        user_id: user.id,
        name: user.full_name(),
        role: user.role,
        message_count,
        last_message_at: last.map(|message| message.created_at),
    }
}
