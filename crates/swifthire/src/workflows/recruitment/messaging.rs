use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::domain::UserId;
use super::error::RecruitmentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SenderRole {
    Admin,
    Employer,
    JobSeeker,
    SystemBot,
}

/// One sender-attributed entry in a chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub sender_id: Option<UserId>,
    pub sender_first_name: String,
    pub sender_last_name: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub sender_role: SenderRole,
}

impl Message {
    pub fn new(
        sender_id: Option<UserId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: SenderRole,
        body: impl Into<String>,
    ) -> Self {
        Self {
            sender_id,
            sender_first_name: first_name.into(),
            sender_last_name: last_name.into(),
            message: body.into(),
            created_at: Utc::now(),
            sender_role: role,
        }
    }

    /// Automated notice signed by the employer's hiring team.
    pub fn hiring_team(employer_id: UserId, company: &str, body: impl Into<String>) -> Self {
        Self::new(
            Some(employer_id),
            company,
            "Hiring Team",
            SenderRole::Employer,
            body,
        )
    }
}

/// Append-only ordered log owned by an application or a support channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChatLog(Vec<Message>);

impl ChatLog {
    /// Appends a message, trimming the body. Blank bodies are rejected and the log is unchanged.
    pub fn append(&mut self, mut message: Message) -> Result<(), RecruitmentError> {
        let body = message.message.trim();
        if body.is_empty() {
            return Err(RecruitmentError::validation("Message cannot be empty."));
        }
        message.message = body.to_string();
        self.0.push(message);
        Ok(())
    }

    pub fn entries(&self) -> &[Message] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.0.last()
    }

    /// Read view with a synthetic greeting in front. The greeting is never stored.
    pub fn with_greeting(&self, greeting: Message) -> Vec<Message> {
        std::iter::once(greeting).chain(self.0.iter().cloned()).collect()
    }

    /// Decodes a persisted text blob. Blank input is an empty log; malformed JSON is
    /// reported and treated as empty so a corrupt blob never blocks a thread.
    fn from_json_lossy(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Self::default();
        };

        match serde_json::from_str::<Vec<Message>>(raw) {
            Ok(messages) => Self(messages),
            Err(error) => {
                warn!(%error, "discarding malformed chat log");
                Self::default()
            }
        }
    }
}

/// Accepts the message array or the text-blob column older records carry.
impl<'de> Deserialize<'de> for ChatLog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Stored {
            Messages(Vec<Message>),
            Blob(Option<String>),
        }

        Ok(match Stored::deserialize(deserializer)? {
            Stored::Messages(messages) => Self(messages),
            Stored::Blob(raw) => Self::from_json_lossy(raw.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::recruitment::domain::{Application, ApplicationStatus, JobId};

    fn seeker_message(body: &str) -> Message {
        Message::new(
            Some(UserId::generate()),
            "Ada",
            "Lovelace",
            SenderRole::JobSeeker,
            body,
        )
    }

    #[test]
    fn append_rejects_blank_bodies() {
        let mut log = ChatLog::default();
        let err = log
            .append(seeker_message("   \n"))
            .expect_err("blank body refused");
        assert_eq!(err.to_string(), "Message cannot be empty.");
        assert!(log.is_empty());
    }

    #[test]
    fn append_preserves_order_and_trims() {
        let mut log = ChatLog::default();
        log.append(seeker_message(" first ")).expect("append");
        log.append(seeker_message("second")).expect("append");
        let bodies: Vec<_> = log.entries().iter().map(|m| m.message.as_str()).collect();
        assert_eq!(bodies, ["first", "second"]);
    }

    #[test]
    fn greeting_is_not_persisted() {
        let mut log = ChatLog::default();
        log.append(seeker_message("hello")).expect("append");
        let greeting = Message::new(None, "Global", "Admin", SenderRole::Admin, "Welcome");

        let view = log.with_greeting(greeting);
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].message, "Welcome");
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn serialized_log_uses_camel_case_fields() {
        let mut log = ChatLog::default();
        log.append(seeker_message("hi")).expect("append");
        let json = serde_json::to_string(&log).expect("serializes");
        assert!(json.contains("\"senderFirstName\":\"Ada\""));
        assert!(json.contains("\"senderRole\":\"JOB_SEEKER\""));

        let restored: ChatLog = serde_json::from_str(&json).expect("array decodes");
        assert_eq!(restored, log);
        let blob = serde_json::to_string(&json).expect("blob encodes");
        let restored: ChatLog = serde_json::from_str(&blob).expect("blob decodes");
        assert_eq!(restored, log);
    }

    #[test]
    fn malformed_blob_falls_back_to_empty_log() {
        for stored in [r#""{not json""#, r#""  ""#, "null"] {
            let log: ChatLog = serde_json::from_str(stored).expect("never fails");
            assert!(log.is_empty(), "{stored}");
        }
    }

    #[test]
    fn application_with_corrupt_thread_still_loads() {
        let mut application = Application::new(
            UserId::generate(),
            JobId::generate(),
            ApplicationStatus::Applied,
        );
        application
            .messages
            .append(seeker_message("hello"))
            .expect("append");
        let mut stored = serde_json::to_value(&application).expect("serializes");
        stored["messages"] = serde_json::Value::String("[{\"truncated".to_string());

        let loaded: Application = serde_json::from_value(stored).expect("loads");
        assert!(loaded.messages.is_empty());
        assert_eq!(loaded.id, application.id);
    }
}
