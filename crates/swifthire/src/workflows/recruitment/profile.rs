use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::UserId;
use super::error::RecruitmentError;
use super::messaging::ChatLog;

/// Identifier for a single work or education entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub Uuid);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<T> {
    pub id: EntryId,
    #[serde(flatten)]
    pub value: T,
}

/// Ordered sequence whose items carry generated ids for individual removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryList<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for EntryList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> EntryList<T> {
    pub fn add(&mut self, value: T) -> EntryId {
        let id = EntryId(Uuid::new_v4());
        self.entries.push(Entry { id, value });
        id
    }

    pub fn remove(&mut self, id: EntryId) -> Option<T> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index).value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl WorkExperience {
    pub(crate) fn validate(&self) -> Result<(), RecruitmentError> {
        if self.title.trim().is_empty() || self.company.trim().is_empty() {
            return Err(RecruitmentError::validation(
                "Job title and company are required.",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub graduation_year: Option<u16>,
}

impl Education {
    pub(crate) fn validate(&self) -> Result<(), RecruitmentError> {
        if self.institution.trim().is_empty() || self.degree.trim().is_empty() {
            return Err(RecruitmentError::validation(
                "Institution and degree are required.",
            ));
        }
        Ok(())
    }
}

/// Seeker-owned profile. `completeness` is recomputed on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeekerProfile {
    pub user_id: UserId,
    pub current_title: Option<String>,
    pub headline: Option<String>,
    pub city: Option<String>,
    pub preferred_location: Option<String>,
    pub skills: Option<String>,
    pub years_experience: Option<u8>,
    pub job_type_preference: Option<String>,
    pub expected_salary: Option<u32>,
    pub offering_services: bool,
    pub resume: Option<String>,
    pub profile_picture: Option<String>,
    pub work_experience: EntryList<WorkExperience>,
    pub education: EntryList<Education>,
    #[serde(default, skip_serializing)]
    pub support_log: ChatLog,
    pub completeness: u8,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SeekerProfile {
    pub fn empty(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            current_title: None,
            headline: None,
            city: None,
            preferred_location: None,
            skills: None,
            years_experience: None,
            job_type_preference: None,
            expected_salary: None,
            offering_services: false,
            resume: None,
            profile_picture: None,
            work_experience: EntryList::default(),
            education: EntryList::default(),
            support_log: ChatLog::default(),
            completeness: 0,
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Recomputes the completeness score against the owner's phone number.
    pub fn refresh(&mut self, phone_number: Option<&str>) {
        self.completeness = score_completeness(self, phone_number);
        self.updated_at = Utc::now();
    }

    /// Plain-text summary handed to the assistant.
    pub fn summary_text(&self) -> String {
        format!(
            "Title: {}, Skills: {}, Experience: {} years, Headline: {}",
            self.current_title.as_deref().unwrap_or("N/A"),
            self.skills.as_deref().unwrap_or("N/A"),
            self.years_experience.unwrap_or(0),
            self.headline.as_deref().unwrap_or("N/A"),
        )
    }
}

/// Profile form fields. The full name is split on the first space into first and last names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub preferred_location: Option<String>,
    #[serde(default)]
    pub current_title: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub years_experience: Option<u8>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub job_type_preference: Option<String>,
    #[serde(default)]
    pub expected_salary: Option<u32>,
    #[serde(default)]
    pub offering_services: bool,
}

impl ProfileUpdate {
    pub fn split_name(&self) -> Option<(String, String)> {
        let full = self.full_name.as_deref()?.trim();
        if full.is_empty() {
            return None;
        }
        match full.split_once(' ') {
            Some((first, last)) => Some((first.to_string(), last.trim().to_string())),
            None => Some((full.to_string(), String::new())),
        }
    }

    pub(crate) fn apply(&self, profile: &mut SeekerProfile) {
        profile.city = present(&self.city);
        profile.preferred_location = present(&self.preferred_location);
        profile.current_title = present(&self.current_title);
        profile.headline = present(&self.headline);
        profile.years_experience = self.years_experience;
        profile.skills = present(&self.skills);
        profile.job_type_preference = present(&self.job_type_preference);
        profile.expected_salary = self.expected_salary;
        profile.offering_services = self.offering_services;
    }
}

pub(crate) fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn filled(value: Option<&str>) -> bool {
    value.is_some_and(|value| !value.trim().is_empty())
}

/// Weighted presence score in `0..=100`.
pub fn score_completeness(profile: &SeekerProfile, phone_number: Option<&str>) -> u8 {
    let weights = [
        (filled(profile.current_title.as_deref()), 10u8),
        (filled(profile.headline.as_deref()), 10),
        (filled(phone_number), 10),
        (filled(profile.city.as_deref()), 10),
        (filled(profile.skills.as_deref()), 20),
        (filled(profile.resume.as_deref()), 20),
        (!profile.work_experience.is_empty(), 10),
        (!profile.education.is_empty(), 10),
    ];

    let total: u16 = weights
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, weight)| u16::from(*weight))
        .sum();
    total.min(100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_profile() -> SeekerProfile {
        let mut profile = SeekerProfile::empty(UserId::generate());
        profile.current_title = Some("Backend Engineer".to_string());
        profile.headline = Some("Rust and distributed systems".to_string());
        profile.city = Some("Lisbon".to_string());
        profile.skills = Some("Rust, Tokio, SQL".to_string());
        profile.resume = Some("resume-1.pdf".to_string());
        profile.work_experience.add(WorkExperience {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            start_date: None,
            end_date: None,
            description: None,
        });
        profile.education.add(Education {
            institution: "IST".to_string(),
            degree: "MSc".to_string(),
            field_of_study: None,
            graduation_year: Some(2019),
        });
        profile
    }

    #[test]
    fn empty_profile_scores_zero() {
        let profile = SeekerProfile::empty(UserId::generate());
        assert_eq!(score_completeness(&profile, None), 0);
    }

    #[test]
    fn full_profile_scores_one_hundred() {
        let profile = complete_profile();
        assert_eq!(score_completeness(&profile, Some("+351 900")), 100);
    }

    #[test]
    fn blank_fields_do_not_count() {
        let mut profile = complete_profile();
        profile.skills = Some("   ".to_string());
        assert_eq!(score_completeness(&profile, Some(" ")), 70);
    }

    #[test]
    fn each_weight_is_applied_exactly() {
        let mut profile = SeekerProfile::empty(UserId::generate());
        profile.resume = Some("cv.pdf".to_string());
        assert_eq!(score_completeness(&profile, None), 20);
        profile.city = Some("Porto".to_string());
        assert_eq!(score_completeness(&profile, None), 30);
        assert_eq!(score_completeness(&profile, Some("123")), 40);
    }

    #[test]
    fn refresh_is_idempotent() {
        let mut profile = complete_profile();
        profile.refresh(None);
        let first = profile.completeness;
        profile.refresh(None);
        assert_eq!(first, 90);
        assert_eq!(profile.completeness, first);
    }

    #[test]
    fn removing_last_entry_drops_the_list_weight() {
        let mut profile = SeekerProfile::empty(UserId::generate());
        let id = profile.education.add(Education {
            institution: "IST".to_string(),
            degree: "BSc".to_string(),
            field_of_study: None,
            graduation_year: None,
        });
        profile.refresh(None);
        assert_eq!(profile.completeness, 10);

        assert!(profile.education.remove(id).is_some());
        assert!(profile.education.remove(id).is_none());
        profile.refresh(None);
        assert_eq!(profile.completeness, 0);
    }

    #[test]
    fn full_name_splits_on_first_space() {
        let update = ProfileUpdate {
            full_name: Some("Mary Ann Smith".to_string()),
            ..ProfileUpdate::default()
        };
        assert_eq!(
            update.split_name(),
            Some(("Mary".to_string(), "Ann Smith".to_string()))
        );

        let single = ProfileUpdate {
            full_name: Some("Cher".to_string()),
            ..ProfileUpdate::default()
        };
        assert_eq!(single.split_name(), Some(("Cher".to_string(), String::new())));
    }
}
