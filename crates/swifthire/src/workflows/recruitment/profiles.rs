use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::domain::{Caller, User, UserId};
use super::error::RecruitmentError;
use super::profile::{
    present, Education, EntryId, ProfileUpdate, SeekerProfile, WorkExperience,
};
use super::repository::{CandidateSearch, RecruitmentStore, WriteBatch};

#[derive(Debug, Clone, Serialize)]
pub struct CandidateSummary {
    pub user_id: UserId,
    pub name: String,
    pub current_title: Option<String>,
    pub headline: Option<String>,
    pub city: Option<String>,
    pub skills: Option<String>,
    pub completeness: u8,
    pub featured: bool,
}

/// Seeker profile edits and employer-side candidate search.
pub struct ProfileService<S> {
    store: Arc<S>,
}

impl<S> ProfileService<S>
where
    S: RecruitmentStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Stored profile, or a fresh unsaved one when the seeker has never edited it.
    pub fn profile(&self, caller: &Caller) -> Result<SeekerProfile, RecruitmentError> {
        caller.require_seeker("Only Job Seekers have a profile.")?;
        let (_, profile) = self.load(&caller.id)?;
        Ok(profile)
    }

    pub fn save_profile(
        &self,
        caller: &Caller,
        update: ProfileUpdate,
    ) -> Result<SeekerProfile, RecruitmentError> {
        caller.require_seeker("Only Job Seekers have a profile.")?;
        let (mut user, mut profile) = self.load(&caller.id)?;

        if let Some((first, last)) = update.split_name() {
            user.first_name = first;
            user.last_name = last;
        }
        user.phone_number = present(&update.phone_number);
        update.apply(&mut profile);
        profile.refresh(user.phone_number.as_deref());

        self.store.commit(WriteBatch {
            users: vec![user.clone()],
            profiles: vec![profile.clone()],
            ..WriteBatch::default()
        })?;
        info!(user_id = %user.id, completeness = profile.completeness, "profile saved");
        Ok(profile)
    }

    pub fn add_work(
        &self,
        caller: &Caller,
        entry: WorkExperience,
    ) -> Result<(EntryId, SeekerProfile), RecruitmentError> {
        caller.require_seeker("Only Job Seekers have a profile.")?;
        entry.validate()?;
        let (user, mut profile) = self.load(&caller.id)?;
        let id = profile.work_experience.add(entry);
        Ok((id, self.persist(&user, profile)?))
    }

    pub fn remove_work(
        &self,
        caller: &Caller,
        entry: EntryId,
    ) -> Result<SeekerProfile, RecruitmentError> {
        caller.require_seeker("Only Job Seekers have a profile.")?;
        let (user, mut profile) = self.load(&caller.id)?;
        profile
            .work_experience
            .remove(entry)
            .ok_or_else(|| RecruitmentError::not_found("Work experience entry not found."))?;
        self.persist(&user, profile)
    }

    pub fn add_education(
        &self,
        caller: &Caller,
        entry: Education,
    ) -> Result<(EntryId, SeekerProfile), RecruitmentError> {
        caller.require_seeker("Only Job Seekers have a profile.")?;
        entry.validate()?;
        let (user, mut profile) = self.load(&caller.id)?;
        let id = profile.education.add(entry);
        Ok((id, self.persist(&user, profile)?))
    }

    pub fn remove_education(
        &self,
        caller: &Caller,
        entry: EntryId,
    ) -> Result<SeekerProfile, RecruitmentError> {
        caller.require_seeker("Only Job Seekers have a profile.")?;
        let (user, mut profile) = self.load(&caller.id)?;
        profile
            .education
            .remove(entry)
            .ok_or_else(|| RecruitmentError::not_found("Education entry not found."))?;
        self.persist(&user, profile)
    }

    /// Records the stored filename of an uploaded resume.
    pub fn attach_resume(
        &self,
        caller: &Caller,
        filename: &str,
    ) -> Result<SeekerProfile, RecruitmentError> {
        caller.require_seeker("Only Job Seekers have a profile.")?;
        let filename = non_blank(filename, "Resume file reference is required.")?;
        let (user, mut profile) = self.load(&caller.id)?;
        profile.resume = Some(filename);
        self.persist(&user, profile)
    }

    pub fn attach_picture(
        &self,
        caller: &Caller,
        filename: &str,
    ) -> Result<SeekerProfile, RecruitmentError> {
        caller.require_seeker("Only Job Seekers have a profile.")?;
        let filename = non_blank(filename, "Profile picture reference is required.")?;
        let (user, mut profile) = self.load(&caller.id)?;
        profile.profile_picture = Some(filename);
        self.persist(&user, profile)
    }

    /// Filters apply only for tiers entitled to them; otherwise every profile is listed.
    pub fn search_candidates(
        &self,
        caller: &Caller,
        criteria: CandidateSearch,
    ) -> Result<Vec<CandidateSummary>, RecruitmentError> {
        caller.employer_company()?;
        let criteria = if caller.entitlements().candidate_search_filters {
            criteria
        } else {
            if !criteria.is_unfiltered() {
                debug!(caller_id = %caller.id, "candidate filters ignored for basic tier");
            }
            CandidateSearch::default()
        };

        let mut summaries = Vec::new();
        for profile in self.store.search_candidates(&criteria)? {
            let Some(user) = self.store.fetch_user(&profile.user_id)? else {
                continue;
            };
            if !user.enabled {
                continue;
            }
            summaries.push(CandidateSummary {
                user_id: user.id,
                name: user.full_name(),
                current_title: profile.current_title,
                headline: profile.headline,
                city: profile.city,
                skills: profile.skills,
                completeness: profile.completeness,
                featured: profile.featured,
            });
        }
        Ok(summaries)
    }

    fn load(&self, user_id: &UserId) -> Result<(User, SeekerProfile), RecruitmentError> {
        let user = self
            .store
            .fetch_user(user_id)?
            .ok_or_else(|| RecruitmentError::not_found("User not found."))?;
        let profile = match self.store.fetch_profile(user_id)? {
            Some(profile) => profile,
            None => {
                let mut profile = SeekerProfile::empty(*user_id);
                profile.refresh(user.phone_number.as_deref());
                profile
            }
        };
        Ok((user, profile))
    }

    fn persist(
        &self,
        user: &User,
        mut profile: SeekerProfile,
    ) -> Result<SeekerProfile, RecruitmentError> {
        profile.refresh(user.phone_number.as_deref());
        self.store.save_profile(profile.clone())?;
        info!(user_id = %user.id, completeness = profile.completeness, "profile updated");
        Ok(profile)
    }
}

fn non_blank(value: &str, message: &str) -> Result<String, RecruitmentError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RecruitmentError::validation(message));
    }
    Ok(value.to_string())
}
