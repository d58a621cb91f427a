use super::common::*;
use crate::workflows::recruitment::profile::{Education, ProfileUpdate, WorkExperience};
use crate::workflows::recruitment::repository::{CandidateSearch, ProfileRepository, UserRepository};
use crate::workflows::recruitment::tier::PremiumTier;
use crate::workflows::recruitment::RecruitmentError;

#[test]
fn saving_the_form_splits_the_name_and_rescores() {
    let fixture = build_fixture();
    let seeker = seeker(&fixture, "ana", PremiumTier::Basic);

    let profile = fixture
        .service
        .profiles()
        .save_profile(
            &seeker,
            ProfileUpdate {
                full_name: Some("Ana Maria Souza".to_string()),
                phone_number: Some(" 555-0199 ".to_string()),
                city: Some("Austin".to_string()),
                skills: Some("Go, Kubernetes".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .expect("saved");
    assert_eq!(profile.completeness, 40);

    let user = fixture
        .store
        .fetch_user(&seeker.id)
        .expect("load")
        .expect("user");
    assert_eq!(user.first_name, "Ana");
    assert_eq!(user.last_name, "Maria Souza");
    assert_eq!(user.phone_number.as_deref(), Some("555-0199"));
}

#[test]
fn refused_profile_save_keeps_user_and_profile_in_step() {
    let fixture = build_fixture();
    let seeker = seeker(&fixture, "ana", PremiumTier::Basic);
    complete_profile(&fixture, &seeker);

    let flaky = flaky_service(&fixture, 0);
    let error = flaky
        .profiles()
        .save_profile(
            &seeker,
            ProfileUpdate {
                full_name: Some("Ana Souza".to_string()),
                phone_number: Some("555-0142".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .expect_err("write refused");
    assert!(matches!(error, RecruitmentError::Repository(_)));

    let user = fixture
        .store
        .fetch_user(&seeker.id)
        .expect("load")
        .expect("user");
    assert_eq!(user.first_name, "Alex");
    assert_eq!(user.phone_number.as_deref(), Some("555-0100"));
    let profile = fixture
        .store
        .fetch_profile(&seeker.id)
        .expect("load")
        .expect("profile");
    assert_eq!(profile.completeness, 100);
}

#[test]
fn clearing_a_field_lowers_the_score() {
    let fixture = build_fixture();
    let seeker = seeker(&fixture, "ana", PremiumTier::Basic);
    complete_profile(&fixture, &seeker);
    let profiles = fixture.service.profiles();
    assert_eq!(profiles.profile(&seeker).expect("profile").completeness, 100);

    let profile = profiles
        .save_profile(
            &seeker,
            ProfileUpdate {
                phone_number: Some("555-0100".to_string()),
                city: Some("Denver".to_string()),
                current_title: Some("Backend Engineer".to_string()),
                headline: Some("Rust services".to_string()),
                skills: Some("   ".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .expect("saved");
    assert_eq!(profile.skills, None);
    assert_eq!(profile.completeness, 80);
}

#[test]
fn work_and_education_entries_are_addressable() {
    let fixture = build_fixture();
    let seeker = seeker(&fixture, "ana", PremiumTier::Basic);
    let profiles = fixture.service.profiles();

    let (work_id, profile) = profiles
        .add_work(
            &seeker,
            WorkExperience {
                title: "Analyst".to_string(),
                company: "Globex".to_string(),
                start_date: None,
                end_date: None,
                description: None,
            },
        )
        .expect("work added");
    assert_eq!(profile.completeness, 10);

    let (education_id, profile) = profiles
        .add_education(
            &seeker,
            Education {
                institution: "City College".to_string(),
                degree: "BA".to_string(),
                field_of_study: None,
                graduation_year: None,
            },
        )
        .expect("education added");
    assert_eq!(profile.completeness, 20);

    let profile = profiles.remove_work(&seeker, work_id).expect("removed");
    assert!(profile.work_experience.is_empty());
    assert_eq!(profile.completeness, 10);

    let error = profiles
        .remove_work(&seeker, work_id)
        .expect_err("already gone");
    assert!(matches!(error, RecruitmentError::NotFound(_)));

    let profile = profiles
        .remove_education(&seeker, education_id)
        .expect("removed");
    assert_eq!(profile.completeness, 0);
}

#[test]
fn incomplete_entries_are_refused() {
    let fixture = build_fixture();
    let seeker = seeker(&fixture, "ana", PremiumTier::Basic);

    let error = fixture
        .service
        .profiles()
        .add_work(
            &seeker,
            WorkExperience {
                title: "Analyst".to_string(),
                company: " ".to_string(),
                start_date: None,
                end_date: None,
                description: None,
            },
        )
        .expect_err("company missing");
    assert_eq!(error.to_string(), "Job title and company are required.");
}

#[test]
fn resume_and_picture_are_stored_by_reference() {
    let fixture = build_fixture();
    let seeker = seeker(&fixture, "ana", PremiumTier::Basic);
    let profiles = fixture.service.profiles();

    let profile = profiles
        .attach_resume(&seeker, "resume-ana.pdf")
        .expect("resume");
    assert_eq!(profile.resume.as_deref(), Some("resume-ana.pdf"));
    assert_eq!(profile.completeness, 20);

    let profile = profiles
        .attach_picture(&seeker, "ana.png")
        .expect("picture");
    assert_eq!(profile.profile_picture.as_deref(), Some("ana.png"));
    assert_eq!(profile.completeness, 20);

    assert!(profiles.attach_resume(&seeker, "").is_err());
}

#[test]
fn profile_operations_are_seeker_only() {
    let fixture = build_fixture();
    let employer = employer(&fixture, "acme", "Acme", PremiumTier::Basic);

    let error = fixture
        .service
        .profiles()
        .profile(&employer)
        .expect_err("employer has no profile");
    assert!(matches!(error, RecruitmentError::Unauthorized(_)));
}

#[test]
fn candidate_filters_need_a_paid_tier() {
    let fixture = build_fixture();
    let basic = employer(&fixture, "acme", "Acme", PremiumTier::Basic);
    let premium = employer(&fixture, "globex", "Globex", PremiumTier::Premium);
    let rust_dev = seeker(&fixture, "ana", PremiumTier::Basic);
    complete_profile(&fixture, &rust_dev);
    seeker(&fixture, "ben", PremiumTier::Basic);

    let criteria = CandidateSearch {
        skills: Some("rust".to_string()),
        city: Some("denver".to_string()),
        title: None,
    };

    let unfiltered = fixture
        .service
        .profiles()
        .search_candidates(&basic, criteria.clone())
        .expect("basic search");
    assert_eq!(unfiltered.len(), 2);

    let filtered = fixture
        .service
        .profiles()
        .search_candidates(&premium, criteria)
        .expect("premium search");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].user_id, rust_dev.id);
    assert_eq!(filtered[0].completeness, 100);
}

#[test]
fn disabled_candidates_are_hidden() {
    let fixture = build_fixture();
    let employer = employer(&fixture, "acme", "Acme", PremiumTier::Pro);
    let seeker = seeker(&fixture, "ana", PremiumTier::Basic);

    let mut user = fixture
        .store
        .fetch_user(&seeker.id)
        .expect("load")
        .expect("user");
    user.enabled = false;
    fixture.store.update_user(user).expect("disabled");

    let found = fixture
        .service
        .profiles()
        .search_candidates(&employer, CandidateSearch::default())
        .expect("search");
    assert!(found.is_empty());
}
