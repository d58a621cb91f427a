use super::common::*;
use crate::workflows::recruitment::messaging::SenderRole;
use crate::workflows::recruitment::notices;
use crate::workflows::recruitment::repository::{ProfileRepository, UserRepository};
use crate::workflows::recruitment::tier::PremiumTier;
use crate::workflows::recruitment::RecruitmentError;

#[test]
fn first_seeker_message_gets_one_bot_acknowledgement() {
    let fixture = build_fixture();
    let seeker = seeker(&fixture, "ana", PremiumTier::Basic);
    let support = fixture.service.support();

    support.post(&seeker, "My resume upload fails.").expect("first");
    support.post(&seeker, "Still failing.").expect("second");

    let stored = fixture
        .store
        .fetch_profile(&seeker.id)
        .expect("load")
        .expect("profile")
        .support_log;
    let bodies: Vec<&str> = stored
        .entries()
        .iter()
        .map(|message| message.message.as_str())
        .collect();
    assert_eq!(
        bodies,
        vec![
            "My resume upload fails.",
            notices::SUPPORT_ACKNOWLEDGEMENT,
            "Still failing.",
        ]
    );
    assert_eq!(stored.entries()[1].sender_role, SenderRole::SystemBot);
}

#[test]
fn greeting_is_prepended_on_read_but_never_stored() {
    let fixture = build_fixture();
    let seeker = seeker(&fixture, "ana", PremiumTier::Basic);
    let support = fixture.service.support();

    let empty = support.thread(&seeker).expect("thread");
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].message, notices::seeker_support_welcome("Alex"));

    support.post(&seeker, "Hello").expect("post");
    let first_read = support.thread(&seeker).expect("thread");
    let second_read = support.thread(&seeker).expect("thread");
    assert_eq!(first_read.len(), 3);
    assert_eq!(second_read.len(), 3);

    let stored = fixture
        .store
        .fetch_profile(&seeker.id)
        .expect("load")
        .expect("profile")
        .support_log;
    assert_eq!(stored.len(), 2);
}

#[test]
fn employer_support_lives_on_the_account() {
    let fixture = build_fixture();
    let employer = employer(&fixture, "acme", "Acme", PremiumTier::Basic);
    let support = fixture.service.support();

    let thread = support.post(&employer, "Need an invoice.").expect("post");
    assert_eq!(thread[0].message, notices::EMPLOYER_SUPPORT_WELCOME);
    assert_eq!(thread.len(), 2);

    let user = fixture
        .store
        .fetch_user(&employer.id)
        .expect("load")
        .expect("user");
    assert_eq!(user.support_log.len(), 1);
}

#[test]
fn admin_replies_and_sees_the_inbox() {
    let fixture = build_fixture();
    let admin = admin(&fixture);
    let seeker = seeker(&fixture, "ana", PremiumTier::Basic);
    let employer = employer(&fixture, "acme", "Acme", PremiumTier::Basic);
    let support = fixture.service.support();

    support.post(&seeker, "Hello").expect("seeker post");
    support.post(&employer, "Hi").expect("employer post");

    let inbox = support.inbox(&admin).expect("inbox");
    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox[0].user_id, employer.id);

    let thread = support
        .admin_reply(&admin, &seeker.id, "We are looking into it.")
        .expect("reply");
    assert_eq!(thread.len(), 3);
    let reply = thread.last().expect("reply");
    assert_eq!(reply.sender_first_name, "Admin");
    assert_eq!(reply.sender_last_name, "Support");
    assert_eq!(reply.sender_role, SenderRole::Admin);

    assert!(matches!(
        support.inbox(&seeker),
        Err(RecruitmentError::Unauthorized(_))
    ));
}

#[test]
fn blank_support_messages_are_rejected() {
    let fixture = build_fixture();
    let seeker = seeker(&fixture, "ana", PremiumTier::Basic);

    let error = fixture
        .service
        .support()
        .post(&seeker, "  ")
        .expect_err("blank");
    assert_eq!(error.to_string(), "Message cannot be empty.");
    assert!(fixture
        .store
        .fetch_profile(&seeker.id)
        .expect("load")
        .expect("profile")
        .support_log
        .is_empty());
}
