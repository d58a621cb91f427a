//! Deterministic message bodies appended by the lifecycle managers.

use super::domain::ApplicationStatus;

pub const EXAM_SUBMITTED: &str = "I have completed and submitted the required application exam.";

pub const SUPPORT_ACKNOWLEDGEMENT: &str = "Thank you for contacting Support. Your message has been logged, and a live admin will review your inquiry shortly.";

pub const EMPLOYER_SUPPORT_WELCOME: &str = "Welcome to the Employer Support Chat. We're here to assist with any platform issues, job posting queries, or account management questions. Please submit your request below.";

pub fn application_receipt(seeker_first_name: &str, job_title: &str, company: &str) -> String {
    format!(
        "Hello {seeker_first_name},\n\nThank you for your application for the \"{job_title}\" position. We have successfully received it and our team will review it shortly.\n\nYou can track the status of your application here. We appreciate your interest in {company}."
    )
}

/// Notice for an employer-driven status change. `Applied` has no notice.
pub fn status_notice(status: ApplicationStatus, job_title: &str, company: &str) -> Option<String> {
    let body = match status {
        ApplicationStatus::Applied => return None,
        ApplicationStatus::Reviewed => format!(
            "We have reviewed your application for the {job_title} position and are currently considering it. We will let you know about the next steps."
        ),
        ApplicationStatus::Accepted => "Congratulations! We were impressed with your application and would like to move to the next step. You will receive an official email shortly detailing the next phase, which will include required documents and location details.".to_string(),
        ApplicationStatus::Rejected => format!(
            "Thank you for your interest in the {job_title} position. After careful consideration, we have decided to move forward with other candidates. We wish you the best in your job search."
        ),
        ApplicationStatus::Hired => format!(
            "Congratulations, you are hired for the {job_title} position! We are excited to welcome you to {company}. An official hiring package will be sent to your email address shortly."
        ),
    };
    Some(body)
}

pub fn direct_contact(seeker_first_name: &str) -> String {
    format!(
        "Hi {seeker_first_name}, we viewed your profile and would like to discuss an opportunity."
    )
}

pub fn seeker_support_welcome(first_name: &str) -> String {
    let name = if first_name.trim().is_empty() {
        "Seeker"
    } else {
        first_name.trim()
    };
    format!(
        "Welcome to SwiftHire, {name}!\n\nThis support chat is for any technical questions you have about your account, your profile, or platform issues.\n\n**Please note:** For questions about a *specific job or application*, please use the 'My Chats' feature to contact the employer directly.\n\nWe're here to help you succeed. Good luck!"
    )
}

pub fn held_job_notice(basic_cap: usize) -> String {
    format!(
        "Job saved but placed ON HOLD. You have reached the {basic_cap}-job limit for Basic accounts. Upgrade to Premium to activate this job."
    )
}

pub const JOB_SUBMITTED: &str = "Job posted successfully and awaiting admin approval!";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applied_status_has_no_notice() {
        assert!(status_notice(ApplicationStatus::Applied, "Engineer", "Acme").is_none());
    }

    #[test]
    fn hired_notice_names_title_and_company() {
        let body = status_notice(ApplicationStatus::Hired, "Engineer", "Acme").expect("notice");
        assert!(body.contains("hired for the Engineer position"));
        assert!(body.contains("welcome you to Acme"));
    }

    #[test]
    fn seeker_welcome_defaults_the_name() {
        assert!(seeker_support_welcome("").starts_with("Welcome to SwiftHire, Seeker!"));
        assert!(seeker_support_welcome("Grace").starts_with("Welcome to SwiftHire, Grace!"));
    }
}
