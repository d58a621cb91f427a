use crate::infra::{build_service, parse_tier, ApiService};
use chrono::{Duration, Local, NaiveTime, Utc};
use clap::Args;
use serde_json::json;
use swifthire::config::AppConfig;
use swifthire::error::AppError;
use swifthire::workflows::recruitment::{
    ApplicationStatus, Caller, Education, ExamAssignment, JobDraft, OfferDetails, PremiumTier,
    ProfileUpdate, RecruitmentError, Registration, Role, UserRepository, WorkExperience,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Subscription tier for the demo employer (BASIC, PREMIUM or PRO).
    #[arg(long, value_parser = parse_tier, default_value = "basic")]
    pub(crate) employer_tier: PremiumTier,
    /// Subscription tier for the demo job seeker.
    #[arg(long, value_parser = parse_tier, default_value = "premium")]
    pub(crate) seeker_tier: PremiumTier,
    /// Number of postings the employer submits. Basic accounts hold anything past the cap.
    #[arg(long, default_value_t = 6)]
    pub(crate) postings: usize,
    /// Skip the assistant match-score step.
    #[arg(long)]
    pub(crate) skip_assistant: bool,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config);

    println!("SwiftHire hiring scenario");
    let admin = demo_account(&service, "admin", Role::Admin, None, PremiumTier::Basic)?;
    let employer = demo_account(
        &service,
        "northwind",
        Role::Employer,
        Some("Northwind Traders"),
        args.employer_tier,
    )?;
    let seeker = demo_account(
        &service,
        "casey",
        Role::JobSeeker,
        None,
        args.seeker_tier,
    )?;
    println!(
        "- Accounts: admin, employer Northwind Traders ({}), seeker Casey ({})",
        employer.tier.label(),
        seeker.tier.label()
    );

    let jobs = service.jobs();
    let mut first_job = None;
    for index in 0..args.postings.max(1) {
        let posted = jobs.post(&employer, demo_draft(index))?;
        println!(
            "- Posted '{}' -> {} {}",
            posted.job.title,
            posted.job.status.label(),
            if posted.held { "(held)" } else { "" }
        );
        if !posted.held {
            let decision = jobs.approve(&admin, &posted.job.id)?;
            if first_job.is_none() {
                first_job = Some(decision.job);
            }
        }
    }
    let Some(job) = first_job else {
        println!("  No posting reached approval; nothing to apply to.");
        return Ok(());
    };

    build_demo_profile(&service, &seeker)?;
    let profile = service.profiles().profile(&seeker)?;
    println!("- Seeker profile completeness: {}%", profile.completeness);

    let applications = service.applications();
    let application = applications.apply(&seeker, &job.id)?;
    println!(
        "- Casey applied to '{}' -> {}",
        job.title,
        application.status.label()
    );

    applications.assign_exam(
        &employer,
        &application.id,
        ExamAssignment {
            questions: json!([
                { "question": "How would you reduce stockouts across regional warehouses?" },
                { "question": "Which metrics would you report weekly?" }
            ]),
            answers_template: None,
        },
    )?;
    let answers = json!([
        { "question": 1, "answer": "Rebalance safety stock using demand forecasts." },
        { "question": 2, "answer": "Fill rate, turns, and backorder age." }
    ]);
    let reviewed = applications.submit_exam(&seeker, &application.id, &answers.to_string())?;
    println!("- Exam submitted -> {}", reviewed.status.label());
    applications.score_exam(&employer, &application.id, 86)?;

    let accepted =
        applications.update_status(&employer, &application.id, ApplicationStatus::Accepted)?;
    println!("- Employer accepted -> {}", accepted.status.label());

    let start_date = Local::now().date_naive() + Duration::days(21);
    let start_time = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default();
    let hired = applications.send_offer(
        &employer,
        &application.id,
        OfferDetails {
            start_date,
            start_time,
            location: "Northwind HQ, Portland".to_string(),
            required_papers: "Government ID, signed offer letter".to_string(),
        },
    )?;
    println!("- Offer sent -> {}", hired.status.label());

    println!("\nApplication thread");
    for message in applications.messages(&seeker, &application.id)? {
        println!(
            "  [{}] {} {}: {}",
            message.created_at.format("%H:%M:%S"),
            message.sender_first_name,
            message.sender_last_name,
            message.message.lines().next().unwrap_or_default()
        );
    }

    if !args.skip_assistant {
        match service.match_score(&seeker, &job.id).await {
            Ok(analysis) => println!(
                "\nMatch score: {} ({})",
                analysis.score, analysis.reasoning
            ),
            Err(err) => println!("\nMatch score unavailable: {err}"),
        }
    }

    let overview = jobs.admin_overview(&admin, Utc::now())?;
    match serde_json::to_string_pretty(&overview.this_month) {
        Ok(json) => println!("\nAdmin activity this month:\n{json}"),
        Err(err) => println!("\nAdmin activity unavailable: {err}"),
    }

    Ok(())
}

fn demo_account(
    service: &ApiService,
    username: &str,
    role: Role,
    company: Option<&str>,
    tier: PremiumTier,
) -> Result<Caller, AppError> {
    let (first_name, last_name) = match role {
        Role::Admin => ("Platform", "Admin"),
        Role::Employer => ("Jamie", "Ortiz"),
        Role::JobSeeker => ("Casey", "Morgan"),
    };
    let mut user = service.accounts().register(Registration {
        username: username.to_string(),
        email: format!("{username}@swifthire.test"),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        phone_number: Some("555-0123".to_string()),
        role,
        company_name: company.map(str::to_string),
        security_question: None,
        security_answer: None,
    })?;
    user.enabled = true;
    user.premium_tier = tier;
    service
        .store()
        .update_user(user.clone())
        .map_err(RecruitmentError::from)?;
    Ok(service.caller(&user.id)?)
}

fn demo_draft(index: usize) -> JobDraft {
    let titles = [
        "Supply Chain Analyst",
        "Warehouse Operations Lead",
        "Procurement Specialist",
        "Logistics Coordinator",
        "Inventory Planner",
        "Fleet Manager",
    ];
    let title = titles[index % titles.len()];
    JobDraft {
        title: title.to_string(),
        description: format!("Northwind Traders is hiring a {title} to keep goods moving."),
        required_skills: "Forecasting, SQL, Excel".to_string(),
        location_city: Some("Portland".to_string()),
        job_type: Some("Full-time".to_string()),
        category: Some("Operations".to_string()),
        salary_min: Some(65_000),
        salary_max: Some(85_000),
        remote_option: Some("On-site".to_string()),
    }
}

fn build_demo_profile(service: &ApiService, seeker: &Caller) -> Result<(), AppError> {
    let profiles = service.profiles();
    profiles.save_profile(
        seeker,
        ProfileUpdate {
            full_name: Some("Casey Morgan".to_string()),
            phone_number: Some("555-0123".to_string()),
            city: Some("Portland".to_string()),
            current_title: Some("Supply Chain Analyst".to_string()),
            headline: Some("Forecasting and inventory optimization".to_string()),
            years_experience: Some(5),
            skills: Some("Forecasting, SQL, Excel".to_string()),
            ..ProfileUpdate::default()
        },
    )?;
    profiles.attach_resume(seeker, "casey-morgan.pdf")?;
    profiles.add_work(
        seeker,
        WorkExperience {
            title: "Inventory Analyst".to_string(),
            company: "Contoso Retail".to_string(),
            start_date: Some("2020-03".to_string()),
            end_date: None,
            description: None,
        },
    )?;
    profiles.add_education(
        seeker,
        Education {
            institution: "Portland State University".to_string(),
            degree: "BS".to_string(),
            field_of_study: Some("Supply Chain Management".to_string()),
            graduation_year: Some(2019),
        },
    )?;
    Ok(())
}
