use chrono::{DateTime, Utc};
use clap::Args;
use gojobs::error::AppError;
use gojobs::marketplace::{
    ContractType, EmployerDashboard, JobId, JobPosting, JobSearchPage, JobSearchQuery,
    MarketplaceService, MarketplaceSnapshot, PerformanceByType, Recommendation, ScoreComponent,
    SimilarJob, SubscriptionStatusView, TypePerformance, UserId,
};
use serde::Serialize;

type Service = MarketplaceService<MarketplaceSnapshot>;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Candidate user id
    #[arg(long)]
    pub(crate) user: u64,
    /// Maximum number of jobs (defaults to GOJOBS_RECOMMENDATION_LIMIT)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_datetime)]
    pub(crate) now: Option<DateTime<Utc>>,
    /// Print JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SimilarArgs {
    /// Reference job id
    #[arg(long)]
    pub(crate) job: u64,
    /// Maximum number of jobs (defaults to GOJOBS_SIMILAR_LIMIT)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SearchArgs {
    /// Case-insensitive text matched against title and description
    #[arg(long)]
    pub(crate) text: Option<String>,
    #[arg(long)]
    pub(crate) category: Option<String>,
    #[arg(long)]
    pub(crate) city: Option<String>,
    #[arg(long, value_parser = crate::infra::parse_contract_type)]
    pub(crate) contract_type: Option<ContractType>,
    /// 1-based page number
    #[arg(long)]
    pub(crate) page: Option<usize>,
    #[arg(long)]
    pub(crate) per_page: Option<usize>,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct EmployerArgs {
    /// Employer user id
    #[arg(long)]
    pub(crate) employer: u64,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SubscriptionArgs {
    /// Subscriber user id
    #[arg(long)]
    pub(crate) user: u64,
    /// Evaluation instant (RFC 3339 or YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_datetime)]
    pub(crate) now: Option<DateTime<Utc>>,
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_recommend(service: &Service, args: RecommendArgs) -> Result<(), AppError> {
    let now = args.now.unwrap_or_else(Utc::now);
    let user_id = UserId(args.user);
    let recommendations = service.recommend_for_user(&user_id, args.limit, now)?;

    if args.json {
        return print_json(&recommendations);
    }
    render_recommendations(user_id, now, &recommendations);
    Ok(())
}

pub(crate) fn run_similar(service: &Service, args: SimilarArgs) -> Result<(), AppError> {
    let job_id = JobId(args.job);
    let similar = service.similar_scored(&job_id, args.limit)?;

    if args.json {
        return print_json(&similar);
    }
    render_similar(job_id, &similar);
    Ok(())
}

pub(crate) fn run_search(service: &Service, args: SearchArgs) -> Result<(), AppError> {
    let json = args.json;
    let page = service.search(&search_query(args))?;

    if json {
        return print_json(&page);
    }
    render_search(&page);
    Ok(())
}

pub(crate) fn run_dashboard(service: &Service, args: EmployerArgs) -> Result<(), AppError> {
    let employer_id = UserId(args.employer);
    let dashboard = service.employer_dashboard(&employer_id)?;

    if args.json {
        return print_json(&dashboard);
    }
    render_dashboard(employer_id, &dashboard);
    Ok(())
}

pub(crate) fn run_performance(service: &Service, args: EmployerArgs) -> Result<(), AppError> {
    let employer_id = UserId(args.employer);
    let performance = service.performance_by_type(&employer_id)?;

    if args.json {
        return print_json(&performance);
    }
    render_performance(employer_id, &performance);
    Ok(())
}

pub(crate) fn run_subscription(service: &Service, args: SubscriptionArgs) -> Result<(), AppError> {
    let now = args.now.unwrap_or_else(Utc::now);
    let user_id = UserId(args.user);
    let view = service.subscription_status(&user_id, now)?;

    if args.json {
        return print_json(&view);
    }
    render_subscription(user_id, &view);
    Ok(())
}

fn search_query(args: SearchArgs) -> JobSearchQuery {
    JobSearchQuery {
        text: args.text,
        category: args.category,
        city: args.city,
        contract_type: args.contract_type,
        page: args.page,
        per_page: args.per_page,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn job_line(job: &JobPosting) -> String {
    let mut line = format!(
        "#{} {} ({}, {}, {})",
        job.id,
        job.title,
        job.category,
        job.city,
        job.contract_type.label()
    );
    if job.is_urgent {
        line.push_str(" [urgent]");
    }
    if job.is_top {
        line.push_str(" [top]");
    }
    line
}

fn render_components(components: &[ScoreComponent]) {
    for component in components {
        println!("    +{} {}", component.score, component.notes);
    }
}

fn render_recommendations(
    user_id: UserId,
    now: DateTime<Utc>,
    recommendations: &[Recommendation],
) {
    println!(
        "Recommendations for user {} (evaluated {})",
        user_id,
        now.format("%Y-%m-%d %H:%M UTC")
    );
    if recommendations.is_empty() {
        println!("- no open job scored above the inclusion threshold");
        return;
    }

    for recommendation in recommendations {
        println!(
            "- [{:>3}] {}",
            recommendation.score,
            job_line(&recommendation.job)
        );
        render_components(&recommendation.components);
    }
}

fn render_similar(job_id: JobId, similar: &[SimilarJob]) {
    println!("Jobs similar to #{}", job_id);
    if similar.is_empty() {
        println!("- no other open job in the same category");
        return;
    }

    for entry in similar {
        println!("- [{:>3}] {}", entry.score, job_line(&entry.job));
        render_components(&entry.components);
    }
}

fn render_search(page: &JobSearchPage) {
    println!(
        "Page {}/{} ({} matching job(s), {} per page)",
        page.meta.current_page, page.meta.last_page, page.meta.total, page.meta.per_page
    );
    for job in &page.jobs {
        println!("- {}", job_line(job));
    }
}

fn render_dashboard(employer_id: UserId, dashboard: &EmployerDashboard) {
    println!("Dashboard for employer {}", employer_id);
    println!(
        "- jobs: {} total, {} active",
        dashboard.total_jobs, dashboard.active_jobs
    );
    println!(
        "- applications: {} total, {} unread",
        dashboard.total_applications, dashboard.new_applications
    );
    println!(
        "- views: {} (CV rate {:.2}%)",
        dashboard.total_views, dashboard.cv_rate
    );

    if dashboard.top_jobs.is_empty() {
        return;
    }
    println!("\nTop jobs");
    for view in &dashboard.top_jobs {
        println!(
            "- #{} {}: {} application(s), {} view(s), {:.2}% conversion",
            view.job_id, view.title, view.applications, view.views, view.conversion_rate
        );
    }
}

fn render_performance(employer_id: UserId, performance: &PerformanceByType) {
    println!("Listing performance for employer {}", employer_id);
    for (label, group) in [
        ("normal", &performance.normal),
        ("urgent", &performance.urgent),
        ("top", &performance.top),
    ] {
        println!("- {}", performance_line(label, group));
    }
}

fn performance_line(label: &str, group: &TypePerformance) -> String {
    format!(
        "{}: {} job(s), {:.1} views, {:.1} applications, {:.2}% conversion on average",
        label, group.count, group.avg_views, group.avg_applications, group.avg_conversion
    )
}

fn render_subscription(user_id: UserId, view: &SubscriptionStatusView) {
    println!("Subscription for user {}", user_id);
    println!("- plan: {} ({})", view.plan, view.status);
    if view.active {
        println!(
            "- active, {} day(s) remaining until {}",
            view.days_remaining,
            view.expires_at.format("%Y-%m-%d")
        );
    } else {
        println!("- inactive since {}", view.expires_at.format("%Y-%m-%d"));
    }
    println!(
        "- auto-renew: {}",
        if view.auto_renew { "on" } else { "off" }
    );
}
