//! Interactive smoke run against a live Supabase project.
//!
//! Signs in with `DEMO_EMAIL`/`DEMO_PASSWORD`, then walks the read-only
//! flows: the marketplace, the reel feed, and (for employers) the
//! applications board and course analytics. Nothing is written.

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jconnect_app::{
    AnalyticsRange, ApplicationBoard, AppSession, CourseAnalytics, Marketplace, MarketplaceTab,
    ReelViewer,
};
use jconnect_models::Role;
use jconnect_supabase::SupabaseClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jconnect=debug"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .init();

    let client = SupabaseClient::from_env()?;
    let session = AppSession::new(client.clone());

    let email = std::env::var("DEMO_EMAIL")?;
    let password = std::env::var("DEMO_PASSWORD")?;
    let profile = session.sign_in(&email, &password).await?;
    info!(name = %profile.full_name, roles = ?profile.roles, "Signed in");

    let marketplace = Marketplace::load(&client, profile.id.as_str()).await?;
    info!(
        published = marketplace.courses().len(),
        free = marketplace.filtered(MarketplaceTab::Free, "").len(),
        paid = marketplace.filtered(MarketplaceTab::Paid, "").len(),
        "Marketplace"
    );

    let reels = ReelViewer::load(&client).await?;
    info!(reels = reels.reels().len(), "Reel feed");

    if profile.has_role(Role::Employer) {
        let board = ApplicationBoard::load(&client, profile.id.as_str()).await?;
        let stats = board.stats();
        info!(applications = stats.total, "Applications board");

        let analytics =
            CourseAnalytics::load(&client, profile.id.as_str(), AnalyticsRange::Days30).await?;
        info!(
            courses = analytics.per_course.len(),
            enrollments = analytics.total_enrollments,
            revenue_inr = analytics.total_revenue,
            "Course analytics (30 days)"
        );
    } else {
        warn!("Signed-in user is not an employer; skipping employer views");
    }

    session.sign_out().await?;
    info!("Done");
    Ok(())
}
