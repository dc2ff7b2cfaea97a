mod display;
mod shell;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use pothole_app::{AppError, ClientContext, FeedController, LikeOutcome, ReportComposer};
use pothole_core::{
    Category, Coordinates, FeedFilter, ReportId, RoadCondition, SessionContext, Severity,
};
use pothole_sync::{BackendConfig, SupabaseClient};
use tracing_subscriber::EnvFilter;

use crate::shell::{ConsoleUi, FileImages, FixedLocation};

#[derive(Parser)]
#[command(name = "pothole")]
#[command(about = "Pothole Watch: report potholes and browse the community feed", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Access token of a signed-in user
    #[arg(long, global = true, env = "POTHOLE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List reports from the community feed
    Feed {
        /// Case-insensitive search over location, description, and category
        #[arg(short, long, default_value = "")]
        search: String,

        /// Feed tab (all, recent, popular, fixed)
        #[arg(short, long, default_value = "all", value_parser = parse_filter)]
        filter: FeedFilter,

        /// Show one report as a card
        #[arg(long)]
        id: Option<String>,
    },

    /// Like a report
    Like {
        /// Report id
        id: String,
    },

    /// Submit a new report
    Submit {
        /// What the pothole looks like and where exactly it is
        #[arg(short, long)]
        description: String,

        /// Surface Break, Deep Hole, Cracking, Edge Damage, or Sinkhole
        #[arg(short, long, value_parser = parse_category)]
        category: Option<Category>,

        /// Low, Medium, or Danger
        #[arg(long, default_value = "Medium", value_parser = parse_severity)]
        severity: Severity,

        /// Dry, Wet, Snow/Ice, or Construction
        #[arg(long, default_value = "Dry", value_parser = parse_road_condition)]
        road_condition: RoadCondition,

        /// Image file to attach (repeatable, at most 5)
        #[arg(short, long = "image")]
        images: Vec<PathBuf>,

        /// Latitude of the pothole; requires --lon
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude of the pothole; requires --lat
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Street address to store instead of a geocoded one
        #[arg(long)]
        address: Option<String>,
    },
}

fn parse_filter(s: &str) -> Result<FeedFilter, String> {
    [
        FeedFilter::All,
        FeedFilter::Recent,
        FeedFilter::Popular,
        FeedFilter::Fixed,
    ]
    .into_iter()
    .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
    .ok_or_else(|| format!("unknown feed tab '{s}'"))
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::parse(s).ok_or_else(|| format!("unknown category '{s}'"))
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    Severity::parse(s).ok_or_else(|| format!("unknown severity '{s}'"))
}

fn parse_road_condition(s: &str) -> Result<RoadCondition, String> {
    RoadCondition::parse(s).ok_or_else(|| format!("unknown road condition '{s}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("pothole v{}", env!("CARGO_PKG_VERSION"));

    let config = BackendConfig::from_env().context("backend configuration")?;
    let session = Arc::new(SessionContext::new());
    let client = Arc::new(
        SupabaseClient::new(config)
            .context("building HTTP client")?
            .with_session(Arc::clone(&session)),
    );
    if let Some(token) = cli.access_token.as_deref() {
        let user = client
            .current_user(token)
            .await
            .context("resolving the signed-in user")?;
        session.sign_in(user);
    }

    match cli.command {
        Commands::Feed {
            search,
            filter,
            id,
        } => {
            let ctx = context(client, session, None, Vec::new());
            cmd_feed(&ctx, &search, filter, id).await?;
        }
        Commands::Like { id } => {
            let ctx = context(client, session, None, Vec::new());
            cmd_like(&ctx, ReportId::new(id)).await?;
        }
        Commands::Submit {
            description,
            category,
            severity,
            road_condition,
            images,
            lat,
            lon,
            address,
        } => {
            let position = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
            let ctx = context(client, session, position, images);
            let composer = ReportComposer::new(&ctx);
            composer.enter().await;
            if let Some(address) = address {
                composer.set_location(composer.draft().location, Some(address));
            }
            composer.set_description(description);
            if let Some(category) = category {
                composer.select_category(category);
            }
            composer.select_severity(severity);
            composer.select_road_condition(road_condition);
            cmd_submit(&composer).await?;
        }
    }

    Ok(())
}

fn context(
    client: Arc<SupabaseClient>,
    session: Arc<SessionContext>,
    position: Option<Coordinates>,
    images: Vec<PathBuf>,
) -> ClientContext {
    let ui = Arc::new(ConsoleUi);
    ClientContext {
        service: client,
        session,
        location: Arc::new(FixedLocation::new(position)),
        images: Arc::new(FileImages::new(images)),
        advisor: ui.clone(),
        navigator: ui.clone(),
        map: ui,
    }
}

async fn cmd_feed(
    ctx: &ClientContext,
    search: &str,
    filter: FeedFilter,
    id: Option<String>,
) -> anyhow::Result<()> {
    let feed = FeedController::new(ctx);
    feed.mount().await.context("loading the feed")?;
    let now = chrono::Utc::now();

    if let Some(id) = id {
        let id = ReportId::new(id);
        let Some(report) = feed.reports().into_iter().find(|r| r.id == id) else {
            bail!("no report with id {id}");
        };
        display::print_report_card(&report, now);
        return Ok(());
    }

    feed.set_filter(filter);
    feed.set_search_query(search);
    display::print_feed(&feed.view(), feed.reports().len(), now);
    Ok(())
}

async fn cmd_like(ctx: &ClientContext, id: ReportId) -> anyhow::Result<()> {
    let feed = FeedController::new(ctx);
    feed.mount().await.context("loading the feed")?;
    match feed.like(&id).await {
        LikeOutcome::Confirmed(Some(likes)) => println!("Liked {id} ({likes} likes)"),
        LikeOutcome::Confirmed(None) => println!("Liked {id}"),
        LikeOutcome::AlreadyLiked => println!("Already liked {id}"),
        LikeOutcome::Unconfirmed => bail!("like for {id} was not confirmed"),
    }
    Ok(())
}

async fn cmd_submit(composer: &ReportComposer) -> anyhow::Result<()> {
    match composer.request_image().await {
        Ok(_) | Err(AppError::Cancelled) => {}
        Err(e) => return Err(e).context("attaching images"),
    }
    let id = composer.submit().await.context("submitting report")?;
    println!("Submitted report {id}");
    Ok(())
}
