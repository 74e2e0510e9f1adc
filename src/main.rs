use fundmatch::config::{FeedKind, LoggingSettings, Settings};
use fundmatch::services::{
    AppwriteClient, AppwriteCollections, IntervalTrigger, ManualTrigger, RefreshTrigger,
    SnapshotFile, SnapshotSource,
};
use fundmatch::worker;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

/// Pick the trigger and drive the refresh loop until it ends or we are interrupted
async fn drive<S: SnapshotSource>(source: &S, sink: Option<&AppwriteClient>, settings: &Settings) {
    let policy = settings.policy();
    let limit = usize::from(settings.matching.default_limit);

    if settings.refresh.run_once {
        let mut trigger = ManualTrigger::once();
        drive_with(source, &mut trigger, sink, policy, limit).await;
    } else {
        let period = Duration::from_secs(settings.refresh.interval_secs.max(1));
        info!("Refreshing every {}s", period.as_secs());
        let mut trigger = IntervalTrigger::new(period);
        drive_with(source, &mut trigger, sink, policy, limit).await;
    }
}

async fn drive_with<S: SnapshotSource, T: RefreshTrigger>(
    source: &S,
    trigger: &mut T,
    sink: Option<&AppwriteClient>,
    policy: fundmatch::MatchPolicy,
    limit: usize,
) {
    tokio::select! {
        completed = worker::run(source, trigger, sink, policy, limit) => {
            info!("Refresh loop finished after {} successful refreshes", completed);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenv::dotenv().ok();

    let loaded = Settings::load();
    init_logging(&loaded.as_ref().map(|s| s.logging.clone()).unwrap_or_default());

    let settings = match loaded {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting fundmatch refresh worker...");

    let policy = settings.policy();
    if let Err(e) = fundmatch::Scorer::new(policy.weights, policy.risk_credit, policy.amount_falloff) {
        error!("Invalid matching policy: {}", e);
        std::process::exit(1);
    }

    info!("Matching policy: {:?}", policy);

    let appwrite = match &settings.feed.appwrite {
        Some(aw) => {
            let collections = AppwriteCollections {
                user_profiles: settings.feed.collection.user_profiles.clone(),
                business_ideas: settings.feed.collection.business_ideas.clone(),
                investment_offers: settings.feed.collection.investment_offers.clone(),
                matches: settings.feed.collection.matches.clone(),
            };

            match AppwriteClient::new(
                aw.endpoint.clone(),
                aw.api_key.clone(),
                aw.project_id.clone(),
                aw.database_id.clone(),
                collections,
                settings.feed.page_size,
            ) {
                Ok(client) => {
                    info!("Appwrite client initialized");
                    Some(client)
                }
                Err(e) => {
                    error!("Failed to create Appwrite client: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => None,
    };

    let sink = if settings.feed.publish_matches {
        if appwrite.is_none() {
            warn!("publish_matches is set but no Appwrite settings are configured; results will not be stored");
        }
        appwrite.as_ref()
    } else {
        None
    };

    match settings.feed.source {
        FeedKind::File => {
            let source = SnapshotFile::new(&settings.feed.snapshot_path);
            info!("Reading snapshots from {}", source.path().display());
            drive(&source, sink, &settings).await;
        }
        FeedKind::Appwrite => match appwrite.as_ref() {
            Some(client) => {
                info!("Pulling snapshots from Appwrite");
                drive(client, sink, &settings).await;
            }
            None => {
                error!("feed.source is \"appwrite\" but [feed.appwrite] is not configured");
                std::process::exit(1);
            }
        },
    }
}
