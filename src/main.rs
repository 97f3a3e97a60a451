//! CityPulse - neighborhood vibe aggregation gateway

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use citypulse::{
    adapters::{LocalPlacesClient, NewsApiClient, WeatherApiClient, WebSearchClient},
    auth::{OidcClient, OidcConfig},
    config::Args,
    db::MongoClient,
    history::{HistoryStore, MemoryHistoryStore, MongoHistoryStore},
    pulse::{FanOutCoordinator, PulseService},
    server,
    vibe::{GeminiClient, TextGenerator, VibeSummarizer},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("citypulse={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // Print startup banner
    info!("======================================");
    info!("  CityPulse - vibe aggregation gateway");
    info!("======================================");
    info!("Node ID: {}", args.node_id);
    info!("Listen: {}", args.listen);
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("City: {} ({})", args.city, args.country);
    info!("MongoDB: {}", args.mongodb_uri);
    info!("Summarizer model: {}", args.gemini_model);
    info!("======================================");

    // Connect to MongoDB (optional in dev mode)
    let mongo = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => {
            info!("MongoDB connected successfully");
            Some(client)
        }
        Err(e) => {
            if args.dev_mode {
                warn!("MongoDB connection failed (dev mode, continuing without): {}", e);
                None
            } else {
                error!("MongoDB connection failed: {}", e);
                std::process::exit(1);
            }
        }
    };

    // History store: MongoDB in production, in-memory fallback in dev mode
    let history: Arc<dyn HistoryStore> = match &mongo {
        Some(client) => match MongoHistoryStore::new(client).await {
            Ok(store) => {
                info!("History store ready (collection indexed)");
                Arc::new(store)
            }
            Err(e) => {
                if args.dev_mode {
                    warn!("History collection setup failed (dev mode, using memory): {}", e);
                    Arc::new(MemoryHistoryStore::new())
                } else {
                    error!("History collection setup failed: {}", e);
                    std::process::exit(1);
                }
            }
        },
        None => {
            warn!("History store running in memory (searches are lost on restart)");
            Arc::new(MemoryHistoryStore::new())
        }
    };

    // Shared HTTP client for all outbound calls
    let http = reqwest::Client::builder()
        .timeout(args.request_timeout())
        .user_agent(concat!("citypulse/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default();

    // Lookup adapters
    let coordinator = FanOutCoordinator::new(
        Arc::new(NewsApiClient::new(
            http.clone(),
            args.news_api_key.clone().unwrap_or_default(),
        )),
        Arc::new(WebSearchClient::new(
            http.clone(),
            args.serpapi_api_key.clone().unwrap_or_default(),
        )),
        Arc::new(LocalPlacesClient::new(
            http.clone(),
            args.serpapi_api_key.clone().unwrap_or_default(),
        )),
        Arc::new(WeatherApiClient::new(
            http.clone(),
            args.weather_api_key.clone().unwrap_or_default(),
        )),
    );

    // Summarizer
    let generator = Arc::new(GeminiClient::new(
        http.clone(),
        args.gemini_api_key.clone().unwrap_or_default(),
        args.gemini_model.clone(),
    )) as Arc<dyn TextGenerator>;
    let summarizer = VibeSummarizer::new(generator);

    let pulse = Arc::new(PulseService::new(
        coordinator,
        summarizer,
        history,
        args.city.clone(),
        args.country.clone(),
    ));

    // Identity provider (optional in dev mode; /auth/dev-login covers local use)
    let oidc = OidcConfig::from_args(&args).map(|config| {
        info!("Identity provider configured: {}", config.domain);
        Arc::new(OidcClient::new(config, http.clone()))
    });
    if oidc.is_none() {
        warn!("No identity provider configured - only dev-login sessions are possible");
    }

    let state = Arc::new(server::AppState::new(args, mongo, oidc, pulse));

    // Run the server
    if let Err(e) = server::run(state).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
