use referral_tracker::{
    app,
    config::{validate_production_config, ServerConfig, TokenConfig},
    db, AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "referral_tracker=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    validate_production_config();
    let server_config = ServerConfig::from_env();
    let token_config = TokenConfig::from_env();

    // Database connection
    let pool = db::create_pool().await?;
    db::run_migrations(&pool).await?;
    tracing::info!("Connected to the database and applied migrations");

    let state = AppState::new(pool, &server_config, &token_config);
    let router = app(state, &server_config);

    let listener = tokio::net::TcpListener::bind(server_config.bind_addr).await?;
    tracing::info!("Server is running on http://{}", server_config.bind_addr);

    axum::serve(listener, router).await?;

    Ok(())
}
