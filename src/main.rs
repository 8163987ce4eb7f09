use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gridee_client::client::ApiClient;
use gridee_client::config::Config;
use gridee_client::console;
use gridee_client::database::PreferenceStore;
use gridee_client::session::SessionContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // load environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gridee_client=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store = PreferenceStore::open(&config.data_path).await?;
    let session = SessionContext::init(store).await?;
    let client = ApiClient::new(&config, session)?;

    let app = console::router(client)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!(
        %bind_address,
        backend = %config.api_base_url,
        "console listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
