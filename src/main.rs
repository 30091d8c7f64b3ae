use recipe_api::{app, AppState};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "recipe_api=debug,axum=info,tower_http=info";

/// `RUST_LOG` picks the filter, `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.with_target(false).json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let (state, db) = AppState::init().await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    tracing::info!("migrations applied");

    let addr = state.config.bind_addr;
    app::serve(app::build_app(state), addr).await
}
