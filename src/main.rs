use std::sync::Arc;

use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

use studio_workspace::bootstrap::app_context::{AppContext, AppServices};
use studio_workspace::bootstrap::config::Config;
use studio_workspace::infrastructure::reload::BroadcastReloadSignal;
use studio_workspace::infrastructure::studio_api::StudioApiClient;
use studio_workspace::presentation::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "studio_workspace=debug,reqwest=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let mut cfg = Config::from_env()?;
    if let Some(app) = args.app {
        cfg.app = app;
    }
    info!(base_url = %cfg.base_url, org = %cfg.org, app = %cfg.app, "studio_workspace_start");

    let api = Arc::new(StudioApiClient::new(
        &cfg.base_url,
        cfg.token.clone(),
        cfg.request_timeout,
    )?);
    // A one-shot process has no derived state to rebuild; the signal is only logged.
    let reload = Arc::new(BroadcastReloadSignal::new(16));
    let ctx = AppContext::new(cfg, AppServices::new(api.clone(), api, reload));

    let stdout = std::io::stdout();
    cli::run(&ctx, args.command, &mut stdout.lock()).await
}
