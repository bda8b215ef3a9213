//! # Appliance Console Entry Point
//!
//! Boots the console against the configured backend and, when credentials
//! are given in the environment, signs in and prints the dashboard.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration (file from the first argument, or the default)
//! 3. Bootstrap the app (storage, stores, API client)
//! 4. Sign in with `APPLIANCE_EMAIL` / `APPLIANCE_PASSWORD` when both are set
//! 5. Load the dashboard and print it as JSON

use std::path::PathBuf;

use appliance_client::ConsoleConfig;
use appliance_console::error::AppResult;
use appliance_console::pages::dashboard::DashboardPage;
use appliance_console::pages::login::LoginPage;
use appliance_console::pages::QueryState;
use appliance_console::{init_tracing, App};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    init_tracing();
    info!("Starting Appliance Console");

    if let Err(e) = run().await {
        error!(code = ?e.code, message = %e.message, "Console failed");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ConsoleConfig::load_or_default(config_path);
    let app = App::bootstrap(config)?;

    let credentials = (
        std::env::var("APPLIANCE_EMAIL"),
        std::env::var("APPLIANCE_PASSWORD"),
    );
    let (Ok(email), Ok(password)) = credentials else {
        info!(location = %app.context().navigator.location(), "No credentials given; staying on login");
        return Ok(());
    };

    let mut login = LoginPage::new(app.context());
    login.form.email = email;
    login.form.password = password;
    let navigation = login.submit().await?;
    info!(?navigation, "Signed in");

    let menu: Vec<&str> = app.menu().iter().map(|item| item.key).collect();
    info!(?menu, "Menu");

    let mut dashboard = DashboardPage::new(app.context());
    match dashboard.load().await {
        QueryState::Ready(view) => println!("{}", serde_json::to_string_pretty(view)?),
        QueryState::Failed(e) => error!(message = %e.message, "Dashboard failed to load"),
        _ => {}
    }
    for toast in app.context().notify.drain() {
        info!(severity = ?toast.severity, message = %toast.message, "Notification");
    }

    app.logout();
    Ok(())
}
