//! Console demo.
//!
//! Wires the session store, request pipeline, notification queue and
//! navigator together, logs in, and walks a few routes.
//!
//! # Environment
//!
//! - `WORKDESK_API_URL`: backend base URL including `/api`
//! - `WORKDESK_TIMEOUT_SECS`: request timeout
//! - `WORKDESK_STATE_FILE`: session file (default `workdesk-session.json`)
//! - `WORKDESK_USERNAME` / `WORKDESK_PASSWORD`: credentials; when unset the
//!   demo reuses the stored session
//!
//! # Usage
//!
//! ```bash
//! WORKDESK_API_URL=http://localhost:3000/api \
//! WORKDESK_USERNAME=alice WORKDESK_PASSWORD=secret \
//! cargo run -p workdesk-console
//! ```

use anyhow::Context;
use serde_json::{Value, json};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workdesk_auth::{FileStorage, SessionStore};
use workdesk_client::{ApiClient, ClientConfig, MonitoringKind, MonitoringReporter};
use workdesk_core::constants::routes;
use workdesk_core::{NotificationKind, SystemClock};
use workdesk_notifications::NotificationQueue;
use workdesk_router::Navigator;

const DEFAULT_STATE_FILE: &str = "workdesk-session.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,workdesk_client=debug,workdesk_auth=debug,workdesk_router=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let state_file =
        std::env::var("WORKDESK_STATE_FILE").unwrap_or_else(|_| DEFAULT_STATE_FILE.to_string());
    let config = ClientConfig::from_env().context("invalid client configuration")?;

    tracing::info!(base_url = %config.base_url, state_file = %state_file, "Starting console demo");

    let storage = FileStorage::open(&state_file)
        .with_context(|| format!("cannot open session file {state_file}"))?;
    let session = SessionStore::init(storage).context("cannot restore session")?;
    let notifications = NotificationQueue::new(SystemClock);
    let navigator = Navigator::new(session.clone());

    let client = ApiClient::new(config)?
        .with_notifier(notifications.clone())
        .with_identity(session.clone())
        .with_invalidator(navigator.clone());

    let mut reporter = MonitoringReporter::new(&client, routes::LOGIN);

    match (
        std::env::var("WORKDESK_USERNAME"),
        std::env::var("WORKDESK_PASSWORD"),
    ) {
        (Ok(username), Ok(password)) => {
            let outcome = session.login(&client, &username, &password).await;
            if outcome.success {
                notifications.notify("Logged in", NotificationKind::Success);
            }
            println!("login: success={} message={:?}", outcome.success, outcome.message);
        }
        _ if session.is_authenticated() => {
            println!("login: reusing stored session for {:?}", session.snapshot().user_id());
        }
        _ => println!("login: no credentials and no stored session"),
    }

    for path in [routes::DASHBOARD, routes::LOGS, routes::PERMISSIONS] {
        match navigator.navigate(path) {
            Ok(navigation) => {
                reporter.set_page_url(navigation.path.clone());
                match navigation.redirected_from {
                    Some(from) => println!("navigate {from} -> redirected to {}", navigation.path),
                    None => println!("navigate {path} -> {}", navigation.route),
                }
            }
            Err(error) => println!("navigate {path} -> error: {error}"),
        }
    }

    if session.is_authenticated() {
        let envelope = client.get::<Value>("/logs").await;
        match envelope {
            Ok(envelope) => println!("GET /logs -> code {}", envelope.code),
            Err(error) => println!("GET /logs -> {error}"),
        }
        reporter
            .report(MonitoringKind::Performance, "console_demo", json!({ "routes": 3 }))
            .await;
    }

    println!("notifications ({}):", notifications.len());
    for notification in notifications.snapshot() {
        println!(
            "  #{} [{}] {}",
            notification.id,
            notification.kind.as_str(),
            notification.message
        );
    }

    Ok(())
}
