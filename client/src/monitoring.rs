//! Client-side telemetry.
//!
//! Performance and error reports are posted to the backend's `/monitoring`
//! endpoint through the same pipeline as business calls. Telemetry is best
//! effort: failures are logged and swallowed, never shown to the user, and
//! never invalidate the session.

use crate::client::{ApiClient, RequestOptions};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use workdesk_core::SilentNotifier;

/// Monitoring endpoint path.
pub const MONITORING_PATH: &str = "/monitoring";

/// Report category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitoringKind {
    /// Timing data.
    Performance,
    /// Runtime failures.
    Error,
}

/// Page load timings in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLoadMetrics {
    /// DNS lookup.
    pub dns: f64,
    /// TCP connect.
    pub tcp: f64,
    /// Time to first byte.
    pub ttfb: f64,
    /// Until the document is parsed.
    pub dom_ready: f64,
    /// Until the page finished loading.
    pub load: f64,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    #[serde(rename = "type")]
    kind: MonitoringKind,
    event: &'a str,
    url: &'a str,
    ua: &'a str,
    data: Value,
}

/// Posts telemetry reports.
#[derive(Debug, Clone)]
pub struct MonitoringReporter {
    client: ApiClient,
    page_url: String,
    user_agent: String,
}

impl MonitoringReporter {
    /// Create a reporter sharing `client`'s connection pool and identity.
    ///
    /// The reporter's copy of the client notifies nobody and leaves the
    /// session alone on unauthorized responses.
    #[must_use]
    pub fn new(client: &ApiClient, page_url: impl Into<String>) -> Self {
        let user_agent = client.config().user_agent.clone();

        Self {
            client: client
                .clone()
                .with_notifier(SilentNotifier)
                .without_invalidator(),
            page_url: page_url.into(),
            user_agent,
        }
    }

    /// Update the location reported with each event.
    pub fn set_page_url(&mut self, page_url: impl Into<String>) {
        self.page_url = page_url.into();
    }

    /// Send a report. Returns `true` if the server accepted it.
    pub async fn report(&self, kind: MonitoringKind, event: &str, data: Value) -> bool {
        let report = Report {
            kind,
            event,
            url: &self.page_url,
            ua: &self.user_agent,
            data,
        };

        let result = self
            .client
            .send::<Value, _>(
                Method::POST,
                MONITORING_PATH,
                Some(&report),
                RequestOptions::default().with_identity(),
            )
            .await;

        match result {
            Ok(envelope) if envelope.is_success() => true,
            Ok(envelope) => {
                tracing::warn!(event, code = envelope.code.as_i32(), "Monitoring report rejected");
                false
            }
            Err(error) => {
                tracing::warn!(event, error = %error, "Monitoring report failed");
                false
            }
        }
    }

    /// Report page load timings.
    pub async fn report_page_load(&self, metrics: &PageLoadMetrics) -> bool {
        let data = serde_json::to_value(metrics).unwrap_or(Value::Null);
        self.report(MonitoringKind::Performance, "page_load", data).await
    }

    /// Report a runtime error.
    pub async fn report_error(&self, event: &str, message: &str, stack: Option<&str>) -> bool {
        let data = serde_json::json!({
            "message": message,
            "stack": stack,
        });
        self.report(MonitoringKind::Error, event, data).await
    }
}
