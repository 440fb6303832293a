//! The request pipeline.

use crate::config::ClientConfig;
use crate::error::{ConfigError, RequestError, RequestErrorKind};
use reqwest::{Client, Method, StatusCode as HttpStatus};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use workdesk_core::constants::headers;
use workdesk_core::{
    Envelope, IdentitySource, LogNotifier, NotificationKind, Notifier, SessionInvalidator,
};

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers, applied after the defaults.
    pub headers: Vec<(String, String)>,

    /// Attach `x-user-id` from the identity source when a user is logged in.
    pub with_identity: bool,
}

impl RequestOptions {
    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attach the logged-in user's id.
    #[must_use]
    pub const fn with_identity(mut self) -> Self {
        self.with_identity = true;
        self
    }
}

/// Single choke point for every application → server call.
///
/// Every call is classified into one policy:
///
/// | Outcome                         | Notifies | Result                |
/// |---------------------------------|----------|-----------------------|
/// | envelope `code == SUCCESS`      | no       | `Ok(envelope)`        |
/// | envelope with any other code    | once     | `Ok(envelope)`        |
/// | non-2xx HTTP status             | once     | `Err(Http(status))`   |
/// | timeout                         | once     | `Err(Timeout)`        |
/// | no response                     | once     | `Err(Network)`        |
/// | 2xx body that is no envelope    | once     | `Err(Decode)`         |
///
/// Unauthorized responses (business code in the `401xx` band, or HTTP 401)
/// additionally invalidate the session, once per response.
///
/// The pipeline performs no retries, no deduplication and no cancellation;
/// callers own those concerns.
///
/// Cloning is cheap; clones share the connection pool and collaborators.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    notifier: Arc<dyn Notifier>,
    invalidator: Option<Arc<dyn SessionInvalidator>>,
    identity: Option<Arc<dyn IdentitySource>>,
}

impl ApiClient {
    /// Create a client with the log-only notifier and no session hooks.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HttpClient` if the HTTP client cannot be built
    /// (e.g. TLS backend initialisation failure).
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            config,
            notifier: Arc::new(LogNotifier),
            invalidator: None,
            identity: None,
        })
    }

    /// Route user-facing failure messages to `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Arc::new(notifier);
        self
    }

    /// Invalidate the session through `invalidator` on unauthorized responses.
    #[must_use]
    pub fn with_invalidator(mut self, invalidator: impl SessionInvalidator + 'static) -> Self {
        self.invalidator = Some(Arc::new(invalidator));
        self
    }

    /// Drop the session invalidator.
    #[must_use]
    pub fn without_invalidator(mut self) -> Self {
        self.invalidator = None;
        self
    }

    /// Read the logged-in user id from `identity` for `x-user-id`.
    #[must_use]
    pub fn with_identity(mut self, identity: impl IdentitySource + 'static) -> Self {
        self.identity = Some(Arc::new(identity));
        self
    }

    /// Client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET path`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn get<T>(&self, path: &str) -> Result<Envelope<T>, RequestError>
    where
        T: DeserializeOwned,
    {
        self.send(Method::GET, path, None::<&()>, RequestOptions::default())
            .await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, Some(body), RequestOptions::default())
            .await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, Some(body), RequestOptions::default())
            .await
    }

    /// `DELETE path`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn delete<T>(&self, path: &str) -> Result<Envelope<T>, RequestError>
    where
        T: DeserializeOwned,
    {
        self.send(Method::DELETE, path, None::<&()>, RequestOptions::default())
            .await
    }

    /// Send a request through the pipeline.
    ///
    /// Business failures resolve with the envelope so callers that need a
    /// partial payload are not blocked; inspect `envelope.code` or use
    /// [`ApiClient::send_strict`] to reject them instead.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] for timeouts, transport failures, non-2xx
    /// HTTP statuses and malformed bodies. Each error has already been
    /// reported to the notifier exactly once.
    #[tracing::instrument(skip(self, body, options), name = "api_send")]
    pub async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<Envelope<T>, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.http.request(method, self.config.url(path));

        if options.with_identity {
            if let Some(user_id) = self.identity.as_ref().and_then(|i| i.user_id()) {
                request = request.header(headers::USER_ID, user_id);
            }
        }
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => return Err(self.fail(Self::classify_transport(&error))),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(error) => return Err(self.fail(Self::classify_transport(&error))),
        };

        if !status.is_success() {
            return Err(self.http_failure(status, text));
        }

        let envelope = match Self::decode::<T>(&text) {
            Ok(envelope) => envelope,
            Err(error) => return Err(self.fail(error)),
        };

        if envelope.is_success() {
            metrics::counter!("client.requests.total", "outcome" => "success").increment(1);
            tracing::debug!(path, "Request succeeded");
        } else {
            self.business_failure(&envelope);
        }

        Ok(envelope)
    }

    /// Like [`ApiClient::send`], but rejects non-success business codes.
    ///
    /// # Errors
    ///
    /// Everything [`ApiClient::send`] returns, plus
    /// [`RequestErrorKind::Business`] for a non-success envelope. The
    /// business failure is notified once, not twice.
    pub async fn send_strict<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: RequestOptions,
    ) -> Result<Option<T>, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send::<T, B>(method, path, body, options)
            .await?
            .into_result()
            .map_err(|failure| {
                RequestError::new(
                    RequestErrorKind::Business(failure.code),
                    failure.message,
                    None,
                )
            })
    }

    fn classify_transport(error: &reqwest::Error) -> RequestError {
        if error.is_timeout() {
            RequestError::timeout(error.to_string())
        } else {
            RequestError::network(error.to_string())
        }
    }

    /// Decode leniently: a failing envelope whose `data` does not fit `T`
    /// still resolves, with `data` dropped.
    fn decode<T>(text: &str) -> Result<Envelope<T>, RequestError>
    where
        T: DeserializeOwned,
    {
        let raw: Envelope = serde_json::from_str(text).map_err(|_| RequestError::decode(text))?;

        let data = match raw.data {
            None | Some(serde_json::Value::Null) => None,
            Some(value) => match serde_json::from_value::<T>(value) {
                Ok(data) => Some(data),
                Err(_) if !raw.code.is_success() => None,
                Err(e) => return Err(RequestError::decode(e.to_string())),
            },
        };

        Ok(Envelope {
            code: raw.code,
            message: raw.message,
            data,
        })
    }

    fn business_failure<T>(&self, envelope: &Envelope<T>) {
        let code = envelope.code;
        let message = envelope.user_message();

        metrics::counter!("client.requests.total", "outcome" => "business_error").increment(1);
        tracing::warn!(code = code.as_i32(), server_message = message, "Business request failed");

        self.notifier.notify(message, NotificationKind::Error);
        if code.invalidates_session() {
            self.invalidate(message);
        }
    }

    fn http_failure(&self, status: HttpStatus, text: String) -> RequestError {
        let envelope = serde_json::from_str::<Envelope>(&text).ok();

        let message = envelope
            .as_ref()
            .filter(|e| !e.message.trim().is_empty())
            .map_or_else(
                || format!("Request failed with status {}", status.as_u16()),
                |e| e.user_message().to_string(),
            );

        let unauthorized = status == HttpStatus::UNAUTHORIZED
            || envelope
                .as_ref()
                .is_some_and(|e| e.code.invalidates_session());

        let error = self.fail(RequestError::new(
            RequestErrorKind::Http(status.as_u16()),
            message,
            Some(text),
        ));

        if unauthorized {
            self.invalidate(&error.message);
        }
        error
    }

    fn fail(&self, error: RequestError) -> RequestError {
        metrics::counter!("client.requests.total", "outcome" => error.outcome_label()).increment(1);
        tracing::warn!(
            kind = %error.kind,
            raw = error.raw.as_deref().unwrap_or_default(),
            "Request failed: {}",
            error.message
        );

        self.notifier.notify(&error.message, NotificationKind::Error);
        error
    }

    fn invalidate(&self, reason: &str) {
        match &self.invalidator {
            Some(invalidator) => {
                tracing::info!(reason, "Unauthorized response, invalidating session");
                invalidator.invalidate(reason);
            }
            None => tracing::debug!(reason, "Unauthorized response, no session attached"),
        }
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("has_invalidator", &self.invalidator.is_some())
            .field("has_identity", &self.identity.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use serde_json::json;
    use workdesk_core::StatusCode;

    #[test]
    fn test_client_creation() {
        let client = ApiClient::new(ClientConfig::new("http://host/api")).unwrap();
        assert_eq!(client.config().base_url, "http://host/api");
        assert!(client.invalidator.is_none());
    }

    #[test]
    fn test_request_options_builder() {
        let options = RequestOptions::default()
            .header("x-trace", "1")
            .with_identity();

        assert!(options.with_identity);
        assert_eq!(options.headers, vec![("x-trace".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_decode_success_payload() {
        let text = json!({ "code": 20000, "message": "", "data": [1, 2, 3] }).to_string();
        let envelope = ApiClient::decode::<Vec<u32>>(&text).unwrap();
        assert_eq!(envelope.data, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_decode_failure_with_mismatched_data_drops_data() {
        let text = json!({ "code": 42200, "message": "bad", "data": { "field": "x" } }).to_string();
        let envelope = ApiClient::decode::<Vec<u32>>(&text).unwrap();
        assert_eq!(envelope.code, StatusCode::ValidationFailed);
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_decode_rejects_non_envelope() {
        let error = ApiClient::decode::<()>("<html>oops</html>").unwrap_err();
        assert_eq!(error.kind, RequestErrorKind::Decode);

        let text = json!({ "code": 20000, "data": "not a number" }).to_string();
        let error = ApiClient::decode::<u32>(&text).unwrap_err();
        assert_eq!(error.kind, RequestErrorKind::Decode);
    }
}
