//! Status classification shared by every adapter.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use storytellers_core::outcome::{CallOutcome, Service};
use tracing::{debug, warn};

use crate::error::ClientError;

/// `{description}` payload collaborators attach to 4xx answers.
#[derive(Debug, serde::Deserialize)]
struct ErrorPayload {
    description: String,
}

/// HTTP client bound to one collaborator.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    service: Service,
    base_url: String,
    http: Client,
}

impl ServiceClient {
    /// Creates a client for `service` rooted at `base_url`. Every call is
    /// bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidBaseUrl` if `base_url` does not parse,
    /// or `ClientError::Http` if the client cannot be built.
    pub fn new(service: Service, base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        if Url::parse(base_url).is_err() {
            return Err(ClientError::InvalidBaseUrl {
                service,
                url: base_url.to_owned(),
            });
        }
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            service,
            base_url: base_url.trim_end_matches('/').to_owned(),
            http,
        })
    }

    /// The collaborator this client talks to.
    #[must_use]
    pub fn service(&self) -> Service {
        self.service
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET path`, decoding the body as `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> CallOutcome<T> {
        self.send_json(self.http.get(self.url(path))).await
    }

    /// `GET path?query`, decoding the body as `T`.
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> CallOutcome<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send_json(self.http.get(self.url(path)).query(query))
            .await
    }

    /// `POST path` with a JSON body, decoding the answer as `T`.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> CallOutcome<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.http.post(self.url(path)).json(body))
            .await
    }

    /// `POST path` with a JSON body, ignoring any answer body.
    pub async fn post_discarding<B>(&self, path: &str, body: &B) -> CallOutcome<()>
    where
        B: Serialize + ?Sized,
    {
        match self.dispatch(self.http.post(self.url(path)).json(body)).await {
            Ok(_) => CallOutcome::Success(()),
            Err(outcome) => outcome,
        }
    }

    /// `PUT path` with a JSON body, decoding the answer as `T`.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> CallOutcome<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(self.http.put(self.url(path)).json(body))
            .await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> CallOutcome<T> {
        let response = match self.dispatch(request).await {
            Ok(response) => response,
            Err(outcome) => return outcome,
        };
        let status = response.status();
        match response.json::<T>().await {
            Ok(payload) => CallOutcome::Success(payload),
            Err(err) if err.is_timeout() || err.is_body() => {
                warn!(service = %self.service, error = %err, "backend body read failed");
                CallOutcome::ServiceUnavailable(self.service)
            }
            Err(err) => {
                warn!(service = %self.service, %status, error = %err, "backend payload malformed");
                CallOutcome::ApplicationError {
                    status: StatusCode::BAD_GATEWAY.as_u16(),
                    description: format!("the {} service sent an unreadable answer", self.service),
                }
            }
        }
    }

    /// Sends the request. Returns the response when it is a 2xx carrying a
    /// body; every other answer is already a complete outcome.
    async fn dispatch<T>(&self, request: RequestBuilder) -> Result<Response, CallOutcome<T>> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(
                    service = %self.service,
                    timeout = err.is_timeout(),
                    error = %err,
                    "backend did not answer"
                );
                return Err(CallOutcome::ServiceUnavailable(self.service));
            }
        };

        let status = response.status();
        debug!(service = %self.service, %status, url = %response.url(), "backend answered");

        if status.is_server_error() {
            warn!(service = %self.service, %status, "backend failed");
            return Err(CallOutcome::ServiceUnavailable(self.service));
        }
        if status == StatusCode::NO_CONTENT {
            return Err(CallOutcome::EmptySuccess);
        }
        if status.is_success() {
            return Ok(response);
        }

        let description = match response.bytes().await {
            Ok(bytes) => describe(status, &bytes),
            Err(err) => {
                warn!(service = %self.service, error = %err, "backend error body unreadable");
                return Err(CallOutcome::ServiceUnavailable(self.service));
            }
        };
        Err(CallOutcome::ApplicationError {
            status: status.as_u16(),
            description,
        })
    }
}

/// Extracts the collaborator's own wording from a rejection body, falling
/// back to the raw text and then to the status reason.
fn describe(status: StatusCode, body: &[u8]) -> String {
    if let Ok(payload) = serde_json::from_slice::<ErrorPayload>(body) {
        return payload.description;
    }
    let text = String::from_utf8_lossy(body).trim().to_owned();
    if !text.is_empty() {
        return text;
    }
    status
        .canonical_reason()
        .unwrap_or("request rejected")
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_prefers_description_payload() {
        let body = br#"{"description": "Email already registered", "code": 409}"#;

        assert_eq!(
            describe(StatusCode::CONFLICT, body),
            "Email already registered"
        );
    }

    #[test]
    fn test_describe_falls_back_to_text_then_reason() {
        assert_eq!(describe(StatusCode::BAD_REQUEST, b" bad query "), "bad query");
        assert_eq!(describe(StatusCode::NOT_FOUND, b""), "Not Found");
    }

    #[test]
    fn test_new_rejects_unparseable_base_url() {
        let result = ServiceClient::new(Service::Reaction, "not a url", Duration::from_secs(1));

        assert!(matches!(
            result,
            Err(ClientError::InvalidBaseUrl {
                service: Service::Reaction,
                ..
            })
        ));
    }

    #[test]
    fn test_new_strips_trailing_slash() {
        let client =
            ServiceClient::new(Service::Identity, "http://127.0.0.1:5001/", Duration::from_secs(1))
                .unwrap();

        assert_eq!(client.url("/users"), "http://127.0.0.1:5001/users");
    }
}
