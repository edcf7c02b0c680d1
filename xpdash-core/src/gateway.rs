//! Query gateway — one GraphQL request per call, with error classification.
//!
//! The remote service answers with a success status even for logical errors;
//! those arrive as a non-empty `errors` list in the body. Messages carrying an
//! auth marker resolve to `QueryOutcome::AuthExpired` after the session is
//! cleared. Any other reported error becomes `QueryError::Reported` with the
//! first message verbatim. Navigation is left to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::session::Session;

/// Substrings that mark an expired, invalid or malformed credential.
pub const AUTH_ERROR_MARKERS: [&str; 3] = ["JWT", "unauthorized", "Malformed"];

#[derive(Error, Debug)]
pub enum QueryError {
    /// First error message reported by the service, unmodified.
    #[error("{0}")]
    Reported(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response carried neither data nor errors")]
    MissingData,
}

/// Tagged result of a query that did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<T> {
    Data(T),
    /// The service rejected the token. The session has already been cleared.
    AuthExpired,
}

impl<T> QueryOutcome<T> {
    pub fn into_data(self) -> Option<T> {
        match self {
            QueryOutcome::Data(data) => Some(data),
            QueryOutcome::AuthExpired => None,
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, QueryOutcome::AuthExpired)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope {
    /// `None` only when the key is absent; an explicit `null` is kept.
    #[serde(default, deserialize_with = "present_value")]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    pub message: String,
}

impl GraphqlError {
    pub fn is_auth_failure(&self) -> bool {
        AUTH_ERROR_MARKERS
            .iter()
            .any(|marker| self.message.contains(marker))
    }
}

// ============================================================================
// QueryGateway
// ============================================================================

#[derive(Debug, Clone)]
pub struct QueryGateway {
    client: Client,
    endpoint: String,
    session: Session,
}

impl QueryGateway {
    pub fn new(endpoint: impl Into<String>, session: Session, timeout: Duration) -> Result<Self, QueryError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Execute `query` once and decode the `data` payload as `T`.
    ///
    /// A missing token is not rejected here; the service decides.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<QueryOutcome<T>, QueryError> {
        let request = GraphqlRequest {
            query,
            variables: &variables,
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(token) = self.session.current_token() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let body = response.text().await?;
        let envelope: GraphqlEnvelope = serde_json::from_str(&body)?;

        self.classify(envelope)
    }

    fn classify<T: DeserializeOwned>(&self, envelope: GraphqlEnvelope) -> Result<QueryOutcome<T>, QueryError> {
        let errors = envelope.errors.unwrap_or_default();

        if let Some(first) = errors.first() {
            if let Some(auth) = errors.iter().find(|e| e.is_auth_failure()) {
                tracing::warn!(message = %auth.message, "Query rejected the session token; clearing session");
                if let Err(e) = self.session.clear() {
                    tracing::error!(error = %e, "Failed to clear session after auth failure");
                }
                return Ok(QueryOutcome::AuthExpired);
            }

            tracing::debug!(message = %first.message, count = errors.len(), "Query reported errors");
            return Err(QueryError::Reported(first.message.clone()));
        }

        match envelope.data {
            Some(data) => Ok(QueryOutcome::Data(serde_json::from_value(data)?)),
            None => Err(QueryError::MissingData),
        }
    }
}

/// Source of the typed dashboard payload. `QueryGateway` is the real one;
/// tests substitute fakes to observe when fetches happen.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn fetch_dashboard(&self) -> Result<QueryOutcome<crate::models::DashboardData>, QueryError>;
}

#[async_trait]
impl DashboardSource for QueryGateway {
    async fn fetch_dashboard(&self) -> Result<QueryOutcome<crate::models::DashboardData>, QueryError> {
        self.execute(crate::dashboard::DASHBOARD_QUERY, serde_json::json!({}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::testutil::token_expiring_at;
    use chrono::Utc;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const GQL_PATH: &str = "/api/graphql-engine/v1/graphql";

    fn gateway(server: &MockServer, session: Session) -> QueryGateway {
        QueryGateway::new(
            format!("{}{}", server.uri(), GQL_PATH),
            session,
            Duration::from_secs(5),
        )
        .expect("Failed to create gateway")
    }

    fn signed_in() -> (Session, String) {
        let session = Session::in_memory();
        let token = token_expiring_at(Utc::now().timestamp() + 3600);
        session.save(&token).unwrap();
        (session, token)
    }

    #[tokio::test]
    async fn test_returns_data_unchanged_and_sends_bearer() {
        let server = MockServer::start().await;
        let (session, token) = signed_in();

        let data = serde_json::json!({ "user": [{ "id": 7, "login": "jdoe" }] });

        Mock::given(method("POST"))
            .and(path(GQL_PATH))
            .and(header("authorization", format!("Bearer {}", token).as_str()))
            .and(body_json(serde_json::json!({
                "query": "{ user { id login } }",
                "variables": { "limit": 3 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": data })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome: QueryOutcome<serde_json::Value> = gateway(&server, session)
            .execute("{ user { id login } }", serde_json::json!({ "limit": 3 }))
            .await
            .expect("query should succeed");

        assert_eq!(outcome, QueryOutcome::Data(data));
    }

    #[tokio::test]
    async fn test_jwt_error_clears_session_without_failing() {
        let server = MockServer::start().await;
        let (session, _) = signed_in();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errors": [{ "message": "JWTExpired: JWT expired" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome: QueryOutcome<serde_json::Value> = gateway(&server, session.clone())
            .execute("{ user { id } }", serde_json::json!({}))
            .await
            .expect("auth failure must not surface as an error");

        assert!(outcome.is_auth_expired());
        assert!(session.current_token().is_none());
        assert!(!session.is_valid());
    }

    #[tokio::test]
    async fn test_auth_marker_in_later_error_still_wins() {
        let server = MockServer::start().await;
        let (session, _) = signed_in();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errors": [
                    { "message": "field \"x\" not found in type: 'query_root'" },
                    { "message": "Malformed Authorization header" }
                ]
            })))
            .mount(&server)
            .await;

        let outcome: QueryOutcome<serde_json::Value> = gateway(&server, session.clone())
            .execute("{ x }", serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(outcome, QueryOutcome::AuthExpired);
        assert!(session.current_token().is_none());
    }

    #[tokio::test]
    async fn test_other_error_surfaces_first_message_and_keeps_session() {
        let server = MockServer::start().await;
        let (session, token) = signed_in();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errors": [
                    { "message": "field X not found" },
                    { "message": "second problem" }
                ]
            })))
            .mount(&server)
            .await;

        let result: Result<QueryOutcome<serde_json::Value>, _> = gateway(&server, session.clone())
            .execute("{ X }", serde_json::json!({}))
            .await;

        match result {
            Err(e @ QueryError::Reported(_)) => assert_eq!(e.to_string(), "field X not found"),
            other => panic!("Expected Reported error, got {:?}", other),
        }
        assert_eq!(session.current_token().as_deref(), Some(token.as_str()));
    }

    #[tokio::test]
    async fn test_no_token_sends_no_authorization_header() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(|req: &Request| {
                let has_auth = req.headers.contains_key("authorization");
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "data": { "has_auth": has_auth } }))
            })
            .mount(&server)
            .await;

        let outcome: QueryOutcome<serde_json::Value> = gateway(&server, Session::in_memory())
            .execute("{ user { id } }", serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(
            outcome.into_data(),
            Some(serde_json::json!({ "has_auth": false }))
        );
    }

    #[tokio::test]
    async fn test_empty_error_list_is_not_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "ok": true },
                "errors": []
            })))
            .mount(&server)
            .await;

        let outcome: QueryOutcome<serde_json::Value> = gateway(&server, Session::in_memory())
            .execute("{ ok }", serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(outcome, QueryOutcome::Data(serde_json::json!({ "ok": true })));
    }

    #[tokio::test]
    async fn test_null_data_is_returned_as_null() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": null })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome: QueryOutcome<serde_json::Value> = gateway(&server, Session::in_memory())
            .execute("{ x }", serde_json::json!({}))
            .await
            .expect("null data is a valid payload");

        assert_eq!(outcome, QueryOutcome::Data(serde_json::Value::Null));
    }

    #[tokio::test]
    async fn test_missing_data_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let result: Result<QueryOutcome<serde_json::Value>, _> = gateway(&server, Session::in_memory())
            .execute("{ ok }", serde_json::json!({}))
            .await;

        assert!(matches!(result, Err(QueryError::MissingData)));
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let result: Result<QueryOutcome<serde_json::Value>, _> = gateway(&server, Session::in_memory())
            .execute("{ ok }", serde_json::json!({}))
            .await;

        assert!(matches!(result, Err(QueryError::Decode(_))));
    }

    #[tokio::test]
    async fn test_data_shape_mismatch_is_decode_error() {
        #[derive(Debug, Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            count: i64,
        }

        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "count": "many" }
            })))
            .mount(&server)
            .await;

        let result: Result<QueryOutcome<Expected>, _> = gateway(&server, Session::in_memory())
            .execute("{ count }", serde_json::json!({}))
            .await;

        assert!(matches!(result, Err(QueryError::Decode(_))));
    }

    #[test]
    fn test_auth_markers() {
        let auth = |m: &str| GraphqlError { message: m.to_string() }.is_auth_failure();
        assert!(auth("Could not verify JWT: JWTExpired"));
        assert!(auth("unauthorized"));
        assert!(auth("Malformed Authorization header"));
        assert!(!auth("field \"foo\" not found"));
        // markers are case-sensitive substrings
        assert!(!auth("jwt"));
    }
}
