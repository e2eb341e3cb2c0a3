// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Generic code for REST handlers.
//!
//! All services should implement an `app` function in their `rest` module that returns the
//! `Router` for the application.
//!
//! Every API should be put in its own `.rs` file, using a name like `<entity>_<method>.rs`.  This
//! may seem overkill, but putting every API in its own file makes it easy to ensure all the
//! integration tests for the given API truly belong to that API.
//!
//! More specifically, the `tests` module within an API should define a `route` method that
//! returns the HTTP method and the API path under test.  All integration tests within the module
//! then rely on `route` to obtain this information, ensuring that they all test the desired API.
//!
//! Errors are always returned to the client as an `ErrorDetails` JSON envelope, and requests
//! that carry input should be checked with the `ValidJson` and `ValidQuery` extractors so that
//! field-level problems are reported consistently.

use crate::driver::DriverError;
use async_trait::async_trait;
use axum::Json;
use axum::body::HttpBody;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::header::AsHeaderName;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Title used for errors caused by a request the client should not have sent.
const BAD_REQUEST_TITLE: &str = "Bad Request Exception, check the documentation";

/// Title used for errors caused by request fields that did not pass validation.
const INVALID_FIELDS_TITLE: &str = "Bad Request Exception, Invalid Fields";

/// Describes why a single field of a request was rejected.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    /// Name of the offending field as it appears in the request.
    pub field: String,

    /// Human-readable explanation of the problem.
    pub message: String,
}

impl FieldError {
    /// Creates a new error for `field` explained by `message`.
    pub fn new<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Joins the field names of `errors` the way they are reported to clients.
fn join_fields(errors: &[FieldError]) -> String {
    errors.iter().map(|e| e.field.as_str()).collect::<Vec<&str>>().join(",")
}

/// Joins the messages of `errors` the way they are reported to clients.
fn join_messages(errors: &[FieldError]) -> String {
    errors.iter().map(|e| e.message.as_str()).collect::<Vec<&str>>().join(", ")
}

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RestError {
    /// Indicates an authorization problem.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Catch-all error type for all unexpected errors.
    #[error("{0}")]
    InternalError(String),

    /// Indicates an error in the contents of the request.
    #[error("{0}")]
    InvalidRequest(String),

    /// Indicates that a requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates that a request that should have empty content did not.
    #[error("Content should be empty")]
    PayloadNotEmpty,

    /// Indicates an authentication problem.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Expected authorization scheme.
        scheme: &'static str,

        /// Expected authorization realm.
        realm: &'static str,

        /// Descriptive message explaining the nature of the problem.
        message: String,
    },

    /// Indicates that one or more fields of the request are invalid.
    #[error("{}", join_messages(.0))]
    ValidationFailed(Vec<FieldError>),
}

impl RestError {
    /// Returns the name of the error kind, which is reported to clients as the developer message.
    fn kind(&self) -> &'static str {
        match self {
            RestError::Forbidden(_) => "Forbidden",
            RestError::InternalError(_) => "InternalError",
            RestError::InvalidRequest(_) => "InvalidRequest",
            RestError::NotFound(_) => "NotFound",
            RestError::PayloadNotEmpty => "PayloadNotEmpty",
            RestError::Unauthorized { .. } => "Unauthorized",
            RestError::ValidationFailed(_) => "ValidationFailed",
        }
    }

    /// Returns the HTTP status code and the title to report for this error.
    fn status_and_title(&self) -> (StatusCode, &'static str) {
        match self {
            RestError::Forbidden(_) => (StatusCode::FORBIDDEN, "Forbidden, access denied"),
            RestError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            RestError::InvalidRequest(_) | RestError::NotFound(_) => {
                (StatusCode::BAD_REQUEST, BAD_REQUEST_TITLE)
            }
            RestError::PayloadNotEmpty => (StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large"),
            RestError::Unauthorized { .. } => {
                (StatusCode::UNAUTHORIZED, "Unauthorized, authentication required")
            }
            RestError::ValidationFailed(_) => (StatusCode::BAD_REQUEST, INVALID_FIELDS_TITLE),
        }
    }
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::AlreadyExists(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::BackendError(_) => RestError::InternalError(e.to_string()),
            DriverError::InvalidInput(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::NotFound(_) => RestError::NotFound(e.to_string()),
            DriverError::Unauthorized(_) => RestError::Forbidden(e.to_string()),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let (status, title) = self.status_and_title();

        let mut headers = HeaderMap::new();
        if let RestError::Unauthorized { scheme, realm, .. } = &self {
            if let Ok(value) = HeaderValue::from_str(&format!("{} realm=\"{}\"", scheme, realm)) {
                headers.insert(axum::http::header::WWW_AUTHENTICATE, value);
            }
        }

        let (fields, fields_message) = match &self {
            RestError::ValidationFailed(errors) => {
                (Some(join_fields(errors)), Some(join_messages(errors)))
            }
            _ => (None, None),
        };

        let details = ErrorDetails {
            title: title.to_owned(),
            status: status.as_u16(),
            details: self.to_string(),
            developer_message: self.kind().to_owned(),
            timestamp: OffsetDateTime::now_utc(),
            fields,
            fields_message,
        };

        (status, headers, Json(details)).into_response()
    }
}

/// Result type for this module.
pub type RestResult<T> = Result<T, RestError>;

/// Representation of the details of an error response.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    /// Short summary of the class of error.
    pub title: String,

    /// HTTP status code, repeated in the body for the convenience of clients.
    pub status: u16,

    /// Textual representation of the error message.
    pub details: String,

    /// Kind of the error, useful to developers debugging a failed request.
    pub developer_message: String,

    /// Time at which the error was generated.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,

    /// Comma-separated names of the fields that did not pass validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,

    /// Comma-separated messages explaining why the fields did not pass validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_message: Option<String>,
}

/// Conversion from a raw request representation into a validated one.
///
/// Implementations should report every offending field at once instead of stopping at the first
/// problem so that clients can fix their requests in one go.
pub trait Validate {
    /// Type of the request once it has passed validation.
    type Valid;

    /// Checks the contents of the request and converts it into its validated form.
    fn validate(self) -> Result<Self::Valid, Vec<FieldError>>;
}

/// A JSON body extractor that validates the payload before handing it to the handler.
///
/// Payloads that are not JSON are rejected the same way `axum::Json` does.  Well-formed JSON
/// that doesn't match the shape of `T`, such as a field with the wrong type, is reported as an
/// invalid request.
pub struct ValidJson<T: Validate>(pub T::Valid);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let raw = match Json::<T>::from_request(req, state).await {
            Ok(Json(raw)) => raw,
            Err(JsonRejection::JsonDataError(e)) => {
                return Err(RestError::InvalidRequest(e.body_text()).into_response());
            }
            Err(e) => return Err(e.into_response()),
        };
        match raw.validate() {
            Ok(valid) => Ok(ValidJson(valid)),
            Err(errors) => Err(RestError::ValidationFailed(errors).into_response()),
        }
    }
}

/// A query string extractor that validates the parameters before handing them to the handler.
///
/// Parameters that cannot be parsed into `T` are reported as an invalid request.
pub struct ValidQuery<T: Validate>(pub T::Valid);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| RestError::InvalidRequest(e.body_text()).into_response())?;
        match raw.validate() {
            Ok(valid) => Ok(ValidQuery(valid)),
            Err(errors) => Err(RestError::ValidationFailed(errors).into_response()),
        }
    }
}

/// A request body extractor that forbids any content.
///
/// Any API that doesn't expect a body should use this to ensure we don't get garbage data that we
/// don't care about.  This future-proofs the service.
pub struct EmptyBody {}

#[async_trait]
impl<S> FromRequest<S> for EmptyBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if req.into_body().is_end_stream() {
            Ok(EmptyBody {})
        } else {
            Err(RestError::PayloadNotEmpty)
        }
    }
}

/// Extracts the header `name` from `headers` and ensures it has at most one value.
pub fn get_unique_header<K: AsHeaderName + Copy>(
    headers: &HeaderMap,
    name: K,
) -> RestResult<Option<&HeaderValue>> {
    let mut iter = headers.get_all(name).iter();
    let value = iter.next();
    if iter.next().is_some() {
        return Err(RestError::InvalidRequest(format!(
            "Header {} cannot have more than one value",
            name.as_str()
        )));
    }
    Ok(value)
}

/// Common test code for the REST server.
#[cfg(any(test, feature = "testutils"))]
pub mod testutils {
    use super::*;
    use axum::Router;
    use axum::http::{self, HeaderName};
    use base64::Engine;
    use base64::engine::general_purpose;
    use std::fmt;
    use tower::util::ServiceExt;

    /// Maximum body size for testing purposes.
    const MAX_BODY_SIZE: usize = 64 * 1024;

    /// Builder for a single request to the API server.
    #[must_use]
    pub struct OneShotBuilder {
        /// The router for the app being tested.
        app: Router,

        /// Builder for the request that will be sent to the app.
        builder: http::request::Builder,
    }

    impl OneShotBuilder {
        /// Creates a new request against a given `method`/`uri` pair served by an `app` router.
        pub fn new<U: AsRef<str>>(app: Router, (method, uri): (http::Method, U)) -> Self {
            let builder = Request::builder().method(method).uri(uri.as_ref());
            Self { app, builder }
        }

        /// Extends the URI in the request with a `query`.
        pub fn with_query<Q: Serialize>(mut self, query: Q) -> Self {
            let uri = self.builder.uri_ref().unwrap().to_string();
            assert!(!uri.contains('?'), "URI already contains a query: {}", uri);
            self.builder = self.builder.uri(format!(
                "{}?{}",
                uri,
                serde_urlencoded::to_string(query).unwrap()
            ));
            self
        }

        /// Adds basic authentication to the request.
        pub fn with_basic_auth<U, P>(mut self, username: U, password: P) -> Self
        where
            U: fmt::Display,
            P: fmt::Display,
        {
            let value = format!(
                "Basic {}",
                general_purpose::STANDARD.encode(format!("{}:{}", username, password))
            );
            self.builder = self.builder.header(http::header::AUTHORIZATION, value);
            self
        }

        /// Sets the header `name` to `value` in the outgoing request.
        pub fn with_header<K, V>(mut self, name: K, value: V) -> Self
        where
            HeaderName: TryFrom<K>,
            <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
            HeaderValue: TryFrom<V>,
            <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
        {
            self.builder = self.builder.header(name, value);
            self
        }

        /// Finishes building the request and sends it with an empty payload.
        pub async fn send_empty(self) -> ResponseChecker {
            let request = self.builder.body(axum::body::Body::empty()).unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with a text payload.
        pub async fn send_text<T: Into<String>>(self, text: T) -> ResponseChecker {
            let request = self
                .builder
                .header(http::header::CONTENT_TYPE, mime::TEXT_PLAIN.as_ref())
                .body(axum::body::Body::from(text.into()))
                .unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with a JSON payload.
        pub async fn send_json<T: Serialize>(self, request: T) -> ResponseChecker {
            let request = self
                .builder
                .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                .body(axum::body::Body::from(serde_json::to_vec(&request).unwrap()))
                .unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }
    }

    /// Validator for the outcome of a request sent by a `OneShotBuilder`.
    #[must_use]
    pub struct ResponseChecker {
        /// Actual response that we received from the app.
        response: Response,

        /// Expected HTTP status code in the response above.
        exp_status: StatusCode,
    }

    impl From<Response> for ResponseChecker {
        fn from(response: Response) -> Self {
            Self { response, exp_status: StatusCode::OK }
        }
    }

    impl ResponseChecker {
        /// Sets the expected exit HTTP status to `status`.
        pub fn expect_status(mut self, status: StatusCode) -> Self {
            self.exp_status = status;
            self
        }

        /// Performs common validation operations on the response.
        pub fn verify(&self) {
            assert_eq!(self.exp_status, self.response.status());
        }

        /// Consumes the response and returns its body as raw bytes.
        async fn take_body(self) -> Vec<u8> {
            axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap().to_vec()
        }

        /// Finishes checking the response and expects it to contain an empty body.
        pub async fn expect_empty(self) {
            self.verify();

            let body = String::from_utf8(self.take_body().await).unwrap();
            assert!(body.is_empty(), "Body not empty; got {}", body);
        }

        /// Finishes checking the response and expects its body to be an `ErrorDetails` envelope
        /// consistent with the response status.  Returns the envelope for further checks.
        pub async fn expect_error_details(self) -> ErrorDetails {
            self.verify();

            let status = self.response.status();
            let body = self.take_body().await;
            let details: ErrorDetails = match serde_json::from_slice(&body) {
                Ok(details) => details,
                Err(e) => {
                    let body = String::from_utf8(body).unwrap();
                    panic!("Invalid error response due to {}; content was {}", e, body);
                }
            };
            assert_eq!(status.as_u16(), details.status);
            details
        }

        /// Finishes checking the response and expects its body to be an `ErrorDetails` whose
        /// `details` match `exp_re`.
        pub async fn expect_error(self, exp_re: &str) {
            let details = self.expect_error_details().await;
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(
                re.is_match(&details.details),
                "Response content '{:?}' does not match re '{}'",
                details,
                exp_re
            );
        }

        /// Finishes checking the response and expects it to be a validation error that reports
        /// the comma-separated `exp_fields` and the `exp_fields_message`.
        pub async fn expect_validation_error(self, exp_fields: &str, exp_fields_message: &str) {
            let details =
                self.expect_status(StatusCode::BAD_REQUEST).expect_error_details().await;
            assert_eq!(INVALID_FIELDS_TITLE, details.title);
            assert_eq!("ValidationFailed", details.developer_message);
            assert_eq!(Some(exp_fields), details.fields.as_deref());
            assert_eq!(Some(exp_fields_message), details.fields_message.as_deref());
        }

        /// Finishes checking the response and expects it to contain a valid JSON object of
        /// type `T`.
        pub async fn expect_json<T: DeserializeOwned>(self) -> T {
            self.verify();

            let body = self.take_body().await;
            serde_json::from_slice::<T>(&body).unwrap()
        }

        /// Finishes checking the response and expects its body to be valid UTF-8 and to match
        /// `exp_re`.
        pub async fn expect_text(self, exp_re: &str) {
            assert!(!exp_re.is_empty(), "Use expect_empty to validate empty responses");

            self.verify();

            let body = String::from_utf8(self.take_body().await).unwrap();
            assert!(
                !body.contains("\"developerMessage\":"),
                "Use expect_error to validate errors wrapped in an ErrorDetails"
            );
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(re.is_match(&body), "Body content '{}' does not match re '{}'", body, exp_re);
        }

        /// Finishes checking the response and returns the response itself for out of band
        /// validation of properties not supported by the `ResponseChecker`.
        pub async fn take_response(self) -> Response {
            self.verify();

            self.response
        }
    }

    /// Generates a test to verify that an API that expects JSON fails when it gets something else.
    ///
    /// The optional `auth` credentials are sent with every request so that the checks reach the
    /// handler when the API sits behind authentication.
    #[macro_export]
    macro_rules! test_payload_must_be_json {
        ( $app:expr, $route:expr $(, auth = ($username:expr, $password:expr))? ) => {
            #[tokio::test]
            async fn test_payload_must_be_json() {
                // JSON deserialization errors are produced by axum and are not wrapped in an
                // ErrorDetails envelope, so we can only check for their text.

                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    $( .with_basic_auth($username, $password) )?
                    .send_text("this is not json")
                    .await
                    .expect_status(axum::http::StatusCode::UNSUPPORTED_MEDIA_TYPE)
                    .expect_text("Content-Type")
                    .await;

                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    $( .with_basic_auth($username, $password) )?
                    .with_header(axum::http::header::CONTENT_TYPE, "application/json")
                    .send_text("this is not json")
                    .await
                    .expect_status(axum::http::StatusCode::BAD_REQUEST)
                    .expect_text("expected ident")
                    .await;
            }
        };
    }

    pub use test_payload_must_be_json;

    /// Generates a test to verify that an API that does not expect a payload fails as necessary.
    #[macro_export]
    macro_rules! test_payload_must_be_empty {
        ( $app:expr, $route:expr $(, auth = ($username:expr, $password:expr))? ) => {
            #[tokio::test]
            async fn test_payload_must_be_empty() {
                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    $( .with_basic_auth($username, $password) )?
                    .send_text("should not be here")
                    .await
                    .expect_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE)
                    .expect_error("should be empty")
                    .await;
            }
        };
    }

    pub use test_payload_must_be_empty;
}
