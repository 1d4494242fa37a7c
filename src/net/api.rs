//! REST transport used by every network call in the console.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`, with cookies included so
//! the server-side session travels with each request.
//! Elsewhere (tests, native builds): [`BrowserClient`] returns a transport
//! failure, since these endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Transport problems and non-2xx responses both come back as [`HttpError`];
//! callers classify them (see [`crate::net::types::AuthError`]) instead of
//! inspecting bodies themselves.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use serde_json::Value;

/// Cookie holding the anti-forgery token set by the csrf-cookie endpoint.
pub const XSRF_COOKIE: &str = "XSRF-TOKEN";

/// Header the server expects the anti-forgery token echoed in.
pub const XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// HTTP verbs the console issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// A request against a named endpoint path.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API origin (e.g. `/api/user`).
    pub path: String,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: None, query: Vec::new() }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Append one query-string pair.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// A failed request: the response status (if any arrived) and its body.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("request failed (status {status:?}): {body}")]
pub struct HttpError {
    /// `None` when no response was received.
    pub status: Option<u16>,
    pub body: Value,
}

impl HttpError {
    /// A failure with no response (network down, CORS, aborted).
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self { status: None, body: serde_json::json!({ "message": message.into() }) }
    }
}

/// HTTP verbs against named endpoints, returning parsed JSON or a failure.
///
/// Futures are not `Send`: the browser is single-threaded and the session
/// store holds its clients in `Rc`.
#[async_trait(?Send)]
pub trait ResourceClient {
    /// Send one request. Non-2xx responses become `Err`.
    ///
    /// # Errors
    ///
    /// Returns an [`HttpError`] carrying the status and server body, or a
    /// status of `None` when the request never got a response.
    async fn send(&self, request: ApiRequest) -> Result<Value, HttpError>;
}

// =============================================================================
// BROWSER CLIENT
// =============================================================================

/// `gloo-net` transport rooted at the API origin.
#[derive(Clone, Debug)]
pub struct BrowserClient {
    base_url: String,
}

impl BrowserClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }

    /// Absolute URL for `path`. Already-absolute paths pass through.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

#[async_trait(?Send)]
impl ResourceClient for BrowserClient {
    async fn send(&self, request: ApiRequest) -> Result<Value, HttpError> {
        #[cfg(feature = "csr")]
        {
            self.send_browser(request).await
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (&self.base_url, request);
            Err(HttpError::network("not available outside the browser"))
        }
    }
}

#[cfg(feature = "csr")]
impl BrowserClient {
    async fn send_browser(&self, request: ApiRequest) -> Result<Value, HttpError> {
        use gloo_net::http::{Method as HttpMethod, RequestBuilder};
        use web_sys::RequestCredentials;

        let method = match request.method {
            Method::Get => HttpMethod::GET,
            Method::Post => HttpMethod::POST,
            Method::Put => HttpMethod::PUT,
            Method::Patch => HttpMethod::PATCH,
            Method::Delete => HttpMethod::DELETE,
        };

        let mut builder = RequestBuilder::new(&self.url(&request.path))
            .method(method)
            .credentials(RequestCredentials::Include)
            .header("Accept", "application/json")
            .header("X-Requested-With", "XMLHttpRequest");
        if !request.query.is_empty() {
            builder = builder.query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        if let Some(token) = read_xsrf_cookie() {
            builder = builder.header(XSRF_HEADER, &token);
        }

        let sent = match &request.body {
            Some(body) => {
                builder
                    .json(body)
                    .map_err(|e| HttpError::network(e.to_string()))?
                    .send()
                    .await
            }
            None => builder.send().await,
        };
        let response = sent.map_err(|e| HttpError::network(e.to_string()))?;

        let status = response.status();
        let ok = response.ok();
        let text = response
            .text()
            .await
            .map_err(|e| HttpError::network(e.to_string()))?;
        let body = parse_body(&text);
        if ok { Ok(body) } else { Err(HttpError { status: Some(status), body }) }
    }
}

#[cfg(feature = "csr")]
fn read_xsrf_cookie() -> Option<String> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()?.document()?;
    let cookies = document.dyn_into::<web_sys::HtmlDocument>().ok()?.cookie().ok()?;
    xsrf_token_from_cookies(&cookies)
}

// =============================================================================
// HELPERS
// =============================================================================

/// Parse a response body: empty is `Null`, non-JSON text is kept as a string.
pub(crate) fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

/// Find the anti-forgery token in a `document.cookie` string and URL-decode it.
pub(crate) fn xsrf_token_from_cookies(cookies: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == XSRF_COOKIE)
        .map(|(_, value)| String::from_utf8_lossy(&urlencoding::decode_binary(value.as_bytes())).into_owned())
        .filter(|token| !token.is_empty())
}
