//! HTTP client for the MYFlood REST API.
//!
//! [`ApiClient`] is generic over a thin [`HttpClient`] transport so the whole
//! request path (auth headers, error mapping, envelope decoding) runs under
//! native tests against a mock. The browser build uses [`GlooHttpClient`].

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use myflood_shared::protocol::{
    AddNote, AdminResource, ApiRequest, AssignExpert, AuthKind, ErrorBody, HttpMethod, ListQuery,
    PostPayload, ResetPassword, StatusUpdate,
};
use myflood_shared::{FloodRequest, Post};

use crate::auth::Session;

#[cfg(test)]
pub mod tests;

/// Base URL of the REST API, overridable at compile time.
pub fn api_base_url() -> String {
    option_env!("MYFLOOD_API_URL")
        .unwrap_or("http://localhost:8000")
        .to_string()
}

// =========================================================
// Transport
// =========================================================

pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One-shot request transport. Errors are transport-level only (connection
/// refused, DNS); HTTP error statuses come back as responses.
#[async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, String>;
}

#[async_trait(?Send)]
impl<C: HttpClient> HttpClient for Rc<C> {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, String> {
        (**self).send(req).await
    }
}

/// Browser transport over `fetch`.
pub struct GlooHttpClient;

#[async_trait(?Send)]
impl HttpClient for GlooHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, String> {
        use gloo_net::http::Request;

        let mut builder = match req.method {
            HttpMethod::Get => Request::get(&req.url),
            HttpMethod::Post => Request::post(&req.url),
            HttpMethod::Put => Request::put(&req.url),
            HttpMethod::Patch => Request::patch(&req.url),
            HttpMethod::Delete => Request::delete(&req.url),
        };
        for (name, value) in &req.headers {
            builder = builder.header(name, value);
        }

        let response = match req.body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(body)
                .map_err(|e| e.to_string())?
                .send()
                .await
                .map_err(|e| e.to_string())?,
            None => builder.send().await.map_err(|e| e.to_string())?,
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// Errors
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    Network(String),
    /// Non-2xx response; `detail` is the server's message when it sent one.
    Server { status: u16, detail: String },
    /// 403 on an admin-authenticated call.
    SessionExpired,
    /// 2xx response whose body did not decode.
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e) => write!(f, "network error: {}", e),
            ApiError::Server { status, detail } => write!(f, "server error {}: {}", status, detail),
            ApiError::SessionExpired => write!(f, "admin session expired"),
            ApiError::Decode(e) => write!(f, "response decode error: {}", e),
        }
    }
}

impl ApiError {
    /// Message suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            ApiError::Server { detail, .. } => detail.clone(),
            ApiError::SessionExpired => {
                "Your admin session has expired. Please log in again.".to_string()
            }
            ApiError::Decode(_) => "Received an unexpected response from the server.".to_string(),
        }
    }
}

/// Pulls the items out of a list response. The backend wraps lists in a
/// one-field envelope (`{"requests": [...]}`); a bare array is accepted too.
pub fn parse_list_envelope<T: DeserializeOwned>(body: &str, field: &str) -> Result<Vec<T>, ApiError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    let items = match value {
        serde_json::Value::Array(_) => value,
        _ => value
            .get(field)
            .cloned()
            .ok_or_else(|| ApiError::Decode(format!("missing \"{}\" field in list response", field)))?,
    };
    serde_json::from_value(items).map_err(|e| ApiError::Decode(e.to_string()))
}

// =========================================================
// Client
// =========================================================

pub struct ApiClient<C: HttpClient> {
    base_url: String,
    http: C,
    session: Arc<Session>,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(base_url: impl Into<String>, http: C, session: Arc<Session>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http,
            session,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url, path_and_query)
    }

    fn apply_auth(&self, req: HttpRequest, auth: AuthKind) -> HttpRequest {
        let header = match auth {
            AuthKind::None => None,
            AuthKind::Bearer => self.session.auth_header(),
            AuthKind::Admin => self.session.admin_header(),
        };
        match header {
            Some((name, value)) => req.with_header(&name, &value),
            None => req,
        }
    }

    async fn request(
        &self,
        method: HttpMethod,
        path_and_query: &str,
        auth: AuthKind,
        body: Option<String>,
    ) -> Result<HttpResponse, ApiError> {
        let mut req = HttpRequest::new(method, self.url(path_and_query));
        req.body = body;
        let req = self.apply_auth(req, auth);
        let resp = self.http.send(req).await.map_err(|e| {
            leptos::logging::error!(
                "[api] {} {} failed: {}",
                method.as_str(),
                path_and_query,
                e
            );
            ApiError::Network(e)
        })?;
        if resp.is_success() {
            return Ok(resp);
        }
        if resp.status == 403 && auth == AuthKind::Admin {
            return Err(ApiError::SessionExpired);
        }
        let detail = serde_json::from_str::<ErrorBody>(&resp.body)
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or_else(|| format!("Request failed with status {}.", resp.status));
        Err(ApiError::Server {
            status: resp.status,
            detail,
        })
    }

    fn encode<B: Serialize>(body: &B) -> Result<String, ApiError> {
        serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(resp: &HttpResponse) -> Result<T, ApiError> {
        serde_json::from_str(&resp.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Executes a fixed-path operation described by an [`ApiRequest`] impl.
    pub async fn send<R: ApiRequest>(&self, req: &R) -> Result<R::Response, ApiError> {
        let body = match R::METHOD {
            HttpMethod::Get | HttpMethod::Delete => None,
            _ => Some(Self::encode(req)?),
        };
        let resp = self.request(R::METHOD, R::PATH, R::AUTH, body).await?;
        Self::decode(&resp)
    }

    // ---- admin collections ----

    pub async fn list<T: AdminResource>(&self, query: &ListQuery) -> Result<Vec<T>, ApiError> {
        let path = format!("{}{}", T::COLLECTION, query.to_query_string());
        let resp = self
            .request(HttpMethod::Get, &path, AuthKind::Admin, None)
            .await?;
        parse_list_envelope(&resp.body, T::LIST_FIELD)
    }

    pub async fn create<T: AdminResource>(&self, payload: &T::Payload) -> Result<(), ApiError> {
        let body = Self::encode(payload)?;
        self.request(HttpMethod::Post, T::COLLECTION, AuthKind::Admin, Some(body))
            .await?;
        Ok(())
    }

    pub async fn update<T: AdminResource>(
        &self,
        id: &str,
        payload: &T::Payload,
    ) -> Result<(), ApiError> {
        let path = format!("{}/{}", T::COLLECTION, id);
        let body = Self::encode(payload)?;
        self.request(HttpMethod::Put, &path, AuthKind::Admin, Some(body))
            .await?;
        Ok(())
    }

    pub async fn delete<T: AdminResource>(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("{}/{}", T::COLLECTION, id);
        self.request(HttpMethod::Delete, &path, AuthKind::Admin, None)
            .await?;
        Ok(())
    }

    // ---- request sub-actions ----

    pub async fn update_request_status(
        &self,
        id: &str,
        update: &StatusUpdate,
    ) -> Result<(), ApiError> {
        let path = format!("/admin/requests/{}/status", id);
        let body = Self::encode(update)?;
        self.request(HttpMethod::Patch, &path, AuthKind::Admin, Some(body))
            .await?;
        Ok(())
    }

    pub async fn assign_request(&self, id: &str, assign: &AssignExpert) -> Result<(), ApiError> {
        let path = format!("/admin/requests/{}/assign", id);
        let body = Self::encode(assign)?;
        self.request(HttpMethod::Patch, &path, AuthKind::Admin, Some(body))
            .await?;
        Ok(())
    }

    pub async fn add_request_note(&self, id: &str, note: &AddNote) -> Result<(), ApiError> {
        let path = format!("/admin/requests/{}/notes", id);
        let body = Self::encode(note)?;
        self.request(HttpMethod::Post, &path, AuthKind::Admin, Some(body))
            .await?;
        Ok(())
    }

    pub async fn reset_user_password(
        &self,
        id: &str,
        reset: &ResetPassword,
    ) -> Result<(), ApiError> {
        let path = format!("/admin/users/{}/reset-password", id);
        let body = Self::encode(reset)?;
        self.request(HttpMethod::Post, &path, AuthKind::Admin, Some(body))
            .await?;
        Ok(())
    }

    // ---- public and user endpoints ----

    pub async fn posts(&self) -> Result<Vec<Post>, ApiError> {
        let resp = self
            .request(HttpMethod::Get, "/posts", AuthKind::None, None)
            .await?;
        parse_list_envelope(&resp.body, "posts")
    }

    pub async fn org_posts(&self, organization: &str) -> Result<Vec<Post>, ApiError> {
        let mut query = ListQuery::new();
        query.push("organization", organization);
        let path = format!("/org-posts{}", query.to_query_string());
        let resp = self
            .request(HttpMethod::Get, &path, AuthKind::Bearer, None)
            .await?;
        parse_list_envelope(&resp.body, "posts")
    }

    pub async fn create_post(&self, payload: &PostPayload) -> Result<(), ApiError> {
        let body = Self::encode(payload)?;
        self.request(HttpMethod::Post, "/create-post", AuthKind::Bearer, Some(body))
            .await?;
        Ok(())
    }

    pub async fn update_post(&self, id: &str, payload: &PostPayload) -> Result<(), ApiError> {
        let path = format!("/update-post/{}", id);
        let body = Self::encode(payload)?;
        self.request(HttpMethod::Put, &path, AuthKind::Bearer, Some(body))
            .await?;
        Ok(())
    }

    pub async fn delete_post(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/delete-post/{}", id);
        self.request(HttpMethod::Delete, &path, AuthKind::Bearer, None)
            .await?;
        Ok(())
    }

    pub async fn user_requests(&self, email: &str) -> Result<Vec<FloodRequest>, ApiError> {
        let mut query = ListQuery::new();
        query.push("email", email);
        let path = format!("/user-requests{}", query.to_query_string());
        let resp = self
            .request(HttpMethod::Get, &path, AuthKind::Bearer, None)
            .await?;
        parse_list_envelope(&resp.body, "requests")
    }
}

/// The client the running app uses everywhere.
pub type AppApi = ApiClient<GlooHttpClient>;

// =========================================================
// Leptos context plumbing
// =========================================================

#[derive(Clone)]
pub struct ApiCtx(pub Arc<AppApi>);

pub fn provide_api(api: Arc<AppApi>) {
    leptos::prelude::provide_context(ApiCtx(api));
}

pub fn use_api() -> Arc<AppApi> {
    leptos::prelude::use_context::<ApiCtx>()
        .expect("ApiCtx should be provided at the app root")
        .0
}
