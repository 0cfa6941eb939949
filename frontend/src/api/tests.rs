use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde_json::json;

use myflood_shared::protocol::{
    AdminLoginRequest, ListQuery, StatusUpdate, SubmitFloodRequest,
};
use myflood_shared::{FloodNotification, FloodRequest, Region, RequestKind, RequestStatus};

use super::*;
use crate::auth::testing::test_session;

// =========================================================
// Mock transport
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_str(self.body.as_deref().unwrap_or("null")).unwrap()
    }
}

/// Canned-response transport keyed by `(method, url)`. Every request is
/// recorded; unmatched requests get a 404.
#[derive(Default)]
pub struct MockHttpClient {
    responses: RefCell<HashMap<(String, String), (u16, String)>>,
    failures: RefCell<HashSet<(String, String)>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl MockHttpClient {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn mock_response(&self, method: &str, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .insert((method.to_string(), url.to_string()), (status, body.to_string()));
    }

    /// Makes the transport itself fail for this request, as if the
    /// connection was refused.
    pub fn mock_failure(&self, method: &str, url: &str) {
        self.failures
            .borrow_mut()
            .insert((method.to_string(), url.to_string()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("at least one request should have been sent")
    }
}

#[async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, String> {
        let key = (req.method.as_str().to_string(), req.url.clone());
        self.requests.borrow_mut().push(RecordedRequest {
            method: key.0.clone(),
            url: key.1.clone(),
            headers: req.headers,
            body: req.body,
        });
        if self.failures.borrow().contains(&key) {
            return Err("connection refused".to_string());
        }
        let (status, body) = self
            .responses
            .borrow()
            .get(&key)
            .cloned()
            .unwrap_or((404, json!({"detail": "Not Found"}).to_string()));
        Ok(HttpResponse { status, body })
    }
}

fn test_client() -> (Rc<MockHttpClient>, ApiClient<Rc<MockHttpClient>>) {
    let (_, _, session) = test_session();
    let http = MockHttpClient::new();
    let api = ApiClient::new("http://api.test", Rc::clone(&http), session);
    (http, api)
}

fn sample_notification(id: &str) -> serde_json::Value {
    json!({
        "notification_id": id,
        "title": "Flash flood warning",
        "message": "Water level rising near Klang river.",
        "severity": "high",
        "affected_regions": ["selangor"],
        "is_active": true,
        "created_at": "2024-01-05T08:00:00Z",
        "updated_at": "2024-01-05T08:00:00Z"
    })
}

// =========================================================
// Tests
// =========================================================

#[tokio::test]
async fn admin_list_sends_admin_key_header() {
    let (http, api) = test_client();
    api.session().save_admin_info("key-42", "nadia");
    http.mock_response(
        "GET",
        "http://api.test/admin/notifications",
        200,
        json!({"notifications": [sample_notification("N1")]}),
    );

    let items: Vec<FloodNotification> = api.list(&ListQuery::new()).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].notification_id, "N1");
    assert_eq!(http.last_request().header("X-Admin-Key"), Some("key-42"));
}

#[tokio::test]
async fn list_query_is_appended_to_the_collection_path() {
    let (http, api) = test_client();
    api.session().save_admin_info("key", "nadia");
    http.mock_response(
        "GET",
        "http://api.test/admin/requests?search=boat%20rescue&status=pending",
        200,
        json!({"requests": []}),
    );

    let mut query = ListQuery::new();
    query.push("search", "boat rescue");
    query.push("status", "pending");
    let items: Vec<FloodRequest> = api.list(&query).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(
        http.last_request().url,
        "http://api.test/admin/requests?search=boat%20rescue&status=pending"
    );
}

#[tokio::test]
async fn forbidden_admin_call_maps_to_session_expired() {
    let (http, api) = test_client();
    api.session().save_admin_info("stale-key", "nadia");
    http.mock_response(
        "GET",
        "http://api.test/admin/notifications",
        403,
        json!({"detail": "Invalid admin key"}),
    );

    let err = api
        .list::<FloodNotification>(&ListQuery::new())
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::SessionExpired);
}

#[tokio::test]
async fn forbidden_public_call_is_a_plain_server_error() {
    let (http, api) = test_client();
    http.mock_response(
        "GET",
        "http://api.test/posts",
        403,
        json!({"detail": "Forbidden"}),
    );

    let err = api.posts().await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Server {
            status: 403,
            detail: "Forbidden".to_string()
        }
    );
}

#[tokio::test]
async fn server_detail_is_surfaced() {
    let (http, api) = test_client();
    api.session().save_admin_info("key", "nadia");
    http.mock_response(
        "POST",
        "http://api.test/admin/announcements",
        400,
        json!({"detail": "Title is required"}),
    );

    let err = api
        .create::<myflood_shared::Announcement>(&myflood_shared::protocol::AnnouncementPayload {
            title: String::new(),
            content: "x".into(),
            is_active: true,
        })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Title is required");
}

#[tokio::test]
async fn transport_failure_maps_to_network_error() {
    let (http, api) = test_client();
    http.mock_failure("GET", "http://api.test/posts");
    let err = api.posts().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[tokio::test]
async fn submit_request_posts_the_expected_body() {
    let (http, api) = test_client();
    http.mock_response(
        "POST",
        "http://api.test/submit-request",
        200,
        json!({"message": "Request submitted"}),
    );

    api.send(&SubmitFloodRequest {
        user_name: "Aminah".into(),
        user_email: "aminah@b.co".into(),
        region: Region::Selangor,
        request_type: RequestKind::Help,
        details: "Need a boat rescue near Kampung Baru.".into(),
        priority: None,
    })
    .await
    .unwrap();

    let sent = http.last_request();
    let body = sent.body_json();
    assert_eq!(body["region"], "selangor");
    assert_eq!(body["request_type"], "help");
    assert_eq!(body["details"], "Need a boat rescue near Kampung Baru.");
    assert_eq!(body["user_email"], "aminah@b.co");
    assert!(body.get("priority").is_none());
    // Unauthenticated endpoint: no auth headers attached.
    assert_eq!(sent.header("Authorization"), None);
    assert_eq!(sent.header("X-Admin-Key"), None);
}

#[tokio::test]
async fn status_update_patches_the_sub_resource() {
    let (http, api) = test_client();
    api.session().save_admin_info("key", "nadia");
    http.mock_response(
        "PATCH",
        "http://api.test/admin/requests/R7/status",
        200,
        json!({"message": "updated"}),
    );

    api.update_request_status(
        "R7",
        &StatusUpdate {
            status: RequestStatus::Resolved,
            admin_note: Some("handled".into()),
        },
    )
    .await
    .unwrap();

    let sent = http.last_request();
    assert_eq!(sent.method, "PATCH");
    assert_eq!(
        sent.body,
        Some(r#"{"status":"resolved","admin_note":"handled"}"#.to_string())
    );
}

#[tokio::test]
async fn admin_login_carries_no_auth_header() {
    let (http, api) = test_client();
    http.mock_response(
        "POST",
        "http://api.test/admin/admin-login",
        200,
        json!({"admin_key": "fresh-key", "username": "nadia"}),
    );

    let resp = api
        .send(&AdminLoginRequest {
            username: "nadia".into(),
            password: "secret123".into(),
        })
        .await
        .unwrap();
    assert_eq!(resp.admin_key, "fresh-key");
    assert_eq!(http.last_request().header("X-Admin-Key"), None);
}

#[tokio::test]
async fn bearer_endpoints_attach_the_token() {
    let (http, api) = test_client();
    api.session().save_token("tok-1", 3600.0);
    http.mock_response(
        "GET",
        "http://api.test/user-requests?email=aminah%40b.co",
        200,
        json!({"requests": []}),
    );

    let items = api.user_requests("aminah@b.co").await.unwrap();
    assert!(items.is_empty());
    assert_eq!(
        http.last_request().header("Authorization"),
        Some("Bearer tok-1")
    );
}

#[test]
fn list_envelope_accepts_field_or_bare_array() {
    let enveloped = json!({"notifications": [sample_notification("N1")]}).to_string();
    let items: Vec<FloodNotification> =
        parse_list_envelope(&enveloped, "notifications").unwrap();
    assert_eq!(items[0].notification_id, "N1");

    let bare = json!([sample_notification("N2")]).to_string();
    let items: Vec<FloodNotification> = parse_list_envelope(&bare, "notifications").unwrap();
    assert_eq!(items[0].notification_id, "N2");

    let wrong = json!({"something_else": []}).to_string();
    let err = parse_list_envelope::<FloodNotification>(&wrong, "notifications").unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let (_, _, session) = test_session();
    let api = ApiClient::new("http://api.test/", GlooHttpClient, session);
    assert_eq!(api.url("/posts"), "http://api.test/posts");
}
