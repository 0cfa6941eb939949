//! Wire protocol between the frontend and the external REST API.
//!
//! Fixed-path operations are described by the [`ApiRequest`] trait (request
//! type, response type, path, method, auth). Admin-managed collections share
//! one description, [`AdminResource`], which is what lets the five CRUD
//! manager screens run on a single controller.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    DashboardStats, FloodNotification, Announcement, EmergencyContact, FloodRequest, Priority,
    Region, RequestKind, RequestStatus, Role, Severity, User,
};

// =========================================================
// HTTP vocabulary
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// How a call authenticates.
///
/// `Admin` calls carry the opaque admin key in the `X-Admin-Key` header; a
/// 403 on such a call means the admin session is no longer valid. `Bearer`
/// calls carry the user token. Public endpoints under `/admin/public/` are
/// `None` even though their path is admin-prefixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    None,
    Bearer,
    Admin,
}

/// Describes one fixed-path API operation: the request body type, the
/// response it decodes to, and the routing metadata.
pub trait ApiRequest: Serialize {
    type Response: DeserializeOwned;
    const PATH: &'static str;
    const METHOD: HttpMethod;
    const AUTH: AuthKind;
}

// =========================================================
// Admin-managed collections
// =========================================================

/// One admin-managed REST collection.
///
/// Implemented by every entity the admin UI lists, creates, edits and
/// deletes. `LIST_FIELD` names the JSON envelope field the backend wraps
/// list responses in, e.g. `{"notifications": [...]}`.
pub trait AdminResource: Clone + PartialEq + Serialize + DeserializeOwned + 'static {
    /// Collection path, e.g. `/admin/notifications`.
    const COLLECTION: &'static str;
    /// Singular noun used in user-facing messages.
    const NOUN: &'static str;
    /// Envelope field of the list response.
    const LIST_FIELD: &'static str;
    /// Body of create/update calls.
    type Payload: Serialize + Clone + 'static;

    fn id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub affected_regions: Vec<Region>,
    pub is_active: bool,
}

impl AdminResource for FloodNotification {
    const COLLECTION: &'static str = "/admin/notifications";
    const NOUN: &'static str = "Notification";
    const LIST_FIELD: &'static str = "notifications";
    type Payload = NotificationPayload;

    fn id(&self) -> &str {
        &self.notification_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementPayload {
    pub title: String,
    pub content: String,
    pub is_active: bool,
}

impl AdminResource for Announcement {
    const COLLECTION: &'static str = "/admin/announcements";
    const NOUN: &'static str = "Announcement";
    const LIST_FIELD: &'static str = "announcements";
    type Payload = AnnouncementPayload;

    fn id(&self) -> &str {
        &self.announcement_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    pub role: String,
    pub phone: String,
    pub email: Option<String>,
    pub region: Option<Region>,
    pub is_active: bool,
}

impl AdminResource for EmergencyContact {
    const COLLECTION: &'static str = "/admin/emergency-contacts";
    const NOUN: &'static str = "Contact";
    const LIST_FIELD: &'static str = "contacts";
    type Payload = ContactPayload;

    fn id(&self) -> &str {
        &self.contact_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub is_banned: bool,
}

impl AdminResource for User {
    const COLLECTION: &'static str = "/admin/users";
    const NOUN: &'static str = "User";
    const LIST_FIELD: &'static str = "users";
    type Payload = UserPayload;

    fn id(&self) -> &str {
        &self.user_id
    }
}

// Requests are created by citizens, never by the admin UI; admin mutations
// go through the status/assign/notes sub-actions instead of a payload.
impl AdminResource for FloodRequest {
    const COLLECTION: &'static str = "/admin/requests";
    const NOUN: &'static str = "Request";
    const LIST_FIELD: &'static str = "requests";
    type Payload = ();

    fn id(&self) -> &str {
        &self.request_id
    }
}

// =========================================================
// Fixed-path operations
// =========================================================

/// Minimal acknowledgement envelope; tolerant of whatever the backend
/// actually returns alongside a 2xx.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Ack {
    pub message: Option<String>,
}

/// Server error envelope on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ErrorBody {
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub email: String,
    /// Role as reported by the server; parsed (not trusted) client-side.
    pub role: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<f64>,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const PATH: &'static str = "/login";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: AuthKind = AuthKind::None;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl ApiRequest for RegisterRequest {
    type Response = Ack;
    const PATH: &'static str = "/register";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: AuthKind = AuthKind::None;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    pub admin_key: String,
    pub username: String,
}

impl ApiRequest for AdminLoginRequest {
    type Response = AdminLoginResponse;
    const PATH: &'static str = "/admin/admin-login";
    const METHOD: HttpMethod = HttpMethod::Post;
    // The login call itself is unauthenticated; a failure here is a wrong
    // password, not an expired session.
    const AUTH: AuthKind = AuthKind::None;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitFloodRequest {
    pub user_name: String,
    pub user_email: String,
    pub region: Region,
    pub request_type: RequestKind,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

impl ApiRequest for SubmitFloodRequest {
    type Response = Ack;
    const PATH: &'static str = "/submit-request";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: AuthKind = AuthKind::None;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = Ack;
    const PATH: &'static str = "/update-user-profile";
    const METHOD: HttpMethod = HttpMethod::Put;
    const AUTH: AuthKind = AuthKind::Bearer;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStatsRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStatsResponse {
    pub dashboard_stats: DashboardStats,
}

impl ApiRequest for DashboardStatsRequest {
    type Response = DashboardStatsResponse;
    const PATH: &'static str = "/admin/dashboard/stats";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTH: AuthKind = AuthKind::Admin;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicNotificationsRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationList {
    pub notifications: Vec<FloodNotification>,
}

impl ApiRequest for PublicNotificationsRequest {
    type Response = NotificationList;
    const PATH: &'static str = "/admin/public/notifications";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTH: AuthKind = AuthKind::None;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAnnouncementsRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementList {
    pub announcements: Vec<Announcement>,
}

impl ApiRequest for PublicAnnouncementsRequest {
    type Response = AnnouncementList;
    const PATH: &'static str = "/admin/public/announcements";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTH: AuthKind = AuthKind::None;
}

/// Body of expert post create/update calls. Posts live outside the admin
/// collection scheme (their endpoints predate it), so they get their own
/// payload instead of an [`AdminResource`] impl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostPayload {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub organization: String,
}

// =========================================================
// Request sub-action payloads
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignExpert {
    pub expert_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddNote {
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetPassword {
    pub new_password: String,
}

// =========================================================
// Query strings
// =========================================================

/// Ordered query-string builder for list filters.
///
/// Values are percent-encoded; keys are trusted literals. An empty builder
/// renders as the empty string so callers can always append the result to a
/// path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pairs: Vec<(&'static str, String)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &'static str, value: impl Into<String>) {
        self.pairs.push((key, value.into()));
    }

    /// Appends the pair only when the value is non-empty.
    pub fn push_if(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.pairs.push((key, value));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        let mut out = String::from("?");
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                out.push('&');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(&percent_encode(value));
        }
        out
    }
}

/// Percent-encodes everything outside the unreserved set. Enough for filter
/// values typed by humans; structured data never travels in query strings.
pub fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{:02X}", byte));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_renders_empty() {
        assert_eq!(ListQuery::new().to_query_string(), "");
    }

    #[test]
    fn query_preserves_order_and_encodes_values() {
        let mut q = ListQuery::new();
        q.push("search", "boat rescue");
        q.push("status", "pending");
        q.push("note", "a&b=c");
        assert_eq!(
            q.to_query_string(),
            "?search=boat%20rescue&status=pending&note=a%26b%3Dc"
        );
    }

    #[test]
    fn push_if_skips_empty_values() {
        let mut q = ListQuery::new();
        q.push_if("severity", "");
        q.push_if("region", "selangor");
        assert_eq!(q.to_query_string(), "?region=selangor");
    }

    #[test]
    fn admin_collections_are_admin_prefixed() {
        assert_eq!(FloodNotification::COLLECTION, "/admin/notifications");
        assert_eq!(User::COLLECTION, "/admin/users");
        assert_eq!(EmergencyContact::COLLECTION, "/admin/emergency-contacts");
        assert_eq!(FloodRequest::COLLECTION, "/admin/requests");
        assert_eq!(Announcement::COLLECTION, "/admin/announcements");
    }

    #[test]
    fn submitted_request_carries_priority_only_when_chosen() {
        let mut req = SubmitFloodRequest {
            user_name: "Aminah".into(),
            user_email: "aminah@example.com".into(),
            region: Region::Selangor,
            request_type: RequestKind::Help,
            details: "need boat rescue".into(),
            priority: None,
        };
        let body = serde_json::to_string(&req).unwrap();
        assert!(!body.contains("priority"));

        req.priority = Some(Priority::High);
        let body = serde_json::to_string(&req).unwrap();
        assert!(body.contains(r#""priority":"high""#));
    }

    #[test]
    fn status_update_omits_absent_note() {
        let body = serde_json::to_string(&StatusUpdate {
            status: RequestStatus::Resolved,
            admin_note: None,
        })
        .unwrap();
        assert_eq!(body, r#"{"status":"resolved"}"#);

        let body = serde_json::to_string(&StatusUpdate {
            status: RequestStatus::Resolved,
            admin_note: Some("handled".into()),
        })
        .unwrap();
        assert_eq!(body, r#"{"status":"resolved","admin_note":"handled"}"#);
    }
}
