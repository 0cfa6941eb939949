use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod protocol;
pub mod validate;

// =========================================================
// Constants
// =========================================================

/// Header carrying the opaque admin session key on admin endpoints.
pub const HEADER_ADMIN_KEY: &str = "X-Admin-Key";

/// Browser local-storage key names. The names are part of the deployed
/// contract (existing sessions survive upgrades), so they are fixed here.
pub const KEY_AUTH_TOKEN: &str = "auth_token";
pub const KEY_TOKEN_EXPIRATION: &str = "token_expiration";
pub const KEY_ADMIN_KEY: &str = "admin_key";
pub const KEY_ADMIN_NAME: &str = "admin_name";
pub const KEY_USER_EMAIL: &str = "userEmail";
pub const KEY_USER_FULL_NAME: &str = "userFullName";
pub const KEY_USER_IMG: &str = "userIMG";
pub const KEY_USER_ID: &str = "userID";

// =========================================================
// Enumerations
// =========================================================

/// The sixteen Malaysian states and federal territories used as the
/// region/tag dimension across requests, notifications and contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Johor,
    Kedah,
    Kelantan,
    KualaLumpur,
    Labuan,
    Malacca,
    NegeriSembilan,
    Pahang,
    Penang,
    Perak,
    Perlis,
    Putrajaya,
    Sabah,
    Sarawak,
    Selangor,
    Terengganu,
}

impl Region {
    pub const ALL: [Region; 16] = [
        Region::Johor,
        Region::Kedah,
        Region::Kelantan,
        Region::KualaLumpur,
        Region::Labuan,
        Region::Malacca,
        Region::NegeriSembilan,
        Region::Pahang,
        Region::Penang,
        Region::Perak,
        Region::Perlis,
        Region::Putrajaya,
        Region::Sabah,
        Region::Sarawak,
        Region::Selangor,
        Region::Terengganu,
    ];

    /// The value sent on the wire and used in query parameters.
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Region::Johor => "johor",
            Region::Kedah => "kedah",
            Region::Kelantan => "kelantan",
            Region::KualaLumpur => "kuala_lumpur",
            Region::Labuan => "labuan",
            Region::Malacca => "malacca",
            Region::NegeriSembilan => "negeri_sembilan",
            Region::Pahang => "pahang",
            Region::Penang => "penang",
            Region::Perak => "perak",
            Region::Perlis => "perlis",
            Region::Putrajaya => "putrajaya",
            Region::Sabah => "sabah",
            Region::Sarawak => "sarawak",
            Region::Selangor => "selangor",
            Region::Terengganu => "terengganu",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Region::Johor => "Johor",
            Region::Kedah => "Kedah",
            Region::Kelantan => "Kelantan",
            Region::KualaLumpur => "Kuala Lumpur",
            Region::Labuan => "Labuan",
            Region::Malacca => "Malacca",
            Region::NegeriSembilan => "Negeri Sembilan",
            Region::Pahang => "Pahang",
            Region::Penang => "Penang",
            Region::Perak => "Perak",
            Region::Perlis => "Perlis",
            Region::Putrajaya => "Putrajaya",
            Region::Sabah => "Sabah",
            Region::Sarawak => "Sarawak",
            Region::Selangor => "Selangor",
            Region::Terengganu => "Terengganu",
        }
    }

    pub fn from_wire(value: &str) -> Option<Region> {
        Region::ALL.iter().copied().find(|r| r.wire_name() == value)
    }
}

/// Ordinal severity attached to flood notifications. Used for styling and
/// filtering only; no client-side behavior depends on the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub const fn wire_name(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    pub const fn css_class(&self) -> &'static str {
        match self {
            Severity::Low => "severity-low",
            Severity::Medium => "severity-medium",
            Severity::High => "severity-high",
            Severity::Critical => "severity-critical",
        }
    }

    pub fn from_wire(value: &str) -> Option<Severity> {
        Severity::ALL.iter().copied().find(|s| s.wire_name() == value)
    }
}

/// Priority assigned to citizen requests by the backend or an admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub const fn wire_name(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }

    pub const fn css_class(&self) -> &'static str {
        match self {
            Priority::Low => "priority-low",
            Priority::Medium => "priority-medium",
            Priority::High => "priority-high",
            Priority::Critical => "priority-critical",
        }
    }

    pub fn from_wire(value: &str) -> Option<Priority> {
        Priority::ALL.iter().copied().find(|p| p.wire_name() == value)
    }
}

/// Lifecycle of a citizen request.
///
/// The conventional flow is `pending -> in_progress -> resolved`, with
/// `cancelled` reachable from the first two. The UI deliberately does not
/// constrain transitions; enforcement belongs to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
    Cancelled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Pending,
        RequestStatus::InProgress,
        RequestStatus::Resolved,
        RequestStatus::Cancelled,
    ];

    pub const fn wire_name(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Resolved => "resolved",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::InProgress => "In Progress",
            RequestStatus::Resolved => "Resolved",
            RequestStatus::Cancelled => "Cancelled",
        }
    }

    pub const fn css_class(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "status-pending",
            RequestStatus::InProgress => "status-progress",
            RequestStatus::Resolved => "status-resolved",
            RequestStatus::Cancelled => "status-cancelled",
        }
    }

    pub fn from_wire(value: &str) -> Option<RequestStatus> {
        RequestStatus::ALL
            .iter()
            .copied()
            .find(|s| s.wire_name() == value)
    }
}

/// What a citizen is asking for: help during a flood, or reporting one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Help,
    Report,
}

impl RequestKind {
    pub const ALL: [RequestKind; 2] = [RequestKind::Help, RequestKind::Report];

    pub const fn wire_name(&self) -> &'static str {
        match self {
            RequestKind::Help => "help",
            RequestKind::Report => "report",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            RequestKind::Help => "Help",
            RequestKind::Report => "Report",
        }
    }

    pub fn from_wire(value: &str) -> Option<RequestKind> {
        RequestKind::ALL.iter().copied().find(|k| k.wire_name() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Expert,
    Admin,
}

impl Role {
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Expert => "expert",
            Role::Admin => "admin",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Expert => "Expert",
            Role::Admin => "Admin",
        }
    }

    pub fn from_wire(value: &str) -> Option<Role> {
        match value {
            "user" => Some(Role::User),
            "expert" => Some(Role::Expert),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

// =========================================================
// Entities
// =========================================================

/// A public blog-style flood report published by an expert organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub organization: String,
    pub created_at: DateTime<Utc>,
}

/// A note appended to a request by an admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminNote {
    pub note: String,
    #[serde(default)]
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A citizen's help/report request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodRequest {
    pub request_id: String,
    pub user_name: String,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_phone: Option<String>,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub request_type: Option<RequestKind>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub admin_notes: Vec<AdminNote>,
    pub created_at: DateTime<Utc>,
}

/// A flood alert published by an admin, optionally scoped to regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodNotification {
    pub notification_id: String,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    #[serde(default)]
    pub affected_regions: Vec<Region>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub announcement_id: String,
    pub title: String,
    pub content: String,
    pub is_active: bool,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin-managed directory entry for emergency services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub contact_id: String,
    pub name: String,
    pub role: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub region: Option<Region>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Aggregate counters shown on the admin dashboard overview tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_posts: u64,
    pub total_requests: u64,
    pub active_notifications: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixteen_regions_with_unique_wire_names() {
        assert_eq!(Region::ALL.len(), 16);
        for region in Region::ALL {
            assert_eq!(Region::from_wire(region.wire_name()), Some(region));
        }
        assert_eq!(Region::from_wire("kuala_lumpur"), Some(Region::KualaLumpur));
        assert_eq!(Region::KualaLumpur.label(), "Kuala Lumpur");
        assert_eq!(Region::from_wire("borneo"), None);
    }

    #[test]
    fn status_round_trips_through_wire_names() {
        for status in RequestStatus::ALL {
            assert_eq!(RequestStatus::from_wire(status.wire_name()), Some(status));
        }
        assert_eq!(RequestStatus::InProgress.wire_name(), "in_progress");
        assert_eq!(RequestStatus::InProgress.label(), "In Progress");
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert_eq!(Role::from_wire("expert"), Some(Role::Expert));
        assert_eq!(Role::from_wire("superhero"), None);
    }

    #[test]
    fn request_defaults_tolerate_sparse_payloads() {
        let json = r#"{
            "request_id": "R1",
            "user_name": "Aminah",
            "created_at": "2024-01-05T08:00:00Z"
        }"#;
        let req: FloodRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.status, RequestStatus::Pending);
        assert!(req.admin_notes.is_empty());
        assert!(req.region.is_none());
    }
}
