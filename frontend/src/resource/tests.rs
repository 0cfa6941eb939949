use std::rc::Rc;

use serde_json::json;

use myflood_shared::protocol::{AnnouncementPayload, ListQuery, StatusUpdate};
use myflood_shared::{Announcement, FloodRequest, RequestStatus};

use super::*;
use crate::api::tests::MockHttpClient;
use crate::api::ApiClient;
use crate::auth::testing::test_session;

fn test_client() -> (Rc<MockHttpClient>, ApiClient<Rc<MockHttpClient>>) {
    let (_, _, session) = test_session();
    session.save_admin_info("key", "nadia");
    let http = MockHttpClient::new();
    let api = ApiClient::new("http://api.test", Rc::clone(&http), session);
    (http, api)
}

fn announcement_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "announcement_id": id,
        "title": title,
        "content": "Shelter open at the community hall.",
        "is_active": true,
        "created_at": "2024-01-05T08:00:00Z",
        "updated_at": "2024-01-05T08:00:00Z"
    })
}

// Mirrors the manager's confirm path without the reactive glue.
async fn confirm_and_delete<T, C>(
    api: &ApiClient<C>,
    flow: &mut DeleteFlow,
) -> Option<Result<(), crate::api::ApiError>>
where
    T: myflood_shared::protocol::AdminResource,
    C: crate::api::HttpClient,
{
    let pending = flow.take_confirmed()?;
    Some(api.delete::<T>(&pending.id).await)
}

// =========================================================
// Epoch
// =========================================================

#[tokio::test]
async fn superseded_fetch_expires_instead_of_replacing() {
    let (http, api) = test_client();
    http.mock_response(
        "GET",
        "http://api.test/admin/announcements",
        200,
        json!({"announcements": [announcement_json("A1", "old")]}),
    );

    let epoch = Epoch::new();
    let stale = epoch.begin();
    // A newer fetch starts before the first completes.
    let fresh = epoch.begin();

    let outcome: ListOutcome<Announcement> =
        fetch_list(&api, &ListQuery::new(), &epoch, stale).await;
    assert_eq!(outcome, ListOutcome::Expired);

    let outcome: ListOutcome<Announcement> =
        fetch_list(&api, &ListQuery::new(), &epoch, fresh).await;
    assert!(matches!(outcome, ListOutcome::Replace(ref items) if items.len() == 1));
}

#[tokio::test]
async fn retired_epoch_drops_late_responses() {
    let (http, api) = test_client();
    http.mock_response(
        "GET",
        "http://api.test/admin/announcements",
        200,
        json!({"announcements": []}),
    );

    let epoch = Epoch::new();
    let token = epoch.begin();
    epoch.retire();

    let outcome: ListOutcome<Announcement> =
        fetch_list(&api, &ListQuery::new(), &epoch, token).await;
    assert_eq!(outcome, ListOutcome::Expired);
}

#[tokio::test]
async fn failed_fetch_keeps_current_items() {
    let (http, api) = test_client();
    http.mock_response(
        "GET",
        "http://api.test/admin/announcements",
        500,
        json!({"detail": "database unavailable"}),
    );

    let epoch = Epoch::new();
    let token = epoch.begin();
    let outcome: ListOutcome<Announcement> =
        fetch_list(&api, &ListQuery::new(), &epoch, token).await;
    assert!(matches!(outcome, ListOutcome::Keep(_)));
}

// =========================================================
// Delete confirmation
// =========================================================

#[tokio::test]
async fn delete_is_gated_behind_confirmation() {
    let (http, api) = test_client();
    http.mock_response(
        "DELETE",
        "http://api.test/admin/announcements/A1",
        200,
        json!({"message": "deleted"}),
    );

    let mut flow = DeleteFlow::default();

    // No request yet: confirming does nothing.
    assert!(confirm_and_delete::<Announcement, _>(&api, &mut flow)
        .await
        .is_none());

    // Requested then cancelled: still nothing.
    flow.request("A1", "Flood drill announcement");
    flow.cancel();
    assert!(confirm_and_delete::<Announcement, _>(&api, &mut flow)
        .await
        .is_none());
    assert!(http.requests().is_empty());

    // Requested then confirmed: exactly one DELETE.
    flow.request("A1", "Flood drill announcement");
    assert_eq!(flow.pending().unwrap().label, "Flood drill announcement");
    let result = confirm_and_delete::<Announcement, _>(&api, &mut flow)
        .await
        .unwrap();
    assert!(result.is_ok());
    let sent = http.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, "DELETE");
    assert_eq!(sent[0].url, "http://api.test/admin/announcements/A1");

    // The confirmation was consumed.
    assert!(confirm_and_delete::<Announcement, _>(&api, &mut flow)
        .await
        .is_none());
}

#[test]
fn a_second_request_replaces_the_pending_row() {
    let mut flow = DeleteFlow::default();
    flow.request("A1", "first");
    flow.request("A2", "second");
    assert_eq!(flow.take_confirmed().unwrap().id, "A2");
}

// =========================================================
// Mutation round trips
// =========================================================

#[tokio::test]
async fn created_item_shows_up_in_the_relisted_collection() {
    let (http, api) = test_client();
    http.mock_response(
        "POST",
        "http://api.test/admin/announcements",
        201,
        json!({"message": "created"}),
    );
    http.mock_response(
        "GET",
        "http://api.test/admin/announcements",
        200,
        json!({"announcements": [announcement_json("A9", "Evacuation drill")]}),
    );

    api.create::<Announcement>(&AnnouncementPayload {
        title: "Evacuation drill".into(),
        content: "Shelter open at the community hall.".into(),
        is_active: true,
    })
    .await
    .unwrap();
    let items: Vec<Announcement> = api.list(&ListQuery::new()).await.unwrap();

    assert!(items.iter().any(|a| a.title == "Evacuation drill"));
    let sent = http.requests();
    assert_eq!(sent[0].method, "POST");
    assert_eq!(sent[1].method, "GET");
}

#[tokio::test]
async fn status_change_patches_then_relists() {
    let (http, api) = test_client();
    http.mock_response(
        "PATCH",
        "http://api.test/admin/requests/R7/status",
        200,
        json!({"message": "updated"}),
    );
    http.mock_response(
        "GET",
        "http://api.test/admin/requests",
        200,
        json!({"requests": [{
            "request_id": "R7",
            "user_name": "Aminah",
            "status": "resolved",
            "created_at": "2024-01-05T08:00:00Z"
        }]}),
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
    let items: Vec<FloodRequest> = api.list(&ListQuery::new()).await.unwrap();

    assert_eq!(items[0].status, RequestStatus::Resolved);
    let sent = http.requests();
    assert_eq!(sent[0].method, "PATCH");
    assert_eq!(
        sent[0].body,
        Some(r#"{"status":"resolved","admin_note":"handled"}"#.to_string())
    );
    assert_eq!(sent[1].method, "GET");
}

// =========================================================
// Session expiry
// =========================================================

#[test]
fn expiry_clears_auth_and_redirects_to_admin_login() {
    let (store, _, session) = test_session();
    session.save_admin_info("stale", "nadia");
    session.save_token("tok", 3600.0);

    let mut target = None;
    handle_session_expiry(&session, |path| target = Some(path.to_string()));

    assert_eq!(target.as_deref(), Some("/admin-login"));
    assert_eq!(store.len(), 0);
}
