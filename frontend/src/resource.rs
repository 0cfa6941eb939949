//! Shared machinery behind the five admin manager screens.
//!
//! Each screen is a thin view over [`ResourceManager`], which owns the list
//! signals and the create/update/delete flows for one [`AdminResource`].
//! The non-reactive pieces (epoch guard, delete confirmation, list fetch)
//! are plain types so they run under native tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use leptos::prelude::{RwSignal, Set, Update};
use leptos::task::spawn_local;

use myflood_shared::protocol::{AdminResource, ListQuery};

use crate::api::{ApiClient, ApiError, HttpClient};
use crate::auth::Session;
use crate::guard::PATH_ADMIN_LOGIN;
use crate::toast::ToastKind;

#[cfg(test)]
mod tests;

/// Delay before a search box edit triggers a refetch.
pub const SEARCH_DEBOUNCE_MS: u32 = 300;

// =========================================================
// Stale-response guard
// =========================================================

/// Monotone counter shared by a screen and its in-flight fetches. A fetch
/// records the epoch it started under; by completion, a newer fetch or the
/// screen's teardown may have advanced it, in which case the result is
/// discarded instead of clobbering fresher state.
#[derive(Clone, Default)]
pub struct Epoch(Arc<AtomicU64>);

impl Epoch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new epoch, invalidating everything in flight.
    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.0.load(Ordering::Relaxed) == token
    }

    /// Invalidates all in-flight work without starting anything new.
    pub fn retire(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug, PartialEq)]
pub enum ListOutcome<T> {
    /// Fresh items to display.
    Replace(Vec<T>),
    /// The fetch failed; keep whatever is shown and surface the error.
    Keep(ApiError),
    /// A newer fetch superseded this one; do nothing.
    Expired,
}

pub async fn fetch_list<T: AdminResource, C: HttpClient>(
    api: &ApiClient<C>,
    query: &ListQuery,
    epoch: &Epoch,
    token: u64,
) -> ListOutcome<T> {
    let result = api.list::<T>(query).await;
    if !epoch.is_current(token) {
        return ListOutcome::Expired;
    }
    match result {
        Ok(items) => ListOutcome::Replace(items),
        Err(err) => ListOutcome::Keep(err),
    }
}

// =========================================================
// Delete confirmation
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PendingDelete {
    pub id: String,
    /// Human-readable name shown in the confirmation dialog.
    pub label: String,
}

/// A DELETE is only issued for an id that went through request followed by
/// confirm; cancel or a second request for a different row resets the flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteFlow {
    pending: Option<PendingDelete>,
}

impl DeleteFlow {
    pub fn request(&mut self, id: impl Into<String>, label: impl Into<String>) {
        self.pending = Some(PendingDelete {
            id: id.into(),
            label: label.into(),
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&PendingDelete> {
        self.pending.as_ref()
    }

    /// Consumes the pending id on confirmation.
    pub fn take_confirmed(&mut self) -> Option<PendingDelete> {
        self.pending.take()
    }
}

// =========================================================
// Debounce
// =========================================================

/// Trailing-edge debounce over a browser timer. Scheduling again before the
/// delay elapses drops the earlier callback.
#[derive(Default)]
pub struct Debouncer {
    handle: Option<gloo_timers::callback::Timeout>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay_ms: u32, f: impl FnOnce() + 'static) {
        // Replacing the handle cancels the previous timeout.
        self.handle = Some(gloo_timers::callback::Timeout::new(delay_ms, f));
    }
}

// =========================================================
// Session expiry
// =========================================================

/// One shared reaction to an expired admin session: wipe local auth state
/// and send the admin back to the login screen.
pub fn handle_session_expiry(session: &Session, navigate: impl FnOnce(&str)) {
    leptos::logging::warn!("[api] admin session expired, clearing credentials");
    session.clear_auth();
    navigate(PATH_ADMIN_LOGIN);
}

// =========================================================
// Reactive controller
// =========================================================

/// List-and-mutate controller for one admin collection.
///
/// Construct inside a component; the signals are handed straight to the
/// view. All mutations funnel errors through one place, so an expired
/// session behaves identically whether it surfaces on a fetch, a create or
/// a delete. Everything inside is `Send + Sync` so clones can be captured
/// by `For` rows and derived signals.
pub struct ResourceManager<T: AdminResource, C: HttpClient + 'static> {
    api: Arc<ApiClient<C>>,
    query: Arc<dyn Fn() -> ListQuery + Send + Sync>,
    notify: Arc<dyn Fn(ToastKind, String) + Send + Sync>,
    on_expired: Arc<dyn Fn() + Send + Sync>,
    epoch: Epoch,
    pub items: RwSignal<Vec<T>>,
    pub loading: RwSignal<bool>,
    pub fetched_once: RwSignal<bool>,
    pub delete_flow: RwSignal<DeleteFlow>,
}

impl<T: AdminResource, C: HttpClient + 'static> Clone for ResourceManager<T, C> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            query: Arc::clone(&self.query),
            notify: Arc::clone(&self.notify),
            on_expired: Arc::clone(&self.on_expired),
            epoch: self.epoch.clone(),
            items: self.items,
            loading: self.loading,
            fetched_once: self.fetched_once,
            delete_flow: self.delete_flow,
        }
    }
}

impl<T, C> ResourceManager<T, C>
where
    T: AdminResource + Send + Sync,
    C: HttpClient + 'static,
{
    pub fn new(
        api: Arc<ApiClient<C>>,
        query: impl Fn() -> ListQuery + Send + Sync + 'static,
        notify: impl Fn(ToastKind, String) + Send + Sync + 'static,
        on_expired: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            api,
            query: Arc::new(query),
            notify: Arc::new(notify),
            on_expired: Arc::new(on_expired),
            epoch: Epoch::new(),
            items: RwSignal::new(Vec::new()),
            loading: RwSignal::new(false),
            fetched_once: RwSignal::new(false),
            delete_flow: RwSignal::new(DeleteFlow::default()),
        }
    }

    fn report(&self, err: ApiError) {
        if err == ApiError::SessionExpired {
            (self.on_expired)();
        } else {
            (self.notify)(ToastKind::Error, err.user_message());
        }
    }

    pub fn refetch(&self) {
        let token = self.epoch.begin();
        self.loading.set(true);
        let this = self.clone();
        spawn_local(async move {
            match fetch_list::<T, C>(&this.api, &(this.query)(), &this.epoch, token).await {
                ListOutcome::Replace(items) => {
                    this.items.set(items);
                    this.loading.set(false);
                    this.fetched_once.set(true);
                }
                ListOutcome::Keep(err) => {
                    this.loading.set(false);
                    this.fetched_once.set(true);
                    this.report(err);
                }
                ListOutcome::Expired => {}
            }
        });
    }

    pub fn create(&self, payload: T::Payload, on_success: impl FnOnce() + 'static) {
        let this = self.clone();
        spawn_local(async move {
            match this.api.create::<T>(&payload).await {
                Ok(()) => {
                    (this.notify)(ToastKind::Success, format!("{} created.", T::NOUN));
                    on_success();
                    this.refetch();
                }
                Err(err) => this.report(err),
            }
        });
    }

    pub fn update(&self, id: String, payload: T::Payload, on_success: impl FnOnce() + 'static) {
        let this = self.clone();
        spawn_local(async move {
            match this.api.update::<T>(&id, &payload).await {
                Ok(()) => {
                    (this.notify)(ToastKind::Success, format!("{} updated.", T::NOUN));
                    on_success();
                    this.refetch();
                }
                Err(err) => this.report(err),
            }
        });
    }

    pub fn request_delete(&self, id: impl Into<String>, label: impl Into<String>) {
        let (id, label) = (id.into(), label.into());
        self.delete_flow.update(|flow| flow.request(id, label));
    }

    pub fn cancel_delete(&self) {
        self.delete_flow.update(|flow| flow.cancel());
    }

    pub fn confirm_delete(&self) {
        let Some(pending) = self
            .delete_flow
            .try_update(|flow| flow.take_confirmed())
            .flatten()
        else {
            return;
        };
        let this = self.clone();
        spawn_local(async move {
            match this.api.delete::<T>(&pending.id).await {
                Ok(()) => {
                    (this.notify)(ToastKind::Success, format!("{} deleted.", T::NOUN));
                    this.refetch();
                }
                Err(err) => this.report(err),
            }
        });
    }

    /// Call from the screen's cleanup so late responses cannot write into
    /// signals after unmount.
    pub fn retire(&self) {
        self.epoch.retire();
    }
}
