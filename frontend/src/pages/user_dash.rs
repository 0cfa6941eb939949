use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use myflood_shared::FloodRequest;

use crate::api::use_api;
use crate::auth::use_session;
use crate::components::toast_view::use_toasts;
use crate::guard::{Access, PATH_REQUEST_FORM, guard_redirect};

/// A citizen's view of their own requests, keyed by the email stored at
/// login.
#[component]
pub fn UserDashboardPage() -> impl IntoView {
    let api = use_api();
    let session = use_session();
    let toasts = use_toasts();
    let navigate = use_navigate();

    {
        let session = session.clone();
        let navigate = navigate.clone();
        Effect::new(move |_| {
            if let Some(path) = guard_redirect(
                Access::User,
                session.is_authenticated(),
                session.admin_key().is_some(),
            ) {
                navigate(path, Default::default());
            }
        });
    }

    let (requests, set_requests) = signal(Vec::<FloodRequest>::new());
    let (loading, set_loading) = signal(true);

    {
        let api = api.clone();
        let session = session.clone();
        Effect::new(move |_| {
            let Some(email) = session.user_email() else {
                set_loading.set(false);
                return;
            };
            let api = api.clone();
            spawn_local(async move {
                match api.user_requests(&email).await {
                    Ok(items) => set_requests.set(items),
                    Err(err) => toasts.error(err.user_message()),
                }
                set_loading.set(false);
            });
        });
    }

    view! {
        <div class="container mx-auto px-4 py-8 max-w-3xl space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"My Requests"</h1>
                <A href=PATH_REQUEST_FORM attr:class="btn btn-primary btn-sm">
                    "New Request"
                </A>
            </div>

            <Show when=move || loading.get()>
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </Show>

            <Show when=move || !loading.get() && requests.get().is_empty()>
                <div class="card bg-base-100 shadow-sm">
                    <div class="card-body items-center text-center">
                        <p class="text-base-content/70">
                            "You have not submitted any requests yet."
                        </p>
                        <A href=PATH_REQUEST_FORM attr:class="btn btn-primary btn-sm">
                            "Report a Flood"
                        </A>
                    </div>
                </div>
            </Show>

            <For
                each=move || requests.get()
                key=|r: &FloodRequest| r.request_id.clone()
                children=move |r: FloodRequest| {
                    view! {
                        <div class="card bg-base-100 shadow-sm">
                            <div class="card-body py-4">
                                <div class="flex items-center justify-between">
                                    <div class="flex items-center gap-2">
                                        <span class=format!("badge {}", r.status.css_class())>
                                            {r.status.label()}
                                        </span>
                                        {r
                                            .request_type
                                            .map(|k| {
                                                view! {
                                                    <span class="badge badge-outline">{k.label()}</span>
                                                }
                                            })}
                                        {r
                                            .region
                                            .map(|region| {
                                                view! {
                                                    <span class="badge badge-ghost">{region.label()}</span>
                                                }
                                            })}
                                    </div>
                                    <span class="text-xs text-base-content/50">
                                        {r.created_at.format("%Y-%m-%d %H:%M").to_string()}
                                    </span>
                                </div>
                                <p class="text-sm">{r.details.clone().unwrap_or_default()}</p>
                                <Show when={
                                    let assigned = r.assigned_to.clone();
                                    move || assigned.is_some()
                                }>
                                    <p class="text-sm text-base-content/60">
                                        {format!(
                                            "Assigned to: {}",
                                            r.assigned_to.clone().unwrap_or_default(),
                                        )}
                                    </p>
                                </Show>
                            </div>
                        </div>
                    }
                }
            />
        </div>
    }
}
