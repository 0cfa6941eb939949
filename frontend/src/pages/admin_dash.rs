use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use myflood_shared::DashboardStats;
use myflood_shared::protocol::DashboardStatsRequest;

use crate::api::{ApiError, use_api};
use crate::auth::{use_session, use_session_version};
use crate::components::admin::announcements::AnnouncementsManager;
use crate::components::admin::contacts::ContactsManager;
use crate::components::admin::notifications::NotificationsManager;
use crate::components::admin::requests::RequestsManager;
use crate::components::admin::users::UsersManager;
use crate::components::toast_view::use_toasts;
use crate::guard::{Access, PATH_HOME, guard_redirect};
use crate::resource::handle_session_expiry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminTab {
    Overview,
    Requests,
    Users,
    Notifications,
    Announcements,
    Contacts,
}

impl AdminTab {
    const ALL: [AdminTab; 6] = [
        AdminTab::Overview,
        AdminTab::Requests,
        AdminTab::Users,
        AdminTab::Notifications,
        AdminTab::Announcements,
        AdminTab::Contacts,
    ];

    const fn label(&self) -> &'static str {
        match self {
            AdminTab::Overview => "Overview",
            AdminTab::Requests => "Requests",
            AdminTab::Users => "Users",
            AdminTab::Notifications => "Notifications",
            AdminTab::Announcements => "Announcements",
            AdminTab::Contacts => "Contacts",
        }
    }
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let api = use_api();
    let session = use_session();
    let toasts = use_toasts();
    let version = use_session_version();
    let navigate = use_navigate();

    {
        let session = session.clone();
        let navigate = navigate.clone();
        Effect::new(move |_| {
            if let Some(path) = guard_redirect(
                Access::Admin,
                session.is_authenticated(),
                session.admin_key().is_some(),
            ) {
                navigate(path, Default::default());
            }
        });
    }

    let admin_name = session.admin_name().unwrap_or_default();
    let (tab, set_tab) = signal(AdminTab::Overview);
    let (stats, set_stats) = signal(DashboardStats::default());

    // Stats load once when the dashboard opens.
    {
        let api = api.clone();
        let session = session.clone();
        let navigate = navigate.clone();
        Effect::new(move |_| {
            let api = api.clone();
            let session = session.clone();
            let navigate = navigate.clone();
            spawn_local(async move {
                match api.send(&DashboardStatsRequest).await {
                    Ok(resp) => set_stats.set(resp.dashboard_stats),
                    Err(ApiError::SessionExpired) => {
                        toasts.error("Your admin session has expired. Please log in again.");
                        handle_session_expiry(&session, |path| navigate(path, Default::default()));
                        version.bump();
                    }
                    Err(err) => toasts.error(err.user_message()),
                }
            });
        });
    }

    let on_logout = {
        let session = session.clone();
        let navigate = navigate.clone();
        move |_| {
            session.clear_auth();
            version.bump();
            navigate(PATH_HOME, Default::default());
        }
    };

    view! {
        <div class="container mx-auto px-4 py-6 space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Admin Dashboard"</h1>
                    <p class="text-base-content/70">{format!("Signed in as {}", admin_name)}</p>
                </div>
                <button class="btn btn-ghost btn-sm" on:click=on_logout>
                    "Logout"
                </button>
            </div>

            <div role="tablist" class="tabs tabs-boxed w-fit">
                {AdminTab::ALL
                    .iter()
                    .map(|t| {
                        let this_tab = *t;
                        view! {
                            <a
                                role="tab"
                                class=move || {
                                    if tab.get() == this_tab { "tab tab-active" } else { "tab" }
                                }
                                on:click=move |_| set_tab.set(this_tab)
                            >
                                {this_tab.label()}
                            </a>
                        }
                    })
                    .collect_view()}
            </div>

            {move || match tab.get() {
                AdminTab::Overview => {
                    view! {
                        <div class="stats shadow w-full">
                            <div class="stat">
                                <div class="stat-title">"Users"</div>
                                <div class="stat-value">{move || stats.get().total_users}</div>
                            </div>
                            <div class="stat">
                                <div class="stat-title">"Reports"</div>
                                <div class="stat-value">{move || stats.get().total_posts}</div>
                            </div>
                            <div class="stat">
                                <div class="stat-title">"Requests"</div>
                                <div class="stat-value">{move || stats.get().total_requests}</div>
                            </div>
                            <div class="stat">
                                <div class="stat-title">"Active alerts"</div>
                                <div class="stat-value">
                                    {move || stats.get().active_notifications}
                                </div>
                            </div>
                        </div>
                    }
                        .into_any()
                }
                AdminTab::Requests => view! { <RequestsManager /> }.into_any(),
                AdminTab::Users => view! { <UsersManager /> }.into_any(),
                AdminTab::Notifications => view! { <NotificationsManager /> }.into_any(),
                AdminTab::Announcements => view! { <AnnouncementsManager /> }.into_any(),
                AdminTab::Contacts => view! { <ContactsManager /> }.into_any(),
            }}
        </div>
    }
}
