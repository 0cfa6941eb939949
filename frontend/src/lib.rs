//! MYFlood frontend application.
//!
//! Client-side rendered Leptos app. Shared state travels through context:
//! - `api`: HTTP client over the REST backend
//! - `auth`: session state backed by local storage
//! - `toast`: transient notification queue
//! - `resource`: shared controller behind the admin manager screens

pub mod api;
pub mod auth;
pub mod components;
pub mod guard;
pub mod pages;
pub mod resource;
pub mod toast;

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::api::{ApiClient, GlooHttpClient, api_base_url, provide_api};
use crate::auth::{Session, provide_session, provide_session_version};
use crate::components::navbar::Navbar;
use crate::components::toast_view::{ToastContainer, provide_toasts};
use crate::pages::about::AboutPage;
use crate::pages::admin_dash::AdminDashboardPage;
use crate::pages::admin_login::AdminLoginPage;
use crate::pages::expert_dash::ExpertDashboardPage;
use crate::pages::login::LoginPage;
use crate::pages::main_page::MainPage;
use crate::pages::request_form::RequestFormPage;
use crate::pages::user_dash::UserDashboardPage;
use crate::pages::user_settings::UserSettingsPage;

#[component]
pub fn App() -> impl IntoView {
    let session = Arc::new(Session::browser());
    provide_session(Arc::clone(&session));
    provide_session_version();
    provide_toasts();
    provide_api(Arc::new(ApiClient::new(
        api_base_url(),
        GlooHttpClient,
        session,
    )));

    view! {
        <Router>
            <Navbar />
            <ToastContainer />
            <main>
                <Routes fallback=|| {
                    view! {
                        <div class="flex items-center justify-center min-h-[60vh]">
                            <div class="text-center">
                                <h1 class="text-6xl font-bold text-error">"404"</h1>
                                <p class="text-xl mt-4">"Page not found"</p>
                            </div>
                        </div>
                    }
                }>
                    <Route path=path!("/") view=MainPage />
                    <Route path=path!("/about") view=AboutPage />
                    <Route path=path!("/login") view=LoginPage />
                    <Route path=path!("/admin-login") view=AdminLoginPage />
                    <Route path=path!("/request-form") view=RequestFormPage />
                    <Route path=path!("/user-dashboard") view=UserDashboardPage />
                    <Route path=path!("/settings") view=UserSettingsPage />
                    <Route path=path!("/expert-dashboard") view=ExpertDashboardPage />
                    <Route path=path!("/admin-dashboard") view=AdminDashboardPage />
                </Routes>
            </main>
        </Router>
    }
}
