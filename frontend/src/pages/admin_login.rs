use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use myflood_shared::protocol::AdminLoginRequest;
use myflood_shared::validate;

use crate::api::use_api;
use crate::auth::{use_session, use_session_version};
use crate::components::toast_view::use_toasts;
use crate::guard::PATH_ADMIN_DASHBOARD;

#[component]
pub fn AdminLoginPage() -> impl IntoView {
    let api = use_api();
    let session = use_session();
    let toasts = use_toasts();
    let version = use_session_version();
    let navigate = use_navigate();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (submitting, set_submitting) = signal(false);

    // An admin key on hand means we are already logged in.
    {
        let session = session.clone();
        let navigate = navigate.clone();
        Effect::new(move |_| {
            if session.admin_key().is_some() {
                navigate(PATH_ADMIN_DASHBOARD, Default::default());
            }
        });
    }

    let on_submit = {
        let api = api.clone();
        let session = session.clone();
        let navigate = navigate.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let checks = validate::require(&username.get(), "Username")
                .and_then(|_| validate::require(&password.get(), "Password"));
            if let Err(msg) = checks {
                toasts.error(msg);
                return;
            }

            set_submitting.set(true);
            let api = api.clone();
            let session = session.clone();
            let navigate = navigate.clone();
            spawn_local(async move {
                let result = api
                    .send(&AdminLoginRequest {
                        username: username.get_untracked().trim().to_string(),
                        password: password.get_untracked(),
                    })
                    .await;
                match result {
                    Ok(resp) => {
                        session.save_admin_info(&resp.admin_key, &resp.username);
                        version.bump();
                        toasts.success(format!("Welcome back, {}.", resp.username));
                        navigate(PATH_ADMIN_DASHBOARD, Default::default());
                    }
                    Err(err) => toasts.error(err.user_message()),
                }
                set_submitting.set(false);
            });
        }
    };

    view! {
        <div class="hero min-h-[70vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Admin Login"</h1>
                <p class="text-base-content/70">"Restricted to MYFlood administrators."</p>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <div class="form-control">
                            <label class="label" for="admin-username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="admin-username"
                                type="text"
                                class="input input-bordered"
                                prop:value=username
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="admin-password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="admin-password"
                                type="password"
                                class="input input-bordered"
                                prop:value=password
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                required
                            />
                        </div>
                        <div class="form-control mt-4">
                            <button class="btn btn-primary" disabled=move || submitting.get()>
                                {move || {
                                    if submitting.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "Signing in..."
                                        }
                                            .into_any()
                                    } else {
                                        "Sign In".into_any()
                                    }
                                }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
