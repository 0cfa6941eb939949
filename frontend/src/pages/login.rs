use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use myflood_shared::Role;
use myflood_shared::protocol::{LoginRequest, RegisterRequest};
use myflood_shared::validate;

use crate::api::use_api;
use crate::auth::{apply_login_success, use_session, use_session_version};
use crate::components::toast_view::use_toasts;
use crate::guard::{PATH_ADMIN_LOGIN, PATH_EXPERT_DASHBOARD, PATH_USER_DASHBOARD};

#[component]
pub fn LoginPage() -> impl IntoView {
    let api = use_api();
    let session = use_session();
    let toasts = use_toasts();
    let version = use_session_version();
    let navigate = use_navigate();

    let (is_register, set_is_register) = signal(false);
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (full_name, set_full_name) = signal(String::new());
    let (role, set_role) = signal(Role::User);
    let (submitting, set_submitting) = signal(false);

    // Already logged in: straight to the dashboard.
    {
        let session = session.clone();
        let navigate = navigate.clone();
        Effect::new(move |_| {
            if session.is_authenticated() {
                navigate(PATH_USER_DASHBOARD, Default::default());
            }
        });
    }

    let on_submit = {
        let api = api.clone();
        let session = session.clone();
        let navigate = navigate.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let registering = is_register.get();

            let checks = validate::email(&email.get())
                .and_then(|_| validate::password(&password.get()))
                .and_then(|_| {
                    if registering {
                        validate::require(&full_name.get(), "Full name")
                            .and_then(|_| validate::passwords_match(&password.get(), &confirm.get()))
                    } else {
                        Ok(())
                    }
                });
            if let Err(msg) = checks {
                toasts.error(msg);
                return;
            }

            set_submitting.set(true);
            let api = api.clone();
            let session = session.clone();
            let navigate = navigate.clone();
            spawn_local(async move {
                if registering {
                    let result = api
                        .send(&RegisterRequest {
                            full_name: full_name.get_untracked().trim().to_string(),
                            email: email.get_untracked().trim().to_string(),
                            password: password.get_untracked(),
                            role: role.get_untracked(),
                        })
                        .await;
                    match result {
                        Ok(_) => {
                            toasts.success("Account created. Please log in.");
                            set_is_register.set(false);
                            set_password.set(String::new());
                            set_confirm.set(String::new());
                        }
                        Err(err) => toasts.error(err.user_message()),
                    }
                } else {
                    let result = api
                        .send(&LoginRequest {
                            email: email.get_untracked().trim().to_string(),
                            password: password.get_untracked(),
                            role: role.get_untracked(),
                        })
                        .await;
                    match result {
                        Ok(resp) => match apply_login_success(&session, &resp) {
                            Ok(Role::Expert) => {
                                version.bump();
                                navigate(PATH_EXPERT_DASHBOARD, Default::default());
                            }
                            Ok(Role::User) => {
                                version.bump();
                                navigate(PATH_USER_DASHBOARD, Default::default());
                            }
                            Ok(Role::Admin) => {
                                // Admin access uses its own key-based login.
                                version.bump();
                                navigate(PATH_ADMIN_LOGIN, Default::default());
                            }
                            Err(msg) => toasts.error(msg),
                        },
                        Err(err) => toasts.error(err.user_message()),
                    }
                }
                set_submitting.set(false);
            });
        }
    };

    view! {
        <div class="hero min-h-[70vh] bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">
                    {move || if is_register.get() { "Create Account" } else { "Welcome Back" }}
                </h1>

                <div role="tablist" class="tabs tabs-boxed">
                    <a
                        role="tab"
                        class=move || {
                            if is_register.get() { "tab" } else { "tab tab-active" }
                        }
                        on:click=move |_| set_is_register.set(false)
                    >
                        "Login"
                    </a>
                    <a
                        role="tab"
                        class=move || {
                            if is_register.get() { "tab tab-active" } else { "tab" }
                        }
                        on:click=move |_| set_is_register.set(true)
                    >
                        "Register"
                    </a>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || is_register.get()>
                            <div class="form-control">
                                <label class="label" for="login-full-name">
                                    <span class="label-text">"Full name"</span>
                                </label>
                                <input
                                    id="login-full-name"
                                    type="text"
                                    class="input input-bordered"
                                    prop:value=full_name
                                    on:input=move |ev| set_full_name.set(event_target_value(&ev))
                                />
                            </div>
                        </Show>
                        <div class="form-control">
                            <label class="label" for="login-email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="login-email"
                                type="email"
                                class="input input-bordered"
                                prop:value=email
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="login-password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="login-password"
                                type="password"
                                class="input input-bordered"
                                prop:value=password
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                required
                            />
                        </div>
                        <Show when=move || is_register.get()>
                            <div class="form-control">
                                <label class="label" for="login-confirm">
                                    <span class="label-text">"Confirm password"</span>
                                </label>
                                <input
                                    id="login-confirm"
                                    type="password"
                                    class="input input-bordered"
                                    prop:value=confirm
                                    on:input=move |ev| set_confirm.set(event_target_value(&ev))
                                />
                            </div>
                        </Show>
                        <div class="form-control">
                            <label class="label" for="login-role">
                                <span class="label-text">"I am a"</span>
                            </label>
                            <select
                                id="login-role"
                                class="select select-bordered"
                                on:change=move |ev| {
                                    set_role
                                        .set(
                                            Role::from_wire(&event_target_value(&ev))
                                                .unwrap_or(Role::User),
                                        )
                                }
                            >
                                <option
                                    value="user"
                                    selected=move || role.get() == Role::User
                                >
                                    "Citizen"
                                </option>
                                <option
                                    value="expert"
                                    selected=move || role.get() == Role::Expert
                                >
                                    "Expert Organization"
                                </option>
                            </select>
                        </div>
                        <div class="form-control mt-4">
                            <button class="btn btn-primary" disabled=move || submitting.get()>
                                {move || {
                                    if submitting.get() {
                                        view! {
                                            <span class="loading loading-spinner"></span>
                                            "Please wait..."
                                        }
                                            .into_any()
                                    } else if is_register.get() {
                                        "Create Account".into_any()
                                    } else {
                                        "Login".into_any()
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
