use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use myflood_shared::protocol::UpdateProfileRequest;
use myflood_shared::validate;

use crate::api::use_api;
use crate::auth::{use_session, use_session_version};
use crate::components::toast_view::use_toasts;
use crate::guard::{Access, guard_redirect};

#[component]
pub fn UserSettingsPage() -> impl IntoView {
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
                Access::User,
                session.is_authenticated(),
                session.admin_key().is_some(),
            ) {
                navigate(path, Default::default());
            }
        });
    }

    let email = session.user_email().unwrap_or_default();
    let (full_name, set_full_name) = signal(session.user_full_name().unwrap_or_default());
    let (phone, set_phone) = signal(String::new());
    let (new_password, set_new_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (submitting, set_submitting) = signal(false);

    let on_submit = {
        let api = api.clone();
        let session = session.clone();
        let email = email.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let password = new_password.get();
            let checks = validate::require(&full_name.get(), "Full name").and_then(|_| {
                if password.is_empty() {
                    Ok(())
                } else {
                    validate::password(&password)
                        .and_then(|_| validate::passwords_match(&password, &confirm.get()))
                }
            });
            if let Err(msg) = checks {
                toasts.error(msg);
                return;
            }

            set_submitting.set(true);
            let api = api.clone();
            let session = session.clone();
            let email = email.clone();
            spawn_local(async move {
                let phone = phone.get_untracked().trim().to_string();
                let result = api
                    .send(&UpdateProfileRequest {
                        email: email.clone(),
                        full_name: full_name.get_untracked().trim().to_string(),
                        phone: if phone.is_empty() { None } else { Some(phone) },
                        password: if new_password.get_untracked().is_empty() {
                            None
                        } else {
                            Some(new_password.get_untracked())
                        },
                    })
                    .await;
                match result {
                    Ok(_) => {
                        session.save_user_profile(
                            &email,
                            Some(full_name.get_untracked().trim()),
                            None,
                            None,
                        );
                        version.bump();
                        toasts.success("Profile updated.");
                        set_new_password.set(String::new());
                        set_confirm.set(String::new());
                    }
                    Err(err) => toasts.error(err.user_message()),
                }
                set_submitting.set(false);
            });
        }
    };

    view! {
        <div class="container mx-auto px-4 py-8 max-w-xl">
            <h1 class="text-3xl font-bold mb-6">"Account Settings"</h1>

            <div class="card bg-base-100 shadow-xl">
                <form class="card-body space-y-4" on:submit=on_submit>
                    <div class="form-control">
                        <label class="label" for="settings-email">
                            <span class="label-text">"Email"</span>
                        </label>
                        <input
                            id="settings-email"
                            type="email"
                            class="input input-bordered"
                            prop:value=email.clone()
                            disabled
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="settings-full-name">
                            <span class="label-text">"Full name"</span>
                        </label>
                        <input
                            id="settings-full-name"
                            type="text"
                            class="input input-bordered"
                            prop:value=full_name
                            on:input=move |ev| set_full_name.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="settings-phone">
                            <span class="label-text">"Phone (optional)"</span>
                        </label>
                        <input
                            id="settings-phone"
                            type="tel"
                            class="input input-bordered"
                            prop:value=phone
                            on:input=move |ev| set_phone.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="divider">"Change password"</div>
                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label" for="settings-password">
                                <span class="label-text">"New password"</span>
                            </label>
                            <input
                                id="settings-password"
                                type="password"
                                class="input input-bordered"
                                prop:value=new_password
                                on:input=move |ev| set_new_password.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="settings-confirm">
                                <span class="label-text">"Confirm"</span>
                            </label>
                            <input
                                id="settings-confirm"
                                type="password"
                                class="input input-bordered"
                                prop:value=confirm
                                on:input=move |ev| set_confirm.set(event_target_value(&ev))
                            />
                        </div>
                    </div>
                    <div class="form-control mt-2">
                        <button class="btn btn-primary" disabled=move || submitting.get()>
                            {move || {
                                if submitting.get() {
                                    view! {
                                        <span class="loading loading-spinner"></span>
                                        "Saving..."
                                    }
                                        .into_any()
                                } else {
                                    "Save Changes".into_any()
                                }
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
