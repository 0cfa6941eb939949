use leptos::prelude::*;
use leptos::task::spawn_local;

use myflood_shared::protocol::SubmitFloodRequest;
use myflood_shared::validate;
use myflood_shared::{Priority, Region, RequestKind};

use crate::api::use_api;
use crate::auth::use_session;
use crate::components::toast_view::use_toasts;

/// Public flood report / help request form. Works without an account; a
/// logged-in visitor gets their name and email prefilled.
#[component]
pub fn RequestFormPage() -> impl IntoView {
    let api = use_api();
    let session = use_session();
    let toasts = use_toasts();

    let (name, set_name) = signal(session.user_full_name().unwrap_or_default());
    let (email, set_email) = signal(session.user_email().unwrap_or_default());
    let (region, set_region) = signal(String::new());
    let (kind, set_kind) = signal(RequestKind::Help);
    let (priority, set_priority) = signal(String::new());
    let (details, set_details) = signal(String::new());
    let (submitting, set_submitting) = signal(false);

    let remaining = move || {
        validate::DETAILS_MAX_LEN.saturating_sub(details.get().chars().count())
    };

    let on_submit = {
        let api = api.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let selected_region = Region::from_wire(&region.get());
            let checks = validate::require(&name.get(), "Name")
                .and_then(|_| validate::email(&email.get()))
                .and_then(|_| {
                    if selected_region.is_none() {
                        Err("Please select your region.".to_string())
                    } else {
                        Ok(())
                    }
                })
                .and_then(|_| validate::details(&details.get()));
            if let Err(msg) = checks {
                toasts.error(msg);
                return;
            }
            let Some(selected_region) = selected_region else {
                return;
            };

            set_submitting.set(true);
            let api = api.clone();
            spawn_local(async move {
                let result = api
                    .send(&SubmitFloodRequest {
                        user_name: name.get_untracked().trim().to_string(),
                        user_email: email.get_untracked().trim().to_string(),
                        region: selected_region,
                        request_type: kind.get_untracked(),
                        details: details.get_untracked().trim().to_string(),
                        priority: Priority::from_wire(&priority.get_untracked()),
                    })
                    .await;
                match result {
                    Ok(_) => {
                        toasts.success(
                            "Your request has been submitted. We will be in touch by email.",
                        );
                        set_region.set(String::new());
                        set_kind.set(RequestKind::Help);
                        set_priority.set(String::new());
                        set_details.set(String::new());
                    }
                    Err(err) => toasts.error(err.user_message()),
                }
                set_submitting.set(false);
            });
        }
    };

    view! {
        <div class="container mx-auto px-4 py-8 max-w-2xl">
            <h1 class="text-3xl font-bold mb-2">"Report a Flood"</h1>
            <p class="text-base-content/70 mb-6">
                "Ask for help during a flood, or report flooding in your area."
            </p>

            <div class="card bg-base-100 shadow-xl">
                <form class="card-body space-y-4" on:submit=on_submit>
                    <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label" for="req-name">
                                <span class="label-text">"Your name"</span>
                            </label>
                            <input
                                id="req-name"
                                type="text"
                                class="input input-bordered"
                                prop:value=name
                                on:input=move |ev| set_name.set(event_target_value(&ev))
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="req-email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="req-email"
                                type="email"
                                class="input input-bordered"
                                prop:value=email
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                required
                            />
                        </div>
                    </div>

                    <div class="form-control">
                        <label class="label" for="req-region">
                            <span class="label-text">"Region"</span>
                        </label>
                        <select
                            id="req-region"
                            class="select select-bordered"
                            on:change=move |ev| set_region.set(event_target_value(&ev))
                            required
                        >
                            <option value="" selected=move || region.get().is_empty()>
                                "Select your state or territory"
                            </option>
                            {Region::ALL
                                .iter()
                                .map(|r| {
                                    let wire = r.wire_name();
                                    view! {
                                        <option value=wire selected=move || region.get() == wire>
                                            {r.label()}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </div>

                    <div class="form-control">
                        <span class="label-text mb-1">"What do you need?"</span>
                        <div class="flex gap-6">
                            {RequestKind::ALL
                                .iter()
                                .map(|k| {
                                    let this_kind = *k;
                                    let text = match this_kind {
                                        RequestKind::Help => "I need help",
                                        RequestKind::Report => "I am reporting a flood",
                                    };
                                    view! {
                                        <label class="label cursor-pointer gap-2">
                                            <input
                                                type="radio"
                                                name="request-kind"
                                                class="radio"
                                                prop:checked=move || kind.get() == this_kind
                                                on:change=move |_| set_kind.set(this_kind)
                                            />
                                            <span class="label-text">{text}</span>
                                        </label>
                                    }
                                })
                                .collect_view()}
                        </div>
                    </div>

                    <div class="form-control">
                        <label class="label" for="req-priority">
                            <span class="label-text">"How urgent is this? (optional)"</span>
                        </label>
                        <select
                            id="req-priority"
                            class="select select-bordered"
                            on:change=move |ev| set_priority.set(event_target_value(&ev))
                        >
                            <option value="" selected=move || priority.get().is_empty()>
                                "Not sure"
                            </option>
                            {Priority::ALL
                                .iter()
                                .map(|p| {
                                    let wire = p.wire_name();
                                    view! {
                                        <option value=wire selected=move || priority.get() == wire>
                                            {p.label()}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </div>

                    <div class="form-control">
                        <label class="label" for="req-details">
                            <span class="label-text">"Details"</span>
                            <span class="label-text-alt">
                                {move || format!("{} characters left", remaining())}
                            </span>
                        </label>
                        <textarea
                            id="req-details"
                            class="textarea textarea-bordered h-32"
                            placeholder="Describe the situation, your location, and any urgent needs."
                            maxlength=validate::DETAILS_MAX_LEN.to_string()
                            prop:value=details
                            on:input=move |ev| set_details.set(event_target_value(&ev))
                            required
                        ></textarea>
                    </div>

                    <div class="form-control mt-2">
                        <button class="btn btn-primary" disabled=move || submitting.get()>
                            {move || {
                                if submitting.get() {
                                    view! {
                                        <span class="loading loading-spinner"></span>
                                        "Submitting..."
                                    }
                                        .into_any()
                                } else {
                                    "Submit Request".into_any()
                                }
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
