use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;

use myflood_shared::protocol::{ContactPayload, ListQuery};
use myflood_shared::validate;
use myflood_shared::{EmergencyContact, Region};

use crate::api::use_api;
use crate::auth::{use_session, use_session_version};
use crate::components::confirm::ConfirmDialog;
use crate::components::toast_view::use_toasts;
use crate::guard::redirect_to;
use crate::resource::{Debouncer, ResourceManager, SEARCH_DEBOUNCE_MS, handle_session_expiry};

#[component]
pub fn ContactsManager() -> impl IntoView {
    let api = use_api();
    let toasts = use_toasts();
    let session = use_session();
    let version = use_session_version();

    let (search, set_search) = signal(String::new());
    let (region_filter, set_region_filter) = signal(String::new());
    let (active_only, set_active_only) = signal(false);

    let on_expired = move || {
        toasts.error("Your admin session has expired. Please log in again.");
        handle_session_expiry(&session, redirect_to);
        version.bump();
    };

    let mgr = ResourceManager::<EmergencyContact, _>::new(
        api,
        move || {
            let mut query = ListQuery::new();
            query.push_if("search", search.get_untracked());
            query.push_if("region", region_filter.get_untracked());
            if active_only.get_untracked() {
                query.push("is_active", "true");
            }
            query
        },
        move |kind, message| toasts.push(kind, message),
        on_expired,
    );

    {
        let mgr = mgr.clone();
        Effect::new(move |_| {
            region_filter.get();
            active_only.get();
            mgr.refetch();
        });
    }
    {
        let mgr = mgr.clone();
        on_cleanup(move || mgr.retire());
    }

    let debouncer = Rc::new(RefCell::new(Debouncer::new()));
    let on_search_input = {
        let mgr = mgr.clone();
        let debouncer = Rc::clone(&debouncer);
        move |ev| {
            set_search.set(event_target_value(&ev));
            let mgr = mgr.clone();
            debouncer
                .borrow_mut()
                .schedule(SEARCH_DEBOUNCE_MS, move || mgr.refetch());
        }
    };

    // ---- create/edit form ----

    let (form_open, set_form_open) = signal(false);
    let (editing_id, set_editing_id) = signal(Option::<String>::None);
    let (f_name, set_f_name) = signal(String::new());
    let (f_role, set_f_role) = signal(String::new());
    let (f_phone, set_f_phone) = signal(String::new());
    let (f_email, set_f_email) = signal(String::new());
    let (f_region, set_f_region) = signal(String::new());
    let (f_active, set_f_active) = signal(true);
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if form_open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let open_create = move |_| {
        set_editing_id.set(None);
        set_f_name.set(String::new());
        set_f_role.set(String::new());
        set_f_phone.set(String::new());
        set_f_email.set(String::new());
        set_f_region.set(String::new());
        set_f_active.set(true);
        set_form_open.set(true);
    };

    let open_edit = move |item: EmergencyContact| {
        set_editing_id.set(Some(item.contact_id));
        set_f_name.set(item.name);
        set_f_role.set(item.role);
        set_f_phone.set(item.phone);
        set_f_email.set(item.email.unwrap_or_default());
        set_f_region.set(
            item.region
                .map(|r| r.wire_name().to_string())
                .unwrap_or_default(),
        );
        set_f_active.set(item.is_active);
        set_form_open.set(true);
    };

    let on_submit = {
        let mgr = mgr.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let email = f_email.get().trim().to_string();
            let checks = validate::require(&f_name.get(), "Name")
                .and_then(|_| validate::require(&f_role.get(), "Role"))
                .and_then(|_| validate::require(&f_phone.get(), "Phone"))
                .and_then(|_| {
                    if email.is_empty() {
                        Ok(())
                    } else {
                        validate::email(&email)
                    }
                });
            if let Err(msg) = checks {
                toasts.error(msg);
                return;
            }
            let payload = ContactPayload {
                name: f_name.get().trim().to_string(),
                role: f_role.get().trim().to_string(),
                phone: f_phone.get().trim().to_string(),
                email: if email.is_empty() { None } else { Some(email) },
                region: Region::from_wire(&f_region.get()),
                is_active: f_active.get(),
            };
            let close = move || set_form_open.set(false);
            match editing_id.get() {
                Some(id) => mgr.update(id, payload, close),
                None => mgr.create(payload, close),
            }
        }
    };

    // ---- delete confirmation ----

    let confirm_visible = {
        let mgr = mgr.clone();
        Signal::derive(move || mgr.delete_flow.get().pending().is_some())
    };
    let confirm_message = {
        let mgr = mgr.clone();
        Signal::derive(move || {
            mgr.delete_flow
                .get()
                .pending()
                .map(|p| format!("Delete contact \"{}\"? This cannot be undone.", p.label))
                .unwrap_or_default()
        })
    };
    let on_confirm = {
        let mgr = mgr.clone();
        Callback::new(move |_| mgr.confirm_delete())
    };
    let on_cancel = {
        let mgr = mgr.clone();
        Callback::new(move |_| mgr.cancel_delete())
    };

    let items = mgr.items;
    let loading = mgr.loading;
    let fetched_once = mgr.fetched_once;
    let request_delete = {
        let mgr = mgr.clone();
        move |item: &EmergencyContact| {
            mgr.request_delete(item.contact_id.clone(), item.name.clone());
        }
    };

    view! {
        <div class="space-y-4">
            <div class="flex flex-wrap items-center gap-3">
                <input
                    type="text"
                    placeholder="Search contacts..."
                    class="input input-bordered w-64"
                    prop:value=search
                    on:input=on_search_input
                />
                <select
                    class="select select-bordered"
                    on:change=move |ev| set_region_filter.set(event_target_value(&ev))
                >
                    <option value="" selected=move || region_filter.get().is_empty()>
                        "All regions"
                    </option>
                    {Region::ALL
                        .iter()
                        .map(|r| {
                            let wire = r.wire_name();
                            view! {
                                <option value=wire selected=move || region_filter.get() == wire>
                                    {r.label()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <label class="label cursor-pointer gap-2">
                    <input
                        type="checkbox"
                        class="checkbox"
                        prop:checked=active_only
                        on:change=move |ev| set_active_only.set(event_target_checked(&ev))
                    />
                    <span class="label-text">"Active only"</span>
                </label>
                <button class="btn btn-primary ml-auto" on:click=open_create>
                    "New Contact"
                </button>
            </div>

            <Show when=move || loading.get()>
                <span class="loading loading-spinner text-primary"></span>
            </Show>

            <Show when=move || fetched_once.get() && items.get().is_empty() && !loading.get()>
                <p class="text-base-content/60">"No emergency contacts found."</p>
            </Show>

            <div class="overflow-x-auto">
                <table class="table">
                    <thead>
                        <tr>
                            <th>"Name"</th>
                            <th>"Role"</th>
                            <th>"Phone"</th>
                            <th>"Region"</th>
                            <th>"Status"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || items.get()
                            key=|item: &EmergencyContact| item.contact_id.clone()
                            children={
                                let open_edit = open_edit.clone();
                                let request_delete = request_delete.clone();
                                move |item: EmergencyContact| {
                                    let edit_item = item.clone();
                                    let delete_item = item.clone();
                                    let open_edit = open_edit.clone();
                                    let request_delete = request_delete.clone();
                                    view! {
                                        <tr>
                                            <td>
                                                <div class="font-medium">{item.name.clone()}</div>
                                                <div class="text-sm text-base-content/60">
                                                    {item.email.clone().unwrap_or_default()}
                                                </div>
                                            </td>
                                            <td>{item.role.clone()}</td>
                                            <td>{item.phone.clone()}</td>
                                            <td>
                                                {item
                                                    .region
                                                    .map(|r| r.label().to_string())
                                                    .unwrap_or_else(|| "Nationwide".to_string())}
                                            </td>
                                            <td>
                                                {if item.is_active {
                                                    view! { <span class="badge badge-success">"Active"</span> }
                                                        .into_any()
                                                } else {
                                                    view! { <span class="badge badge-ghost">"Inactive"</span> }
                                                        .into_any()
                                                }}
                                            </td>
                                            <td class="text-right">
                                                <button
                                                    class="btn btn-ghost btn-sm"
                                                    on:click=move |_| open_edit(edit_item.clone())
                                                >
                                                    "Edit"
                                                </button>
                                                <button
                                                    class="btn btn-ghost btn-sm text-error"
                                                    on:click=move |_| request_delete(&delete_item)
                                                >
                                                    "Delete"
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }
                            }
                        />
                    </tbody>
                </table>
            </div>
        </div>

        <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_form_open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">
                    {move || {
                        if editing_id.get().is_some() { "Edit Contact" } else { "New Contact" }
                    }}
                </h3>
                <form class="space-y-4 mt-4" on:submit=on_submit>
                    <div class="form-control">
                        <label class="label" for="contact-name">
                            <span class="label-text">"Name"</span>
                        </label>
                        <input
                            id="contact-name"
                            type="text"
                            class="input input-bordered"
                            prop:value=f_name
                            on:input=move |ev| set_f_name.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label" for="contact-role">
                                <span class="label-text">"Role"</span>
                            </label>
                            <input
                                id="contact-role"
                                type="text"
                                placeholder="Fire & Rescue"
                                class="input input-bordered"
                                prop:value=f_role
                                on:input=move |ev| set_f_role.set(event_target_value(&ev))
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="contact-phone">
                                <span class="label-text">"Phone"</span>
                            </label>
                            <input
                                id="contact-phone"
                                type="tel"
                                class="input input-bordered"
                                prop:value=f_phone
                                on:input=move |ev| set_f_phone.set(event_target_value(&ev))
                                required
                            />
                        </div>
                    </div>
                    <div class="form-control">
                        <label class="label" for="contact-email">
                            <span class="label-text">"Email (optional)"</span>
                        </label>
                        <input
                            id="contact-email"
                            type="email"
                            class="input input-bordered"
                            prop:value=f_email
                            on:input=move |ev| set_f_email.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="contact-region">
                            <span class="label-text">"Region"</span>
                        </label>
                        <select
                            id="contact-region"
                            class="select select-bordered"
                            on:change=move |ev| set_f_region.set(event_target_value(&ev))
                        >
                            <option value="" selected=move || f_region.get().is_empty()>
                                "Nationwide"
                            </option>
                            {Region::ALL
                                .iter()
                                .map(|r| {
                                    let wire = r.wire_name();
                                    view! {
                                        <option value=wire selected=move || f_region.get() == wire>
                                            {r.label()}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </div>
                    <label class="label cursor-pointer justify-start gap-2">
                        <input
                            type="checkbox"
                            class="checkbox"
                            prop:checked=f_active
                            on:change=move |ev| set_f_active.set(event_target_checked(&ev))
                        />
                        <span class="label-text">"Active"</span>
                    </label>
                    <div class="modal-action">
                        <button
                            type="button"
                            class="btn"
                            on:click=move |_| set_form_open.set(false)
                        >
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary">
                            "Save"
                        </button>
                    </div>
                </form>
            </div>
        </dialog>

        <ConfirmDialog
            title=Signal::derive(|| "Delete Contact".to_string())
            message=confirm_message
            visible=confirm_visible
            on_confirm=on_confirm
            on_cancel=on_cancel
        />
    }
}
