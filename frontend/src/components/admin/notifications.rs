use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;

use myflood_shared::protocol::{ListQuery, NotificationPayload};
use myflood_shared::validate;
use myflood_shared::{FloodNotification, Region, Severity};

use crate::api::use_api;
use crate::auth::{use_session, use_session_version};
use crate::components::confirm::ConfirmDialog;
use crate::components::toast_view::use_toasts;
use crate::guard::redirect_to;
use crate::resource::{Debouncer, ResourceManager, SEARCH_DEBOUNCE_MS, handle_session_expiry};

#[component]
pub fn NotificationsManager() -> impl IntoView {
    let api = use_api();
    let toasts = use_toasts();
    let session = use_session();
    let version = use_session_version();

    let (search, set_search) = signal(String::new());
    let (severity_filter, set_severity_filter) = signal(String::new());
    let (region_filter, set_region_filter) = signal(String::new());
    let (active_only, set_active_only) = signal(false);

    let on_expired = move || {
        toasts.error("Your admin session has expired. Please log in again.");
        handle_session_expiry(&session, redirect_to);
        version.bump();
    };

    let mgr = ResourceManager::<FloodNotification, _>::new(
        api,
        move || {
            let mut query = ListQuery::new();
            query.push_if("search", search.get_untracked());
            query.push_if("severity", severity_filter.get_untracked());
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
            severity_filter.get();
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
    let (f_title, set_f_title) = signal(String::new());
    let (f_message, set_f_message) = signal(String::new());
    let (f_severity, set_f_severity) = signal(Severity::Medium);
    let (f_regions, set_f_regions) = signal(Vec::<Region>::new());
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
        set_f_title.set(String::new());
        set_f_message.set(String::new());
        set_f_severity.set(Severity::Medium);
        set_f_regions.set(Vec::new());
        set_f_active.set(true);
        set_form_open.set(true);
    };

    let open_edit = move |item: FloodNotification| {
        set_editing_id.set(Some(item.notification_id));
        set_f_title.set(item.title);
        set_f_message.set(item.message);
        set_f_severity.set(item.severity);
        set_f_regions.set(item.affected_regions);
        set_f_active.set(item.is_active);
        set_form_open.set(true);
    };

    let toggle_region = move |region: Region| {
        set_f_regions.update(|regions| {
            if let Some(pos) = regions.iter().position(|r| *r == region) {
                regions.remove(pos);
            } else {
                regions.push(region);
            }
        });
    };

    let on_submit = {
        let mgr = mgr.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            if let Err(msg) = validate::require(&f_title.get(), "Title")
                .and_then(|_| validate::require(&f_message.get(), "Message"))
            {
                toasts.error(msg);
                return;
            }
            let payload = NotificationPayload {
                title: f_title.get().trim().to_string(),
                message: f_message.get().trim().to_string(),
                severity: f_severity.get(),
                affected_regions: f_regions.get(),
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
                .map(|p| format!("Delete notification \"{}\"? This cannot be undone.", p.label))
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
        move |item: &FloodNotification| {
            mgr.request_delete(item.notification_id.clone(), item.title.clone());
        }
    };

    view! {
        <div class="space-y-4">
            <div class="flex flex-wrap items-center gap-3">
                <input
                    type="text"
                    placeholder="Search notifications..."
                    class="input input-bordered w-64"
                    prop:value=search
                    on:input=on_search_input
                />
                <select
                    class="select select-bordered"
                    on:change=move |ev| set_severity_filter.set(event_target_value(&ev))
                >
                    <option value="" selected=move || severity_filter.get().is_empty()>
                        "All severities"
                    </option>
                    {Severity::ALL
                        .iter()
                        .map(|s| {
                            let wire = s.wire_name();
                            view! {
                                <option
                                    value=wire
                                    selected=move || severity_filter.get() == wire
                                >
                                    {s.label()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
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
                    "New Notification"
                </button>
            </div>

            <Show when=move || loading.get()>
                <span class="loading loading-spinner text-primary"></span>
            </Show>

            <Show when=move || fetched_once.get() && items.get().is_empty() && !loading.get()>
                <p class="text-base-content/60">"No notifications found."</p>
            </Show>

            <div class="overflow-x-auto">
                <table class="table">
                    <thead>
                        <tr>
                            <th>"Title"</th>
                            <th>"Severity"</th>
                            <th>"Regions"</th>
                            <th>"Status"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || items.get()
                            key=|item: &FloodNotification| item.notification_id.clone()
                            children={
                                let open_edit = open_edit.clone();
                                let request_delete = request_delete.clone();
                                move |item: FloodNotification| {
                                    let edit_item = item.clone();
                                    let delete_item = item.clone();
                                    let open_edit = open_edit.clone();
                                    let request_delete = request_delete.clone();
                                    let regions = item
                                        .affected_regions
                                        .iter()
                                        .map(|r| r.label())
                                        .collect::<Vec<_>>()
                                        .join(", ");
                                    view! {
                                        <tr>
                                            <td>
                                                <div class="font-medium">{item.title.clone()}</div>
                                                <div class="text-sm text-base-content/60 truncate max-w-md">
                                                    {item.message.clone()}
                                                </div>
                                            </td>
                                            <td>
                                                <span class=format!("badge {}", item.severity.css_class())>
                                                    {item.severity.label()}
                                                </span>
                                            </td>
                                            <td class="text-sm">
                                                {if regions.is_empty() {
                                                    "All regions".to_string()
                                                } else {
                                                    regions
                                                }}
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
            <div class="modal-box max-w-2xl">
                <h3 class="font-bold text-lg">
                    {move || {
                        if editing_id.get().is_some() {
                            "Edit Notification"
                        } else {
                            "New Notification"
                        }
                    }}
                </h3>
                <form class="space-y-4 mt-4" on:submit=on_submit>
                    <div class="form-control">
                        <label class="label" for="notif-title">
                            <span class="label-text">"Title"</span>
                        </label>
                        <input
                            id="notif-title"
                            type="text"
                            class="input input-bordered"
                            prop:value=f_title
                            on:input=move |ev| set_f_title.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="notif-message">
                            <span class="label-text">"Message"</span>
                        </label>
                        <textarea
                            id="notif-message"
                            class="textarea textarea-bordered h-24"
                            prop:value=f_message
                            on:input=move |ev| set_f_message.set(event_target_value(&ev))
                            required
                        ></textarea>
                    </div>
                    <div class="form-control">
                        <label class="label" for="notif-severity">
                            <span class="label-text">"Severity"</span>
                        </label>
                        <select
                            id="notif-severity"
                            class="select select-bordered"
                            on:change=move |ev| {
                                set_f_severity
                                    .set(
                                        Severity::from_wire(&event_target_value(&ev))
                                            .unwrap_or_default(),
                                    )
                            }
                        >
                            {Severity::ALL
                                .iter()
                                .map(|s| {
                                    let severity = *s;
                                    view! {
                                        <option
                                            value=severity.wire_name()
                                            selected=move || f_severity.get() == severity
                                        >
                                            {severity.label()}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </div>
                    <div class="form-control">
                        <span class="label-text mb-2">"Affected regions"</span>
                        <div class="grid grid-cols-2 sm:grid-cols-4 gap-1">
                            {Region::ALL
                                .iter()
                                .map(|r| {
                                    let region = *r;
                                    view! {
                                        <label class="label cursor-pointer justify-start gap-2 py-1">
                                            <input
                                                type="checkbox"
                                                class="checkbox checkbox-sm"
                                                prop:checked=move || {
                                                    f_regions.get().contains(&region)
                                                }
                                                on:change=move |_| toggle_region(region)
                                            />
                                            <span class="label-text text-sm">{region.label()}</span>
                                        </label>
                                    }
                                })
                                .collect_view()}
                        </div>
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
            title=Signal::derive(|| "Delete Notification".to_string())
            message=confirm_message
            visible=confirm_visible
            on_confirm=on_confirm
            on_cancel=on_cancel
        />
    }
}
