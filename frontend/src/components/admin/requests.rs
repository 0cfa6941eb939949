use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use myflood_shared::protocol::{AddNote, AssignExpert, ListQuery, StatusUpdate};
use myflood_shared::validate;
use myflood_shared::{FloodRequest, Priority, RequestStatus};

use crate::api::{ApiError, use_api};
use crate::auth::{use_session, use_session_version};
use crate::components::confirm::ConfirmDialog;
use crate::components::toast_view::use_toasts;
use crate::guard::redirect_to;
use crate::resource::{Debouncer, ResourceManager, SEARCH_DEBOUNCE_MS, handle_session_expiry};

/// Citizen requests are created from the public form, never here, so this
/// manager has no create path; admins change status, assign an expert,
/// append notes, or delete.
#[component]
pub fn RequestsManager() -> impl IntoView {
    let api = use_api();
    let toasts = use_toasts();
    let session = use_session();
    let version = use_session_version();

    let (search, set_search) = signal(String::new());
    let (status_filter, set_status_filter) = signal(String::new());
    let (priority_filter, set_priority_filter) = signal(String::new());

    let on_expired: Arc<dyn Fn() + Send + Sync> = Arc::new(move || {
        toasts.error("Your admin session has expired. Please log in again.");
        handle_session_expiry(&session, redirect_to);
        version.bump();
    });

    let handle_error: Arc<dyn Fn(ApiError) + Send + Sync> = Arc::new({
        let on_expired = Arc::clone(&on_expired);
        move |err| {
            if err == ApiError::SessionExpired {
                on_expired();
            } else {
                toasts.error(err.user_message());
            }
        }
    });

    let mgr = ResourceManager::<FloodRequest, _>::new(
        Arc::clone(&api),
        move || {
            let mut query = ListQuery::new();
            query.push_if("search", search.get_untracked());
            query.push_if("status", status_filter.get_untracked());
            query.push_if("priority", priority_filter.get_untracked());
            query
        },
        move |kind, message| toasts.push(kind, message),
        {
            let on_expired = Arc::clone(&on_expired);
            move || on_expired()
        },
    );

    {
        let mgr = mgr.clone();
        Effect::new(move |_| {
            status_filter.get();
            priority_filter.get();
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

    // ---- manage dialog ----

    let (managed, set_managed) = signal(Option::<FloodRequest>::None);
    let (f_status, set_f_status) = signal(RequestStatus::Pending);
    let (f_status_note, set_f_status_note) = signal(String::new());
    let (f_expert, set_f_expert) = signal(String::new());
    let (f_note, set_f_note) = signal(String::new());
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if managed.get().is_some() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let open_manage = move |item: FloodRequest| {
        set_f_status.set(item.status);
        set_f_status_note.set(String::new());
        set_f_expert.set(item.assigned_to.clone().unwrap_or_default());
        set_f_note.set(String::new());
        set_managed.set(Some(item));
    };

    let apply_status = {
        let api = Arc::clone(&api);
        let mgr = mgr.clone();
        let handle_error = Arc::clone(&handle_error);
        move |_| {
            let Some(target) = managed.get() else {
                return;
            };
            let note = f_status_note.get().trim().to_string();
            let update = StatusUpdate {
                status: f_status.get(),
                admin_note: if note.is_empty() { None } else { Some(note) },
            };
            let api = Arc::clone(&api);
            let mgr = mgr.clone();
            let handle_error = Arc::clone(&handle_error);
            spawn_local(async move {
                match api.update_request_status(&target.request_id, &update).await {
                    Ok(()) => {
                        toasts.success("Request status updated.");
                        set_managed.set(None);
                        mgr.refetch();
                    }
                    Err(err) => handle_error(err),
                }
            });
        }
    };

    let assign_expert = {
        let api = Arc::clone(&api);
        let mgr = mgr.clone();
        let handle_error = Arc::clone(&handle_error);
        move |_| {
            let Some(target) = managed.get() else {
                return;
            };
            let expert_name = f_expert.get().trim().to_string();
            if let Err(msg) = validate::require(&expert_name, "Expert name") {
                toasts.error(msg);
                return;
            }
            let api = Arc::clone(&api);
            let mgr = mgr.clone();
            let handle_error = Arc::clone(&handle_error);
            spawn_local(async move {
                match api
                    .assign_request(&target.request_id, &AssignExpert { expert_name })
                    .await
                {
                    Ok(()) => {
                        toasts.success("Request assigned.");
                        set_managed.set(None);
                        mgr.refetch();
                    }
                    Err(err) => handle_error(err),
                }
            });
        }
    };

    let add_note = {
        let api = Arc::clone(&api);
        let mgr = mgr.clone();
        let handle_error = Arc::clone(&handle_error);
        move |_| {
            let Some(target) = managed.get() else {
                return;
            };
            let note = f_note.get().trim().to_string();
            if let Err(msg) = validate::require(&note, "Note") {
                toasts.error(msg);
                return;
            }
            let api = Arc::clone(&api);
            let mgr = mgr.clone();
            let handle_error = Arc::clone(&handle_error);
            spawn_local(async move {
                match api.add_request_note(&target.request_id, &AddNote { note }).await {
                    Ok(()) => {
                        toasts.success("Note added.");
                        set_managed.set(None);
                        mgr.refetch();
                    }
                    Err(err) => handle_error(err),
                }
            });
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
                .map(|p| format!("Delete the request from {}? This cannot be undone.", p.label))
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
        move |item: &FloodRequest| {
            mgr.request_delete(item.request_id.clone(), item.user_name.clone());
        }
    };

    view! {
        <div class="space-y-4">
            <div class="flex flex-wrap items-center gap-3">
                <input
                    type="text"
                    placeholder="Search requests..."
                    class="input input-bordered w-64"
                    prop:value=search
                    on:input=on_search_input
                />
                <select
                    class="select select-bordered"
                    on:change=move |ev| set_status_filter.set(event_target_value(&ev))
                >
                    <option value="" selected=move || status_filter.get().is_empty()>
                        "All statuses"
                    </option>
                    {RequestStatus::ALL
                        .iter()
                        .map(|s| {
                            let wire = s.wire_name();
                            view! {
                                <option value=wire selected=move || status_filter.get() == wire>
                                    {s.label()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <select
                    class="select select-bordered"
                    on:change=move |ev| set_priority_filter.set(event_target_value(&ev))
                >
                    <option value="" selected=move || priority_filter.get().is_empty()>
                        "All priorities"
                    </option>
                    {Priority::ALL
                        .iter()
                        .map(|p| {
                            let wire = p.wire_name();
                            view! {
                                <option value=wire selected=move || priority_filter.get() == wire>
                                    {p.label()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
            </div>

            <Show when=move || loading.get()>
                <span class="loading loading-spinner text-primary"></span>
            </Show>

            <Show when=move || fetched_once.get() && items.get().is_empty() && !loading.get()>
                <p class="text-base-content/60">"No requests found."</p>
            </Show>

            <div class="overflow-x-auto">
                <table class="table">
                    <thead>
                        <tr>
                            <th>"Requester"</th>
                            <th>"Region"</th>
                            <th>"Type"</th>
                            <th>"Priority"</th>
                            <th>"Status"</th>
                            <th>"Assigned"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || items.get()
                            key=|item: &FloodRequest| item.request_id.clone()
                            children={
                                let open_manage = open_manage.clone();
                                let request_delete = request_delete.clone();
                                move |item: FloodRequest| {
                                    let manage_item = item.clone();
                                    let delete_item = item.clone();
                                    let open_manage = open_manage.clone();
                                    let request_delete = request_delete.clone();
                                    view! {
                                        <tr>
                                            <td>
                                                <div class="font-medium">{item.user_name.clone()}</div>
                                                <div class="text-sm text-base-content/60">
                                                    {item.user_email.clone().unwrap_or_default()}
                                                </div>
                                            </td>
                                            <td>
                                                {item
                                                    .region
                                                    .map(|r| r.label().to_string())
                                                    .unwrap_or_default()}
                                            </td>
                                            <td>
                                                {item
                                                    .request_type
                                                    .map(|k| k.label().to_string())
                                                    .unwrap_or_default()}
                                            </td>
                                            <td>
                                                {item
                                                    .priority
                                                    .map(|p| {
                                                        view! {
                                                            <span class=format!("badge {}", p.css_class())>
                                                                {p.label()}
                                                            </span>
                                                        }
                                                            .into_any()
                                                    })
                                                    .unwrap_or_else(|| "-".into_any())}
                                            </td>
                                            <td>
                                                <span class=format!("badge {}", item.status.css_class())>
                                                    {item.status.label()}
                                                </span>
                                            </td>
                                            <td>{item.assigned_to.clone().unwrap_or_default()}</td>
                                            <td class="text-right">
                                                <button
                                                    class="btn btn-ghost btn-sm"
                                                    on:click=move |_| open_manage(manage_item.clone())
                                                >
                                                    "Manage"
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

        <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_managed.set(None)>
            <div class="modal-box max-w-2xl">
                <h3 class="font-bold text-lg">
                    {move || {
                        managed
                            .get()
                            .map(|r| format!("Request from {}", r.user_name))
                            .unwrap_or_default()
                    }}
                </h3>
                {move || {
                    managed.get().map(|request| {
                        view! {
                            <div class="py-2 space-y-1 text-sm">
                                <p>{request.details.clone().unwrap_or_default()}</p>
                                <p class="text-base-content/60">
                                    {format!(
                                        "Submitted {}",
                                        request.created_at.format("%Y-%m-%d %H:%M"),
                                    )}
                                </p>
                            </div>
                            <Show when={
                                let request = request.clone();
                                move || !request.admin_notes.is_empty()
                            }>
                                {
                                    let notes = request.admin_notes.clone();
                                    view! {
                                        <div class="bg-base-200 rounded-lg p-3 space-y-1 text-sm">
                                            {notes
                                                .iter()
                                                .map(|n| {
                                                    view! {
                                                        <p>
                                                            <span class="font-medium">
                                                                {n.author.clone().unwrap_or_else(|| "Admin".to_string())}
                                                                ": "
                                                            </span>
                                                            {n.note.clone()}
                                                        </p>
                                                    }
                                                })
                                                .collect_view()}
                                        </div>
                                    }
                                }
                            </Show>
                        }
                    })
                }}

                <div class="divider">"Status"</div>
                <div class="flex flex-wrap items-end gap-3">
                    <div class="form-control">
                        <label class="label" for="req-status">
                            <span class="label-text">"New status"</span>
                        </label>
                        <select
                            id="req-status"
                            class="select select-bordered"
                            on:change=move |ev| {
                                set_f_status
                                    .set(
                                        RequestStatus::from_wire(&event_target_value(&ev))
                                            .unwrap_or_default(),
                                    )
                            }
                        >
                            {RequestStatus::ALL
                                .iter()
                                .map(|s| {
                                    let status = *s;
                                    view! {
                                        <option
                                            value=status.wire_name()
                                            selected=move || f_status.get() == status
                                        >
                                            {status.label()}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                    </div>
                    <div class="form-control grow">
                        <label class="label" for="req-status-note">
                            <span class="label-text">"Note (optional)"</span>
                        </label>
                        <input
                            id="req-status-note"
                            type="text"
                            class="input input-bordered"
                            prop:value=f_status_note
                            on:input=move |ev| set_f_status_note.set(event_target_value(&ev))
                        />
                    </div>
                    <button class="btn btn-primary" on:click=apply_status>
                        "Apply"
                    </button>
                </div>

                <div class="divider">"Assignment"</div>
                <div class="flex items-end gap-3">
                    <div class="form-control grow">
                        <label class="label" for="req-expert">
                            <span class="label-text">"Expert name"</span>
                        </label>
                        <input
                            id="req-expert"
                            type="text"
                            class="input input-bordered"
                            prop:value=f_expert
                            on:input=move |ev| set_f_expert.set(event_target_value(&ev))
                        />
                    </div>
                    <button class="btn" on:click=assign_expert>
                        "Assign"
                    </button>
                </div>

                <div class="divider">"Notes"</div>
                <div class="flex items-end gap-3">
                    <div class="form-control grow">
                        <label class="label" for="req-note">
                            <span class="label-text">"New note"</span>
                        </label>
                        <input
                            id="req-note"
                            type="text"
                            class="input input-bordered"
                            prop:value=f_note
                            on:input=move |ev| set_f_note.set(event_target_value(&ev))
                        />
                    </div>
                    <button class="btn" on:click=add_note>
                        "Add Note"
                    </button>
                </div>

                <div class="modal-action">
                    <button class="btn" on:click=move |_| set_managed.set(None)>
                        "Close"
                    </button>
                </div>
            </div>
        </dialog>

        <ConfirmDialog
            title=Signal::derive(|| "Delete Request".to_string())
            message=confirm_message
            visible=confirm_visible
            on_confirm=on_confirm
            on_cancel=on_cancel
        />
    }
}
