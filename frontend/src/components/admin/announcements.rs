use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;

use myflood_shared::Announcement;
use myflood_shared::protocol::{AnnouncementPayload, ListQuery};
use myflood_shared::validate;

use crate::api::use_api;
use crate::auth::{use_session, use_session_version};
use crate::components::confirm::ConfirmDialog;
use crate::components::toast_view::use_toasts;
use crate::guard::redirect_to;
use crate::resource::{Debouncer, ResourceManager, SEARCH_DEBOUNCE_MS, handle_session_expiry};

#[component]
pub fn AnnouncementsManager() -> impl IntoView {
    let api = use_api();
    let toasts = use_toasts();
    let session = use_session();
    let version = use_session_version();

    let (search, set_search) = signal(String::new());
    let (active_only, set_active_only) = signal(false);

    let on_expired = move || {
        toasts.error("Your admin session has expired. Please log in again.");
        handle_session_expiry(&session, redirect_to);
        version.bump();
    };

    let mgr = ResourceManager::<Announcement, _>::new(
        api,
        move || {
            let mut query = ListQuery::new();
            query.push_if("search", search.get_untracked());
            if active_only.get_untracked() {
                query.push("is_active", "true");
            }
            query
        },
        move |kind, message| toasts.push(kind, message),
        on_expired,
    );

    // Initial load plus refetch when the checkbox filter flips.
    {
        let mgr = mgr.clone();
        Effect::new(move |_| {
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
    let (f_content, set_f_content) = signal(String::new());
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
        set_f_content.set(String::new());
        set_f_active.set(true);
        set_form_open.set(true);
    };

    let open_edit = move |item: Announcement| {
        set_editing_id.set(Some(item.announcement_id));
        set_f_title.set(item.title);
        set_f_content.set(item.content);
        set_f_active.set(item.is_active);
        set_form_open.set(true);
    };

    let on_submit = {
        let mgr = mgr.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            if let Err(msg) = validate::require(&f_title.get(), "Title")
                .and_then(|_| validate::require(&f_content.get(), "Content"))
            {
                toasts.error(msg);
                return;
            }
            let payload = AnnouncementPayload {
                title: f_title.get().trim().to_string(),
                content: f_content.get().trim().to_string(),
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
                .map(|p| format!("Delete announcement \"{}\"? This cannot be undone.", p.label))
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
        move |item: &Announcement| {
            mgr.request_delete(item.announcement_id.clone(), item.title.clone());
        }
    };

    view! {
        <div class="space-y-4">
            <div class="flex flex-wrap items-center gap-3">
                <input
                    type="text"
                    placeholder="Search announcements..."
                    class="input input-bordered w-64"
                    prop:value=search
                    on:input=on_search_input
                />
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
                    "New Announcement"
                </button>
            </div>

            <Show when=move || loading.get()>
                <span class="loading loading-spinner text-primary"></span>
            </Show>

            <Show when=move || fetched_once.get() && items.get().is_empty() && !loading.get()>
                <p class="text-base-content/60">"No announcements found."</p>
            </Show>

            <div class="overflow-x-auto">
                <table class="table">
                    <thead>
                        <tr>
                            <th>"Title"</th>
                            <th>"Status"</th>
                            <th>"Updated"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || items.get()
                            key=|item: &Announcement| item.announcement_id.clone()
                            children={
                                let open_edit = open_edit.clone();
                                let request_delete = request_delete.clone();
                                move |item: Announcement| {
                                    let edit_item = item.clone();
                                    let open_edit = open_edit.clone();
                                    let request_delete = request_delete.clone();
                                    let delete_item = item.clone();
                                    view! {
                                        <tr>
                                            <td>
                                                <div class="font-medium">{item.title.clone()}</div>
                                                <div class="text-sm text-base-content/60 truncate max-w-md">
                                                    {item.content.clone()}
                                                </div>
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
                                            <td>{item.updated_at.format("%Y-%m-%d %H:%M").to_string()}</td>
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
                        if editing_id.get().is_some() {
                            "Edit Announcement"
                        } else {
                            "New Announcement"
                        }
                    }}
                </h3>
                <form class="space-y-4 mt-4" on:submit=on_submit>
                    <div class="form-control">
                        <label class="label" for="ann-title">
                            <span class="label-text">"Title"</span>
                        </label>
                        <input
                            id="ann-title"
                            type="text"
                            class="input input-bordered"
                            prop:value=f_title
                            on:input=move |ev| set_f_title.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="ann-content">
                            <span class="label-text">"Content"</span>
                        </label>
                        <textarea
                            id="ann-content"
                            class="textarea textarea-bordered h-32"
                            prop:value=f_content
                            on:input=move |ev| set_f_content.set(event_target_value(&ev))
                            required
                        ></textarea>
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
            title=Signal::derive(|| "Delete Announcement".to_string())
            message=confirm_message
            visible=confirm_visible
            on_confirm=on_confirm
            on_cancel=on_cancel
        />
    }
}
