use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use myflood_shared::protocol::{ListQuery, ResetPassword, UserPayload};
use myflood_shared::validate;
use myflood_shared::{Role, User};

use crate::api::{ApiError, use_api};
use crate::auth::{use_session, use_session_version};
use crate::components::confirm::ConfirmDialog;
use crate::components::toast_view::use_toasts;
use crate::guard::redirect_to;
use crate::resource::{Debouncer, ResourceManager, SEARCH_DEBOUNCE_MS, handle_session_expiry};

const ROLES: [Role; 3] = [Role::User, Role::Expert, Role::Admin];

#[component]
pub fn UsersManager() -> impl IntoView {
    let api = use_api();
    let toasts = use_toasts();
    let session = use_session();
    let version = use_session_version();

    let (search, set_search) = signal(String::new());
    let (role_filter, set_role_filter) = signal(String::new());

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

    let mgr = ResourceManager::<User, _>::new(
        Arc::clone(&api),
        move || {
            let mut query = ListQuery::new();
            query.push_if("search", search.get_untracked());
            query.push_if("role", role_filter.get_untracked());
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
            role_filter.get();
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
    let (f_username, set_f_username) = signal(String::new());
    let (f_email, set_f_email) = signal(String::new());
    let (f_full_name, set_f_full_name) = signal(String::new());
    let (f_role, set_f_role) = signal(Role::User);
    let (f_banned, set_f_banned) = signal(false);
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
        set_f_username.set(String::new());
        set_f_email.set(String::new());
        set_f_full_name.set(String::new());
        set_f_role.set(Role::User);
        set_f_banned.set(false);
        set_form_open.set(true);
    };

    let open_edit = move |item: User| {
        set_editing_id.set(Some(item.user_id));
        set_f_username.set(item.username);
        set_f_email.set(item.email);
        set_f_full_name.set(item.full_name.unwrap_or_default());
        set_f_role.set(item.role);
        set_f_banned.set(item.is_banned);
        set_form_open.set(true);
    };

    let on_submit = {
        let mgr = mgr.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let checks = validate::require(&f_username.get(), "Username")
                .and_then(|_| validate::email(&f_email.get()));
            if let Err(msg) = checks {
                toasts.error(msg);
                return;
            }
            let full_name = f_full_name.get().trim().to_string();
            let payload = UserPayload {
                username: f_username.get().trim().to_string(),
                email: f_email.get().trim().to_string(),
                full_name: if full_name.is_empty() {
                    None
                } else {
                    Some(full_name)
                },
                role: f_role.get(),
                is_banned: f_banned.get(),
            };
            let close = move || set_form_open.set(false);
            match editing_id.get() {
                Some(id) => mgr.update(id, payload, close),
                None => mgr.create(payload, close),
            }
        }
    };

    // ---- password reset ----

    let (reset_target, set_reset_target) = signal(Option::<User>::None);
    let (f_new_password, set_f_new_password) = signal(String::new());
    let reset_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = reset_ref.get() {
            if reset_target.get().is_some() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_reset_submit = {
        let api = Arc::clone(&api);
        let handle_error = Arc::clone(&handle_error);
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(target) = reset_target.get() else {
                return;
            };
            let new_password = f_new_password.get();
            if let Err(msg) = validate::password(&new_password) {
                toasts.error(msg);
                return;
            }
            let api = Arc::clone(&api);
            let handle_error = Arc::clone(&handle_error);
            spawn_local(async move {
                match api
                    .reset_user_password(&target.user_id, &ResetPassword { new_password })
                    .await
                {
                    Ok(()) => {
                        toasts.success(format!("Password reset for {}.", target.username));
                        set_reset_target.set(None);
                        set_f_new_password.set(String::new());
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
                .map(|p| format!("Delete user \"{}\"? This cannot be undone.", p.label))
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
        move |item: &User| {
            mgr.request_delete(item.user_id.clone(), item.username.clone());
        }
    };

    view! {
        <div class="space-y-4">
            <div class="flex flex-wrap items-center gap-3">
                <input
                    type="text"
                    placeholder="Search users..."
                    class="input input-bordered w-64"
                    prop:value=search
                    on:input=on_search_input
                />
                <select
                    class="select select-bordered"
                    on:change=move |ev| set_role_filter.set(event_target_value(&ev))
                >
                    <option value="" selected=move || role_filter.get().is_empty()>
                        "All roles"
                    </option>
                    {ROLES
                        .iter()
                        .map(|r| {
                            let wire = r.wire_name();
                            view! {
                                <option value=wire selected=move || role_filter.get() == wire>
                                    {r.label()}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <button class="btn btn-primary ml-auto" on:click=open_create>
                    "New User"
                </button>
            </div>

            <Show when=move || loading.get()>
                <span class="loading loading-spinner text-primary"></span>
            </Show>

            <Show when=move || fetched_once.get() && items.get().is_empty() && !loading.get()>
                <p class="text-base-content/60">"No users found."</p>
            </Show>

            <div class="overflow-x-auto">
                <table class="table">
                    <thead>
                        <tr>
                            <th>"User"</th>
                            <th>"Email"</th>
                            <th>"Role"</th>
                            <th>"Status"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || items.get()
                            key=|item: &User| item.user_id.clone()
                            children={
                                let open_edit = open_edit.clone();
                                let request_delete = request_delete.clone();
                                move |item: User| {
                                    let edit_item = item.clone();
                                    let delete_item = item.clone();
                                    let reset_item = item.clone();
                                    let open_edit = open_edit.clone();
                                    let request_delete = request_delete.clone();
                                    view! {
                                        <tr>
                                            <td>
                                                <div class="font-medium">{item.username.clone()}</div>
                                                <div class="text-sm text-base-content/60">
                                                    {item.full_name.clone().unwrap_or_default()}
                                                </div>
                                            </td>
                                            <td>{item.email.clone()}</td>
                                            <td>
                                                <span class="badge badge-outline">{item.role.label()}</span>
                                            </td>
                                            <td>
                                                {if item.is_banned {
                                                    view! { <span class="badge badge-error">"Banned"</span> }
                                                        .into_any()
                                                } else {
                                                    view! { <span class="badge badge-success">"Active"</span> }
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
                                                    class="btn btn-ghost btn-sm"
                                                    on:click=move |_| {
                                                        set_f_new_password.set(String::new());
                                                        set_reset_target.set(Some(reset_item.clone()));
                                                    }
                                                >
                                                    "Reset Password"
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
                    {move || if editing_id.get().is_some() { "Edit User" } else { "New User" }}
                </h3>
                <form class="space-y-4 mt-4" on:submit=on_submit>
                    <div class="grid grid-cols-2 gap-4">
                        <div class="form-control">
                            <label class="label" for="user-username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="user-username"
                                type="text"
                                class="input input-bordered"
                                prop:value=f_username
                                on:input=move |ev| set_f_username.set(event_target_value(&ev))
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="user-email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="user-email"
                                type="email"
                                class="input input-bordered"
                                prop:value=f_email
                                on:input=move |ev| set_f_email.set(event_target_value(&ev))
                                required
                            />
                        </div>
                    </div>
                    <div class="form-control">
                        <label class="label" for="user-full-name">
                            <span class="label-text">"Full name (optional)"</span>
                        </label>
                        <input
                            id="user-full-name"
                            type="text"
                            class="input input-bordered"
                            prop:value=f_full_name
                            on:input=move |ev| set_f_full_name.set(event_target_value(&ev))
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="user-role">
                            <span class="label-text">"Role"</span>
                        </label>
                        <select
                            id="user-role"
                            class="select select-bordered"
                            on:change=move |ev| {
                                set_f_role
                                    .set(
                                        Role::from_wire(&event_target_value(&ev))
                                            .unwrap_or(Role::User),
                                    )
                            }
                        >
                            {ROLES
                                .iter()
                                .map(|r| {
                                    let role = *r;
                                    view! {
                                        <option
                                            value=role.wire_name()
                                            selected=move || f_role.get() == role
                                        >
                                            {role.label()}
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
                            prop:checked=f_banned
                            on:change=move |ev| set_f_banned.set(event_target_checked(&ev))
                        />
                        <span class="label-text">"Banned"</span>
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

        <dialog class="modal" node_ref=reset_ref on:close=move |_| set_reset_target.set(None)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">
                    {move || {
                        reset_target
                            .get()
                            .map(|u| format!("Reset password for {}", u.username))
                            .unwrap_or_default()
                    }}
                </h3>
                <form class="space-y-4 mt-4" on:submit=on_reset_submit>
                    <div class="form-control">
                        <label class="label" for="user-new-password">
                            <span class="label-text">"New password"</span>
                        </label>
                        <input
                            id="user-new-password"
                            type="password"
                            class="input input-bordered"
                            prop:value=f_new_password
                            on:input=move |ev| set_f_new_password.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div class="modal-action">
                        <button
                            type="button"
                            class="btn"
                            on:click=move |_| set_reset_target.set(None)
                        >
                            "Cancel"
                        </button>
                        <button type="submit" class="btn btn-primary">
                            "Reset"
                        </button>
                    </div>
                </form>
            </div>
        </dialog>

        <ConfirmDialog
            title=Signal::derive(|| "Delete User".to_string())
            message=confirm_message
            visible=confirm_visible
            on_confirm=on_confirm
            on_cancel=on_cancel
        />
    }
}
