use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use myflood_shared::Post;
use myflood_shared::protocol::PostPayload;
use myflood_shared::validate;

use crate::api::use_api;
use crate::auth::use_session;
use crate::components::confirm::ConfirmDialog;
use crate::components::toast_view::use_toasts;
use crate::guard::{Access, guard_redirect};
use crate::resource::DeleteFlow;

/// Workbench for expert organizations: publish, edit and retire their own
/// situation reports. The organization name comes from the logged-in
/// profile.
#[component]
pub fn ExpertDashboardPage() -> impl IntoView {
    let api = use_api();
    let session = use_session();
    let toasts = use_toasts();
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

    let organization = session
        .user_full_name()
        .or_else(|| session.user_email())
        .unwrap_or_default();

    let (posts, set_posts) = signal(Vec::<Post>::new());
    let (loading, set_loading) = signal(true);
    let (reload, set_reload) = signal(0u32);

    {
        let api = api.clone();
        let organization = organization.clone();
        Effect::new(move |_| {
            reload.get();
            if organization.is_empty() {
                set_loading.set(false);
                return;
            }
            set_loading.set(true);
            let api = api.clone();
            let organization = organization.clone();
            spawn_local(async move {
                match api.org_posts(&organization).await {
                    Ok(items) => set_posts.set(items),
                    Err(err) => toasts.error(err.user_message()),
                }
                set_loading.set(false);
            });
        });
    }

    // ---- create/edit form ----

    let (form_open, set_form_open) = signal(false);
    let (editing_id, set_editing_id) = signal(Option::<String>::None);
    let (f_title, set_f_title) = signal(String::new());
    let (f_description, set_f_description) = signal(String::new());
    let (f_image_url, set_f_image_url) = signal(String::new());
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
        set_f_description.set(String::new());
        set_f_image_url.set(String::new());
        set_form_open.set(true);
    };

    let open_edit = move |post: Post| {
        set_editing_id.set(Some(post.post_id));
        set_f_title.set(post.title);
        set_f_description.set(post.description);
        set_f_image_url.set(post.image_url.unwrap_or_default());
        set_form_open.set(true);
    };

    let on_submit = {
        let api = Arc::clone(&api);
        let organization = organization.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let checks = validate::require(&f_title.get(), "Title")
                .and_then(|_| validate::require(&f_description.get(), "Description"));
            if let Err(msg) = checks {
                toasts.error(msg);
                return;
            }
            let image_url = f_image_url.get().trim().to_string();
            let payload = PostPayload {
                title: f_title.get().trim().to_string(),
                description: f_description.get().trim().to_string(),
                image_url: if image_url.is_empty() {
                    None
                } else {
                    Some(image_url)
                },
                organization: organization.clone(),
            };
            let api = Arc::clone(&api);
            let editing = editing_id.get();
            spawn_local(async move {
                let result = match &editing {
                    Some(id) => api.update_post(id, &payload).await,
                    None => api.create_post(&payload).await,
                };
                match result {
                    Ok(()) => {
                        toasts.success(if editing.is_some() {
                            "Report updated."
                        } else {
                            "Report published."
                        });
                        set_form_open.set(false);
                        set_reload.update(|n| *n += 1);
                    }
                    Err(err) => toasts.error(err.user_message()),
                }
            });
        }
    };

    // ---- delete confirmation ----

    let delete_flow = RwSignal::new(DeleteFlow::default());
    let confirm_visible = Signal::derive(move || delete_flow.get().pending().is_some());
    let confirm_message = Signal::derive(move || {
        delete_flow
            .get()
            .pending()
            .map(|p| format!("Delete report \"{}\"? This cannot be undone.", p.label))
            .unwrap_or_default()
    });
    let on_confirm = {
        let api = Arc::clone(&api);
        Callback::new(move |_| {
            let Some(pending) = delete_flow.try_update(|f| f.take_confirmed()).flatten() else {
                return;
            };
            let api = Arc::clone(&api);
            spawn_local(async move {
                match api.delete_post(&pending.id).await {
                    Ok(()) => {
                        toasts.success("Report deleted.");
                        set_reload.update(|n| *n += 1);
                    }
                    Err(err) => toasts.error(err.user_message()),
                }
            });
        })
    };
    let on_cancel = Callback::new(move |_| delete_flow.update(|f| f.cancel()));

    view! {
        <div class="container mx-auto px-4 py-8 max-w-3xl space-y-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Our Reports"</h1>
                    <p class="text-base-content/70">{organization.clone()}</p>
                </div>
                <button class="btn btn-primary btn-sm" on:click=open_create>
                    "New Report"
                </button>
            </div>

            <Show when=move || loading.get()>
                <span class="loading loading-spinner loading-lg text-primary"></span>
            </Show>

            <Show when=move || !loading.get() && posts.get().is_empty()>
                <p class="text-base-content/60">"No reports published yet."</p>
            </Show>

            <For
                each=move || posts.get()
                key=|p: &Post| p.post_id.clone()
                children={
                    let open_edit = open_edit.clone();
                    move |p: Post| {
                        let edit_post = p.clone();
                        let open_edit = open_edit.clone();
                        let delete_id = p.post_id.clone();
                        let delete_label = p.title.clone();
                        view! {
                            <div class="card bg-base-100 shadow-sm">
                                <div class="card-body py-4">
                                    <div class="flex items-center justify-between">
                                        <h3 class="card-title text-base">{p.title.clone()}</h3>
                                        <span class="text-xs text-base-content/50">
                                            {p.created_at.format("%Y-%m-%d").to_string()}
                                        </span>
                                    </div>
                                    <p class="text-sm text-base-content/70">
                                        {p.description.clone()}
                                    </p>
                                    <div class="card-actions justify-end">
                                        <button
                                            class="btn btn-ghost btn-sm"
                                            on:click=move |_| open_edit(edit_post.clone())
                                        >
                                            "Edit"
                                        </button>
                                        <button
                                            class="btn btn-ghost btn-sm text-error"
                                            on:click=move |_| {
                                                delete_flow
                                                    .update(|f| {
                                                        f.request(delete_id.clone(), delete_label.clone())
                                                    })
                                            }
                                        >
                                            "Delete"
                                        </button>
                                    </div>
                                </div>
                            </div>
                        }
                    }
                }
            />
        </div>

        <dialog class="modal" node_ref=dialog_ref on:close=move |_| set_form_open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">
                    {move || {
                        if editing_id.get().is_some() { "Edit Report" } else { "New Report" }
                    }}
                </h3>
                <form class="space-y-4 mt-4" on:submit=on_submit>
                    <div class="form-control">
                        <label class="label" for="post-title">
                            <span class="label-text">"Title"</span>
                        </label>
                        <input
                            id="post-title"
                            type="text"
                            class="input input-bordered"
                            prop:value=f_title
                            on:input=move |ev| set_f_title.set(event_target_value(&ev))
                            required
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="post-description">
                            <span class="label-text">"Description"</span>
                        </label>
                        <textarea
                            id="post-description"
                            class="textarea textarea-bordered h-32"
                            prop:value=f_description
                            on:input=move |ev| set_f_description.set(event_target_value(&ev))
                            required
                        ></textarea>
                    </div>
                    <div class="form-control">
                        <label class="label" for="post-image-url">
                            <span class="label-text">"Image URL (optional)"</span>
                        </label>
                        <input
                            id="post-image-url"
                            type="url"
                            class="input input-bordered"
                            prop:value=f_image_url
                            on:input=move |ev| set_f_image_url.set(event_target_value(&ev))
                        />
                    </div>
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
            title=Signal::derive(|| "Delete Report".to_string())
            message=confirm_message
            visible=confirm_visible
            on_confirm=on_confirm
            on_cancel=on_cancel
        />
    }
}
