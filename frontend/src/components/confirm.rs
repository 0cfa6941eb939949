use leptos::prelude::*;

/// Modal yes/no prompt. The caller owns the visibility signal; closing the
/// dialog by any means other than the confirm button reports a cancel.
#[component]
pub fn ConfirmDialog(
    #[prop(into)] title: Signal<String>,
    #[prop(into)] message: Signal<String>,
    #[prop(into)] visible: Signal<bool>,
    #[prop(into)] on_confirm: Callback<()>,
    #[prop(into)] on_cancel: Callback<()>,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if visible.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    view! {
        <dialog
            class="modal"
            node_ref=dialog_ref
            on:close=move |_| {
                if visible.get_untracked() {
                    on_cancel.run(());
                }
            }
        >
            <div class="modal-box">
                <h3 class="font-bold text-lg">{move || title.get()}</h3>
                <p class="py-4">{move || message.get()}</p>
                <div class="modal-action">
                    <button class="btn" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button class="btn btn-error" on:click=move |_| on_confirm.run(())>
                        "Confirm"
                    </button>
                </div>
            </div>
        </dialog>
    }
}
