//! 項目追加フォーム（モーダル）

use leptos::prelude::*;
use segment_board_common::ValidationErrors;

#[component]
pub fn AddItemModal(
    title: Signal<String>,
    description: Signal<String>,
    file_name: Signal<Option<String>>,
    errors: Signal<ValidationErrors>,
    accept: String,
    on_title: Callback<String>,
    on_description: Callback<String>,
    on_file: Callback<Option<web_sys::File>>,
    on_cancel: Callback<()>,
    on_submit: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="modal-backdrop">
            <form
                class="modal"
                on:submit=move |ev| {
                    ev.prevent_default();
                    on_submit.run(());
                }
            >
                <h2>"Add item"</h2>

                <label>"Title"</label>
                <input
                    type="text"
                    prop:value=move || title.get()
                    on:input=move |ev| on_title.run(event_target_value(&ev))
                />
                <Show when=move || !errors.get().title.is_empty()>
                    <p class="field-error">{move || errors.get().title}</p>
                </Show>

                <label>"File"</label>
                <input
                    type="file"
                    accept=accept
                    on:change=move |ev| {
                        let input = event_target::<web_sys::HtmlInputElement>(&ev);
                        on_file.run(input.files().and_then(|files| files.get(0)));
                    }
                />
                {move || file_name.get().map(|name| view! { <p class="text-muted">{name}</p> })}
                <Show when=move || !errors.get().media.is_empty()>
                    <p class="field-error">{move || errors.get().media}</p>
                </Show>

                <label>"Description"</label>
                <textarea
                    prop:value=move || description.get()
                    on:input=move |ev| on_description.run(event_target_value(&ev))
                ></textarea>

                <div class="modal-actions">
                    <button type="button" class="btn btn-secondary" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button type="submit" class="btn btn-primary">"Add"</button>
                </div>
            </form>
        </div>
    }
}
