//! 項目カード一覧

use leptos::prelude::*;
use segment_board_common::{ItemRow, SendOutcome};

#[component]
pub fn ItemList(
    rows: Signal<Vec<ItemRow>>,
    on_send: Callback<usize>,
    on_reattach: Callback<(usize, web_sys::File)>,
) -> impl IntoView {
    view! {
        <Show
            when=move || !rows.get().is_empty()
            fallback=|| view! { <p class="text-muted">"No items yet"</p> }
        >
            <div class="item-grid">
                {move || {
                    rows.get()
                        .into_iter()
                        .map(|row| view! { <ItemCard row=row on_send=on_send on_reattach=on_reattach /> })
                        .collect_view()
                }}
            </div>
        </Show>
    }
}

#[component]
fn ItemCard(
    row: ItemRow,
    on_send: Callback<usize>,
    on_reattach: Callback<(usize, web_sys::File)>,
) -> impl IntoView {
    let index = row.index;
    let is_video = row.media.is_video();
    let sending = row.sending;

    let preview = match row.media_url.clone() {
        Some(url) if is_video => view! { <video class="preview" src=url controls=true></video> }.into_any(),
        Some(url) => view! { <img class="preview" src=url alt=row.title.clone() /> }.into_any(),
        None => view! {
            <label class="preview missing">
                <span>{format!("{} を再選択", row.media.name)}</span>
                <input
                    type="file"
                    on:change=move |ev| {
                        let input = event_target::<web_sys::HtmlInputElement>(&ev);
                        if let Some(file) = input.files().and_then(|files| files.get(0)) {
                            on_reattach.run((index, file));
                        }
                    }
                />
            </label>
        }
        .into_any(),
    };

    let outcome = row.response.clone().map(|outcome| {
        let class = outcome_class(&outcome);
        view! { <p class=class>{outcome.message().to_string()}</p> }
    });

    view! {
        <div class="item-card">
            {preview}
            <h3>{row.title.clone()}</h3>
            <p class="media-meta">{format!("{} ({}, {} bytes)", row.media.name, row.media.mime_type, row.media.size)}</p>
            {(!row.description.is_empty()).then(|| view! { <p class="description">{row.description.clone()}</p> })}
            <button
                class="btn btn-primary"
                disabled=sending
                on:click=move |_| on_send.run(index)
            >
                {if sending { "Sending..." } else { "Send" }}
            </button>
            {outcome}
        </div>
    }
}

fn outcome_class(outcome: &SendOutcome) -> &'static str {
    match outcome {
        SendOutcome::Success(_) => "outcome success",
        SendOutcome::Error(_) => "outcome error",
    }
}
