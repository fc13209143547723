//! タブ切替

use leptos::prelude::*;
use segment_board_common::Category;

#[component]
pub fn Tabs(
    active: Signal<Category>,
    counts: Signal<Vec<(Category, usize)>>,
    on_select: Callback<Category>,
) -> impl IntoView {
    view! {
        <nav class="tabs">
            {Category::ALL
                .into_iter()
                .map(|category| {
                    let count = move || {
                        counts
                            .get()
                            .into_iter()
                            .find(|(c, _)| *c == category)
                            .map(|(_, n)| n)
                            .unwrap_or(0)
                    };
                    view! {
                        <button
                            class=move || {
                                if active.get() == category { "tab active" } else { "tab" }
                            }
                            on:click=move |_| on_select.run(category)
                        >
                            {category.label()}
                            " ("
                            {count}
                            ")"
                        </button>
                    }
                })
                .collect_view()}
        </nav>
    }
}
