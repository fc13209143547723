//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header(on_add: Callback<()>) -> impl IntoView {
    view! {
        <header class="header">
            <h1>"Segment Board"</h1>
            <button class="btn btn-primary" on:click=move |_| on_add.run(())>
                "+ Add item"
            </button>
        </header>
    }
}
