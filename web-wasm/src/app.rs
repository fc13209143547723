//! メインアプリケーションコンポーネント

use crate::api::{self, detection};
use crate::browser::{self, BrowserStorage};
use crate::components::{add_item_modal::AddItemModal, header::Header, item_list::ItemList, tabs::Tabs};
use gloo::console;
use leptos::prelude::*;
use leptos::task::spawn_local;
use segment_board_common::{
    resolve_reply, save_error, AcceptedMedia, BoardState, Category, Error, ItemStore, KeyValueStorage,
    MemoryStorage,
};

type Storage = Box<dyn KeyValueStorage>;

/// localStorage が使えなければメモリ上で動かす
fn open_storage() -> Storage {
    match BrowserStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            console::warn!(format!("{}; items will not survive a reload", e));
            Box::new(MemoryStorage::new())
        }
    }
}

fn open_board() -> BoardState<Storage> {
    let store = match ItemStore::load(open_storage()) {
        Ok(store) => store,
        Err(e) => {
            console::warn!(format!("stored board is unreadable, starting empty: {}", e));
            ItemStore::empty(open_storage())
        }
    };
    BoardState::new(store, AcceptedMedia::standard())
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let board = RwSignal::new_local(open_board());
    let endpoints = api::endpoints();

    let active = Signal::derive(move || board.with(|b| b.active_tab()));
    let counts = Signal::derive(move || board.with(|b| b.store().counts()));
    let rows = Signal::derive(move || board.with(|b| b.rows(b.active_tab())));

    let on_select = Callback::new(move |category: Category| board.update(|b| b.switch_tab(category)));
    let on_add = Callback::new(move |_| board.update(|b| b.open_modal()));

    // 送信: 開始 → fetch → 結果の記録
    let on_send = Callback::new(move |index: usize| {
        let category = board.with_untracked(|b| b.active_tab());
        let request = match board.try_update(|b| b.begin_send(category, index, &endpoints)) {
            Some(Ok(request)) => request,
            Some(Err(e)) => {
                console::warn!(format!("send not started: {}", e));
                return;
            }
            None => return,
        };

        spawn_local(async move {
            let reply = detection::post_file(&request).await;
            let (mut outcome, download) = resolve_reply(reply, &request.media.meta);
            if let Some(download) = download {
                if let Err(e) = browser::trigger_download(&download) {
                    outcome = save_error(&browser::js_error_message(&e));
                }
            }

            console::log!(format!("{}[{}]: {}", request.category, request.index, outcome.message()));
            if let Some(Err(e)) = board.try_update(|b| b.finish_send(&request, outcome)) {
                console::error!(format!("failed to record outcome: {}", e));
            }
        });
    });

    // 再読込後のファイル再選択
    let on_reattach = Callback::new(move |(index, file): (usize, web_sys::File)| {
        let category = board.with_untracked(|b| b.active_tab());
        spawn_local(async move {
            let media = match browser::read_file(file).await {
                Ok(media) => media,
                Err(e) => {
                    console::error!(e);
                    return;
                }
            };
            match board.try_update(|b| b.reattach_media(category, index, media)) {
                Some(Err(e @ Error::MediaMismatch(_))) => gloo::dialogs::alert(&e.to_string()),
                Some(Err(e)) => console::error!(e.to_string()),
                _ => {}
            }
        });
    });

    let on_title = Callback::new(move |title: String| board.update(|b| b.set_title(title)));
    let on_description = Callback::new(move |text: String| board.update(|b| b.set_description(text)));
    let on_file = Callback::new(move |file: Option<web_sys::File>| {
        let Some(file) = file else {
            browser::release_url(board.try_update(|b| b.set_media(None)).flatten());
            return;
        };
        spawn_local(async move {
            let media = match browser::read_file(file).await {
                Ok(media) => Some(media),
                Err(e) => {
                    console::error!(e);
                    None
                }
            };
            browser::release_url(board.try_update(|b| b.set_media(media)).flatten());
        });
    });
    let on_cancel = Callback::new(move |_| browser::release_url(board.try_update(|b| b.cancel_modal()).flatten()));
    let on_submit = Callback::new(move |_| match board.try_update(|b| b.submit()) {
        Some(Err(Error::Validation(errors))) => console::log!(format!("item not added: {}", errors)),
        Some(Err(e)) => gloo::dialogs::alert(&format!("item not added: {}", e)),
        _ => {}
    });

    let title = Signal::derive(move || board.with(|b| b.draft().title.clone()));
    let description = Signal::derive(move || board.with(|b| b.draft().description.clone()));
    let file_name = Signal::derive(move || board.with(|b| b.draft().media.as_ref().map(|m| m.meta.name.clone())));
    let errors = Signal::derive(move || board.with(|b| b.errors().clone()));

    view! {
        <div class="container">
            <Header on_add=on_add />
            <Tabs active=active counts=counts on_select=on_select />
            <ItemList rows=rows on_send=on_send on_reattach=on_reattach />

            <Show when=move || board.with(|b| b.is_modal_open())>
                <AddItemModal
                    title=title
                    description=description
                    file_name=file_name
                    errors=errors
                    accept=board.with_untracked(|b| b.accepted().input_accept())
                    on_title=on_title
                    on_description=on_description
                    on_file=on_file
                    on_cancel=on_cancel
                    on_submit=on_submit
                />
            </Show>
        </div>
    }
}
