//! ボード全体の状態
//!
//! 画面のトップレベルが所有する状態と、イベントごとの遷移
//! （タブ切替、フォーム編集、追加、送信開始/完了）。UIなしでテストできる。

use crate::error::{Error, Result};
use crate::storage::KeyValueStorage;
use crate::store::ItemStore;
use crate::types::{Category, MediaFile, MediaMeta, SendOutcome};
use crate::validation::{validate, AcceptedMedia, FormDraft, ValidationErrors};
use crate::workflow::{Endpoints, SendRequest, NO_FILE_MESSAGE};
use std::collections::HashSet;

/// 描画用の1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub index: usize,
    pub id: u64,
    pub title: String,
    pub media: MediaMeta,
    pub media_url: Option<String>,
    pub description: String,
    pub response: Option<SendOutcome>,
    pub sending: bool,
    pub has_file: bool,
}

pub struct BoardState<S> {
    store: ItemStore<S>,
    active: Category,
    modal_open: bool,
    draft: FormDraft,
    errors: ValidationErrors,
    accepted: AcceptedMedia,
    in_flight: HashSet<u64>,
}

impl<S: KeyValueStorage> BoardState<S> {
    pub fn new(store: ItemStore<S>, accepted: AcceptedMedia) -> Self {
        Self {
            store,
            active: Category::default(),
            modal_open: false,
            draft: FormDraft::default(),
            errors: ValidationErrors::default(),
            accepted,
            in_flight: HashSet::new(),
        }
    }

    pub fn store(&self) -> &ItemStore<S> {
        &self.store
    }

    pub fn active_tab(&self) -> Category {
        self.active
    }

    pub fn switch_tab(&mut self, category: Category) {
        self.active = category;
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn open_modal(&mut self) {
        self.modal_open = true;
    }

    /// キャンセル: フォームとエラーを破棄して閉じる
    ///
    /// 破棄したファイルの表示用URLを返す（解放は呼び出し側）。
    pub fn cancel_modal(&mut self) -> Option<String> {
        let discarded = self.draft.media.take().and_then(|m| m.url);
        self.reset_form();
        self.modal_open = false;
        discarded
    }

    fn reset_form(&mut self) {
        self.draft = FormDraft::default();
        self.errors = ValidationErrors::default();
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn accepted(&self) -> &AcceptedMedia {
        &self.accepted
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    /// 置き換えられたファイルの表示用URLを返す
    pub fn set_media(&mut self, media: Option<MediaFile>) -> Option<String> {
        std::mem::replace(&mut self.draft.media, media).and_then(|m| m.url)
    }

    /// フォームを検証してアクティブなタブに追加する
    ///
    /// 検証エラーや保存失敗の場合はフォームを開いたまま保持してエラーを返す。
    pub fn submit(&mut self) -> Result<usize> {
        let errors = validate(&self.draft, &self.accepted);
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(Error::Validation(errors));
        }

        let index = self.store.add_item(self.active, self.draft.clone())?;

        self.reset_form();
        self.modal_open = false;
        Ok(index)
    }

    /// 送信を開始する
    ///
    /// ファイル本体が無い項目は "no file to send" を記録して `Error::NoFileToSend`。
    /// 同じ項目の送信中は何も記録せず `Error::SendInFlight`。
    pub fn begin_send(&mut self, category: Category, index: usize, endpoints: &Endpoints) -> Result<SendRequest> {
        let Some(item) = self.store.item(category, index) else {
            return Err(Error::NoFileToSend);
        };
        let item_id = item.id;

        if self.in_flight.contains(&item_id) {
            return Err(Error::SendInFlight { category, index });
        }

        let Some(media) = self.store.media(item_id).cloned() else {
            self.store
                .set_response(category, index, SendOutcome::Error(NO_FILE_MESSAGE.to_string()))?;
            return Err(Error::NoFileToSend);
        };

        self.in_flight.insert(item_id);
        Ok(SendRequest {
            category,
            index,
            item_id,
            url: endpoints.route(&media.meta.mime_type),
            media,
        })
    }

    /// 送信を完了し結果を項目に記録する
    pub fn finish_send(&mut self, request: &SendRequest, outcome: SendOutcome) -> Result<()> {
        self.in_flight.remove(&request.item_id);
        self.store.set_response(request.category, request.index, outcome)
    }

    pub fn is_sending(&self, category: Category, index: usize) -> bool {
        self.store
            .item(category, index)
            .is_some_and(|item| self.in_flight.contains(&item.id))
    }

    /// 再読込後にファイル本体を結び付け直す
    pub fn reattach_media(&mut self, category: Category, index: usize, file: MediaFile) -> Result<()> {
        self.store.attach_media(category, index, file)
    }

    pub fn rows(&self, category: Category) -> Vec<ItemRow> {
        self.store
            .items(category)
            .iter()
            .enumerate()
            .map(|(index, item)| ItemRow {
                index,
                id: item.id,
                title: item.title.clone(),
                media: item.media.clone(),
                media_url: item.media_url.clone(),
                description: item.description.clone(),
                response: item.response.clone(),
                sending: self.in_flight.contains(&item.id),
                has_file: self.store.media(item.id).is_some(),
            })
            .collect()
    }
}
