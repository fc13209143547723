//! 項目ストア
//!
//! カテゴリ → 項目列のマップをメモリ上に保持し、変更のたびに
//! スナップショット全体をストレージへ書き戻す。
//! ファイル本体（バイト列）は永続化せず、項目IDをキーにメモリ上だけで保持する。

use crate::error::{Error, Result};
use crate::storage::{KeyValueStorage, STORAGE_KEY};
use crate::types::{Category, Item, MediaFile, SendOutcome};
use crate::validation::{FormDraft, ValidationErrors, FILE_REQUIRED};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// 保存形式: `{ "procesar": [...], "segmentar": [...] }`
#[derive(Debug, Default, Deserialize)]
struct Snapshot {
    #[serde(default)]
    procesar: Vec<Item>,
    #[serde(default)]
    segmentar: Vec<Item>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    procesar: &'a [Item],
    segmentar: &'a [Item],
}

pub struct ItemStore<S> {
    storage: S,
    items: BTreeMap<Category, Vec<Item>>,
    media: HashMap<u64, MediaFile>,
    next_id: u64,
}

impl<S: KeyValueStorage> ItemStore<S> {
    /// 空のストア（ストレージは読まない）
    pub fn empty(storage: S) -> Self {
        let items = Category::ALL.iter().map(|c| (*c, Vec::new())).collect();
        Self {
            storage,
            items,
            media: HashMap::new(),
            next_id: 1,
        }
    }

    /// ストレージからスナップショットを読み込む
    ///
    /// キーが無ければ両カテゴリとも空で初期化する。
    pub fn load(storage: S) -> Result<Self> {
        let raw = storage.get(STORAGE_KEY)?;
        let mut store = Self::empty(storage);

        let Some(raw) = raw else {
            return Ok(store);
        };

        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        store.items.insert(Category::Procesar, snapshot.procesar);
        store.items.insert(Category::Segmentar, snapshot.segmentar);
        store.normalize_ids();

        Ok(store)
    }

    /// IDの欠落・重複を振り直す
    fn normalize_ids(&mut self) {
        let mut seen = HashSet::new();
        let mut max_id = 0;

        for items in self.items.values_mut() {
            for item in items.iter_mut() {
                if item.id != 0 && seen.insert(item.id) {
                    max_id = max_id.max(item.id);
                } else {
                    item.id = 0;
                }
            }
        }

        self.next_id = max_id + 1;
        for items in self.items.values_mut() {
            for item in items.iter_mut().filter(|i| i.id == 0) {
                item.id = self.next_id;
                self.next_id += 1;
            }
        }
    }

    /// スナップショット全体を書き戻す
    pub fn persist(&mut self) -> Result<()> {
        let snapshot = SnapshotRef {
            procesar: self.items(Category::Procesar),
            segmentar: self.items(Category::Segmentar),
        };
        let json = serde_json::to_string(&snapshot)?;
        self.storage.set(STORAGE_KEY, &json)
    }

    /// 検証済みのフォームから項目を末尾に追加し、そのインデックスを返す
    ///
    /// 書き込みに失敗した場合は追加を取り消す。
    pub fn add_item(&mut self, category: Category, draft: FormDraft) -> Result<usize> {
        let Some(file) = draft.media else {
            return Err(Error::Validation(ValidationErrors {
                title: String::new(),
                media: FILE_REQUIRED.to_string(),
            }));
        };

        let id = self.next_id;
        self.next_id += 1;

        let item = Item {
            id,
            title: draft.title,
            media: file.meta.clone(),
            media_url: file.url.clone(),
            description: draft.description,
            response: None,
        };
        self.media.insert(id, file);

        let items = self.items.entry(category).or_default();
        items.push(item);
        let index = items.len() - 1;

        if let Err(e) = self.persist() {
            self.items.entry(category).or_default().pop();
            self.media.remove(&id);
            self.next_id = id;
            return Err(e);
        }
        Ok(index)
    }

    /// 指定項目の送信結果を更新
    pub fn set_response(&mut self, category: Category, index: usize, outcome: SendOutcome) -> Result<()> {
        let item = self.item_mut(category, index)?;
        let previous = item.response.replace(outcome);

        if let Err(e) = self.persist() {
            if let Ok(item) = self.item_mut(category, index) {
                item.response = previous;
            }
            return Err(e);
        }
        Ok(())
    }

    /// 再読込したファイル本体を既存項目に結び付ける
    ///
    /// ファイル名とMIMEタイプが元の項目と一致しない場合は拒否する。
    pub fn attach_media(&mut self, category: Category, index: usize, file: MediaFile) -> Result<()> {
        let item = self.item_mut(category, index)?;

        if item.media.name != file.meta.name || item.media.mime_type != file.meta.mime_type {
            return Err(Error::MediaMismatch(format!(
                "expected {} ({}), got {} ({})",
                item.media.name, item.media.mime_type, file.meta.name, file.meta.mime_type
            )));
        }

        let previous = (item.media.clone(), item.media_url.clone());
        item.media.size = file.meta.size;
        if file.meta.source.is_some() {
            item.media.source = file.meta.source.clone();
        }
        item.media_url = file.url.clone();
        let id = item.id;

        let replaced = self.media.insert(id, file);
        if let Err(e) = self.persist() {
            match replaced {
                Some(old) => self.media.insert(id, old),
                None => self.media.remove(&id),
            };
            if let Ok(item) = self.item_mut(category, index) {
                (item.media, item.media_url) = previous;
            }
            return Err(e);
        }
        Ok(())
    }

    fn item_mut(&mut self, category: Category, index: usize) -> Result<&mut Item> {
        self.items
            .get_mut(&category)
            .and_then(|items| items.get_mut(index))
            .ok_or(Error::ItemNotFound { category, index })
    }

    pub fn items(&self, category: Category) -> &[Item] {
        self.items.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn item(&self, category: Category, index: usize) -> Option<&Item> {
        self.items(category).get(index)
    }

    /// 項目IDに対応するファイル本体
    pub fn media(&self, id: u64) -> Option<&MediaFile> {
        self.media.get(&id)
    }

    /// カテゴリごとの件数
    pub fn counts(&self) -> Vec<(Category, usize)> {
        Category::ALL.iter().map(|c| (*c, self.items(*c).len())).collect()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
