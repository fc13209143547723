//! ブラウザAPIまわり
//!
//! - localStorage を KeyValueStorage として使う
//! - ファイル読み込みとオブジェクトURL
//! - アンカー要素によるダウンロード

use segment_board_common::{Download, Error, KeyValueStorage, MediaFile, Result};
use gloo::timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Storage, Url};

const DOWNLOAD_URL_TTL_MS: u32 = 60_000;

/// localStorage
pub struct BrowserStorage {
    inner: Storage,
}

impl BrowserStorage {
    pub fn open() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| Error::Storage("window is not available".into()))?;
        let inner = window
            .local_storage()
            .map_err(|e| Error::Storage(js_error_message(&e)))?
            .ok_or_else(|| Error::Storage("localStorage is not available".into()))?;
        Ok(Self { inner })
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner
            .get_item(key)
            .map_err(|e| Error::Storage(js_error_message(&e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // 容量超過は QuotaExceededError として返る
        self.inner
            .set_item(key, value)
            .map_err(|e| Error::Storage(js_error_message(&e)))
    }
}

/// バイト列からBlobを作る
pub fn blob(bytes: &[u8], mime_type: &str) -> std::result::Result<Blob, JsValue> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::of1(&array);
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    Blob::new_with_u8_array_sequence_and_options(&parts, &options)
}

pub fn object_url(bytes: &[u8], mime_type: &str) -> std::result::Result<String, JsValue> {
    Url::create_object_url_with_blob(&blob(bytes, mime_type)?)
}

/// 不要になったプレビュー用URLを解放する
pub fn release_url(url: Option<String>) {
    let Some(url) = url else {
        return;
    };
    if let Err(e) = Url::revoke_object_url(&url) {
        gloo::console::warn!(format!("revoke failed: {}", js_error_message(&e)));
    }
}

/// 選択されたファイルを読み込み、プレビュー用URLを付ける
pub async fn read_file(file: web_sys::File) -> std::result::Result<MediaFile, String> {
    let name = file.name();
    let mime_type = file.type_();
    let file = gloo::file::File::from(file);

    let bytes = gloo::file::futures::read_as_bytes(&file)
        .await
        .map_err(|e| format!("読み込み失敗: {}", e))?;

    let media = MediaFile::new(name, mime_type.clone(), bytes);
    match object_url(&media.bytes, &mime_type) {
        Ok(url) => Ok(media.with_url(url)),
        Err(e) => {
            gloo::console::warn!(format!("preview url failed: {}", js_error_message(&e)));
            Ok(media)
        }
    }
}

/// `<a download>` を一時的に作ってダウンロードさせる
pub fn trigger_download(download: &Download) -> std::result::Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document is not available"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document body is not available"))?;

    let url = object_url(&download.bytes, &download.mime_type)?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(&download.file_name);

    body.append_child(&anchor)?;
    anchor.click();
    anchor.remove();

    // click() 直後に解放するとダウンロードが中断されるブラウザがある
    Timeout::new(DOWNLOAD_URL_TTL_MS, move || release_url(Some(url))).forget();
    Ok(())
}

/// JsValue のエラーから表示用メッセージを取り出す
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
