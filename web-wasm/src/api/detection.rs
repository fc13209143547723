//! 検出API呼び出し（fetch + FormData）

use crate::browser::{blob, js_error_message};
use segment_board_common::{SendReply, SendRequest, UPLOAD_FIELD};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Request, RequestInit, RequestMode, Response};

/// ファイルを `file` フィールドに入れて1回だけPOSTする
pub async fn post_file(request: &SendRequest) -> SendReply {
    match try_post(request).await {
        Ok(reply) => reply,
        Err(e) => SendReply::Transport(js_error_message(&e)),
    }
}

async fn try_post(request: &SendRequest) -> Result<SendReply, JsValue> {
    let meta = &request.media.meta;
    let form = FormData::new()?;
    form.append_with_blob_and_filename(UPLOAD_FIELD, &blob(&request.media.bytes, &meta.mime_type)?, &meta.name)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&form);

    let fetch_request = Request::new_with_str_and_init(&request.url, &opts)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is not available"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&fetch_request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    if !resp.ok() {
        let body = JsFuture::from(resp.text()?).await?.as_string().unwrap_or_default();
        return Ok(SendReply::Status {
            status: resp.status(),
            body,
        });
    }

    let buffer = JsFuture::from(resp.array_buffer()?).await?;
    Ok(SendReply::Ok(js_sys::Uint8Array::new(&buffer).to_vec()))
}
