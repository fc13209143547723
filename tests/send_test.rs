//! 送信ワークフローテスト
//!
//! axumのモックサーバを検出APIとして起動し、送信結果とダウンロードを検証

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use segment_board::client::DetectionClient;
use segment_board::error::SegmentBoardError;
use segment_board::media::load_media;
use segment_board::send::{send_item, SendOptions};
use segment_board_common::{
    AcceptedMedia, BoardState, Category, Endpoints, Error, ItemStore, MediaFile, MemoryStorage, SendOutcome,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/// 受け取った `file` フィールドの情報を本文として返す
async fn echo(kind: &'static str, mut multipart: Multipart) -> (StatusCode, Vec<u8>) {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field.bytes().await.unwrap_or_default();
        let body = format!("{}:{}:{}:{}", kind, file_name, content_type, data.len());
        return (StatusCode::OK, body.into_bytes());
    }
    (StatusCode::BAD_REQUEST, b"missing file field".to_vec())
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// 画像/動画の両エンドポイントを持つサーバ（呼び出し回数を記録）
async fn detection_server(hits: Arc<AtomicUsize>) -> String {
    let video_hits = hits.clone();
    let image_hits = hits;
    let router = Router::new()
        .route(
            "/API/Get/Video/Detection",
            post(move |multipart: Multipart| {
                let hits = video_hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    echo("video", multipart).await
                }
            }),
        )
        .route(
            "/API/Get/Image/Detection",
            post(move |multipart: Multipart| {
                let hits = image_hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    echo("image", multipart).await
                }
            }),
        );
    spawn(router).await
}

async fn overloaded_server() -> String {
    let router = Router::new().route(
        "/API/Get/Video/Detection",
        post(|mut multipart: Multipart| async move {
            while let Ok(Some(_)) = multipart.next_field().await {}
            (StatusCode::INTERNAL_SERVER_ERROR, "server overloaded")
        }),
    );
    spawn(router).await
}

fn board() -> BoardState<MemoryStorage> {
    BoardState::new(ItemStore::load(MemoryStorage::new()).unwrap(), AcceptedMedia::standard())
}

fn add(board: &mut BoardState<MemoryStorage>, title: &str, media: MediaFile) -> usize {
    board.open_modal();
    board.set_title(title);
    board.set_media(Some(media));
    board.submit().expect("add failed")
}

fn clip_a() -> MediaFile {
    MediaFile::new("a.mp4", "video/mp4", vec![0u8; 10 * 1024])
}

/// 成功時: segmented_a.mp4 がダウンロードされ成功が記録される
#[tokio::test]
async fn test_send_success_downloads_segmented_file() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = detection_server(hits.clone()).await;
    let out = tempdir().unwrap();

    let mut board = board();
    let index = add(&mut board, "Clip A", clip_a());

    let client = DetectionClient::new().unwrap();
    let outcome = send_item(
        &mut board,
        &client,
        &Endpoints::new(&base),
        Category::Procesar,
        index,
        &SendOptions::new(out.path()),
    )
    .await
    .unwrap();

    assert_eq!(outcome, SendOutcome::Success("file downloaded successfully".into()));
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let saved = std::fs::read_to_string(out.path().join("segmented_a.mp4")).unwrap();
    assert_eq!(saved, "video:a.mp4:video/mp4:10240");

    let item = board.store().item(Category::Procesar, index).unwrap();
    assert_eq!(item.response, Some(outcome));
    assert!(!board.is_sending(Category::Procesar, index));
}

/// image/jpeg は画像エンドポイントへ送られる
#[tokio::test]
async fn test_image_routes_to_image_endpoint() {
    let base = detection_server(Arc::new(AtomicUsize::new(0))).await;
    let out = tempdir().unwrap();

    let mut board = board();
    board.switch_tab(Category::Segmentar);
    let index = add(&mut board, "Foto", MediaFile::new("b.jpg", "image/jpeg", b"jpeg".to_vec()));

    let client = DetectionClient::new().unwrap();
    send_item(
        &mut board,
        &client,
        &Endpoints::new(&base),
        Category::Segmentar,
        index,
        &SendOptions::new(out.path()),
    )
    .await
    .unwrap();

    let saved = std::fs::read_to_string(out.path().join("segmented_b.jpg")).unwrap();
    assert_eq!(saved, "image:b.jpg:image/jpeg:4");
}

/// 500応答: 本文がエラーとして記録され、ダウンロードは無い
#[tokio::test]
async fn test_server_error_records_body() {
    let base = overloaded_server().await;
    let out = tempdir().unwrap();

    let mut board = board();
    let index = add(&mut board, "Clip A", clip_a());

    let client = DetectionClient::new().unwrap();
    let outcome = send_item(
        &mut board,
        &client,
        &Endpoints::new(&base),
        Category::Procesar,
        index,
        &SendOptions::new(out.path()),
    )
    .await
    .unwrap();

    assert_eq!(outcome, SendOutcome::Error("server error: server overloaded".into()));
    assert!(!out.path().join("segmented_a.mp4").exists());

    let response = board.store().item(Category::Procesar, index).unwrap().response.clone().unwrap();
    assert!(response.message().contains("server overloaded"));
}

/// 接続できない場合: 送信失敗として記録
#[tokio::test]
async fn test_transport_error() {
    let out = tempdir().unwrap();
    let mut board = board();
    let index = add(&mut board, "Clip A", clip_a());

    let client = DetectionClient::new().unwrap();
    let outcome = send_item(
        &mut board,
        &client,
        &Endpoints::new("http://127.0.0.1:1"),
        Category::Procesar,
        index,
        &SendOptions::new(out.path()),
    )
    .await
    .unwrap();

    assert!(outcome.is_error());
    assert!(outcome.message().starts_with("failed to send file: "));
}

/// ファイル本体が無い項目は通信せずに "no file to send"
#[tokio::test]
async fn test_no_file_never_calls_network() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = detection_server(hits.clone()).await;
    let out = tempdir().unwrap();

    let mut board = board();
    add(&mut board, "Clip A", clip_a());
    let storage = board.store().storage().clone();
    let mut reloaded = BoardState::new(ItemStore::load(storage).unwrap(), AcceptedMedia::standard());

    let client = DetectionClient::new().unwrap();
    let outcome = send_item(
        &mut reloaded,
        &client,
        &Endpoints::new(&base),
        Category::Procesar,
        0,
        &SendOptions::new(out.path()),
    )
    .await
    .unwrap();

    assert_eq!(outcome, SendOutcome::Error("no file to send".into()));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(
        reloaded.store().item(Category::Procesar, 0).unwrap().response,
        Some(SendOutcome::Error("no file to send".into()))
    );
}

/// 再読込後でも source のファイルから送信できる
#[tokio::test]
async fn test_rehydrates_from_source_after_reload() {
    let base = detection_server(Arc::new(AtomicUsize::new(0))).await;
    let dir = tempdir().unwrap();
    let media_path = dir.path().join("a.mp4");
    std::fs::write(&media_path, vec![3u8; 2048]).unwrap();
    let out = dir.path().join("out");

    let mut board = board();
    add(&mut board, "Clip A", load_media(&media_path, None).unwrap());
    let storage = board.store().storage().clone();
    let mut reloaded = BoardState::new(ItemStore::load(storage).unwrap(), AcceptedMedia::standard());

    let client = DetectionClient::new().unwrap();
    let outcome = send_item(
        &mut reloaded,
        &client,
        &Endpoints::new(&base),
        Category::Procesar,
        0,
        &SendOptions::new(&out),
    )
    .await
    .unwrap();

    assert!(!outcome.is_error(), "{:?}", outcome);
    let saved = std::fs::read_to_string(out.join("segmented_a.mp4")).unwrap();
    assert_eq!(saved, "video:a.mp4:video/mp4:2048");
}

/// 保存に失敗した場合はエラーとして記録
#[tokio::test]
async fn test_save_failure_records_error() {
    let base = detection_server(Arc::new(AtomicUsize::new(0))).await;
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"file").unwrap();

    let mut board = board();
    let index = add(&mut board, "Clip A", clip_a());

    let client = DetectionClient::new().unwrap();
    let outcome = send_item(
        &mut board,
        &client,
        &Endpoints::new(&base),
        Category::Procesar,
        index,
        &SendOptions::new(&blocker),
    )
    .await
    .unwrap();

    assert!(outcome.message().starts_with("failed to save file: "));
}

/// 存在しないインデックスはエラー
#[tokio::test]
async fn test_unknown_index() {
    let out = tempdir().unwrap();
    let mut board = board();

    let client = DetectionClient::new().unwrap();
    let result = send_item(
        &mut board,
        &client,
        &Endpoints::default(),
        Category::Segmentar,
        3,
        &SendOptions::new(out.path()),
    )
    .await;

    assert!(matches!(
        result,
        Err(SegmentBoardError::Board(Error::ItemNotFound { index: 3, .. }))
    ));
}
