pub mod detection;

use segment_board_common::{Endpoints, DEFAULT_API_BASE_URL};

/// ビルド時に `SEGMENT_BOARD_API_URL` で上書きできる
pub fn endpoints() -> Endpoints {
    Endpoints::new(option_env!("SEGMENT_BOARD_API_URL").unwrap_or(DEFAULT_API_BASE_URL))
}
