//! 一覧表示の整形

use segment_board_common::{Category, ItemRow, SendOutcome};

/// タブ1つ分の一覧テキスト
pub fn render_tab(category: Category, rows: &[ItemRow]) -> String {
    let mut lines = vec![format!("{} ({})", category.label(), rows.len())];

    if rows.is_empty() {
        lines.push("  (no items)".to_string());
    }

    for row in rows {
        lines.push(format!(
            "  [{}] {}  {} ({}, {} bytes){}",
            row.index,
            row.title,
            row.media.name,
            row.media.mime_type,
            row.media.size,
            if row.sending { " sending..." } else { "" }
        ));
        if !row.description.is_empty() {
            lines.push(format!("      {}", row.description));
        }
        match &row.response {
            Some(SendOutcome::Success(message)) => lines.push(format!("      ✔ {}", message)),
            Some(SendOutcome::Error(message)) => lines.push(format!("      ✖ {}", message)),
            None => {}
        }
    }

    lines.join("\n")
}
