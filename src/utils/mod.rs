pub mod patterns;

use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

pub use patterns::{
    is_centered,
    is_character_cue,
    is_note_comment,
    is_page_break,
    is_parenthetical,
    is_scene_heading,
    is_transition,
};

/// 文件名去掉扩展名，作为默认标题
pub fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

/// 按字素计数，用于字符宽度估算
pub fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}
