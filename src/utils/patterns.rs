//! 行分类用的判定函数
//!
//! 分类规则用前缀/后缀/字符集判定表达，语义与常见的 Fountain 正则一致
//! （大小写、锚定位置）。只有标题页的键值行和作者标记仍使用正则。

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// 标题页 `Key: value` 行
    pub static ref TITLE_KEY_REGEX: Regex = Regex::new(r"^(\S[^:]+):\s*(.*)$").unwrap();
    /// 标题页中作者前面的 "written by" / "screenplay by"
    pub static ref AUTHOR_MARKER_REGEX: Regex = Regex::new(r"(?i)(written|screenplay) by").unwrap();
}

const SCENE_PREFIXES: [&str; 3] = ["INT.", "EXT.", "EST."];
// I/E 形式: (I|INT) .? / (E|EXT) .? 后面至少还有一个字符，等价于 "/E" 之后至少一个字符
const SCENE_SPLIT_PREFIXES: [&str; 4] = ["INT./E", "INT/E", "I./E", "I/E"];

fn has_lowercase(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_lowercase())
}

/// 去掉行首的场景编号（数字后可跟空白，可重复）
fn skip_leading_numbers(line: &str) -> &str {
    let mut rest = line;
    while rest.starts_with(|c: char| c.is_ascii_digit()) {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_digit());
        rest = rest.trim_start();
    }
    rest
}

/// 场景标题: 可选编号 + INT./EXT./EST./I/E 前缀 + 至少一个字符，不区分大小写
pub fn is_scene_heading(line: &str) -> bool {
    let rest = skip_leading_numbers(line).to_ascii_uppercase();
    SCENE_PREFIXES
        .iter()
        .chain(SCENE_SPLIT_PREFIXES.iter())
        .any(|prefix| rest.starts_with(prefix) && rest.len() > prefix.len())
}

/// 转场: 没有小写字母且以 "TO:" 结尾
pub fn is_transition(line: &str) -> bool {
    line.ends_with("TO:") && !has_lowercase(line)
}

/// 角色名: 非空且没有小写字母，允许以 "(cont'd)" 结尾
pub fn is_character_cue(line: &str) -> bool {
    let body = line.strip_suffix("(cont'd)").unwrap_or(line);
    !body.is_empty() && !has_lowercase(body)
}

/// 居中文本: `>...<`，中间不含尖括号
pub fn is_centered(line: &str) -> bool {
    match line.strip_prefix('>').and_then(|l| l.strip_suffix('<')) {
        Some(inner) => !inner.is_empty() && !inner.contains(['<', '>']),
        None => false,
    }
}

/// 单独成行的 `[[注释]]`
pub fn is_note_comment(line: &str) -> bool {
    match line.trim().strip_prefix("[[").and_then(|l| l.strip_suffix("]]")) {
        Some(inner) => !inner.is_empty() && !inner.contains(']'),
        None => false,
    }
}

/// 分页: 三个以上 `=`，后面只允许空白
pub fn is_page_break(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed.len() >= 3 && trimmed.bytes().all(|b| b == b'=')
}

pub fn opens_boneyard(line: &str) -> bool {
    line.starts_with("/*")
}

pub fn closes_boneyard(line: &str) -> bool {
    line.trim_end().ends_with("*/")
}

pub fn is_parenthetical(line: &str) -> bool {
    line.trim_start().starts_with('(')
}

pub fn has_dual_marker(text: &str) -> bool {
    text.contains('^')
}

/// 去掉第一个 `^` 以及它两侧的空白
pub fn strip_dual_marker(text: &str) -> String {
    let Some(pos) = text.find('^') else {
        return text.to_string();
    };
    let before = text[..pos].trim_end();
    let after = text[pos + 1..].trim_start();
    format!("{}{}", before, after)
}

fn is_number_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_whitespace()
}

/// 去掉场景标题首尾的场景编号，保留中间内容；全是编号时原样返回
pub fn strip_scene_number(text: &str) -> &str {
    let core = text.trim_matches(is_number_char);
    if core.is_empty() {
        text
    } else {
        core
    }
}

pub fn strip_leading_scene_number(text: &str) -> &str {
    text.trim_start_matches(is_number_char)
}

pub fn strip_trailing_scene_number(text: &str) -> &str {
    text.trim_end_matches(is_number_char)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_heading_prefixes() {
        assert!(is_scene_heading("INT. A ROOM - DAY"));
        assert!(is_scene_heading("ext. park - night"));
        assert!(is_scene_heading("12 INT. HOUSE"));
        assert!(is_scene_heading("1 2 EST. CITY"));
        assert!(is_scene_heading("INT./EXT. CAR"));
        assert!(is_scene_heading("I/E CAR"));
        assert!(is_scene_heading("int/ext car"));
        assert!(!is_scene_heading("INT."));
        assert!(!is_scene_heading(" INT. ROOM"));
        assert!(!is_scene_heading("INTERIOR ROOM"));
        assert!(!is_scene_heading("I/E"));
    }

    #[test]
    fn transitions_and_cues() {
        assert!(is_transition("CUT TO:"));
        assert!(!is_transition("Cut to:"));
        assert!(!is_transition("CUT TO: BLACK"));
        assert!(is_character_cue("JOE"));
        assert!(is_character_cue("JOE (CONT'D)"));
        assert!(is_character_cue("JOE (cont'd)"));
        assert!(is_character_cue("顾清"));
        assert!(!is_character_cue("Joe"));
        assert!(!is_character_cue(""));
    }

    #[test]
    fn markers() {
        assert!(is_centered(">THE END<"));
        assert!(!is_centered("><"));
        assert!(!is_centered(">A>B<"));
        assert!(is_note_comment("  [[ note ]]  "));
        assert!(!is_note_comment("[[a]] b [[c]]"));
        assert!(is_page_break("===="));
        assert!(!is_page_break("== x"));
        assert!(opens_boneyard("/* hidden"));
        assert!(closes_boneyard("end */  "));
        assert_eq!(strip_dual_marker("MARY ^"), "MARY");
        assert_eq!(strip_dual_marker("MARY ^ (V.O.)"), "MARY(V.O.)");
    }

    #[test]
    fn scene_numbers() {
        assert_eq!(strip_scene_number("12 INT. HOUSE - DAY 12"), "INT. HOUSE - DAY");
        assert_eq!(strip_scene_number("INT. HOUSE - DAY"), "INT. HOUSE - DAY");
        assert_eq!(strip_scene_number("42"), "42");
    }

    #[test]
    fn title_regexes() {
        let caps = TITLE_KEY_REGEX.captures("Title: Big Fish").unwrap();
        assert_eq!(&caps[1], "Title");
        assert_eq!(&caps[2], "Big Fish");
        assert!(AUTHOR_MARKER_REGEX.is_match("Screenplay By"));
    }
}
