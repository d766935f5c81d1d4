use log::{debug, warn};
use crate::models::{Block, Conf, ElementType, Script, TextElement};
use crate::parser::element_builder::ElementBuilder;
use crate::parser::text_processor::{parse_markup, trim_line_end, trim_line_start};
use crate::utils::patterns::{
    closes_boneyard,
    has_dual_marker,
    is_centered,
    is_character_cue,
    is_note_comment,
    is_page_break,
    is_parenthetical,
    is_scene_heading,
    is_transition,
    opens_boneyard,
    strip_dual_marker,
    TITLE_KEY_REGEX,
};

/// 按换行切分后的原始行
///
/// 单个换行只是分隔符（`Empty`），连续两个以上换行表示空行（`Blank`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawLine<'a> {
    Text(&'a str),
    Empty,
    Blank,
}

impl RawLine<'_> {
    pub fn is_blank(&self) -> bool {
        matches!(self, RawLine::Blank)
    }
}

/// 把正文切成原始行序列，文本行与换行分隔交替出现
pub fn split_raw_lines(content: &str) -> Vec<RawLine<'_>> {
    fn text_or_empty(text: &str) -> RawLine<'_> {
        if text.is_empty() {
            RawLine::Empty
        } else {
            RawLine::Text(text)
        }
    }

    let mut lines = Vec::new();
    let mut rest = content;
    while let Some(pos) = rest.find('\n') {
        lines.push(text_or_empty(&rest[..pos]));
        let run = rest[pos..].bytes().take_while(|b| *b == b'\n').count();
        lines.push(if run > 1 { RawLine::Blank } else { RawLine::Empty });
        rest = &rest[pos + run..];
    }
    lines.push(text_or_empty(rest));
    lines
}

/// 统一换行符，纯空白行视为空行
fn normalize(script: &str) -> String {
    script
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(|line| if line.trim().is_empty() { "" } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

/// 逐行分类时在整篇文档内传递的状态
#[derive(Debug)]
pub struct LineState {
    pub inside_boneyard: bool,
    pub inside_dialogue_block: bool,
    pub inside_dual_dialogue_block: bool,
    pub has_blank_line_before: bool,
    output: ElementBuilder,
}

impl Default for LineState {
    fn default() -> Self {
        LineState {
            inside_boneyard: false,
            inside_dialogue_block: false,
            inside_dual_dialogue_block: false,
            has_blank_line_before: true,
            output: ElementBuilder::new(),
        }
    }
}

impl LineState {
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&mut self, block: Block) {
        self.has_blank_line_before = false;
        self.output.push(block);
    }

    /// 分类一行。`next` 是紧随其后的原始行，用于判断角色名
    pub fn classify(&mut self, line: RawLine<'_>, next: Option<RawLine<'_>>) {
        let line = match line {
            RawLine::Empty => return,
            RawLine::Blank => {
                self.inside_dialogue_block = false;
                self.inside_dual_dialogue_block = false;
                self.has_blank_line_before = true;
                return;
            }
            RawLine::Text(text) => text,
        };

        let mut text_elements = parse_markup(line);
        let first = line.chars().next();
        let second = line.chars().nth(1);

        match first {
            Some('!') => {
                trim_line_start(&mut text_elements);
                self.emit(Block::new(ElementType::Action, text_elements));
                return;
            }
            Some('@') => {
                trim_line_start(&mut text_elements);
                self.inside_dialogue_block = true;
                self.emit(Block::new(ElementType::Character, text_elements));
                return;
            }
            _ => {}
        }

        // 强制标记行优先于注释块，其余内容在注释块内被吞掉
        if !self.inside_boneyard && opens_boneyard(line) {
            self.inside_boneyard = true;
        }
        if self.inside_boneyard {
            if closes_boneyard(line) {
                self.inside_boneyard = false;
            }
            return;
        }

        if is_page_break(line) {
            self.has_blank_line_before = false;
            return;
        }
        // 大纲、注释、章节标题不输出
        if first == Some('=') || is_note_comment(line) || first == Some('#') {
            return;
        }

        if first == Some('.') && second.is_some() && second != Some('.') {
            trim_line_start(&mut text_elements);
            self.emit(Block::new(ElementType::SceneHeading, text_elements));
            return;
        }

        if self.has_blank_line_before && is_scene_heading(line) {
            self.emit(Block::new(ElementType::SceneHeading, text_elements));
            return;
        }

        if is_transition(line) {
            self.emit(Block::new(ElementType::Transition, text_elements));
            return;
        }

        if first == Some('>') && second.is_some() {
            trim_line_start(&mut text_elements);
            if line.ends_with('<') {
                trim_line_end(&mut text_elements);
                self.emit(Block::centered(ElementType::Action, text_elements));
            } else {
                self.emit(Block::new(ElementType::Transition, text_elements));
            }
            return;
        }

        let next_is_text = next.is_some_and(|n| !n.is_blank());
        if self.has_blank_line_before && is_character_cue(line) && next_is_text {
            self.classify_character(line, text_elements);
            return;
        }

        if self.inside_dialogue_block {
            let kind = if !self.has_blank_line_before && is_parenthetical(line) {
                ElementType::Parenthetical
            } else {
                ElementType::Dialogue
            };
            let block = Block::new(kind, text_elements);
            self.has_blank_line_before = false;
            if self.inside_dual_dialogue_block {
                if let Err(block) = self.output.push_right(block) {
                    self.output.push(block);
                }
            } else {
                self.output.push(block);
            }
            return;
        }

        if is_centered(line) {
            trim_line_start(&mut text_elements);
            trim_line_end(&mut text_elements);
            self.emit(Block::centered(ElementType::Action, text_elements));
            return;
        }

        self.emit(Block::new(ElementType::Action, text_elements));
    }

    fn classify_character(&mut self, line: &str, mut text_elements: Vec<TextElement>) {
        self.inside_dialogue_block = true;
        self.has_blank_line_before = false;

        if !has_dual_marker(line) {
            self.inside_dual_dialogue_block = false;
            self.output.push(Block::new(ElementType::Character, text_elements));
            return;
        }

        for text_element in &mut text_elements {
            text_element.text = strip_dual_marker(&text_element.text);
        }
        let cue = Block::new(ElementType::Character, text_elements);
        match self.output.pop_through_last_character() {
            Some(left) => {
                self.output.push_dual(left, vec![cue]);
                self.inside_dual_dialogue_block = true;
            }
            None => {
                warn!("双对白标记 `{}` 前面没有可配对的角色，按普通角色处理", line);
                self.inside_dual_dialogue_block = false;
                self.output.push(cue);
            }
        }
    }

    pub fn finish(self) -> Vec<crate::models::ScriptElement> {
        self.output.finish()
    }
}

/// 解析标题页键值块，返回是否确实是标题页
///
/// 多行值的每个续行各自去掉首尾空白后以换行连接，续行之间的相对缩进不保留。
fn parse_title_page(top_block: &str, script: &mut Script) -> bool {
    let mut is_title_page = false;
    let mut open: Option<(String, String)> = None;

    for line in top_block.split('\n').filter(|l| !l.is_empty()) {
        if let Some(caps) = TITLE_KEY_REGEX.captures(line) {
            is_title_page = true;
            if let Some((key, value)) = open.take() {
                script.set_title_value(&key, value.trim());
            }

            let mut key = caps[1].trim().to_lowercase();
            if key == "authors" {
                key = "author".to_string();
            }
            let value = caps[2].trim();
            if value.is_empty() {
                open = Some((key, String::new()));
            } else {
                script.set_title_value(&key, value);
            }
        } else if let Some((_, value)) = open.as_mut() {
            // 续行追加到最近打开的键
            value.push('\n');
            value.push_str(line.trim());
        }
    }

    if let Some((key, value)) = open {
        script.set_title_value(&key, value.trim());
    }
    is_title_page
}

/// Fountain 解析器
#[derive(Debug, Clone)]
pub struct FountainParser {
    default_author: String,
}

impl FountainParser {
    pub fn new(conf: &Conf) -> Self {
        FountainParser {
            default_author: conf.default_author.clone(),
        }
    }

    /// 解析 Fountain 文本
    ///
    /// # Arguments
    ///
    /// * `script` - Fountain 格式的剧本文本
    /// * `title` - 标题页没有给出标题时使用（通常是文件名）
    pub fn parse(&self, script: &str, title: &str) -> Script {
        let mut result = Script::new(title, &self.default_author);

        let normalized = normalize(script);
        let content = normalized.trim();

        let top_block = content.split("\n\n").next().unwrap_or("");
        let body = if parse_title_page(top_block, &mut result) {
            &content[top_block.len()..]
        } else {
            content
        };

        let lines = split_raw_lines(body);
        let mut state = LineState::new();
        for (i, line) in lines.iter().enumerate() {
            state.classify(*line, lines.get(i + 1).copied());
        }

        result.elements = state.finish();
        debug!(
            "Fountain 解析完成: {} 个顶层元素, 标题页键 {:?}",
            result.elements.len(),
            result.title_page.keys().collect::<Vec<_>>()
        );
        result
    }
}

impl Default for FountainParser {
    fn default() -> Self {
        Self::new(&Conf::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_like_separator_captures() {
        let lines = split_raw_lines("JOE\nHi\n\nMARY");
        assert_eq!(
            lines,
            vec![
                RawLine::Text("JOE"),
                RawLine::Empty,
                RawLine::Text("Hi"),
                RawLine::Blank,
                RawLine::Text("MARY"),
            ]
        );
    }

    #[test]
    fn normalizes_crlf_and_whitespace_lines() {
        assert_eq!(normalize("A\r\n  \r\nB"), "A\n\nB");
    }

    #[test]
    fn title_page_continuation_lines() {
        let mut script = Script::default();
        let found = parse_title_page(
            "Title: Big Fish\nAuthors:\n    John August\n    Daniel Wallace\nDraft date: 1/1",
            &mut script,
        );
        assert!(found);
        assert_eq!(script.title(), "Big Fish");
        assert_eq!(script.author(), "John August\nDaniel Wallace");
        assert_eq!(script.title_page.get("draft date").map(String::as_str), Some("1/1"));
    }

    #[test]
    fn continuation_indentation_is_not_kept() {
        let mut script = Script::default();
        parse_title_page("Contact:\n    Studio\n        12 Main St\n  Springfield", &mut script);
        assert_eq!(
            script.title_page.get("contact").map(String::as_str),
            Some("Studio\n12 Main St\nSpringfield"),
            "续行缩进应逐行去掉"
        );
    }

    #[test]
    fn state_starts_with_blank_line_before() {
        let state = LineState::new();
        assert!(state.has_blank_line_before);
        assert!(!state.inside_boneyard);
    }
}
