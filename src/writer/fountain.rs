//! Fountain 写出
//!
//! 写出的文本再用 [`FountainParser`](crate::parser::FountainParser) 读回时，元素顺序、类型、
//! 文本、样式和双对白分组保持不变。按原样写出会被识别成别的类型时加强制标记。

use crate::models::{Block, ElementType, Script, ScriptElement, Style, StyleSet, TextElement};
use crate::utils::patterns::{
    is_centered,
    is_character_cue,
    is_note_comment,
    is_page_break,
    is_scene_heading,
    is_transition,
};

/// 行首出现这些字符时会触发强制标记或被忽略
const SPECIAL_LEADING: [char; 9] = ['!', '@', '.', '>', '=', '#', '/', '[', '~'];

fn style_marker(style: Style) -> &'static str {
    match style {
        Style::Bold => "**",
        Style::Italic => "*",
        Style::Underline => "_",
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_') {
            out.push('\\');
        }
        // 元素内的换行会拆成多个元素
        out.push(if c == '\n' { ' ' } else { c });
    }
    out
}

/// 样式段转成强调标记。只在样式变化处开闭，相邻段不会产生歧义的星号串
pub fn markup(text_elements: &[TextElement]) -> String {
    let mut out = String::new();
    let mut open = StyleSet::new();
    for run in text_elements {
        if run.text.is_empty() {
            continue;
        }
        // 先闭合，再打开；闭合按打开的逆序
        for style in Style::ALL.iter().rev() {
            if open.contains(*style) && !run.styles.contains(*style) {
                out.push_str(style_marker(*style));
            }
        }
        for style in Style::ALL {
            if !open.contains(style) && run.styles.contains(style) {
                out.push_str(style_marker(style));
            }
        }
        open = run.styles;
        out.push_str(&escape(&run.text));
    }
    for style in Style::ALL.iter().rev() {
        if open.contains(*style) {
            out.push_str(style_marker(*style));
        }
    }
    out
}

fn starts_special(line: &str) -> bool {
    line.starts_with(SPECIAL_LEADING)
}

/// 行首特殊字符用反斜杠转义，解析时反斜杠会被去掉
fn protect_leading(line: String) -> String {
    if starts_special(&line) || line.starts_with('(') {
        format!("\\{}", line)
    } else {
        line
    }
}

/// 对白中形如转场的行，把结尾的冒号转义
fn protect_transition(line: String) -> String {
    if is_transition(&line) {
        format!("{}\\:", &line[..line.len() - 1])
    } else {
        line
    }
}

fn action_needs_force(line: &str) -> bool {
    starts_special(line)
        || is_page_break(line)
        || is_note_comment(line)
        || is_scene_heading(line)
        || is_transition(line)
        || is_character_cue(line)
        || is_centered(line)
}

/// 写出一个非双对白元素。`speaks_next` 表示下一行紧跟对白或括号注释
fn write_block(block: &Block, speaks_next: bool) -> String {
    let line = markup(&block.text_elements);
    match block.kind {
        ElementType::Action if block.centered => format!("> {} <", line),
        ElementType::Action => {
            if action_needs_force(&line) {
                format!("!{}", line)
            } else {
                line
            }
        }
        ElementType::SceneHeading => {
            if is_scene_heading(&line) {
                line
            } else {
                format!(".{}", line)
            }
        }
        ElementType::Character => {
            let plain = speaks_next
                && is_character_cue(&line)
                && !starts_special(&line)
                && !is_scene_heading(&line)
                && !is_transition(&line)
                && !line.contains('^');
            if plain {
                line
            } else {
                format!("@{}", line)
            }
        }
        ElementType::Dialogue => protect_transition(protect_leading(line)),
        ElementType::Parenthetical => protect_transition(line),
        ElementType::Transition => {
            if is_transition(&line) {
                line
            } else {
                format!("> {}", line)
            }
        }
    }
}

fn continues_dialogue(next: Option<&Block>) -> bool {
    next.is_some_and(|b| b.is(ElementType::Dialogue) || b.is(ElementType::Parenthetical))
}

fn write_column(blocks: &[Block], dual_marker: bool, out: &mut String) {
    let mut marked = false;
    for (i, block) in blocks.iter().enumerate() {
        let is_cue = block.is(ElementType::Character);
        if dual_marker && is_cue && !marked {
            // 右栏的角色名不能加 @，否则 ^ 不会被识别
            out.push_str(&markup(&block.text_elements));
            out.push_str(" ^");
            marked = true;
        } else {
            out.push_str(&write_block(block, continues_dialogue(blocks.get(i + 1))));
        }
        out.push('\n');
    }
}

/// 标题页键名首字母大写
fn title_key(key: &str) -> String {
    key.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_title_page(script: &Script, out: &mut String) {
    let keys = ["title", "author"]
        .into_iter()
        .filter(|key| script.title_page.contains_key(*key))
        .chain(
            script
                .title_page
                .keys()
                .map(String::as_str)
                .filter(|key| *key != "title" && *key != "author"),
        );
    for key in keys {
        let value = script.title_page.get(key).map(String::as_str).unwrap_or("");
        let lines: Vec<&str> = value.lines().filter(|l| !l.trim().is_empty()).collect();
        match lines.as_slice() {
            [single] => out.push_str(&format!("{}: {}\n", title_key(key), single.trim())),
            _ => {
                out.push_str(&format!("{}:\n", title_key(key)));
                for line in lines {
                    out.push_str(&format!("    {}\n", line.trim()));
                }
            }
        }
    }
}

/// 写出 Fountain 文本
pub fn write(script: &Script) -> String {
    let mut out = String::new();
    write_title_page(script, &mut out);

    let elements = &script.elements;
    for (i, element) in elements.iter().enumerate() {
        match element {
            ScriptElement::DualDialogue { left, right } => {
                out.push('\n');
                write_column(left, false, &mut out);
                out.push('\n');
                write_column(right, true, &mut out);
            }
            ScriptElement::Block(block) => {
                if !block.is(ElementType::Dialogue) && !block.is(ElementType::Parenthetical) {
                    out.push('\n');
                }
                let next = elements.get(i + 1).and_then(ScriptElement::as_block);
                out.push_str(&write_block(block, continues_dialogue(next)));
                out.push('\n');
            }
        }
    }
    out
}
