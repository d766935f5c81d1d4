//! Open Screenplay Format 读取（Fade In 的 document.xml 也是这个格式）

use log::debug;
use crate::adapter::xml_tree::{self, XmlNode};
use crate::error::{ConvertError, ConvertResult};
use crate::models::{Block, Conf, ElementType, Script, Style, StyleSet, TextElement};
use crate::utils::patterns::AUTHOR_MARKER_REGEX;

fn element_type(basestyle: Option<&str>) -> ElementType {
    match basestyle {
        Some("Character") => ElementType::Character,
        Some("Dialogue") => ElementType::Dialogue,
        Some("Parenthetical") => ElementType::Parenthetical,
        Some("Scene Heading") => ElementType::SceneHeading,
        Some("Transition") => ElementType::Transition,
        _ => ElementType::Action,
    }
}

fn parse_para(para: &XmlNode) -> Block {
    let style = para.first("style");
    let kind = element_type(style.and_then(|s| s.attr("basestyle")));
    let mut text_elements: Vec<TextElement> = para
        .descendants_named("text")
        .into_iter()
        .map(|node| {
            let mut text = node.text_content();
            if kind.is_upper_cased() {
                text = text.to_uppercase();
            }
            // 样式以属性是否存在表示，不看属性值
            let styles: StyleSet = Style::ALL
                .into_iter()
                .filter(|s| node.has_attr(s.name()))
                .collect();
            TextElement::new(text, styles)
        })
        .collect();
    if text_elements.is_empty() {
        text_elements.push(TextElement::plain(""));
    }
    let mut block = Block::new(kind, text_elements);
    block.centered = kind == ElementType::Action && style.and_then(|s| s.attr("align")) == Some("center");
    block
}

/// 标题页：第一段是标题；bookmark 指定的段落覆盖标题/作者；
/// 标题之后的第一段默认是作者，遇到 "written by" 后下一段再次作为作者
fn apply_title_page(title_page: &XmlNode, script: &mut Script) {
    let mut is_first = true;
    let mut is_author = true;
    for para in title_page.descendants_named("para") {
        let Some(text) = para.first("text").map(XmlNode::text_content) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        if is_first {
            script.set_title_value("title", text);
            is_first = false;
            continue;
        }
        match para.attr("bookmark") {
            Some("Title") => script.set_title_value("title", text),
            Some("Author") => script.set_title_value("author", text),
            _ if is_author => {
                script.set_title_value("author", text);
                is_author = false;
            }
            _ => {
                if AUTHOR_MARKER_REGEX.is_match(&text) {
                    is_author = true;
                }
            }
        }
    }
}

/// 读取 OSF 文档
pub fn parse(xml: &str, title: &str, conf: &Conf) -> ConvertResult<Script> {
    let root = xml_tree::parse(xml)?;
    let mut script = Script::new(title, &conf.default_author);

    if let Some(title_page) = root.first("titlepage") {
        apply_title_page(title_page, &mut script);
    }

    let paragraphs = root
        .first("paragraphs")
        .ok_or_else(|| ConvertError::MalformedContainer("OSF 缺少 paragraphs 元素".to_string()))?;
    script.elements = paragraphs
        .descendants_named("para")
        .into_iter()
        .map(|para| parse_para(para).into())
        .collect();

    debug!("OSF 解析完成: {} 个元素", script.elements.len());
    Ok(script)
}
