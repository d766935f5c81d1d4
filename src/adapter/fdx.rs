//! Final Draft (.fdx) 读取

use log::debug;
use crate::adapter::xml_tree::{self, XmlNode};
use crate::error::{ConvertError, ConvertResult};
use crate::models::{Block, Conf, ElementType, Script, ScriptElement, Style, StyleSet, TextElement};
use crate::utils::patterns::AUTHOR_MARKER_REGEX;

/// `Paragraph@Type` 到元素类型，未知类型按 action
fn element_type(name: Option<&str>) -> Option<ElementType> {
    match name? {
        "Action" | "General" => Some(ElementType::Action),
        "Character" => Some(ElementType::Character),
        "Dialogue" => Some(ElementType::Dialogue),
        "Parenthetical" => Some(ElementType::Parenthetical),
        "Scene Heading" => Some(ElementType::SceneHeading),
        "Transition" => Some(ElementType::Transition),
        _ => None,
    }
}

/// "Bold+Underline+AllCaps" 之类的样式串，只保留可识别的三种
fn parse_styles(value: Option<&str>) -> Vec<Style> {
    value.map(|s| s.split('+').filter_map(Style::from_name).collect())
        .unwrap_or_default()
}

fn parse_block(paragraph: &XmlNode) -> Block {
    let kind = element_type(paragraph.attr("Type")).unwrap_or(ElementType::Action);
    let mut text_elements: Vec<TextElement> = paragraph
        .descendants_named("Text")
        .into_iter()
        .map(|node| {
            let mut text = node.text_content();
            if kind.is_upper_cased() {
                text = text.to_uppercase();
            }
            let styles: StyleSet = parse_styles(node.attr("Style")).into_iter().collect();
            TextElement::new(text, styles)
        })
        .collect();
    if text_elements.is_empty() {
        text_elements.push(TextElement::plain(""));
    }
    let mut block = Block::new(kind, text_elements);
    block.centered = kind == ElementType::Action && paragraph.attr("Alignment") == Some("Center");
    block
}

/// 双对白段落：第二个角色名之前的都归左栏
fn parse_dual_dialogue(dual: &XmlNode) -> ScriptElement {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut characters = 0;
    for paragraph in dual.children_named("Paragraph") {
        let block = parse_block(paragraph);
        if block.is(ElementType::Character) {
            characters += 1;
        }
        if characters < 2 {
            left.push(block);
        } else {
            right.push(block);
        }
    }
    ScriptElement::DualDialogue { left, right }
}

fn parse_paragraph(paragraph: &XmlNode) -> ScriptElement {
    match paragraph.first("DualDialogue") {
        Some(dual) => parse_dual_dialogue(dual),
        None => parse_block(paragraph).into(),
    }
}

/// 标题页：第一段是标题，"written by" 之后的一段是作者
fn apply_title_page(title_page: &XmlNode, script: &mut Script) {
    let blocks: Vec<String> = title_page
        .descendants_named("Paragraph")
        .into_iter()
        .map(|p| {
            p.descendants_named("Text")
                .into_iter()
                .map(XmlNode::text_content)
                .collect::<String>()
        })
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    if let Some(title) = blocks.first() {
        script.set_title_value("title", title.as_str());
    }
    let mut is_author = false;
    for text in &blocks {
        if is_author {
            script.set_title_value("author", text.as_str());
            is_author = false;
        } else if AUTHOR_MARKER_REGEX.is_match(text) {
            is_author = true;
        }
    }
}

/// 读取 FDX 文档
pub fn parse(xml: &str, title: &str, conf: &Conf) -> ConvertResult<Script> {
    let root = xml_tree::parse(xml)?;
    let mut script = Script::new(title, &conf.default_author);

    if let Some(title_page) = root.child("TitlePage") {
        apply_title_page(title_page, &mut script);
    }

    let content = root
        .child("Content")
        .ok_or_else(|| ConvertError::MalformedContainer("FDX 缺少 Content 元素".to_string()))?;
    script.elements = content
        .children_named("Paragraph")
        .map(parse_paragraph)
        .collect();

    for setting in root.descendants_named("ElementSettings") {
        // General 只在正文里按 action 处理，不覆盖 action 的默认样式
        if setting.attr("Type") == Some("General") {
            continue;
        }
        let Some(kind) = element_type(setting.attr("Type")) else {
            continue;
        };
        let styles = parse_styles(setting.first("FontSpec").and_then(|f| f.attr("Style")));
        if !styles.is_empty() {
            script.styles.insert(kind, styles);
        }
    }

    debug!(
        "FDX 解析完成: {} 个顶层元素, {} 个类型样式",
        script.elements.len(),
        script.styles.len()
    );
    Ok(script)
}
