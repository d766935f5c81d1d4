//! HTML 写出
//!
//! 场景标题是 `h6.scene-heading`，其余元素是 `p.<类型>`，居中的加 `centered`；
//! 双对白是 `div.dual-dialogue` 下两个 `div.dual-dialogue-column`。

use std::io::{Cursor, Write};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use crate::error::ConvertResult;
use crate::models::{Block, ElementType, Script, ScriptElement, Style, TextElement};

/// 默认样式表
pub const STYLESHEET: &str = r#"
.title-page { text-align: center; margin-bottom: 4em; }
.scene-heading { font-size: 1em; margin: 2em 0 1em 0; width: 100%; }
.action { margin: 1em 0; }
.centered { text-align: center; }
.character { margin: 1em 0 0 36%; width: 76%; }
.dialogue { margin: 0 0 0 12%; width: 76%; }
.parenthetical { margin: 0 0 0 24%; width: 48%; }
.transition { margin: 1em 0 -1em 0; text-align: right; }
.dual-dialogue { display: flex; width: 100%; gap: 1em; }
.dual-dialogue-column { width: 50%; display: flex; flex-direction: column; align-items: center; }
.dual-dialogue .character { margin: 1em 0 0 0; }
.dual-dialogue .dialogue { margin: 0; width: 100%; }
.dual-dialogue .parenthetical { margin: 0 1.5em; }
"#;

fn style_tag(style: Style) -> &'static str {
    match style {
        Style::Bold => "strong",
        Style::Italic => "em",
        Style::Underline => "u",
    }
}

fn newline<W: Write>(writer: &mut Writer<W>) -> ConvertResult<()> {
    writer.write_event(Event::Text(BytesText::from_escaped("\n")))?;
    Ok(())
}

fn write_run<W: Write>(writer: &mut Writer<W>, run: &TextElement) -> ConvertResult<()> {
    let tags: Vec<&str> = run.styles.iter().map(style_tag).collect();
    for tag in &tags {
        writer.write_event(Event::Start(BytesStart::new(*tag)))?;
    }
    writer.write_event(Event::Text(BytesText::new(&run.text)))?;
    for tag in tags.iter().rev() {
        writer.write_event(Event::End(BytesEnd::new(*tag)))?;
    }
    Ok(())
}

fn write_block<W: Write>(writer: &mut Writer<W>, block: &Block) -> ConvertResult<()> {
    let tag = if block.is(ElementType::SceneHeading) { "h6" } else { "p" };
    let class = if block.centered {
        format!("{} centered", block.kind.css_class())
    } else {
        block.kind.css_class().to_string()
    };
    writer.write_event(Event::Start(BytesStart::new(tag).with_attributes([("class", class.as_str())])))?;
    for run in &block.text_elements {
        write_run(writer, run)?;
    }
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    newline(writer)
}

fn write_column<W: Write>(writer: &mut Writer<W>, blocks: &[Block]) -> ConvertResult<()> {
    writer.write_event(Event::Start(
        BytesStart::new("div").with_attributes([("class", "dual-dialogue-column")]),
    ))?;
    newline(writer)?;
    for block in blocks {
        write_block(writer, block)?;
    }
    writer.write_event(Event::End(BytesEnd::new("div")))?;
    newline(writer)
}

/// 写出正文元素
pub fn write_elements<W: Write>(writer: &mut Writer<W>, elements: &[ScriptElement]) -> ConvertResult<()> {
    for element in elements {
        match element {
            ScriptElement::Block(block) => write_block(writer, block)?,
            ScriptElement::DualDialogue { left, right } => {
                writer.write_event(Event::Start(
                    BytesStart::new("div").with_attributes([("class", "dual-dialogue")]),
                ))?;
                newline(writer)?;
                write_column(writer, left)?;
                write_column(writer, right)?;
                writer.write_event(Event::End(BytesEnd::new("div")))?;
                newline(writer)?;
            }
        }
    }
    Ok(())
}

fn write_title_page<W: Write>(writer: &mut Writer<W>, script: &Script) -> ConvertResult<()> {
    writer.write_event(Event::Start(
        BytesStart::new("div").with_attributes([("class", "title-page")]),
    ))?;
    newline(writer)?;
    writer
        .create_element("h1")
        .with_attribute(("class", "title"))
        .write_text_content(BytesText::new(script.title()))?;
    newline(writer)?;
    writer
        .create_element("p")
        .with_attribute(("class", "author"))
        .write_text_content(BytesText::new(script.author()))?;
    newline(writer)?;
    writer.write_event(Event::End(BytesEnd::new("div")))?;
    newline(writer)
}

/// 写出完整的 XHTML 文档
///
/// `stylesheet` 为 None 时内嵌默认样式表，否则链接到给定路径。
pub fn write_document(script: &Script, stylesheet: Option<&str>) -> ConvertResult<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    newline(&mut writer)?;
    writer.write_event(Event::DocType(BytesText::from_escaped("html")))?;
    newline(&mut writer)?;
    writer.write_event(Event::Start(BytesStart::new("html").with_attributes([
        ("xmlns", "http://www.w3.org/1999/xhtml"),
        ("lang", "en"),
    ])))?;
    writer.write_event(Event::Start(BytesStart::new("head")))?;
    writer.write_event(Event::Empty(BytesStart::new("meta").with_attributes([("charset", "UTF-8")])))?;
    writer
        .create_element("title")
        .write_text_content(BytesText::new(script.title()))?;
    match stylesheet {
        Some(href) => {
            writer.write_event(Event::Empty(
                BytesStart::new("link").with_attributes([("rel", "stylesheet"), ("href", href)]),
            ))?;
        }
        None => {
            writer
                .create_element("style")
                .write_text_content(BytesText::new(STYLESHEET))?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new("head")))?;
    newline(&mut writer)?;
    writer.write_event(Event::Start(BytesStart::new("body")))?;
    newline(&mut writer)?;
    write_title_page(&mut writer, script)?;
    write_elements(&mut writer, &script.elements)?;
    writer.write_event(Event::End(BytesEnd::new("body")))?;
    writer.write_event(Event::End(BytesEnd::new("html")))?;
    newline(&mut writer)?;

    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

/// 只写正文元素，不带文档外壳
pub fn write_fragment(elements: &[ScriptElement]) -> ConvertResult<String> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write_elements(&mut writer, elements)?;
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StyleSet;

    #[test]
    fn nests_style_tags_in_fixed_order() {
        let styles = StyleSet::new().with(Style::Underline).with(Style::Bold);
        let block = Block::new(
            ElementType::Action,
            vec![TextElement::plain("a "), TextElement::new("b", styles)],
        );
        let html = write_fragment(&[block.into()]).unwrap();
        assert_eq!(html, "<p class=\"action\">a <strong><u>b</u></strong></p>\n");
    }

    #[test]
    fn scene_heading_and_centered_classes() {
        let elements = vec![
            Block::plain(ElementType::SceneHeading, "INT. HOUSE - DAY").into(),
            Block::centered(ElementType::Action, vec![TextElement::plain("THE END")]).into(),
        ];
        let html = write_fragment(&elements).unwrap();
        assert!(html.contains("<h6 class=\"scene-heading\">INT. HOUSE - DAY</h6>"));
        assert!(html.contains("<p class=\"action centered\">THE END</p>"));
    }

    #[test]
    fn escapes_text() {
        let html = write_fragment(&[Block::plain(ElementType::Dialogue, "<Tom & Jerry>").into()]).unwrap();
        assert!(html.contains("&lt;Tom &amp; Jerry&gt;"));
    }
}
