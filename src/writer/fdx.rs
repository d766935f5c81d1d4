use std::io::{Cursor, Write};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use crate::error::ConvertResult;
use crate::models::{Block, ElementType, Script, ScriptElement, StyleSet};

pub fn paragraph_type(kind: ElementType) -> &'static str {
    match kind {
        ElementType::Action => "Action",
        ElementType::Character => "Character",
        ElementType::Dialogue => "Dialogue",
        ElementType::Parenthetical => "Parenthetical",
        ElementType::SceneHeading => "Scene Heading",
        ElementType::Transition => "Transition",
    }
}

/// "Bold+Italic" 形式
fn style_attr(styles: &StyleSet) -> String {
    styles
        .iter()
        .map(|style| {
            let name = style.name();
            let mut chars = name.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("+")
}

fn write_paragraph<W: Write>(writer: &mut Writer<W>, block: &Block) -> ConvertResult<()> {
    let mut start = BytesStart::new("Paragraph");
    start.push_attribute(("Type", paragraph_type(block.kind)));
    if block.centered {
        start.push_attribute(("Alignment", "Center"));
    }
    writer.write_event(Event::Start(start))?;
    for run in &block.text_elements {
        let mut text = writer.create_element("Text");
        let style = style_attr(&run.styles);
        if !style.is_empty() {
            text = text.with_attribute(("Style", style.as_str()));
        }
        text.write_text_content(BytesText::new(&run.text))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Paragraph")))?;
    Ok(())
}

fn write_text_paragraph<W: Write>(writer: &mut Writer<W>, text: &str) -> ConvertResult<()> {
    writer
        .create_element("Paragraph")
        .with_attribute(("Alignment", "Center"))
        .write_inner_content(|w| -> std::io::Result<()> {
            w.create_element("Text").write_text_content(BytesText::new(text))?;
            Ok(())
        })?;
    Ok(())
}

/// 写出 Final Draft XML
pub fn write(script: &Script) -> ConvertResult<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;
    writer.write_event(Event::Start(BytesStart::new("FinalDraft").with_attributes([
        ("DocumentType", "Script"),
        ("Template", "No"),
        ("Version", "1"),
    ])))?;

    writer.write_event(Event::Start(BytesStart::new("Content")))?;
    for element in &script.elements {
        match element {
            ScriptElement::Block(block) => write_paragraph(&mut writer, block)?,
            ScriptElement::DualDialogue { left, right } => {
                writer.write_event(Event::Start(BytesStart::new("Paragraph")))?;
                writer.write_event(Event::Start(BytesStart::new("DualDialogue")))?;
                for block in left.iter().chain(right.iter()) {
                    write_paragraph(&mut writer, block)?;
                }
                writer.write_event(Event::End(BytesEnd::new("DualDialogue")))?;
                writer.write_event(Event::End(BytesEnd::new("Paragraph")))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new("Content")))?;

    writer.write_event(Event::Start(BytesStart::new("TitlePage")))?;
    writer.write_event(Event::Start(BytesStart::new("Content")))?;
    write_text_paragraph(&mut writer, script.title())?;
    write_text_paragraph(&mut writer, "Written by")?;
    write_text_paragraph(&mut writer, script.author())?;
    writer.write_event(Event::End(BytesEnd::new("Content")))?;
    writer.write_event(Event::End(BytesEnd::new("TitlePage")))?;

    for (kind, styles) in &script.styles {
        let set: StyleSet = styles.iter().copied().collect();
        writer
            .create_element("ElementSettings")
            .with_attribute(("Type", paragraph_type(*kind)))
            .write_inner_content(|w| -> std::io::Result<()> {
                w.create_element("FontSpec")
                    .with_attribute(("Style", style_attr(&set).as_str()))
                    .write_empty()?;
                Ok(())
            })?;
    }

    writer.write_event(Event::End(BytesEnd::new("FinalDraft")))?;
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}
