use std::io::{Cursor, Write};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use crate::error::ConvertResult;
use crate::models::{Block, ElementType, Script, ScriptElement};

fn basestyle(kind: ElementType) -> &'static str {
    match kind {
        ElementType::Action => "Action",
        ElementType::Character => "Character",
        ElementType::Dialogue => "Dialogue",
        ElementType::Parenthetical => "Parenthetical",
        ElementType::SceneHeading => "Scene Heading",
        ElementType::Transition => "Transition",
    }
}

fn write_para<W: Write>(writer: &mut Writer<W>, block: &Block) -> ConvertResult<()> {
    writer.write_event(Event::Start(BytesStart::new("para")))?;
    let mut style = BytesStart::new("style");
    style.push_attribute(("basestyle", basestyle(block.kind)));
    if block.centered {
        style.push_attribute(("align", "center"));
    }
    writer.write_event(Event::Empty(style))?;
    for run in &block.text_elements {
        let mut text = BytesStart::new("text");
        for s in run.styles.iter() {
            text.push_attribute((s.name(), "1"));
        }
        writer.write_event(Event::Start(text))?;
        writer.write_event(Event::Text(BytesText::new(&run.text)))?;
        writer.write_event(Event::End(BytesEnd::new("text")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("para")))?;
    Ok(())
}

fn write_title_para<W: Write>(writer: &mut Writer<W>, bookmark: &str, text: &str) -> ConvertResult<()> {
    writer
        .create_element("para")
        .with_attribute(("bookmark", bookmark))
        .write_inner_content(|w| -> std::io::Result<()> {
            w.create_element("text").write_text_content(BytesText::new(text))?;
            Ok(())
        })?;
    Ok(())
}

/// 写出 Open Screenplay Format。OSF 没有双对白，左右两栏依次展开
pub fn write(script: &Script) -> ConvertResult<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new("document").with_attributes([
        ("type", "Open Screenplay Format document"),
        ("version", "40"),
    ])))?;

    writer.write_event(Event::Start(BytesStart::new("titlepage")))?;
    write_title_para(&mut writer, "Title", script.title())?;
    write_title_para(&mut writer, "Author", script.author())?;
    writer.write_event(Event::End(BytesEnd::new("titlepage")))?;

    writer.write_event(Event::Start(BytesStart::new("paragraphs")))?;
    for element in &script.elements {
        match element {
            ScriptElement::Block(block) => write_para(&mut writer, block)?,
            ScriptElement::DualDialogue { left, right } => {
                for block in left.iter().chain(right.iter()) {
                    write_para(&mut writer, block)?;
                }
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new("paragraphs")))?;
    writer.write_event(Event::End(BytesEnd::new("document")))?;
    Ok(String::from_utf8(writer.into_inner().into_inner())?)
}
