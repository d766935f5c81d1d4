use std::io::{Cursor, Read};
use unscript_rust::adapter::{fdx, osf};
use unscript_rust::models::{Block, Conf, ElementType, Script, ScriptElement, Style, StyleSet, TextElement};
use unscript_rust::{render, OutputFormat};
use zip::{CompressionMethod, ZipArchive};

/// 各读取器都能无损表达的文档：类型名已大写，样式和居中都有
fn sample_script() -> Script {
    let bold_underline = StyleSet::new().with(Style::Bold).with(Style::Underline);
    let mut script = Script::new("Spark", "Grace Hopper").with_elements(vec![
        Block::plain(ElementType::SceneHeading, "INT. LAB - NIGHT").into(),
        Block::new(
            ElementType::Action,
            vec![
                TextElement::plain("The machine "),
                TextElement::new("hums", bold_underline),
                TextElement::plain(" & sparks <loudly>."),
            ],
        )
        .into(),
        Block::plain(ElementType::Character, "ADA").into(),
        Block::plain(ElementType::Parenthetical, "(whispering)").into(),
        Block::plain(ElementType::Dialogue, "It works.").into(),
        ScriptElement::DualDialogue {
            left: vec![
                Block::plain(ElementType::Character, "BOB"),
                Block::plain(ElementType::Dialogue, "Run!"),
            ],
            right: vec![
                Block::plain(ElementType::Character, "ADA"),
                Block::plain(ElementType::Dialogue, "Stay."),
            ],
        },
        Block::centered(ElementType::Action, vec![TextElement::plain("THE END")]).into(),
        Block::plain(ElementType::Transition, "FADE OUT.").into(),
    ]);
    script.styles.insert(ElementType::SceneHeading, vec![Style::Bold]);
    script
}

fn flattened(elements: &[ScriptElement]) -> Vec<Block> {
    elements
        .iter()
        .flat_map(|element| match element {
            ScriptElement::Block(block) => vec![block.clone()],
            ScriptElement::DualDialogue { left, right } => {
                left.iter().chain(right.iter()).cloned().collect()
            }
        })
        .collect()
}

#[test]
fn fdx_round_trip() {
    let script = sample_script();
    let bytes = render(&script, OutputFormat::Fdx).unwrap();
    let xml = String::from_utf8(bytes).unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("Style=\"Bold+Underline\""));

    let read_back = fdx::parse(&xml, "other", &Conf::default()).unwrap();
    assert_eq!(read_back.title(), "Spark");
    assert_eq!(read_back.author(), "Grace Hopper");
    assert_eq!(read_back.elements, script.elements, "FDX 写出再读回后正文应一致");
    assert_eq!(read_back.styles, script.styles);
}

#[test]
fn osf_round_trip_flattens_dual_dialogue() {
    let script = sample_script();
    let bytes = render(&script, OutputFormat::Osf).unwrap();
    let xml = String::from_utf8(bytes).unwrap();

    let read_back = osf::parse(&xml, "other", &Conf::default()).unwrap();
    assert_eq!(read_back.title(), "Spark");
    assert_eq!(read_back.author(), "Grace Hopper");
    let blocks: Vec<Block> = read_back
        .elements
        .into_iter()
        .filter_map(ScriptElement::into_block)
        .collect();
    assert_eq!(blocks, flattened(&script.elements));
}

#[test]
fn html_document_structure() {
    let html = String::from_utf8(render(&sample_script(), OutputFormat::Html).unwrap()).unwrap();
    assert!(html.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("<h1 class=\"title\">Spark</h1>"));
    assert!(html.contains("<p class=\"author\">Grace Hopper</p>"));
    assert!(html.contains("<h6 class=\"scene-heading\">INT. LAB - NIGHT</h6>"));
    assert!(html.contains("<strong><u>hums</u></strong>"));
    assert!(html.contains(" &amp; sparks &lt;loudly&gt;."));
    assert!(html.contains("<div class=\"dual-dialogue\">"));
    assert_eq!(html.matches("<div class=\"dual-dialogue-column\">").count(), 2);
    assert!(html.contains("<p class=\"action centered\">THE END</p>"));
    assert!(html.contains("<style>"), "未指定样式表时应内嵌默认样式");
}

#[test]
fn json_round_trip() {
    let script = sample_script();
    let bytes = render(&script, OutputFormat::Json).unwrap();
    let read_back: Script = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(read_back, script);

    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["titlePage"]["title"], "Spark");
}

#[test]
fn epub_is_zip_with_stored_mimetype_first() {
    let bytes = render(&sample_script(), OutputFormat::Epub).unwrap();
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

    {
        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        let mut content = String::new();
        first.read_to_string(&mut content).unwrap();
        assert_eq!(content, "application/epub+zip");
    }

    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    for expected in [
        "META-INF/container.xml",
        "OEBPS/script.xhtml",
        "OEBPS/nav.xhtml",
        "OEBPS/style.css",
        "OEBPS/script.opf",
    ] {
        assert!(names.iter().any(|n| n == expected), "EPUB 缺少 {}", expected);
    }

    let mut body = String::new();
    archive
        .by_name("OEBPS/script.xhtml")
        .unwrap()
        .read_to_string(&mut body)
        .unwrap();
    assert!(body.contains("href=\"style.css\""));
    assert!(body.contains("<h1 class=\"title\">Spark</h1>"));

    let mut opf = String::new();
    archive
        .by_name("OEBPS/script.opf")
        .unwrap()
        .read_to_string(&mut opf)
        .unwrap();
    assert!(opf.contains("<dc:creator>Grace Hopper</dc:creator>"));
}
