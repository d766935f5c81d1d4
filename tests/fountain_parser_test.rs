use unscript_rust::models::{Block, Conf, ElementType, Script, ScriptElement, Style};
use unscript_rust::parser::fountain_parser::FountainParser;
use unscript_rust::writer::fountain;
use std::fs;
use std::path::Path;

fn parse(text: &str) -> Script {
    FountainParser::default().parse(text, "test")
}

fn block(element: &ScriptElement) -> &Block {
    element.as_block().expect("应为普通元素")
}

fn kinds(script: &Script) -> Vec<Option<ElementType>> {
    script.elements.iter().map(ScriptElement::kind).collect()
}

fn load_night_shift() -> Script {
    let script_path = Path::new("tests/test_data/night_shift.fountain");
    let text = fs::read_to_string(script_path).expect("无法读取测试文件");
    FountainParser::new(&Conf::default()).parse(&text, "night_shift")
}

#[test]
fn test_night_shift_parsing() {
    let script = load_night_shift();

    assert_eq!(script.title(), "Night Shift");
    assert_eq!(script.author(), "Lin Wei");
    assert_eq!(script.title_page.get("credit").map(String::as_str), Some("Written by"));
    assert_eq!(script.title_page.get("draft date").map(String::as_str), Some("2024-03-01"));
    assert_eq!(
        script.title_page.get("contact").map(String::as_str),
        Some("lin.wei@example.com\nShanghai")
    );

    use ElementType::*;
    assert_eq!(
        kinds(&script),
        vec![
            Some(SceneHeading),
            Some(Action),
            Some(Character),
            Some(Parenthetical),
            Some(Dialogue),
            Some(Character),
            Some(Dialogue),
            None,
            Some(Transition),
            Some(SceneHeading),
            Some(Action),
            Some(Character),
            Some(Dialogue),
            Some(Action),
            Some(Transition),
        ],
        "元素类型序列不符"
    );

    let action = block(&script.elements[1]);
    assert_eq!(action.text_elements.len(), 3);
    assert_eq!(action.text_elements[1].text, "MEI");
    assert!(action.text_elements[1].has_style(Style::Bold));

    let heading = block(&script.elements[9]);
    assert_eq!(heading.text(), "FLASHBACK - THE SAME DEPOT, YEARS AGO");
    assert_eq!(block(&script.elements[10]).text(), "BANG.");
    assert_eq!(block(&script.elements[11]).text(), "McCLANE");

    let centered = block(&script.elements[13]);
    assert!(centered.centered);
    assert_eq!(centered.text(), "THE END");
    assert_eq!(block(&script.elements[14]).text(), "FADE OUT.");

    // 双对白内部也计数
    assert_eq!(script.count(Character), 5);
}

#[test]
fn dual_dialogue_groups_both_speakers() {
    let script = parse("JOE\nHi\n\nMARY ^\nHey\n");
    assert_eq!(script.elements.len(), 1);
    match &script.elements[0] {
        ScriptElement::DualDialogue { left, right } => {
            let left: Vec<(ElementType, String)> = left.iter().map(|b| (b.kind, b.text())).collect();
            let right: Vec<(ElementType, String)> = right.iter().map(|b| (b.kind, b.text())).collect();
            assert_eq!(
                left,
                vec![
                    (ElementType::Character, "JOE".to_string()),
                    (ElementType::Dialogue, "Hi".to_string()),
                ]
            );
            assert_eq!(
                right,
                vec![
                    (ElementType::Character, "MARY".to_string()),
                    (ElementType::Dialogue, "Hey".to_string()),
                ]
            );
        }
        other => panic!("应为双对白，实际为 {:?}", other),
    }
}

#[test]
fn dual_marker_without_partner_is_plain_character() {
    let script = parse("The room is empty.\n\nMARY ^\nHello?\n");
    assert_eq!(
        kinds(&script),
        vec![
            Some(ElementType::Action),
            Some(ElementType::Character),
            Some(ElementType::Dialogue),
        ]
    );
    assert_eq!(block(&script.elements[1]).text(), "MARY");
}

#[test]
fn scene_heading_requires_blank_line_before() {
    let script = parse("Intro.\n\nINT. A ROOM - DAY\n");
    assert_eq!(script.elements[1].kind(), Some(ElementType::SceneHeading));

    let in_dialogue = parse("JOE\nINT. A ROOM - DAY\n");
    assert_eq!(
        kinds(&in_dialogue),
        vec![Some(ElementType::Character), Some(ElementType::Dialogue)]
    );

    let in_action = parse("He waits.\nINT. A ROOM - DAY\n");
    assert_eq!(
        kinds(&in_action),
        vec![Some(ElementType::Action), Some(ElementType::Action)]
    );
}

#[test]
fn boneyard_hides_everything_inside() {
    let script = parse("Before.\n\n/* hidden\nstill hidden\n*/\n\nAfter.");
    let texts: Vec<String> = script
        .elements
        .iter()
        .map(|e| block(e).text())
        .collect();
    assert_eq!(texts, vec!["Before.", "After."]);
}

#[test]
fn forced_action_inside_boneyard_is_kept() {
    let script = parse("/* x\n!forced\n*/");
    assert_eq!(script.elements.len(), 1);
    assert_eq!(block(&script.elements[0]).kind, ElementType::Action);
    assert_eq!(block(&script.elements[0]).text(), "forced");

    let script = parse("/* start\n!forced\n*/\nVisible.");
    let texts: Vec<String> = script
        .elements
        .iter()
        .map(|e| block(e).text())
        .collect();
    assert_eq!(texts, vec!["forced", "Visible."], "强制标记行不受注释块影响");
}

#[test]
fn forced_character_inside_boneyard_is_kept() {
    let script = parse("/* start\n@McCLANE\nhidden line\n*/");
    assert_eq!(kinds(&script), vec![Some(ElementType::Character)]);
    assert_eq!(block(&script.elements[0]).text(), "McCLANE");
}

#[test]
fn escaped_asterisks_stay_literal() {
    let script = parse("\\*not italic\\*");
    let action = block(&script.elements[0]);
    assert_eq!(action.text_elements.len(), 1);
    assert_eq!(action.text_elements[0].text, "*not italic*");
    assert!(action.text_elements[0].styles.is_empty());
}

#[test]
fn unterminated_style_never_applies() {
    let script = parse("**bold never closes");
    let action = block(&script.elements[0]);
    assert_eq!(action.text(), "bold never closes");
    assert!(action.text_elements.iter().all(|t| t.styles.is_empty()));
}

#[test]
fn crlf_input_keeps_blank_lines() {
    let script = parse("EXT. PARK - DAY\r\n\r\nJOE\r\nNice day.\r\n");
    assert_eq!(
        kinds(&script),
        vec![
            Some(ElementType::SceneHeading),
            Some(ElementType::Character),
            Some(ElementType::Dialogue),
        ]
    );
}

#[test]
fn character_needs_following_line() {
    // 后面是空行的全大写行是 action
    let script = parse("Intro.\n\nBANG\n\nSilence.");
    assert_eq!(script.elements[1].kind(), Some(ElementType::Action));
}

#[test]
fn default_title_and_author() {
    let script = FountainParser::default().parse("Just action.", "my_script");
    assert_eq!(script.title(), "my_script");
    assert_eq!(script.author(), "Anonymous");

    let mut conf = Conf::default();
    conf.default_author = "佚名".to_string();
    let script = FountainParser::new(&conf).parse("Just action.", "my_script");
    assert_eq!(script.author(), "佚名");
}

#[test]
fn fountain_round_trip_preserves_structure() {
    let script = load_night_shift();
    let written = fountain::write(&script);
    let reparsed = FountainParser::default().parse(&written, "night_shift");
    assert_eq!(reparsed, script, "写出再读回后应与原文档一致:\n{}", written);
}
