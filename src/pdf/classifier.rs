//! PDF 行类型的加权启发式评分
//!
//! 每行在五个维度（边距、内容、与上一行的间距、上一行类型、双对白）上
//! 对六种类型各给 0/1 分，再乘以权重矩阵求和，分最高者胜出；平局按
//! action < character < dialogue < parenthetical < sceneHeading < transition 取前者。

use std::collections::HashMap;
use crate::models::{ElementType, PdfConf};
use crate::utils::patterns::{is_character_cue, is_parenthetical, is_scene_heading, is_transition};

pub const MARGIN: usize = 0;
pub const CONTENT: usize = 1;
pub const GAP: usize = 2;
pub const PREVIOUS: usize = 3;
pub const DUAL: usize = 4;

const ACTION: usize = 0;
const CHARACTER: usize = 1;
const DIALOGUE: usize = 2;
const PARENTHETICAL: usize = 3;
const SCENE_HEADING: usize = 4;
const TRANSITION: usize = 5;

/// 三个参考 x 坐标，由全文最常见的三个行首 x 升序得到
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceMargins {
    pub action: f64,
    pub dialogue: f64,
    pub character: f64,
}

impl ReferenceMargins {
    /// 不足三个不同的 x 时返回 None，此时边距启发式无定义
    pub fn from_offsets(offsets: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut counts: HashMap<i64, usize> = HashMap::new();
        for x in offsets {
            *counts.entry(x.round() as i64).or_insert(0) += 1;
        }
        let mut ranked: Vec<(i64, usize)> = counts.into_iter().collect();
        // 次数降序，次数相同取较小的 x，结果与片段顺序无关
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        if ranked.len() < 3 {
            return None;
        }
        let mut top: Vec<i64> = ranked.iter().take(3).map(|(x, _)| *x).collect();
        top.sort_unstable();
        Some(ReferenceMargins {
            action: top[0] as f64,
            dialogue: top[1] as f64,
            character: top[2] as f64,
        })
    }
}

/// 待分类的一行
#[derive(Debug, Clone, Copy)]
pub struct LineFeatures<'a> {
    pub x: f64,
    pub y: f64,
    pub height: f64,
    pub text: &'a str,
}

/// 分类时从前面的行带过来的状态
#[derive(Debug, Clone, Copy, Default)]
pub struct LineContext {
    pub is_new_page: bool,
    pub previous_y: Option<f64>,
    pub previous_kind: Option<ElementType>,
    pub within_dual_dialogue: bool,
    pub last_character_y: Option<f64>,
    /// 输出中是否有可以作为左栏的角色
    pub dual_partner_available: bool,
}

/// 一行的评分结果
#[derive(Debug, Clone, PartialEq)]
pub struct Scoring {
    pub cells: [[u8; 6]; 5],
    pub has_blank_line_before: bool,
    /// 本行之后是否仍处于双对白右栏
    pub within_dual_dialogue: bool,
    /// 本行开启了一个新的双对白右栏
    pub starts_dual_dialogue: bool,
}

impl Scoring {
    pub fn weighted_sums(&self, weights: &[[f64; 6]; 5]) -> [f64; 6] {
        let mut sums = [0.0; 6];
        for (family, row) in self.cells.iter().enumerate() {
            for (kind, cell) in row.iter().enumerate() {
                sums[kind] += f64::from(*cell) * weights[family][kind];
            }
        }
        sums
    }

    pub fn winner(&self, weights: &[[f64; 6]; 5]) -> ElementType {
        let sums = self.weighted_sums(weights);
        let mut best = 0;
        for (i, sum) in sums.iter().enumerate() {
            if *sum > sums[best] {
                best = i;
            }
        }
        ElementType::from_index(best).unwrap_or(ElementType::Action)
    }
}

pub struct Classifier<'a> {
    conf: &'a PdfConf,
    margins: ReferenceMargins,
}

impl<'a> Classifier<'a> {
    pub fn new(conf: &'a PdfConf, margins: ReferenceMargins) -> Self {
        Classifier { conf, margins }
    }

    pub fn margins(&self) -> ReferenceMargins {
        self.margins
    }

    pub fn score(&self, line: &LineFeatures<'_>, ctx: &LineContext) -> Scoring {
        let e = self.conf.position_error_margin;
        let m = self.margins;
        let mut cells = [[0u8; 6]; 5];

        // 边距。action 与场景标题共用最左边距
        if (line.x - m.action).abs() < e {
            cells[MARGIN][ACTION] = 1;
            cells[MARGIN][SCENE_HEADING] = 1;
        } else if (line.x - m.dialogue).abs() < e {
            cells[MARGIN][DIALOGUE] = 1;
        } else if (line.x - m.character).abs() < e {
            cells[MARGIN][CHARACTER] = 1;
        } else if m.dialogue - e < line.x && line.x < m.character + e {
            cells[MARGIN][PARENTHETICAL] = 1;
        } else if line.x > m.character {
            cells[MARGIN][TRANSITION] = 1;
        }

        // 内容
        let scene_heading = is_scene_heading(line.text);
        cells[CONTENT][CHARACTER] = u8::from(is_character_cue(line.text));
        cells[CONTENT][PARENTHETICAL] = u8::from(is_parenthetical(line.text));
        cells[CONTENT][SCENE_HEADING] = u8::from(scene_heading);
        cells[CONTENT][ACTION] = u8::from(!scene_heading);
        cells[CONTENT][TRANSITION] = u8::from(is_transition(line.text));

        // 与上一行的间距。新页面的第一行视为前面有空行
        let previous_y = if ctx.is_new_page { None } else { ctx.previous_y };
        let has_blank_line_before = match previous_y {
            None => true,
            Some(prev_y) if prev_y - line.y < line.height + e => {
                cells[GAP][ACTION] = 1;
                cells[GAP][DIALOGUE] = 1;
                cells[GAP][PARENTHETICAL] = 1;
                false
            }
            Some(_) => {
                cells[GAP][CHARACTER] = 1;
                cells[GAP][SCENE_HEADING] = 1;
                cells[GAP][TRANSITION] = 1;
                true
            }
        };

        let within_dual = ctx.within_dual_dialogue && !has_blank_line_before;
        let mut starts_dual = false;

        if let Some(previous) = ctx.previous_kind {
            match previous {
                ElementType::Action if !has_blank_line_before => cells[PREVIOUS][ACTION] = 1,
                ElementType::Dialogue if !has_blank_line_before => cells[PREVIOUS][DIALOGUE] = 1,
                ElementType::Character | ElementType::Parenthetical => {
                    cells[PREVIOUS][DIALOGUE] = 1;
                    cells[PREVIOUS][PARENTHETICAL] = 1;
                }
                _ => {}
            }

            // 双对白：右栏从左栏角色名的高度重新开始
            if within_dual {
                cells[DUAL][DIALOGUE] = 1;
                cells[DUAL][PARENTHETICAL] = 1;
            } else if let Some(prev_y) = previous_y {
                if previous == ElementType::Action
                    && ctx.dual_partner_available
                    && line.x > m.character + e
                    && line.y > prev_y
                    && ctx.last_character_y.is_some_and(|c| (c - line.y).abs() < e)
                {
                    starts_dual = true;
                    cells[DUAL][CHARACTER] = 1;
                }
            }
        }

        Scoring {
            cells,
            has_blank_line_before,
            within_dual_dialogue: within_dual || starts_dual,
            starts_dual_dialogue: starts_dual,
        }
    }

    pub fn classify(&self, line: &LineFeatures<'_>, ctx: &LineContext) -> (ElementType, Scoring) {
        let scoring = self.score(line, ctx);
        (scoring.winner(&self.conf.weights), scoring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn margins() -> ReferenceMargins {
        ReferenceMargins {
            action: 108.0,
            dialogue: 180.0,
            character: 252.0,
        }
    }

    fn line(x: f64, y: f64, text: &str) -> LineFeatures<'_> {
        LineFeatures {
            x,
            y,
            height: 12.0,
            text,
        }
    }

    #[test]
    fn margins_are_top_three_sorted() {
        let offsets = [252.0, 108.0, 108.0, 180.0, 180.0, 180.0, 252.0, 300.0];
        let m = ReferenceMargins::from_offsets(offsets).unwrap();
        assert_eq!(m, margins());
    }

    #[test]
    fn margins_ignore_offset_order() {
        let a = [108.0, 180.0, 252.0, 108.0, 180.0, 400.0];
        let mut b = a;
        b.reverse();
        assert_eq!(
            ReferenceMargins::from_offsets(a),
            ReferenceMargins::from_offsets(b)
        );
    }

    #[test]
    fn too_few_offsets_is_degenerate() {
        assert!(ReferenceMargins::from_offsets([108.0, 180.0, 108.0]).is_none());
        assert!(ReferenceMargins::from_offsets(std::iter::empty()).is_none());
    }

    #[test]
    fn scene_heading_after_gap() {
        let conf = PdfConf::default();
        let classifier = Classifier::new(&conf, margins());
        let ctx = LineContext {
            previous_y: Some(700.0),
            previous_kind: Some(ElementType::Action),
            ..LineContext::default()
        };
        let (kind, _) = classifier.classify(&line(108.0, 676.0, "INT. HOUSE - DAY"), &ctx);
        assert_eq!(kind, ElementType::SceneHeading);
    }

    #[test]
    fn dialogue_after_character() {
        let conf = PdfConf::default();
        let classifier = Classifier::new(&conf, margins());
        let ctx = LineContext {
            previous_y: Some(600.0),
            previous_kind: Some(ElementType::Character),
            ..LineContext::default()
        };
        let (kind, _) = classifier.classify(&line(180.0, 588.0, "Where are you going?"), &ctx);
        assert_eq!(kind, ElementType::Dialogue);
        let (kind, _) = classifier.classify(&line(216.0, 588.0, "(quietly)"), &ctx);
        assert_eq!(kind, ElementType::Parenthetical);
    }

    #[test]
    fn character_cue_at_character_margin() {
        let conf = PdfConf::default();
        let classifier = Classifier::new(&conf, margins());
        let ctx = LineContext {
            previous_y: Some(600.0),
            previous_kind: Some(ElementType::Action),
            ..LineContext::default()
        };
        let (kind, scoring) = classifier.classify(&line(252.0, 576.0, "JOE"), &ctx);
        assert_eq!(kind, ElementType::Character);
        assert!(scoring.has_blank_line_before);
    }

    #[test]
    fn ties_prefer_lower_type_index() {
        let scoring = Scoring {
            cells: [[0; 6]; 5],
            has_blank_line_before: false,
            within_dual_dialogue: false,
            starts_dual_dialogue: false,
        };
        assert_eq!(scoring.winner(&PdfConf::default().weights), ElementType::Action);
    }

    #[test]
    fn detects_second_dual_dialogue_column() {
        let conf = PdfConf::default();
        let classifier = Classifier::new(&conf, margins());
        let ctx = LineContext {
            previous_y: Some(576.0),
            previous_kind: Some(ElementType::Action),
            last_character_y: Some(600.0),
            dual_partner_available: true,
            ..LineContext::default()
        };
        let (kind, scoring) = classifier.classify(&line(400.0, 600.0, "MARY"), &ctx);
        assert!(scoring.starts_dual_dialogue);
        assert!(scoring.within_dual_dialogue);
        assert_eq!(kind, ElementType::Character);
    }
}
