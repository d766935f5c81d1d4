use log::{debug, warn};
use crate::models::{Block, Conf, ElementType, PdfConf, Script, Style, StyleSet, TextElement};
use crate::parser::element_builder::ElementBuilder;
use crate::parser::text_processor::drop_empty_runs;
use crate::pdf::classifier::{Classifier, LineContext, LineFeatures, ReferenceMargins};
use crate::pdf::content::{GlyphFragment, PdfDocument, PdfPage, StrokeSegment};
use crate::pdf::liner::{Liner, PdfLine};
use crate::utils::patterns::{
    strip_leading_scene_number,
    strip_trailing_scene_number,
    AUTHOR_MARKER_REGEX,
};
use unicode_segmentation::UnicodeSegmentation;

/// 上一个元素在输出中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Top,
    Left,
    Right,
}

/// 跨行、跨页传递的分类状态
#[derive(Debug, Default)]
struct LayoutState {
    output: ElementBuilder,
    previous_y: Option<f64>,
    previous: Option<(ElementType, Slot)>,
    within_dual_dialogue: bool,
    last_character_y: Option<f64>,
}

impl LayoutState {
    fn previous_block_mut(&mut self) -> Option<&mut Block> {
        match self.previous?.1 {
            Slot::Top => self.output.last_block_mut(),
            Slot::Left => self.output.last_left_mut(),
            Slot::Right => self.output.last_right_mut(),
        }
    }

    /// 上一行改为对白，再把输出退回到上一个角色名，作为双对白左栏
    fn start_dual_dialogue(&mut self) -> bool {
        if let Some(block) = self.previous_block_mut() {
            block.kind = ElementType::Dialogue;
        }
        match self.output.pop_through_last_character() {
            Some(left) => {
                self.output.push_dual(left, Vec::new());
                self.previous = Some((ElementType::Dialogue, Slot::Left));
                true
            }
            None => {
                warn!("PDF 双对白右栏前面没有角色名，按普通元素处理");
                false
            }
        }
    }

    fn emit(&mut self, block: Block) {
        let kind = block.kind;
        let slot = if self.within_dual_dialogue {
            match self.output.push_right(block) {
                Ok(()) => Slot::Right,
                Err(block) => {
                    self.output.push(block);
                    Slot::Top
                }
            }
        } else {
            self.output.push(block);
            Slot::Top
        };
        self.previous = Some((kind, slot));
    }

    /// 折行：把本行接到上一个元素后面，中间补一个空格
    fn append_to_previous(&mut self, text_elements: Vec<TextElement>) -> Result<(), Vec<TextElement>> {
        let Some(block) = self.previous_block_mut() else {
            return Err(text_elements);
        };
        if let Some(last) = block.text_elements.last_mut() {
            last.text.push(' ');
        }
        for run in text_elements {
            match block.text_elements.last_mut() {
                Some(last) if last.styles == run.styles => last.text.push_str(&run.text),
                _ => block.text_elements.push(run),
            }
        }
        Ok(())
    }
}

/// PDF 版面解析器
#[derive(Debug, Clone)]
pub struct PdfParser {
    default_author: String,
    conf: PdfConf,
}

impl PdfParser {
    pub fn new(conf: &Conf) -> Self {
        PdfParser {
            default_author: conf.default_author.clone(),
            conf: conf.pdf.clone(),
        }
    }

    /// 解析提取好的 PDF 版面
    ///
    /// 没有任何文本时返回空文档；行首 x 坐标不足三种时全部按 action 处理。
    pub fn parse(&self, document: &PdfDocument, title: &str) -> Script {
        let mut script = Script::new(title, &self.default_author);
        if document.fragment_count() == 0 {
            debug!("PDF 没有可提取的文本，返回空文档");
            return script;
        }

        let (width, height) = document.page_size();
        let liner = Liner::new(&self.conf, width, height);
        let mut pages: Vec<(&PdfPage, Vec<PdfLine>)> = document
            .pages
            .iter()
            .map(|page| (page, liner.lines(page)))
            .collect();

        if self.is_title_page(&pages) {
            let (_, lines) = pages.remove(0);
            apply_title_page(&lines, &mut script);
        }

        let offsets = pages
            .iter()
            .flat_map(|(_, lines)| lines.iter().map(PdfLine::x));
        let margins = ReferenceMargins::from_offsets(offsets);
        match margins {
            Some(m) => debug!(
                "PDF 参考边距: action={} dialogue={} character={}",
                m.action, m.dialogue, m.character
            ),
            None => warn!("PDF 行首位置不足三种，无法判断版面，全部按 action 处理"),
        }
        let classifier = margins.map(|m| Classifier::new(&self.conf, m));

        let mut state = LayoutState::default();
        for (page, lines) in &pages {
            let mut is_new_page = true;
            for line in lines {
                self.classify_line(line, page, document, classifier.as_ref(), is_new_page, &mut state);
                is_new_page = false;
            }
        }

        script.elements = state.output.finish();
        debug!(
            "PDF 解析完成: {} 页, {} 个顶层元素",
            document.pages.len(),
            script.elements.len()
        );
        script
    }

    /// 行数少于阈值的第一页视为标题页，单页文档同样适用；阈值为 0 时不识别标题页
    fn is_title_page(&self, pages: &[(&PdfPage, Vec<PdfLine>)]) -> bool {
        pages
            .first()
            .is_some_and(|(_, lines)| !lines.is_empty() && lines.len() < self.conf.title_page_threshold)
    }

    fn classify_line(
        &self,
        line: &PdfLine,
        page: &PdfPage,
        document: &PdfDocument,
        classifier: Option<&Classifier<'_>>,
        is_new_page: bool,
        state: &mut LayoutState,
    ) {
        let text = line.text();
        let features = LineFeatures {
            x: line.x(),
            y: line.y(),
            height: line.height(),
            text: &text,
        };

        let kind = match classifier {
            Some(classifier) => {
                let ctx = LineContext {
                    is_new_page,
                    previous_y: state.previous_y,
                    previous_kind: state.previous.map(|(kind, _)| kind),
                    within_dual_dialogue: state.within_dual_dialogue,
                    last_character_y: state.last_character_y,
                    dual_partner_available: state.output.has_character_since_dual(),
                };
                let (kind, scoring) = classifier.classify(&features, &ctx);
                state.within_dual_dialogue = scoring.within_dual_dialogue;
                if scoring.starts_dual_dialogue && !state.start_dual_dialogue() {
                    state.within_dual_dialogue = false;
                }
                kind
            }
            None => ElementType::Action,
        };
        if kind == ElementType::Character {
            state.last_character_y = Some(features.y);
        }

        let mut text_elements = self.styled_runs(line, page, document);
        if kind == ElementType::SceneHeading {
            strip_scene_numbers(&mut text_elements);
        }

        let e = self.conf.position_error_margin;
        let wrapped = !is_new_page
            && state.previous.is_some_and(|(previous, _)| previous == kind)
            && state
                .previous_y
                .is_some_and(|prev_y| prev_y - features.y < features.height + e);
        if wrapped {
            if let Err(text_elements) = state.append_to_previous(text_elements) {
                state.emit(Block::new(kind, text_elements));
            }
        } else {
            state.emit(Block::new(kind, text_elements));
        }
        state.previous_y = Some(features.y);
    }

    /// 由字体名得到粗体/斜体，由描边路径得到下划线
    fn styled_runs(&self, line: &PdfLine, page: &PdfPage, document: &PdfDocument) -> Vec<TextElement> {
        let mut runs: Vec<TextElement> = Vec::new();
        for fragment in &line.fragments {
            let styles = font_styles(document.font_name(&fragment.font));
            let underlines: Vec<&StrokeSegment> = page
                .strokes
                .iter()
                .filter(|stroke| self.underlines(stroke, fragment))
                .collect();

            if underlines.is_empty() {
                runs.push(TextElement::new(fragment.text.clone(), styles));
                continue;
            }

            let graphemes: Vec<&str> = fragment.text.graphemes(true).collect();
            let mut flags = vec![false; graphemes.len()];
            for stroke in underlines {
                let (start, end) = self.underline_span(stroke, fragment, graphemes.len());
                for flag in &mut flags[start..end] {
                    *flag = true;
                }
            }
            for (grapheme, underlined) in graphemes.into_iter().zip(flags) {
                let run_styles = if underlined {
                    styles.with(Style::Underline)
                } else {
                    styles
                };
                match runs.last_mut() {
                    Some(last) if last.styles == run_styles => last.text.push_str(grapheme),
                    _ => runs.push(TextElement::new(grapheme, run_styles)),
                }
            }
        }
        if runs.is_empty() {
            runs.push(TextElement::plain(""));
        }
        runs
    }

    /// 描边在基线下方且距离不超过容差
    fn underlines(&self, stroke: &StrokeSegment, fragment: &GlyphFragment) -> bool {
        let delta = stroke.y0 - fragment.y;
        delta < 0.0 && delta.abs() < self.conf.position_error_margin
    }

    /// 按假定字符宽度把描边换算成字素区间 [start, end)
    fn underline_span(&self, stroke: &StrokeSegment, fragment: &GlyphFragment, len: usize) -> (usize, usize) {
        let width = self.conf.character_width;
        let offset = ((stroke.left() - fragment.x) / width).round();
        let count = (stroke.width() / width).round();
        let start = offset.max(0.0).min(len as f64) as usize;
        let end = (offset + count).max(0.0).min(len as f64) as usize;
        (start, end.max(start))
    }
}

impl Default for PdfParser {
    fn default() -> Self {
        Self::new(&Conf::default())
    }
}

fn font_styles(font_name: &str) -> StyleSet {
    let name = font_name.to_lowercase();
    let mut styles = StyleSet::new();
    if name.contains("italic") || name.contains("oblique") {
        styles.insert(Style::Italic);
    }
    if name.contains("bold") {
        styles.insert(Style::Bold);
    }
    styles
}

/// 标题取第一行；"written by" 之类标记行的下一行是作者
fn apply_title_page(lines: &[PdfLine], script: &mut Script) {
    let texts: Vec<String> = lines.iter().map(|l| l.text().trim().to_string()).collect();
    if let Some(title) = texts.first() {
        script.set_title_value("title", title.as_str());
    }
    let mut is_author = false;
    for text in &texts {
        if is_author {
            script.set_title_value("author", text.as_str());
            is_author = false;
            continue;
        }
        if AUTHOR_MARKER_REGEX.is_match(text) {
            is_author = true;
        }
    }
    debug!("PDF 标题页: {:?}", script.title_page);
}

/// 去掉场景标题首尾的场景编号；整行都是数字时保持原样
fn strip_scene_numbers(text_elements: &mut Vec<TextElement>) {
    let full: String = text_elements.iter().map(|t| t.text.as_str()).collect();
    if strip_leading_scene_number(&full).is_empty() {
        return;
    }
    if let Some(first) = text_elements.first_mut() {
        first.text = strip_leading_scene_number(&first.text).to_string();
    }
    if let Some(last) = text_elements.last_mut() {
        last.text = strip_trailing_scene_number(&last.text).to_string();
    }
    drop_empty_runs(text_elements);
}
