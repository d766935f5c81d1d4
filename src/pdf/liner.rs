use crate::models::PdfConf;
use crate::pdf::content::{GlyphFragment, PdfPage};
use crate::utils::grapheme_len;

/// 基线比较容差
const BASELINE_EPSILON: f64 = 0.5;

/// 一行文本：同一基线、同一栏的片段，字体变化处分段
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLine {
    pub fragments: Vec<GlyphFragment>,
    /// 该行首个片段在内容流中的位置，用于保持原始阅读顺序
    pub order: usize,
}

impl PdfLine {
    pub fn x(&self) -> f64 {
        self.fragments.first().map_or(0.0, |f| f.x)
    }

    pub fn y(&self) -> f64 {
        self.fragments.first().map_or(0.0, |f| f.y)
    }

    pub fn height(&self) -> f64 {
        self.fragments.first().map_or(0.0, |f| f.height)
    }

    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

/// 行处理器：裁边并把片段还原成行
pub struct Liner<'a> {
    conf: &'a PdfConf,
    page_width: f64,
    page_height: f64,
}

impl<'a> Liner<'a> {
    /// 创建新的行处理器
    pub fn new(conf: &'a PdfConf, page_width: f64, page_height: f64) -> Self {
        Self {
            conf,
            page_width,
            page_height,
        }
    }

    /// 片段是否落在页边距带以内（含容差）
    pub fn inside_margins(&self, fragment: &GlyphFragment) -> bool {
        let band = |inches: f64| inches * self.conf.dpi;
        let e = self.conf.position_error_margin;
        let trim = &self.conf.trim;
        !(fragment.y > self.page_height - band(trim.top) + e
            || fragment.x > self.page_width - band(trim.right) + e
            || fragment.y < band(trim.bottom) - e
            || fragment.x < band(trim.left) - e)
    }

    /// 处理一页，返回按阅读顺序排列的行
    pub fn lines(&self, page: &PdfPage) -> Vec<PdfLine> {
        let mut indexed: Vec<(usize, &GlyphFragment)> = page
            .fragments
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.text.is_empty() && self.inside_margins(f))
            .collect();

        // 从上到下、从左到右；与内容流顺序无关
        indexed.sort_by(|(ia, a), (ib, b)| {
            b.y.total_cmp(&a.y)
                .then(a.x.total_cmp(&b.x))
                .then(ia.cmp(ib))
        });

        let mut lines = Vec::new();
        let mut baseline: Vec<(usize, &GlyphFragment)> = Vec::new();
        for item in indexed {
            let same_baseline = baseline
                .first()
                .map_or(true, |(_, first)| (first.y - item.1.y).abs() <= BASELINE_EPSILON);
            if !same_baseline {
                lines.extend(self.split_columns(&baseline));
                baseline.clear();
            }
            baseline.push(item);
        }
        lines.extend(self.split_columns(&baseline));

        lines.sort_by(|a, b| a.order.cmp(&b.order));
        lines
    }

    /// 同一基线上间距过大的片段属于不同的栏（例如双对白）
    fn split_columns(&self, baseline: &[(usize, &GlyphFragment)]) -> Vec<PdfLine> {
        let max_gap = self.conf.column_gap_chars * self.conf.character_width;
        let mut lines = Vec::new();
        let mut current: Vec<(usize, &GlyphFragment)> = Vec::new();

        for &(index, fragment) in baseline {
            if let Some((_, prev)) = current.last() {
                let prev_end = prev.x + grapheme_len(&prev.text) as f64 * self.conf.character_width;
                if fragment.x - prev_end > max_gap {
                    lines.push(collapse(&current));
                    current.clear();
                }
            }
            current.push((index, fragment));
        }
        if !current.is_empty() {
            lines.push(collapse(&current));
        }
        lines
    }
}

/// 合并相邻同字体片段；字体变化时开始新片段以保留样式边界
fn collapse(items: &[(usize, &GlyphFragment)]) -> PdfLine {
    let mut fragments: Vec<GlyphFragment> = Vec::new();
    for (_, item) in items {
        match fragments.last_mut() {
            Some(last) if last.font == item.font => last.text.push_str(&item.text),
            _ => fragments.push((*item).clone()),
        }
    }
    let order = items
        .iter()
        .map(|(i, _)| *i)
        .min()
        .unwrap_or(usize::MAX);
    PdfLine { fragments, order }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(fragments: Vec<GlyphFragment>) -> PdfPage {
        PdfPage {
            width: 612.0,
            height: 792.0,
            fragments,
            strokes: Vec::new(),
        }
    }

    #[test]
    fn trims_outside_margin_band() {
        let conf = PdfConf::default();
        let liner = Liner::new(&conf, 612.0, 792.0);
        let p = page(vec![
            GlyphFragment::new("header", "f", 300.0, 770.0, 12.0),
            GlyphFragment::new("body", "f", 108.0, 700.0, 12.0),
            GlyphFragment::new("12.", "f", 560.0, 730.0, 12.0),
            GlyphFragment::new("footer", "f", 300.0, 30.0, 12.0),
        ]);
        let lines = liner.lines(&p);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "body");
    }

    #[test]
    fn collapses_same_font_and_splits_on_font_change() {
        let conf = PdfConf::default();
        let liner = Liner::new(&conf, 612.0, 792.0);
        let p = page(vec![
            GlyphFragment::new("Hello ", "regular", 108.0, 700.0, 12.0),
            GlyphFragment::new("big ", "regular", 150.0, 700.0, 12.0),
            GlyphFragment::new("world", "bold", 178.0, 700.0, 12.0),
        ]);
        let lines = liner.lines(&p);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].fragments.len(), 2);
        assert_eq!(lines[0].fragments[0].text, "Hello big ");
        assert_eq!(lines[0].fragments[1].text, "world");
        assert_eq!(lines[0].x(), 108.0);
    }

    #[test]
    fn separates_columns_on_one_baseline() {
        let conf = PdfConf::default();
        let liner = Liner::new(&conf, 612.0, 792.0);
        let p = page(vec![
            GlyphFragment::new("JOE", "f", 150.0, 700.0, 12.0),
            GlyphFragment::new("MARY", "f", 400.0, 700.0, 12.0),
        ]);
        let lines = liner.lines(&p);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "JOE");
        assert_eq!(lines[1].text(), "MARY");
    }

    #[test]
    fn keeps_content_stream_order_between_lines() {
        let conf = PdfConf::default();
        let liner = Liner::new(&conf, 612.0, 792.0);
        let p = page(vec![
            GlyphFragment::new("left 1", "f", 100.0, 700.0, 12.0),
            GlyphFragment::new("left 2", "f", 100.0, 688.0, 12.0),
            GlyphFragment::new("right 1", "f", 350.0, 700.0, 12.0),
        ]);
        let texts: Vec<String> = liner.lines(&p).iter().map(PdfLine::text).collect();
        assert_eq!(texts, vec!["left 1", "left 2", "right 1"]);
    }
}
