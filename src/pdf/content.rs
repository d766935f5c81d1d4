//! PDF 内容提取的输入模型
//!
//! 文本与路径的提取由宿主完成（见 [`PdfExtractor`]），这里只定义交接的数据结构。
//! 所有坐标都以页面左下角为原点，y 向上增长。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::error::{ConvertError, ConvertResult};

/// 一段共享基线和字体的文本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphFragment {
    pub text: String,
    /// 字体 id，通过 [`PdfDocument::fonts`] 查真实字体名
    pub font: String,
    /// 基线起点
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub height: f64,
}

impl GlyphFragment {
    pub fn new(text: &str, font: &str, x: f64, y: f64, height: f64) -> Self {
        GlyphFragment {
            text: text.to_string(),
            font: font.to_string(),
            x,
            y,
            height,
        }
    }
}

/// 描边路径的端点（紧接在 stroke 操作之前的路径）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeSegment {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl StrokeSegment {
    pub fn horizontal(x0: f64, x1: f64, y: f64) -> Self {
        StrokeSegment { x0, y0: y, x1, y1: y }
    }

    pub fn left(&self) -> f64 {
        self.x0.min(self.x1)
    }

    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).abs()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfPage {
    pub width: f64,
    pub height: f64,
    /// 按内容流顺序
    #[serde(default)]
    pub fragments: Vec<GlyphFragment>,
    #[serde(default)]
    pub strokes: Vec<StrokeSegment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfDocument {
    pub pages: Vec<PdfPage>,
    /// 字体 id → 字体名
    #[serde(default)]
    pub fonts: HashMap<String, String>,
}

impl PdfDocument {
    /// 没有登记的字体 id 直接当作字体名
    pub fn font_name<'a>(&'a self, font: &'a str) -> &'a str {
        self.fonts.get(font).map(String::as_str).unwrap_or(font)
    }

    /// 所有页面中出现最多的宽高
    pub fn page_size(&self) -> (f64, f64) {
        let width = most_common(self.pages.iter().map(|p| p.width));
        let height = most_common(self.pages.iter().map(|p| p.height));
        (width, height)
    }

    pub fn fragment_count(&self) -> usize {
        self.pages.iter().map(|p| p.fragments.len()).sum()
    }
}

fn most_common(values: impl Iterator<Item = f64>) -> f64 {
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value, 1)),
        }
    }
    // 出现次数相同取先出现的
    let mut best: Option<(f64, usize)> = None;
    for (value, n) in counts {
        if best.map_or(true, |(_, m)| n > m) {
            best = Some((value, n));
        }
    }
    best.map_or(0.0, |(value, _)| value)
}

/// 宿主提供的 PDF 内容提取器
pub trait PdfExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> ConvertResult<PdfDocument>;
}

/// 已经提取好的版面（例如 JSON 导出），忽略输入字节
#[derive(Debug, Clone)]
pub struct PreExtracted {
    document: PdfDocument,
}

impl PreExtracted {
    pub fn new(document: PdfDocument) -> Self {
        PreExtracted { document }
    }

    pub fn from_json(json: &str) -> ConvertResult<Self> {
        let document = serde_json::from_str(json)
            .map_err(|e| ConvertError::PdfExtraction(format!("版面 JSON 无效: {}", e)))?;
        Ok(Self::new(document))
    }
}

impl PdfExtractor for PreExtracted {
    fn extract(&self, _bytes: &[u8]) -> ConvertResult<PdfDocument> {
        Ok(self.document.clone())
    }
}
