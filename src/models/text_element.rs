use serde::{Deserialize, Serialize};
use std::fmt;

/// 可识别的三种文本样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Bold,
    Italic,
    Underline,
}

impl Style {
    pub const ALL: [Style; 3] = [Style::Bold, Style::Italic, Style::Underline];

    /// 从外部格式的样式名解析（大小写不敏感），无法识别的返回 None
    pub fn from_name(name: &str) -> Option<Style> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bold" => Some(Style::Bold),
            "italic" => Some(Style::Italic),
            "underline" => Some(Style::Underline),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Style::Bold => "bold",
            Style::Italic => "italic",
            Style::Underline => "underline",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 样式集合，按值比较
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSet {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl StyleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, style: Style) -> Self {
        self.insert(style);
        self
    }

    pub fn insert(&mut self, style: Style) {
        match style {
            Style::Bold => self.bold = true,
            Style::Italic => self.italic = true,
            Style::Underline => self.underline = true,
        }
    }

    pub fn contains(&self, style: Style) -> bool {
        match style {
            Style::Bold => self.bold,
            Style::Italic => self.italic,
            Style::Underline => self.underline,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.bold && !self.italic && !self.underline
    }

    /// 固定顺序: bold, italic, underline
    pub fn iter(&self) -> impl Iterator<Item = Style> + '_ {
        Style::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl FromIterator<Style> for StyleSet {
    fn from_iter<I: IntoIterator<Item = Style>>(iter: I) -> Self {
        let mut set = StyleSet::new();
        for style in iter {
            set.insert(style);
        }
        set
    }
}

/// 一段样式一致的文本
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextElement {
    pub text: String,
    #[serde(default)]
    pub styles: StyleSet,
}

impl TextElement {
    pub fn new(text: impl Into<String>, styles: StyleSet) -> Self {
        TextElement {
            text: text.into(),
            styles,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, StyleSet::new())
    }

    pub fn has_style(&self, style: Style) -> bool {
        self.styles.contains(style)
    }
}
