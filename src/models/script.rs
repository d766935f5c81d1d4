use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::models::script_element::{ElementType, ScriptElement};
use crate::models::text_element::Style;

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_AUTHOR: &str = "Anonymous";

/// 规范化的剧本文档。所有读取器构建它，所有写出器消费它
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Script {
    /// 标题页，键统一小写
    pub title_page: BTreeMap<String, String>,
    pub elements: Vec<ScriptElement>,
    /// 各类型的默认样式（目前只有 FDX 提供）
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<ElementType, Vec<Style>>,
}

impl Script {
    pub fn new(title: &str, author: &str) -> Self {
        let mut title_page = BTreeMap::new();
        title_page.insert("title".to_string(), title.to_string());
        title_page.insert("author".to_string(), author.to_string());
        Script {
            title_page,
            elements: Vec::new(),
            styles: BTreeMap::new(),
        }
    }

    pub fn with_elements(mut self, elements: Vec<ScriptElement>) -> Self {
        self.elements = elements;
        self
    }

    pub fn title(&self) -> &str {
        self.title_page.get("title").map(String::as_str).unwrap_or(DEFAULT_TITLE)
    }

    pub fn author(&self) -> &str {
        self.title_page.get("author").map(String::as_str).unwrap_or(DEFAULT_AUTHOR)
    }

    /// 键不区分大小写
    pub fn set_title_value(&mut self, key: &str, value: impl Into<String>) {
        self.title_page.insert(key.to_lowercase(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// 统计某类型的元素数量（包括双对白内部）
    pub fn count(&self, kind: ElementType) -> usize {
        self.elements
            .iter()
            .map(|element| match element {
                ScriptElement::Block(block) => usize::from(block.is(kind)),
                ScriptElement::DualDialogue { left, right } => {
                    left.iter().chain(right.iter()).filter(|b| b.is(kind)).count()
                }
            })
            .sum()
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_AUTHOR)
    }
}
