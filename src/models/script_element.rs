use serde::{Deserialize, Serialize};
use std::fmt;
use crate::models::text_element::TextElement;

/// 非双对白的元素类型。顺序即 PDF 评分平局时的优先顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementType {
    Action,
    Character,
    Dialogue,
    Parenthetical,
    SceneHeading,
    Transition,
}

impl ElementType {
    pub const ALL: [ElementType; 6] = [
        ElementType::Action,
        ElementType::Character,
        ElementType::Dialogue,
        ElementType::Parenthetical,
        ElementType::SceneHeading,
        ElementType::Transition,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<ElementType> {
        Self::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElementType::Action => "action",
            ElementType::Character => "character",
            ElementType::Dialogue => "dialogue",
            ElementType::Parenthetical => "parenthetical",
            ElementType::SceneHeading => "sceneHeading",
            ElementType::Transition => "transition",
        }
    }

    /// HTML 等输出使用的类名
    pub fn css_class(&self) -> &'static str {
        match self {
            ElementType::SceneHeading => "scene-heading",
            other => other.name(),
        }
    }

    /// 这些类型在导入时统一转大写
    pub fn is_upper_cased(&self) -> bool {
        matches!(
            self,
            ElementType::Character | ElementType::SceneHeading | ElementType::Transition
        )
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 单个非双对白元素：一串样式文本 + 是否居中
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: ElementType,
    pub text_elements: Vec<TextElement>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub centered: bool,
}

impl Block {
    pub fn new(kind: ElementType, text_elements: Vec<TextElement>) -> Self {
        Block {
            kind,
            text_elements,
            centered: false,
        }
    }

    pub fn centered(kind: ElementType, text_elements: Vec<TextElement>) -> Self {
        Block {
            kind,
            text_elements,
            centered: true,
        }
    }

    pub fn plain(kind: ElementType, text: &str) -> Self {
        Self::new(kind, vec![TextElement::plain(text)])
    }

    pub fn is(&self, kind: ElementType) -> bool {
        self.kind == kind
    }

    /// 按顺序拼接所有文本段
    pub fn text(&self) -> String {
        self.text_elements.iter().map(|t| t.text.as_str()).collect()
    }
}

/// 剧本元素。双对白只包含两列非双对白元素，不会嵌套
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptElement {
    Block(Block),
    DualDialogue { left: Vec<Block>, right: Vec<Block> },
}

impl ScriptElement {
    /// 双对白返回 None
    pub fn kind(&self) -> Option<ElementType> {
        match self {
            ScriptElement::Block(block) => Some(block.kind),
            ScriptElement::DualDialogue { .. } => None,
        }
    }

    pub fn is(&self, kind: ElementType) -> bool {
        self.kind() == Some(kind)
    }

    pub fn is_dual_dialogue(&self) -> bool {
        matches!(self, ScriptElement::DualDialogue { .. })
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            ScriptElement::Block(block) => Some(block),
            ScriptElement::DualDialogue { .. } => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match self {
            ScriptElement::Block(block) => Some(block),
            ScriptElement::DualDialogue { .. } => None,
        }
    }

    pub fn into_block(self) -> Option<Block> {
        match self {
            ScriptElement::Block(block) => Some(block),
            ScriptElement::DualDialogue { .. } => None,
        }
    }
}

impl From<Block> for ScriptElement {
    fn from(block: Block) -> Self {
        ScriptElement::Block(block)
    }
}
