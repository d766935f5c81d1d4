use crate::models::{Block, ElementType, ScriptElement};

/// 只追加的元素序列
///
/// 唯一允许修改已输出内容的操作是 `pop_through_last_character`：
/// 构建双对白时把左栏元素从末尾取回。
#[derive(Debug, Default)]
pub struct ElementBuilder {
    elements: Vec<ScriptElement>,
}

impl ElementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: impl Into<ScriptElement>) {
        self.elements.push(element.into());
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn last(&self) -> Option<&ScriptElement> {
        self.elements.last()
    }

    /// 末尾的非双对白元素
    pub fn last_block_mut(&mut self) -> Option<&mut Block> {
        self.elements.last_mut().and_then(ScriptElement::as_block_mut)
    }

    /// 弹出末尾直到（包含）最近一个角色元素，按原顺序返回
    ///
    /// 只在最近一个双对白之后查找；找不到角色时不做任何修改并返回 None，
    /// 保证双对白不会嵌套。
    pub fn pop_through_last_character(&mut self) -> Option<Vec<Block>> {
        let boundary = self
            .elements
            .iter()
            .rposition(ScriptElement::is_dual_dialogue)
            .map_or(0, |i| i + 1);
        let start = boundary
            + self.elements[boundary..]
                .iter()
                .rposition(|e| e.is(ElementType::Character))?;
        Some(
            self.elements
                .drain(start..)
                .filter_map(ScriptElement::into_block)
                .collect(),
        )
    }

    /// 最近一个双对白之后是否还有角色元素，即能否再开启一个双对白
    pub fn has_character_since_dual(&self) -> bool {
        self.elements
            .iter()
            .rev()
            .take_while(|e| !e.is_dual_dialogue())
            .any(|e| e.is(ElementType::Character))
    }

    pub fn push_dual(&mut self, left: Vec<Block>, right: Vec<Block>) {
        self.elements.push(ScriptElement::DualDialogue { left, right });
    }

    /// 追加到末尾双对白的右栏；末尾不是双对白时原样退回
    pub fn push_right(&mut self, block: Block) -> Result<(), Block> {
        match self.elements.last_mut() {
            Some(ScriptElement::DualDialogue { right, .. }) => {
                right.push(block);
                Ok(())
            }
            _ => Err(block),
        }
    }

    pub fn last_left_mut(&mut self) -> Option<&mut Block> {
        match self.elements.last_mut() {
            Some(ScriptElement::DualDialogue { left, .. }) => left.last_mut(),
            _ => None,
        }
    }

    pub fn last_right_mut(&mut self) -> Option<&mut Block> {
        match self.elements.last_mut() {
            Some(ScriptElement::DualDialogue { right, .. }) => right.last_mut(),
            _ => None,
        }
    }

    pub fn finish(self) -> Vec<ScriptElement> {
        self.elements
    }
}
