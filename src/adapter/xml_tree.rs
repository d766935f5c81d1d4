//! 轻量 XML 树
//!
//! FDX 和 OSF 都很小，整篇读进内存后按标签名查询即可。

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use crate::error::{ConvertError, ConvertResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    /// 本地名（不含命名空间前缀）
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    /// 第一个子元素之前的文本
    pub text: String,
    /// 紧跟在本元素结束标签之后、仍属于父元素的文本
    pub tail: String,
}

impl XmlNode {
    fn from_start(start: &BytesStart<'_>) -> ConvertResult<Self> {
        let mut node = XmlNode {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            ..XmlNode::default()
        };
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            node.attributes.push((key, value));
        }
        Ok(node)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// 直接子元素中名字匹配的
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// 文档顺序（先序）的所有后代元素
    pub fn descendants(&self) -> Vec<&XmlNode> {
        let mut out = Vec::new();
        let mut stack: Vec<&XmlNode> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    pub fn descendants_named(&self, name: &str) -> Vec<&XmlNode> {
        self.descendants()
            .into_iter()
            .filter(|node| node.name == name)
            .collect()
    }

    /// 第一个名字匹配的后代元素
    pub fn first(&self, name: &str) -> Option<&XmlNode> {
        self.descendants().into_iter().find(|node| node.name == name)
    }

    /// 本元素及所有后代的文本，按文档顺序拼接
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
            out.push_str(&child.tail);
        }
        out
    }

    /// 文本挂到当前位置：已有子元素时接在最后一个子元素之后
    fn push_text(&mut self, text: &str) {
        match self.children.last_mut() {
            Some(last) => last.tail.push_str(text),
            None => self.text.push_str(text),
        }
    }
}

/// 解析整篇 XML，返回根元素
pub fn parse(xml: &str) -> ConvertResult<XmlNode> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    // 栈底是虚拟的文档节点
    let mut stack: Vec<XmlNode> = vec![XmlNode::default()];
    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(XmlNode::from_start(&e)?),
            Event::Empty(e) => {
                let node = XmlNode::from_start(&e)?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(node);
                }
            }
            Event::End(_) => {
                if stack.len() > 1 {
                    if let Some(node) = stack.pop() {
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(node);
                        }
                    }
                }
            }
            Event::Text(e) => {
                let text = e.unescape()?;
                if let Some(node) = stack.last_mut() {
                    node.push_text(&text);
                }
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                if let Some(node) = stack.last_mut() {
                    node.push_text(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(ConvertError::MalformedContainer("XML 元素没有闭合".to_string()));
    }
    stack
        .pop()
        .and_then(|document| document.children.into_iter().next())
        .ok_or_else(|| ConvertError::MalformedContainer("XML 没有根元素".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_tree_with_attributes_and_text() {
        let root = parse(
            r#"<?xml version="1.0"?>
<doc a="1"><p Type="Action"><t Style="Bold">Hi &amp; bye</t><t/></p></doc>"#,
        )
        .unwrap();
        assert_eq!(root.name, "doc");
        assert_eq!(root.attr("a"), Some("1"));
        let p = root.child("p").unwrap();
        assert_eq!(p.attr("Type"), Some("Action"));
        assert_eq!(p.children_named("t").count(), 2);
        assert_eq!(p.first("t").unwrap().text, "Hi & bye");
        assert_eq!(root.text_content(), "Hi & bye");
    }

    #[test]
    fn descendants_in_document_order() {
        let root = parse("<a><b><c/></b><c/></a>").unwrap();
        let names: Vec<&str> = root.descendants().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "c"]);
        assert_eq!(root.descendants_named("c").len(), 2);
    }

    #[test]
    fn mixed_content_keeps_document_order() {
        let root = parse("<p>a<b>x</b>c<i/>d</p>").unwrap();
        assert_eq!(root.text, "a");
        assert_eq!(root.children[0].tail, "c");
        assert_eq!(root.text_content(), "axcd", "混排文本应按文档顺序拼接");
    }

    #[test]
    fn empty_document_is_malformed() {
        assert!(matches!(parse(""), Err(ConvertError::MalformedContainer(_))));
    }
}
