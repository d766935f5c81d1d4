use crate::models::{Style, StyleSet, TextElement};

/// 逐字符扫描时的样式状态
#[derive(Debug, Default)]
struct StyleScanner {
    chars: Vec<(char, StyleSet)>,
    /// 每种已打开样式在输出中的起始位置（已扣除被移除的标记字符）
    open: [Option<usize>; 3],
}

impl StyleScanner {
    fn slot(style: Style) -> usize {
        match style {
            Style::Bold => 0,
            Style::Italic => 1,
            Style::Underline => 2,
        }
    }

    fn toggle(&mut self, style: Style) {
        let slot = Self::slot(style);
        match self.open[slot].take() {
            // 闭合时回填从起点到当前位置的所有字符
            Some(start) => {
                for (_, styles) in &mut self.chars[start..] {
                    styles.insert(style);
                }
            }
            None => self.open[slot] = Some(self.chars.len()),
        }
    }

    fn push(&mut self, c: char) {
        self.chars.push((c, StyleSet::new()));
    }

    /// 合并相邻样式相同的字符。行尾未闭合的样式直接丢弃
    fn into_runs(self) -> Vec<TextElement> {
        let mut runs: Vec<TextElement> = Vec::new();
        for (c, styles) in self.chars {
            match runs.last_mut() {
                Some(run) if run.styles == styles => run.text.push(c),
                _ => runs.push(TextElement::new(c.to_string(), styles)),
            }
        }
        if runs.is_empty() {
            runs.push(TextElement::plain(""));
        }
        runs
    }
}

/// 把一行带 Fountain 强调标记的文本拆成样式段
///
/// `**` 切换粗体（优先于 `*`），`*` 切换斜体，`_` 切换下划线，`\` 转义下一个字符。
/// 返回值非空，拼接后等于去掉标记的原文。
pub fn parse_markup(line: &str) -> Vec<TextElement> {
    let mut scanner = StyleScanner::default();
    let mut chars = line.chars().peekable();
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if !escaped {
            match c {
                '*' if chars.peek() == Some(&'*') => {
                    chars.next();
                    scanner.toggle(Style::Bold);
                    continue;
                }
                '*' => {
                    scanner.toggle(Style::Italic);
                    continue;
                }
                '\\' => {
                    escaped = true;
                    continue;
                }
                '_' => {
                    scanner.toggle(Style::Underline);
                    continue;
                }
                _ => {}
            }
        }
        scanner.push(c);
        escaped = false;
    }

    scanner.into_runs()
}

/// 去掉首段的第一个字符（强制标记）及其后空白
pub fn trim_line_start(text_elements: &mut Vec<TextElement>) {
    if let Some(first) = text_elements.first_mut() {
        let mut chars = first.text.chars();
        chars.next();
        first.text = chars.as_str().trim_start().to_string();
    }
    drop_empty_runs(text_elements);
}

/// 去掉末段的最后一个字符（居中结束标记）及其前空白
pub fn trim_line_end(text_elements: &mut Vec<TextElement>) {
    if let Some(last) = text_elements.last_mut() {
        let mut chars = last.text.chars();
        chars.next_back();
        last.text = chars.as_str().trim_end().to_string();
    }
    drop_empty_runs(text_elements);
}

/// 去掉空段，但至少保留一段
pub fn drop_empty_runs(text_elements: &mut Vec<TextElement>) {
    if text_elements.len() > 1 {
        text_elements.retain(|t| !t.text.is_empty());
        if text_elements.is_empty() {
            text_elements.push(TextElement::plain(""));
        }
    }
}
