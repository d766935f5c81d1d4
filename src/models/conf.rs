use serde::{Deserialize, Serialize};
use crate::models::script::DEFAULT_AUTHOR;

/// 页面边距（英寸）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Margins {
            top: 1.0,
            bottom: 1.0,
            left: 1.0,
            right: 1.0,
        }
    }
}

/// PDF 版面分类的经验参数。都是手调的常量，只适用于常规等宽字体、常规边距的剧本
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConf {
    /// 裁掉边距带之外的文本
    pub trim: Margins,
    pub dpi: f64,
    /// 位置比较的容差
    pub position_error_margin: f64,
    /// 第一页行数少于该值时视为标题页，设为 0 则不识别标题页
    pub title_page_threshold: usize,
    /// 假定的等宽字符宽度，用于下划线和分栏估算
    pub character_width: f64,
    /// 同一基线上两段文本间距超过多少个字符宽度时拆成两栏
    pub column_gap_chars: f64,
    /// 行: margin, content, gap, previous, dual；列: action..transition
    pub weights: [[f64; 6]; 5],
}

impl Default for PdfConf {
    fn default() -> Self {
        PdfConf {
            trim: Margins::default(),
            dpi: 72.0,
            position_error_margin: 10.0,
            title_page_threshold: 20,
            character_width: 7.0,
            column_gap_chars: 3.0,
            weights: [
                [2.0, 2.0, 2.0, 2.0, 2.0, 2.0],
                [1.0, 1.0, 1.0, 2.0, 8.0, 2.0],
                [1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
                [1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
                [1.0, 5.0, 5.0, 5.0, 1.0, 1.0],
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Conf {
    /// 文档没有作者信息时使用
    pub default_author: String,
    pub pdf: PdfConf,
}

impl Default for Conf {
    fn default() -> Self {
        Conf {
            default_author: DEFAULT_AUTHOR.to_string(),
            pdf: PdfConf::default(),
        }
    }
}

impl Conf {
    /// 从 JSON 加载，缺省字段使用默认值
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let conf = Conf::from_json(r#"{"pdf": {"character_width": 7.2}}"#).unwrap();
        assert_eq!(conf.default_author, "Anonymous");
        assert_eq!(conf.pdf.character_width, 7.2);
        assert_eq!(conf.pdf.title_page_threshold, 20);
        assert_eq!(conf.pdf.weights[1][4], 8.0);
    }
}
