pub mod models;
pub mod utils;
pub mod parser;
pub mod pdf;
pub mod adapter;
pub mod writer;
pub mod api;
pub mod error;

pub use models::{
    Block,
    Conf,
    ElementType,
    PdfConf,
    Script,
    ScriptElement,
    Style,
    StyleSet,
    TextElement,
};

pub use parser::{FountainParser, parse_markup};

pub use pdf::{PdfDocument, PdfExtractor, PdfParser, PreExtracted};

pub use adapter::Format;

pub use writer::OutputFormat;

pub use error::{ConvertError, ConvertResult};

pub use api::{
    ExportResult,
    ReadOptions,
    convert_file,
    read_script_bytes,
    read_script_file,
    render,
    write_script_file,
};

/// 解析 Fountain 格式文本
///
/// # Arguments
///
/// * `script` - Fountain 格式的剧本文本
/// * `title` - 标题页没有标题时使用的标题
/// * `config` - 配置对象
pub fn parse_fountain(script: &str, title: &str, config: &Conf) -> Script {
    FountainParser::new(config).parse(script, title)
}
