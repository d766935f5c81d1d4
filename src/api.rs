//! 文件级 API
//!
//! 读取：识别格式 → 取出容器内容 → 交给对应的解析器。写出：按输出格式渲染。
//! 任何一步出错都返回错误，不会返回部分文档。

use std::path::Path;
use log::info;
use crate::adapter::{container, fdx, osf, Format, FADE_IN_MEMBER, HIGHLAND_MEMBER};
use crate::error::{ConvertError, ConvertResult};
use crate::models::{Conf, Script};
use crate::parser::FountainParser;
use crate::pdf::{PdfExtractor, PdfParser};
use crate::utils::file_stem;
use crate::writer::{self, OutputFormat};

/// 读取时的可选覆盖项
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// 声明的 MIME 类型，扩展名无法识别时使用
    pub mime: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
}

/// 转换结果
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub success: bool,
    pub message: String,
    pub file_path: Option<String>,
}

fn decode_text(bytes: Vec<u8>) -> ConvertResult<String> {
    let text = String::from_utf8(bytes)?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// 从内存中的文件内容读取剧本
///
/// # Arguments
///
/// * `file_name` - 文件名，用于识别格式和默认标题
/// * `bytes` - 文件内容
/// * `options` - MIME 类型与标题/作者覆盖
/// * `conf` - 配置
/// * `extractor` - PDF 内容提取器，只有 PDF 输入需要
pub fn read_script_bytes(
    file_name: &str,
    bytes: &[u8],
    options: &ReadOptions,
    conf: &Conf,
    extractor: Option<&dyn PdfExtractor>,
) -> ConvertResult<Script> {
    let format = Format::detect(file_name, options.mime.as_deref())?;
    info!("读取 {} ({})", file_name, format);
    let title = file_stem(file_name);

    let mut script = match format {
        Format::Fountain => FountainParser::new(conf).parse(&decode_text(bytes.to_vec())?, &title),
        Format::Highland => {
            let inner = container::unpack(bytes, |name| name.contains(HIGHLAND_MEMBER), HIGHLAND_MEMBER)?;
            FountainParser::new(conf).parse(&decode_text(inner)?, &title)
        }
        Format::FinalDraft => fdx::parse(&decode_text(bytes.to_vec())?, &title, conf)?,
        Format::FadeIn => {
            let inner = container::unpack_member(bytes, FADE_IN_MEMBER)?;
            osf::parse(&decode_text(inner)?, &title, conf)?
        }
        Format::Osf => osf::parse(&decode_text(bytes.to_vec())?, &title, conf)?,
        Format::Pdf => {
            let extractor = extractor.ok_or_else(|| {
                ConvertError::PdfExtraction("没有提供 PDF 内容提取器".to_string())
            })?;
            let document = extractor.extract(bytes)?;
            PdfParser::new(conf).parse(&document, &title)
        }
    };

    if let Some(title) = &options.title {
        script.set_title_value("title", title.as_str());
    }
    if let Some(author) = &options.author {
        script.set_title_value("author", author.as_str());
    }
    Ok(script)
}

/// 读取剧本文件
pub async fn read_script_file(
    path: impl AsRef<Path>,
    options: &ReadOptions,
    conf: &Conf,
    extractor: Option<&dyn PdfExtractor>,
) -> ConvertResult<Script> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    read_script_bytes(&file_name, &bytes, options, conf, extractor)
}

/// 按格式渲染
pub fn render(script: &Script, format: OutputFormat) -> ConvertResult<Vec<u8>> {
    writer::render(script, format)
}

/// 把剧本写成文件
pub async fn write_script_file(
    script: &Script,
    path: impl AsRef<Path>,
    format: OutputFormat,
) -> ConvertResult<()> {
    let bytes = render(script, format)?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// 读取一个文件并转换成另一种格式写出
pub async fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    format: OutputFormat,
    options: &ReadOptions,
    conf: &Conf,
    extractor: Option<&dyn PdfExtractor>,
) -> ExportResult {
    let output = output.as_ref();
    let result = async {
        let script = read_script_file(input, options, conf, extractor).await?;
        write_script_file(&script, output, format).await
    }
    .await;

    match result {
        Ok(()) => ExportResult {
            success: true,
            message: format!("已导出为 {}", format),
            file_path: Some(output.to_string_lossy().into_owned()),
        },
        Err(e) => ExportResult {
            success: false,
            message: format!("转换失败: {}", e),
            file_path: None,
        },
    }
}
