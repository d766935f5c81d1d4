//! 输出格式

pub mod epub;
pub mod fdx;
pub mod fountain;
pub mod html;
pub mod osf;

use std::fmt;
use std::str::FromStr;
use crate::error::{ConvertError, ConvertResult};
use crate::models::Script;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Fountain,
    Html,
    Json,
    Fdx,
    Osf,
    Epub,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 6] = [
        OutputFormat::Fountain,
        OutputFormat::Html,
        OutputFormat::Json,
        OutputFormat::Fdx,
        OutputFormat::Osf,
        OutputFormat::Epub,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Fountain => "fountain",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
            OutputFormat::Fdx => "fdx",
            OutputFormat::Osf => "osf",
            OutputFormat::Epub => "epub",
        }
    }

    /// 输出文件的扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Osf => "xml",
            other => other.name(),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.name() == name || (name == "xml" && *format == OutputFormat::Osf))
            .ok_or_else(|| ConvertError::FormatDetection(format!("不支持的输出格式: {}", s)))
    }
}

/// 把剧本写成指定格式的字节
pub fn render(script: &Script, format: OutputFormat) -> ConvertResult<Vec<u8>> {
    let bytes = match format {
        OutputFormat::Fountain => fountain::write(script).into_bytes(),
        OutputFormat::Html => html::write_document(script, None)?.into_bytes(),
        OutputFormat::Json => serde_json::to_vec_pretty(script)?,
        OutputFormat::Fdx => fdx::write(script)?.into_bytes(),
        OutputFormat::Osf => osf::write(script)?.into_bytes(),
        OutputFormat::Epub => epub::write(script)?,
    };
    Ok(bytes)
}
