//! 输入格式识别与结构化格式的读取

pub mod container;
pub mod fdx;
pub mod osf;
pub mod xml_tree;

use std::fmt;
use std::path::Path;
use crate::error::{ConvertError, ConvertResult};

/// Highland 包中 Fountain 正文的成员名
pub const HIGHLAND_MEMBER: &str = "text.fountain";
/// Fade In 包中 OSF 文档的成员名
pub const FADE_IN_MEMBER: &str = "document.xml";

/// 可读取的输入格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Fountain,
    /// zip 包，内含 Fountain
    Highland,
    FinalDraft,
    /// zip 包，内含 OSF
    FadeIn,
    Osf,
    Pdf,
}

impl Format {
    fn from_extension(extension: &str) -> Option<Format> {
        match extension.to_ascii_lowercase().as_str() {
            "fountain" | "spmd" | "txt" => Some(Format::Fountain),
            "highland" => Some(Format::Highland),
            "fdx" => Some(Format::FinalDraft),
            "fadein" => Some(Format::FadeIn),
            "osf" | "xml" => Some(Format::Osf),
            "pdf" => Some(Format::Pdf),
            _ => None,
        }
    }

    fn from_mime(mime: &str) -> Option<Format> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "text/plain" => Some(Format::Fountain),
            "text/xml" | "application/xml" => Some(Format::Osf),
            "application/pdf" => Some(Format::Pdf),
            _ => None,
        }
    }

    /// 按扩展名识别，扩展名无法识别时看 MIME 类型；都不认识时报错
    pub fn detect(file_name: &str, mime: Option<&str>) -> ConvertResult<Format> {
        let by_extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Format::from_extension);
        by_extension
            .or_else(|| mime.and_then(Format::from_mime))
            .ok_or_else(|| {
                ConvertError::FormatDetection(match mime {
                    Some(mime) => format!("{} ({})", file_name, mime),
                    None => file_name.to_string(),
                })
            })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Fountain => "Fountain",
            Format::Highland => "Highland",
            Format::FinalDraft => "Final Draft",
            Format::FadeIn => "Fade In",
            Format::Osf => "Open Screenplay Format",
            Format::Pdf => "PDF",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
