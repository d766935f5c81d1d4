use thiserror::Error;

/// 转换错误。任何错误都会中止该文件的转换，不会返回部分文档
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("无法识别的剧本格式: {0}")]
    FormatDetection(String),

    #[error("容器或文档结构缺失: {0}")]
    MalformedContainer(String),

    #[error("ZIP错误: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML错误: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("文本编码错误: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("PDF内容提取失败: {0}")]
    PdfExtraction(String),
}

impl From<quick_xml::events::attributes::AttrError> for ConvertError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ConvertError::Xml(quick_xml::Error::from(err))
    }
}

pub type ConvertResult<T> = Result<T, ConvertError>;
