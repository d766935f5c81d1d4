use std::io::{Cursor, Read};
use log::debug;
use zip::ZipArchive;
use crate::error::{ConvertError, ConvertResult};

/// 从 zip 容器中取出第一个名字满足 `matches` 的成员
///
/// `description` 只用于错误信息。
pub fn unpack<F>(bytes: &[u8], matches: F, description: &str) -> ConvertResult<Vec<u8>>
where
    F: Fn(&str) -> bool,
{
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() || !matches(file.name()) {
            continue;
        }
        debug!("从容器中读取成员 {}", file.name());
        // 不按头部声明的大小预分配
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        return Ok(content);
    }
    Err(ConvertError::MalformedContainer(format!(
        "容器中没有 {}",
        description
    )))
}

/// 按完整路径取成员
pub fn unpack_member(bytes: &[u8], path: &str) -> ConvertResult<Vec<u8>> {
    unpack(bytes, |name| name == path, path)
}
