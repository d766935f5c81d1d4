//! EPUB 写出：zip 包，正文是一份 XHTML

use std::io::{Cursor, Write};
use quick_xml::escape::escape;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};
use crate::error::ConvertResult;
use crate::models::Script;
use crate::writer::html;

const MIMETYPE: &str = "application/epub+zip";

const CONTAINER_XML: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/script.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

fn package_opf(title: &str, author: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<package version="3.0" xmlns="http://www.idpf.org/2007/opf" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">urn:unscript:{identifier}</dc:identifier>
    <dc:title>{title}</dc:title>
    <dc:creator>{author}</dc:creator>
    <dc:language>en</dc:language>
    <meta property="dcterms:modified">2016-01-01T00:00:01Z</meta>
  </metadata>
  <manifest>
    <item properties="nav" id="nav" href="nav.xhtml" media-type="application/xhtml+xml"/>
    <item id="script" href="script.xhtml" media-type="application/xhtml+xml"/>
    <item id="css" href="style.css" media-type="text/css"/>
  </manifest>
  <spine>
    <itemref idref="script"/>
  </spine>
</package>
"#,
        identifier = escape(&identifier(title, author)),
        title = escape(title),
        author = escape(author),
    )
}

fn nav_xhtml(title: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="en">
  <head>
    <meta charset="UTF-8"/>
    <title>Table of Contents</title>
  </head>
  <body>
    <nav epub:type="toc">
      <h1>Table of Contents</h1>
      <ol>
        <li><a href="script.xhtml">{}</a></li>
      </ol>
    </nav>
  </body>
</html>
"#,
        escape(title)
    )
}

/// 由标题和作者得到稳定的标识
fn identifier(title: &str, author: &str) -> String {
    let slug: String = format!("{}-{}", title, author)
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    slug.trim_matches('-').to_string()
}

/// 写出 EPUB 字节
pub fn write(script: &Script) -> ConvertResult<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    // mimetype 必须是第一个成员且不压缩
    let stored = FileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("mimetype", stored)?;
    zip.write_all(MIMETYPE.as_bytes())?;

    zip.start_file("META-INF/container.xml", deflated)?;
    zip.write_all(CONTAINER_XML.as_bytes())?;

    zip.start_file("OEBPS/script.xhtml", deflated)?;
    zip.write_all(html::write_document(script, Some("style.css"))?.as_bytes())?;

    zip.start_file("OEBPS/nav.xhtml", deflated)?;
    zip.write_all(nav_xhtml(script.title()).as_bytes())?;

    zip.start_file("OEBPS/style.css", deflated)?;
    zip.write_all(html::STYLESHEET.as_bytes())?;

    zip.start_file("OEBPS/script.opf", deflated)?;
    zip.write_all(package_opf(script.title(), script.author()).as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
