//! Folder discovery and per-format text extraction.
//!
//! Only the direct children of the document folder are considered. A file is
//! picked up when its extension matches the configured [`FileType`],
//! compared case-insensitively.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use walkdir::WalkDir;

use crate::document::Document;
use crate::error::{IngestionError, Result};

/// The kind of document the assistant ingests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    /// UTF-8 plain text (`.txt`).
    PlainText,
    /// Portable Document Format (`.pdf`).
    Pdf,
    /// Office Open XML word-processor document (`.docx`).
    Docx,
}

impl FileType {
    /// File extension (without the dot) for this type.
    pub fn extension(self) -> &'static str {
        match self {
            Self::PlainText => "txt",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    /// Whether `path` carries this type's extension, ignoring case.
    pub fn matches(self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.extension()))
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PlainText => "TXT",
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
        })
    }
}

impl FromStr for FileType {
    type Err = IngestionError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" | "plain_text" => Ok(Self::PlainText),
            "pdf" => Ok(Self::Pdf),
            "docx" | "word" => Ok(Self::Docx),
            other => Err(IngestionError::ConfigError(format!(
                "unsupported file type '{other}' (expected txt, pdf or docx)"
            ))),
        }
    }
}

/// List the files directly inside `folder` whose extension matches `file_type`.
///
/// Results are sorted by path. A missing folder is an error; an existing
/// folder with no matching files returns an empty list.
pub fn discover_files(folder: impl AsRef<Path>, file_type: FileType) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    if !folder.is_dir() {
        return Err(IngestionError::FolderNotFound(folder.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| IngestionError::Io(e.into()))?;
        if entry.file_type().is_file() && file_type.matches(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(folder = %folder.display(), %file_type, count = files.len(), "discovered documents");
    Ok(files)
}

/// Load a single file into a [`Document`] using the extractor for `file_type`.
pub fn load_document(path: &Path, file_type: FileType) -> Result<Document> {
    let text = match file_type {
        FileType::PlainText => read_plain_text(path)?,
        FileType::Pdf => read_pdf(path)?,
        FileType::Docx => read_docx(path)?,
    };

    let id = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let source = path.display().to_string();
    let metadata = HashMap::from([
        ("source".to_string(), source.clone()),
        ("file_type".to_string(), file_type.extension().to_string()),
    ]);

    Ok(Document { id, text, metadata, source_uri: Some(source) })
}

/// Discover and load every matching file in `folder`.
///
/// The first file that fails to load aborts the whole run.
pub fn load_folder(folder: impl AsRef<Path>, file_type: FileType) -> Result<Vec<Document>> {
    let folder = folder.as_ref();
    let files = discover_files(folder, file_type)?;
    if files.is_empty() {
        return Err(IngestionError::NoMatchingFiles { folder: folder.to_path_buf(), file_type });
    }

    files
        .iter()
        .map(|path| {
            load_document(path, file_type).inspect_err(|e| {
                error!(path = %path.display(), error = %e, "failed to load document");
            })
        })
        .collect()
}

fn loader_error(path: &Path, message: impl Into<String>) -> IngestionError {
    IngestionError::LoaderError { path: path.to_path_buf(), message: message.into() }
}

fn read_plain_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| loader_error(path, e.to_string()))
}

#[cfg(feature = "pdf")]
fn read_pdf(path: &Path) -> Result<String> {
    // pdf-extract panics on some malformed inputs instead of returning an error.
    let extracted =
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| pdf_extract::extract_text(path)));

    match extracted {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(loader_error(path, format!("invalid PDF: {e}"))),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(loader_error(path, format!("PDF extraction panicked: {message}")))
        }
    }
}

#[cfg(not(feature = "pdf"))]
fn read_pdf(path: &Path) -> Result<String> {
    Err(loader_error(path, "PDF support is disabled (enable the `pdf` feature)"))
}

#[cfg(feature = "docx")]
fn read_docx(path: &Path) -> Result<String> {
    use std::io::Read;

    let file = std::fs::File::open(path).map_err(|e| loader_error(path, e.to_string()))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| loader_error(path, format!("invalid DOCX archive: {e}")))?;
    let mut document_xml = archive
        .by_name("word/document.xml")
        .map_err(|_| loader_error(path, "no word/document.xml in DOCX archive"))?;

    let mut xml = String::new();
    document_xml
        .read_to_string(&mut xml)
        .map_err(|e| loader_error(path, format!("failed to read document.xml: {e}")))?;

    Ok(docx_xml_to_text(&xml))
}

#[cfg(not(feature = "docx"))]
fn read_docx(path: &Path) -> Result<String> {
    Err(loader_error(path, "DOCX support is disabled (enable the `docx` feature)"))
}

/// Collect the `<w:t>` text runs of a WordprocessingML body.
///
/// Each `<w:p>` paragraph after the first starts on a new line. `<w:tab/>`
/// becomes `\t` and `<w:br/>` / `<w:cr/>` become `\n`; tab-stop definitions
/// inside `<w:tabs>` produce nothing.
pub fn docx_xml_to_text(xml: &str) -> String {
    let mut text = String::new();
    let mut in_run = false;
    let mut in_tab_stops = false;
    let mut chars = xml.chars();

    while let Some(c) = chars.next() {
        if c != '<' {
            if in_run {
                text.push(c);
            }
            continue;
        }

        let mut tag = String::new();
        for tc in chars.by_ref() {
            if tc == '>' {
                break;
            }
            tag.push(tc);
        }

        let self_closing = tag.ends_with('/');
        let name = tag.split_whitespace().next().unwrap_or_default().trim_end_matches('/');
        match name {
            "w:t" if !self_closing => in_run = true,
            "/w:t" => in_run = false,
            "w:tabs" if !self_closing => in_tab_stops = true,
            "/w:tabs" => in_tab_stops = false,
            "w:tab" if !in_tab_stops => text.push('\t'),
            "w:br" | "w:cr" => text.push('\n'),
            "w:p" if !self_closing => {
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
            }
            _ => {}
        }
    }

    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn parses_file_types_case_insensitively() {
        assert_eq!("DOCX".parse::<FileType>().unwrap(), FileType::Docx);
        assert_eq!(" pdf ".parse::<FileType>().unwrap(), FileType::Pdf);
        assert_eq!("text".parse::<FileType>().unwrap(), FileType::PlainText);
        assert!("xlsx".parse::<FileType>().is_err());
    }

    #[test]
    fn extension_match_ignores_case() {
        assert!(FileType::Docx.matches(Path::new("data/Report.DOCX")));
        assert!(!FileType::Docx.matches(Path::new("data/report.doc")));
        assert!(!FileType::PlainText.matches(Path::new("data/README")));
    }

    #[test]
    fn discovers_only_direct_children_with_matching_extension() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("A.TXT"), "a").unwrap();
        fs::write(root.join("notes.md"), "ignored").unwrap();
        fs::write(root.join("nested/c.txt"), "ignored").unwrap();

        let files = discover_files(root, FileType::PlainText).unwrap();
        let names: Vec<_> =
            files.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();
        assert_eq!(names, vec!["A.TXT", "b.txt"]);
    }

    #[test]
    fn missing_folder_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = discover_files(temp.path().join("absent"), FileType::Pdf).unwrap_err();
        assert!(matches!(err, IngestionError::FolderNotFound(_)));
    }

    #[test]
    fn empty_folder_has_no_matching_files() {
        let temp = tempfile::tempdir().unwrap();
        let err = load_folder(temp.path(), FileType::Docx).unwrap_err();
        assert!(matches!(err, IngestionError::NoMatchingFiles { .. }));
    }

    #[test]
    fn plain_text_document_keeps_its_identity() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("guide.txt");
        fs::write(&path, "line one\nline two").unwrap();

        let document = load_document(&path, FileType::PlainText).unwrap();
        assert_eq!(document.id, "guide.txt");
        assert_eq!(document.text, "line one\nline two");
        assert_eq!(document.metadata.get("file_type").map(String::as_str), Some("txt"));
        assert_eq!(document.source_uri.as_deref(), Some(path.display().to_string().as_str()));
    }

    #[test]
    fn docx_xml_paragraphs_and_entities() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>Fish &amp; chips</w:t></w:r></w:p><w:p/><w:p><w:r><w:t xml:space="preserve">Second </w:t></w:r><w:r><w:t>line</w:t></w:r></w:p></w:body></w:document>"#;
        assert_eq!(docx_xml_to_text(xml), "Fish & chips\nSecond line");
    }

    #[test]
    fn docx_table_tags_sharing_the_prefix_are_not_text_runs() {
        let xml = "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>a</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>b</w:t></w:r></w:p></w:tc></w:tr></w:tbl>";
        assert_eq!(docx_xml_to_text(xml), "a\nb");
    }

    #[test]
    fn docx_tabs_and_breaks_separate_words() {
        let xml = "<w:p><w:r><w:t>Name</w:t><w:tab/><w:t>Value</w:t><w:br/><w:t>next line</w:t></w:r></w:p>";
        assert_eq!(docx_xml_to_text(xml), "Name\tValue\nnext line");

        let xml = r#"<w:p><w:r><w:t>one</w:t><w:cr/><w:t>two</w:t><w:br w:type="page"/><w:t>three</w:t></w:r></w:p>"#;
        assert_eq!(docx_xml_to_text(xml), "one\ntwo\nthree");
    }

    #[test]
    fn docx_tab_stop_definitions_are_not_tabs() {
        let xml = r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Heading</w:t></w:r></w:p>"#;
        assert_eq!(docx_xml_to_text(xml), "Heading");
    }
}
