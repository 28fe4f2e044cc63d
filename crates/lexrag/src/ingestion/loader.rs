//! Corpus discovery and document text extraction

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::Document;

/// Load every eligible document under a corpus directory
///
/// Discovery is recursive; `*.pdf` files are the primary corpus type,
/// with `*.txt` and `*.md` accepted alongside. PDFs yield one document
/// per page. Fails with [`Error::CorpusNotFound`] when the directory is
/// missing and [`Error::EmptyCorpus`] when nothing ingestible is found.
pub fn load_corpus(dir: &Path) -> Result<Vec<Document>> {
    if !dir.is_dir() {
        return Err(Error::CorpusNotFound(dir.to_path_buf()));
    }

    let mut documents = Vec::new();
    let mut files = 0usize;

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
            continue;
        };

        match ext.as_str() {
            "pdf" => {
                files += 1;
                documents.extend(load_pdf(path)?);
            }
            "txt" | "md" => {
                files += 1;
                documents.extend(load_text(path)?);
            }
            _ => {}
        }
    }

    if documents.is_empty() {
        return Err(Error::EmptyCorpus(dir.to_path_buf()));
    }

    tracing::info!(
        files,
        documents = documents.len(),
        corpus = %dir.display(),
        "loaded corpus"
    );
    Ok(documents)
}

/// Load a plain-text or markdown file as a single unpaginated document
fn load_text(path: &Path) -> Result<Vec<Document>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::file_parse(path.to_string_lossy(), e.to_string()))?;

    let text = clean_text(&raw);
    if text.is_empty() {
        tracing::warn!(file = %path.display(), "file has no text content, skipping");
        return Ok(Vec::new());
    }

    Ok(vec![Document::new(text, path, None)])
}

/// Load a PDF file as one document per page
///
/// Page-by-page extraction goes through lopdf so page provenance survives
/// into citations; when that yields nothing (image-only pages, exotic
/// encodings), the whole file is retried through pdf-extract as a single
/// unpaginated document.
fn load_pdf(path: &Path) -> Result<Vec<Document>> {
    let data =
        fs::read(path).map_err(|e| Error::file_parse(path.to_string_lossy(), e.to_string()))?;

    let pages = extract_pdf_pages(&data);
    match pages {
        Ok(pages) if !pages.is_empty() => Ok(pages
            .into_iter()
            .map(|(page, text)| Document::new(text, path, Some(page)))
            .collect()),
        Ok(_) => extract_pdf_whole(path, &data),
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "page extraction failed, trying whole-file fallback");
            extract_pdf_whole(path, &data)
        }
    }
}

/// Extract text per page via lopdf; pages without text are skipped
fn extract_pdf_pages(data: &[u8]) -> Result<Vec<(u32, String)>> {
    let doc = lopdf::Document::load_mem(data)
        .map_err(|e| Error::file_parse("document.pdf", format!("failed to load PDF: {e}")))?;

    let mut pages = Vec::new();
    for (page_number, _) in doc.get_pages() {
        match doc.extract_text(&[page_number]) {
            Ok(raw) => {
                let text = clean_text(&raw);
                if !text.is_empty() {
                    pages.push((page_number, text));
                }
            }
            Err(e) => {
                tracing::debug!(page = page_number, error = %e, "no text extracted from page");
            }
        }
    }
    Ok(pages)
}

/// Whole-file extraction through pdf-extract, losing page provenance
fn extract_pdf_whole(path: &Path, data: &[u8]) -> Result<Vec<Document>> {
    let raw = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| Error::file_parse(path.to_string_lossy(), e.to_string()))?;

    let text = clean_text(&raw);
    if text.is_empty() {
        tracing::warn!(file = %path.display(), "PDF has no extractable text, skipping");
        return Ok(Vec::new());
    }

    Ok(vec![Document::new(text, path, None)])
}

/// Normalize extracted text: strip NULs and trailing per-line whitespace,
/// collapse runs of blank lines to a single paragraph break
fn clean_text(raw: &str) -> String {
    let without_nuls = raw.replace('\0', "");
    let mut text = without_nuls
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");

    while text.contains("\n\n\n") {
        text = text.replace("\n\n\n", "\n\n");
    }

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_corpus_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_corpus(&dir.path().join("absent"));
        assert!(matches!(result, Err(Error::CorpusNotFound(_))));
    }

    #[test]
    fn test_empty_corpus_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_corpus(dir.path());
        assert!(matches!(result, Err(Error::EmptyCorpus(_))));
    }

    #[test]
    fn test_ineligible_files_are_not_documents() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.docx"), b"binary").unwrap();
        let result = load_corpus(dir.path());
        assert!(matches!(result, Err(Error::EmptyCorpus(_))));
    }

    #[test]
    fn test_loads_text_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("acts")).unwrap();
        fs::write(dir.path().join("act1.txt"), "Article 1. Purpose.").unwrap();
        fs::write(dir.path().join("acts/act2.md"), "Article 2. Definitions.").unwrap();

        let mut documents = load_corpus(dir.path()).unwrap();
        documents.sort_by(|a, b| a.source.cmp(&b.source));

        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].text, "Article 1. Purpose.");
        assert_eq!(documents[0].page, None);
        assert!(documents[1].source.ends_with("acts/act2.md"));
    }

    #[test]
    fn test_whitespace_only_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blank.txt"), "   \n \n").unwrap();
        let result = load_corpus(dir.path());
        assert!(matches!(result, Err(Error::EmptyCorpus(_))));
    }

    #[test]
    fn test_clean_text_normalizes_blank_runs() {
        let raw = "line one  \n\n\n\nline two\0\nline three   ";
        assert_eq!(clean_text(raw), "line one\n\nline two\nline three");
    }

    #[test]
    fn test_corrupt_pdf_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.pdf"), b"not a pdf at all").unwrap();
        let result = load_corpus(dir.path());
        assert!(matches!(result, Err(Error::FileParse { .. })));
    }
}
