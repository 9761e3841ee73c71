use crate::utils::{display_path, get_language_tag};
use anyhow::{Context, Result};
use content_inspector::{ContentType, inspect};
use log::debug;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Number of leading bytes inspected to guess whether a file is binary.
const INSPECT_LEN: usize = 8192;

/// Renders `files` (already ordered) into a single Markdown document.
///
/// Each file becomes a `<!-- path -->` comment followed by a fenced code
/// block tagged with its language. Sections are separated by a blank line and
/// the document ends with exactly one newline.
pub async fn render_markdown(files: &[PathBuf], base_dir: &Path) -> Result<String> {
    let mut sections: Vec<String> = Vec::with_capacity(files.len() * 4);

    for path in files {
        let rel_path = display_path(path, base_dir);
        debug!("Rendering file: {}", rel_path.display());

        let content = read_text_lossy(path).await?;
        let lang = get_language_tag(path);

        sections.push(format!("<!-- {} -->", rel_path.display()));
        sections.push(format!("```{lang}"));
        sections.push(content);
        sections.push("```\n".to_string());
    }

    let document = sections.join("\n");
    Ok(format!("{}\n", document.trim_end()))
}

/// Reads a file fully, substituting U+FFFD for every invalid UTF-8 sequence.
async fn read_text_lossy(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let sample_size = std::cmp::min(INSPECT_LEN, bytes.len());
    if inspect(&bytes[..sample_size]) == ContentType::BINARY {
        debug!("{} looks binary, rendering it as text anyway", path.display());
    }

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            debug!(
                "Invalid UTF-8 in {}, substituting replacement characters",
                path.display()
            );
            Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
        }
    }
}

/// Buffered writer for the rendered document, over a file or standard output.
pub struct MarkdownWriter<W: AsyncWrite + Unpin> {
    writer: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin> MarkdownWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::new(inner),
        }
    }

    pub async fn write_document(&mut self, document: &str) -> Result<()> {
        self.writer
            .write_all(document.as_bytes())
            .await
            .context("Failed to write Markdown output")
    }

    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await.context("Failed to flush output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_renders_single_section() -> Result<()> {
        let dir = tempdir()?;
        let base = dir.path();
        let file = base.join("main.rs");
        std::fs::write(&file, "fn main() {}\n")?;

        let document = render_markdown(&[file], base).await?;
        assert_eq!(
            document,
            "<!-- main.rs -->\n```rust\nfn main() {}\n\n```\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_sections_are_separated_by_blank_line() -> Result<()> {
        let dir = tempdir()?;
        let base = dir.path();
        let first = base.join("a.py");
        let second = base.join("b.txt");
        std::fs::write(&first, "print(1)")?;
        std::fs::write(&second, "plain")?;

        let document = render_markdown(&[first, second], base).await?;
        assert_eq!(
            document,
            "<!-- a.py -->\n```python\nprint(1)\n```\n\n<!-- b.txt -->\n```\nplain\n```\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_trailing_whitespace_is_trimmed_to_one_newline() -> Result<()> {
        let dir = tempdir()?;
        let base = dir.path();
        let file = base.join("notes.md");
        std::fs::write(&file, "# Notes")?;

        let document = render_markdown(&[file], base).await?;
        assert!(document.ends_with("```\n"));
        assert!(!document.ends_with("\n\n"));
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() -> Result<()> {
        let dir = tempdir()?;
        let base = dir.path();
        let file = base.join("blob.bin");
        std::fs::write(&file, [b'o', b'k', 0xFF, b'!'])?;

        let document = render_markdown(&[file], base).await?;
        assert!(document.contains("ok\u{FFFD}!"));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone.rs");

        let err = render_markdown(&[missing], dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[tokio::test]
    async fn test_writer_flushes_document() -> Result<()> {
        let mut sink = Vec::new();
        {
            let mut writer = MarkdownWriter::new(&mut sink);
            writer.write_document("<!-- a -->\n").await?;
            writer.flush().await?;
        }
        assert_eq!(sink, b"<!-- a -->\n");
        Ok(())
    }
}
