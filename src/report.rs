use crate::utils::display_path;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Announces each selected file as `Adding <path>` on `sink`.
///
/// The binary passes standard error here so that the notices never end up in
/// the Markdown written to standard output.
pub fn report_files<W: Write>(sink: &mut W, files: &[PathBuf], base_dir: &Path) -> io::Result<()> {
    for path in files {
        writeln!(sink, "Adding {}", display_path(path, base_dir).display())?;
    }
    sink.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_one_line_per_file_in_order() {
        let base = Path::new("/project");
        let files = vec![
            PathBuf::from("/project/README.md"),
            PathBuf::from("/project/src/main.rs"),
        ];

        let mut out = Vec::new();
        report_files(&mut out, &files, base).unwrap();

        let text = String::from_utf8(out).unwrap();
        let expected_second = format!("Adding {}", Path::new("src").join("main.rs").display());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Adding README.md", expected_second.as_str()]);
    }

    #[test]
    fn test_reports_absolute_path_outside_base() {
        let mut out = Vec::new();
        report_files(
            &mut out,
            &[PathBuf::from("/shared/config.toml")],
            Path::new("/project"),
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Adding {}\n", Path::new("/shared/config.toml").display())
        );
    }
}
