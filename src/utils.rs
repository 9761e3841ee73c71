use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Returns the fenced-code-block language tag for `path`, or `""` when the
/// extension is not known.
pub fn get_language_tag(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(OsStr::to_str)
        .unwrap_or("")
        .to_lowercase()
        .as_str()
    {
        "py" => "python",
        "rs" => "rust",
        "js" => "javascript",
        "ts" => "typescript",
        "jsx" => "jsx",
        "tsx" => "tsx",
        "c" | "h" => "c",
        "cpp" | "hpp" => "cpp",
        "java" => "java",
        "go" => "go",
        "sh" => "bash",
        "yaml" | "yml" => "yaml",
        "json" => "json",
        "toml" => "toml",
        "html" => "html",
        "css" => "css",
        "md" => "markdown",
        _ => "",
    }
}

/// Path shown to the user: relative to `base_dir` when the file lives below
/// it, otherwise the absolute path as-is.
pub fn display_path(path: &Path, base_dir: &Path) -> PathBuf {
    path.strip_prefix(base_dir).unwrap_or(path).to_path_buf()
}
