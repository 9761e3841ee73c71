use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern, glob_with};
use log::{debug, warn};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Shell-like matching: wildcards never match a leading `.` in a component.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Anchors a relative pattern at `base_dir`; absolute patterns pass through.
///
/// The base directory is escaped so that glob metacharacters in its name are
/// matched literally. A trailing `**` is widened to `**/*` so that it yields
/// every file below the directory, not just the directories themselves. The
/// pattern is otherwise not validated here.
pub fn resolve_pattern(pattern: &str, base_dir: &Path) -> String {
    let pattern = expand_trailing_recursive(pattern);
    let pattern = Path::new(&pattern);
    if pattern.is_absolute() {
        return pattern.to_string_lossy().into_owned();
    }

    let escaped_base = Pattern::escape(&base_dir.to_string_lossy());
    Path::new(&escaped_base)
        .join(pattern)
        .to_string_lossy()
        .into_owned()
}

/// `src/bin/**` becomes `src/bin/**/*`; other patterns are returned as-is.
fn expand_trailing_recursive(pattern: &str) -> String {
    let path = Path::new(pattern);
    if path.file_name() == Some(OsStr::new("**")) {
        path.join("*").to_string_lossy().into_owned()
    } else {
        pattern.to_string()
    }
}

/// Expands `patterns` into the set of canonical paths of matching regular files.
///
/// `**` matches any number of directory levels. Directories and other
/// non-file matches are dropped, and a malformed pattern simply matches nothing.
pub fn glob_files<S: AsRef<str>>(patterns: &[S], base_dir: &Path) -> Result<HashSet<PathBuf>> {
    let mut files = HashSet::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let resolved = resolve_pattern(pattern, base_dir);

        let paths = match glob_with(&resolved, MATCH_OPTIONS) {
            Ok(paths) => paths,
            Err(err) => {
                warn!("Ignoring invalid pattern '{pattern}': {err}");
                continue;
            }
        };

        let mut matched = 0usize;
        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    debug!("Skipping unreadable match for '{pattern}': {err}");
                    continue;
                }
            };

            if !path.is_file() {
                continue;
            }

            let canonical = dunce::canonicalize(&path)
                .with_context(|| format!("Failed to canonicalize path: {}", path.display()))?;
            files.insert(canonical);
            matched += 1;
        }

        debug!("Pattern '{pattern}' matched {matched} file(s)");
    }

    Ok(files)
}

/// Returns the files matched by the include patterns but not by the excludes.
pub fn select_files(include: &HashSet<PathBuf>, exclude: &HashSet<PathBuf>) -> HashSet<PathBuf> {
    include.difference(exclude).cloned().collect()
}

/// Orders files by lowercased file name, breaking ties on the full path.
pub fn sort_files(files: HashSet<PathBuf>) -> Vec<PathBuf> {
    let mut sorted: Vec<PathBuf> = files.into_iter().collect();
    sorted.sort_by_cached_key(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        (name, path.to_string_lossy().into_owned())
    });
    sorted
}
