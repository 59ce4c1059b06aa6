use std::path::{Path, PathBuf};

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Paths from a configuration file are relative to the directory of that file.
pub fn resolve_path(root: Option<&Path>, path: &str) -> PathBuf {
    match root {
        Some(r) if Path::new(path).is_relative() => r.join(path),
        _ => PathBuf::from(path),
    }
}
