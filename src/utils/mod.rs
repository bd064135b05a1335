// webpify/src/utils/mod.rs
use std::path::{Path, PathBuf};

/// Same directory and stem, new extension.
pub fn sibling_with_extension(path: &Path, extension: &str) -> PathBuf {
    let stem = file_stem(path);
    path.with_file_name(format!("{}.{}", stem, extension))
}

/// Same directory, `<stem><suffix>.<ext>`; the original extension is kept.
pub fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = file_stem(path);
    let file_name = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext),
        None => format!("{}{}", stem, suffix),
    };
    path.with_file_name(file_name)
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Swaps the old basename for the new one by plain substring replacement.
///
/// Every occurrence is replaced, including ones outside the final path
/// segment.
pub fn rewrite_url(url: &str, old_name: &str, new_name: &str) -> String {
    if old_name.is_empty() {
        return url.to_string();
    }
    url.replace(old_name, new_name)
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = ((bytes_f64.log10() / base.log10()).floor() as usize).min(UNITS.len() - 1);
    let size = bytes_f64 / base.powi(exponent as i32);

    format!("{:.2} {}", size, UNITS[exponent])
}
