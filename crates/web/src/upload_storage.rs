use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

const FALLBACK_NAME: &str = "upload";

/// Reduce a client-supplied file name to a safe basename.
///
/// Directory components are dropped, spaces become underscores and any
/// character outside `[A-Za-z0-9_.-]` is removed. Leading dots are stripped
/// so the result can never be hidden or refer to a parent directory.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(|c| c == '/' || c == '\\').next().unwrap_or("");
    let cleaned: String = base
        .trim()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Write `data` into `dir` under the sanitized `raw_name`, appending `_1`,
/// `_2`, ... to the stem when the name is taken. Returns the stored path.
pub async fn save_upload(dir: &Path, raw_name: &str, data: &[u8]) -> std::io::Result<PathBuf> {
    fs::create_dir_all(dir).await?;
    let name = sanitize_file_name(raw_name);
    let (stem, ext) = split_extension(&name);

    let mut attempt = 0u32;
    loop {
        let candidate = if attempt == 0 {
            name.clone()
        } else {
            format!("{stem}_{attempt}{ext}")
        };
        let path = dir.join(candidate);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                file.write_all(data).await?;
                file.flush().await?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

/// `"photo.jpg"` → `("photo", ".jpg")`; names without a stem keep everything.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}
