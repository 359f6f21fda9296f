use md5::{Digest, Md5};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::screenshot::config::{IMAGE_EXTENSION, SCREENSHOT_PREFIX, SOURCE_EXTENSION};

/// Lowercase hex MD5 of the label's raw bytes.
///
/// Only used to spread names out; the sequence number is what keeps
/// them unique.
pub fn label_digest(label: &str) -> String {
    hex::encode(Md5::digest(label.as_bytes()))
}

/// `screenshot-<digest><sequence>.png`
pub fn screenshot_file_name(label: &str, sequence: u64) -> String {
    format!("{}{}{}{}", SCREENSHOT_PREFIX, label_digest(label), sequence, IMAGE_EXTENSION)
}

/// Random name for the intermediate file written before the copy
pub fn temporary_file_name() -> String {
    format!("{}{}", Uuid::new_v4(), IMAGE_EXTENSION)
}

/// Sibling path holding the page source for a screenshot.
///
/// A trailing `.png` is swapped for `.html`. Any other path just gets
/// `.html` appended so the result never collides with the input.
pub fn source_path_for(screenshot: &Path) -> PathBuf {
    let stem = screenshot
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(IMAGE_EXTENSION));

    match stem {
        Some(stem) => screenshot.with_file_name(format!("{}{}", stem, SOURCE_EXTENSION)),
        None => {
            let mut appended = OsString::from(screenshot.as_os_str());
            appended.push(SOURCE_EXTENSION);
            PathBuf::from(appended)
        }
    }
}

/// Companion lookup for an optional artifact path, resolved to an absolute path
pub fn matching_source_path(screenshot: Option<&Path>) -> Option<PathBuf> {
    screenshot.map(|path| {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        source_path_for(&absolute)
    })
}
