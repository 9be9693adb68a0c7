// Upload validation

use super::errors::UploadError;

/// Largest accepted image, in bytes (5 MiB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Request body limit for the upload route; leaves room for the form
/// envelope so oversized files reach the size check instead of the limit.
pub const MAX_REQUEST_BODY: usize = 2 * MAX_FILE_SIZE;

/// Case-sensitive: `photo.PNG` is rejected
pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

/// Extension of the last path component, including the leading dot.
///
/// `"photo.png"` gives `".png"`, `"archive.tar.gz"` gives `".gz"`, and a
/// name without a dot gives `""`.
pub fn file_extension(filename: &str) -> &str {
    let base = filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(filename);
    match base.rfind('.') {
        Some(idx) => &base[idx..],
        None => "",
    }
}

pub fn validate_file_type(filename: &str) -> Result<(), UploadError> {
    let extension = file_extension(filename);
    if ALLOWED_EXTENSIONS.contains(&extension) {
        Ok(())
    } else {
        Err(UploadError::UnsupportedType(extension.to_string()))
    }
}

pub fn validate_file_size(size: usize) -> Result<(), UploadError> {
    if size > MAX_FILE_SIZE {
        Err(UploadError::TooLarge)
    } else {
        Ok(())
    }
}
