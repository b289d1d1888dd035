//! Filename sanitization.
//!
//! Client-supplied names are reduced to their final path component before
//! they touch the filesystem, so no request can reach outside the uploads
//! directory.

use crate::{FilesError, Result};

/// Return the last path component of `raw`.
///
/// Both `/` and `\` count as separators and trailing separators are ignored,
/// so `"../../etc/passwd"` yields `"passwd"` and `"dir/"` yields `"dir"`.
pub fn base_name(raw: &str) -> &str {
    let trimmed = raw.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or("")
}

/// Sanitize an uploaded filename.
///
/// Strips directory components, replaces spaces with `_` and drops leading
/// dots and leading `hidden_prefix` runs, so the stored file is never hidden
/// from listings.
pub fn sanitize_upload_name(raw: &str, hidden_prefix: &str) -> Result<String> {
    let replaced = base_name(raw).replace(' ', "_");
    let mut name = replaced.as_str();

    loop {
        let before = name.len();
        name = name.trim_start_matches('.');
        if !hidden_prefix.is_empty() {
            name = name.trim_start_matches(hidden_prefix);
        }
        if name.len() == before {
            break;
        }
    }

    if name.is_empty() {
        return Err(FilesError::Validation(format!("invalid filename: {raw:?}")));
    }

    Ok(name.to_string())
}

/// Sanitize a name given to the delete endpoint.
pub fn sanitize_delete_name(raw: &str) -> Result<String> {
    let name = base_name(raw);

    if name.is_empty() || name == "." || name == ".." {
        return Err(FilesError::Validation(format!("invalid filename: {raw:?}")));
    }

    Ok(name.to_string())
}

/// Build the stored name `{stem}_{unix_secs}{ext}` from a sanitized name.
///
/// The extension is everything from the last `.`, so `"a.tar.gz"` becomes
/// `"a.tar_1700000000.gz"`.
pub fn stamped_name(sanitized: &str, unix_secs: i64) -> String {
    match sanitized.rfind('.') {
        Some(idx) if idx > 0 => {
            let (stem, ext) = sanitized.split_at(idx);
            format!("{stem}_{unix_secs}{ext}")
        }
        _ => format!("{sanitized}_{unix_secs}"),
    }
}
