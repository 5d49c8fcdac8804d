/// Name used on disk when the uploaded filename has no usable component
const FALLBACK_STAGING_NAME: &str = "upload";

/// Builds the object key an upload is stored under.
///
/// The filename is used verbatim; uploads sharing a filename share a key and
/// the later one replaces the earlier.
pub fn object_key(prefix: &str, filename: &str) -> String {
    format!("{}{}", prefix, filename)
}

/// Returns true for listing entries that are folder placeholders rather than images
pub fn is_directory_placeholder(key: &str) -> bool {
    key.ends_with('/')
}

/// Reduces a client supplied filename to a single safe path component for
/// the local staging file.
pub fn staging_file_name(filename: &str) -> String {
    // Browsers on Windows may send the full client path
    let name = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        if !filename.is_empty() {
            tracing::warn!("Unusable staging filename: {:?}", filename);
        }
        return FALLBACK_STAGING_NAME.to_string();
    }

    let sanitized: String = name
        .chars()
        .map(|c| if c.is_control() || c == ':' { '_' } else { c })
        .collect();

    // Limit length safely for UTF-8
    if sanitized.len() > 255 {
        let mut end = 255;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        sanitized[..end].to_string()
    } else {
        sanitized
    }
}
