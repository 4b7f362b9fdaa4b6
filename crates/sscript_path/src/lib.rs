//! sscript_path: module path normalization and resolution.
//!
//! Module paths are compared and stored in normalized form: forward
//! slashes, `.` and `..` segments resolved, and the source extension
//! elided. Case is preserved. Relative imports resolve against the
//! importing source's normalized path.

/// The source file extension elided during normalization.
pub const SOURCE_EXTENSION: &str = ".ts";

/// Convert backslashes to forward slashes.
pub fn normalize_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Normalize a module path: slash-canonical, dot segments resolved,
/// source extension removed, case preserved.
pub fn normalize_path(path: &str) -> String {
    let path = normalize_slashes(path);
    let path = remove_extension(&path);
    resolve_dot_segments(&path)
}

/// Resolve `.` and `..` segments in a slash-canonical path. Leading `..`
/// segments of a relative path are kept (there is nothing to pop).
fn resolve_dot_segments(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(segments.last(), Some(&s) if s != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }
    let joined = segments.join("/");
    if rooted {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Remove the source extension from a path, if present.
pub fn remove_extension(path: &str) -> &str {
    path.strip_suffix(SOURCE_EXTENSION).unwrap_or(path)
}

/// The directory part of a normalized path (no trailing slash), or the
/// empty string for a bare file name.
pub fn get_directory_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(last_slash) => &path[..last_slash],
        None => "",
    }
}

/// Combine a directory and a relative path.
pub fn combine_paths(base: &str, relative: &str) -> String {
    if base.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), relative)
    }
}

/// Whether an import specifier is relative to the importing file.
pub fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

/// Resolve an import specifier against the importing source's normalized
/// path, yielding the dependency's normalized path.
pub fn resolve_relative(specifier: &str, importer_normalized: &str) -> String {
    let specifier = normalize_slashes(specifier);
    if is_relative(&specifier) {
        let dir = get_directory_path(importer_normalized);
        normalize_path(&combine_paths(dir, &specifier))
    } else {
        normalize_path(&specifier)
    }
}
