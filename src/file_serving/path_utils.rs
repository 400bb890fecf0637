use super::*;
use std::path::Component;

#[derive(Debug, PartialEq, Eq)]
pub enum ResolvedPath {
    /// Lexically normalized path under the root; it may not exist.
    Within(PathBuf),
    /// The target climbs out of the root.
    Escapes,
    /// The percent-encoding does not decode to UTF-8.
    Undecodable,
}

/// Maps a request target onto a path under `root`. `/` resolves to
/// `/index.html`; query strings and fragments are ignored.
pub fn resolve_request_path(root: &Path, request_target: &str) -> ResolvedPath {
    let path_without_query = request_target
        .split(['?', '#'])
        .next()
        .unwrap_or(request_target);

    let decoded = match percent_decode_str(path_without_query).decode_utf8() {
        Ok(decoded) => decoded,
        Err(e) => {
            log::debug!("Failed to decode path {}: {}", path_without_query, e);
            return ResolvedPath::Undecodable;
        }
    };

    let decoded = if decoded == "/" || decoded.is_empty() {
        "/index.html"
    } else {
        &*decoded
    };

    let mut relative = PathBuf::new();
    for component in Path::new(decoded).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::ParentDir => {
                if !relative.pop() {
                    log::warn!("Request escapes document root: {}", request_target);
                    return ResolvedPath::Escapes;
                }
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    log::debug!("Normalized request path: {}", relative.display());

    let resolved = root.join(&relative);
    // Component-wise, so a sibling like `docs-private` never matches `docs`
    if resolved.starts_with(root) {
        ResolvedPath::Within(resolved)
    } else {
        ResolvedPath::Escapes
    }
}

/// Re-checks an existing path after resolving symlinks.
pub fn is_within_root(root: &Path, path: &Path) -> io::Result<bool> {
    let canonical_root = root.log_operation("canonicalize", || fs::canonicalize(root))?;
    let canonical_path = fs::canonicalize(path)?;
    Ok(canonical_path.starts_with(&canonical_root))
}
