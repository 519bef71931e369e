//! Image URL resolution for listing media.
//!
//! Listings store either absolute URLs or server-side upload paths. Upload
//! paths are served from `{upload_base}/Uploads/{file name}`.

/// Resolve a stored image path to a fetchable URL.
///
/// Paths starting with `http` are returned verbatim. Anything else is joined
/// to `upload_base` using only its last path segment (either `/` or `\`
/// separated). A trailing slash on `upload_base` is ignored.
#[must_use]
pub fn resolve_image_url(upload_base: &str, path: &str) -> String {
    if path.starts_with("http") {
        return path.to_string();
    }
    let base = upload_base.trim_end_matches('/');
    format!("{base}/Uploads/{}", last_segment(path))
}

fn last_segment(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
