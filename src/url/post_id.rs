use crate::LinkError;
use url::Url;

/// Extracts the post identifier from a post link
///
/// The link is resolved against the blog's base URL and must end in the path
/// segments `post/<id>`. Trailing slashes, query strings and fragments are
/// ignored.
///
/// # Examples
///
/// ```
/// use blog_harvest::url::post_id_from_link;
/// use url::Url;
///
/// let base = Url::parse("http://myblog.blogfa.com/").unwrap();
/// assert_eq!(post_id_from_link(&base, "/post/42").unwrap(), "42");
/// assert!(post_id_from_link(&base, "/category/7").is_err());
/// ```
pub fn post_id_from_link(base: &Url, link: &str) -> Result<String, LinkError> {
    let resolved = base.join(link.trim()).map_err(|e| LinkError::Resolve {
        link: link.to_string(),
        message: e.to_string(),
    })?;

    let segments: Vec<&str> = resolved
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [.., "post", id] if is_post_id(id) => Ok((*id).to_string()),
        _ => Err(LinkError::UnexpectedShape(link.to_string())),
    }
}

fn is_post_id(id: &str) -> bool {
    id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
