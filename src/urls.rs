//! URL construction for the review endpoints
//!
//! The first page of a title's reviews lives at a fixed path template; every
//! later page is addressed by a base path the source exposes once
//! (`data-ajaxurl`) combined with a constant marker parameter and the
//! page-specific continuation key.

use once_cell::sync::Lazy;
use url::Url;

/// Host every crawl targets unless the config overrides it
pub const DEFAULT_BASE_URL: &str = "https://www.imdb.com";

/// Constant marker parameter sent with every continuation request
const REF_MARKER: (&str, &str) = ("ref_", "undefined");

/// Query parameter carrying the continuation key
const PAGINATION_KEY_PARAM: &str = "paginationKey";

/// Base used only to resolve relative hrefs for query stripping.
static RELATIVE_RESOLVE_BASE: Lazy<Url> =
    Lazy::new(|| Url::parse("http://relative.invalid").expect("resolve base parses"));

/// First (non-AJAX) review page for a title.
pub fn initial_reviews_url(base: &Url, title_id: &str) -> Url {
    let mut url = base.clone();
    url.set_path(&format!("/title/{title_id}/reviews"));
    url
}

/// Resolves the relative `data-ajaxurl` path against the configured host.
pub fn ajax_base_url(base: &Url, ajax_path: &str) -> Url {
    let mut url = base.clone();
    url.set_path(ajax_path);
    url.set_query(None);
    url
}

/// Continuation request: the learned AJAX base plus the fixed marker
/// parameter and the page's continuation key.
pub fn continuation_url(ajax_base: &Url, pagination_key: &str) -> Url {
    let mut url = ajax_base.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair(REF_MARKER.0, REF_MARKER.1)
        .append_pair(PAGINATION_KEY_PARAM, pagination_key);
    url
}

/// Strips query parameters (and any fragment) from an href.
///
/// Hrefs on review pages are host-relative; those stay relative. Absolute
/// hrefs keep their scheme and host. Empty or unresolvable hrefs count as
/// absent.
pub fn strip_query(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    if let Ok(mut absolute) = Url::parse(href) {
        absolute.set_query(None);
        absolute.set_fragment(None);
        return Some(absolute.to_string());
    }

    let resolved = RELATIVE_RESOLVE_BASE.join(href).ok()?;
    Some(resolved.path().to_string())
}
