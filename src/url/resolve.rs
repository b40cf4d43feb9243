use crate::LinkResolutionError;
use url::Url;

/// Resolves a row's detail-page href against the site origin
///
/// Relative paths such as `/ccsdschedule/CodeDetail?code=X` are joined onto
/// the origin. Absolute and protocol-relative links are accepted only when
/// they stay on the origin's host and port.
///
/// Returns an error when the href is missing or blank, is a non-navigating
/// link (`javascript:`, `mailto:`, `tel:`, `data:`, fragment-only), cannot
/// be joined into an HTTP(S) URL, or leads off the origin.
pub fn resolve_detail_link(origin: &Url, href: Option<&str>) -> Result<Url, LinkResolutionError> {
    let href = href.map(str::trim).unwrap_or_default();

    if href.is_empty() {
        return Err(LinkResolutionError::MissingHref);
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
        || href.starts_with('#')
    {
        return Err(unresolvable(href, "not a page link"));
    }

    let resolved = origin
        .join(href)
        .map_err(|e| unresolvable(href, &e.to_string()))?;

    match resolved.scheme() {
        "http" | "https" => {}
        other => return Err(unresolvable(href, &format!("unsupported scheme '{}'", other))),
    }

    if resolved.host_str() != origin.host_str()
        || resolved.port_or_known_default() != origin.port_or_known_default()
    {
        return Err(unresolvable(href, "points outside the site origin"));
    }

    Ok(resolved)
}

fn unresolvable(href: &str, reason: &str) -> LinkResolutionError {
    LinkResolutionError::Unresolvable {
        href: href.to_string(),
        reason: reason.to_string(),
    }
}
