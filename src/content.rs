use crate::options::Options;

/// Cut the query content out of a URL-like string.
///
/// Content starts after the first `?` (or at the start when there is none)
/// and runs up to the next `#` (or the end). When a separator itself holds
/// `?` or `#` the input is returned verbatim.
pub fn extract_query_content<'a>(url: &'a str, opts: &Options) -> &'a str {
    if opts.separators_contain_boundary_chars() {
        return url;
    }
    let rest = url.split_once('?').map_or(url, |(_, query)| query);
    rest.split_once('#').map_or(rest, |(query, _)| query)
}
