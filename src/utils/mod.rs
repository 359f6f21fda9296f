use url::Url;

pub mod logger;

/// Default screenshot label for a page: host (and port), then the non-empty
/// path segments joined by `-`, then the query if there is one.
///
/// Only fed to the name digest, so it just has to tell pages apart.
pub fn page_label(url: &Url) -> String {
    let mut parts = vec![match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => url.scheme().to_string(),
    }];

    if let Some(segments) = url.path_segments() {
        parts.extend(segments.filter(|s| !s.is_empty()).map(String::from));
    }

    let mut label = parts.join("-");
    if let Some(query) = url.query() {
        label.push('?');
        label.push_str(query);
    }
    label
}
