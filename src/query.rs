use indexmap::IndexMap;

/// Query-parameter state of a dashboard location: parameter name mapped to
/// its decoded value, ordered by first appearance.
pub type UrlState = IndexMap<String, String>;

/// Parse the query component of a location into a [`UrlState`].
///
/// Accepts a bare query string, a `?`-prefixed one, or a full URL; anything
/// up to the first `?` and any `#fragment` is discarded. Values are
/// percent-decoded (kept raw when undecodable); on duplicate keys the last
/// occurrence wins while the key keeps its first-seen position.
pub fn parse_query(location: &str) -> UrlState {
    let query = location
        .split_once('?')
        .map_or(location, |(_, query)| query);
    let query = query.split_once('#').map_or(query, |(query, _)| query);

    let mut state = UrlState::new();
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        let value = urlencoding::decode(value)
            .map_or_else(|_| value.to_string(), |decoded| decoded.into_owned());
        state.insert(key.to_string(), value);
    }
    state
}

/// Build a location from a base path, the current [`UrlState`] and optional
/// override options (override wins on key collision).
///
/// Values are percent-encoded and lower-cased at serialization, keeping every
/// filter value a case-insensitive identifier. An empty merged set returns
/// the base unchanged.
pub fn make_uri(base: &str, state: &UrlState, overrides: Option<&UrlState>) -> String {
    let mut merged = state.clone();
    if let Some(overrides) = overrides {
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
    }

    let query = merged
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value).to_lowercase()))
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{query}")
    }
}
