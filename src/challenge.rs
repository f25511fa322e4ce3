// src/challenge.rs

//! Tokenization of `WWW-Authenticate` challenge values.
//!
//! A challenge is a scheme name followed by space- or tab-separated
//! parameters, e.g. `Basic realm="registry"`. Tabs are normalized to
//! spaces before tokenizing.

/// Returns the challenge with tab separators normalized to spaces.
pub(crate) fn normalize(challenge: &str) -> String {
    challenge.replace('\t', " ")
}

/// Returns the scheme token of a challenge: everything up to the first
/// space or tab. Empty when the challenge itself is empty.
pub(crate) fn scheme_token(challenge: &str) -> &str {
    challenge
        .split([' ', '\t'])
        .next()
        .unwrap_or_default()
}

/// Extracts a named auth parameter from a challenge, matching the name
/// case-insensitively and stripping surrounding quotes from the value.
///
/// Parameters with embedded whitespace inside quoted values are not
/// reassembled; callers needing the raw parameter list get the full
/// challenge instead.
pub(crate) fn parameter(challenge: &str, name: &str) -> Option<String> {
    for token in normalize(challenge).split(' ').skip(1) {
        let token = token.trim_end_matches(',');
        let (key, value) = match token.split_once('=') {
            Some(pair) => pair,
            None => continue,
        };
        if key.eq_ignore_ascii_case(name) {
            return Some(value.trim_matches('"').to_string());
        }
    }
    None
}
