//! Session token extraction from request headers.

use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};

/// Name of the cookie Clerk's frontend SDK stores the session JWT in.
pub const SESSION_COOKIE: &str = "__session";

/// Find the session JWT in a request.
///
/// `Authorization: Bearer <jwt>` takes precedence over the `__session` cookie.
/// Empty values count as absent.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    bearer_token(headers).or_else(|| session_cookie(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn bearer_header() {
        let h = headers(&[("authorization", "Bearer abc.def.ghi")]);
        assert_eq!(token_from_headers(&h).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        let h = headers(&[("authorization", "bearer tok")]);
        assert_eq!(token_from_headers(&h).as_deref(), Some("tok"));
    }

    #[test]
    fn other_schemes_ignored() {
        let h = headers(&[("authorization", "Basic dXNlcjpwYXNz")]);
        assert_eq!(token_from_headers(&h), None);
    }

    #[test]
    fn session_cookie_among_others() {
        let h = headers(&[("cookie", "theme=dark; __session=jwt.value.here; lang=en")]);
        assert_eq!(token_from_headers(&h).as_deref(), Some("jwt.value.here"));
    }

    #[test]
    fn cookie_in_second_header() {
        let h = headers(&[("cookie", "theme=dark"), ("cookie", "__session=second")]);
        assert_eq!(token_from_headers(&h).as_deref(), Some("second"));
    }

    #[test]
    fn bearer_wins_over_cookie() {
        let h = headers(&[
            ("authorization", "Bearer from-header"),
            ("cookie", "__session=from-cookie"),
        ]);
        assert_eq!(token_from_headers(&h).as_deref(), Some("from-header"));
    }

    #[test]
    fn empty_values_are_absent() {
        let h = headers(&[("authorization", "Bearer  "), ("cookie", "__session=")]);
        assert_eq!(token_from_headers(&h), None);
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }
}
