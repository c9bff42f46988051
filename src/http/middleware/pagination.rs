//! Pagination middleware.
//! Normalizes `page`, `limit` and `search` before any handler runs.

use axum::{
    body::Body,
    http::{uri::PathAndQuery, Request, Uri},
    middleware::Next,
    response::Response,
};

/// Largest page size a client may ask for; also the default.
pub const MAX_LIMIT: u64 = 100;

/// Normalized paging parameters, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub search: String,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: MAX_LIMIT,
            search: String::new(),
        }
    }
}

impl Pagination {
    /// Parse a raw query string. Returns the paging values and the query
    /// string with `page` and `limit` removed.
    pub fn from_query(query: Option<&str>) -> (Self, String) {
        let mut pagination = Self::default();
        let mut remaining = url::form_urlencoded::Serializer::new(String::new());

        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match key.as_ref() {
                "page" => {
                    if let Some(page) = leading_integer(&value) {
                        if page > 0 {
                            pagination.page = page as u64;
                        }
                    }
                }
                "limit" => {
                    if let Some(limit) = leading_integer(&value) {
                        if limit > 0 && limit as u64 <= MAX_LIMIT {
                            pagination.limit = limit as u64;
                        }
                    }
                }
                _ => {
                    if key == "search" && !value.is_empty() {
                        pagination.search = value.to_string();
                    }
                    remaining.append_pair(&key, &value);
                }
            }
        }

        (pagination, remaining.finish())
    }

    /// Number of documents to skip for the current page.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Integer prefix of `value`, the way clients' `parseInt` reads it:
/// `"2.7"` is 2, `"3abc"` is 3, `"abc"` is nothing.
fn leading_integer(value: &str) -> Option<i64> {
    let value = value.trim();
    let unsigned = value.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(value);
    let digits = unsigned.len() - unsigned.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let sign_len = value.len() - unsigned.len();
    value[..sign_len + digits].parse().ok()
}

pub async fn pagination_middleware(mut request: Request<Body>, next: Next) -> Response {
    let (pagination, remaining) = Pagination::from_query(request.uri().query());

    if request.uri().query().is_some() {
        let path = request.uri().path();
        let path_and_query = if remaining.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, remaining)
        };
        let mut parts = request.uri().clone().into_parts();
        if let Ok(pq) = PathAndQuery::try_from(path_and_query) {
            parts.path_and_query = Some(pq);
            if let Ok(uri) = Uri::from_parts(parts) {
                *request.uri_mut() = uri;
            }
        }
    }

    request.extensions_mut().insert(pagination);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> Pagination {
        Pagination::from_query(Some(query)).0
    }

    #[test]
    fn test_page_normalization() {
        assert_eq!(parse("page=0").page, 1);
        assert_eq!(parse("page=-5").page, 1);
        assert_eq!(parse("page=abc").page, 1);
        assert_eq!(parse("page=3").page, 3);
        assert_eq!(Pagination::from_query(None).0.page, 1);
    }

    #[test]
    fn test_fractional_and_suffixed_values_keep_their_integer_prefix() {
        assert_eq!(parse("page=2.7").page, 2);
        assert_eq!(parse("page=4abc").page, 4);
        assert_eq!(parse("page=-2.5").page, 1);
        assert_eq!(parse("limit=20.9").limit, 20);
        assert_eq!(parse("limit=0.5").limit, 100);
    }

    #[test]
    fn test_limit_normalization() {
        assert_eq!(parse("limit=150").limit, 100);
        assert_eq!(parse("limit=0").limit, 100);
        assert_eq!(parse("limit=50").limit, 50);
        assert_eq!(parse("limit=100").limit, 100);
        assert_eq!(parse("limit=ten").limit, 100);
    }

    #[test]
    fn test_search_is_decoded() {
        assert_eq!(parse("search=water%20harvesting").search, "water harvesting");
        assert_eq!(parse("search=").search, "");
    }

    #[test]
    fn test_paging_keys_are_stripped() {
        let (_, remaining) = Pagination::from_query(Some("page=2&status=active&limit=10"));
        assert_eq!(remaining, "status=active");
    }

    #[test]
    fn test_skip() {
        let pagination = parse("page=3&limit=20");
        assert_eq!(pagination.skip(), 40);
    }
}
