//! Opaque cursor and pagination envelope primitives.
//!
//! Purpose: give every paginated endpoint one cursor format and one page
//! envelope so infinite-scroll clients never parse, construct, or compare
//! cursors themselves. A cursor is a base64url token wrapping the JSON
//! claims of the last item on the previous page; the backend decodes it
//! into a typed claims struct and resumes the keyset scan from there.
//!
//! Invariants:
//! - Tokens are opaque: clients must treat them as stable strings.
//! - A token that fails to decode is rejected, never "best-effort" parsed.
//! - Page limits are clamped to `1..=MAX_PAGE_LIMIT` before querying.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default number of items returned when the client does not ask for a limit.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Upper bound on the number of items a single page may carry.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Errors raised while encoding or decoding cursor tokens.
#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    /// The cursor claims could not be serialised to JSON.
    #[error("cursor claims could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
    /// The token is not valid base64url.
    #[error("cursor token is not valid base64url")]
    Base64(#[source] base64::DecodeError),
    /// The decoded payload does not match the expected claims shape.
    #[error("cursor payload does not match the expected shape: {0}")]
    Claims(#[source] serde_json::Error),
}

/// Opaque pagination token.
///
/// Wraps a base64url-encoded JSON payload. Construction from a raw token
/// never validates; validation happens on [`Cursor::decode`] so endpoints
/// can report a uniform invalid-cursor failure.
///
/// # Examples
/// ```
/// use pagination::Cursor;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize, PartialEq, Debug)]
/// struct Claims {
///     id: String,
/// }
///
/// # fn main() -> Result<(), pagination::CursorError> {
/// let cursor = Cursor::encode(&Claims { id: "abc".into() })?;
/// let claims: Claims = cursor.decode()?;
/// assert_eq!(claims.id, "abc");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Encode typed claims into an opaque token.
    ///
    /// # Errors
    /// Returns [`CursorError::Encode`] when the claims cannot be serialised.
    pub fn encode<T: Serialize>(claims: &T) -> Result<Self, CursorError> {
        let payload = serde_json::to_vec(claims).map_err(CursorError::Encode)?;
        Ok(Self(URL_SAFE_NO_PAD.encode(payload)))
    }

    /// Wrap a raw token received from a client without validating it.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Decode the token back into typed claims.
    ///
    /// # Errors
    /// Returns [`CursorError::Base64`] for malformed tokens and
    /// [`CursorError::Claims`] when the payload deserialises into a
    /// different shape than the endpoint expects. Both cases indicate a
    /// tampered or foreign cursor and must abort the request.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, CursorError> {
        let payload = URL_SAFE_NO_PAD
            .decode(self.0.as_bytes())
            .map_err(CursorError::Base64)?;
        serde_json::from_slice(&payload).map_err(CursorError::Claims)
    }

    /// Borrow the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Client-supplied paging parameters after clamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    cursor: Option<Cursor>,
    limit: usize,
}

impl PageRequest {
    /// Build a request from optional client input.
    ///
    /// A missing limit falls back to [`DEFAULT_PAGE_LIMIT`]; any supplied
    /// value is clamped into `1..=MAX_PAGE_LIMIT`.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, MAX_PAGE_LIMIT};
    ///
    /// let request = PageRequest::new(None, Some(10_000));
    /// assert_eq!(request.limit(), MAX_PAGE_LIMIT);
    /// ```
    #[must_use]
    pub fn new(cursor: Option<Cursor>, limit: Option<usize>) -> Self {
        Self {
            cursor,
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// The resume cursor, if the client supplied one.
    #[must_use]
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// The clamped page size.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of rows a keyset query should fetch to detect a further page.
    ///
    /// One more than the page size: the extra row is dropped from the
    /// envelope and only signals that a next cursor exists.
    #[must_use]
    pub fn fetch_size(&self) -> usize {
        self.limit.saturating_add(1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, at most the clamped limit.
    pub items: Vec<T>,
    /// Token resuming after the last item, absent on the final page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<Cursor>,
}

impl<T> Page<T> {
    /// Assemble a page from rows fetched with [`PageRequest::fetch_size`].
    ///
    /// When more rows than `limit` arrive, the surplus is discarded and a
    /// cursor for the last retained item is produced via `make_cursor`.
    ///
    /// # Errors
    /// Propagates cursor encoding failures from `make_cursor`.
    pub fn from_rows(
        mut rows: Vec<T>,
        limit: usize,
        make_cursor: impl FnOnce(&T) -> Result<Cursor, CursorError>,
    ) -> Result<Self, CursorError> {
        let has_more = rows.len() > limit;
        rows.truncate(limit);
        let next_cursor = match (has_more, rows.last()) {
            (true, Some(last)) => Some(make_cursor(last)?),
            _ => None,
        };
        Ok(Self {
            items: rows,
            next_cursor,
        })
    }

    /// Build the absolute URL of the next page, if one exists.
    ///
    /// Existing `cursor` and `limit` query parameters on `base` are
    /// replaced rather than duplicated.
    #[must_use]
    pub fn next_link(&self, base: &Url, limit: usize) -> Option<Url> {
        let cursor = self.next_cursor.as_ref()?;
        let mut link = base.clone();
        let retained: Vec<(String, String)> = link
            .query_pairs()
            .filter(|(name, _)| name != "cursor" && name != "limit")
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();
        {
            let mut pairs = link.query_pairs_mut();
            pairs.clear();
            for (name, value) in &retained {
                pairs.append_pair(name, value);
            }
            pairs.append_pair("cursor", cursor.as_str());
            pairs.append_pair("limit", &limit.to_string());
        }
        Some(link)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for cursor round-trips and envelope assembly.
    use rstest::rstest;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct PostCursorClaims {
        created_at: String,
        id: String,
    }

    fn claims(id: &str) -> PostCursorClaims {
        PostCursorClaims {
            created_at: "2026-01-01T00:00:00Z".into(),
            id: id.into(),
        }
    }

    #[rstest]
    fn cursor_round_trips_claims() {
        let cursor = Cursor::encode(&claims("a")).expect("encode");
        let decoded: PostCursorClaims = cursor.decode().expect("decode");
        assert_eq!(decoded, claims("a"));
    }

    #[rstest]
    #[case("not-base64!!")]
    #[case("????")]
    fn cursor_rejects_malformed_base64(#[case] token: &str) {
        let cursor = Cursor::from_token(token);
        let result: Result<PostCursorClaims, _> = cursor.decode();
        assert!(matches!(result, Err(CursorError::Base64(_))));
    }

    #[rstest]
    fn cursor_rejects_foreign_payload() {
        #[derive(Serialize)]
        struct Other {
            page: u32,
        }
        let cursor = Cursor::encode(&Other { page: 3 }).expect("encode");
        let result: Result<PostCursorClaims, _> = cursor.decode();
        assert!(matches!(result, Err(CursorError::Claims(_))));
    }

    #[rstest]
    #[case(None, DEFAULT_PAGE_LIMIT)]
    #[case(Some(0), 1)]
    #[case(Some(35), 35)]
    #[case(Some(10_000), MAX_PAGE_LIMIT)]
    fn page_request_clamps_limit(#[case] requested: Option<usize>, #[case] expected: usize) {
        let request = PageRequest::new(None, requested);
        assert_eq!(request.limit(), expected);
    }

    #[rstest]
    fn fetch_size_requests_one_extra_row() {
        let request = PageRequest::new(None, Some(10));
        assert_eq!(request.fetch_size(), 11);
    }

    #[rstest]
    fn page_without_surplus_has_no_next_cursor() {
        let rows = vec![claims("a"), claims("b")];
        let page = Page::from_rows(rows, 2, |last| Cursor::encode(last)).expect("page");
        assert_eq!(page.items.len(), 2);
        assert!(page.next_cursor.is_none());
    }

    #[rstest]
    fn page_with_surplus_truncates_and_yields_cursor() {
        let rows = vec![claims("a"), claims("b"), claims("c")];
        let page = Page::from_rows(rows, 2, |last| Cursor::encode(last)).expect("page");
        assert_eq!(page.items.len(), 2);
        let cursor = page.next_cursor.as_ref().expect("next cursor");
        let decoded: PostCursorClaims = cursor.decode().expect("decode");
        assert_eq!(decoded, claims("b"));
    }

    #[rstest]
    fn next_link_replaces_paging_parameters() {
        let rows = vec![claims("a"), claims("b"), claims("c")];
        let page = Page::from_rows(rows, 2, |last| Cursor::encode(last)).expect("page");
        let base = Url::parse("https://app.example/api/v1/posts?cursor=stale&limit=9&tag=x")
            .expect("base url");
        let link = page.next_link(&base, 2).expect("next link");
        let pairs: Vec<(String, String)> = link
            .query_pairs()
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();
        assert!(pairs.iter().any(|(name, value)| name == "tag" && value == "x"));
        assert_eq!(
            pairs.iter().filter(|(name, _)| name == "cursor").count(),
            1
        );
        assert!(pairs.iter().any(|(name, value)| name == "limit" && value == "2"));
    }

    #[rstest]
    fn empty_rows_produce_empty_final_page() {
        let page: Page<PostCursorClaims> =
            Page::from_rows(Vec::new(), 5, |last| Cursor::encode(last)).expect("page");
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
    }
}
