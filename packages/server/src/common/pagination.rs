//! Forward cursor pagination for review queues.
//!
//! Cursors are the base64 form of the last row id seen. Ids are v7 UUIDs, so
//! `ORDER BY id` is creation order and the cursor alone is a stable position.
//!
//! ```rust,ignore
//! let args = PaginationArgs::forward(20, None).validate()?;
//! let rows = Model::find_page(&args, pool).await?;
//! let page = Page::from_rows(rows, &args, |row| row.id.into_uuid());
//! ```

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: i32 = 25;
pub const MAX_PAGE_SIZE: i32 = 100;

/// Opaque pagination cursor.
#[derive(Debug, Clone)]
pub struct Cursor(Uuid);

impl Cursor {
    pub fn new(id: Uuid) -> Self {
        Cursor(id)
    }

    pub fn encode(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0.as_bytes())
    }

    pub fn encode_uuid(id: Uuid) -> String {
        Cursor::new(id).encode()
    }

    pub fn decode(s: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .context("Invalid cursor: not valid base64")?;
        let uuid = Uuid::from_slice(&bytes).context("Invalid cursor: not a valid UUID")?;
        Ok(Cursor(uuid))
    }

    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

/// Position information for a returned page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

/// Raw pagination input as it arrives from a caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationArgs {
    /// Page size, clamped to 1..=100 (default 25).
    pub first: Option<i32>,
    /// Return rows strictly after this cursor.
    pub after: Option<String>,
}

impl PaginationArgs {
    pub fn forward(first: i32, after: Option<String>) -> Self {
        PaginationArgs {
            first: Some(first),
            after,
        }
    }

    /// Applies defaults and bounds, and decodes the cursor.
    pub fn validate(&self) -> Result<ValidatedPaginationArgs, &'static str> {
        let limit = self
            .first
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let cursor = self
            .after
            .as_deref()
            .map(Cursor::decode)
            .transpose()
            .map_err(|_| "Invalid cursor")?
            .map(Cursor::into_uuid);

        Ok(ValidatedPaginationArgs { limit, cursor })
    }
}

#[derive(Debug, Clone)]
pub struct ValidatedPaginationArgs {
    pub limit: i32,
    pub cursor: Option<Uuid>,
}

impl ValidatedPaginationArgs {
    /// SQL LIMIT value; one extra row tells whether another page exists.
    pub fn fetch_limit(&self) -> i64 {
        (self.limit + 1) as i64
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    /// Builds a page from rows fetched with `fetch_limit()`.
    pub fn from_rows(rows: Vec<T>, args: &ValidatedPaginationArgs, id_of: impl Fn(&T) -> Uuid) -> Self {
        let (items, has_more) = trim_results(rows, args.limit);
        let start_cursor = items.first().map(|item| Cursor::encode_uuid(id_of(item)));
        let end_cursor = items.last().map(|item| Cursor::encode_uuid(id_of(item)));

        Page {
            items,
            page_info: PageInfo {
                has_next_page: has_more,
                has_previous_page: args.cursor.is_some(),
                start_cursor,
                end_cursor,
            },
        }
    }
}

/// Trims `limit + 1` fetched rows to `limit` and reports whether more exist.
pub fn trim_results<T>(mut results: Vec<T>, limit: i32) -> (Vec<T>, bool) {
    let has_more = results.len() > limit as usize;
    results.truncate(limit as usize);
    (results, has_more)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_decodes_what_it_encodes() {
        let id = Uuid::now_v7();
        let decoded = Cursor::decode(&Cursor::encode_uuid(id)).unwrap();
        assert_eq!(id, decoded.into_uuid());
    }

    #[test]
    fn garbage_cursor_is_rejected() {
        let args = PaginationArgs::forward(10, Some("%%%".to_string()));
        assert_eq!(args.validate().unwrap_err(), "Invalid cursor");
    }

    #[test]
    fn defaults_and_clamps_page_size() {
        assert_eq!(PaginationArgs::default().validate().unwrap().limit, 25);
        assert_eq!(PaginationArgs::forward(500, None).validate().unwrap().limit, 100);
        assert_eq!(PaginationArgs::forward(0, None).validate().unwrap().limit, 1);
    }

    #[test]
    fn page_reports_more_rows() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::now_v7()).collect();
        let args = PaginationArgs::forward(3, None).validate().unwrap();

        let page = Page::from_rows(ids.clone(), &args, |id| *id);

        assert_eq!(page.items.len(), 3);
        assert!(page.page_info.has_next_page);
        assert!(!page.page_info.has_previous_page);
        assert_eq!(page.page_info.end_cursor, Some(Cursor::encode_uuid(ids[2])));
    }

    #[test]
    fn last_page_has_no_next() {
        let ids: Vec<Uuid> = (0..2).map(|_| Uuid::now_v7()).collect();
        let after = Cursor::encode_uuid(Uuid::now_v7());
        let args = PaginationArgs::forward(3, Some(after)).validate().unwrap();

        let page = Page::from_rows(ids, &args, |id| *id);

        assert_eq!(page.items.len(), 2);
        assert!(!page.page_info.has_next_page);
        assert!(page.page_info.has_previous_page);
    }
}
