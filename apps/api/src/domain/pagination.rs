use serde::Serialize;
use std::str::FromStr;

/// Page number used when the caller gives none (pages are 1-indexed)
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller gives none
pub const DEFAULT_LIMIT: u32 = 10;

/// Page cap applied unless configured otherwise
pub const DEFAULT_MAX_LIMIT: u32 = 100;

/// Page token that disables windowing and returns every record
pub const PAGE_ALL: &str = "all";

/// Direction applied to the `name` ordering of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parses an explicit sort token
    ///
    /// `asc` and `1` mean ascending, `desc` and `-1` descending. Anything
    /// else is not an explicit sort and yields `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "asc" | "1" => Some(SortDirection::Ascending),
            "desc" | "-1" => Some(SortDirection::Descending),
            _ => None,
        }
    }

    /// SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// What a list does when the sort token is absent or unrecognised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortFallback {
    /// Sort by name ascending
    #[default]
    Ascending,
    /// Keep insertion order
    Unsorted,
}

impl FromStr for SortFallback {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortFallback::Ascending),
            "none" | "unsorted" => Ok(SortFallback::Unsorted),
            other => Err(format!("unknown sort fallback: {}", other)),
        }
    }
}

/// Per-resource rules for turning raw query parameters into a page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    pub default_limit: u32,
    /// Upper bound on `limit`; `None` leaves it unbounded
    pub max_limit: Option<u32>,
    pub sort_fallback: SortFallback,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: Some(DEFAULT_MAX_LIMIT),
            sort_fallback: SortFallback::Ascending,
        }
    }
}

impl PaginationPolicy {
    pub fn with_sort_fallback(mut self, sort_fallback: SortFallback) -> Self {
        self.sort_fallback = sort_fallback;
        self
    }
}

/// A resolved, bounded list request
///
/// # Invariants
/// - `page >= 1` and `limit >= 1`
/// - `limit` never exceeds the policy cap
/// - when `paginate` is false every matching record is returned, still ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub sort: Option<SortDirection>,
    pub paginate: bool,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: Some(SortDirection::Ascending),
            paginate: true,
        }
    }
}

impl PageRequest {
    /// Resolves raw `page`, `limit` and `sort` query values
    ///
    /// Non-numeric, zero or missing values fall back to page 1 and the
    /// policy's default limit. `page=all` switches windowing off.
    ///
    /// # Example
    /// ```
    /// use league_api::domain::pagination::{PageRequest, PaginationPolicy, SortDirection};
    ///
    /// let request = PageRequest::resolve(Some("2"), Some("10"), Some("desc"), &PaginationPolicy::default());
    /// assert_eq!(request.skip(), 10);
    /// assert_eq!(request.take(), Some(10));
    /// assert_eq!(request.sort, Some(SortDirection::Descending));
    /// ```
    pub fn resolve(
        raw_page: Option<&str>,
        raw_limit: Option<&str>,
        raw_sort: Option<&str>,
        policy: &PaginationPolicy,
    ) -> Self {
        let paginate = raw_page.map(str::trim) != Some(PAGE_ALL);

        let page = if paginate {
            parse_positive(raw_page).unwrap_or(DEFAULT_PAGE)
        } else {
            DEFAULT_PAGE
        };

        let limit = parse_positive(raw_limit).unwrap_or(policy.default_limit.max(1));
        let limit = match policy.max_limit {
            Some(max) => limit.min(max.max(1)),
            None => limit,
        };

        let sort = raw_sort
            .and_then(SortDirection::from_token)
            .or(match policy.sort_fallback {
                SortFallback::Ascending => Some(SortDirection::Ascending),
                SortFallback::Unsorted => None,
            });

        Self {
            page,
            limit,
            sort,
            paginate,
        }
    }

    /// Number of records to skip
    pub fn skip(&self) -> u64 {
        if self.paginate {
            u64::from(self.page - 1) * u64::from(self.limit)
        } else {
            0
        }
    }

    /// Number of records to return, `None` for all of them
    pub fn take(&self) -> Option<u64> {
        self.paginate.then_some(u64::from(self.limit))
    }
}

/// Reads a positive integer the way a lenient query parser would:
/// leading digits count, trailing garbage is ignored. Values too large
/// for `u32` saturate.
fn parse_positive(raw: Option<&str>) -> Option<u32> {
    let digits: String = raw?
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .skip_while(|c| *c == '0')
        .collect();

    if digits.is_empty() {
        return None;
    }
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}

/// One page of records plus paging metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub total_docs: u64,
    pub limit: u64,
    pub page: u64,
    pub total_pages: u64,
    pub paging_counter: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(docs: Vec<T>, total_docs: u64, request: &PageRequest) -> Self {
        if !request.paginate {
            return Self {
                docs,
                total_docs,
                limit: total_docs,
                page: 1,
                total_pages: 1,
                paging_counter: 1,
                has_prev_page: false,
                has_next_page: false,
                prev_page: None,
                next_page: None,
            };
        }

        let limit = u64::from(request.limit);
        let page = u64::from(request.page);
        let total_pages = total_docs.div_ceil(limit).max(1);
        let has_prev_page = page > 1;
        let has_next_page = page < total_pages;

        Self {
            docs,
            total_docs,
            limit,
            page,
            total_pages,
            paging_counter: (page - 1) * limit + 1,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page + 1),
        }
    }

    /// Converts the documents while keeping the metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            docs: self.docs.into_iter().map(f).collect(),
            total_docs: self.total_docs,
            limit: self.limit,
            page: self.page,
            total_pages: self.total_pages,
            paging_counter: self.paging_counter,
            has_prev_page: self.has_prev_page,
            has_next_page: self.has_next_page,
            prev_page: self.prev_page,
            next_page: self.next_page,
        }
    }
}
