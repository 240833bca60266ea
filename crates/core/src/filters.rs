//! List filters: pagination bounds and allowlisted sorting.
//!
//! A [`Filters`] value holds raw, client-supplied paging and sort input. It is
//! turned into a [`PageRequest`] by [`Filters::validate`], and only a
//! `PageRequest` can be handed to a repository list query. The sort key is
//! never interpolated into SQL: it is looked up in the caller's allowlist and
//! then mapped through the fixed [`SortColumn`] table to a trusted column name.

use crate::validation::ValidationErrors;

// ---------------------------------------------------------------------------
// Bounds and defaults
// ---------------------------------------------------------------------------

/// Highest page number a client may request.
pub const MAX_PAGE: i64 = 10_000_000;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page size used when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Sort key used when the client does not ask for one.
pub const DEFAULT_SORT: &str = "id";

/// Sort keys accepted by the movie list query.
pub const MOVIE_SORT_SAFELIST: &[&str] = &[
    "id", "title", "year", "runtime", "-id", "-title", "-year", "-runtime",
];

// ---------------------------------------------------------------------------
// Sort resolution
// ---------------------------------------------------------------------------

/// Columns that a list query may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Title,
    Year,
    Runtime,
}

impl SortColumn {
    const TABLE: [(&'static str, SortColumn); 4] = [
        ("id", SortColumn::Id),
        ("title", SortColumn::Title),
        ("year", SortColumn::Year),
        ("runtime", SortColumn::Runtime),
    ];

    /// Look up a column by its unprefixed sort name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, column)| *column)
    }

    /// The trusted SQL column name.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Title => "title",
            SortColumn::Year => "year",
            SortColumn::Runtime => "runtime",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A resolved primary ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// Why a sort key could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    #[error("sort key {0:?} is not in the allowlist")]
    NotPermitted(String),

    #[error("sort key {0:?} does not name a sortable column")]
    UnknownColumn(String),
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Raw paging and sort input for a list query.
#[derive(Debug, Clone)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    /// Column name, optionally prefixed with `-` for descending order.
    pub sort: String,
    /// Every sort key the endpoint accepts, signed forms included.
    pub sort_safelist: &'static [&'static str],
}

impl Filters {
    /// Filters for the movie list with the given paging and sort input.
    pub fn for_movies(page: i64, page_size: i64, sort: impl Into<String>) -> Self {
        Self {
            page,
            page_size,
            sort: sort.into(),
            sort_safelist: MOVIE_SORT_SAFELIST,
        }
    }

    /// Resolve the sort key into a column and direction.
    ///
    /// The key must match an allowlist entry exactly (sign included), and its
    /// unprefixed name must be a known [`SortColumn`].
    pub fn resolve_sort(&self) -> Result<SortOrder, SortError> {
        if !self.sort_safelist.contains(&self.sort.as_str()) {
            return Err(SortError::NotPermitted(self.sort.clone()));
        }

        let (name, direction) = match self.sort.strip_prefix('-') {
            Some(name) => (name, SortDirection::Desc),
            None => (self.sort.as_str(), SortDirection::Asc),
        };

        let column = SortColumn::from_name(name)
            .ok_or_else(|| SortError::UnknownColumn(self.sort.clone()))?;

        Ok(SortOrder { column, direction })
    }

    /// Validate every field and produce a [`PageRequest`].
    pub fn validate(&self) -> Result<PageRequest, ValidationErrors> {
        let errors = validate_filters(self);
        match self.resolve_sort() {
            Ok(sort) if errors.is_empty() => Ok(PageRequest {
                page: self.page,
                page_size: self.page_size,
                sort,
            }),
            _ => Err(errors),
        }
    }
}

/// Check paging bounds and sort allowlist membership, collecting every
/// violation.
pub fn validate_filters(filters: &Filters) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    errors.check(filters.page > 0, "page", "must be greater than zero");
    errors.check(
        filters.page <= MAX_PAGE,
        "page",
        "must be a maximum of 10 million",
    );
    errors.check(filters.page_size > 0, "page_size", "must be greater than zero");
    errors.check(
        filters.page_size <= MAX_PAGE_SIZE,
        "page_size",
        "must be a maximum of 100",
    );
    errors.check(filters.resolve_sort().is_ok(), "sort", "invalid sort value");

    errors
}

// ---------------------------------------------------------------------------
// Validated request
// ---------------------------------------------------------------------------

/// Paging and ordering that passed validation.
///
/// Only constructed by [`Filters::validate`], so its bounds always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
    sort: SortOrder,
}

impl PageRequest {
    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    /// Row limit for the query.
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// Rows to skip before the requested page.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
