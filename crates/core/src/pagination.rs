//! Pagination metadata for list responses.

use serde::Serialize;

use crate::filters::PageRequest;

/// Summary of where a page sits within the full result set.
///
/// Every field is omitted from JSON when zero, so the empty metadata returned
/// for a result set with no rows serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "is_zero")]
    pub current_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub page_size: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub first_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub last_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub total_records: i64,
}

impl Metadata {
    /// Compute metadata for `total_records` rows split into pages of
    /// `page_size`.
    ///
    /// No rows (or a non-positive page size) gives the all-zero metadata.
    pub fn calculate(total_records: i64, page: i64, page_size: i64) -> Self {
        if total_records <= 0 || page_size <= 0 {
            return Self::default();
        }

        Self {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: (total_records - 1) / page_size + 1,
            total_records,
        }
    }

    /// Metadata for a validated request.
    pub fn for_request(total_records: i64, request: &PageRequest) -> Self {
        Self::calculate(total_records, request.page(), request.page_size())
    }

    /// True for the metadata of an empty result set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}
