//! Movie record rules.
//!
//! Validation runs before a record is handed to the repository; the
//! repository itself never validates fields.

use chrono::Datelike;

use crate::validation::{all_unique, ValidationErrors};

/// Longest permitted title, in bytes.
pub const MAX_TITLE_BYTES: usize = 500;

/// Year of the earliest surviving motion picture.
pub const MIN_YEAR: i32 = 1888;

pub const MIN_GENRES: usize = 1;
pub const MAX_GENRES: usize = 5;

/// Borrowed view of the caller-controlled movie fields.
#[derive(Debug, Clone, Copy)]
pub struct MovieFields<'a> {
    pub title: &'a str,
    pub year: i32,
    /// Runtime in minutes.
    pub runtime: i32,
    pub genres: &'a [String],
}

/// Validate movie fields against the current UTC calendar year.
pub fn validate_movie(fields: MovieFields<'_>) -> ValidationErrors {
    validate_movie_at(fields, chrono::Utc::now().year())
}

/// Validate movie fields, treating `current_year` as the latest allowed year.
pub fn validate_movie_at(fields: MovieFields<'_>, current_year: i32) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    errors.check(!fields.title.is_empty(), "title", "must be provided");
    errors.check(
        fields.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 500 bytes long",
    );

    errors.check(fields.year != 0, "year", "must be provided");
    errors.check(fields.year >= MIN_YEAR, "year", "must be greater than 1888");
    errors.check(
        fields.year <= current_year,
        "year",
        "must not be in the future",
    );

    errors.check(fields.runtime != 0, "runtime", "must be provided");
    errors.check(fields.runtime > 0, "runtime", "must be a positive integer");

    errors.check(
        fields.genres.len() >= MIN_GENRES,
        "genres",
        "must contain at least 1 genre",
    );
    errors.check(
        fields.genres.len() <= MAX_GENRES,
        "genres",
        "must not contain more than 5 genres",
    );
    errors.check(
        all_unique(fields.genres),
        "genres",
        "must not contain duplicate values",
    );

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    const THIS_YEAR: i32 = 2026;

    fn genres(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn fields<'a>(title: &'a str, year: i32, runtime: i32, genres: &'a [String]) -> MovieFields<'a> {
        MovieFields {
            title,
            year,
            runtime,
            genres,
        }
    }

    #[test]
    fn valid_movie_passes() {
        let g = genres(&["drama", "romance"]);
        let errors = validate_movie_at(fields("Casablanca", 1942, 102, &g), THIS_YEAR);
        assert!(errors.is_empty(), "unexpected errors: {errors}");
    }

    #[test]
    fn empty_record_reports_every_field() {
        let errors = validate_movie_at(fields("", 0, 0, &[]), THIS_YEAR);
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("title"), Some("must be provided"));
        assert_eq!(errors.get("year"), Some("must be provided"));
        assert_eq!(errors.get("runtime"), Some("must be provided"));
        assert_eq!(errors.get("genres"), Some("must contain at least 1 genre"));
    }

    #[test]
    fn title_length_is_measured_in_bytes() {
        let g = genres(&["drama"]);
        let exactly = "a".repeat(MAX_TITLE_BYTES);
        assert!(validate_movie_at(fields(&exactly, 2000, 90, &g), THIS_YEAR).is_empty());

        // 167 three-byte characters: 501 bytes.
        let multibyte = "\u{20ac}".repeat(167);
        let errors = validate_movie_at(fields(&multibyte, 2000, 90, &g), THIS_YEAR);
        assert_eq!(
            errors.get("title"),
            Some("must not be more than 500 bytes long")
        );
    }

    #[test]
    fn year_bounds() {
        let g = genres(&["documentary"]);
        assert!(validate_movie_at(fields("Roundhay", MIN_YEAR, 1, &g), THIS_YEAR).is_empty());
        assert!(validate_movie_at(fields("Now", THIS_YEAR, 1, &g), THIS_YEAR).is_empty());

        let early = validate_movie_at(fields("Early", 1887, 1, &g), THIS_YEAR);
        assert_eq!(early.get("year"), Some("must be greater than 1888"));

        let future = validate_movie_at(fields("Future", THIS_YEAR + 1, 1, &g), THIS_YEAR);
        assert_eq!(future.get("year"), Some("must not be in the future"));
    }

    #[test]
    fn negative_runtime_rejected() {
        let g = genres(&["comedy"]);
        let errors = validate_movie_at(fields("Short", 1990, -5, &g), THIS_YEAR);
        assert_eq!(errors.get("runtime"), Some("must be a positive integer"));
    }

    #[test]
    fn too_many_genres_rejected() {
        let g = genres(&["a", "b", "c", "d", "e", "f"]);
        let errors = validate_movie_at(fields("Busy", 1990, 90, &g), THIS_YEAR);
        assert_eq!(
            errors.get("genres"),
            Some("must not contain more than 5 genres")
        );
    }

    #[test]
    fn duplicate_genres_rejected() {
        let g = genres(&["drama", "drama"]);
        let errors = validate_movie_at(fields("Twice", 1990, 90, &g), THIS_YEAR);
        assert_eq!(errors.get("genres"), Some("must not contain duplicate values"));
    }

    #[test]
    fn current_year_from_clock_accepts_last_year() {
        let g = genres(&["drama"]);
        let last_year = chrono::Utc::now().year() - 1;
        assert!(validate_movie(fields("Recent", last_year, 100, &g)).is_empty());
    }
}
