//! Movie entity model and DTOs.

use cinedex_core::filters::{Filters, PageRequest, DEFAULT_PAGE_SIZE, DEFAULT_SORT};
use cinedex_core::movie::{validate_movie, MovieFields};
use cinedex_core::pagination::Metadata;
use cinedex_core::types::{DbId, Timestamp, Version};
use cinedex_core::validation::ValidationErrors;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::runtime::Runtime;

/// A row from the `movies` table.
///
/// `id`, `created_at` and `version` are assigned by the store. The JSON form
/// omits `created_at`, omits `year`/`runtime` when zero and `genres` when
/// empty.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    #[serde(skip)]
    pub created_at: Timestamp,
    pub title: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub year: i32,
    #[serde(skip_serializing_if = "Runtime::is_zero")]
    pub runtime: Runtime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    pub version: Version,
}

impl Movie {
    /// Borrow the caller-controlled fields for validation.
    pub fn fields(&self) -> MovieFields<'_> {
        MovieFields {
            title: &self.title,
            year: self.year,
            runtime: self.runtime.minutes(),
            genres: &self.genres,
        }
    }

    /// Check every field rule, collecting all violations.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_movie(self.fields()).into_result()
    }
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// DTO for creating a new movie.
///
/// Missing fields deserialize to their zero value so validation can report
/// them as "must be provided".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateMovie {
    pub title: String,
    pub year: i32,
    pub runtime: Runtime,
    pub genres: Vec<String>,
}

impl CreateMovie {
    /// An unsaved movie; the store fills in id, created_at and version.
    pub fn into_movie(self) -> Movie {
        Movie {
            id: 0,
            created_at: Timestamp::default(),
            title: self.title,
            year: self.year,
            runtime: self.runtime,
            genres: self.genres,
            version: 0,
        }
    }
}

/// DTO for updating an existing movie. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime: Option<Runtime>,
    pub genres: Option<Vec<String>>,
}

impl UpdateMovie {
    /// Overwrite the fields of `movie` that are present in this update.
    ///
    /// `id` and `version` are left alone so the stored version check still
    /// applies to what the caller last read.
    pub fn apply_to(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(year) = self.year {
            movie.year = year;
        }
        if let Some(runtime) = self.runtime {
            movie.runtime = runtime;
        }
        if let Some(genres) = self.genres {
            movie.genres = genres;
        }
    }
}

/// Query parameters for listing movies
/// (`?title=&genres=a,b&page=&page_size=&sort=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieListParams {
    pub title: Option<String>,
    /// Comma-separated genre names.
    pub genres: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort: Option<String>,
}

impl MovieListParams {
    /// The full-text title filter; empty matches every movie.
    pub fn title_filter(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// The genre containment filter; empty matches every movie.
    pub fn genre_filter(&self) -> Vec<String> {
        self.genres
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Unvalidated paging and sort input bound to the movie sort allowlist.
    pub fn filters(&self) -> Filters {
        Filters::for_movies(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            self.sort.clone().unwrap_or_else(|| DEFAULT_SORT.to_string()),
        )
    }
}

/// One page of movies with its pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct MoviePage {
    pub movies: Vec<Movie>,
    pub metadata: Metadata,
}

impl MoviePage {
    pub fn new(movies: Vec<Movie>, total_records: i64, request: &PageRequest) -> Self {
        Self {
            movies,
            metadata: Metadata::for_request(total_records, request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn casablanca() -> Movie {
        CreateMovie {
            title: "Casablanca".to_string(),
            year: 1942,
            runtime: Runtime(102),
            genres: vec!["drama".to_string(), "romance".to_string()],
        }
        .into_movie()
    }

    #[test]
    fn json_shape_hides_created_at() {
        let mut movie = casablanca();
        movie.id = 1;
        movie.version = 1;
        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1,
                "title": "Casablanca",
                "year": 1942,
                "runtime": "102 mins",
                "genres": ["drama", "romance"],
                "version": 1,
            })
        );
    }

    #[test]
    fn json_shape_omits_zero_and_empty_fields() {
        let movie = CreateMovie {
            title: "Untitled".to_string(),
            ..Default::default()
        }
        .into_movie();
        let json = serde_json::to_value(&movie).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 0, "title": "Untitled", "version": 0 })
        );
    }

    #[test]
    fn create_dto_defaults_missing_fields() {
        let input: CreateMovie = serde_json::from_str(r#"{"title": "Moana"}"#).unwrap();
        let errors = input.into_movie().validate().unwrap_err();
        assert_eq!(errors.get("year"), Some("must be provided"));
        assert_eq!(errors.get("runtime"), Some("must be provided"));
        assert_eq!(errors.get("genres"), Some("must contain at least 1 genre"));
        assert_eq!(errors.get("title"), None);
    }

    #[test]
    fn create_dto_reads_runtime_string() {
        let input: CreateMovie = serde_json::from_str(
            r#"{"title": "Moana", "year": 2016, "runtime": "107 mins", "genres": ["animation"]}"#,
        )
        .unwrap();
        let movie = input.into_movie();
        assert_eq!(movie.runtime, Runtime(107));
        assert!(movie.validate().is_ok());
    }

    #[test]
    fn update_dto_applies_only_present_fields() {
        let mut movie = casablanca();
        movie.id = 9;
        movie.version = 4;

        let patch: UpdateMovie = serde_json::from_str(r#"{"year": 1943}"#).unwrap();
        patch.apply_to(&mut movie);

        assert_eq!(movie.year, 1943);
        assert_eq!(movie.title, "Casablanca");
        assert_eq!(movie.runtime, Runtime(102));
        assert_eq!(movie.id, 9);
        assert_eq!(movie.version, 4);
    }

    #[test]
    fn list_params_defaults() {
        let params = MovieListParams::default();
        assert_eq!(params.title_filter(), "");
        assert!(params.genre_filter().is_empty());

        let request = params.filters().validate().unwrap();
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn list_params_split_genres() {
        let params = MovieListParams {
            genres: Some("drama, ,comedy ".to_string()),
            ..Default::default()
        };
        assert_eq!(params.genre_filter(), vec!["drama", "comedy"]);
    }

    #[test]
    fn list_params_reject_unlisted_sort() {
        let params = MovieListParams {
            sort: Some("created_at".to_string()),
            ..Default::default()
        };
        let errors = params.filters().validate().unwrap_err();
        assert_eq!(errors.get("sort"), Some("invalid sort value"));
    }

    #[test]
    fn page_carries_metadata() {
        let request = Filters::for_movies(1, 5, "id").validate().unwrap();
        let page = MoviePage::new(vec![casablanca()], 12, &request);
        assert_eq!(page.metadata.last_page, 3);
        assert_eq!(page.movies.len(), 1);
    }
}
