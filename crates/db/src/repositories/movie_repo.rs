//! Repository for the `movies` table.
//!
//! Updates use optimistic concurrency: a write only lands if the row still
//! carries the version the caller read, and every successful write bumps the
//! version by one. No locks are held between the read and the write.

use cinedex_core::filters::PageRequest;
use cinedex_core::types::{DbId, Timestamp, Version};
use sqlx::PgPool;

use crate::context::OpContext;
use crate::error::StoreError;
use crate::models::movie::Movie;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, created_at, title, year, runtime, genres, version";

const ENTITY: &str = "Movie";

/// Predicates shared by the list page and its count. `$1` is the title search
/// text (NULL to skip), `$2` the required genres (empty to skip).
const LIST_FILTER: &str = "($1::text IS NULL \
     OR to_tsvector('simple', title) @@ plainto_tsquery('simple', $1)) \
     AND (cardinality($2::text[]) = 0 OR genres @> $2)";

/// Provides CRUD and list operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Fetch a movie by its ID.
    pub async fn get(pool: &PgPool, ctx: &OpContext, id: DbId) -> Result<Movie, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        ctx.run(
            "movies.get",
            sqlx::query_as::<_, Movie>(&query)
                .bind(id)
                .fetch_optional(pool),
        )
        .await?
        .ok_or(StoreError::NotFound { entity: ENTITY, id })
    }

    /// Insert a new movie.
    ///
    /// On success the store-assigned `id`, `created_at` and `version` are
    /// written back into `movie`. Fields are not validated here.
    pub async fn insert(
        pool: &PgPool,
        ctx: &OpContext,
        movie: &mut Movie,
    ) -> Result<(), StoreError> {
        let (id, created_at, version) = ctx
            .run(
                "movies.insert",
                sqlx::query_as::<_, (DbId, Timestamp, Version)>(
                    "INSERT INTO movies (title, year, runtime, genres) \
                     VALUES ($1, $2, $3, $4) \
                     RETURNING id, created_at, version",
                )
                .bind(&movie.title)
                .bind(movie.year)
                .bind(movie.runtime)
                .bind(&movie.genres)
                .fetch_one(pool),
            )
            .await?;

        movie.id = id;
        movie.created_at = created_at;
        movie.version = version;
        tracing::debug!(id, "Movie inserted");
        Ok(())
    }

    /// Write every mutable field of `movie`, provided the stored version still
    /// equals `movie.version`.
    ///
    /// On success `movie.version` is advanced to the new stored version. If no
    /// row matches the id and version together, returns
    /// [`StoreError::EditConflict`]; a missing id is reported the same way.
    pub async fn update(
        pool: &PgPool,
        ctx: &OpContext,
        movie: &mut Movie,
    ) -> Result<(), StoreError> {
        let new_version = ctx
            .run(
                "movies.update",
                sqlx::query_scalar::<_, Version>(
                    "UPDATE movies SET \
                        title = $1, \
                        year = $2, \
                        runtime = $3, \
                        genres = $4, \
                        version = version + 1 \
                     WHERE id = $5 AND version = $6 \
                     RETURNING version",
                )
                .bind(&movie.title)
                .bind(movie.year)
                .bind(movie.runtime)
                .bind(&movie.genres)
                .bind(movie.id)
                .bind(movie.version)
                .fetch_optional(pool),
            )
            .await?;

        match new_version {
            Some(version) => {
                movie.version = version;
                Ok(())
            }
            None => {
                tracing::debug!(
                    id = movie.id,
                    version = movie.version,
                    "Movie update matched no row at the expected version"
                );
                Err(StoreError::EditConflict {
                    entity: ENTITY,
                    id: movie.id,
                    version: movie.version,
                })
            }
        }
    }

    /// Delete a movie by ID.
    pub async fn delete(pool: &PgPool, ctx: &OpContext, id: DbId) -> Result<(), StoreError> {
        let result = ctx
            .run(
                "movies.delete",
                sqlx::query("DELETE FROM movies WHERE id = $1")
                    .bind(id)
                    .execute(pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { entity: ENTITY, id });
        }
        tracing::debug!(id, "Movie deleted");
        Ok(())
    }

    /// List one page of movies matching the title and genre filters.
    ///
    /// - `title`: full-text match against the title using the `simple`
    ///   configuration (case-insensitive, no stemming). Empty or
    ///   whitespace-only text matches all.
    /// - `genres`: the movie's genres must contain every listed genre. Empty
    ///   matches all.
    ///
    /// Rows are ordered by the requested column, then by ascending id so the
    /// order is total and pages never overlap or skip rows. Returns the page
    /// and the number of rows matching the filters across all pages. The
    /// count and the page are read from one snapshot, so the total stays
    /// correct when the page lies past the end.
    pub async fn list(
        pool: &PgPool,
        ctx: &OpContext,
        title: &str,
        genres: &[String],
        request: &PageRequest,
    ) -> Result<(Vec<Movie>, i64), StoreError> {
        let sort = request.sort();
        let count_query = format!("SELECT count(*) FROM movies WHERE {LIST_FILTER}");
        let page_query = format!(
            "SELECT {COLUMNS} FROM movies \
             WHERE {LIST_FILTER} \
             ORDER BY {} {}, id ASC \
             LIMIT $3 OFFSET $4",
            sort.column.as_sql(),
            sort.direction.as_sql(),
        );

        let title = Some(title.trim()).filter(|t| !t.is_empty());

        ctx.run("movies.list", async {
            let mut tx = pool.begin().await?;
            sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
                .execute(&mut *tx)
                .await?;

            let total_records = sqlx::query_scalar::<_, i64>(&count_query)
                .bind(title)
                .bind(genres)
                .fetch_one(&mut *tx)
                .await?;

            let movies = sqlx::query_as::<_, Movie>(&page_query)
                .bind(title)
                .bind(genres)
                .bind(request.limit())
                .bind(request.offset())
                .fetch_all(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok::<_, sqlx::Error>((movies, total_records))
        })
        .await
    }
}
