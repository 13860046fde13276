//! Generic data access over one table.
//!
//! Each entity row type describes its own table through [`Entity`] (and
//! [`Editable`] when it can be updated); [`BaseRepository`] layers the shared
//! CRUD contract, logging and error conversion on top.

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use diesel::QueryResult;
use diesel_async::AsyncPgConnection;
use tracing::debug;

use crate::error::{AppError, AppResult, DatabaseErrorConverter};

/// `LIMIT`/`OFFSET` pair applied to a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: i64,
    pub offset: i64,
}

impl Window {
    /// Window for a 1-based page: offset `per_page * (page - 1)`, limit `per_page`.
    pub fn page(page: u32, per_page: u32) -> Self {
        let per_page = i64::from(per_page);
        Self {
            limit: per_page,
            offset: per_page * (i64::from(page.max(1)) - 1),
        }
    }
}

/// A set of column updates that may turn out to be empty.
pub trait Changeset {
    fn is_empty(&self) -> bool;
}

/// Table description for a row type.
///
/// `Filter` is a conjunction of equality predicates; its `Default` matches
/// every row. Implementations return raw diesel results and leave error
/// conversion to [`BaseRepository`].
#[async_trait]
pub trait Entity: Sized + Send + 'static {
    /// Name used in error messages, e.g. "Room"
    const NAME: &'static str;

    type Filter: Debug + Default + Send + Sync;
    type New: Send;

    /// Matching rows ordered by primary key.
    async fn select(
        conn: &mut AsyncPgConnection,
        filter: &Self::Filter,
        window: Option<Window>,
    ) -> QueryResult<Vec<Self>>;

    async fn insert(conn: &mut AsyncPgConnection, record: Self::New) -> QueryResult<Self>;

    async fn remove(conn: &mut AsyncPgConnection, filter: &Self::Filter) -> QueryResult<usize>;
}

/// Entities that support both update flavours.
#[async_trait]
pub trait Editable: Entity {
    /// Every column, absent optionals written as NULL
    type Replace: Send;
    /// Only the provided columns
    type Patch: Changeset + Send;

    async fn replace(
        conn: &mut AsyncPgConnection,
        changes: Self::Replace,
        filter: &Self::Filter,
    ) -> QueryResult<usize>;

    async fn patch(
        conn: &mut AsyncPgConnection,
        changes: Self::Patch,
        filter: &Self::Filter,
    ) -> QueryResult<usize>;
}

/// Update payload: a full replacement or a partial patch.
pub enum Changes<E: Editable> {
    Replace(E::Replace),
    Patch(E::Patch),
}

impl<E: Editable> Changes<E> {
    pub fn is_partial(&self) -> bool {
        matches!(self, Changes::Patch(_))
    }
}

/// CRUD over entity `E`, borrowing the caller's connection.
///
/// The connection is normally the one handed out by
/// [`Database::scoped`](crate::db::Database::scoped), so every write joins
/// the caller's transaction. The repository never commits.
pub struct BaseRepository<'c, E> {
    conn: &'c mut AsyncPgConnection,
    _entity: PhantomData<fn() -> E>,
}

impl<'c, E: Entity> BaseRepository<'c, E> {
    pub fn new(conn: &'c mut AsyncPgConnection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    /// All rows matching `filter`; every row when the filter is empty.
    pub async fn get_all(&mut self, filter: &E::Filter) -> AppResult<Vec<E>> {
        debug!(entity = E::NAME, ?filter, "Selecting all");
        E::select(self.conn, filter, None)
            .await
            .map_err(|e| Self::convert(e, "select"))
    }

    pub async fn get_page(&mut self, filter: &E::Filter, window: Window) -> AppResult<Vec<E>> {
        debug!(
            entity = E::NAME,
            ?filter,
            limit = window.limit,
            offset = window.offset,
            "Selecting page"
        );
        E::select(self.conn, filter, Some(window))
            .await
            .map_err(|e| Self::convert(e, "select page"))
    }

    /// The single matching row, if any.
    ///
    /// # Errors
    ///
    /// `AppError::AmbiguousMatch` when more than one row matches.
    pub async fn get_one_or_none(&mut self, filter: &E::Filter) -> AppResult<Option<E>> {
        debug!(entity = E::NAME, ?filter, "Selecting one");
        let mut rows = E::select(self.conn, filter, Some(Window { limit: 2, offset: 0 }))
            .await
            .map_err(|e| Self::convert(e, "select one"))?;

        if rows.len() > 1 {
            return Err(AppError::AmbiguousMatch {
                entity: E::NAME.to_string(),
                found: rows.len(),
            });
        }
        Ok(rows.pop())
    }

    /// Inserts and returns the stored row with its generated id.
    pub async fn add(&mut self, record: E::New) -> AppResult<E> {
        debug!(entity = E::NAME, "Inserting");
        E::insert(self.conn, record)
            .await
            .map_err(|e| Self::convert(e, "insert"))
    }

    /// Removes matching rows. Matching nothing is not an error.
    pub async fn delete(&mut self, filter: &E::Filter) -> AppResult<()> {
        let removed = E::remove(self.conn, filter)
            .await
            .map_err(|e| Self::convert(e, "delete"))?;
        debug!(entity = E::NAME, ?filter, removed, "Deleted");
        Ok(())
    }

    fn convert(error: diesel::result::Error, operation: &str) -> AppError {
        DatabaseErrorConverter::convert_diesel_error(error, &format!("{} {}", operation, E::NAME))
    }
}

impl<'c, E: Editable> BaseRepository<'c, E> {
    /// Applies `changes` to matching rows and returns how many were updated.
    ///
    /// An empty patch issues no statement and reports zero rows.
    pub async fn edit(&mut self, changes: Changes<E>, filter: &E::Filter) -> AppResult<usize> {
        let partial = changes.is_partial();
        let updated = match changes {
            Changes::Replace(values) => E::replace(self.conn, values, filter).await,
            Changes::Patch(values) if values.is_empty() => {
                debug!(entity = E::NAME, ?filter, "Empty patch, nothing to update");
                return Ok(0);
            }
            Changes::Patch(values) => E::patch(self.conn, values, filter).await,
        }
        .map_err(|e| Self::convert(e, "update"))?;

        debug!(entity = E::NAME, ?filter, partial, updated, "Updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_page_starts_at_zero() {
        assert_eq!(Window::page(1, 5), Window { limit: 5, offset: 0 });
        assert_eq!(Window::page(3, 4), Window { limit: 4, offset: 8 });
    }

    #[test]
    fn test_page_zero_is_clamped_to_first_page() {
        assert_eq!(Window::page(0, 5).offset, 0);
    }

    proptest! {
        #[test]
        fn prop_window_matches_page_arithmetic(page in 1u32..100_000, per_page in 1u32..10) {
            let window = Window::page(page, per_page);
            prop_assert_eq!(window.limit, i64::from(per_page));
            prop_assert_eq!(window.offset, i64::from(per_page) * (i64::from(page) - 1));
        }

        #[test]
        fn prop_consecutive_pages_do_not_overlap(page in 1u32..100_000, per_page in 1u32..10) {
            let current = Window::page(page, per_page);
            let next = Window::page(page + 1, per_page);
            prop_assert_eq!(current.offset + current.limit, next.offset);
        }
    }
}
