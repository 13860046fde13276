use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::{Hotel, NewHotel, PatchHotel, ReplaceHotel};
use crate::repositories::base::{BaseRepository, Changeset, Editable, Entity, Window};
use crate::schema::hotels;

pub type HotelsRepository<'c> = BaseRepository<'c, Hotel>;

type HotelPredicate = Box<dyn BoxableExpression<hotels::table, Pg, SqlType = Bool>>;

/// Hotel filter. `id` is an equality match; `title` and `location` match
/// case-insensitive substrings.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HotelFilter {
    pub id: Option<i32>,
    pub title: Option<String>,
    pub location: Option<String>,
}

impl HotelFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn predicate(&self) -> Option<HotelPredicate> {
        let id = self
            .id
            .map(|v| Box::new(hotels::id.eq(v)) as HotelPredicate);
        let title = self
            .title
            .as_deref()
            .map(|v| Box::new(hotels::title.ilike(contains_pattern(v))) as HotelPredicate);
        let location = self
            .location
            .as_deref()
            .map(|v| Box::new(hotels::location.ilike(contains_pattern(v))) as HotelPredicate);

        [id, title, location]
            .into_iter()
            .flatten()
            .reduce(|acc, next| Box::new(acc.and(next)) as HotelPredicate)
    }
}

/// `%term%` with LIKE metacharacters escaped.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

impl Changeset for PatchHotel {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.location.is_none()
    }
}

#[async_trait]
impl Entity for Hotel {
    const NAME: &'static str = "Hotel";

    type Filter = HotelFilter;
    type New = NewHotel;

    async fn select(
        conn: &mut AsyncPgConnection,
        filter: &HotelFilter,
        window: Option<Window>,
    ) -> QueryResult<Vec<Hotel>> {
        let mut query = hotels::table
            .select(Hotel::as_select())
            .order(hotels::id.asc())
            .into_boxed();
        if let Some(predicate) = filter.predicate() {
            query = query.filter(predicate);
        }
        if let Some(window) = window {
            query = query.limit(window.limit).offset(window.offset);
        }
        query.load(conn).await
    }

    async fn insert(conn: &mut AsyncPgConnection, record: NewHotel) -> QueryResult<Hotel> {
        diesel::insert_into(hotels::table)
            .values(&record)
            .returning(Hotel::as_returning())
            .get_result(conn)
            .await
    }

    async fn remove(conn: &mut AsyncPgConnection, filter: &HotelFilter) -> QueryResult<usize> {
        match filter.predicate() {
            Some(predicate) => {
                diesel::delete(hotels::table.filter(predicate))
                    .execute(conn)
                    .await
            }
            None => diesel::delete(hotels::table).execute(conn).await,
        }
    }
}

#[async_trait]
impl Editable for Hotel {
    type Replace = ReplaceHotel;
    type Patch = PatchHotel;

    async fn replace(
        conn: &mut AsyncPgConnection,
        changes: ReplaceHotel,
        filter: &HotelFilter,
    ) -> QueryResult<usize> {
        match filter.predicate() {
            Some(predicate) => {
                diesel::update(hotels::table.filter(predicate))
                    .set(&changes)
                    .execute(conn)
                    .await
            }
            None => diesel::update(hotels::table).set(&changes).execute(conn).await,
        }
    }

    async fn patch(
        conn: &mut AsyncPgConnection,
        changes: PatchHotel,
        filter: &HotelFilter,
    ) -> QueryResult<usize> {
        match filter.predicate() {
            Some(predicate) => {
                diesel::update(hotels::table.filter(predicate))
                    .set(&changes)
                    .execute(conn)
                    .await
            }
            None => diesel::update(hotels::table).set(&changes).execute(conn).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::debug_query;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("sea"), "%sea%");
        assert_eq!(contains_pattern("100%_"), r"%100\%\_%");
    }

    #[test]
    fn test_text_fields_use_ilike() {
        let predicate = HotelFilter::new()
            .title("grand")
            .location("Sochi")
            .predicate()
            .unwrap();
        let sql = debug_query::<Pg, _>(&hotels::table.filter(predicate)).to_string();

        assert!(sql.contains(r#""hotels"."title" ILIKE $1"#), "{sql}");
        assert!(sql.contains(r#""hotels"."location" ILIKE $2"#), "{sql}");
        assert!(sql.contains(r#"["%grand%", "%Sochi%"]"#), "{sql}");
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(HotelFilter::default().predicate().is_none());
        assert!(PatchHotel::default().is_empty());
    }
}
