use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::models::{NewUser, User};
use crate::repositories::base::{BaseRepository, Entity, Window};
use crate::schema::users;

/// Users are created and looked up, never edited through the API.
pub type UsersRepository<'c> = BaseRepository<'c, User>;

type UserPredicate = Box<dyn BoxableExpression<users::table, Pg, SqlType = Bool>>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UserFilter {
    pub id: Option<i32>,
    pub email: Option<String>,
}

impl UserFilter {
    pub fn id(id: i32) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }

    pub fn predicate(&self) -> Option<UserPredicate> {
        let id = self.id.map(|v| Box::new(users::id.eq(v)) as UserPredicate);
        let email = self
            .email
            .clone()
            .map(|v| Box::new(users::email.eq(v)) as UserPredicate);

        [id, email]
            .into_iter()
            .flatten()
            .reduce(|acc, next| Box::new(acc.and(next)) as UserPredicate)
    }
}

#[async_trait]
impl Entity for User {
    const NAME: &'static str = "User";

    type Filter = UserFilter;
    type New = NewUser;

    async fn select(
        conn: &mut AsyncPgConnection,
        filter: &UserFilter,
        window: Option<Window>,
    ) -> QueryResult<Vec<User>> {
        let mut query = users::table
            .select(User::as_select())
            .order(users::id.asc())
            .into_boxed();
        if let Some(predicate) = filter.predicate() {
            query = query.filter(predicate);
        }
        if let Some(window) = window {
            query = query.limit(window.limit).offset(window.offset);
        }
        query.load(conn).await
    }

    async fn insert(conn: &mut AsyncPgConnection, record: NewUser) -> QueryResult<User> {
        diesel::insert_into(users::table)
            .values(&record)
            .returning(User::as_returning())
            .get_result(conn)
            .await
    }

    async fn remove(conn: &mut AsyncPgConnection, filter: &UserFilter) -> QueryResult<usize> {
        match filter.predicate() {
            Some(predicate) => {
                diesel::delete(users::table.filter(predicate))
                    .execute(conn)
                    .await
            }
            None => diesel::delete(users::table).execute(conn).await,
        }
    }
}
