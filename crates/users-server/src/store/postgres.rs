use async_trait::async_trait;
use chrono::{DateTime, Utc};
use users_shared::User;

use super::{StoreError, UserStore};
use crate::db::DbPool;
use crate::deadline::Deadline;

type UserRow = (
    i32,                       // usr_id
    String,                    // email
    String,                    // name
    String,                    // surname
    DateTime<Utc>,             // created_at
    Option<DateTime<Utc>>,     // updated_at
);

fn row_to_user(row: UserRow) -> User {
    let (id, email, name, surname, created_at, updated_at) = row;
    User {
        id,
        email,
        name,
        surname,
        created_at,
        updated_at,
    }
}

/// Postgres-backed [`UserStore`]. Expects a `users` table with a `SERIAL`
/// `usr_id` and `TIMESTAMPTZ` `created_at` (default `now()`) / `updated_at`.
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(
        &self,
        deadline: &Deadline,
        email: &str,
        name: &str,
        surname: &str,
    ) -> Result<i32, StoreError> {
        let (id,) = deadline
            .run(async {
                sqlx::query_as::<_, (i32,)>(
                    r#"
                    INSERT INTO users (email, name, surname)
                    VALUES ($1, $2, $3)
                    RETURNING usr_id
                    "#,
                )
                .bind(email)
                .bind(name)
                .bind(surname)
                .fetch_one(&self.pool)
                .await
                .map_err(StoreError::from)
            })
            .await?;

        Ok(id)
    }

    async fn get(&self, deadline: &Deadline, id: i32) -> Result<User, StoreError> {
        let row = deadline
            .run(async {
                sqlx::query_as::<_, UserRow>(
                    r#"
                    SELECT usr_id, email, COALESCE(name, ''), COALESCE(surname, ''), created_at, updated_at
                    FROM users
                    WHERE usr_id = $1
                    "#,
                )
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(StoreError::from)
            })
            .await?;

        row.map(row_to_user).ok_or(StoreError::NotFound)
    }

    async fn list(&self, deadline: &Deadline) -> Result<Vec<User>, StoreError> {
        let rows = deadline
            .run(async {
                sqlx::query_as::<_, UserRow>(
                    r#"
                    SELECT usr_id, email, COALESCE(name, ''), COALESCE(surname, ''), created_at, updated_at
                    FROM users
                    ORDER BY usr_id
                    "#,
                )
                .fetch_all(&self.pool)
                .await
                .map_err(StoreError::from)
            })
            .await?;

        Ok(rows.into_iter().map(row_to_user).collect())
    }

    async fn update(
        &self,
        deadline: &Deadline,
        id: i32,
        email: &str,
        name: &str,
        surname: &str,
    ) -> Result<User, StoreError> {
        let row = deadline
            .run(async {
                sqlx::query_as::<_, UserRow>(
                    r#"
                    UPDATE users
                    SET email = $1, name = $2, surname = $3, updated_at = now()
                    WHERE usr_id = $4
                    RETURNING usr_id, email, COALESCE(name, ''), COALESCE(surname, ''), created_at, updated_at
                    "#,
                )
                .bind(email)
                .bind(name)
                .bind(surname)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(StoreError::from)
            })
            .await?;

        row.map(row_to_user).ok_or(StoreError::NotFound)
    }

    async fn delete(&self, deadline: &Deadline, id: i32) -> Result<(), StoreError> {
        let result = deadline
            .run(async {
                sqlx::query("DELETE FROM users WHERE usr_id = $1")
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .map_err(StoreError::from)
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
