use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::database::models::{Person, PersonRow};
use crate::database::repository::{Page, PersonRepository, StorageError};

/// DDL for the `persons` table. Not applied by the server.
pub const SCHEMA: &str = include_str!("../../schema/persons.sql");

const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL-backed repository. One parameterized statement per call, no
/// explicit transactions.
#[derive(Clone)]
pub struct PostgresPersonRepository {
    pool: PgPool,
}

impl PostgresPersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn encode_hobbies(op: &'static str, hobbies: &[String]) -> Result<serde_json::Value, StorageError> {
    serde_json::to_value(hobbies).map_err(|source| StorageError::Serialization { op, source })
}

fn decode_row(op: &'static str, row: PersonRow) -> Result<Person, StorageError> {
    row.into_person()
        .map_err(|source| StorageError::Serialization { op, source })
}

fn db_error(op: &'static str) -> impl FnOnce(sqlx::Error) -> StorageError {
    move |source| StorageError::Database { op, source }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

#[async_trait]
impl PersonRepository for PostgresPersonRepository {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, ctx: &RequestContext, person: Person) -> Result<(), StorageError> {
        const OP: &str = "create person";
        let hobbies = encode_hobbies(OP, &person.hobbies)?;

        ctx.run(OP, async {
            sqlx::query("INSERT INTO persons (id, name, age, hobbies) VALUES ($1, $2, $3, $4)")
                .bind(person.id)
                .bind(&person.name)
                .bind(person.age)
                .bind(&hobbies)
                .execute(&self.pool)
                .await
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        StorageError::AlreadyExists(person.id)
                    } else {
                        StorageError::Database { op: OP, source: err }
                    }
                })?;
            Ok(())
        })
        .await
    }

    async fn get_all(&self, ctx: &RequestContext, page: Page) -> Result<Vec<Person>, StorageError> {
        const OP: &str = "list persons";

        let rows = ctx
            .run(OP, async {
                sqlx::query_as::<_, PersonRow>(
                    "SELECT id, name, age, hobbies FROM persons ORDER BY created_at DESC LIMIT $1 OFFSET $2",
                )
                .bind(i64::from(page.limit))
                .bind(i64::from(page.offset))
                .fetch_all(&self.pool)
                .await
                .map_err(db_error(OP))
            })
            .await?;

        rows.into_iter().map(|row| decode_row(OP, row)).collect()
    }

    async fn update(&self, ctx: &RequestContext, person: Person) -> Result<(), StorageError> {
        const OP: &str = "update person";
        let hobbies = encode_hobbies(OP, &person.hobbies)?;

        let result = ctx
            .run(OP, async {
                sqlx::query("UPDATE persons SET name = $1, age = $2, hobbies = $3, updated_at = NOW() WHERE id = $4")
                    .bind(&person.name)
                    .bind(person.age)
                    .bind(&hobbies)
                    .bind(person.id)
                    .execute(&self.pool)
                    .await
                    .map_err(db_error(OP))
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(person.id));
        }
        Ok(())
    }

    async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), StorageError> {
        const OP: &str = "delete person";

        let result = ctx
            .run(OP, async {
                sqlx::query("DELETE FROM persons WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .map_err(db_error(OP))
            })
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(id));
        }
        Ok(())
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: Uuid) -> Result<Person, StorageError> {
        const OP: &str = "get person";

        let row = ctx
            .run(OP, async {
                sqlx::query_as::<_, PersonRow>("SELECT id, name, age, hobbies FROM persons WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(db_error(OP))
            })
            .await?
            .ok_or(StorageError::NotFound(id))?;

        decode_row(OP, row)
    }

    async fn health_check(&self, ctx: &RequestContext) -> Result<(), StorageError> {
        const OP: &str = "ping database";

        ctx.run(OP, async {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(db_error(OP))?;
            Ok(())
        })
        .await
    }
}
