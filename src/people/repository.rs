// Database repository for person records

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::pagination::{PageRequest, PagedQueryBuilder};
use crate::people::models::{Person, PersonRequest};

const PERSON_COLUMNS: &str = "id, first_name, last_name, address, gender, enabled";

/// Persistence operations for person records
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// One page sorted by first name, optionally filtered by a
    /// case-insensitive first-name substring, plus the total match count
    async fn find_page(
        &self,
        first_name: Option<&str>,
        request: &PageRequest,
    ) -> Result<(Vec<Person>, u64), ApiError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Person>, ApiError>;

    async fn insert(&self, person: &PersonRequest) -> Result<Person, ApiError>;

    /// `None` when no row has this id
    async fn update(&self, id: i64, person: &PersonRequest) -> Result<Option<Person>, ApiError>;

    /// Sets `enabled = false`; `None` when no row has this id
    async fn disable(&self, id: i64) -> Result<Option<Person>, ApiError>;

    /// `false` when no row has this id
    async fn delete(&self, id: i64) -> Result<bool, ApiError>;
}

/// Person repository for database operations
#[derive(Clone)]
pub struct PersonRepository {
    pool: PgPool,
}

impl PersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonStore for PersonRepository {
    async fn find_page(
        &self,
        first_name: Option<&str>,
        request: &PageRequest,
    ) -> Result<(Vec<Person>, u64), ApiError> {
        let mut builder = PagedQueryBuilder::new("person", PERSON_COLUMNS);
        if let Some(name) = first_name {
            builder.add_contains_filter("first_name", name);
        }
        builder.set_sort("first_name", request.direction);
        builder.set_pagination(request);

        let (sql, params) = builder.build();
        let mut query = sqlx::query_as::<_, Person>(&sql);
        for param in &params {
            query = query.bind(param.as_str());
        }
        let content = query.fetch_all(&self.pool).await?;

        let (count_sql, count_params) = builder.build_count();
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for param in &count_params {
            count_query = count_query.bind(param.as_str());
        }
        let total = count_query.fetch_one(&self.pool).await?;

        Ok((content, u64::try_from(total).unwrap_or(0)))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Person>, ApiError> {
        let person = sqlx::query_as::<_, Person>(&format!(
            "SELECT {} FROM person WHERE id = $1",
            PERSON_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(person)
    }

    async fn insert(&self, person: &PersonRequest) -> Result<Person, ApiError> {
        let created = sqlx::query_as::<_, Person>(&format!(
            "INSERT INTO person (first_name, last_name, address, gender) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            PERSON_COLUMNS
        ))
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(&person.address)
        .bind(&person.gender)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i64, person: &PersonRequest) -> Result<Option<Person>, ApiError> {
        let updated = sqlx::query_as::<_, Person>(&format!(
            "UPDATE person SET first_name = $2, last_name = $3, address = $4, gender = $5 \
             WHERE id = $1 RETURNING {}",
            PERSON_COLUMNS
        ))
        .bind(id)
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(&person.address)
        .bind(&person.gender)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn disable(&self, id: i64) -> Result<Option<Person>, ApiError> {
        let disabled = sqlx::query_as::<_, Person>(&format!(
            "UPDATE person SET enabled = FALSE WHERE id = $1 RETURNING {}",
            PERSON_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(disabled)
    }

    async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM person WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
