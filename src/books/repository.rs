// Database repository for book records

use async_trait::async_trait;
use sqlx::PgPool;

use crate::books::models::{Book, BookRequest};
use crate::error::ApiError;
use crate::pagination::{PageRequest, PagedQueryBuilder};

const BOOK_COLUMNS: &str = "id, author, launch_date, price, title";

/// Persistence operations for book records
#[async_trait]
pub trait BookStore: Send + Sync {
    /// One page sorted by author, plus the total row count
    async fn find_page(&self, request: &PageRequest) -> Result<(Vec<Book>, u64), ApiError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, ApiError>;

    async fn insert(&self, book: &BookRequest) -> Result<Book, ApiError>;

    /// `None` when no row has this id
    async fn update(&self, id: i64, book: &BookRequest) -> Result<Option<Book>, ApiError>;

    /// `false` when no row has this id
    async fn delete(&self, id: i64) -> Result<bool, ApiError>;
}

/// Book repository for database operations
#[derive(Clone)]
pub struct BookRepository {
    pool: PgPool,
}

impl BookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BookRepository {
    async fn find_page(&self, request: &PageRequest) -> Result<(Vec<Book>, u64), ApiError> {
        let mut builder = PagedQueryBuilder::new("books", BOOK_COLUMNS);
        builder.set_sort("author", request.direction);
        builder.set_pagination(request);

        let (sql, _) = builder.build();
        let content = sqlx::query_as::<_, Book>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let (count_sql, _) = builder.build_count();
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .fetch_one(&self.pool)
            .await?;

        Ok((content, u64::try_from(total).unwrap_or(0)))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, ApiError> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn insert(&self, book: &BookRequest) -> Result<Book, ApiError> {
        let created = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (author, launch_date, price, title) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(&book.author)
        .bind(book.launch_date)
        .bind(book.price)
        .bind(&book.title)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: i64, book: &BookRequest) -> Result<Option<Book>, ApiError> {
        let updated = sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET author = $2, launch_date = $3, price = $4, title = $5 \
             WHERE id = $1 RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(&book.author)
        .bind(book.launch_date)
        .bind(book.price)
        .bind(&book.title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
