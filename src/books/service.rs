use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::books::{Book, BookRequest, BookStore};
use crate::error::ApiError;
use crate::pagination::{Page, PageRequest};

const RESOURCE: &str = "Book";

/// Service for book business logic
#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn BookStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self { store }
    }

    /// List books sorted by author
    pub async fn find_all(&self, request: PageRequest) -> Result<Page<Book>, ApiError> {
        info!("Finding all books (page={}, size={})", request.page, request.size);
        let (content, total) = self.store.find_page(&request).await?;
        Ok(Page::new(content, &request, total))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Book, ApiError> {
        info!("Finding book {}", id);
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotFound { resource: RESOURCE, id })
    }

    pub async fn create(&self, request: BookRequest) -> Result<Book, ApiError> {
        request.validate()?;
        let book = self.store.insert(&request).await?;
        info!("Created book {}", book.id);
        Ok(book)
    }

    /// Replace every field of the book named by `request.id`
    pub async fn update(&self, request: BookRequest) -> Result<Book, ApiError> {
        request.validate()?;
        let id = request
            .id
            .ok_or_else(|| ApiError::BadRequest("id is required for update".to_string()))?;

        let book = self
            .store
            .update(id, &request)
            .await?
            .ok_or(ApiError::NotFound { resource: RESOURCE, id })?;
        info!("Updated book {}", id);
        Ok(book)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        if !self.store.delete(id).await? {
            return Err(ApiError::NotFound { resource: RESOURCE, id });
        }
        info!("Deleted book {}", id);
        Ok(())
    }
}
