use std::sync::Arc;

use tracing::info;
use validator::Validate;

use crate::error::ApiError;
use crate::pagination::{Page, PageRequest};
use crate::people::{Person, PersonRequest, PersonStore};

const RESOURCE: &str = "Person";

/// Service for person business logic
#[derive(Clone)]
pub struct PersonService {
    store: Arc<dyn PersonStore>,
}

impl PersonService {
    pub fn new(store: Arc<dyn PersonStore>) -> Self {
        Self { store }
    }

    /// List people sorted by first name
    pub async fn find_all(&self, request: PageRequest) -> Result<Page<Person>, ApiError> {
        info!("Finding all people (page={}, size={})", request.page, request.size);
        let (content, total) = self.store.find_page(None, &request).await?;
        Ok(Page::new(content, &request, total))
    }

    /// List people whose first name contains `first_name`, ignoring case
    pub async fn find_by_name(
        &self,
        first_name: &str,
        request: PageRequest,
    ) -> Result<Page<Person>, ApiError> {
        info!("Finding people by first name '{}'", first_name);
        let (content, total) = self.store.find_page(Some(first_name), &request).await?;
        Ok(Page::new(content, &request, total))
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Person, ApiError> {
        info!("Finding person {}", id);
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotFound { resource: RESOURCE, id })
    }

    pub async fn create(&self, request: PersonRequest) -> Result<Person, ApiError> {
        request.validate()?;
        let person = self.store.insert(&request).await?;
        info!("Created person {}", person.id);
        Ok(person)
    }

    /// Replace every field of the person named by `request.id`
    pub async fn update(&self, request: PersonRequest) -> Result<Person, ApiError> {
        request.validate()?;
        let id = request
            .id
            .ok_or_else(|| ApiError::BadRequest("id is required for update".to_string()))?;

        let person = self
            .store
            .update(id, &request)
            .await?
            .ok_or(ApiError::NotFound { resource: RESOURCE, id })?;
        info!("Updated person {}", id);
        Ok(person)
    }

    /// Soft-disable a person; the record stays readable with `enabled = false`
    pub async fn disable(&self, id: i64) -> Result<Person, ApiError> {
        let person = self
            .store
            .disable(id)
            .await?
            .ok_or(ApiError::NotFound { resource: RESOURCE, id })?;
        info!("Disabled person {}", id);
        Ok(person)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        if !self.store.delete(id).await? {
            return Err(ApiError::NotFound { resource: RESOURCE, id });
        }
        info!("Deleted person {}", id);
        Ok(())
    }
}
