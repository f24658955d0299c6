// In-memory store implementations and fixtures shared by the test modules

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::auth::{
    error::AuthError, models::User, password::PasswordService, repository::UserStore, TokenService,
};
use crate::books::{Book, BookRequest, BookStore};
use crate::config::JwtSettings;
use crate::error::ApiError;
use crate::pagination::{PageRequest, SortDirection};
use crate::people::{Person, PersonRequest, PersonStore};

pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes_only";

pub fn test_jwt_settings() -> JwtSettings {
    JwtSettings {
        secret: TEST_SECRET.to_string(),
        issuer: "people-books-api".to_string(),
        access_token_ttl_secs: 3600,
        refresh_token_ttl_secs: 10800,
    }
}

pub fn test_token_service() -> TokenService {
    TokenService::new(&test_jwt_settings())
}

/// Sort by `key` in the requested direction with id ascending as tie-breaker,
/// then cut out the requested page
fn page_of<T, K>(mut rows: Vec<T>, key: K, request: &PageRequest) -> (Vec<T>, u64)
where
    K: Fn(&T) -> (String, i64),
{
    rows.sort_by(|a, b| {
        let (key_a, id_a) = key(a);
        let (key_b, id_b) = key(b);
        let ordering = match request.direction {
            SortDirection::Asc => key_a.cmp(&key_b),
            SortDirection::Desc => key_b.cmp(&key_a),
        };
        match ordering {
            Ordering::Equal => id_a.cmp(&id_b),
            other => other,
        }
    });

    let total = rows.len() as u64;
    let content = rows
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.size as usize)
        .collect();
    (content, total)
}

// ============================================================================
// Users
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an enabled user with an Argon2 hash of `password`
    pub fn add_user(&self, username: &str, password: &str, roles: &[&str]) {
        let password_hash = PasswordService::hash_password(password).unwrap();
        let mut users = self.users.lock().unwrap();
        let id = users.len() as i64 + 1;
        users.insert(
            username.to_string(),
            User {
                id,
                user_name: username.to_string(),
                full_name: username.to_string(),
                password_hash,
                account_non_expired: true,
                account_non_locked: true,
                credentials_non_expired: true,
                enabled: true,
                roles: roles.iter().map(|r| r.to_string()).collect(),
            },
        );
    }

    pub fn update_user<F: FnOnce(&mut User)>(&self, username: &str, change: F) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.get_mut(username) {
            change(user);
        }
    }

    pub fn remove_user(&self, username: &str) {
        self.users.lock().unwrap().remove(username);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        Ok(self.users.lock().unwrap().get(username).cloned())
    }
}

// ============================================================================
// People
// ============================================================================

#[derive(Default)]
pub struct InMemoryPersonStore {
    people: Mutex<Vec<Person>>,
}

impl InMemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an enabled person with placeholder address and gender
    pub fn seed(&self, first_name: &str, last_name: &str) -> Person {
        let mut people = self.people.lock().unwrap();
        let person = Person {
            id: people.iter().map(|p| p.id).max().unwrap_or(0) + 1,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            address: "Somewhere".to_string(),
            gender: "Male".to_string(),
            enabled: true,
        };
        people.push(person.clone());
        person
    }
}

#[async_trait]
impl PersonStore for InMemoryPersonStore {
    async fn find_page(
        &self,
        first_name: Option<&str>,
        request: &PageRequest,
    ) -> Result<(Vec<Person>, u64), ApiError> {
        let needle = first_name.map(str::to_lowercase);
        let rows: Vec<Person> = self
            .people
            .lock()
            .unwrap()
            .iter()
            .filter(|p| match &needle {
                Some(n) => p.first_name.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        Ok(page_of(rows, |p| (p.first_name.to_lowercase(), p.id), request))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Person>, ApiError> {
        Ok(self.people.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, person: &PersonRequest) -> Result<Person, ApiError> {
        let mut people = self.people.lock().unwrap();
        let created = Person {
            id: people.iter().map(|p| p.id).max().unwrap_or(0) + 1,
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            address: person.address.clone(),
            gender: person.gender.clone(),
            enabled: true,
        };
        people.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, person: &PersonRequest) -> Result<Option<Person>, ApiError> {
        let mut people = self.people.lock().unwrap();
        Ok(people.iter_mut().find(|p| p.id == id).map(|existing| {
            existing.first_name = person.first_name.clone();
            existing.last_name = person.last_name.clone();
            existing.address = person.address.clone();
            existing.gender = person.gender.clone();
            existing.clone()
        }))
    }

    async fn disable(&self, id: i64) -> Result<Option<Person>, ApiError> {
        let mut people = self.people.lock().unwrap();
        Ok(people.iter_mut().find(|p| p.id == id).map(|existing| {
            existing.enabled = false;
            existing.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let mut people = self.people.lock().unwrap();
        let before = people.len();
        people.retain(|p| p.id != id);
        Ok(people.len() < before)
    }
}

// ============================================================================
// Books
// ============================================================================

#[derive(Default)]
pub struct InMemoryBookStore {
    books: Mutex<Vec<Book>>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn find_page(&self, request: &PageRequest) -> Result<(Vec<Book>, u64), ApiError> {
        let rows = self.books.lock().unwrap().clone();
        Ok(page_of(rows, |b| (b.author.to_lowercase(), b.id), request))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Book>, ApiError> {
        Ok(self.books.lock().unwrap().iter().find(|b| b.id == id).cloned())
    }

    async fn insert(&self, book: &BookRequest) -> Result<Book, ApiError> {
        let mut books = self.books.lock().unwrap();
        let created = Book {
            id: books.iter().map(|b| b.id).max().unwrap_or(0) + 1,
            author: book.author.clone(),
            launch_date: book.launch_date,
            price: book.price,
            title: book.title.clone(),
        };
        books.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, book: &BookRequest) -> Result<Option<Book>, ApiError> {
        let mut books = self.books.lock().unwrap();
        Ok(books.iter_mut().find(|b| b.id == id).map(|existing| {
            existing.author = book.author.clone();
            existing.launch_date = book.launch_date;
            existing.price = book.price;
            existing.title = book.title.clone();
            existing.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let mut books = self.books.lock().unwrap();
        let before = books.len();
        books.retain(|b| b.id != id);
        Ok(books.len() < before)
    }
}
