use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Paging parameters extracted from the query string
/// All fields are optional; defaults are applied by `PageRequest::try_from`
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// Zero-based page number
    pub page: Option<u32>,
    /// Items per page
    pub size: Option<u32>,
    /// "asc" or "desc", case-insensitive
    pub direction: Option<String>,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn parse(s: &str) -> Result<Self, ApiError> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(ApiError::BadRequest(format!(
                "Invalid direction '{}'. Must be 'asc' or 'desc'",
                s
            ))),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Validated paging request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            direction: SortDirection::Asc,
        }
    }
}

impl PageRequest {
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl TryFrom<PageParams> for PageRequest {
    type Error = ApiError;

    fn try_from(params: PageParams) -> Result<Self, Self::Error> {
        let size = params.size.unwrap_or(DEFAULT_PAGE_SIZE);
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(ApiError::BadRequest(format!(
                "size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let direction = match params.direction.as_deref() {
            Some(d) if !d.trim().is_empty() => SortDirection::parse(d)?,
            _ => SortDirection::Asc,
        };

        Ok(Self {
            page: params.page.unwrap_or(0),
            size,
            direction,
        })
    }
}

/// Page metadata returned alongside paged content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u32,
}

/// A page of results
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: PageMetadata,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size);
        Self {
            content,
            page: PageMetadata {
                size: request.size,
                total_elements,
                total_pages: total_elements.div_ceil(size),
                number: request.page,
            },
        }
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// SQL builder for paged listing queries
/// Produces a content query and a matching count query with the same filters
pub struct PagedQueryBuilder {
    table: &'static str,
    columns: &'static str,
    where_clauses: Vec<String>,
    params: Vec<String>,
    order_clause: Option<String>,
    limit: u32,
    offset: u64,
}

impl PagedQueryBuilder {
    pub fn new(table: &'static str, columns: &'static str) -> Self {
        Self {
            table,
            columns,
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_clause: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }

    /// Adds a case-insensitive substring filter on a column
    ///
    /// `%` and `_` in the value match literally.
    pub fn add_contains_filter(&mut self, column: &'static str, value: &str) {
        let param_index = self.params.len() + 1;
        self.where_clauses
            .push(format!("LOWER({}) LIKE ${} ESCAPE '\\'", column, param_index));
        self.params
            .push(format!("%{}%", escape_like(&value.to_lowercase())));
    }

    /// Sorts by a column, with id as tie-breaker so pages are stable
    pub fn set_sort(&mut self, column: &'static str, direction: SortDirection) {
        self.order_clause = Some(format!("{} {}, id ASC", column, direction.as_sql()));
    }

    pub fn set_pagination(&mut self, request: &PageRequest) {
        self.limit = request.size;
        self.offset = request.offset();
    }

    fn where_sql(&self) -> String {
        if self.where_clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.where_clauses.join(" AND "))
        }
    }

    /// Builds the content query and its bound parameters
    pub fn build(&self) -> (String, Vec<String>) {
        let mut query = format!("SELECT {} FROM {}", self.columns, self.table);
        query.push_str(&self.where_sql());

        if let Some(ref order) = self.order_clause {
            query.push_str(" ORDER BY ");
            query.push_str(order);
        }

        // LIMIT/OFFSET are inlined; Postgres rejects them as text parameters
        query.push_str(&format!(" LIMIT {} OFFSET {}", self.limit, self.offset));

        (query, self.params.clone())
    }

    /// Builds the total count query for the same filters
    pub fn build_count(&self) -> (String, Vec<String>) {
        let query = format!("SELECT COUNT(*) FROM {}{}", self.table, self.where_sql());
        (query, self.params.clone())
    }
}
