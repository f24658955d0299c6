// Route authorization policy
// Maps (method, path) to the roles allowed to call it

use axum::http::Method;

use crate::auth::models::{ROLE_ADMIN, ROLE_COMMON_USER, ROLE_MANAGER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MethodClass {
    Read,
    Write,
}

impl MethodClass {
    fn of(method: &Method) -> Option<Self> {
        if method == Method::GET || method == Method::HEAD {
            Some(MethodClass::Read)
        } else if method == Method::POST
            || method == Method::PUT
            || method == Method::PATCH
            || method == Method::DELETE
        {
            Some(MethodClass::Write)
        } else {
            None
        }
    }
}

struct PolicyRule {
    prefix: &'static str,
    methods: MethodClass,
    roles: &'static [&'static str],
}

const READERS: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_COMMON_USER];
const WRITERS: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER];

/// Ordered rule table; the first rule matching both path and method wins
const RULES: &[PolicyRule] = &[
    PolicyRule { prefix: "/api/person/v1", methods: MethodClass::Read, roles: READERS },
    PolicyRule { prefix: "/api/person/v1", methods: MethodClass::Write, roles: WRITERS },
    PolicyRule { prefix: "/api/books/v1", methods: MethodClass::Read, roles: READERS },
    PolicyRule { prefix: "/api/books/v1", methods: MethodClass::Write, roles: WRITERS },
];

/// `path` equals `prefix` or continues it past a `/` segment boundary
fn path_matches(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Roles allowed to call `method` on `path`
///
/// `None` means no rule applies and any authenticated caller may proceed.
pub fn required_roles(method: &Method, path: &str) -> Option<&'static [&'static str]> {
    let class = MethodClass::of(method)?;
    RULES
        .iter()
        .find(|rule| rule.methods == class && path_matches(rule.prefix, path))
        .map(|rule| rule.roles)
}

/// True when `roles` satisfies the policy for `method` on `path`
pub fn is_allowed(method: &Method, path: &str, roles: &[String]) -> bool {
    match required_roles(method, path) {
        Some(allowed) => roles.iter().any(|role| allowed.contains(&role.as_str())),
        None => true,
    }
}
