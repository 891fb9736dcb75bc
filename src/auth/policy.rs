use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::middleware::CurrentUser;
use crate::error::ApiError;
use crate::users::repo::Role;

/// Who may reach a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Anyone,
    Authenticated,
    Roles(&'static [Role]),
}

struct Rule {
    prefix: &'static str,
    methods: Option<&'static [Method]>,
    access: Access,
}

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const FINANCE_WRITE: &[Role] = &[Role::Admin, Role::FinanceManager];
const FINANCE_READ: &[Role] = &[Role::Admin, Role::FinanceManager, Role::Viewer];

/// Route policy, first match wins. Paths are as seen inside the /api nest.
/// Requests matching no rule require authentication with any role.
static RULES: &[Rule] = &[
    Rule {
        prefix: "/auth",
        methods: None,
        access: Access::Anyone,
    },
    Rule {
        prefix: "/users",
        methods: None,
        access: Access::Roles(ADMIN_ONLY),
    },
    Rule {
        prefix: "/payments",
        methods: Some(&[Method::GET]),
        access: Access::Roles(FINANCE_READ),
    },
    Rule {
        prefix: "/payments",
        methods: Some(&[Method::POST, Method::PUT]),
        access: Access::Roles(FINANCE_WRITE),
    },
    Rule {
        prefix: "/payments",
        methods: Some(&[Method::DELETE]),
        access: Access::Roles(ADMIN_ONLY),
    },
];

fn matches_prefix(path: &str, prefix: &str) -> bool {
    path == prefix || (path.starts_with(prefix) && path.as_bytes()[prefix.len()] == b'/')
}

pub fn required_access(method: &Method, path: &str) -> Access {
    RULES
        .iter()
        .find(|rule| {
            matches_prefix(path, rule.prefix)
                && rule.methods.map_or(true, |ms| ms.contains(method))
        })
        .map(|rule| rule.access)
        .unwrap_or(Access::Authenticated)
}

/// Decide whether the given identity may proceed under the given access rule.
pub fn check(access: Access, user: Option<&CurrentUser>) -> Result<(), ApiError> {
    match access {
        Access::Anyone => Ok(()),
        Access::Authenticated => match user {
            Some(_) => Ok(()),
            None => Err(ApiError::Unauthorized("authentication required".into())),
        },
        Access::Roles(allowed) => match user {
            None => Err(ApiError::Unauthorized("authentication required".into())),
            Some(u) if allowed.contains(&u.role) => Ok(()),
            Some(u) => {
                warn!(user_id = u.id, role = %u.role, "insufficient role");
                Err(ApiError::Forbidden)
            }
        },
    }
}

/// Authorization layer, evaluated after the authentication gate and before
/// the handler.
pub async fn authorize(req: Request, next: Next) -> Result<Response, ApiError> {
    let access = required_access(req.method(), req.uri().path());
    check(access, req.extensions().get::<CurrentUser>())?;
    Ok(next.run(req).await)
}
