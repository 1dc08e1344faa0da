//! Request context carrying the authenticated user.

use serde::{Deserialize, Serialize};

use biblio_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Extracted by middleware from the verified JWT and passed into service
/// methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: String,
    /// The user's display name (convenience field from JWT claims).
    pub name: String,
    /// The user's role at the time the JWT was issued.
    pub role: UserRole,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: String, name: String, role: UserRole) -> Self {
        Self {
            user_id,
            name,
            role,
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
