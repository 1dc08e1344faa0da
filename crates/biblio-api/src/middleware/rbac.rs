//! Role guards for admin-only routes.
//!
//! Guards check the role claim carried in the token. Routes stay visible
//! to every caller; non-admins get a 403, never a 404.

use biblio_core::error::AppError;

use crate::extractors::AuthUser;

/// Checks that the authenticated user has the admin role.
pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    if !auth.is_admin() {
        return Err(AppError::authorization("Admin access required"));
    }
    Ok(())
}
