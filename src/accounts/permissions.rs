// Authorization predicates
//
// Authentication itself is the AuthenticatedUser extractor; these predicates
// decide what an already-authenticated caller may do. They are plain functions
// over the caller identity and an optional target row, combinable with
// ordinary boolean logic instead of a permission-class hierarchy.

use crate::accounts::error::AuthError;
use crate::accounts::middleware::AuthenticatedUser;
use crate::accounts::models::{Account, Role};

/// The caller holds the admin role
pub fn is_admin(user: &AuthenticatedUser) -> bool {
    user.role == Role::Admin
}

/// Per-object rule: the caller owns the target account or is an admin.
/// Evaluated after the target row is loaded.
pub fn is_self_or_admin(user: &AuthenticatedUser, target: &Account) -> bool {
    user.user_id == target.id || is_admin(user)
}

/// Deny with 403 unless the caller is an admin
pub fn require_admin(user: &AuthenticatedUser) -> Result<(), AuthError> {
    if is_admin(user) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Deny with 403 unless the caller owns the target or is an admin
pub fn require_self_or_admin(user: &AuthenticatedUser, target: &Account) -> Result<(), AuthError> {
    if is_self_or_admin(user, target) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn caller(id: i32, role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: id,
            email: format!("user{}@example.com", id),
            role,
        }
    }

    fn account(id: i32) -> Account {
        Account {
            id,
            email: format!("user{}@example.com", id),
            password_hash: "hash".to_string(),
            role: Role::User,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            first_name: String::new(),
            last_name: String::new(),
            company_id: 1,
            last_login: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_predicate() {
        assert!(is_admin(&caller(1, Role::Admin)));
        assert!(!is_admin(&caller(1, Role::User)));
    }

    #[test]
    fn test_self_or_admin_allows_owner() {
        assert!(is_self_or_admin(&caller(7, Role::User), &account(7)));
    }

    #[test]
    fn test_self_or_admin_denies_other_user() {
        assert!(!is_self_or_admin(&caller(7, Role::User), &account(8)));
    }

    #[test]
    fn test_self_or_admin_allows_admin_on_any_target() {
        assert!(is_self_or_admin(&caller(1, Role::Admin), &account(8)));
        assert!(is_self_or_admin(&caller(8, Role::Admin), &account(8)));
    }

    #[test]
    fn test_require_helpers_map_to_forbidden() {
        assert!(require_admin(&caller(1, Role::Admin)).is_ok());
        assert!(matches!(
            require_admin(&caller(1, Role::User)),
            Err(AuthError::Forbidden)
        ));
        assert!(matches!(
            require_self_or_admin(&caller(7, Role::User), &account(8)),
            Err(AuthError::Forbidden)
        ));
    }
}
