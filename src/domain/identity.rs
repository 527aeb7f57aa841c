//! Authenticated identity passed explicitly into every application operation.
//!
//! The HTTP layer resolves the bearer token into an `AuthIdentity` and hands
//! it to the services; nothing below the interface layer reads ambient
//! session state.

/// User role claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "ADMIN" => Self::Admin,
            _ => Self::User,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated caller of an operation
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub user_id: String,
    pub role: Role,
}

impl AuthIdentity {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trip() {
        assert_eq!(Role::from_str(Role::Admin.as_str()), Role::Admin);
        assert_eq!(Role::from_str(Role::User.as_str()), Role::User);
    }

    #[test]
    fn unknown_role_defaults_to_user() {
        assert_eq!(Role::from_str("SUPERUSER"), Role::User);
    }

    #[test]
    fn admin_check() {
        assert!(AuthIdentity::new("u1", Role::Admin).is_admin());
        assert!(!AuthIdentity::new("u1", Role::User).is_admin());
    }
}
