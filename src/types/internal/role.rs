use std::fmt;

/// Role tag carried by a user and by token claims.
///
/// The persisted form is a free-form string; parsing it into a closed set of
/// known roles (plus a catch-all) happens at the boundary so that access
/// checks compare tags, not raw strings. Parsing trims whitespace and never
/// fails: an unknown non-empty tag becomes `Other`, an empty tag degrades to
/// the default `User`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Manager,
    Buyer,
    Logistics,
    User,
    Other(String),
}

impl Role {
    /// Parse a stored or claimed role string into a role tag
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "admin" => Role::Admin,
            "manager" => Role::Manager,
            "buyer" => Role::Buyer,
            "logistics" => Role::Logistics,
            "user" | "" => Role::User,
            other => Role::Other(other.to_string()),
        }
    }

    /// String form, as stored in the database and embedded in token claims
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Buyer => "buyer",
            Role::Logistics => "logistics",
            Role::User => "user",
            Role::Other(tag) => tag,
        }
    }

    /// Admins bypass all access restriction
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
