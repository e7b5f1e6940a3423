use crate::types::internal::role::Role;

/// Decoded access policy of a Category or BusinessProcess.
///
/// The stored wire format is a comma-separated string of role tokens. An
/// empty string or the exact string "all" means unrestricted. Tokens are
/// trimmed; empty segments (from trailing commas or whitespace-only parts)
/// are discarded, so a policy of "," restricts the resource to admins only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    Unrestricted,
    Restricted(Vec<String>),
}

impl AccessPolicy {
    /// Parse the stored allowed_roles string. Never fails: malformed input
    /// degrades to a policy with fewer (or zero) matchable tokens.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() || raw == "all" {
            return AccessPolicy::Unrestricted;
        }

        let tokens: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(String::from)
            .collect();

        AccessPolicy::Restricted(tokens)
    }

    /// Membership test: exact token match, no wildcard or hierarchy
    /// semantics. Admins always pass.
    pub fn allows(&self, role: &Role) -> bool {
        if role.is_admin() {
            return true;
        }

        match self {
            AccessPolicy::Unrestricted => true,
            AccessPolicy::Restricted(tokens) => tokens.iter().any(|token| token == role.as_str()),
        }
    }
}

/// Decide whether a requester may see a resource given its stored
/// allowed_roles policy. Pure function, used identically for Category and
/// BusinessProcess visibility.
pub fn is_visible(allowed_roles: &str, requester_role: &Role) -> bool {
    AccessPolicy::parse(allowed_roles).allows(requester_role)
}
