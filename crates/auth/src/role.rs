use turnstile_core::DEFAULT_ROLE;

/// Flat authorization tag. Compared by exact string, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Role {
    fn default() -> Self {
        Self(DEFAULT_ROLE.to_string())
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        Self(role)
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        Self(role.to_string())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_user() {
        assert_eq!(Role::default().as_str(), "user");
    }

    #[test]
    fn compares_exactly() {
        assert_ne!(Role::from("Admin"), Role::from("admin"));
        assert_ne!(Role::from("admin "), Role::from("admin"));
    }

    #[test]
    fn serializes_as_bare_string() {
        assert_eq!(serde_json::to_string(&Role::from("admin")).unwrap(), "\"admin\"");
    }
}
