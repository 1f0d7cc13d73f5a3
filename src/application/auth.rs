//! # Authorization Gate
//!
//! Decides whether a guild member may run privileged commands.

use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct AuthGate {
    required_role: String,
}

impl AuthGate {
    pub fn new(required_role: impl Into<String>) -> Self {
        Self {
            required_role: required_role.into(),
        }
    }

    /// True iff the member holds the required role. Unresolved principals never reach here.
    pub fn is_authorized(&self, roles: &HashSet<String>) -> bool {
        roles.contains(&self.required_role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_member_with_role() {
        let gate = AuthGate::new("100");
        assert!(gate.is_authorized(&roles(&["5", "100"])));
    }

    #[test]
    fn test_member_without_role() {
        let gate = AuthGate::new("100");
        assert!(!gate.is_authorized(&roles(&["5", "1000"])));
        assert!(!gate.is_authorized(&roles(&[])));
    }
}
