//! Signed-in Identity

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

const AVATAR_SERVICE: &str = "https://ui-avatars.com/api/";
const DEFAULT_AVATAR_NAME: &str = "User";

/// Identity issued by the authentication provider
///
/// `uid` scopes every remote product request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub display_name: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// An identity with a blank uid cannot scope remote requests
    pub fn is_resolved(&self) -> bool {
        !self.uid.trim().is_empty()
    }

    /// Display name for the greeting, if the user set one
    pub fn greeting(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Generated avatar for the profile picture
    pub fn avatar_url(&self) -> String {
        let name = self.greeting().unwrap_or(DEFAULT_AVATAR_NAME);
        format!(
            "{}?name={}&background=random",
            AVATAR_SERVICE,
            utf8_percent_encode(name, NON_ALPHANUMERIC)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_url_encodes_name() {
        let identity = Identity::new("u1").with_display_name("Ada Lovelace");
        assert_eq!(
            identity.avatar_url(),
            "https://ui-avatars.com/api/?name=Ada%20Lovelace&background=random"
        );
        assert_eq!(identity.greeting(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_avatar_url_defaults_to_user() {
        let identity = Identity::new("u1").with_display_name("  ");
        assert_eq!(identity.greeting(), None);
        assert!(identity.avatar_url().contains("name=User&"));
    }

    #[test]
    fn test_blank_uid_is_unresolved() {
        assert!(!Identity::new("  ").is_resolved());
        assert!(Identity::new("abc").is_resolved());
    }
}
