use serde::Serialize;
use std::collections::BTreeMap;

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub username: String,
    pub attributes: BTreeMap<String, String>,
}

impl UserProfile {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn email_verified(&self) -> bool {
        self.attribute("email_verified") == Some("true")
    }
}
