use crate::types::AccountType;
use serde::{Deserialize, Serialize};

/// Who is driving the flow. Passed in at construction; nothing reads
/// identity from ambient state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub account_type: AccountType,
}

impl SessionContext {
    pub fn new(display_name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            display_name: display_name.into(),
            account_type,
        }
    }

    /// Name to greet with; "there" when none was given.
    pub fn greeting_name(&self) -> &str {
        let name = self.display_name.trim();
        if name.is_empty() {
            "there"
        } else {
            name
        }
    }
}
