use std::fmt;

/// Text that must be present and non-blank
///
/// Used for every required free-text field (names, positions). The field
/// name only shapes the error message.
///
/// # Example
/// ```
/// use league_api::domain::value_objects::RequiredText;
///
/// let name = RequiredText::new("name", "Lions").expect("valid name");
/// assert_eq!(name.as_str(), "Lions");
/// assert!(RequiredText::new("name", "   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredText(String);

impl RequiredText {
    pub fn new(field: &str, value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(format!("{} is required", field))
        } else {
            Ok(RequiredText(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RequiredText {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
