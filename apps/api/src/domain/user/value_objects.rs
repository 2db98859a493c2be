use std::fmt;

/// Login name of a user
///
/// # Invariants
/// - Not empty
/// - ASCII letters and digits only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Creates a username
    ///
    /// # Example
    /// ```
    /// use league_api::domain::user::Username;
    ///
    /// assert!(Username::new("coach42").is_ok());
    /// assert!(Username::new("coach 42").is_err());
    /// ```
    pub fn new(username: impl Into<String>) -> Result<Self, String> {
        let username = username.into();
        if username.is_empty() {
            return Err("username is required".to_string());
        }
        if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err("username is only letters and numbers".to_string());
        }
        Ok(Username(username))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Plaintext password that satisfies the password policy
///
/// # Validation Rules
/// - At least 8 characters
/// - Contains a lowercase letter, an uppercase letter and a digit
///
/// Deliberately not `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub const MIN_LENGTH: usize = 8;

    pub fn new(password: impl Into<String>) -> Result<Self, String> {
        let password = password.into();
        if password.is_empty() {
            return Err("password is required".to_string());
        }
        if password.chars().count() < Self::MIN_LENGTH {
            return Err("password must be at least 8 characters".to_string());
        }
        let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        if !(has_lower && has_upper && has_digit) {
            return Err("password must contain lowercase, uppercase, and number".to_string());
        }
        Ok(Password(password))
    }

    /// Checks the confirmation field against this password
    pub fn confirm(&self, confirmation: Option<&str>) -> Result<(), String> {
        if confirmation == Some(self.0.as_str()) {
            Ok(())
        } else {
            Err("confirm password doesn't match".to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_username() {
        assert_eq!(Username::new("coach42").unwrap().as_str(), "coach42");
    }

    #[test]
    fn empty_username() {
        assert_eq!(Username::new("").unwrap_err(), "username is required");
    }

    #[test]
    fn username_with_symbols() {
        assert!(Username::new("coach_42").is_err());
        assert!(Username::new("coach@42").is_err());
    }

    #[test]
    fn valid_password() {
        assert!(Password::new("Secret123").is_ok());
    }

    #[test]
    fn short_password() {
        assert_eq!(
            Password::new("Ab1").unwrap_err(),
            "password must be at least 8 characters"
        );
    }

    #[test]
    fn password_missing_character_classes() {
        assert!(Password::new("alllowercase1").is_err());
        assert!(Password::new("ALLUPPERCASE1").is_err());
        assert!(Password::new("NoDigitsHere").is_err());
    }

    #[test]
    fn confirmation_must_match() {
        let password = Password::new("Secret123").unwrap();

        assert!(password.confirm(Some("Secret123")).is_ok());
        assert!(password.confirm(Some("Secret124")).is_err());
        assert!(password.confirm(None).is_err());
    }

    #[test]
    fn debug_hides_password() {
        let password = Password::new("Secret123").unwrap();
        assert_eq!(format!("{:?}", password), "Password(***)");
    }
}
