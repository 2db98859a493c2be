use std::fmt;

/// Shirt number of a player
///
/// # Invariants
/// - Never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct JerseyNumber(i64);

impl JerseyNumber {
    /// Creates a jersey number
    ///
    /// # Example
    /// ```
    /// use league_api::domain::player::JerseyNumber;
    ///
    /// assert_eq!(JerseyNumber::new(7).unwrap().value(), 7);
    /// assert!(JerseyNumber::new(-1).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, String> {
        if value < 0 {
            Err("number start at 0".to_string())
        } else {
            Ok(JerseyNumber(value))
        }
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for JerseyNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
