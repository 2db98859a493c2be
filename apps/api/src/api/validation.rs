// Request validation
// Collects the first error of every field before any store call is made.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::errors::ApiError;
use crate::domain::player::JerseyNumber;
use crate::domain::value_objects::RequiredText;

/// One field-level validation failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub msg: String,
    pub param: String,
    pub location: &'static str,
}

impl FieldError {
    pub fn new(param: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            value: None,
            msg: msg.into(),
            param: param.into(),
            location: "body",
        }
    }
}

/// Accumulates field errors
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the error of `result`, echoing the submitted value
    pub fn check<T, V>(&mut self, param: &str, value: &V, result: Result<T, String>) -> Option<T>
    where
        V: Serialize + ?Sized,
    {
        match result {
            Ok(valid) => Some(valid),
            Err(msg) => {
                let value = serde_json::to_value(value).ok().filter(|v| !v.is_null());
                self.errors.push(FieldError {
                    value,
                    ..FieldError::new(param, msg)
                });
                None
            }
        }
    }

    /// Like `check`, but never echoes the value back
    pub fn check_secret<T>(&mut self, param: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(valid) => Some(valid),
            Err(msg) => {
                self.errors.push(FieldError::new(param, msg));
                None
            }
        }
    }

    /// Records an error found outside a field check
    pub fn reject(&mut self, param: &str, msg: impl Into<String>) {
        self.errors.push(FieldError::new(param, msg));
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fails with every recorded error, otherwise assembles the checked values
    ///
    /// `build` sees only successful checks, so its `?`s never short-circuit
    /// once validation has passed.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, ApiError> {
        if !self.errors.is_empty() {
            return Err(ApiError::validation(self.errors));
        }
        build().ok_or_else(|| ApiError::validation(Vec::new()))
    }
}

pub fn required_text(field: &str, value: Option<&str>) -> Result<RequiredText, String> {
    RequiredText::new(field, value.unwrap_or_default())
}

/// Present-but-blank is an error, absent is fine
pub fn optional_text(field: &str, value: Option<&str>) -> Result<Option<RequiredText>, String> {
    value.map(|value| RequiredText::new(field, value)).transpose()
}

/// Accepts a JSON integer or a numeric string
pub fn jersey_number(value: Option<&Value>) -> Result<JerseyNumber, String> {
    let number = match value {
        None | Some(Value::Null) => return Err("number is required".to_string()),
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err("number is required".to_string())
        }
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    number
        .ok_or_else(|| "number start at 0".to_string())
        .and_then(JerseyNumber::new)
}

pub fn optional_jersey_number(value: Option<&Value>) -> Result<Option<JerseyNumber>, String> {
    match value {
        None => Ok(None),
        Some(value) => jersey_number(Some(value)).map(Some),
    }
}

pub fn team_id(value: Option<&str>) -> Result<Uuid, String> {
    match value.map(str::trim) {
        None | Some("") => Err("team id is required".to_string()),
        Some(raw) => Uuid::parse_str(raw).map_err(|_| "team id is not valid".to_string()),
    }
}

pub fn optional_team_id(value: Option<&str>) -> Result<Option<Uuid>, String> {
    value.map(|raw| team_id(Some(raw))).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collects_first_error_per_field() {
        let mut v = Validator::new();
        let name = v.check("name", &Some(""), required_text("name", Some("")));
        let position = v.check("position", &Some("FW"), required_text("position", Some("FW")));

        assert!(name.is_none());
        assert!(position.is_some());
        assert!(!v.is_valid());

        let err = v.finish(|| Some(())).unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].param, "name");
        assert_eq!(err.errors[0].msg, "name is required");
        assert_eq!(err.errors[0].value, Some(json!("")));
    }

    #[test]
    fn secrets_are_not_echoed() {
        let mut v = Validator::new();
        v.check_secret::<()>("password", Err("password is required".into()));

        let err = v.finish(|| Some(())).unwrap_err();
        assert_eq!(err.errors[0].value, None);
    }

    #[test]
    fn finish_builds_value_when_valid() {
        let mut v = Validator::new();
        let name = v.check("name", &Some("Lions"), required_text("name", Some("Lions")));

        let built = v.finish(|| Some(name?.into_inner())).unwrap();
        assert_eq!(built, "Lions");
    }

    #[test]
    fn jersey_numbers() {
        assert_eq!(jersey_number(Some(&json!(7))).unwrap().value(), 7);
        assert_eq!(jersey_number(Some(&json!("12"))).unwrap().value(), 12);
        assert_eq!(jersey_number(Some(&json!(0))).unwrap().value(), 0);
        assert_eq!(jersey_number(None).unwrap_err(), "number is required");
        assert_eq!(jersey_number(Some(&json!(""))).unwrap_err(), "number is required");
        assert_eq!(jersey_number(Some(&json!(-1))).unwrap_err(), "number start at 0");
        assert_eq!(jersey_number(Some(&json!("seven"))).unwrap_err(), "number start at 0");
        assert_eq!(jersey_number(Some(&json!(7.5))).unwrap_err(), "number start at 0");
    }

    #[test]
    fn team_ids() {
        let id = Uuid::new_v4();
        assert_eq!(team_id(Some(&id.to_string())).unwrap(), id);
        assert_eq!(team_id(None).unwrap_err(), "team id is required");
        assert_eq!(team_id(Some("abc")).unwrap_err(), "team id is not valid");
        assert_eq!(optional_team_id(None).unwrap(), None);
    }

    #[test]
    fn optional_text_rules() {
        assert_eq!(optional_text("name", None).unwrap(), None);
        assert!(optional_text("name", Some("")).is_err());
        assert!(optional_text("name", Some("Lions")).unwrap().is_some());
    }
}
