//! Tri-state field for partial updates.
//!
//! A JSON body distinguishes three cases per field: the key is missing, the
//! key is present with `null`, or the key carries a value. `Option<T>` can
//! only express two of them, so partial-update commands use [`Patch<T>`].
//!
//! Deserialise with `#[serde(default)]` on the field so a missing key becomes
//! [`Patch::Absent`].

use serde::{Deserialize, Deserializer};

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
  /// Leave the stored value unchanged.
  Absent,
  /// Clear the stored value.
  Null,
  /// Replace the stored value.
  Value(T),
}

impl<T> Default for Patch<T> {
  fn default() -> Self { Self::Absent }
}

impl<T> Patch<T> {
  pub fn as_ref(&self) -> Patch<&T> {
    match self {
      Self::Absent => Patch::Absent,
      Self::Null => Patch::Null,
      Self::Value(v) => Patch::Value(v),
    }
  }

  /// The replacement value, if one was supplied.
  pub fn into_value(self) -> Option<T> {
    match self {
      Self::Value(v) => Some(v),
      Self::Absent | Self::Null => None,
    }
  }

  /// Apply the patch to a nullable stored value.
  pub fn apply(self, current: Option<T>) -> Option<T> {
    match self {
      Self::Absent => current,
      Self::Null => None,
      Self::Value(v) => Some(v),
    }
  }
}

impl Patch<String> {
  /// Reject `null` and blank strings for a field that must stay non-empty.
  pub fn require_text(&self, field: &str) -> Result<()> {
    match self {
      Self::Absent => Ok(()),
      Self::Null => Err(Error::validation(format!("{field} cannot be null"))),
      Self::Value(v) if v.trim().is_empty() => {
        Err(Error::validation(format!("{field} cannot be empty")))
      }
      Self::Value(_) => Ok(()),
    }
  }
}

impl<T> From<Option<T>> for Patch<T> {
  fn from(value: Option<T>) -> Self { value.map_or(Self::Null, Self::Value) }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
  T: Deserialize<'de>,
{
  fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    Option::<T>::deserialize(deserializer).map(Self::from)
  }
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;

  use super::*;

  #[derive(Debug, Deserialize)]
  struct Body {
    #[serde(default)]
    bio: Patch<String>,
  }

  #[test]
  fn missing_key_is_absent() {
    let body: Body = serde_json::from_str("{}").unwrap();
    assert_eq!(body.bio, Patch::Absent);
  }

  #[test]
  fn explicit_null_is_null() {
    let body: Body = serde_json::from_str(r#"{"bio":null}"#).unwrap();
    assert_eq!(body.bio, Patch::Null);
  }

  #[test]
  fn explicit_empty_is_a_value() {
    let body: Body = serde_json::from_str(r#"{"bio":""}"#).unwrap();
    assert_eq!(body.bio, Patch::Value(String::new()));
  }

  #[test]
  fn apply_distinguishes_all_three_states() {
    let current = Some("old".to_string());
    assert_eq!(Patch::Absent.apply(current.clone()), Some("old".into()));
    assert_eq!(Patch::<String>::Null.apply(current.clone()), None);
    assert_eq!(Patch::Value("new".to_string()).apply(current), Some("new".into()));
  }

  #[test]
  fn require_text_rejects_null_and_blank() {
    assert!(Patch::<String>::Absent.require_text("title").is_ok());
    assert!(Patch::Value("x".to_string()).require_text("title").is_ok());
    assert!(matches!(
      Patch::<String>::Null.require_text("title"),
      Err(Error::Validation(_))
    ));
    assert!(matches!(
      Patch::Value("   ".to_string()).require_text("title"),
      Err(Error::Validation(_))
    ));
  }
}
