//! Slug generation for article titles.
//!
//! A slug is the title reduced to `[a-z0-9-]` plus a second-resolution UTC
//! timestamp. Two articles with the same title created in the same second
//! produce the same slug; the store's UNIQUE constraint is the authority on
//! collisions, not this module.

use chrono::{DateTime, Utc};

/// Timestamp layout appended to every slug (`YYYYMMDDHHMMSS`).
const STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Derive a slug for `title` stamped with the current time.
pub fn generate(title: &str) -> String { generate_at(title, Utc::now()) }

/// Derive a slug for `title` stamped with `at`.
///
/// A title without any alphanumeric characters yields just the timestamp.
pub fn generate_at(title: &str, at: DateTime<Utc>) -> String {
  let base: String = title
    .split_whitespace()
    .collect::<Vec<_>>()
    .join("-")
    .chars()
    .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
    .collect::<String>()
    .to_ascii_lowercase();

  let stamp = at.format(STAMP_FORMAT);
  if !base.chars().any(|c| c.is_ascii_alphanumeric()) {
    stamp.to_string()
  } else {
    format!("{base}-{stamp}")
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn noon() -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 3, 9, 12, 5, 7).unwrap() }

  #[test]
  fn lowercases_and_hyphenates() {
    assert_eq!(generate_at("How To Train", noon()), "how-to-train-20240309120507");
  }

  #[test]
  fn collapses_whitespace_runs_and_trims() {
    assert_eq!(
      generate_at("  dragons \t and\n\nknights  ", noon()),
      "dragons-and-knights-20240309120507"
    );
  }

  #[test]
  fn strips_characters_outside_the_safe_set() {
    assert_eq!(
      generate_at("Rust: 100% safe? (mostly)", noon()),
      "rust-100-safe-mostly-20240309120507"
    );
    assert_eq!(generate_at("café-über", noon()), "caf-ber-20240309120507");
  }

  #[test]
  fn keeps_existing_hyphens() {
    assert_eq!(generate_at("pre-release notes", noon()), "pre-release-notes-20240309120507");
  }

  #[test]
  fn title_without_alphanumerics_is_just_the_stamp() {
    assert_eq!(generate_at("!!! ???", noon()), "20240309120507");
  }

  #[test]
  fn same_title_same_second_collides() {
    assert_eq!(generate_at("Same", noon()), generate_at("Same", noon()));
  }
}
