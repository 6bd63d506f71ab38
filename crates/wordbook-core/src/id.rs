//! Row identifiers.
//!
//! Each entity gets its own newtype so a word id can never be passed where an
//! exercise id is expected. The inner value is the SQLite rowid.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! row_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl $name {
      pub fn get(self) -> i64 { self.0 }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
      }
    }

    impl From<i64> for $name {
      fn from(raw: i64) -> Self { Self(raw) }
    }
  };
}

row_id!(
  /// Identifies a [`Word`](crate::word::Word).
  WordId
);
row_id!(
  /// Identifies an [`Example`](crate::example::Example).
  ExampleId
);
row_id!(
  /// Identifies an [`Exercise`](crate::exercise::Exercise).
  ExerciseId
);
