//! Domain identifier types
//!
//! Newtype wrappers for backend identifiers. Each type prevents mixing
//! different ID kinds and parses from CLI arguments via `FromStr`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! numeric_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new identifier from a raw value
            pub fn new(id: i64) -> Result<Self, String> {
                if id <= 0 {
                    return Err(format!(
                        "{} must be a positive integer, got {id}",
                        stringify!($name)
                    ));
                }
                Ok(Self(id))
            }

            /// Returns the raw identifier value
            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let id: i64 = s
                    .trim()
                    .parse()
                    .map_err(|_| format!("Invalid {}: {s}", stringify!($name)))?;
                Self::new(id)
            }
        }
    };
}

numeric_id! {
    /// Series identifier
    ///
    /// A series is the named template a set of portfolios was created from;
    /// one export run always targets exactly one series.
    SeriesId
}

numeric_id! {
    /// Jurusan (major/department) identifier, the coarse scope filter
    JurusanId
}

numeric_id! {
    /// Kelas (class) identifier, the fine scope filter dependent on jurusan
    KelasId
}
