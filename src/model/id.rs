use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// The number of hex characters kept from a random UUID when generating an id. Ids only need to
/// be unique within one trip book, and short ids are easier to type on the command line.
const ID_LEN: usize = 8;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                Display::fmt(&self.0, f)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifies a `Trip` within a `TripBook`.
    TripId
);

string_id!(
    /// Identifies a `Person`. Expenses reference people by this id.
    PersonId
);

string_id!(
    /// Identifies an `Expense` within its trip.
    ExpenseId
);

/// Generates a short random id for which `taken` returns false.
pub(crate) fn generate<T, F>(taken: F) -> T
where
    T: From<String>,
    F: Fn(&str) -> bool,
{
    loop {
        let mut candidate = Uuid::new_v4().simple().to_string();
        candidate.truncate(ID_LEN);
        if !taken(&candidate) {
            return T::from(candidate);
        }
    }
}
