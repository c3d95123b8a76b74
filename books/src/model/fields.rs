// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Validated scalar types that make up a book.

use bookshelf_core::model::{ModelError, ModelResult};
#[cfg(test)]
use serde::Deserialize;
use serde::Serialize;
use serde::de::Visitor;
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a book.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
#[serde(transparent)]
pub(crate) struct BookId(Uuid);

impl BookId {
    /// Parses an untrusted string `s` as a book identifier.
    pub(crate) fn new(s: &str) -> ModelResult<Self> {
        match Uuid::parse_str(s) {
            Ok(uuid) => Ok(Self(uuid)),
            Err(_) => Err(ModelError("Invalid book id".to_owned())),
        }
    }

    /// Generates a new random identifier for a book that is about to be created.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the raw UUID backing this identifier.
    pub(crate) fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for BookId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates a newtype for a non-blank text field of a book with a maximum length.
///
/// The `$what` literal names the field in validation error messages and `$max_length` is the
/// maximum number of characters the field can hold, as specified in the schema.
macro_rules! text_field [
    ( $name:ident, $visitor:ident, $what:literal, $max_length:expr ) => {
        #[doc = concat!("The ", $what, " of a book, validated to be non-blank and of bounded length.")]
        #[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
        #[serde(transparent)]
        pub(crate) struct $name(String);

        impl $name {
            /// Maximum number of characters accepted for this field.
            pub(crate) const MAX_LENGTH: usize = $max_length;

            /// Creates a new value from an untrusted string `s`, making sure it is valid.
            pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
                let s = s.into();

                if s.trim().is_empty() {
                    return Err(ModelError(format!("{} cannot be empty", $what)));
                }
                if s.chars().count() > Self::MAX_LENGTH {
                    return Err(ModelError(format!(
                        "{} is too long (max {} characters)",
                        $what,
                        Self::MAX_LENGTH
                    )));
                }

                Ok(Self(s))
            }

            /// Returns a string view of the value.
            pub(crate) fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        #[cfg(test)]
        impl From<&'static str> for $name {
            /// Creates a new value from a hardcoded string, which must be valid.
            fn from(s: &'static str) -> Self {
                $name::new(s).expect("Hardcoded values must be valid")
            }
        }

        #[doc = concat!("A deserialization visitor for a `", stringify!($name), "`.")]
        struct $visitor;

        impl Visitor<'_> for $visitor {
            type Value = $name;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                $name::new(v).map_err(|e| E::custom(e.to_string()))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                $name::new(v).map_err(|e| E::custom(e.to_string()))
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                deserializer.deserialize_string($visitor)
            }
        }
    }
];

text_field!(Title, TitleVisitor, "Title", 500);
text_field!(Author, AuthorVisitor, "Author", 500);
text_field!(Isbn, IsbnVisitor, "ISBN", 20);
text_field!(Category, CategoryVisitor, "Category", 100);
