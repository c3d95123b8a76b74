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

//! Typed access to the environment variables that configure a service.
//!
//! Variables are always looked up as `<prefix>_<suffix>` so that one process can hold several
//! sets of the same options, such as the production and test databases.

use std::env;

/// Result type for environment errors.
type Result<T> = std::result::Result<T, String>;

/// Raw value of an environment variable, pending conversion to its final type.
pub struct Value(String);

impl TryFrom<Value> for String {
    type Error = String;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        Ok(value.0)
    }
}

/// Implements `TryFrom<Value>` for numeric types via their `FromStr` implementation.
macro_rules! tryfrom_value_for_number [
    ( $( $t:ty ),+ ) => {
        $(
            impl TryFrom<Value> for $t {
                type Error = String;

                fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
                    value.0.parse::<$t>().map_err(|e| format!("Invalid {}: {}", stringify!($t), e))
                }
            }
        )+
    }
];

tryfrom_value_for_number!(i32, i64, u16, u32, u64, usize);

/// Looks up the variable `name` and converts it to `T`, returning `None` if it is not set.
fn lookup<T: TryFrom<Value, Error = String>>(name: &str) -> Result<Option<T>> {
    let raw = match env::var(name) {
        Ok(raw) => raw,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            return Err(format!("Invalid value in environment variable {}", name));
        }
    };
    T::try_from(Value(raw))
        .map(Some)
        .map_err(|e| format!("Invalid type in environment variable {}: {}", name, e))
}

/// Gets the required variable `<prefix>_<suffix>` converted to `T`.
pub fn get_required_var<T: TryFrom<Value, Error = String>>(
    prefix: &str,
    suffix: &str,
) -> Result<T> {
    let name = format!("{}_{}", prefix, suffix);
    lookup(&name)?.ok_or_else(|| format!("Required environment variable {} not present", name))
}

/// Gets the optional variable `<prefix>_<suffix>` converted to `T`.
///
/// Unset variables yield `None` but set variables that cannot be converted are an error.
pub fn get_optional_var<T: TryFrom<Value, Error = String>>(
    prefix: &str,
    suffix: &str,
) -> Result<Option<T>> {
    lookup(&format!("{}_{}", prefix, suffix))
}
