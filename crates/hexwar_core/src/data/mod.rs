//! Data structures for scenario environments.
//!
//! Environments (rule toggles plus planetary conditions) are described in
//! RON and deserialized into the structs here.
//!
//! **Note:** This module contains no IO - it only parses text it is given.
//! Reading files is handled by `hexwar_tools`.

mod environment_data;

pub use environment_data::{EnvironmentData, MAX_TEMPERATURE, MIN_GRAVITY, MIN_TEMPERATURE};
