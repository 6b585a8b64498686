//! HTTP adapters for the availability ports.
//!
//! One adapter calls the primary validation endpoint, the other the fallback
//! lookup endpoint. Both own transport details only: request shape, timeout
//! and status mapping, and JSON decoding.

mod dto;
mod http_source;

pub use http_source::{
    HttpUsernameLookupSource, HttpUsernameValidationSource, PLACEHOLDER_BIRTHDAY,
};
