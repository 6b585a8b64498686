//! Test utilities for the namecheck crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled only for tests or with the `test-support` feature.

pub mod availability;
pub mod clock;
pub mod http;

pub use availability::{ResolverCall, ScriptedResolver, StaticLookupSource, StaticValidationSource};
pub use clock::{ClockAdvancingSleeper, MutableClock, RecordingSleeper};
pub use http::{MultipartPart, TestHarness, fixed_start, multipart_request};
