/// Test module for the auth service core
///
/// Service-level tests run against the in-memory store implementations;
/// router-level tests live in `tests/`.
pub mod fixtures;
