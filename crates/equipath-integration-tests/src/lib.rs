//! Host crate for cross-crate integration tests; see `tests/`.
