//! End-to-end and property tests for mend live under `tests/`.
