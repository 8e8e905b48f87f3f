//! End-to-end tests of Portal on-demand federation live under `tests/`.
