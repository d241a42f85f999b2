//! End-to-end operation tests against the bundled local back-ends.

mod common;
mod pull_tests;
mod purge_tests;
mod push_tests;
