//! CLI integration tests driving the `cstore` binary end to end.

mod common;
mod list_tests;
mod pull_tests;
mod purge_tests;
mod push_tests;
