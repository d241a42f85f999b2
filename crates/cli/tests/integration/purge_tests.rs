//! Purge command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

fn pushed() -> TestEnv {
  let env = TestEnv::new();
  env.write_file("a.env", "A=1\n");
  env.cstore_cmd().args(["push", "a.env"]).assert().success();
  env
}

#[test]
fn purge_needs_confirmation() {
  let env = pushed();
  env
    .cstore_cmd()
    .arg("purge")
    .assert()
    .success()
    .stderr(predicate::str::contains("Delete [a.env] from [file]"))
    .stdout(predicate::str::contains("Aborted"));
  assert!(env.exists("cstore.yml"));
}

#[test]
fn confirmed_purge_removes_catalog() {
  let env = pushed();
  env
    .cstore_cmd()
    .arg("purge")
    .write_stdin("y\n")
    .assert()
    .success()
    .stdout(predicate::str::contains("1 of 1 file(s) purged"));
  assert!(!env.exists("cstore.yml"));
  assert!(env.exists("a.env"));
}

#[test]
fn yes_flag_skips_confirmation() {
  let env = pushed();
  env.cstore_cmd().args(["purge", "-y"]).assert().success();
  assert!(!env.exists("cstore.yml"));
}

#[test]
fn purge_without_matches_succeeds() {
  let env = pushed();
  env
    .cstore_cmd()
    .args(["purge", "-y", "b.env"])
    .assert()
    .success()
    .stdout(predicate::str::contains("No matching files"));
}
