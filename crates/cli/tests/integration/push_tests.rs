//! Push command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn push_creates_catalog_and_reports() {
  let env = TestEnv::new();
  env.write_file("config/dev/a.env", "A=1\n");

  env
    .cstore_cmd()
    .args(["push", "config/dev/a.env"])
    .assert()
    .success()
    .stdout(predicate::str::contains("config/dev/a.env → file"))
    .stdout(predicate::str::contains("1 of 1 file(s) pushed"));

  let catalog = env.read_file("cstore.yml");
  assert!(catalog.contains("config/dev/a.env"));
  assert!(catalog.contains("- config"));
  assert!(catalog.contains("- dev"));
  assert!(env.exists("config/dev/.cstore"));
}

#[test]
fn push_of_missing_file_fails() {
  let env = TestEnv::new();
  env
    .cstore_cmd()
    .args(["push", "missing.env"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("missing.env"))
    .stdout(predicate::str::contains("0 of 1 file(s) pushed"));
}

#[test]
fn one_success_keeps_exit_code_zero() {
  let env = TestEnv::new();
  env.write_file("a.env", "A=1\n");
  env.cstore_cmd().args(["push", "a.env", "missing.env"]).assert().success();
}

#[test]
fn push_with_delete_removes_local_copy() {
  let env = TestEnv::new();
  env.write_file("a.env", "A=1\n");
  env.cstore_cmd().args(["push", "-d", "a.env"]).assert().success();
  assert!(!env.exists("a.env"));

  env.cstore_cmd().arg("pull").assert().success();
  assert_eq!(env.read_file("a.env"), "A=1\n");
}

#[test]
fn versioning_on_unversioned_store_fails() {
  let env = TestEnv::new();
  env.write_file("a.env", "A=1\n");
  env
    .cstore_cmd()
    .args(["push", "-s", "records", "-v", "v1", "a.env"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("does not support versioning"));
}

#[test]
fn changing_store_requires_purge() {
  let env = TestEnv::new();
  env.write_file("a.env", "A=1\n");
  env.cstore_cmd().args(["push", "a.env"]).assert().success();
  env
    .cstore_cmd()
    .args(["push", "-s", "records", "a.env"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("a.env"));
}

#[test]
fn push_always_strips_token_defaults_locally() {
  let env = TestEnv::new();
  env.write_file("a.env", "API={{dev/key::k}}\nDB={{dev/db::u}}\n");
  env.cstore_cmd().args(["push", "a.env"]).assert().success();
  assert_eq!(env.read_file("a.env"), "API={{dev/key}}\nDB={{dev/db}}\n");

  env.remove_file("a.env");
  env.cstore_cmd().args(["pull", "-m", "a.env"]).assert().success();
  assert_eq!(env.read_file("a.env"), "API={{dev/key::k}}\nDB={{dev/db::u}}\n");
}

#[test]
fn push_has_no_modify_secrets_flag() {
  let env = TestEnv::new();
  env.write_file("a.env", "API={{dev/key::k}}\n");
  env
    .cstore_cmd()
    .args(["push", "-m", "a.env"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unexpected argument"));
  assert_eq!(env.read_file("a.env"), "API={{dev/key::k}}\n");
}
