//! List, init and clean command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn list_shows_tags_and_versions() {
  let env = TestEnv::new();
  env.write_file("config/a.env", "A=1\n");
  env.cstore_cmd().args(["push", "config/a.env"]).assert().success();
  env.cstore_cmd().args(["push", "-v", "v1", "config/a.env"]).assert().success();

  env
    .cstore_cmd()
    .args(["list", "-g", "-v"])
    .assert()
    .success()
    .stdout(predicate::str::contains("config/a.env (file) [config] versions: v1"))
    .stdout(predicate::str::contains("1 file(s)"));
}

#[test]
fn list_descends_into_linked_catalogs() {
  let env = TestEnv::new();
  env.write_file("sub/b.env", "B=1\n");
  let mut cmd = env.cstore_cmd();
  cmd.current_dir(env.project_path().join("sub"));
  cmd.args(["push", "b.env"]).assert().success();

  env.write_file("a.env", "A=1\n");
  env.cstore_cmd().args(["push", "a.env", "sub/cstore.yml"]).assert().success();

  env
    .cstore_cmd()
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::contains("└── b.env (file)"))
    .stdout(predicate::str::contains("2 file(s)"));
}

#[test]
fn init_catalogs_without_uploading() {
  let env = TestEnv::new();
  env.write_file("a.env", "A=1\n");
  env
    .cstore_cmd()
    .args(["init", "a.env"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Created"));
  assert!(env.read_file("cstore.yml").contains("a.env"));
  assert!(!env.data_path().join("cstore").join("store").exists());
}

#[test]
fn clean_removes_local_copies() {
  let env = TestEnv::new();
  env.write_file("a.env", "A={{dev/a::x}}\n");
  env.cstore_cmd().args(["push", "a.env"]).assert().success();
  env.cstore_cmd().args(["pull", "-i"]).assert().success();
  assert!(env.exists("a.env.secrets"));

  env
    .cstore_cmd()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Removed"));
  assert!(!env.exists("a.env"));
  assert!(!env.exists("a.env.secrets"));
  assert!(env.exists("cstore.yml"));
}

#[test]
fn clean_of_uncataloged_file_fails() {
  let env = TestEnv::new();
  env.write_file("a.env", "A=1\n");
  env.cstore_cmd().args(["push", "a.env"]).assert().success();
  env.cstore_cmd().args(["clean", "b.env"]).assert().failure();
  assert!(env.exists("a.env"));
}
