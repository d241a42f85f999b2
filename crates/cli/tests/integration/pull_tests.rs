//! Pull command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

fn pushed(files: &[(&str, &str)]) -> TestEnv {
  let env = TestEnv::new();
  for (path, content) in files {
    env.write_file(path, content);
  }
  let mut cmd = env.cstore_cmd();
  cmd.arg("push");
  for (path, _) in files {
    cmd.arg(path);
  }
  cmd.assert().success();
  env
}

#[test]
fn pull_restores_deleted_files() {
  let env = pushed(&[("a.env", "A=1\n"), ("conf/app.json", "{\"a\": 1}")]);
  env.remove_file("a.env");
  env.remove_file("conf/app.json");

  env
    .cstore_cmd()
    .arg("pull")
    .assert()
    .success()
    .stdout(predicate::str::contains("2 of 2 file(s) pulled"));
  assert_eq!(env.read_file("a.env"), "A=1\n");
  assert_eq!(env.read_file("conf/app.json"), "{\"a\": 1}");
}

#[test]
fn pull_from_ghost_directory() {
  let env = pushed(&[("conf/a.env", "A=1\n")]);
  env.remove_file("conf/a.env");

  let mut cmd = env.cstore_cmd();
  cmd.current_dir(env.project_path().join("conf"));
  cmd.args(["pull", "a.env"]).assert().success();
  assert_eq!(env.read_file("conf/a.env"), "A=1\n");
}

#[test]
fn pull_of_uncataloged_file_fails() {
  let env = pushed(&[("a.env", "A=1\n")]);
  env
    .cstore_cmd()
    .args(["pull", "b.env"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("not cataloged"));
}

#[test]
fn export_writes_to_stdout_only() {
  let env = pushed(&[("a.env", "A=1\nB=\"it is\"\n")]);
  env.remove_file("a.env");

  env
    .cstore_cmd()
    .args(["pull", "-e"])
    .assert()
    .success()
    .stdout("export A='1'\nexport B='it is'\n");
  assert!(!env.exists("a.env"));
}

#[test]
fn export_format_selects_json() {
  let env = pushed(&[("a.env", "A=1\n")]);
  env
    .cstore_cmd()
    .args(["pull", "--export-format", "task-def-env"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"name\": \"A\""))
    .stdout(predicate::str::contains("\"value\": \"1\""));
}

#[test]
fn inject_secrets_writes_secrets_sibling() {
  let env = TestEnv::new();
  env.write_file("a.env", "API={{dev/key::k}}\n");
  env.cstore_cmd().args(["push", "a.env"]).assert().success();

  env.cstore_cmd().args(["pull", "-i", "a.env"]).assert().success();
  assert_eq!(env.read_file("a.env"), "API={{dev/key}}\n");
  assert_eq!(env.read_file("a.env.secrets"), "API=k\n");
}

#[test]
fn missing_secret_fails_the_entry() {
  let env = TestEnv::new();
  env.write_file("a.env", "API={{dev/key}}\n");
  env.cstore_cmd().args(["push", "a.env"]).assert().success();

  env.cstore_cmd().args(["pull", "-i", "a.env"]).assert().failure();
  assert!(!env.exists("a.env.secrets"));
}

#[test]
fn declined_conflict_skips_push() {
  let env = pushed(&[("a.env", "A=1\n")]);
  let blobs = env.data_path().join("cstore").join("store");
  let current = std::fs::read_dir(&blobs)
    .unwrap()
    .flat_map(|context| std::fs::read_dir(context.unwrap().path()).unwrap())
    .map(|entry| entry.unwrap().path().join("current"))
    .next()
    .unwrap();
  std::fs::File::options()
    .write(true)
    .open(&current)
    .unwrap()
    .set_modified(std::time::SystemTime::now() + std::time::Duration::from_secs(3600))
    .unwrap();

  env.write_file("a.env", "A=2\n");
  env
    .cstore_cmd()
    .args(["push", "a.env"])
    .write_stdin("n\n")
    .assert()
    .success()
    .stderr(predicate::str::contains("was modified"))
    .stderr(predicate::str::contains("skipped"));
  assert_eq!(std::fs::read_to_string(&current).unwrap(), "A=1\n");
}
