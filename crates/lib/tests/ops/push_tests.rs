use std::fs::File;
use std::time::{Duration, SystemTime};

use cstore_lib::ops::{self, EntryState};
use cstore_lib::options::UserOptions;
use cstore_lib::prompt::{AutoAnswer, ScriptedPrompt, Severity};

use super::common::{Workspace, paths};

#[test]
fn changed_remote_prompts_and_decline_skips() {
  let ws = Workspace::new();
  ws.write("a.env", "ENV=test1");
  ops::push(&ws.registry, &ws.root(), &paths(&["a.env"]), &mut AutoAnswer(true)).unwrap();

  let blob = ws.blob("a.env");
  File::options()
    .write(true)
    .open(&blob)
    .unwrap()
    .set_modified(SystemTime::now() + Duration::from_secs(3600))
    .unwrap();

  ws.write("a.env", "ENV=changed");
  let mut prompt = ScriptedPrompt::new([false]);
  let result = ops::push(&ws.registry, &ws.root(), &paths(&["a.env"]), &mut prompt).unwrap();

  assert_eq!(prompt.asked.len(), 1);
  assert_eq!(prompt.asked[0].1, Severity::Warn);
  assert!(prompt.asked[0].0.contains("'a.env' was modified"));
  assert!(matches!(result.report.entries[0].state, EntryState::Skipped(_)));
  assert!(!result.report.is_failure());
  assert_eq!(std::fs::read_to_string(&blob).unwrap(), "ENV=test1");
}

#[test]
fn changed_remote_confirmed_overwrites() {
  let ws = Workspace::new();
  ws.write("a.env", "ENV=test1");
  ops::push(&ws.registry, &ws.root(), &paths(&["a.env"]), &mut AutoAnswer(true)).unwrap();

  let blob = ws.blob("a.env");
  File::options()
    .write(true)
    .open(&blob)
    .unwrap()
    .set_modified(SystemTime::now() + Duration::from_secs(3600))
    .unwrap();

  ws.write("a.env", "ENV=changed");
  let result = ops::push(&ws.registry, &ws.root(), &paths(&["a.env"]), &mut AutoAnswer(true)).unwrap();
  assert_eq!(result.report.succeeded(), 1);
  assert_eq!(std::fs::read_to_string(&blob).unwrap(), "ENV=changed");
}

#[test]
fn repeated_push_does_not_prompt() {
  let ws = Workspace::new();
  ws.write("a.env", "ENV=test1");
  ops::push(&ws.registry, &ws.root(), &paths(&["a.env"]), &mut AutoAnswer(true)).unwrap();

  ws.write("a.env", "ENV=test2");
  let mut prompt = ScriptedPrompt::new(Vec::new());
  let result = ops::push(&ws.registry, &ws.root(), &paths(&["a.env"]), &mut prompt).unwrap();
  assert!(prompt.asked.is_empty());
  assert_eq!(result.report.succeeded(), 1);
}

#[test]
fn push_from_ghost_directory_uses_parent_catalog() {
  let ws = Workspace::new();
  ws.write("config/a.env", "A=1\n");
  ops::push(&ws.registry, &ws.root(), &paths(&["config/a.env"]), &mut AutoAnswer(true)).unwrap();

  ws.write("config/b.env", "B=1\n");
  let result = ops::push(&ws.registry, &ws.path("config"), &paths(&["b.env"]), &mut AutoAnswer(true)).unwrap();
  assert_eq!(result.report.entries[0].path, "config/b.env");
  assert!(!ws.exists("config/cstore.yml"));
  assert!(ws.catalog().get("config/b.env").is_some());
}

#[test]
fn records_store_round_trips_records() {
  let ws = Workspace::new();
  ws.write("a.env", "B=2\nA=1\n");
  let options = UserOptions {
    store: Some("records".to_string()),
    ..paths(&["a.env"])
  };
  ops::push(&ws.registry, &ws.root(), &options, &mut AutoAnswer(true)).unwrap();
  ws.remove("a.env");

  ops::pull(&ws.registry, &ws.root(), &paths(&["a.env"]), &mut AutoAnswer(false)).unwrap();
  assert_eq!(ws.read("a.env"), "A=1\nB=2\n");
  assert_eq!(ws.catalog().get("a.env").unwrap().data.get("A").map(String::as_str), Some("SECRET"));
}
