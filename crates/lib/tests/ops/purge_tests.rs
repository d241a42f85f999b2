use cstore_lib::ops::{self, PurgeResult};
use cstore_lib::options::UserOptions;
use cstore_lib::prompt::{AutoAnswer, ScriptedPrompt, Severity};

use super::common::{Workspace, paths};

#[test]
fn purge_removes_remote_data_and_empty_catalog() {
  let ws = Workspace::new();
  ws.write("a.env", "A=1");
  let options = UserOptions {
    version: Some("v1".to_string()),
    ..paths(&["a.env"])
  };
  ops::push(&ws.registry, &ws.root(), &paths(&["a.env"]), &mut AutoAnswer(true)).unwrap();
  ops::push(&ws.registry, &ws.root(), &options, &mut AutoAnswer(true)).unwrap();
  let context = ws.catalog().context;

  let mut prompt = ScriptedPrompt::new([true]);
  let result = ops::purge(&ws.registry, &ws.root(), &paths(&[]), &mut prompt).unwrap();
  assert_eq!(prompt.asked[0].1, Severity::Danger);
  assert!(matches!(result, PurgeResult::Purged { ref report, .. } if report.succeeded() == 1));

  assert!(!ws.exists("cstore.yml"));
  assert!(ws.exists("a.env"));
  let context_dir = ws.registry.settings().store_dir.join(context);
  assert!(!context_dir.exists() || std::fs::read_dir(&context_dir).unwrap().next().is_none());
}

#[test]
fn purge_leaves_other_contexts_alone() {
  let ws = Workspace::new();
  ws.write("one/a.env", "A=1");
  ws.write("two/a.env", "A=2");
  ops::push(&ws.registry, &ws.path("one"), &paths(&["a.env"]), &mut AutoAnswer(true)).unwrap();
  ops::push(&ws.registry, &ws.path("two"), &paths(&["a.env"]), &mut AutoAnswer(true)).unwrap();

  ops::purge(&ws.registry, &ws.path("one"), &paths(&[]), &mut AutoAnswer(true)).unwrap();
  ws.remove("two/a.env");
  ops::pull(&ws.registry, &ws.path("two"), &paths(&[]), &mut AutoAnswer(false)).unwrap();
  assert_eq!(ws.read("two/a.env"), "A=2");
}

#[test]
fn declined_purge_is_aborted() {
  let ws = Workspace::new();
  ws.write("a.env", "A=1");
  ops::push(&ws.registry, &ws.root(), &paths(&["a.env"]), &mut AutoAnswer(true)).unwrap();

  let result = ops::purge(&ws.registry, &ws.root(), &paths(&[]), &mut AutoAnswer(false)).unwrap();
  assert!(matches!(result, PurgeResult::Aborted));
  assert!(ws.catalog().get("a.env").is_some());
}
