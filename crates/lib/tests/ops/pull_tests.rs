use cstore_lib::ops::{self, OpError};
use cstore_lib::options::{ExportFormat, TagFilter, UserOptions};
use cstore_lib::prompt::AutoAnswer;

use super::common::{Workspace, paths};

fn push_one(ws: &Workspace, path: &str, content: &str, options: UserOptions) {
  ws.write(path, content);
  let options = UserOptions {
    paths: vec![path.to_string()],
    ..options
  };
  let result = ops::push(&ws.registry, &ws.root(), &options, &mut AutoAnswer(true)).unwrap();
  assert_eq!(result.report.succeeded(), 1, "push of {} failed", path);
}

#[test]
fn round_trip_restores_content() {
  let ws = Workspace::new();
  push_one(&ws, "a.env", "ENV=test1", UserOptions::default());
  ws.remove("a.env");

  let result = ops::pull(&ws.registry, &ws.root(), &paths(&["a.env"]), &mut AutoAnswer(false)).unwrap();
  assert_eq!(result.report.succeeded(), 1);
  assert_eq!(ws.read("a.env"), "ENV=test1");
}

#[test]
fn versioned_pull_restores_only_that_version() {
  let ws = Workspace::new();
  push_one(
    &ws,
    "a.env",
    "VER=1",
    UserOptions {
      version: Some("v1.0.0".to_string()),
      ..Default::default()
    },
  );
  push_one(
    &ws,
    "b.env",
    "VER=2",
    UserOptions {
      version: Some("v2.0.0".to_string()),
      ..Default::default()
    },
  );
  ws.remove("a.env");
  ws.remove("b.env");

  let options = UserOptions {
    version: Some("v1.0.0".to_string()),
    ..Default::default()
  };
  ops::pull(&ws.registry, &ws.root(), &options, &mut AutoAnswer(false)).unwrap();
  assert_eq!(ws.read("a.env"), "VER=1");
  assert!(!ws.exists("b.env"));
}

#[test]
fn tag_filter_selects_tagged_files() {
  let ws = Workspace::new();
  for (path, content, tag) in [("a.env", "ENV=dev", "dev"), ("b.env", "ENV=qa", "qa")] {
    push_one(
      &ws,
      path,
      content,
      UserOptions {
        tags: TagFilter::parse(tag),
        ..Default::default()
      },
    );
    ws.remove(path);
  }

  let options = UserOptions {
    tags: TagFilter::parse("dev"),
    ..Default::default()
  };
  ops::pull(&ws.registry, &ws.root(), &options, &mut AutoAnswer(false)).unwrap();
  assert_eq!(ws.read("a.env"), "ENV=dev");
  assert!(!ws.exists("b.env"));
}

#[test]
fn disjunction_tags_select_any_match() {
  let ws = Workspace::new();
  for (path, tags) in [
    ("a.env", "app|local"),
    ("b.env", "qa|app"),
    ("c.env", "local"),
    ("d.env", "uat|other"),
  ] {
    push_one(
      &ws,
      path,
      "X=1",
      UserOptions {
        tags: TagFilter::parse(tags),
        ..Default::default()
      },
    );
    ws.remove(path);
  }

  let options = UserOptions {
    tags: TagFilter::parse("app|local"),
    ..Default::default()
  };
  ops::pull(&ws.registry, &ws.root(), &options, &mut AutoAnswer(false)).unwrap();
  assert!(ws.exists("a.env"));
  assert!(ws.exists("b.env"));
  assert!(ws.exists("c.env"));
  assert!(!ws.exists("d.env"));
}

#[test]
fn secrets_round_trip_through_the_vault() {
  let ws = Workspace::new();
  push_one(
    &ws,
    "a.env",
    "DB=http://{{dev/user::u}}:{{dev/pass::p}}@h/db\nAPI={{dev/key::k}}",
    UserOptions::default(),
  );
  assert_eq!(ws.read("a.env"), "DB=http://{{dev/user}}:{{dev/pass}}@h/db\nAPI={{dev/key}}");
  ws.remove("a.env");

  let options = UserOptions {
    inject_secrets: true,
    ..paths(&["a.env"])
  };
  ops::pull(&ws.registry, &ws.root(), &options, &mut AutoAnswer(false)).unwrap();
  assert_eq!(ws.read("a.env"), "DB=http://{{dev/user}}:{{dev/pass}}@h/db\nAPI={{dev/key}}");
  assert_eq!(ws.read("a.env.secrets"), "DB=http://u:p@h/db\nAPI=k");
}

#[test]
fn json_secrets_are_injected_by_leaf_path() {
  let ws = Workspace::new();
  push_one(
    &ws,
    "app.json",
    r#"{"db": {"password": "{{dev/pass::hunter2}}"}}"#,
    UserOptions::default(),
  );
  ws.remove("app.json");

  let options = UserOptions {
    inject_secrets: true,
    ..paths(&["app.json"])
  };
  ops::pull(&ws.registry, &ws.root(), &options, &mut AutoAnswer(false)).unwrap();
  let vault = std::fs::read(&ws.registry.settings().vault_file).unwrap();
  assert!(!String::from_utf8_lossy(&vault).contains("hunter2"));

  let injected: serde_json::Value = serde_json::from_str(&ws.read("app.json.secrets")).unwrap();
  assert_eq!(injected["db"]["password"], "hunter2");
  assert!(ws.read("app.json").contains("{{dev/pass}}"));
}

#[test]
fn export_emits_json_object() {
  let ws = Workspace::new();
  push_one(&ws, "a.env", "A=1\nB=two\n", UserOptions::default());

  let options = UserOptions {
    export: Some(ExportFormat::JsonObject),
    ..Default::default()
  };
  let result = ops::pull(&ws.registry, &ws.root(), &options, &mut AutoAnswer(false)).unwrap();
  let exported = String::from_utf8(result.export.unwrap()).unwrap();
  assert_eq!(exported, "{\n    \"A\": \"1\",\n    \"B\": \"two\"\n}");
}

#[test]
fn pulling_uncataloged_paths_fails() {
  let ws = Workspace::new();
  push_one(&ws, "a.env", "A=1", UserOptions::default());

  let err = ops::pull(&ws.registry, &ws.root(), &paths(&["nope.env"]), &mut AutoAnswer(false)).unwrap_err();
  assert!(matches!(err, OpError::NotCataloged));
}
