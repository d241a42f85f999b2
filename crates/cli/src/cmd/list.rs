//! Implementation of the `cstore list` command.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};

use cstore_lib::ops::{ListNode, list};
use cstore_lib::options::UserOptions;

use super::handle;
use crate::output::symbols;

pub fn cmd_list(cwd: &Path, options: &UserOptions) -> Result<ExitCode> {
  let result = match list(cwd, options) {
    Ok(result) => result,
    Err(e) => return handle(e),
  };

  println!("{}", result.catalog.display().if_supports_color(Stream::Stdout, |s| s.bold()));
  let mut lines = Vec::new();
  render(&result.nodes, "", options, &mut lines);
  for line in lines {
    println!("{}", line);
  }
  println!();
  println!("{} file(s)", result.file_count());
  Ok(ExitCode::SUCCESS)
}

fn label(node: &ListNode, options: &UserOptions) -> String {
  let mut label = if node.is_ref {
    format!("{} (linked)", node.path)
  } else {
    format!("{} ({})", node.path, node.store)
  };
  if options.view_tags && !node.tags.is_empty() {
    label.push_str(&format!(" [{}]", node.tags.join(", ")));
  }
  if options.view_versions && !node.versions.is_empty() {
    label.push_str(&format!(" versions: {}", node.versions.join(", ")));
  }
  if let Some(error) = &node.error {
    label.push_str(&format!(" ! {}", error));
  }
  label
}

fn render(nodes: &[ListNode], indent: &str, options: &UserOptions, lines: &mut Vec<String>) {
  for (i, node) in nodes.iter().enumerate() {
    let last = i + 1 == nodes.len();
    let branch = if last { symbols::LAST } else { symbols::BRANCH };
    lines.push(format!("{}{} {}", indent, branch, label(node, options)));
    if !node.children.is_empty() {
      let child_indent = format!("{}{}", indent, if last { "    " } else { symbols::PIPE });
      render(&node.children, &child_indent, options, lines);
    }
  }
}
