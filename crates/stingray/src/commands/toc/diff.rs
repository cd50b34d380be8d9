use clap::{Args, ValueEnum};
use itertools::Itertools;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};
use std::{
    collections::HashSet,
    fmt::Display,
    path::{Path, PathBuf},
};
use stingray_toc::{ToCFile, ToCHeader};

use super::{read_toc, DecodeArgs};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Mode {
    /// Only list what changed
    #[default]
    Semantic,
    /// Also show each modified record side by side
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Change {
    Field(&'static str, String, String),
    Added(u64),
    Removed(u64),
    Modified(u64, Vec<Change>),
    Context(Vec<String>),
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Field(name, old, new) => {
                writeln!(f, "* {}: {} vs {}", name, old.red(), new.green())
            }
            Change::Added(file_id) => {
                writeln!(f, "✅ {}", format!("{:016x}", file_id).green())
            }
            Change::Removed(file_id) => {
                writeln!(f, "❌ {}", format!("{:016x}", file_id).red())
            }
            Change::Modified(file_id, children) => {
                writeln!(f, "🔃 {}", format!("{:016x}", file_id).blue())?;
                let body = children.iter().map(|c| c.to_string()).join("");
                for line in body.lines().filter(|l| !l.trim().is_empty()) {
                    writeln!(f, "  {}", line)?;
                }
                Ok(())
            }
            Change::Context(lines) => {
                writeln!(f, "{}", lines.iter().map(|l| format!(" {}", l)).join("\n"))
            }
        }
    }
}

fn header_fields(h: &ToCHeader) -> [(&'static str, String); 13] {
    [
        ("file id", format!("{:016x}", h.file_id)),
        ("type id", format!("{:016x}", h.type_id)),
        ("toc data offset", h.toc_data_offset.to_string()),
        ("stream offset", h.stream_file_offset.to_string()),
        ("gpu resource offset", h.gpu_resource_offset.to_string()),
        ("unknown 1", format!("{:#x}", h.unknown1)),
        ("unknown 2", format!("{:#x}", h.unknown2)),
        ("toc data size", h.toc_data_size.to_string()),
        ("stream size", h.stream_size.to_string()),
        ("gpu resource size", h.gpu_resource_size.to_string()),
        ("unknown 3", format!("{:#x}", h.unknown3)),
        ("unknown 4", format!("{:#x}", h.unknown4)),
        ("entry index", h.entry_index.to_string()),
    ]
}

fn inline_context(old: &str, new: &str) -> Vec<String> {
    let diff = TextDiff::from_lines(old, new);

    let mut lines = Vec::new();
    for op in diff.ops().iter() {
        for change in diff.iter_inline_changes(op) {
            let mut line = String::new();
            for (emphasized, value) in change.iter_strings_lossy() {
                let value = value.trim_end_matches('\n');
                if emphasized {
                    if change.tag() == ChangeTag::Insert {
                        line.push_str(&format!("{}", value.green().underline()));
                    } else {
                        line.push_str(&format!("{}", value.red().underline()));
                    }
                } else {
                    line.push_str(&format!("{}", value.dimmed()));
                }
            }
            lines.push(line);
        }
    }
    lines
}

#[derive(Args)]
pub struct DiffArgs {
    /// An input ToC file, or a JSON dump of one
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// An input ToC file, or a JSON dump of one
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,

    /// Comparison mode
    #[arg(short, long, value_enum, default_value_t = Mode::Semantic)]
    mode: Mode,

    #[command(flatten)]
    decode: DecodeArgs,
}

impl DiffArgs {
    fn load(&self, path: &Path) -> Result<ToCFile> {
        if path.extension().is_some_and(|e| e == "json") {
            let json = std::fs::read_to_string(path)
                .into_diagnostic()
                .context(format!("path: {}", path.display()))?;
            return Ok(ToCFile::from_json(json)?);
        }
        read_toc(path, self.decode.options())
    }

    fn handle_header(&self, left: &ToCHeader, right: &ToCHeader) -> Option<Change> {
        if left == right {
            return None;
        }

        let mut children = header_fields(left)
            .into_iter()
            .zip(header_fields(right))
            .filter(|((_, old), (_, new))| old != new)
            .map(|((name, old), (_, new))| Change::Field(name, old, new))
            .collect::<Vec<_>>();

        if self.mode == Mode::Full {
            children.push(Change::Context(inline_context(
                &format!("{:#?}", left),
                &format!("{:#?}", right),
            )));
        }

        Some(Change::Modified(left.file_id, children))
    }

    fn handle_toc(&self, left: &ToCFile, right: &ToCFile) -> Vec<Change> {
        let mut result = Vec::new();

        if left.num_types != right.num_types {
            result.push(Change::Field(
                "types",
                left.num_types.to_string(),
                right.num_types.to_string(),
            ));
        }

        if left.num_files != right.num_files {
            result.push(Change::Field(
                "files",
                left.num_files.to_string(),
                right.num_files.to_string(),
            ));
        }

        if left.unknown != right.unknown {
            result.push(Change::Field(
                "unknown",
                format!("{:#x}", left.unknown),
                format!("{:#x}", right.unknown),
            ));
        }

        let reserved_changed = left
            .reserved_block
            .iter()
            .zip(right.reserved_block.iter())
            .filter(|(l, r)| l != r)
            .count();
        if reserved_changed > 0 {
            result.push(Change::Field(
                "reserved block",
                format!("{} bytes", left.reserved_block.len()),
                format!("{} bytes differ", reserved_changed),
            ));
        }

        let left_ids = left.file_ids().collect::<HashSet<_>>();
        let right_ids = right.file_ids().collect::<HashSet<_>>();

        right_ids
            .difference(&left_ids)
            .sorted()
            .for_each(|id| result.push(Change::Added(*id)));

        left_ids
            .difference(&right_ids)
            .sorted()
            .for_each(|id| result.push(Change::Removed(*id)));

        left_ids
            .intersection(&right_ids)
            .sorted()
            .filter_map(|id| match (left.by_id(*id), right.by_id(*id)) {
                (Some(l), Some(r)) => self.handle_header(l, r),
                _ => None,
            })
            .for_each(|c| result.push(c));

        result
    }

    pub fn handle(&self) -> Result<()> {
        let left = self.load(&self.left)?;
        let right = self.load(&self.right)?;

        let changes = self.handle_toc(&left, &right);
        if changes.is_empty() {
            println!("{}", "no differences".dimmed());
            return Ok(());
        }

        println!(
            "🔃 {} vs {}",
            self.left.display().blue(),
            self.right.display().blue()
        );
        for change in changes {
            print!("{}", change);
        }

        Ok(())
    }
}
