//! `autotest index` command.

use std::fmt::Write as _;

use crate::cli::IndexArgs;
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::index::{FileContext, IndexStats, ProjectIndex};

/// Execute the `index` command.
///
/// Builds the project index, prints its summary and, with `--file`, the
/// context of that file.
///
/// # Errors
///
/// Returns an error if the root cannot be walked or `--file` is not indexed.
pub fn run(ctx: &ServiceContext, args: &IndexArgs) -> Result<()> {
    let index = ProjectIndex::build(ctx.fs.as_ref(), &args.root)?;
    print!("{}", render_stats(&index.stats()));

    if let Some(file) = &args.file {
        let context = index
            .file_context(file)
            .ok_or_else(|| Error::Config(format!("{file} is not an indexed source file")))?;
        print!("\n{}", render_file_context(&context));
    }
    Ok(())
}

fn render_stats(stats: &IndexStats) -> String {
    format!(
        "Files indexed:        {}\n\
         Total exports:        {}\n\
         Total dependencies:   {}\n\
         Avg exports per file: {:.2}\n",
        stats.files_indexed,
        stats.total_exports,
        stats.total_dependencies,
        stats.avg_exports_per_file
    )
}

fn render_file_context(context: &FileContext<'_>) -> String {
    let mut out = format!("File: {}\n", context.path);
    out.push_str("Exports:\n");
    for symbol in context.symbols {
        let suffix = if symbol.is_async { ", async" } else { "" };
        let _ = writeln!(out, "  {} ({}{suffix})", symbol.name, symbol.kind.label());
    }
    out.push_str("Imports:\n");
    for target in context.imports {
        let _ = writeln!(out, "  {target}");
    }
    out.push_str("Related:\n");
    for path in &context.related {
        let _ = writeln!(out, "  {path}");
    }
    out.push_str("Similar:\n");
    for similar in &context.similar {
        let _ = writeln!(out, "  {} ({})", similar.path, similar.score);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceFile;
    use std::path::Path;

    #[test]
    fn stats_block() {
        let stats = IndexStats {
            files_indexed: 4,
            total_exports: 6,
            total_dependencies: 3,
            avg_exports_per_file: 1.5,
        };
        assert_eq!(
            render_stats(&stats),
            "Files indexed:        4\n\
             Total exports:        6\n\
             Total dependencies:   3\n\
             Avg exports per file: 1.50\n"
        );
    }

    #[test]
    fn file_context_block() {
        let index = ProjectIndex::from_files(
            Path::new("/p"),
            [
                SourceFile::parse(
                    "src/a.ts",
                    concat!(
                        "import { b } from './b';\n",
                        "import x from 'lodash';\n",
                        "export async function run() {}\n",
                    ),
                ),
                SourceFile::parse("src/b.ts", "export function run() {}\n"),
            ],
        );
        let text = render_file_context(&index.file_context("src/a.ts").unwrap());
        assert_eq!(
            text,
            "File: src/a.ts\n\
             Exports:\n  run (function, async)\n\
             Imports:\n  ./b\n  lodash\n\
             Related:\n  src/b.ts\n\
             Similar:\n  src/b.ts (1)\n"
        );
    }
}
