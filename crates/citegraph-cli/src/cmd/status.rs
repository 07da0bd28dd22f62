//! `citegraph status` - list stage manifests under an output directory

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use citegraph_store::StageManifest;

use super::output_root;
use crate::config::Config;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output root directory
    pub dir: Option<PathBuf>,
}

pub fn run(args: StatusArgs, config: &Config) -> Result<()> {
    let root = output_root(args.dir, config);
    let manifests = StageManifest::find_all(&root)?;
    if manifests.is_empty() {
        eprintln!("No stage outputs under {}", root.display());
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Stage").fg(Color::Cyan),
            Cell::new("Directory").fg(Color::Cyan),
            Cell::new("Content").fg(Color::Cyan),
            Cell::new("Rows").fg(Color::Cyan),
            Cell::new("Created").fg(Color::Cyan),
        ]);

    for (dir, m) in &manifests {
        let rows = m
            .row_counts
            .iter()
            .map(|(file, n)| format!("{file}: {}", citegraph_core::fmt_num(*n)))
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(m.stage),
            Cell::new(dir.display()),
            Cell::new(m.short_content_hash()),
            Cell::new(rows),
            Cell::new(m.created_at.format("%Y-%m-%d %H:%M UTC")),
        ]);
    }

    eprintln!("\n{table}");
    Ok(())
}
