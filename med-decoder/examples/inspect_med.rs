//! Inspect a MED raw file: list its array variables and section layout
//!
//! Usage:
//!   inspect_med <raw_file> [--var-cols <n>]

use med_decoder::{locate_block, ExtractConfig, RawGrid, SectionMarkers};
use std::env;
use std::path::PathBuf;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <raw_file> [--var-cols <n>]", args[0]);
        std::process::exit(1);
    }

    let path = PathBuf::from(&args[1]);
    let mut config = ExtractConfig::new();
    if let Some(pos) = args.iter().position(|a| a == "--var-cols") {
        match args.get(pos + 1).and_then(|v| v.parse::<usize>().ok()) {
            Some(n) => config = config.with_var_cols(n),
            None => {
                eprintln!("--var-cols expects a number");
                std::process::exit(1);
            }
        }
    }

    println!("\n═══════════════════════════════════════");
    println!("Inspecting: {:?}", path);
    println!("═══════════════════════════════════════");

    let grid = match RawGrid::load(&path, &config) {
        Ok(g) => g,
        Err(e) => {
            println!("✗ Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("✓ {} rows after header, {} data columns\n", grid.len(), grid.var_cols());
    if let Some(subject) = grid.field("Subject") {
        println!("Subject: {}", subject);
    }

    let sections = SectionMarkers::find(&grid, &config.section_sentinel);
    println!("Section starts ({}): {:?}\n", sections.len(), sections.as_slice());

    println!("Array variables:");
    println!("─────────────────────────");
    for &start in sections.as_slice() {
        let Some(label_row) = start.checked_sub(1).and_then(|i| grid.row(i)) else {
            println!("  (section at row {} has no label row)", start);
            continue;
        };
        match locate_block(&grid, &label_row.label, &config.section_sentinel) {
            Ok(block) => {
                let cells: usize = grid.rows()[block.rows()].iter().map(|r| r.cells.len()).sum();
                println!(
                    "  {:6} rows {:4}..={:<4} {:5} cells",
                    label_row.label, block.start, block.end, cells
                );
            }
            Err(e) => println!("  {:6} ✗ {}", label_row.label, e),
        }
    }
}
