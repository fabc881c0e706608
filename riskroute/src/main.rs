//! riskroute — find the minimum-risk route through a digit grid.
//!
//! Reads a grid of single-digit entry costs, optionally tiles it with the
//! wrap-around increment rule, and searches for the cheapest route between
//! two cells (by default the top-left and bottom-right corners).

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use riskgrid_core::{Point, RiskGrid};
use riskgrid_paths::SearchRange;

/// Find the minimum-risk route through a grid of digit costs.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Input file: one grid row of digits 1-9 per line.
    input: PathBuf,

    /// Tile the grid N x N times with the wrap-around cost increment.
    #[arg(short, long, default_value_t = 1)]
    scale: u32,

    /// Start cell as `row,col` (default: top-left).
    #[arg(long, value_parser = parse_cell)]
    start: Option<Point>,

    /// End cell as `row,col` (default: bottom-right).
    #[arg(long, value_parser = parse_cell)]
    end: Option<Point>,

    /// Render the grid with the optimal route marked.
    #[arg(long)]
    show_path: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let lines = load_lines(&args.input)?;
    let base = RiskGrid::parse(&lines)
        .with_context(|| format!("malformed grid in {}", args.input.display()))?;
    let grid = if args.scale == 1 {
        base
    } else {
        base.tiled(args.scale, args.scale).context("tiling grid")?
    };
    eprintln!("grid is {} rows x {} columns", grid.height(), grid.width());

    let start = args.start.unwrap_or(Point::ZERO);
    let end = args
        .end
        .unwrap_or(Point::new(grid.width() - 1, grid.height() - 1));
    eprintln!("searching route {start} -> {end}");

    let mut search = SearchRange::new(grid.bounds());
    let total = search.shortest_path(&grid, start, end)?;

    println!("{total}");

    if args.show_path {
        let route = search.path_to(end)?;
        print!("{}", render_route(&grid, &route));
    }
    Ok(())
}

/// The input loader: raw text rows, one grid row per line.
fn load_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(text.trim_end().lines().map(str::to_owned).collect())
}

fn parse_cell(s: &str) -> Result<Point, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `row,col`, got `{s}`"))?;
    let y: i32 = row.trim().parse().map_err(|_| format!("bad row `{row}`"))?;
    let x: i32 = col.trim().parse().map_err(|_| format!("bad column `{col}`"))?;
    Ok(Point::new(x, y))
}

/// Render the grid with the route cells marked `#`, everything else `.`.
fn render_route(grid: &RiskGrid, route: &[Point]) -> String {
    let on_route: HashSet<Point> = route.iter().copied().collect();
    let mut out = String::new();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            out.push(if on_route.contains(&Point::new(x, y)) {
                '#'
            } else {
                '.'
            });
        }
        out.push('\n');
    }
    out
}
