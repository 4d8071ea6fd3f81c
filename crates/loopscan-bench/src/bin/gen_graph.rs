//! Writes a generated dataset as JSON, for feeding `loopscan detect`.
//!
//! Usage: `gen-graph [small|medium|large] [seed] [output-path]`. Without an
//! output path the document goes to stdout.

use std::error::Error;
use std::fs;
use std::io::{BufWriter, Write as _};

use loopscan_bench::{SizeTier, generate_graph};

fn parse_tier(name: &str) -> Result<SizeTier, String> {
    match name {
        "small" => Ok(SizeTier::Small),
        "medium" => Ok(SizeTier::Medium),
        "large" => Ok(SizeTier::Large),
        other => Err(format!("unknown tier {other:?} (expected small, medium or large)")),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let tier = parse_tier(args.next().as_deref().unwrap_or("medium"))?;
    let seed: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => 42,
    };

    let dataset = generate_graph(&tier.config(seed))?;
    eprintln!(
        "Generated {} vertices, {} edges ({tier:?}, seed {seed})",
        dataset.vertices.len(),
        dataset.edges.len()
    );

    match args.next() {
        Some(path) => {
            let mut writer = BufWriter::new(fs::File::create(&path)?);
            serde_json::to_writer_pretty(&mut writer, &dataset)?;
            writer.flush()?;
            eprintln!("Wrote {path}");
        }
        None => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &dataset)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
