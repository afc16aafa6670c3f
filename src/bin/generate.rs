use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Writes synthetic number files for exercising the main binary: one random
/// signed 64-bit integer per line, appended to the target file.
#[derive(Parser, Debug)]
#[command(name = "topn-generate")]
#[command(about = "Generate a test file of random 64-bit integers", long_about = None)]
struct Cli {
    /// Output file (appended to if it already exists)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Number of lines to write
    #[arg(value_name = "LINES")]
    lines: u64,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = generate(&cli) {
        eprintln!("Error writing {}: {}", cli.file.display(), e);
        std::process::exit(1);
    }
}

fn generate(cli: &Cli) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.file)?;
    let mut writer = BufWriter::new(file);
    let mut rng = rand::thread_rng();

    let bar = ProgressBar::new(cli.lines);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.green} {pos}/{len} lines")
            .unwrap(),
    );

    for i in 0..cli.lines {
        writeln!(writer, "{}", rng.gen::<i64>())?;
        if i % 10_000 == 0 {
            bar.set_position(i);
        }
    }

    writer.flush()?;
    bar.finish_and_clear();
    Ok(())
}
