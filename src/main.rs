mod bounded_heap;
mod cli;
mod config;
mod engine;
mod output;
mod reader;
mod timer;
mod types;
mod worker;

use clap::Parser;
use cli::Cli;
use config::TopnConfig;
use engine::TopNEngine;
use is_terminal::IsTerminal;
use output::{JsonRenderer, TerminalRenderer};
use timer::Timer;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    let mut config = match TopnConfig::load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    if let Some(ms) = cli.update_interval {
        config.update_interval_ms = ms;
    }

    let engine = match TopNEngine::new(
        cli.files.clone(),
        cli.n,
        cli.worker_count,
        cli.queue_capacity,
        cli.limit,
        config,
    ) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let use_color = !cli.no_color && std::io::stdout().is_terminal();
    let renderer = TerminalRenderer::new(use_color);

    // Progress lines would corrupt JSON piped to stdout.
    let show_progress = !cli.json;
    if show_progress {
        renderer.render_partial_header(cli.n);
    }

    let mut timer = Timer::start();
    let result = engine.execute(|snapshot| {
        if show_progress {
            renderer.render_progress(&snapshot);
        }
    });
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    timer.stop();

    if cli.should_output_json() {
        let json = JsonRenderer::new();
        if let Err(e) = json.render(&report, cli.output.as_deref()) {
            eprintln!("Error writing JSON output: {}", e);
            std::process::exit(3);
        }
    } else {
        renderer.render(&report);
        println!("Complete in {}", timer);
    }

    let exit_code = if report.warnings.is_empty() { 0 } else { 1 };
    std::process::exit(exit_code);
}
