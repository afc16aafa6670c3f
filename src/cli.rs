use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "topn")]
#[command(about = "Extract the top-N largest integers from number files", long_about = None)]
pub struct Cli {
    /// How many of the largest values to keep
    #[arg(value_name = "N")]
    pub n: usize,

    /// Number of concurrent worker threads
    #[arg(value_name = "WORKER_COUNT")]
    pub worker_count: usize,

    /// Capacity of the shared work queue
    #[arg(value_name = "QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Number files to read, one signed 64-bit integer per line
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Stop each source after this many lines (handy for large test files)
    #[arg(long, value_name = "LINES")]
    pub limit: Option<u64>,

    /// Milliseconds between progress reports (overrides the config file)
    #[arg(long, value_name = "MS")]
    pub update_interval: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Output JSON to stdout
    #[arg(long)]
    pub json: bool,

    /// Write JSON output to file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Config file path (default: ~/.config/topn/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        if self.n == 0 {
            return Err("N must be positive".to_string());
        }
        if self.worker_count == 0 {
            return Err("WORKER_COUNT must be positive".to_string());
        }
        if self.queue_capacity == 0 {
            return Err("QUEUE_CAPACITY must be positive".to_string());
        }
        Ok(())
    }

    pub fn should_output_json(&self) -> bool {
        self.json || self.output.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_positional_arguments() {
        let cli = Cli::try_parse_from(["topn", "10", "4", "1000", "a.txt", "b.txt"]).unwrap();
        assert_eq!(cli.n, 10);
        assert_eq!(cli.worker_count, 4);
        assert_eq!(cli.queue_capacity, 1000);
        assert_eq!(cli.files.len(), 2);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_requires_at_least_one_file() {
        assert!(Cli::try_parse_from(["topn", "10", "4", "1000"]).is_err());
    }

    #[test]
    fn test_rejects_zero_parameters() {
        let cli = Cli::try_parse_from(["topn", "0", "4", "1000", "a.txt"]).unwrap();
        assert!(cli.validate().is_err());

        let cli = Cli::try_parse_from(["topn", "10", "0", "1000", "a.txt"]).unwrap();
        assert!(cli.validate().is_err());

        let cli = Cli::try_parse_from(["topn", "10", "4", "0", "a.txt"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_json_output_modes() {
        let cli = Cli::try_parse_from(["topn", "3", "2", "10", "a.txt", "--json"]).unwrap();
        assert!(cli.should_output_json());

        let cli =
            Cli::try_parse_from(["topn", "3", "2", "10", "a.txt", "--output", "out.json"]).unwrap();
        assert!(cli.should_output_json());

        let cli = Cli::try_parse_from(["topn", "3", "2", "10", "a.txt"]).unwrap();
        assert!(!cli.should_output_json());
    }
}
