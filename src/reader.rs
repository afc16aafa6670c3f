use crate::types::Warning;
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Cap on retained warning records per source; the skip counter keeps the
/// full tally.
const MAX_WARNINGS: usize = 32;

/// Reads a text file with one signed 64-bit integer per line and puts each
/// value onto the shared work queue.
///
/// Malformed lines are skipped and recorded as warnings, never propagated.
/// The blocking `send` on the bounded queue is what gives the run its
/// backpressure. The reader holds its `Sender` only for the duration of
/// `run`, so the channel disconnects once every reader is done. The
/// orchestrator polls `is_finished` / `records_read`; it never mutates
/// reader state.
#[derive(Debug)]
pub struct NumberFileReader {
    path: PathBuf,
    /// Optional bound on lines consumed, handy for test runs on large files.
    read_limit: Option<u64>,
    lines_read: AtomicU64,
    skipped: AtomicU64,
    finished: AtomicBool,
    warnings: Mutex<Vec<Warning>>,
}

impl NumberFileReader {
    pub fn new(path: impl Into<PathBuf>, read_limit: Option<u64>) -> Self {
        Self {
            path: path.into(),
            read_limit,
            lines_read: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            finished: AtomicBool::new(false),
            warnings: Mutex::new(Vec::new()),
        }
    }

    /// Reads the whole source (or up to the limit) and marks itself finished
    /// on every exit path, including open failures.
    ///
    /// Takes the sender by value: releasing it on return is what lets idle
    /// workers observe the disconnect instead of waiting out their timeout.
    pub fn run(&self, queue: Sender<i64>) {
        if let Err(e) = self.read_and_queue(&queue) {
            self.warn(e.to_string());
        }
        drop(queue);
        self.finished.store(true, Ordering::Release);
    }

    fn read_and_queue(&self, queue: &Sender<i64>) -> std::io::Result<()> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        for line in reader.lines() {
            if !self.should_continue() {
                break;
            }
            let line = line?;
            match line.trim().parse::<i64>() {
                Ok(value) => {
                    if queue.send(value).is_err() {
                        // All consumers are gone; the run is being torn down.
                        break;
                    }
                }
                Err(_) => {
                    self.skipped.fetch_add(1, Ordering::Relaxed);
                    self.warn(format!("can't coax {:?} to i64", line));
                }
            }
            self.lines_read.fetch_add(1, Ordering::Relaxed);
        }

        Ok(())
    }

    fn should_continue(&self) -> bool {
        match self.read_limit {
            Some(limit) => self.lines_read.load(Ordering::Relaxed) < limit,
            None => true,
        }
    }

    fn warn(&self, error: String) {
        let mut warnings = self.warnings.lock();
        if warnings.len() < MAX_WARNINGS {
            warnings.push(Warning {
                source: self.path.display().to_string(),
                error,
            });
        }
    }

    /// True once the reader has consumed its source (or given up on it).
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Lines consumed so far, malformed lines included.
    pub fn records_read(&self) -> u64 {
        self.lines_read.load(Ordering::Relaxed)
    }

    /// Malformed lines skipped so far.
    pub fn skipped_lines(&self) -> u64 {
        self.skipped.load(Ordering::Relaxed)
    }

    /// Drains the retained warning records.
    pub fn take_warnings(&self) -> Vec<Warning> {
        std::mem::take(&mut *self.warnings.lock())
    }
}
