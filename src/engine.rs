use crate::bounded_heap::BoundedMinHeap;
use crate::config::TopnConfig;
use crate::reader::NumberFileReader;
use crate::timer::Timer;
use crate::types::{RunReport, Totals, Warning};
use crate::worker::Worker;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Extracts the top-N integers from a set of line-oriented sources.
///
/// A producer/consumer arrangement: one reader per source feeds a single
/// bounded queue, a fixed pool of workers drains it into private bounded
/// heaps, and this engine periodically folds every worker's partial result
/// into one overall heap (the merge sweep). The bounded queue gives
/// backpressure for free: readers block when it is full, workers block when
/// it is empty.
///
/// Run phases, in order: validate, start pools, progress sweeps while sources
/// are producing, drain the queue, finish the workers, join, final sweep,
/// sorted report.
#[derive(Debug)]
pub struct TopNEngine {
    files: Vec<PathBuf>,
    n: usize,
    worker_count: usize,
    queue_capacity: usize,
    read_limit: Option<u64>,
    config: TopnConfig,

    /// The top-N as a union of top-Ns from the workers. Only the engine
    /// mutates it, so it needs no guard.
    overall: BoundedMinHeap,
    workers: Vec<Arc<Worker>>,
    readers: Vec<Arc<NumberFileReader>>,
    queue: Option<Receiver<i64>>,
    handles: Vec<JoinHandle<()>>,
}

/// A best-effort view of the running answer, emitted once per sweep.
#[derive(Debug, Clone)]
pub struct ProgressSnapshot {
    pub n: usize,
    pub lines_read: u64,
    /// Current best-N in ascending order. Approximate: values still in the
    /// queue or in worker heaps between sweeps are not reflected yet.
    pub values: Vec<i64>,
}

#[derive(Debug)]
pub enum EngineError {
    /// Invalid construction parameters; raised before any thread starts.
    Configuration(String),
    /// The final report was requested while sources were still producing.
    PrematureReport,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            EngineError::PrematureReport => {
                write!(f, "Cannot report results - reading still in progress")
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl TopNEngine {
    pub fn new(
        files: Vec<PathBuf>,
        n: usize,
        worker_count: usize,
        queue_capacity: usize,
        read_limit: Option<u64>,
        config: TopnConfig,
    ) -> Result<Self, EngineError> {
        if files.is_empty() {
            return Err(EngineError::Configuration(
                "at least one source file is required".to_string(),
            ));
        }
        if n == 0 {
            return Err(EngineError::Configuration("N must be positive".to_string()));
        }
        if worker_count == 0 {
            return Err(EngineError::Configuration(
                "worker count must be positive".to_string(),
            ));
        }
        if queue_capacity == 0 {
            return Err(EngineError::Configuration(
                "queue capacity must be positive".to_string(),
            ));
        }

        Ok(Self {
            overall: BoundedMinHeap::new(n),
            files,
            n,
            worker_count,
            queue_capacity,
            read_limit,
            config,
            workers: Vec::new(),
            readers: Vec::new(),
            queue: None,
            handles: Vec::new(),
        })
    }

    /// Runs the whole pipeline to completion. `on_progress` is called once
    /// per merge sweep with the current approximate answer.
    ///
    /// Consumes the engine: the queue, pools, and counters are built for
    /// exactly one run.
    pub fn execute<F>(mut self, mut on_progress: F) -> Result<RunReport, EngineError>
    where
        F: FnMut(ProgressSnapshot),
    {
        let timer = Timer::start();

        let (tx, rx) = bounded(self.queue_capacity);
        self.queue = Some(rx.clone());
        self.start_worker_pool(rx);
        self.start_readers(tx);

        self.report_progress(&mut on_progress);
        self.report_result(timer)
    }

    /// Workers hang around until there is work to do.
    fn start_worker_pool(&mut self, queue: Receiver<i64>) {
        for _ in 0..self.worker_count {
            let worker = Arc::new(Worker::new(
                self.n,
                queue.clone(),
                self.config.recv_timeout(),
            ));
            let handle = {
                let worker = Arc::clone(&worker);
                std::thread::spawn(move || worker.run())
            };
            self.workers.push(worker);
            self.handles.push(handle);
        }
    }

    /// One reader per source. The senders move into the reader threads and
    /// are released when `run` returns, so the channel disconnects by itself
    /// once every source is consumed.
    fn start_readers(&mut self, queue: Sender<i64>) {
        for file in &self.files {
            let reader = Arc::new(NumberFileReader::new(file.clone(), self.read_limit));
            let handle = {
                let reader = Arc::clone(&reader);
                let queue = queue.clone();
                std::thread::spawn(move || reader.run(queue))
            };
            self.readers.push(reader);
            self.handles.push(handle);
        }
    }

    /// Sweeps and reports on a fixed interval while sources are producing.
    ///
    /// N is expected to be small next to the stream length, so the periodic
    /// partial answer is cheap and tells the user the run is going somewhere.
    fn report_progress<F>(&mut self, on_progress: &mut F)
    where
        F: FnMut(ProgressSnapshot),
    {
        while !self.files_read() {
            self.merge_sweep();
            on_progress(self.snapshot());
            std::thread::sleep(self.config.update_interval());
        }
    }

    /// Drains, stops, joins, performs the last sweep, and produces the final
    /// sorted report. Fails loudly if any source is still producing.
    fn report_result(&mut self, mut timer: Timer) -> Result<RunReport, EngineError> {
        if !self.files_read() {
            return Err(EngineError::PrematureReport);
        }
        self.wait_for_queue_to_drain();
        self.instruct_workers_to_finish();
        self.wait_for_workers_to_finish();
        self.join_pools();
        // Catches values inserted between the drain check and shutdown.
        self.merge_sweep();
        timer.stop();

        let warnings: Vec<Warning> = self
            .readers
            .iter()
            .flat_map(|reader| reader.take_warnings())
            .collect();
        let totals = Totals {
            lines_read: self.lines_read(),
            skipped_lines: self.skipped_lines(),
            elapsed_seconds: timer.elapsed_seconds(),
        };
        let overall = std::mem::replace(&mut self.overall, BoundedMinHeap::new(self.n));

        Ok(RunReport {
            n: self.n,
            worker_count: self.worker_count,
            queue_capacity: self.queue_capacity,
            sources: self.files.iter().map(|f| f.display().to_string()).collect(),
            totals,
            values: overall.into_sorted_vec(),
            warnings,
        })
    }

    /// Folds every worker's partial heap into the overall heap. Serializes
    /// only with the one worker being merged at that instant.
    fn merge_sweep(&mut self) {
        for worker in &self.workers {
            worker.merge_into(&mut self.overall);
        }
    }

    fn snapshot(&self) -> ProgressSnapshot {
        // heap_sort is destructive, so sort a clone and keep the accumulator.
        ProgressSnapshot {
            n: self.n,
            lines_read: self.lines_read(),
            values: self.overall.clone().into_sorted_vec(),
        }
    }

    fn files_read(&self) -> bool {
        self.readers.iter().all(|reader| reader.is_finished())
    }

    fn lines_read(&self) -> u64 {
        self.readers.iter().map(|reader| reader.records_read()).sum()
    }

    fn skipped_lines(&self) -> u64 {
        self.readers.iter().map(|reader| reader.skipped_lines()).sum()
    }

    /// No enqueued value may be lost before workers are told to stop.
    fn wait_for_queue_to_drain(&self) {
        if let Some(queue) = &self.queue {
            while !queue.is_empty() {
                std::thread::sleep(self.config.backoff());
            }
        }
    }

    fn instruct_workers_to_finish(&self) {
        for worker in &self.workers {
            worker.request_finish();
        }
    }

    fn wait_for_workers_to_finish(&self) {
        while self.workers.iter().any(|worker| !worker.is_done()) {
            std::thread::sleep(self.config.backoff());
        }
    }

    fn join_pools(&mut self) {
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}
