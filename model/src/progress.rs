//! Progress reporting for long-running screens.
//!
//! Two kinds exist:
//!
//! - [`Simulator`]: a local counter for steps whose backend call reports no
//!   progress of its own. It has no relation to real work.
//! - [`BatchProgress`] driven by [`run_batch`]: one backend call per file,
//!   strictly in list order, each awaited before the next.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ModelResult;
use crate::tree::file_name;

// ----- Cosmetic simulator -----

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimTick {
    Advanced(u32),
    /// Reported exactly once, on the tick that reaches 100.
    Finished,
    /// Ticks after completion do nothing.
    Idle,
}

const PROCESSING_STAGES: &[&str] = &[
    "Analysing documents...",
    "Computing similarity...",
    "Creating categories...",
    "Classifying documents...",
    "Verifying results...",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Simulator {
    percent: u32,
    step: u32,
    interval: Duration,
    stages: &'static [&'static str],
    finished: bool,
}

impl Simulator {
    pub fn new(start: u32, step: u32, interval: Duration) -> Self {
        Self { percent: start.min(100), step: step.max(1), interval, stages: &[], finished: false }
    }

    pub fn with_stages(mut self, stages: &'static [&'static str]) -> Self {
        self.stages = stages;
        self
    }

    /// Category generation and classification step.
    pub fn category_processing() -> Self {
        Self::new(0, 1, Duration::from_millis(100)).with_stages(PROCESSING_STAGES)
    }

    /// Standalone category creation screen.
    pub fn category_creation() -> Self {
        Self::new(7, 1, Duration::from_millis(500))
    }

    /// Expert DB creation: a single backend request without progress.
    pub fn expert_db() -> Self {
        Self::new(0, 2, Duration::from_millis(300))
    }

    /// Per-file bar on the OCR screen while the file's request is in flight.
    pub fn ocr_file() -> Self {
        Self::new(0, 10, Duration::from_millis(150))
    }

    pub fn percent(&self) -> u32 {
        self.percent
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Label for the current percentage, if the simulator has stages.
    pub fn stage(&self) -> Option<&'static str> {
        if self.stages.is_empty() {
            return None;
        }
        let idx = (self.percent as usize * self.stages.len()) / 100;
        Some(self.stages[idx.min(self.stages.len() - 1)])
    }

    pub fn tick(&mut self) -> SimTick {
        if self.finished {
            return SimTick::Idle;
        }
        self.percent = (self.percent + self.step).min(100);
        if self.percent >= 100 {
            self.finished = true;
            SimTick::Finished
        } else {
            SimTick::Advanced(self.percent)
        }
    }
}

/// Ticks `sim` until it finishes, sleeping its interval between ticks.
///
/// `sleep` is supplied by the caller so the same loop runs on browser timers
/// and in tests.
pub async fn drive_simulator<S, Fut, F>(mut sim: Simulator, mut sleep: S, mut on_progress: F)
where
    S: FnMut(Duration) -> Fut,
    Fut: Future<Output = ()>,
    F: FnMut(u32, Option<&'static str>),
{
    on_progress(sim.percent(), sim.stage());
    loop {
        sleep(sim.interval()).await;
        match sim.tick() {
            SimTick::Advanced(p) => on_progress(p, sim.stage()),
            SimTick::Finished => {
                on_progress(100, sim.stage());
                return;
            }
            SimTick::Idle => return,
        }
    }
}

// ----- Real per-item batch -----

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Waiting,
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItem<R> {
    pub path: String,
    pub name: String,
    pub status: ItemStatus,
    pub progress: u8,
    pub result: Option<R>,
    pub error: Option<String>,
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Per-file status of one batch run plus aggregate counters.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProgress<R> {
    run_id: u64,
    items: Vec<BatchItem<R>>,
    started_at: DateTime<Utc>,
    item_started_at: Option<DateTime<Utc>>,
    busy: chrono::Duration,
    processed: usize,
    completed: usize,
    failed: usize,
    default_item_time: chrono::Duration,
}

impl<R> BatchProgress<R> {
    /// `default_item_time` seeds the estimate until the first file finishes.
    pub fn new(run_id: u64, paths: Vec<String>, now: DateTime<Utc>, default_item_time: chrono::Duration) -> Self {
        let items = paths
            .into_iter()
            .map(|path| BatchItem {
                name: file_name(&path).to_string(),
                path,
                status: ItemStatus::Waiting,
                progress: 0,
                result: None,
                error: None,
            })
            .collect();
        Self {
            run_id,
            items,
            started_at: now,
            item_started_at: None,
            busy: chrono::Duration::zero(),
            processed: 0,
            completed: 0,
            failed: 0,
            default_item_time,
        }
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn items(&self) -> &[BatchItem<R>] {
        &self.items
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn completed_count(&self) -> usize {
        self.completed
    }

    pub fn error_count(&self) -> usize {
        self.failed
    }

    pub fn is_done(&self) -> bool {
        self.processed == self.items.len()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// 1-based index of the file being worked on, for "3/10" labels.
    pub fn current_position(&self) -> usize {
        (self.processed + 1).min(self.items.len().max(1))
    }

    pub fn overall_percent(&self) -> f64 {
        if self.items.is_empty() {
            return 100.0;
        }
        self.processed as f64 / self.items.len() as f64 * 100.0
    }

    /// Mean wall time per finished file so far.
    pub fn average_item_time(&self) -> Option<chrono::Duration> {
        (self.processed > 0).then(|| self.busy / self.processed as i32)
    }

    /// Estimated completion: start + total × default before the first result,
    /// afterwards now + remaining × observed average.
    pub fn estimated_end(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let remaining = (self.items.len() - self.processed) as i32;
        match self.average_item_time() {
            Some(avg) => now + avg * remaining,
            None => self.started_at + self.default_item_time * self.items.len() as i32,
        }
    }

    pub fn begin(&mut self, index: usize, now: DateTime<Utc>) {
        if let Some(item) = self.items.get_mut(index) {
            item.status = ItemStatus::Processing;
            item.progress = 0;
            self.item_started_at = Some(now);
        }
    }

    pub fn succeed(&mut self, index: usize, result: R, now: DateTime<Utc>) {
        if let Some(item) = self.items.get_mut(index) {
            item.status = ItemStatus::Completed;
            item.progress = 100;
            item.result = Some(result);
            self.completed += 1;
            self.finish_item(now);
        }
    }

    pub fn fail(&mut self, index: usize, error: String, now: DateTime<Utc>) {
        if let Some(item) = self.items.get_mut(index) {
            item.status = ItemStatus::Error;
            item.error = Some(error);
            self.failed += 1;
            self.finish_item(now);
        }
    }

    fn finish_item(&mut self, now: DateTime<Utc>) {
        if let Some(started) = self.item_started_at.take() {
            self.busy = self.busy + (now - started);
        }
        self.processed += 1;
    }
}

/// Issues monotonically increasing run ids; only the newest run is current.
///
/// A cancelled flow calls [`RunGuard::invalidate`] so results of requests
/// still in flight are dropped instead of landing in a newer run's state.
#[derive(Debug, Clone, Default)]
pub struct RunGuard(Arc<AtomicU64>);

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn invalidate(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, run_id: u64) -> bool {
        self.0.load(Ordering::SeqCst) == run_id
    }
}

/// One backend call per file.
#[async_trait(?Send)]
pub trait BatchWorker {
    type Output;

    async fn process(&self, path: &str) -> ModelResult<Self::Output>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every file got a response; completion was reported.
    Finished { completed: usize, failed: usize },
    /// A newer run started or the flow was cancelled; remaining files were skipped.
    Superseded { processed: usize },
}

/// Runs `worker` over `paths` one at a time, in order.
///
/// `on_update` sees the state after every status change. `on_complete` runs
/// exactly once, after the last response, however many files failed. It does
/// not run when the run is superseded.
pub async fn run_batch<W, C, U, D>(
    guard: &RunGuard,
    paths: Vec<String>,
    worker: &W,
    clock: &C,
    default_item_time: chrono::Duration,
    mut on_update: U,
    on_complete: D,
) -> BatchOutcome
where
    W: BatchWorker + ?Sized,
    C: Clock + ?Sized,
    U: FnMut(&BatchProgress<W::Output>),
    D: FnOnce(&BatchProgress<W::Output>),
{
    let run_id = guard.begin();
    let mut progress = BatchProgress::new(run_id, paths, clock.now(), default_item_time);
    tracing::info!(run_id, files = progress.total(), "batch started");
    on_update(&progress);

    for index in 0..progress.total() {
        progress.begin(index, clock.now());
        on_update(&progress);

        let path = progress.items()[index].path.clone();
        let result = worker.process(&path).await;

        if !guard.is_current(run_id) {
            tracing::warn!(run_id, path = %path, "dropping response from superseded batch");
            return BatchOutcome::Superseded { processed: progress.processed() };
        }

        match result {
            Ok(output) => progress.succeed(index, output, clock.now()),
            Err(e) => {
                tracing::warn!(run_id, path = %path, error = %e, "batch item failed");
                progress.fail(index, e.user_message(), clock.now());
            }
        }
        on_update(&progress);
    }

    tracing::info!(run_id, completed = progress.completed_count(), failed = progress.error_count(), "batch finished");
    on_complete(&progress);
    BatchOutcome::Finished { completed: progress.completed_count(), failed: progress.error_count() }
}
