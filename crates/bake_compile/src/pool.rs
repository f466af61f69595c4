//! Parallel execution of compilation tasks with cooperative stopping.
//!
//! With one worker, tasks run on the calling thread in order and write
//! directly to the console; the run ends at the first failure. With more,
//! tasks go to a rayon thread pool and write into private buffers that the
//! calling thread flushes whole, so the output of different compilations
//! never interleaves. A failing task raises the [`StopSignal`] before it
//! returns: running tasks finish and are reported, tasks that have not
//! started are skipped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::CompileError;
use crate::output::{Buffered, OutputSink};
use crate::result::CompilationResult;

/// A raise-once flag shared by every task of one run.
#[derive(Debug, Default)]
pub struct StopSignal {
    raised: AtomicBool,
}

impl StopSignal {
    /// Creates a lowered signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the signal. Returns `true` for the call that raised it.
    pub fn raise(&self) -> bool {
        !self.raised.swap(true, Ordering::AcqRel)
    }

    /// Returns `true` once the signal has been raised.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

/// A task that ran, with everything it printed and its result.
#[derive(Clone, Debug)]
pub struct TaskOutcome<T> {
    /// The task as it was submitted.
    pub task: T,
    /// Output buffered by the task; empty when it wrote to the console.
    pub output: String,
    /// The compilation result.
    pub result: CompilationResult,
}

/// A fixed number of workers running compilation tasks.
pub struct WorkerPool {
    workers: usize,
    pool: Option<ThreadPool>,
}

impl WorkerPool {
    /// Creates a pool of `workers` threads (at least one).
    ///
    /// A single worker runs tasks on the calling thread.
    pub fn new(workers: usize) -> Result<Self, CompileError> {
        let workers = workers.max(1);
        let pool = if workers > 1 {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("bake-worker-{i}"))
                    .build()?,
            )
        } else {
            None
        };
        Ok(Self { workers, pool })
    }

    /// Number of workers.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs `job` over `tasks`, returning outcomes in completion order.
    ///
    /// Tasks are started in the order given. Tasks skipped after a failure
    /// have no outcome.
    pub fn run<T, F>(
        &self,
        tasks: &[T],
        job: F,
        console: &mut dyn OutputSink,
    ) -> Vec<TaskOutcome<T>>
    where
        T: Clone + Send + Sync,
        F: Fn(&T, &mut dyn OutputSink) -> CompilationResult + Sync,
    {
        match &self.pool {
            None => run_sequential(tasks, &job, console),
            Some(pool) => run_parallel(pool, tasks, &job, console),
        }
    }
}

fn run_sequential<T, F>(tasks: &[T], job: &F, console: &mut dyn OutputSink) -> Vec<TaskOutcome<T>>
where
    T: Clone,
    F: Fn(&T, &mut dyn OutputSink) -> CompilationResult,
{
    let mut outcomes = Vec::with_capacity(tasks.len());
    for task in tasks {
        let result = job(task, console);
        let failed = !result.success();
        outcomes.push(TaskOutcome {
            task: task.clone(),
            output: String::new(),
            result,
        });
        if failed {
            tracing::debug!(skipped = tasks.len() - outcomes.len(), "stopping after failure");
            break;
        }
    }
    outcomes
}

fn run_parallel<T, F>(
    pool: &ThreadPool,
    tasks: &[T],
    job: &F,
    console: &mut dyn OutputSink,
) -> Vec<TaskOutcome<T>>
where
    T: Clone + Send + Sync,
    F: Fn(&T, &mut dyn OutputSink) -> CompilationResult + Sync,
{
    let stop = StopSignal::new();
    let (tx, rx) = mpsc::channel::<TaskOutcome<T>>();
    let mut outcomes = Vec::with_capacity(tasks.len());

    pool.in_place_scope_fifo(|scope| {
        for task in tasks {
            let tx = tx.clone();
            let stop = &stop;
            scope.spawn_fifo(move |_| {
                if stop.is_raised() {
                    return;
                }
                let mut buffer = Buffered::new();
                let result = job(task, &mut buffer);
                if !result.success() {
                    stop.raise();
                }
                // The receiver outlives every task of the scope.
                let _ = tx.send(TaskOutcome {
                    task: task.clone(),
                    output: buffer.into_string(),
                    result,
                });
            });
        }
        drop(tx);

        let mut failed = false;
        for outcome in rx {
            console.write_str(&outcome.output);
            if !outcome.result.success() && !failed {
                failed = true;
                tracing::debug!("first failure, skipping tasks that have not started");
            }
            outcomes.push(outcome);
        }
    });

    outcomes
}
