//! Fire-and-join background tasks on named rayon pools.
#![forbid(unsafe_code)]

use std::any::Any;
use std::sync::Arc;

use crossbeam_channel::{Receiver, TryRecvError, bounded};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task panicked before producing a result")]
    Panicked,
    #[error("failed to build thread pool: {0}")]
    Build(#[from] ThreadPoolBuildError),
}

/// Worker count used when a config leaves it unset.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Named worker pool. Cloning shares the underlying threads.
#[derive(Clone)]
pub struct TaskPool {
    name: Arc<str>,
    pool: Arc<ThreadPool>,
}

impl TaskPool {
    /// Builds a pool whose threads are named `{name}-{i}`. A panicking task is
    /// logged and its handle reports `TaskError::Panicked`.
    pub fn new(name: &str, threads: usize) -> Result<Self, TaskError> {
        let name: Arc<str> = Arc::from(name);
        let thread_prefix = name.clone();
        let panic_name = name.clone();
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(move |i| format!("{thread_prefix}-{i}"))
            .panic_handler(move |payload| {
                log::error!(target: "task", "{} task panicked: {}", panic_name, panic_message(&*payload));
            })
            .build()?;
        Ok(Self {
            name,
            pool: Arc::new(pool),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn spawn<T, F>(&self, f: F) -> Task<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = bounded(1);
        self.pool.spawn(move || {
            let out = f();
            let _ = tx.send(out);
        });
        Task {
            state: TaskState::Pending(rx),
        }
    }
}

impl std::fmt::Debug for TaskPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskPool")
            .field("name", &self.name)
            .field("threads", &self.threads())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

enum TaskState<T> {
    Pending(Receiver<T>),
    Done(T),
    Failed,
}

/// Handle to work running on a `TaskPool`. There is no cancellation; dropping
/// the handle discards the result once it arrives.
pub struct Task<T> {
    state: TaskState<T>,
}

impl<T> Task<T> {
    /// An already-completed task.
    pub fn ready(value: T) -> Self {
        Self {
            state: TaskState::Done(value),
        }
    }

    /// Non-blocking poll.
    pub fn is_finished(&mut self) -> bool {
        let TaskState::Pending(rx) = &self.state else {
            return true;
        };
        match rx.try_recv() {
            Ok(v) => {
                self.state = TaskState::Done(v);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.state = TaskState::Failed;
                true
            }
        }
    }

    /// Blocks until the task completes.
    pub fn finish(self) -> Result<T, TaskError> {
        match self.state {
            TaskState::Done(v) => Ok(v),
            TaskState::Pending(rx) => rx.recv().map_err(|_| TaskError::Panicked),
            TaskState::Failed => Err(TaskError::Panicked),
        }
    }
}

impl<T> std::fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            TaskState::Pending(_) => "pending",
            TaskState::Done(_) => "done",
            TaskState::Failed => "failed",
        };
        f.debug_struct("Task").field("state", &state).finish()
    }
}
