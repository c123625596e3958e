use std::sync::Arc;

use hashbrown::HashMap;
use tessel_chunk::ChunkProperties;
use tessel_mesh::{LayeredProcMesh, MeshError, MesherKind, build_chunk_mesh};
use tessel_task::{Task, TaskError, TaskPool};
use tessel_world::{ChunkPosition, ListenerId, Listeners};
use thiserror::Error;

use crate::distributor::{Distributor, StandardDistributor};

#[derive(Debug, Error)]
pub enum RemeshError {
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Task(#[from] TaskError),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RemeshStage {
    /// Registered, tasks not yet planned.
    Queued,
    /// Tasks running on the mesh pool.
    Dispatched,
    /// All tasks done; the outcome waits for the next `finish_tasks`.
    Finished,
}

/// Combined output of one chunk's remesh pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RemeshReport {
    pub position: ChunkPosition,
    /// One layer per texture atlas.
    pub visual: LayeredProcMesh,
    /// Collision geometry in layer 0.
    pub collision: LayeredProcMesh,
}

#[derive(Debug)]
pub struct RemeshFailure {
    pub position: ChunkPosition,
    pub error: RemeshError,
}

pub type RemeshOutcome = Result<RemeshReport, RemeshFailure>;

type MeshTask = Task<Result<LayeredProcMesh, MeshError>>;

enum Entry {
    Queued(ChunkProperties),
    Dispatched(Vec<(MesherKind, MeshTask)>),
}

/// Turns bound chunks into mesher tasks and collects their results once per tick.
pub struct RemeshHandler {
    pool: TaskPool,
    distributors: Vec<Box<dyn Distributor>>,
    entries: HashMap<ChunkPosition, Entry>,
    finished: Vec<RemeshOutcome>,
    listeners: Listeners<RemeshOutcome>,
    dispatches: u64,
}

impl RemeshHandler {
    /// Handler with the `StandardDistributor` installed.
    pub fn new(pool: TaskPool) -> Self {
        Self::with_distributors(pool, vec![Box::new(StandardDistributor)])
    }

    pub fn with_distributors(pool: TaskPool, distributors: Vec<Box<dyn Distributor>>) -> Self {
        Self {
            pool,
            distributors,
            entries: HashMap::new(),
            finished: Vec::new(),
            listeners: Listeners::new(),
            dispatches: 0,
        }
    }

    pub fn add_distributor(&mut self, distributor: impl Distributor + 'static) {
        self.distributors.push(Box::new(distributor));
    }

    /// Registers a chunk without dispatching it yet. A pass already running for
    /// the same chunk is joined first; a still-queued one is replaced.
    pub fn queue_chunk(&mut self, props: ChunkProperties) {
        let position = props.position();
        if let Some(Entry::Dispatched(tasks)) = self.entries.remove(&position) {
            log::debug!(target: "remesh", "{:?} remeshed while in flight; joining previous pass", position);
            let outcome = join_pass(position, tasks);
            self.finished.push(outcome);
        }
        self.entries.insert(position, Entry::Queued(props));
    }

    /// Plans and spawns tasks for every queued chunk, in position order.
    pub fn dispatch_queued(&mut self) {
        let mut queued: Vec<ChunkPosition> = self
            .entries
            .iter()
            .filter(|(_, e)| matches!(e, Entry::Queued(_)))
            .map(|(p, _)| *p)
            .collect();
        queued.sort();
        for position in queued {
            self.dispatch(position);
        }
    }

    /// Queues and immediately dispatches one chunk.
    pub fn remesh_chunk(&mut self, props: ChunkProperties) {
        let position = props.position();
        self.queue_chunk(props);
        self.dispatch(position);
    }

    fn dispatch(&mut self, position: ChunkPosition) {
        let Some(Entry::Queued(props)) = self.entries.remove(&position) else {
            return;
        };
        let mut kinds = Vec::new();
        for d in &self.distributors {
            d.plan(&props, &mut kinds);
        }
        self.dispatches += 1;
        log::debug!(target: "remesh", "dispatch {:?}: {} tasks", position, kinds.len());

        if kinds.is_empty() {
            self.finished.push(Ok(RemeshReport {
                position,
                ..RemeshReport::default()
            }));
            return;
        }
        let props = Arc::new(props);
        let tasks = kinds
            .into_iter()
            .map(|kind| {
                let props = Arc::clone(&props);
                (kind, self.pool.spawn(move || build_chunk_mesh(&props, kind)))
            })
            .collect();
        self.entries.insert(position, Entry::Dispatched(tasks));
    }

    /// Collects every pass whose tasks have all completed, without blocking on
    /// running ones. Outcomes are published to subscribers and returned.
    pub fn finish_tasks(&mut self) -> Vec<RemeshOutcome> {
        let mut done: Vec<ChunkPosition> = self
            .entries
            .iter_mut()
            .filter_map(|(p, e)| match e {
                Entry::Dispatched(tasks) => tasks.iter_mut().all(|(_, t)| t.is_finished()).then_some(*p),
                Entry::Queued(_) => None,
            })
            .collect();
        done.sort();
        self.collect(done)
    }

    /// Dispatches anything queued, then blocks until every pass has completed.
    pub fn finish_all(&mut self) -> Vec<RemeshOutcome> {
        self.dispatch_queued();
        let mut all: Vec<ChunkPosition> = self.entries.keys().copied().collect();
        all.sort();
        self.collect(all)
    }

    fn collect(&mut self, positions: Vec<ChunkPosition>) -> Vec<RemeshOutcome> {
        let mut out = std::mem::take(&mut self.finished);
        for position in positions {
            if let Some(Entry::Dispatched(tasks)) = self.entries.remove(&position) {
                out.push(join_pass(position, tasks));
            }
        }
        for outcome in &out {
            self.listeners.emit(outcome);
        }
        out
    }

    pub fn stage(&self, position: ChunkPosition) -> Option<RemeshStage> {
        match self.entries.get(&position) {
            Some(Entry::Queued(_)) => Some(RemeshStage::Queued),
            Some(Entry::Dispatched(_)) => Some(RemeshStage::Dispatched),
            None => self
                .finished
                .iter()
                .any(|o| outcome_position(o) == position)
                .then_some(RemeshStage::Finished),
        }
    }

    /// Chunks with a queued or running pass, sorted.
    pub fn pending_positions(&self) -> Vec<ChunkPosition> {
        let mut out: Vec<ChunkPosition> = self.entries.keys().copied().collect();
        out.sort();
        out
    }

    pub fn is_idle(&self) -> bool {
        self.entries.is_empty() && self.finished.is_empty()
    }

    /// Number of chunk passes dispatched since creation.
    pub fn dispatch_count(&self) -> u64 {
        self.dispatches
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&RemeshOutcome) + Send + 'static) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

impl std::fmt::Debug for RemeshHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemeshHandler")
            .field("pool", &self.pool)
            .field("distributors", &self.distributors.len())
            .field("pending", &self.entries.len())
            .field("finished", &self.finished.len())
            .field("dispatches", &self.dispatches)
            .finish()
    }
}

fn outcome_position(outcome: &RemeshOutcome) -> ChunkPosition {
    match outcome {
        Ok(report) => report.position,
        Err(failure) => failure.position,
    }
}

// Joins every task of a pass. Any failure discards the whole pass.
fn join_pass(position: ChunkPosition, tasks: Vec<(MesherKind, MeshTask)>) -> RemeshOutcome {
    let mut report = RemeshReport {
        position,
        ..RemeshReport::default()
    };
    let mut error: Option<RemeshError> = None;
    for (kind, task) in tasks {
        let joined = match task.finish() {
            Ok(Ok(mesh)) => Ok(mesh),
            Ok(Err(e)) => Err(RemeshError::from(e)),
            Err(e) => Err(RemeshError::from(e)),
        };
        let mesh = match joined {
            Ok(mesh) if error.is_none() => mesh,
            Ok(_) => continue,
            Err(e) => {
                if error.is_none() {
                    error = Some(e);
                }
                continue;
            }
        };
        let target = if kind.is_visual() {
            &mut report.visual
        } else {
            &mut report.collision
        };
        if let Err(e) = target.append(&mesh) {
            error = Some(e.into());
        }
    }
    match error {
        None => {
            log::debug!(
                target: "remesh",
                "finished {:?}: {} visual quads, {} collision quads",
                position,
                report.visual.quad_count(),
                report.collision.quad_count()
            );
            Ok(report)
        }
        Some(error) => {
            log::error!(target: "remesh", "remesh of {:?} failed: {}", position, error);
            Err(RemeshFailure { position, error })
        }
    }
}
