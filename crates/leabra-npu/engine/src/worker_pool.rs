// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Persistent layer workers
//!
//! Each worker owns a fixed list of layer indices. A step is a scatter of
//! one shared job to every worker followed by a barrier on the completion
//! channel; workers never create tasks or threads after startup.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender};
use tracing::{debug, error, info, warn};

use crate::error::{EngineError, Result};

/// Work applied to one layer index
pub type LayerJob = Arc<dyn Fn(usize) + Send + Sync>;

struct Done {
    worker: usize,
    busy: Duration,
    panicked: bool,
}

struct Worker {
    layers: Vec<usize>,
    tx: Option<Sender<LayerJob>>,
    handle: Option<JoinHandle<()>>,
}

/// Fixed pool of workers with a static layer assignment
///
/// # Design
/// - One thread per worker, named `leabra-worker-<n>`
/// - One job channel per worker, one shared completion channel as barrier
/// - A panicking job is caught; the step reports [`EngineError::WorkerPanicked`]
/// - Joins every thread on [`WorkerPool::stop`] or drop
pub struct WorkerPool {
    workers: Vec<Worker>,
    done_rx: Receiver<Done>,
    shutdown: Arc<AtomicBool>,
}

impl WorkerPool {
    /// Spawn `threads` workers and split the layers across them
    ///
    /// `layer_sizes[i]` is the unit count of layer `i`; the assignment
    /// balances total units per worker.
    pub fn start(threads: usize, layer_sizes: &[usize]) -> Result<Self> {
        let threads = threads.max(1);
        let assignment = assign_layers(threads, layer_sizes);
        let (done_tx, done_rx) = channel::unbounded::<Done>();
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut workers = Vec::with_capacity(threads);
        for (wi, layers) in assignment.into_iter().enumerate() {
            if layers.is_empty() {
                warn!(
                    target: "leabra-npu-engine",
                    "[WORKERS] worker {} has no layers assigned",
                    wi
                );
            } else {
                debug!(
                    target: "leabra-npu-engine",
                    "[WORKERS] worker {} -> layers {:?}",
                    wi,
                    layers
                );
            }
            let (tx, rx) = channel::unbounded::<LayerJob>();
            let handle = spawn_worker(wi, layers.clone(), rx, done_tx.clone(), Arc::clone(&shutdown))?;
            workers.push(Worker {
                layers,
                tx: Some(tx),
                handle: Some(handle),
            });
        }

        info!(
            target: "leabra-npu-engine",
            "[WORKERS] started {} workers for {} layers",
            threads,
            layer_sizes.len()
        );

        Ok(Self {
            workers,
            done_rx,
            shutdown,
        })
    }

    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Layers owned by each worker
    pub fn assignment(&self) -> Vec<Vec<usize>> {
        self.workers.iter().map(|w| w.layers.clone()).collect()
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown.load(Ordering::Relaxed)
    }

    /// Run `job` on every layer and wait for all workers to finish
    ///
    /// Returns the busy time of each worker for this step.
    pub fn run(&self, job: LayerJob) -> Result<Vec<Duration>> {
        if !self.is_running() {
            return Err(EngineError::WorkerPoolStopped);
        }

        let mut pending = 0;
        for w in self.workers.iter().filter(|w| !w.layers.is_empty()) {
            let tx = w.tx.as_ref().ok_or(EngineError::WorkerPoolStopped)?;
            tx.send(Arc::clone(&job))
                .map_err(|_| EngineError::WorkerPoolStopped)?;
            pending += 1;
        }
        drop(job);

        let mut busy = vec![Duration::ZERO; self.workers.len()];
        let mut panicked = None;
        for _ in 0..pending {
            let done = self
                .done_rx
                .recv()
                .map_err(|_| EngineError::WorkerPoolStopped)?;
            busy[done.worker] = done.busy;
            if done.panicked {
                panicked.get_or_insert(done.worker);
            }
        }

        match panicked {
            Some(worker) => Err(EngineError::WorkerPanicked { worker }),
            None => Ok(busy),
        }
    }

    /// Signal shutdown, close the job channels and join every worker
    pub fn stop(&mut self) {
        if self.shutdown.swap(true, Ordering::Relaxed) {
            return;
        }
        for w in &mut self.workers {
            w.tx.take();
        }
        for (wi, w) in self.workers.iter_mut().enumerate() {
            if let Some(handle) = w.handle.take() {
                if handle.join().is_err() {
                    error!(target: "leabra-npu-engine", "[WORKERS] worker {} join failed", wi);
                }
            }
        }
        debug!(target: "leabra-npu-engine", "[WORKERS] stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_worker(
    wi: usize,
    layers: Vec<usize>,
    rx: Receiver<LayerJob>,
    done_tx: Sender<Done>,
    shutdown: Arc<AtomicBool>,
) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("leabra-worker-{}", wi))
        .spawn(move || {
            while let Ok(job) = rx.recv() {
                if shutdown.load(Ordering::Relaxed) {
                    break;
                }
                let start = Instant::now();
                let result = catch_unwind(AssertUnwindSafe(|| {
                    for &li in &layers {
                        job(li);
                    }
                }));
                // release the shared state before signalling
                drop(job);
                if result.is_err() {
                    error!(target: "leabra-npu-engine", "[WORKERS] job panicked on worker {}", wi);
                }
                let done = Done {
                    worker: wi,
                    busy: start.elapsed(),
                    panicked: result.is_err(),
                };
                if done_tx.send(done).is_err() {
                    break;
                }
            }
        })
        .map_err(|e| EngineError::Config(format!("failed to spawn worker {}: {}", wi, e)))
}

/// Greedy static assignment: largest layers first, each to the least loaded worker
///
/// Every worker's list is in ascending layer order.
pub fn assign_layers(threads: usize, layer_sizes: &[usize]) -> Vec<Vec<usize>> {
    let threads = threads.max(1);
    let mut order: Vec<usize> = (0..layer_sizes.len()).collect();
    order.sort_by(|&a, &b| layer_sizes[b].cmp(&layer_sizes[a]).then(a.cmp(&b)));

    let mut load = vec![0usize; threads];
    let mut out = vec![Vec::new(); threads];
    for li in order {
        let wi = (0..threads).min_by_key(|&w| (load[w], w)).unwrap_or(0);
        load[wi] += layer_sizes[li].max(1);
        out[wi].push(li);
    }
    for layers in &mut out {
        layers.sort_unstable();
    }
    out
}
