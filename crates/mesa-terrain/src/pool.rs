//! Background chunk generation over a worker thread pool.
//!
//! Hosts that stream chunks submit positions here instead of generating on
//! their main thread. Completed chunks come back over a bounded channel;
//! cancellation is a per-task flag checked before and after the work.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;
use mesa_voxel::{ChunkBuffer, ChunkPos};

use crate::generator::PlateauGenerator;

/// A request to generate a single chunk.
#[derive(Clone, Copy, Debug)]
pub struct GenerationTask {
    /// Chunk to generate.
    pub pos: ChunkPos,
    /// Lower values are more urgent. Typically the squared distance from
    /// the chunk to the nearest player.
    pub priority: u64,
}

/// A fully generated chunk ready for insertion into the world.
#[derive(Debug)]
pub struct GeneratedChunk {
    /// Position matching the original task.
    pub pos: ChunkPos,
    /// The generated block data.
    pub data: ChunkBuffer,
    /// Generation time in microseconds, for profiling.
    pub generation_time_us: u64,
}

/// Internal wrapper carrying the task and its cancellation flag.
struct PendingTask {
    task: GenerationTask,
    cancelled: Arc<AtomicBool>,
}

/// Fans chunk generation out across worker threads.
///
/// Because [`PlateauGenerator`] is a pure function of its inputs, workers
/// share one instance behind an `Arc` and results are identical to
/// single-threaded generation in any completion order.
pub struct ChunkWorkerPool {
    task_sender: Sender<PendingTask>,
    result_receiver: Receiver<GeneratedChunk>,
    active_tasks: Arc<DashMap<ChunkPos, Arc<AtomicBool>>>,
    in_flight: Arc<AtomicU64>,
}

impl ChunkWorkerPool {
    /// Create a pool with the specified thread count and queue capacities.
    ///
    /// # Arguments
    /// - `generator`: Shared generator; one per world.
    /// - `thread_count`: Number of worker threads. Typically `num_cpus - 2`
    ///   to leave headroom for the host's own threads.
    /// - `max_concurrent`: Maximum in-flight tasks. Excess submissions are
    ///   rejected.
    /// - `result_capacity`: Bounded channel capacity for completed chunks.
    pub fn new(
        generator: Arc<PlateauGenerator>,
        thread_count: usize,
        max_concurrent: usize,
        result_capacity: usize,
    ) -> Self {
        let (task_sender, task_receiver) = bounded::<PendingTask>(max_concurrent * 2);
        let (result_sender, result_receiver) = bounded::<GeneratedChunk>(result_capacity);
        let in_flight = Arc::new(AtomicU64::new(0));

        for _ in 0..thread_count {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);
            let generator = Arc::clone(&generator);

            std::thread::Builder::new()
                .name("chunk-gen-worker".into())
                .spawn(move || {
                    while let Ok(pending) = receiver.recv() {
                        // Check cancellation before starting work.
                        if pending.cancelled.load(Ordering::Relaxed) {
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let start = std::time::Instant::now();
                        let data = generator.generate_chunk(pending.task.pos);
                        let elapsed = start.elapsed().as_micros() as u64;

                        // Check cancellation again after generation.
                        if !pending.cancelled.load(Ordering::Relaxed) {
                            let _ = sender.send(GeneratedChunk {
                                pos: pending.task.pos,
                                data,
                                generation_time_us: elapsed,
                            });
                        }

                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })
                .expect("Failed to spawn chunk generation worker thread");
        }

        Self {
            task_sender,
            result_receiver,
            active_tasks: Arc::new(DashMap::new()),
            in_flight,
        }
    }

    /// Create a pool with a thread count derived from the CPU core count.
    pub fn with_defaults(generator: Arc<PlateauGenerator>) -> Self {
        let cpus = num_cpus::get().max(2);
        let threads = (cpus - 2).max(1);
        Self::new(generator, threads, 64, 128)
    }

    /// Submit a chunk for background generation.
    ///
    /// Returns `Ok(())` if the task was queued, or `Err(task)` if the queue
    /// is full.
    pub fn submit(&self, task: GenerationTask) -> Result<(), GenerationTask> {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.active_tasks.insert(task.pos, Arc::clone(&cancelled));
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        let pending = PendingTask { task, cancelled };
        self.task_sender.try_send(pending).map_err(|e| {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            self.active_tasks.remove(&e.into_inner().task.pos);
            task
        })
    }

    /// Cancel a pending or in-progress task. A no-op if it already finished.
    pub fn cancel(&self, pos: &ChunkPos) {
        if let Some((_, cancelled)) = self.active_tasks.remove(pos) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Drain all completed chunks from the result channel.
    ///
    /// Call this periodically on the host's main thread.
    pub fn drain_results(&self) -> Vec<GeneratedChunk> {
        let mut results = Vec::new();
        while let Ok(chunk) = self.result_receiver.try_recv() {
            self.active_tasks.remove(&chunk.pos);
            results.push(chunk);
        }
        results
    }

    /// Number of tasks currently queued or executing.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns `true` if a task for the given position is currently pending.
    pub fn is_pending(&self, pos: &ChunkPos) -> bool {
        self.active_tasks.contains_key(pos)
    }
}
