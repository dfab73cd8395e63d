use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cubeforge_shared::chunk::ChunkData;
use cubeforge_shared::coords::ChunkPos;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::error::MeshError;
use crate::mesh::{Mesh, MeshBuilder};
use crate::settings::MesherSettings;

/// Meshes independent chunks on the global rayon pool, keeping input order.
pub fn generate_meshes(
    builder: &MeshBuilder,
    grids: &[ChunkData],
) -> Vec<Result<Mesh, MeshError>> {
    grids
        .par_iter()
        .map(|grid| builder.generate_mesh(grid))
        .collect()
}

pub struct MeshRequest {
    pub chunk_pos: ChunkPos,
    pub chunk: ChunkData,
    pub version: u64,
}

pub struct MeshResult {
    pub chunk_pos: ChunkPos,
    pub version: u64,
    pub result: Result<Mesh, MeshError>,
}

/// Background mesher. Requests run on a dedicated pool; results come back
/// through `poll` or `recv_timeout` with superseded versions filtered out.
///
/// The newest version of every submitted chunk is remembered until `forget`
/// is called for it. Streaming callers must `forget` chunks as they unload,
/// or the table keeps one entry per chunk ever meshed.
pub struct MeshWorker {
    pool: ThreadPool,
    builder: Arc<MeshBuilder>,
    completed_rx: Receiver<MeshResult>,
    completed_tx: Sender<MeshResult>,
    latest_versions: FxHashMap<ChunkPos, u64>,
}

impl MeshWorker {
    pub fn new(
        builder: Arc<MeshBuilder>,
        worker_threads: usize,
    ) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(worker_threads)
            .thread_name(|index| format!("mesh-worker-{index}"))
            .build()?;
        let (completed_tx, completed_rx) = mpsc::channel();
        info!("Started mesh worker pool with {worker_threads} threads");

        Ok(Self {
            pool,
            builder,
            completed_rx,
            completed_tx,
            latest_versions: FxHashMap::default(),
        })
    }

    pub fn from_settings(
        settings: &MesherSettings,
        builder: Arc<MeshBuilder>,
    ) -> Result<Self, ThreadPoolBuildError> {
        Self::new(builder, settings.resolved_worker_threads())
    }

    /// Queues `request`. Tag it with `Chunk::version` so the result can be
    /// passed straight to `Chunk::install_mesh`.
    pub fn submit(&mut self, request: MeshRequest) {
        let latest = self
            .latest_versions
            .entry(request.chunk_pos)
            .or_insert(request.version);
        *latest = (*latest).max(request.version);

        let builder = Arc::clone(&self.builder);
        let completed_tx = self.completed_tx.clone();
        self.pool.spawn(move || {
            let result = builder.generate_mesh(&request.chunk);
            let _ = completed_tx.send(MeshResult {
                chunk_pos: request.chunk_pos,
                version: request.version,
                result,
            });
        });
    }

    /// Drains every finished result without blocking.
    pub fn poll(&mut self) -> Vec<MeshResult> {
        let mut completed = Vec::new();
        while let Ok(result) = self.completed_rx.try_recv() {
            if self.is_current(&result) {
                completed.push(result);
            }
        }
        completed
    }

    /// Waits up to `timeout` for the next current result.
    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<MeshResult> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let result = self.completed_rx.recv_timeout(remaining).ok()?;
            if self.is_current(&result) {
                return Some(result);
            }
        }
    }

    /// Stops tracking `chunk_pos`, e.g. once the chunk is unloaded.
    pub fn forget(&mut self, chunk_pos: ChunkPos) {
        self.latest_versions.remove(&chunk_pos);
    }

    /// Number of chunks whose latest version is still remembered.
    pub fn tracked_chunks(&self) -> usize {
        self.latest_versions.len()
    }

    fn is_current(&self, result: &MeshResult) -> bool {
        let latest = self
            .latest_versions
            .get(&result.chunk_pos)
            .copied()
            .unwrap_or(result.version);
        if result.version < latest {
            warn!(
                "Dropping stale mesh for chunk {:?}: version {} superseded by {}",
                result.chunk_pos, result.version, latest
            );
            return false;
        }
        true
    }
}
