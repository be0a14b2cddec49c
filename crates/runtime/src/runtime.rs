//! High-level runtime orchestrator.
//!
//! The runtime owns the resolution worker, wires up command/event channels,
//! and exposes a builder-based API for clients.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use gear_core::{Gearset, ItemOracle, Solver, SolverConfig};

use crate::api::{GearHandle, InventoryProvider, Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::repository::GearsetRepository;
use crate::workers::{Command, PassOutcome, ResolutionWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub solver: SolverConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main runtime that owns the resolution worker
///
/// [`GearHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: GearHandle,
    inventory_provider: Option<Box<dyn InventoryProvider>>,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> GearHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> Option<broadcast::Receiver<Event>> {
        self.handle.subscribe(topic)
    }

    /// Pull a fresh snapshot from the inventory provider and resolve every
    /// gearset against it.
    pub async fn sync_inventory(&self) -> Result<PassOutcome> {
        let provider = self
            .inventory_provider
            .as_ref()
            .ok_or(RuntimeError::ProviderNotSet)?;

        let snapshot = provider.snapshot().await?;
        self.handle.update_inventory(snapshot).await?;
        self.handle.resolve_all().await
    }

    pub fn set_inventory_provider(&mut self, provider: impl InventoryProvider + 'static) {
        self.inventory_provider = Some(Box::new(provider));
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the worker to drain; clones of the handle held elsewhere
    /// keep it alive until they are dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    gearsets: Option<Vec<Gearset>>,
    repository: Option<Arc<dyn GearsetRepository>>,
    oracle: Option<Arc<dyn ItemOracle>>,
    inventory_provider: Option<Box<dyn InventoryProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            gearsets: None,
            repository: None,
            oracle: None,
            inventory_provider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide the initial gearsets.
    ///
    /// Without this, gearsets are loaded from the repository (if any).
    pub fn gearsets(mut self, gearsets: Vec<Gearset>) -> Self {
        self.gearsets = Some(gearsets);
        self
    }

    /// Persist changed gearsets through `repository`.
    pub fn repository(mut self, repository: Arc<dyn GearsetRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Item oracle used to regenerate prerequisite trees.
    pub fn oracle(mut self, oracle: Arc<dyn ItemOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn inventory_provider(mut self, provider: impl InventoryProvider + 'static) -> Self {
        self.inventory_provider = Some(Box::new(provider));
        self
    }

    /// Build the runtime and spawn its worker.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn build(self) -> Result<Runtime> {
        let gearsets = match (self.gearsets, &self.repository) {
            (Some(gearsets), _) => gearsets,
            (None, Some(repository)) => repository.load_all()?,
            (None, None) => Vec::new(),
        };
        info!(
            target: "runtime::worker",
            gearsets = gearsets.len(),
            persistent = self.repository.is_some(),
            "starting resolution worker"
        );

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = GearHandle::new(command_tx, event_bus.clone());

        let worker = ResolutionWorker::new(
            gearsets,
            Solver::new(self.config.solver),
            self.oracle,
            self.repository,
            command_rx,
            event_bus,
        );

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            inventory_provider: self.inventory_provider,
            worker_handle,
        })
    }
}
