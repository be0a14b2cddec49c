//! Cloneable façade for issuing commands to the runtime.
//!
//! [`GearHandle`] hides channel plumbing and offers async helpers for
//! requesting resolution passes, editing gearsets and streaming events from
//! specific topics.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use gear_core::{Gearset, GearsetId, InventorySnapshot, NodeId, RequirementIndex};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, PassOutcome, ResolveTargets};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct GearHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl GearHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Request a resolution pass.
    ///
    /// Requests already queued behind each other are answered by one pass;
    /// every caller receives the same [`PassOutcome`].
    pub async fn resolve(&self, targets: ResolveTargets) -> Result<PassOutcome> {
        self.request(|reply| Command::Resolve { targets, reply }).await
    }

    pub async fn resolve_all(&self) -> Result<PassOutcome> {
        self.resolve(ResolveTargets::All).await
    }

    pub async fn resolve_gearsets(
        &self,
        ids: impl IntoIterator<Item = GearsetId>,
    ) -> Result<PassOutcome> {
        self.resolve(ResolveTargets::Gearsets(ids.into_iter().collect())).await
    }

    /// Replace the inventory used by subsequent passes.
    ///
    /// Does not trigger a pass on its own.
    pub async fn update_inventory(&self, snapshot: InventorySnapshot) -> Result<()> {
        self.request(|reply| Command::UpdateInventory { snapshot, reply }).await
    }

    /// Add (or replace) a gearset. A missing import order is assigned.
    pub async fn add_gearset(&self, gearset: Gearset) -> Result<GearsetId> {
        self.request(|reply| Command::AddGearset {
            gearset: Box::new(gearset),
            reply,
        })
        .await?
    }

    pub async fn remove_gearset(&self, id: GearsetId) -> Result<Gearset> {
        self.request(|reply| Command::RemoveGearset { id, reply }).await?
    }

    pub async fn set_active(&self, id: GearsetId, active: bool) -> Result<()> {
        self.request(|reply| Command::SetActive { id, active, reply }).await?
    }

    /// Set an explicit priority, or `None` to fall back to import order.
    pub async fn set_priority(&self, id: GearsetId, priority: Option<i32>) -> Result<()> {
        self.request(|reply| Command::SetPriority {
            id,
            priority,
            reply,
        })
        .await?
    }

    /// Mark a gearpiece, or one node of its prerequisite tree, by hand.
    ///
    /// Manual marks survive later passes until cleared by another manual
    /// call.
    pub async fn set_collected(
        &self,
        id: GearsetId,
        gearpiece: usize,
        node: Option<NodeId>,
        collected: bool,
    ) -> Result<()> {
        self.request(|reply| Command::SetCollected {
            id,
            gearpiece,
            node,
            collected,
            reply,
        })
        .await?
    }

    /// Mark one materia slot melded or unmelded by hand.
    pub async fn set_melded(
        &self,
        id: GearsetId,
        gearpiece: usize,
        slot: usize,
        melded: bool,
    ) -> Result<()> {
        self.request(|reply| Command::SetMelded {
            id,
            gearpiece,
            slot,
            melded,
            reply,
        })
        .await?
    }

    /// Rebuild prerequisite trees from the configured item oracle.
    ///
    /// Returns how many trees were replaced.
    pub async fn regenerate_trees(&self) -> Result<usize> {
        self.request(|reply| Command::RegenerateTrees { reply }).await?
    }

    /// Query the current gearsets (read-only snapshot)
    pub async fn gearsets(&self) -> Result<Vec<Gearset>> {
        self.request(|reply| Command::QueryGearsets { reply }).await
    }

    pub async fn requirement_index(&self) -> Result<RequirementIndex> {
        self.request(|reply| Command::QueryIndex { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Requirements` - requirement index rebuilds
    /// - `Topic::Gearsets` - gearset count changes and saves
    pub fn subscribe(&self, topic: Topic) -> Option<broadcast::Receiver<Event>> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
