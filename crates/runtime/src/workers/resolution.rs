//! Resolution worker that owns every gearset.
//!
//! Receives commands from [`crate::GearHandle`], runs solver passes against
//! the latest inventory snapshot, persists changed gearsets and publishes
//! events. Passes never interleave: the worker is the only consumer of the
//! command channel.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use gear_core::{
    Gearset, GearsetError, GearsetId, InventorySnapshot, ItemOracle, NodeId, RequirementIndex,
    ResolutionReport, Solver, regenerate_trees,
};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, GearsetEvent, RequirementEvent};
use crate::repository::GearsetRepository;

/// Gearsets a resolution pass should re-derive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveTargets {
    All,
    Gearsets(BTreeSet<GearsetId>),
}

impl ResolveTargets {
    pub fn one(id: GearsetId) -> Self {
        Self::Gearsets(BTreeSet::from([id]))
    }

    /// Union of two requests. `All` absorbs everything.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Gearsets(mut ours), Self::Gearsets(theirs)) => {
                ours.extend(theirs);
                Self::Gearsets(ours)
            }
            _ => Self::All,
        }
    }

    fn as_filter(&self) -> Option<&BTreeSet<GearsetId>> {
        match self {
            Self::All => None,
            Self::Gearsets(ids) => Some(ids),
        }
    }
}

/// Result of one resolution pass, shared by every request it served.
#[derive(Clone, Debug)]
pub struct PassOutcome {
    /// Monotonic pass number, starting at 1.
    pub pass: u64,
    /// How many queued resolve requests this pass answered.
    pub coalesced: usize,
    pub report: ResolutionReport,
}

/// Commands that can be sent to the resolution worker
pub enum Command {
    /// Run (or join) a resolution pass.
    Resolve {
        targets: ResolveTargets,
        reply: oneshot::Sender<PassOutcome>,
    },
    /// Replace the inventory snapshot used by later passes.
    UpdateInventory {
        snapshot: InventorySnapshot,
        reply: oneshot::Sender<()>,
    },
    /// Add a gearset, replacing any gearset with the same id.
    AddGearset {
        gearset: Box<Gearset>,
        reply: oneshot::Sender<Result<GearsetId>>,
    },
    RemoveGearset {
        id: GearsetId,
        reply: oneshot::Sender<Result<Gearset>>,
    },
    SetActive {
        id: GearsetId,
        active: bool,
        reply: oneshot::Sender<Result<()>>,
    },
    SetPriority {
        id: GearsetId,
        priority: Option<i32>,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Manual collection mark on a gearpiece (`node: None`) or tree node.
    SetCollected {
        id: GearsetId,
        gearpiece: usize,
        node: Option<NodeId>,
        collected: bool,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Manual meld mark on one materia slot.
    SetMelded {
        id: GearsetId,
        gearpiece: usize,
        slot: usize,
        melded: bool,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Rebuild every prerequisite tree from the item oracle.
    RegenerateTrees { reply: oneshot::Sender<Result<usize>> },
    QueryGearsets { reply: oneshot::Sender<Vec<Gearset>> },
    QueryIndex {
        reply: oneshot::Sender<RequirementIndex>,
    },
}

/// Background task that serializes all gearset mutations.
pub struct ResolutionWorker {
    gearsets: Vec<Gearset>,
    inventory: InventorySnapshot,
    solver: Solver,
    index: RequirementIndex,
    oracle: Option<Arc<dyn ItemOracle>>,
    repository: Option<Arc<dyn GearsetRepository>>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    /// A non-resolve command pulled off the queue while coalescing.
    pending: Option<Command>,
    passes: u64,
}

impl ResolutionWorker {
    pub fn new(
        gearsets: Vec<Gearset>,
        solver: Solver,
        oracle: Option<Arc<dyn ItemOracle>>,
        repository: Option<Arc<dyn GearsetRepository>>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        let index = RequirementIndex::build(&gearsets);
        Self {
            gearsets,
            inventory: InventorySnapshot::default(),
            solver,
            index,
            oracle,
            repository,
            command_rx,
            event_bus,
            pending: None,
            passes: 0,
        }
    }

    /// Main worker loop. Ends once every handle has been dropped.
    pub async fn run(mut self) {
        loop {
            let command = match self.pending.take() {
                Some(command) => command,
                None => match self.command_rx.recv().await {
                    Some(command) => command,
                    None => break,
                },
            };
            self.handle_command(command);
        }
        debug!(target: "runtime::worker", passes = self.passes, "resolution worker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Resolve { targets, reply } => {
                let (targets, waiters) = self.coalesce(targets, reply);
                let outcome = self.run_pass(&targets, waiters.len());
                for waiter in waiters {
                    let _ = waiter.send(outcome.clone());
                }
            }
            Command::UpdateInventory { snapshot, reply } => {
                debug!(target: "runtime::worker", items = snapshot.len(), "inventory updated");
                self.inventory = snapshot;
                let _ = reply.send(());
            }
            Command::AddGearset { gearset, reply } => {
                let _ = reply.send(Ok(self.add_gearset(*gearset)));
            }
            Command::RemoveGearset { id, reply } => {
                let _ = reply.send(self.remove_gearset(id));
            }
            Command::SetActive { id, active, reply } => {
                let result = self.edit(id, |gearset| {
                    gearset.set_active(active);
                    Ok(())
                });
                let _ = reply.send(result);
            }
            Command::SetPriority {
                id,
                priority,
                reply,
            } => {
                let result = self.edit(id, |gearset| {
                    gearset.set_priority(priority);
                    Ok(())
                });
                let _ = reply.send(result);
            }
            Command::SetCollected {
                id,
                gearpiece,
                node,
                collected,
                reply,
            } => {
                let result = self.edit(id, |gearset| {
                    match node {
                        Some(node) => gearset
                            .node_mut(gearpiece, node)?
                            .set_collected(collected, true),
                        None => gearset
                            .gearpiece_mut(gearpiece)?
                            .set_collected(collected, true),
                    }
                    Ok(())
                });
                let _ = reply.send(result);
            }
            Command::SetMelded {
                id,
                gearpiece,
                slot,
                melded,
                reply,
            } => {
                let result = self.edit(id, |gearset| {
                    let piece = gearset.gearpiece_mut(gearpiece)?;
                    if slot >= piece.materia().len() {
                        return Err(GearsetError::UnknownMateriaSlot {
                            gearset: id,
                            index: gearpiece,
                            slot,
                        });
                    }
                    piece.materia_mut().set_melded(slot, melded, true);
                    Ok(())
                });
                let _ = reply.send(result);
            }
            Command::RegenerateTrees { reply } => {
                let _ = reply.send(self.regenerate());
            }
            Command::QueryGearsets { reply } => {
                let _ = reply.send(self.gearsets.clone());
            }
            Command::QueryIndex { reply } => {
                let _ = reply.send(self.index.clone());
            }
        }
    }

    /// Drains resolve requests queued right behind `first`.
    ///
    /// Stops at the first other command, which is kept for the next loop
    /// iteration so ordering between kinds is preserved.
    fn coalesce(
        &mut self,
        first: ResolveTargets,
        reply: oneshot::Sender<PassOutcome>,
    ) -> (ResolveTargets, Vec<oneshot::Sender<PassOutcome>>) {
        let mut targets = first;
        let mut waiters = vec![reply];

        while let Ok(next) = self.command_rx.try_recv() {
            match next {
                Command::Resolve {
                    targets: more,
                    reply,
                } => {
                    targets = targets.merge(more);
                    waiters.push(reply);
                }
                other => {
                    self.pending = Some(other);
                    break;
                }
            }
        }

        (targets, waiters)
    }

    fn run_pass(&mut self, targets: &ResolveTargets, coalesced: usize) -> PassOutcome {
        self.passes += 1;
        let report = self
            .solver
            .resolve(&mut self.gearsets, targets.as_filter(), &self.inventory);

        info!(
            target: "runtime::worker",
            pass = self.passes,
            coalesced,
            mutations = report.mutations.len(),
            assigned = report.assigned,
            unassigned = report.unassigned,
            "resolution pass complete"
        );

        if !report.is_empty() {
            self.persist(report.changed.iter().copied());
        }
        // Listeners hear about every pass, including ones that changed nothing.
        self.refresh_index();

        PassOutcome {
            pass: self.passes,
            coalesced,
            report,
        }
    }

    fn add_gearset(&mut self, gearset: Gearset) -> GearsetId {
        let id = gearset.id();
        let gearset = if gearset.source().import_order == 0 {
            let mut source = gearset.source().clone();
            source.import_order = self.next_import_order();
            gearset.with_source(source)
        } else {
            gearset
        };

        match self.gearsets.iter_mut().find(|g| g.id() == id) {
            Some(existing) => *existing = gearset,
            None => {
                self.gearsets.push(gearset);
                self.publish_count();
            }
        }

        self.persist([id]);
        self.refresh_index();
        id
    }

    fn remove_gearset(&mut self, id: GearsetId) -> Result<Gearset> {
        let position = self
            .gearsets
            .iter()
            .position(|g| g.id() == id)
            .ok_or(GearsetError::UnknownGearset(id))?;
        let removed = self.gearsets.remove(position);

        if let Some(repository) = &self.repository {
            repository.delete(id)?;
        }
        self.publish_count();
        self.refresh_index();
        Ok(removed)
    }

    /// Applies a manual edit to one gearset, then saves and re-indexes it.
    fn edit<F>(&mut self, id: GearsetId, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Gearset) -> std::result::Result<(), GearsetError>,
    {
        let gearset = self
            .gearsets
            .iter_mut()
            .find(|g| g.id() == id)
            .ok_or(GearsetError::UnknownGearset(id))?;
        apply(gearset)?;

        self.persist([id]);
        self.refresh_index();
        Ok(())
    }

    fn regenerate(&mut self) -> Result<usize> {
        let oracle = self.oracle.clone().ok_or(RuntimeError::MissingOracle)?;
        let replaced = regenerate_trees(&mut self.gearsets, oracle.as_ref());
        info!(target: "runtime::worker", replaced, "prerequisite trees regenerated");

        if replaced > 0 {
            let ids: Vec<_> = self.gearsets.iter().map(Gearset::id).collect();
            self.persist(ids);
            self.refresh_index();
        }
        Ok(replaced)
    }

    fn next_import_order(&self) -> u64 {
        self.gearsets
            .iter()
            .map(|g| g.source().import_order)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Writes the given gearsets; a failed save is reported, not fatal.
    fn persist(&self, ids: impl IntoIterator<Item = GearsetId>) {
        let Some(repository) = &self.repository else {
            return;
        };

        let mut saved = Vec::new();
        for id in ids {
            let Some(gearset) = self.gearsets.iter().find(|g| g.id() == id) else {
                continue;
            };
            match repository.save(gearset) {
                Ok(()) => saved.push(id),
                Err(error) => {
                    warn!(target: "runtime::worker", %id, %error, "failed to save gearset");
                    self.event_bus
                        .publish(Event::Gearsets(GearsetEvent::SaveFailed {
                            id,
                            error: error.to_string(),
                        }));
                }
            }
        }

        if !saved.is_empty() {
            self.event_bus
                .publish(Event::Gearsets(GearsetEvent::Saved { ids: saved }));
        }
    }

    fn refresh_index(&mut self) {
        self.index = RequirementIndex::build(&self.gearsets);
        self.event_bus
            .publish(Event::Requirements(RequirementEvent::IndexChanged {
                items: self.index.len(),
                outstanding: self.index.outstanding_total(),
            }));
    }

    fn publish_count(&self) {
        self.event_bus
            .publish(Event::Gearsets(GearsetEvent::CountChanged {
                count: self.gearsets.len(),
            }));
    }
}
