//! Planner engine facade.
//!
//! Owns the trip plan, the city cluster layer, the mutation log, and the
//! sync bookkeeping, and keeps them consistent with each other. Every edit
//! funnels through one internal path: build the action, apply it to the
//! plan, mirror the effect onto the clusters, then record it for undo.
//! Undo and redo replay through the same path, so the cluster layer can
//! never drift from the schedule.
//!
//! Mutations take `&mut self`; one engine instance means one serialized
//! stream of edits per plan.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::cluster::{self, Cluster, ClusterConfig, ClusterItem};
use crate::error::{PlanError, Result};
use crate::geo::Coordinate;
use crate::history::{self, Action, MutationLog};
use crate::model::{ItemLocation, Place, PlannedItem, Provenance, Slot, TripPlan};
use crate::solver::{self, Insertion};
use crate::sync::{PatchOutcome, PendingKind, SyncReconciler};
use crate::traits::SavedPlan;

pub struct PlannerEngine {
    plan: TripPlan,
    /// Clusters keyed by city, each list in creation order.
    clusters: HashMap<String, Vec<Cluster>>,
    history: MutationLog,
    sync: SyncReconciler,
    cluster_config: ClusterConfig,
    next_cluster_seq: u64,
    dirty: bool,
}

impl Default for PlannerEngine {
    fn default() -> Self {
        Self::new(TripPlan::new())
    }
}

impl PlannerEngine {
    // ========================================================================
    // Construction & Persistence
    // ========================================================================

    pub fn new(plan: TripPlan) -> Self {
        Self::with_config(plan, ClusterConfig::default())
    }

    pub fn with_config(plan: TripPlan, cluster_config: ClusterConfig) -> Self {
        Self {
            plan,
            clusters: HashMap::new(),
            history: MutationLog::new(),
            sync: SyncReconciler::new(),
            cluster_config,
            next_cluster_seq: 0,
            dirty: false,
        }
    }

    /// Rebuild an engine from a persisted snapshot.
    ///
    /// Cluster stats are refreshed in one parallel pass rather than trusted
    /// from the payload. The mutation log starts empty: undo history does
    /// not survive a reload.
    pub fn restore(saved: SavedPlan) -> Self {
        Self::restore_with_config(saved, ClusterConfig::default())
    }

    /// `restore` for a plan maintained under a non-default clustering
    /// configuration; the threshold survives the save/reload cycle.
    pub fn restore_with_config(saved: SavedPlan, cluster_config: ClusterConfig) -> Self {
        let SavedPlan { plan, mut clusters } = saved;

        let next_cluster_seq = clusters
            .values()
            .flatten()
            .map(|c| c.created_seq + 1)
            .max()
            .unwrap_or(0);

        for city_clusters in clusters.values_mut() {
            cluster::recompute_all(city_clusters, |id| plan.place(id).map(ClusterItem::of));
        }

        Self {
            plan,
            clusters,
            history: MutationLog::new(),
            sync: SyncReconciler::new(),
            cluster_config,
            next_cluster_seq,
            dirty: false,
        }
    }

    /// Snapshot for the persistence transport.
    pub fn snapshot(&self) -> SavedPlan {
        SavedPlan {
            plan: self.plan.clone(),
            clusters: self.clusters.clone(),
        }
    }

    /// True when an edit happened since the last `take_dirty`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Claim the dirty flag; the caller is taking responsibility for a save.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// A background save failed. Local state stays authoritative.
    pub fn record_save_failure(&self, reason: &str) {
        warn!("Plan save failed ({}); local plan remains authoritative", reason);
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Plan a place into a (day, slot).
    ///
    /// Without an explicit order the insertion solver picks the position
    /// that adds the least walking distance to the slot's route. The place
    /// also joins the best-fitting cluster of its day's city, spawning a new
    /// one (with a provisional name) when nothing is close enough.
    pub fn add_place(
        &mut self,
        place: Place,
        day: usize,
        slot: Slot,
        order: Option<usize>,
        added_by: Provenance,
    ) -> Result<String> {
        let order = match order {
            Some(order) => order,
            None => self.preview_insertion(day, slot, place.coordinate)?.index,
        };
        let item = PlannedItem::new(&place.id, added_by);
        self.commit(Action::Add {
            day,
            slot,
            order,
            place,
            item,
        })
    }

    /// Remove an item from the plan entirely.
    pub fn remove_item(&mut self, place_id: &str) -> Result<String> {
        let at = self.locate(place_id)?;
        self.ensure_unlocked(place_id)?;
        let place = self
            .plan
            .place(place_id)
            .cloned()
            .ok_or_else(|| PlanError::ItemNotFound(place_id.to_string()))?;
        let item = self
            .plan
            .item(place_id)
            .cloned()
            .ok_or_else(|| PlanError::ItemNotFound(place_id.to_string()))?;
        self.commit(Action::Remove {
            day: at.day,
            slot: at.slot,
            order: at.order,
            place,
            item,
        })
    }

    /// Move an item to another (day, slot). Without an explicit order the
    /// solver picks the minimal-detour position in the target slot's route,
    /// which for a same-slot move is searched without the item itself. A
    /// move within the item's own slot is a reorder.
    pub fn move_item(
        &mut self,
        place_id: &str,
        to_day: usize,
        to_slot: Slot,
        to_order: Option<usize>,
    ) -> Result<String> {
        let from = self.locate(place_id)?;
        self.ensure_unlocked(place_id)?;
        if to_day >= self.plan.days.len() {
            return Err(PlanError::DayOutOfRange(to_day));
        }

        if from.day == to_day && from.slot == to_slot {
            let to_order = match to_order {
                Some(order) => order,
                None => {
                    let coordinate = self
                        .plan
                        .place(place_id)
                        .map(|p| p.coordinate)
                        .ok_or_else(|| PlanError::ItemNotFound(place_id.to_string()))?;
                    // The splice index is post-removal, so the route the
                    // solver sees must not contain the moving item.
                    let route: Vec<Coordinate> = self
                        .plan
                        .day(from.day)
                        .map(|day| {
                            day.slot(from.slot)
                                .iter()
                                .filter(|item| item.place_id != place_id)
                                .filter_map(|item| self.plan.place(&item.place_id))
                                .map(|place| place.coordinate)
                                .collect()
                        })
                        .unwrap_or_default();
                    solver::best_insertion_index(&route, coordinate).index
                }
            };
            return self.reorder_item(place_id, to_order);
        }

        let to_order = match to_order {
            Some(order) => order,
            None => {
                let coordinate = self
                    .plan
                    .place(place_id)
                    .map(|p| p.coordinate)
                    .ok_or_else(|| PlanError::ItemNotFound(place_id.to_string()))?;
                let route = self.plan.slot_route(to_day, to_slot);
                solver::best_insertion_index(&route, coordinate).index
            }
        };

        let place_name = self.place_name(place_id);
        self.commit(Action::Move {
            place_id: place_id.to_string(),
            place_name,
            from,
            to: ItemLocation {
                day: to_day,
                slot: to_slot,
                order: to_order,
            },
        })
    }

    /// Splice an item to a new position within its slot.
    pub fn reorder_item(&mut self, place_id: &str, to_order: usize) -> Result<String> {
        let at = self.locate(place_id)?;
        self.ensure_unlocked(place_id)?;
        let place_name = self.place_name(place_id);
        self.commit(Action::Reorder {
            place_id: place_id.to_string(),
            place_name,
            day: at.day,
            slot: at.slot,
            from_order: at.order,
            to_order,
        })
    }

    /// Replace an item's notes. Allowed on locked items.
    pub fn update_notes(&mut self, place_id: &str, notes: impl Into<String>) -> Result<String> {
        let old_notes = self
            .plan
            .item(place_id)
            .map(|item| item.notes.clone())
            .ok_or_else(|| PlanError::ItemNotFound(place_id.to_string()))?;
        let place_name = self.place_name(place_id);
        self.commit(Action::UpdateNotes {
            place_id: place_id.to_string(),
            place_name,
            old_notes,
            new_notes: notes.into(),
        })
    }

    /// Pin or unpin an item. A locked item refuses remove, move, and
    /// reorder. Lock toggles are not logged: they do not undo, and a lock
    /// does not survive undoing past the item's add.
    pub fn set_locked(&mut self, place_id: &str, locked: bool) -> Result<()> {
        let item = self
            .plan
            .item_mut(place_id)
            .ok_or_else(|| PlanError::ItemNotFound(place_id.to_string()))?;
        item.locked = locked;
        self.dirty = true;
        Ok(())
    }

    /// Replace the category filter. Empty means "show everything". A view
    /// setting, never logged.
    pub fn set_category_filter(&mut self, categories: impl IntoIterator<Item = String>) {
        self.plan.filter.categories = categories.into_iter().collect();
        self.dirty = true;
    }

    // ========================================================================
    // Undo & Redo
    // ========================================================================

    /// Reverse the newest applied edit. Returns a description of what just
    /// happened to the plan. History replay ignores lock flags.
    pub fn undo(&mut self) -> Result<String> {
        let action = self
            .history
            .peek_undo()
            .cloned()
            .ok_or(PlanError::NothingToUndo)?;
        let inverse = action.inverted();
        history::apply(&mut self.plan, &inverse)?;
        self.sync_clusters_for(&inverse);
        self.history.commit_undo();
        self.dirty = true;

        let description = inverse.describe();
        debug!("Undo: {}", description);
        Ok(description)
    }

    /// Re-apply the newest undone edit.
    pub fn redo(&mut self) -> Result<String> {
        let action = self
            .history
            .peek_redo()
            .cloned()
            .ok_or(PlanError::NothingToRedo)?;
        history::apply(&mut self.plan, &action)?;
        self.sync_clusters_for(&action);
        self.history.commit_redo();
        self.dirty = true;

        let description = action.describe();
        debug!("Redo: {}", description);
        Ok(description)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    // ========================================================================
    // Clusters
    // ========================================================================

    /// Clusters of a city, in creation order.
    pub fn clusters(&self, city: &str) -> &[Cluster] {
        self.clusters.get(city).map_or(&[], Vec::as_slice)
    }

    /// The cluster currently holding a planned place, if any.
    pub fn cluster_for_place(&self, place_id: &str) -> Option<&Cluster> {
        self.clusters
            .values()
            .flatten()
            .find(|cluster| cluster.contains(place_id))
    }

    /// Greedy visiting order for a cluster's members, optionally seeded from
    /// an anchor such as the last stop of the previous slot.
    pub fn suggested_visit_order(
        &self,
        city: &str,
        cluster_id: &str,
        anchor: Option<Coordinate>,
    ) -> Result<Vec<String>> {
        let cluster = self
            .clusters
            .get(city)
            .and_then(|clusters| clusters.iter().find(|c| c.id == cluster_id))
            .ok_or_else(|| PlanError::ClusterNotFound(cluster_id.to_string()))?;

        let items: Vec<ClusterItem> = cluster
            .member_ids
            .iter()
            .filter_map(|id| self.plan.place(id))
            .map(ClusterItem::of)
            .collect();

        Ok(cluster::order_items_optimally(items, anchor)
            .into_iter()
            .map(|item| item.place_id)
            .collect())
    }

    /// Give a cluster a user-chosen name. Clears the provisional flag, so a
    /// late geocode response can no longer replace it.
    pub fn rename_cluster(
        &mut self,
        city: &str,
        cluster_id: &str,
        name: impl Into<String>,
    ) -> Result<String> {
        let cluster = self
            .clusters
            .get_mut(city)
            .and_then(|clusters| clusters.iter_mut().find(|c| c.id == cluster_id))
            .ok_or_else(|| PlanError::ClusterNotFound(cluster_id.to_string()))?;

        cluster.name = name.into();
        cluster.provisional_name = false;
        self.dirty = true;
        Ok(format!("Renamed cluster to {}", cluster.name))
    }

    /// Drop a cluster. Its members stay planned, just unclustered; the
    /// deletion itself is not undoable.
    pub fn delete_cluster(&mut self, city: &str, cluster_id: &str) -> Result<String> {
        let clusters = self
            .clusters
            .get_mut(city)
            .ok_or_else(|| PlanError::ClusterNotFound(cluster_id.to_string()))?;
        let position = clusters
            .iter()
            .position(|c| c.id == cluster_id)
            .ok_or_else(|| PlanError::ClusterNotFound(cluster_id.to_string()))?;

        let cluster = clusters.remove(position);
        self.sync.resolve(cluster_id);
        self.dirty = true;
        info!(
            "Deleted cluster '{}' ({} members released)",
            cluster.name,
            cluster.member_ids.len()
        );
        Ok(format!("Deleted cluster {}", cluster.name))
    }

    pub fn cluster_config(&self) -> &ClusterConfig {
        &self.cluster_config
    }

    // ========================================================================
    // Sync Reconciliation
    // ========================================================================

    /// Land the server's authoritative name for a cluster created offline.
    ///
    /// Matched by the client temp id; the local identity is only enriched,
    /// never replaced. A user rename in the meantime wins over the patch.
    /// Unknown ids and deleted clusters make the patch a logged no-op.
    pub fn apply_cluster_name_patch(
        &mut self,
        temp_id: &str,
        remote_id: impl Into<String>,
        name: impl Into<String>,
    ) -> PatchOutcome {
        let Some(PendingKind::ClusterName { city }) = self.sync.resolve(temp_id) else {
            debug!("Stale cluster-name patch for {} ignored", temp_id);
            return PatchOutcome::Stale;
        };

        let Some(cluster) = self
            .clusters
            .get_mut(&city)
            .and_then(|clusters| clusters.iter_mut().find(|c| c.id == temp_id))
        else {
            debug!("Cluster {} gone before its name arrived; patch dropped", temp_id);
            return PatchOutcome::Stale;
        };

        cluster.remote_id = Some(remote_id.into());
        if cluster.provisional_name {
            cluster.name = name.into();
            cluster.provisional_name = false;
            debug!("Cluster {} named '{}'", temp_id, cluster.name);
        } else {
            debug!("Cluster {} was renamed locally; keeping the user's name", temp_id);
        }
        self.dirty = true;
        PatchOutcome::Applied
    }

    /// A background request failed; local state stands.
    pub fn record_sync_failure(&mut self, temp_id: &str, reason: &str) {
        self.sync.fail(temp_id, reason);
    }

    /// Temp ids still awaiting a server response, sorted.
    pub fn pending_sync_ids(&self) -> Vec<&str> {
        self.sync.pending_ids()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn plan(&self) -> &TripPlan {
        &self.plan
    }

    pub fn slot_items(&self, day: usize, slot: Slot) -> Result<&[PlannedItem]> {
        let day_ref = self.plan.day(day).ok_or(PlanError::DayOutOfRange(day))?;
        Ok(day_ref.slot(slot))
    }

    /// Slot items passing the category filter.
    pub fn visible_items(&self, day: usize, slot: Slot) -> Result<Vec<&PlannedItem>> {
        let day_ref = self.plan.day(day).ok_or(PlanError::DayOutOfRange(day))?;
        Ok(day_ref
            .slot(slot)
            .iter()
            .filter(|item| {
                self.plan
                    .place(&item.place_id)
                    .is_some_and(|place| self.plan.filter.matches(&place.category))
            })
            .collect())
    }

    /// Sum of visit durations in one slot, in minutes.
    pub fn total_duration(&self, day: usize, slot: Slot) -> Result<i32> {
        if day >= self.plan.days.len() {
            return Err(PlanError::DayOutOfRange(day));
        }
        Ok(self.plan.slot_duration_minutes(day, slot))
    }

    /// Where the solver would put a stop at `coordinate`, and at what cost.
    pub fn preview_insertion(
        &self,
        day: usize,
        slot: Slot,
        coordinate: Coordinate,
    ) -> Result<Insertion> {
        if day >= self.plan.days.len() {
            return Err(PlanError::DayOutOfRange(day));
        }
        Ok(solver::best_insertion_index(
            &self.plan.slot_route(day, slot),
            coordinate,
        ))
    }

    pub fn placed_place_ids(&self) -> Vec<&str> {
        self.plan.placed_place_ids()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            day_count: self.plan.days.len(),
            planned_count: self.plan.places.len(),
            cluster_count: self.clusters.values().map(Vec::len).sum(),
            undo_depth: self.history.undo_depth(),
            redo_depth: self.history.redo_depth(),
            pending_sync_count: self.sync.pending_count(),
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// The single mutation path: apply, mirror onto clusters, log, flag.
    fn commit(&mut self, action: Action) -> Result<String> {
        history::apply(&mut self.plan, &action)?;
        self.sync_clusters_for(&action);
        self.dirty = true;

        let description = action.describe();
        debug!("{}", description);
        self.history.record(action);
        Ok(description)
    }

    /// Mirror an applied action onto the cluster layer. Reorders and note
    /// edits leave clusters alone; moves only matter when the city changes.
    fn sync_clusters_for(&mut self, action: &Action) {
        match action {
            Action::Add { day, place, .. } => {
                let Some(city) = self.plan.day(*day).map(|d| d.city.clone()) else {
                    return;
                };
                self.assign_to_cluster(&city, place);
            }
            Action::Remove { place, .. } => {
                self.remove_from_clusters(&place.id);
            }
            Action::Move {
                place_id, from, to, ..
            } => {
                let from_city = self.plan.day(from.day).map(|d| d.city.clone());
                let to_city = self.plan.day(to.day).map(|d| d.city.clone());
                if from_city != to_city {
                    self.remove_from_clusters(place_id);
                    if let (Some(city), Some(place)) =
                        (to_city, self.plan.place(place_id).cloned())
                    {
                        self.assign_to_cluster(&city, &place);
                    }
                }
            }
            Action::Reorder { .. } | Action::UpdateNotes { .. } => {}
        }
    }

    /// Merge the place into the closest cluster of its city, or spawn a new
    /// one and track the pending naming request.
    fn assign_to_cluster(&mut self, city: &str, place: &Place) {
        let decision = {
            let clusters = self.clusters.entry(city.to_string()).or_default();
            cluster::find_best_cluster(clusters, place, &self.cluster_config)
        };

        let cluster_id = match decision.cluster_id {
            Some(id) => id,
            None => {
                let name = decision
                    .suggested_name
                    .unwrap_or_else(|| format!("Near {}", place.name));
                let spawned = Cluster::spawn(name, place.coordinate, self.next_cluster_seq);
                self.next_cluster_seq += 1;

                let id = spawned.id.clone();
                self.sync.track(
                    id.as_str(),
                    PendingKind::ClusterName {
                        city: city.to_string(),
                    },
                );
                info!("Spawned cluster '{}' for {}", spawned.name, place.name);
                if let Some(clusters) = self.clusters.get_mut(city) {
                    clusters.push(spawned);
                }
                id
            }
        };

        if let Some(cluster) = self
            .clusters
            .get_mut(city)
            .and_then(|clusters| clusters.iter_mut().find(|c| c.id == cluster_id))
        {
            if !cluster.contains(&place.id) {
                cluster.member_ids.push(place.id.clone());
            }
        }
        self.recompute_cluster(city, &cluster_id);
    }

    /// Pull a place out of whichever cluster holds it. The cluster survives
    /// even when emptied; only an explicit delete removes it.
    fn remove_from_clusters(&mut self, place_id: &str) {
        let mut touched: Option<(String, String)> = None;
        'search: for (city, clusters) in self.clusters.iter_mut() {
            for cluster in clusters.iter_mut() {
                if let Some(position) = cluster.member_ids.iter().position(|id| id == place_id) {
                    cluster.member_ids.remove(position);
                    touched = Some((city.clone(), cluster.id.clone()));
                    break 'search;
                }
            }
        }
        if let Some((city, cluster_id)) = touched {
            self.recompute_cluster(&city, &cluster_id);
        }
    }

    /// Refresh one cluster's order, center, and stats from current members.
    fn recompute_cluster(&mut self, city: &str, cluster_id: &str) {
        let items: Vec<ClusterItem> = {
            let Some(cluster) = self
                .clusters
                .get(city)
                .and_then(|clusters| clusters.iter().find(|c| c.id == cluster_id))
            else {
                return;
            };
            cluster
                .member_ids
                .iter()
                .filter_map(|id| self.plan.place(id))
                .map(ClusterItem::of)
                .collect()
        };

        if let Some(cluster) = self
            .clusters
            .get_mut(city)
            .and_then(|clusters| clusters.iter_mut().find(|c| c.id == cluster_id))
        {
            cluster.recompute(&items, None);
        }
    }

    fn locate(&self, place_id: &str) -> Result<ItemLocation> {
        self.plan
            .find_item(place_id)
            .ok_or_else(|| PlanError::ItemNotFound(place_id.to_string()))
    }

    fn ensure_unlocked(&self, place_id: &str) -> Result<()> {
        if self.plan.item(place_id).is_some_and(|item| item.locked) {
            return Err(PlanError::ItemLocked(place_id.to_string()));
        }
        Ok(())
    }

    fn place_name(&self, place_id: &str) -> String {
        self.plan
            .place(place_id)
            .map(|place| place.name.clone())
            .unwrap_or_else(|| place_id.to_string())
    }
}

/// Engine counters for monitoring.
#[derive(Debug, Clone)]
pub struct EngineStats {
    pub day_count: usize,
    pub planned_count: usize,
    pub cluster_count: usize,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub pending_sync_count: usize,
}
