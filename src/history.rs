//! Reversible schedule mutations.
//!
//! Every user edit becomes an [`Action`] carrying enough state to replay it
//! in either direction. The [`MutationLog`] holds the applied actions on a
//! bounded undo stack; undoing applies the mirror action and moves the entry
//! to the redo stack.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::model::{renumber, ItemLocation, Place, PlannedItem, Slot, TripPlan};

/// Edits remembered for undo. The oldest entry is evicted beyond this.
pub const MAX_UNDO_DEPTH: usize = 50;

/// One reversible schedule edit.
///
/// Variants carry full snapshots (the place record, the removed item, old
/// notes) rather than references, so an action replays correctly no matter
/// how much later it runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Add {
        day: usize,
        slot: Slot,
        order: usize,
        place: Place,
        item: PlannedItem,
    },
    Remove {
        day: usize,
        slot: Slot,
        order: usize,
        place: Place,
        item: PlannedItem,
    },
    Move {
        place_id: String,
        place_name: String,
        from: ItemLocation,
        /// `to.order` is the splice index in the target slot after removal.
        to: ItemLocation,
    },
    Reorder {
        place_id: String,
        place_name: String,
        day: usize,
        slot: Slot,
        from_order: usize,
        /// Splice index after the item is taken out, `0..len-1`.
        to_order: usize,
    },
    UpdateNotes {
        place_id: String,
        place_name: String,
        old_notes: String,
        new_notes: String,
    },
}

impl Action {
    /// The mirror action: applying it exactly reverses this one.
    pub fn inverted(&self) -> Action {
        match self.clone() {
            Action::Add {
                day,
                slot,
                order,
                place,
                item,
            } => Action::Remove {
                day,
                slot,
                order,
                place,
                item,
            },
            Action::Remove {
                day,
                slot,
                order,
                place,
                item,
            } => Action::Add {
                day,
                slot,
                order,
                place,
                item,
            },
            Action::Move {
                place_id,
                place_name,
                from,
                to,
            } => Action::Move {
                place_id,
                place_name,
                from: to,
                to: from,
            },
            Action::Reorder {
                place_id,
                place_name,
                day,
                slot,
                from_order,
                to_order,
            } => Action::Reorder {
                place_id,
                place_name,
                day,
                slot,
                from_order: to_order,
                to_order: from_order,
            },
            Action::UpdateNotes {
                place_id,
                place_name,
                old_notes,
                new_notes,
            } => Action::UpdateNotes {
                place_id,
                place_name,
                old_notes: new_notes,
                new_notes: old_notes,
            },
        }
    }

    /// Short human-readable line for toasts ("Added Louvre to day 1, morning").
    pub fn describe(&self) -> String {
        match self {
            Action::Add {
                place, day, slot, ..
            } => format!("Added {} to day {}, {}", place.name, day + 1, slot),
            Action::Remove {
                place, day, slot, ..
            } => format!("Removed {} from day {}, {}", place.name, day + 1, slot),
            Action::Move {
                place_name, to, ..
            } => format!("Moved {} to day {}, {}", place_name, to.day + 1, to.slot),
            Action::Reorder {
                place_name,
                day,
                slot,
                ..
            } => format!("Reordered {} within day {}, {}", place_name, day + 1, slot),
            Action::UpdateNotes { place_name, .. } => {
                format!("Updated notes for {}", place_name)
            }
        }
    }
}

/// Forward-apply an action to the plan.
///
/// Atomic: every guard runs before the first write, so a failed action
/// leaves the plan untouched. Slot orderings are renumbered back to the
/// contiguous `0..n-1` sequence after every splice.
pub fn apply(plan: &mut TripPlan, action: &Action) -> Result<()> {
    match action {
        Action::Add {
            day,
            slot,
            order,
            place,
            item,
        } => {
            if plan.is_placed(&place.id) {
                return Err(PlanError::DuplicatePlace(place.id.clone()));
            }
            let len = plan
                .day(*day)
                .ok_or(PlanError::DayOutOfRange(*day))?
                .slot(*slot)
                .len();
            if *order > len {
                return Err(PlanError::OrderOutOfRange { order: *order, len });
            }

            let slot_items = plan
                .day_mut(*day)
                .ok_or(PlanError::DayOutOfRange(*day))?
                .slot_mut(*slot);
            slot_items.insert(*order, item.clone());
            renumber(slot_items);
            plan.places.insert(place.id.clone(), place.clone());
            Ok(())
        }

        Action::Remove {
            day, slot, place, ..
        } => {
            let day_ref = plan.day(*day).ok_or(PlanError::DayOutOfRange(*day))?;
            let position = day_ref
                .slot(*slot)
                .iter()
                .position(|it| it.place_id == place.id)
                .ok_or_else(|| PlanError::ItemNotInSlot {
                    place_id: place.id.clone(),
                    day: *day,
                    slot: *slot,
                })?;

            let slot_items = plan
                .day_mut(*day)
                .ok_or(PlanError::DayOutOfRange(*day))?
                .slot_mut(*slot);
            slot_items.remove(position);
            renumber(slot_items);
            plan.places.remove(&place.id);
            Ok(())
        }

        Action::Move {
            place_id, from, to, ..
        } => {
            let source_day = plan.day(from.day).ok_or(PlanError::DayOutOfRange(from.day))?;
            let source_position = source_day
                .slot(from.slot)
                .iter()
                .position(|it| it.place_id == *place_id)
                .ok_or_else(|| PlanError::ItemNotInSlot {
                    place_id: place_id.clone(),
                    day: from.day,
                    slot: from.slot,
                })?;

            let target_day = plan.day(to.day).ok_or(PlanError::DayOutOfRange(to.day))?;
            let same_slot = from.day == to.day && from.slot == to.slot;
            let target_len = if same_slot {
                target_day.slot(to.slot).len() - 1
            } else {
                target_day.slot(to.slot).len()
            };
            if to.order > target_len {
                return Err(PlanError::OrderOutOfRange {
                    order: to.order,
                    len: target_len,
                });
            }

            let removed = plan
                .day_mut(from.day)
                .ok_or(PlanError::DayOutOfRange(from.day))?
                .slot_mut(from.slot)
                .remove(source_position);
            {
                let source_items = plan
                    .day_mut(from.day)
                    .ok_or(PlanError::DayOutOfRange(from.day))?
                    .slot_mut(from.slot);
                renumber(source_items);
            }
            let target_items = plan
                .day_mut(to.day)
                .ok_or(PlanError::DayOutOfRange(to.day))?
                .slot_mut(to.slot);
            target_items.insert(to.order, removed);
            renumber(target_items);
            Ok(())
        }

        Action::Reorder {
            place_id,
            day,
            slot,
            to_order,
            ..
        } => {
            let day_ref = plan.day(*day).ok_or(PlanError::DayOutOfRange(*day))?;
            let len = day_ref.slot(*slot).len();
            let position = day_ref
                .slot(*slot)
                .iter()
                .position(|it| it.place_id == *place_id)
                .ok_or_else(|| PlanError::ItemNotInSlot {
                    place_id: place_id.clone(),
                    day: *day,
                    slot: *slot,
                })?;
            if *to_order >= len {
                return Err(PlanError::OrderOutOfRange {
                    order: *to_order,
                    len,
                });
            }

            let slot_items = plan
                .day_mut(*day)
                .ok_or(PlanError::DayOutOfRange(*day))?
                .slot_mut(*slot);
            let item = slot_items.remove(position);
            slot_items.insert(*to_order, item);
            renumber(slot_items);
            Ok(())
        }

        Action::UpdateNotes {
            place_id,
            new_notes,
            ..
        } => {
            let item = plan
                .item_mut(place_id)
                .ok_or_else(|| PlanError::ItemNotFound(place_id.clone()))?;
            item.notes = new_notes.clone();
            Ok(())
        }
    }
}

/// Bounded undo/redo stacks over applied actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MutationLog {
    undo: VecDeque<Action>,
    redo: Vec<Action>,
}

impl MutationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly applied edit. Any redo branch dies here.
    pub fn record(&mut self, action: Action) {
        self.push_undo(action);
        self.redo.clear();
    }

    pub fn peek_undo(&self) -> Option<&Action> {
        self.undo.back()
    }

    pub fn peek_redo(&self) -> Option<&Action> {
        self.redo.last()
    }

    /// Move the newest applied action onto the redo stack. Call only after
    /// its inverse has been applied.
    pub fn commit_undo(&mut self) {
        if let Some(action) = self.undo.pop_back() {
            self.redo.push(action);
        }
    }

    /// Move the newest undone action back onto the undo stack. Call only
    /// after it has been re-applied.
    pub fn commit_redo(&mut self) {
        if let Some(action) = self.redo.pop() {
            self.push_undo(action);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    fn push_undo(&mut self, action: Action) {
        if self.undo.len() >= MAX_UNDO_DEPTH {
            self.undo.pop_front();
        }
        self.undo.push_back(action);
    }
}
