//! Trip plan data model.
//!
//! The `TripPlan` is the single ownership root: days own slots, slots own
//! planned items, and the place registry holds the full `Place` record for
//! every planned id. Items reference places by id and never copy them.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// A point of interest as returned by the lookup provider.
///
/// Immutable once fetched; everything downstream references it by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub category: String,
    pub coordinate: Coordinate,
    /// Estimated visit duration in minutes.
    pub duration_minutes: i32,
    pub rating: Option<f32>,
    pub price_level: Option<u8>,
}

/// The four scheduling windows of a day, in day order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Morning, Slot::Afternoon, Slot::Evening, Slot::Night];
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Slot::Morning => "morning",
            Slot::Afternoon => "afternoon",
            Slot::Evening => "evening",
            Slot::Night => "night",
        };
        f.write_str(label)
    }
}

/// Who placed an item: the user directly, or an AI suggestion they accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    User,
    Ai,
}

/// One scheduled stop inside a (day, slot).
///
/// Identified by its `place_id`; a place appears at most once across the
/// whole plan, so the id doubles as the item id. Within a slot the
/// `order_in_slot` values always form the contiguous sequence `0..n-1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedItem {
    pub place_id: String,
    pub order_in_slot: usize,
    pub locked: bool,
    pub notes: String,
    pub added_by: Provenance,
    pub created_at: DateTime<Utc>,
}

impl PlannedItem {
    pub fn new(place_id: impl Into<String>, added_by: Provenance) -> Self {
        Self {
            place_id: place_id.into(),
            order_in_slot: 0,
            locked: false,
            notes: String::new(),
            added_by,
            created_at: Utc::now(),
        }
    }
}

/// One day of the trip, bound to a city.
///
/// All four slots are always present, empty or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    pub city: String,
    pub slots: BTreeMap<Slot, Vec<PlannedItem>>,
}

impl Day {
    pub fn new(date: NaiveDate, city: impl Into<String>) -> Self {
        let mut slots = BTreeMap::new();
        for slot in Slot::ALL {
            slots.insert(slot, Vec::new());
        }
        Self {
            date,
            city: city.into(),
            slots,
        }
    }

    pub fn slot(&self, slot: Slot) -> &[PlannedItem] {
        self.slots.get(&slot).map_or(&[], Vec::as_slice)
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut Vec<PlannedItem> {
        self.slots.entry(slot).or_default()
    }
}

/// Category filter applied to the read queries. Empty means "show everything".
///
/// A view concern: changing it is not a plan mutation and is never logged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub categories: BTreeSet<String>,
}

impl FilterState {
    pub fn matches(&self, category: &str) -> bool {
        self.categories.is_empty() || self.categories.contains(category)
    }
}

/// Where a planned item currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemLocation {
    pub day: usize,
    pub slot: Slot,
    pub order: usize,
}

/// The whole schedule for one trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub days: Vec<Day>,
    /// Registry of every planned place, keyed by id. Consulted before any
    /// insertion so a place can never be planned twice.
    pub places: HashMap<String, Place>,
    pub filter: FilterState,
}

impl TripPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plan of `day_count` consecutive days starting at `start`, all in one
    /// city.
    pub fn with_days(start: NaiveDate, day_count: usize, city: &str) -> Self {
        let mut plan = Self::new();
        for offset in 0..day_count {
            let date = start + Duration::days(offset as i64);
            plan.days.push(Day::new(date, city));
        }
        plan
    }

    pub fn push_day(&mut self, date: NaiveDate, city: impl Into<String>) {
        self.days.push(Day::new(date, city));
    }

    pub fn day(&self, index: usize) -> Option<&Day> {
        self.days.get(index)
    }

    pub fn day_mut(&mut self, index: usize) -> Option<&mut Day> {
        self.days.get_mut(index)
    }

    pub fn place(&self, place_id: &str) -> Option<&Place> {
        self.places.get(place_id)
    }

    pub fn is_placed(&self, place_id: &str) -> bool {
        self.places.contains_key(place_id)
    }

    /// Every planned place id in day/slot/order traversal order.
    pub fn placed_place_ids(&self) -> Vec<&str> {
        self.days
            .iter()
            .flat_map(|day| Slot::ALL.into_iter().flat_map(|slot| day.slot(slot)))
            .map(|item| item.place_id.as_str())
            .collect()
    }

    /// Locate an item anywhere in the plan by its place id.
    pub fn find_item(&self, place_id: &str) -> Option<ItemLocation> {
        for (day_index, day) in self.days.iter().enumerate() {
            for slot in Slot::ALL {
                if let Some(order) = day.slot(slot).iter().position(|it| it.place_id == place_id) {
                    return Some(ItemLocation {
                        day: day_index,
                        slot,
                        order,
                    });
                }
            }
        }
        None
    }

    pub fn item(&self, place_id: &str) -> Option<&PlannedItem> {
        let at = self.find_item(place_id)?;
        self.days.get(at.day)?.slot(at.slot).get(at.order)
    }

    pub fn item_mut(&mut self, place_id: &str) -> Option<&mut PlannedItem> {
        let at = self.find_item(place_id)?;
        self.days.get_mut(at.day)?.slot_mut(at.slot).get_mut(at.order)
    }

    /// Sum of visit durations in one slot, in minutes.
    pub fn slot_duration_minutes(&self, day: usize, slot: Slot) -> i32 {
        let Some(day) = self.days.get(day) else {
            return 0;
        };
        day.slot(slot)
            .iter()
            .filter_map(|item| self.places.get(&item.place_id))
            .map(|place| place.duration_minutes)
            .sum()
    }

    /// Coordinates of a slot's items in visiting order.
    pub fn slot_route(&self, day: usize, slot: Slot) -> Vec<Coordinate> {
        let Some(day) = self.days.get(day) else {
            return Vec::new();
        };
        day.slot(slot)
            .iter()
            .filter_map(|item| self.places.get(&item.place_id))
            .map(|place| place.coordinate)
            .collect()
    }
}

/// Restore the contiguous `0..n-1` ordering after a splice.
pub(crate) fn renumber(items: &mut [PlannedItem]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.order_in_slot = index;
    }
}
