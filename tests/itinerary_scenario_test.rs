//! Realistic itinerary tests using real Paris locations.
//!
//! These tests drive the engine the way a planning session would: three
//! days, mixed neighbourhoods, mid-trip replanning, and a save/reload.

mod fixtures;

use chrono::NaiveDate;

use itinerary_planner::engine::PlannerEngine;
use itinerary_planner::model::{Place, Provenance, Slot, TripPlan};

use fixtures::paris_locations::{self, Location};

// ============================================================================
// Trip Setup
// ============================================================================

const DAY0_MORNING: &[&str] = &["Musée du Louvre", "Palais-Royal", "Jardin des Tuileries"];
const DAY0_AFTERNOON: &[&str] = &[
    "Centre Pompidou",
    "Musée Picasso",
    "Place des Vosges",
    "Musée Carnavalet",
];
const DAY1_MORNING: &[&str] = &[
    "Panthéon",
    "Jardin du Luxembourg",
    "Musée de Cluny",
    "Sainte-Chapelle",
    "Notre-Dame",
];
const DAY1_AFTERNOON: &[&str] = &["Eiffel Tower", "Musée du Quai Branly"];
const DAY2_MORNING: &[&str] = &[
    "Sacré-Cœur",
    "Place du Tertre",
    "Musée de Montmartre",
    "Le Mur des je t'aime",
];

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

fn place_from(location: &Location) -> Place {
    Place {
        id: slug(location.name),
        name: location.name.to_string(),
        category: location.category.to_string(),
        coordinate: location.coordinate(),
        duration_minutes: location.duration_minutes,
        rating: None,
        price_level: None,
    }
}

fn add(engine: &mut PlannerEngine, name: &str, day: usize, slot: Slot) -> String {
    let len = engine.slot_items(day, slot).unwrap().len();
    let place = place_from(&paris_locations::by_name(name));
    let id = place.id.clone();
    engine
        .add_place(place, day, slot, Some(len), Provenance::User)
        .unwrap();
    id
}

/// A populated three-day Paris trip: eighteen stops over five slots.
fn plan_trip() -> PlannerEngine {
    let start = NaiveDate::parse_from_str("2026-05-01", "%Y-%m-%d").unwrap();
    let mut engine = PlannerEngine::new(TripPlan::with_days(start, 3, "Paris"));

    for name in DAY0_MORNING {
        add(&mut engine, name, 0, Slot::Morning);
    }
    for name in DAY0_AFTERNOON {
        add(&mut engine, name, 0, Slot::Afternoon);
    }
    for name in DAY1_MORNING {
        add(&mut engine, name, 1, Slot::Morning);
    }
    for name in DAY1_AFTERNOON {
        add(&mut engine, name, 1, Slot::Afternoon);
    }
    for name in DAY2_MORNING {
        add(&mut engine, name, 2, Slot::Morning);
    }
    engine
}

// ============================================================================
// Clustering Over a Real Trip
// ============================================================================

#[test]
fn test_three_day_trip_clusters_by_neighbourhood() {
    let engine = plan_trip();

    let clusters = engine.clusters("Paris");
    let names: Vec<&str> = clusters.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Near Musée du Louvre",
            "Near Centre Pompidou",
            "Near Panthéon",
            "Near Eiffel Tower",
            "Near Sacré-Cœur",
        ],
        "One cluster per neighbourhood, in planning order"
    );

    let sizes: Vec<usize> = clusters.iter().map(|c| c.member_ids.len()).collect();
    assert_eq!(sizes, vec![3, 4, 5, 2, 4]);

    let groups: [(&[&str], &str); 5] = [
        (DAY0_MORNING, "Near Musée du Louvre"),
        (DAY0_AFTERNOON, "Near Centre Pompidou"),
        (DAY1_MORNING, "Near Panthéon"),
        (DAY1_AFTERNOON, "Near Eiffel Tower"),
        (DAY2_MORNING, "Near Sacré-Cœur"),
    ];
    for (group, cluster_name) in groups {
        for name in group {
            let cluster = engine.cluster_for_place(&slug(name)).unwrap();
            assert_eq!(
                cluster.name, cluster_name,
                "{} should sit in {}",
                name, cluster_name
            );
        }
    }
}

#[test]
fn test_suggested_order_is_a_sensible_walk() {
    let engine = plan_trip();
    let montmartre = engine
        .clusters("Paris")
        .iter()
        .find(|c| c.name == "Near Sacré-Cœur")
        .unwrap();

    let unanchored = engine
        .suggested_visit_order("Paris", &montmartre.id, None)
        .unwrap();
    assert_eq!(
        unanchored,
        vec![
            slug("Sacré-Cœur"),
            slug("Place du Tertre"),
            slug("Musée de Montmartre"),
            slug("Le Mur des je t'aime"),
        ]
    );

    // Coming up from Pigalle, the wall is the natural first stop.
    let moulin_rouge = paris_locations::by_name("Moulin Rouge").coordinate();
    let anchored = engine
        .suggested_visit_order("Paris", &montmartre.id, Some(moulin_rouge))
        .unwrap();
    assert_eq!(
        anchored,
        vec![
            slug("Le Mur des je t'aime"),
            slug("Place du Tertre"),
            slug("Musée de Montmartre"),
            slug("Sacré-Cœur"),
        ]
    );
}

// ============================================================================
// Replanning Mid-Trip
// ============================================================================

#[test]
fn test_replanning_an_afternoon_is_reversible() {
    let mut engine = plan_trip();
    let before = engine.plan().clone();

    // Pull the Picasso museum forward into the morning.
    let picasso = slug("Musée Picasso");
    engine.move_item(&picasso, 0, Slot::Morning, None).unwrap();

    assert_eq!(engine.plan().find_item(&picasso).unwrap().slot, Slot::Morning);
    assert_eq!(engine.slot_items(0, Slot::Afternoon).unwrap().len(), 3);
    let orders: Vec<usize> = engine
        .slot_items(0, Slot::Afternoon)
        .unwrap()
        .iter()
        .map(|item| item.order_in_slot)
        .collect();
    assert_eq!(orders, vec![0, 1, 2], "The vacated slot renumbers");

    engine.undo().unwrap();
    assert_eq!(engine.plan(), &before, "One undo rolls the replan back entirely");
}

#[test]
fn test_slot_durations_reflect_the_schedule() {
    let engine = plan_trip();
    // Louvre 180 + Palais-Royal 45 + Tuileries 60.
    assert_eq!(engine.total_duration(0, Slot::Morning).unwrap(), 285);
    // Pompidou 120 + Picasso 90 + Vosges 30 + Carnavalet 90.
    assert_eq!(engine.total_duration(0, Slot::Afternoon).unwrap(), 330);
    // Sacré-Cœur 60 + Tertre 30 + Musée de Montmartre 75 + Mur 15.
    assert_eq!(engine.total_duration(2, Slot::Morning).unwrap(), 180);
    assert_eq!(engine.total_duration(2, Slot::Night).unwrap(), 0);
}

#[test]
fn test_museum_filter_across_the_trip() {
    let mut engine = plan_trip();
    engine.set_category_filter(["museum".to_string()]);

    let morning_visible = engine.visible_items(0, Slot::Morning).unwrap();
    assert_eq!(morning_visible.len(), 1, "Only the Louvre is a museum that morning");

    let afternoon_visible = engine.visible_items(0, Slot::Afternoon).unwrap();
    assert_eq!(
        afternoon_visible.len(),
        3,
        "Pompidou, Picasso, and Carnavalet pass; Place des Vosges does not"
    );
}

// ============================================================================
// Persistence of a Full Trip
// ============================================================================

#[test]
fn test_full_trip_survives_save_and_reload() {
    let engine = plan_trip();
    let saved = engine.snapshot();

    let restored = PlannerEngine::restore(saved.clone());
    assert_eq!(restored.plan(), engine.plan());
    assert_eq!(restored.snapshot(), saved);

    let stats = restored.stats();
    assert_eq!(stats.day_count, 3);
    assert_eq!(stats.planned_count, 18);
    assert_eq!(stats.cluster_count, 5);
    assert_eq!(stats.undo_depth, 0, "History does not survive the reload");
}
