//! Real Paris locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. Grouped by walkable area so
//! tests can reason about which places should cluster together.

use itinerary_planner::geo::Coordinate;

/// A named location with coordinates and a visit profile.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub category: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub duration_minutes: i32,
}

impl Location {
    pub const fn new(
        name: &'static str,
        category: &'static str,
        lat: f64,
        lng: f64,
        duration_minutes: i32,
    ) -> Self {
        Self {
            name,
            category,
            lat,
            lng,
            duration_minutes,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

// ============================================================================
// Louvre / Tuileries Area (1st arrondissement)
// ============================================================================

pub const LOUVRE_AREA: &[Location] = &[
    Location::new("Musée du Louvre", "museum", 48.8606, 2.3376, 180),
    Location::new("Palais-Royal", "landmark", 48.8637, 2.3371, 45),
    Location::new("Jardin des Tuileries", "park", 48.8635, 2.3275, 60),
    Location::new("Musée de l'Orangerie", "museum", 48.8637, 2.3226, 90),
    Location::new("Place Vendôme", "landmark", 48.8675, 2.3294, 20),
    Location::new("Bourse de Commerce", "museum", 48.8626, 2.3428, 90),
    Location::new("Saint-Eustache", "church", 48.8634, 2.3451, 30),
    Location::new("Angelina", "cafe", 48.8655, 2.3284, 45),
];

// ============================================================================
// Le Marais (3rd / 4th arrondissement)
// ============================================================================

pub const MARAIS: &[Location] = &[
    Location::new("Centre Pompidou", "museum", 48.8607, 2.3522, 120),
    Location::new("Place des Vosges", "landmark", 48.8556, 2.3655, 30),
    Location::new("Musée Picasso", "museum", 48.8599, 2.3622, 90),
    Location::new("Musée Carnavalet", "museum", 48.8574, 2.3628, 90),
    Location::new("Marché des Enfants Rouges", "market", 48.8627, 2.3614, 45),
    Location::new("Hôtel de Ville", "landmark", 48.8566, 2.3522, 20),
    Location::new("Breizh Café", "restaurant", 48.8609, 2.3623, 60),
];

// ============================================================================
// Latin Quarter / Île de la Cité (4th / 5th / 6th)
// ============================================================================

pub const LATIN_QUARTER: &[Location] = &[
    Location::new("Notre-Dame", "church", 48.8530, 2.3499, 60),
    Location::new("Sainte-Chapelle", "church", 48.8554, 2.3450, 45),
    Location::new("Panthéon", "landmark", 48.8462, 2.3464, 60),
    Location::new("Jardin du Luxembourg", "park", 48.8462, 2.3372, 60),
    Location::new("Musée de Cluny", "museum", 48.8505, 2.3440, 75),
    Location::new("Shakespeare and Company", "shop", 48.8526, 2.3471, 30),
    Location::new("Berthillon", "cafe", 48.8517, 2.3568, 30),
];

// ============================================================================
// Montmartre (18th)
// ============================================================================

pub const MONTMARTRE: &[Location] = &[
    Location::new("Sacré-Cœur", "church", 48.8867, 2.3431, 60),
    Location::new("Place du Tertre", "landmark", 48.8865, 2.3407, 30),
    Location::new("Musée de Montmartre", "museum", 48.8875, 2.3407, 75),
    Location::new("Le Mur des je t'aime", "landmark", 48.8844, 2.3383, 15),
    Location::new("Moulin Rouge", "landmark", 48.8841, 2.3322, 20),
];

// ============================================================================
// Eiffel Tower / Invalides (7th)
// ============================================================================

pub const EIFFEL_AREA: &[Location] = &[
    Location::new("Eiffel Tower", "landmark", 48.8584, 2.2945, 120),
    Location::new("Champ de Mars", "park", 48.8556, 2.2986, 45),
    Location::new("Musée du Quai Branly", "museum", 48.8609, 2.2978, 90),
    Location::new("Les Invalides", "museum", 48.8560, 2.3126, 90),
    Location::new("Musée Rodin", "museum", 48.8553, 2.3158, 75),
];

// ============================================================================
// Champs-Élysées / Opéra (8th / 9th)
// ============================================================================

pub const RIGHT_BANK: &[Location] = &[
    Location::new("Arc de Triomphe", "landmark", 48.8738, 2.2950, 45),
    Location::new("Grand Palais", "museum", 48.8661, 2.3125, 90),
    Location::new("Petit Palais", "museum", 48.8660, 2.3146, 60),
    Location::new("Place de la Concorde", "landmark", 48.8656, 2.3212, 20),
    Location::new("Palais Garnier", "landmark", 48.8720, 2.3316, 60),
    Location::new("La Madeleine", "church", 48.8700, 2.3246, 30),
    Location::new("Bouillon Chartier", "restaurant", 48.8719, 2.3431, 60),
];

// ============================================================================
// Orsay / Saint-Germain (6th / 7th)
// ============================================================================

pub const LEFT_BANK: &[Location] = &[
    Location::new("Musée d'Orsay", "museum", 48.8600, 2.3266, 120),
    Location::new("Café de Flore", "cafe", 48.8540, 2.3325, 45),
    Location::new("Les Deux Magots", "cafe", 48.8540, 2.3336, 45),
    Location::new("Saint-Sulpice", "church", 48.8511, 2.3348, 30),
    Location::new("Le Procope", "restaurant", 48.8530, 2.3389, 75),
];

// ============================================================================
// All Locations Combined
// ============================================================================

/// Returns all locations as a single vec.
pub fn all_locations() -> Vec<Location> {
    let mut all = Vec::with_capacity(50);
    all.extend_from_slice(LOUVRE_AREA);
    all.extend_from_slice(MARAIS);
    all.extend_from_slice(LATIN_QUARTER);
    all.extend_from_slice(MONTMARTRE);
    all.extend_from_slice(EIFFEL_AREA);
    all.extend_from_slice(RIGHT_BANK);
    all.extend_from_slice(LEFT_BANK);
    all
}

/// Find a fixture location by name.
pub fn by_name(name: &str) -> Location {
    all_locations()
        .into_iter()
        .find(|location| location.name == name)
        .unwrap_or_else(|| panic!("no fixture location named '{}'", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_in_paris_area() {
        for location in all_locations() {
            assert!(
                location.lat > 48.8 && location.lat < 48.92,
                "{} lat out of range: {}",
                location.name,
                location.lat
            );
            assert!(
                location.lng > 2.25 && location.lng < 2.41,
                "{} lng out of range: {}",
                location.name,
                location.lng
            );
        }
    }

    #[test]
    fn test_names_are_unique() {
        let all = all_locations();
        for (index, location) in all.iter().enumerate() {
            assert!(
                all[index + 1..].iter().all(|other| other.name != location.name),
                "duplicate fixture name: {}",
                location.name
            );
        }
    }
}
