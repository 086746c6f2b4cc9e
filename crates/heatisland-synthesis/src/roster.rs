//! The fixed city roster.
//!
//! Thirteen cities, ten in Asia and three world references. Taipei is the
//! focus city: it receives the basin multiplier in the engine and cannot
//! be deselected in the dashboard.

use heatisland_types::{CityProfile, Region};

/// Identifier of the focus city.
pub const FOCUS_CITY_ID: &str = "taipei";

const fn city(
    id: &'static str,
    display_name: &'static str,
    display_color: &'static str,
    base_temp: f64,
    uhi_factor: f64,
    warming_rate: f64,
    region: Region,
) -> CityProfile {
    CityProfile {
        id,
        display_name,
        display_color,
        base_temp,
        uhi_factor,
        warming_rate,
        region,
    }
}

static ROSTER: [CityProfile; 13] = [
    city("taipei", "Taipei (Focus)", "#f43f5e", 23.0, 1.8, 1.3, Region::Asia),
    city("tokyo", "Tokyo", "#a855f7", 15.4, 1.5, 1.1, Region::Asia),
    city("bangkok", "Bangkok", "#f97316", 28.2, 1.6, 1.15, Region::Asia),
    city("seoul", "Seoul", "#06b6d4", 12.5, 1.4, 1.25, Region::Asia),
    city("shanghai", "Shanghai", "#6366f1", 16.8, 1.7, 1.2, Region::Asia),
    city("manila", "Manila", "#eab308", 27.0, 1.5, 1.1, Region::Asia),
    city("mumbai", "Mumbai", "#ec4899", 27.2, 1.3, 1.05, Region::Asia),
    city("jakarta", "Jakarta", "#10b981", 28.0, 1.6, 1.1, Region::Asia),
    city("beijing", "Beijing", "#ef4444", 12.6, 1.5, 1.2, Region::Asia),
    city("hanoi", "Hanoi", "#8b5cf6", 23.6, 1.4, 1.1, Region::Asia),
    city("nyc", "New York", "#3b82f6", 12.7, 1.1, 1.0, Region::World),
    city("london", "London", "#94a3b8", 11.3, 0.9, 0.9, Region::World),
    city("singapore", "Singapore", "#14b8a6", 27.5, 1.4, 1.05, Region::Asia),
];

/// The full roster in display order.
pub fn roster() -> &'static [CityProfile] {
    &ROSTER
}

/// Look up a city by its stable identifier.
pub fn find_city(id: &str) -> Option<&'static CityProfile> {
    ROSTER.iter().find(|c| c.id == id)
}

/// The focus city (Taipei).
pub fn focus_city() -> Option<&'static CityProfile> {
    find_city(FOCUS_CITY_ID)
}

/// Cities in the given selector group, in roster order.
pub fn cities_in_region(region: Region) -> impl Iterator<Item = &'static CityProfile> {
    ROSTER.iter().filter(move |c| c.region == region)
}
