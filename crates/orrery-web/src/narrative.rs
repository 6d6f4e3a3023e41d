//! Per-planet narrative records for the info panel.
//!
//! The records come from an external text service as JSON. The simulation
//! never reads them; the bridge only caches them by body name and hands a
//! built-in fallback record to the display layer when nothing is cached.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Appended to the status line of a record served from the built-in table.
pub const OFFLINE_SUFFIX: &str = " [offline cache]";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereComponent {
    pub gas: String,
    pub percentage: f32,
}

/// One planet's 2035 status record. Indices are on a 0–100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetReport {
    pub mass: String,
    pub orbital_period: String,
    pub atmosphere: Vec<AtmosphereComponent>,
    pub geomagnetic_strength: String,
    pub rare_minerals_density: f32,
    pub main_energy_type: String,
    pub water_coverage: f32,
    pub biodiversity_index: f32,
    pub climate_stability: f32,
    pub pollution_level: f32,
    pub status_report: String,
}

impl PlanetReport {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Clamp every index into [0, 100]; non-finite values become 0.
    pub fn sanitized(mut self) -> Self {
        fn pct(v: f32) -> f32 {
            if v.is_finite() { v.clamp(0.0, 100.0) } else { 0.0 }
        }
        self.rare_minerals_density = pct(self.rare_minerals_density);
        self.water_coverage = pct(self.water_coverage);
        self.biodiversity_index = pct(self.biodiversity_index);
        self.climate_stability = pct(self.climate_stability);
        self.pollution_level = pct(self.pollution_level);
        for a in &mut self.atmosphere {
            a.percentage = pct(a.percentage);
        }
        self
    }

    /// Record shown for a body with no data at all.
    pub fn unknown() -> Self {
        Self {
            mass: "unknown".into(),
            orbital_period: "calculating...".into(),
            atmosphere: vec![AtmosphereComponent { gas: "N/A".into(), percentage: 0.0 }],
            geomagnetic_strength: "unknown".into(),
            rare_minerals_density: 50.0,
            main_energy_type: "unknown".into(),
            water_coverage: 0.0,
            biodiversity_index: 0.0,
            climate_stability: 0.0,
            pollution_level: 0.0,
            status_report: "Interplanetary database unreachable. Showing last known cache.".into(),
        }
    }

    /// Built-in record for a catalog planet, if there is one.
    pub fn fallback(name: &str) -> Option<Self> {
        let row = FALLBACK.iter().find(|row| row.name == name)?;
        Some(Self {
            mass: row.mass.into(),
            orbital_period: row.period.into(),
            atmosphere: row
                .atmosphere
                .iter()
                .map(|&(gas, percentage)| AtmosphereComponent { gas: gas.into(), percentage })
                .collect(),
            geomagnetic_strength: row.magnetism.into(),
            rare_minerals_density: row.indices[0],
            main_energy_type: row.energy.into(),
            water_coverage: row.indices[1],
            biodiversity_index: row.indices[2],
            climate_stability: row.indices[3],
            pollution_level: row.indices[4],
            status_report: format!("{}{}", row.status, OFFLINE_SUFFIX),
        })
    }
}

struct FallbackRow {
    name: &'static str,
    mass: &'static str,
    period: &'static str,
    atmosphere: [(&'static str, f32); 3],
    magnetism: &'static str,
    energy: &'static str,
    /// minerals, water, biodiversity, climate, pollution
    indices: [f32; 5],
    status: &'static str,
}

const FALLBACK: [FallbackRow; 8] = [
    FallbackRow {
        name: "Mercury",
        mass: "0.055 Earths",
        period: "88 days",
        atmosphere: [("Oxygen", 42.0), ("Sodium", 29.0), ("Hydrogen", 22.0)],
        magnetism: "0.003 Gauss",
        energy: "High-flux solar",
        indices: [85.0, 0.0, 0.0, 10.0, 5.0],
        status: "Equatorial solar arrays online. Subsurface mining at triple capacity.",
    },
    FallbackRow {
        name: "Venus",
        mass: "0.815 Earths",
        period: "225 days",
        atmosphere: [("Carbon dioxide", 96.0), ("Nitrogen", 3.0), ("Sulfur dioxide", 0.015)],
        magnetism: "Negligible",
        energy: "Geothermal / atmospheric heat",
        indices: [60.0, 0.0, 2.0, 5.0, 90.0],
        status: "Floating colony enters phase three. Acid neutralisation trials show first results.",
    },
    FallbackRow {
        name: "Earth",
        mass: "1 Earth",
        period: "365.25 days",
        atmosphere: [("Nitrogen", 78.0), ("Oxygen", 21.0), ("Argon", 0.9)],
        magnetism: "0.50 Gauss",
        energy: "Fusion / renewables",
        indices: [45.0, 71.0, 65.0, 78.0, 30.0],
        status: "Carbon capture grid has stabilised global temperature. Rewilding zones expanding.",
    },
    FallbackRow {
        name: "Mars",
        mass: "0.107 Earths",
        period: "687 days",
        atmosphere: [("Carbon dioxide", 95.0), ("Nitrogen", 2.8), ("Argon", 2.0)],
        magnetism: "Local anomalies",
        energy: "Fission / solar",
        indices: [70.0, 15.0, 12.0, 40.0, 20.0],
        status: "Olympus base is oxygen self-sufficient. Subsurface reservoir found in Valles Marineris.",
    },
    FallbackRow {
        name: "Jupiter",
        mass: "317.8 Earths",
        period: "11.86 years",
        atmosphere: [("Hydrogen", 90.0), ("Helium", 10.0), ("Methane", 0.3)],
        magnetism: "4.17 Gauss",
        energy: "He-3 fusion harvesting",
        indices: [30.0, 0.0, 0.0, 20.0, 0.0],
        status: "Orbital He-3 collectors at full output. Europa outpost reports complex organics.",
    },
    FallbackRow {
        name: "Saturn",
        mass: "95.2 Earths",
        period: "29.46 years",
        atmosphere: [("Hydrogen", 96.0), ("Helium", 3.0), ("Methane", 0.4)],
        magnetism: "0.21 Gauss",
        energy: "Hydrogen isotope extraction",
        indices: [25.0, 0.0, 0.0, 25.0, 0.0],
        status: "Ring mining rights assigned. Rotorcraft trials under way in the Titan atmosphere.",
    },
    FallbackRow {
        name: "Uranus",
        mass: "14.5 Earths",
        period: "84 years",
        atmosphere: [("Hydrogen", 83.0), ("Helium", 15.0), ("Methane", 2.0)],
        magnetism: "0.23 Gauss",
        energy: "Wind / chemical",
        indices: [40.0, 0.0, 0.0, 15.0, 0.0],
        status: "Deep-space probe in orbit. Study of the tilted magnetosphere continues.",
    },
    FallbackRow {
        name: "Neptune",
        mass: "17.1 Earths",
        period: "164.8 years",
        atmosphere: [("Hydrogen", 80.0), ("Helium", 19.0), ("Methane", 1.5)],
        magnetism: "0.14 Gauss",
        energy: "Nuclear (RTG)",
        indices: [45.0, 0.0, 0.0, 10.0, 0.0],
        status: "Edge-of-system outpost. Kuiper belt monitoring network hub.",
    },
];

/// Reports keyed by body display name.
#[derive(Debug, Default)]
pub struct NarrativeCache {
    reports: HashMap<String, PlanetReport>,
}

impl NarrativeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and store a report. A malformed payload leaves the cache untouched.
    pub fn insert_json(&mut self, name: &str, json: &str) -> Result<(), serde_json::Error> {
        let report = PlanetReport::from_json(json)?;
        self.reports.insert(name.to_string(), report);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PlanetReport> {
        self.reports.get(name)
    }

    /// Cached report, else the built-in record, else [`PlanetReport::unknown`].
    pub fn report_for(&self, name: &str) -> PlanetReport {
        self.get(name)
            .cloned()
            .or_else(|| PlanetReport::fallback(name))
            .unwrap_or_else(PlanetReport::unknown)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
