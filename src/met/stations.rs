// src/met/stations.rs

/// Met stations in the order they appear in the bulletin table.
pub const MET_STATIONS: [&str; 24] = [
    "Anuradhapura", "Badulla", "Bandarawela", "Batticaloa", "Colombo",
    "Galle", "Hambantota", "Jaffna", "Moneragala", "Katugasthota",
    "Katunayake", "Kurunagala", "Maha Illuppallama", "Mannar",
    "Polonnaruwa", "Nuwara Eliya", "Pothuvil", "Puttalam",
    "Rathmalana", "Ratnapura", "Trincomalee", "Vavuniya", "Mattala",
    "Mullaitivu",
];

/// Alternative spellings seen in bulletins, mapped to the canonical name.
pub const STATION_ALIASES: &[(&str, &str)] = &[
    ("Mattla", "Mattala"),
    ("Kurunegala", "Kurunagala"),
    ("MahaIlluppallama", "Maha Illuppallama"),
    ("Nuwara-Eliya", "Nuwara Eliya"),
];

/// Hydro catchment stations listed below the main table.
pub const HYDRO_STATIONS: [&str; 16] = [
    "Castlereigh", "Norton", "Maussakele", "Canyon", "Lakshapana",
    "Upper Kotmale", "Victoriya", "Kotmale", "Randenigala", "Rantambe",
    "Bowatenna", "Ukuwela", "Samanala Wawa", "Kukuleganaga", "Maskeliya", "Neboda",
];

/// Regional grouping of met stations used for zone averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    NorthernPlains,
    EasternPlains,
    EasternHills,
    WesternPlains,
    WesternHills,
    SouthernPlains,
}

impl Zone {
    pub const ALL: [Zone; 6] = [
        Zone::NorthernPlains,
        Zone::EasternPlains,
        Zone::EasternHills,
        Zone::WesternPlains,
        Zone::WesternHills,
        Zone::SouthernPlains,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Zone::NorthernPlains => "Northern Plains",
            Zone::EasternPlains => "Eastern Plains",
            Zone::EasternHills => "Eastern Hills",
            Zone::WesternPlains => "Western Plains",
            Zone::WesternHills => "Western Hills",
            Zone::SouthernPlains => "Southern Plains",
        }
    }

    pub fn stations(&self) -> &'static [&'static str] {
        match self {
            Zone::NorthernPlains => &[
                "Vavuniya", "Anuradhapura", "Mullaitivu", "Puttalam", "Jaffna",
                "Maha Illuppallama", "Mannar",
            ],
            Zone::EasternPlains => &["Batticaloa", "Pothuvil", "Polonnaruwa", "Moneragala", "Trincomalee"],
            Zone::EasternHills => &["Badulla", "Bandarawela"],
            Zone::WesternPlains => &["Colombo", "Galle", "Katunayake", "Kurunagala", "Rathmalana"],
            Zone::WesternHills => &["Katugasthota", "Nuwara Eliya", "Ratnapura"],
            Zone::SouthernPlains => &["Hambantota", "Mattala"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_station_belongs_to_exactly_one_zone() {
        let mut seen = HashSet::new();
        for zone in Zone::ALL {
            for station in zone.stations() {
                assert!(MET_STATIONS.contains(station), "{} is not a met station", station);
                assert!(seen.insert(*station), "{} appears in two zones", station);
            }
        }
        assert_eq!(seen.len(), MET_STATIONS.len());
    }

    #[test]
    fn aliases_resolve_to_known_stations() {
        assert!(STATION_ALIASES.contains(&("Mattla", "Mattala")));
        for (alias, canonical) in STATION_ALIASES {
            assert!(MET_STATIONS.contains(canonical), "{} maps to unknown {}", alias, canonical);
            assert!(!MET_STATIONS.contains(alias));
        }
    }
}
