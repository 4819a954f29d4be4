//! Near Earth Object records and sample statistics.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page size used when sampling objects for statistics.
pub const STATS_SAMPLE_SIZE: u32 = 100;

/// Body of `/neo/rest/v1/neo/browse`, reduced to what statistics need.
#[derive(Debug, Clone, Deserialize)]
pub struct NeoBrowsePage {
    #[serde(default)]
    pub near_earth_objects: Option<Vec<NearEarthObject>>,
    #[serde(default)]
    pub page: Option<PageInfo>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default)]
    pub number: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearEarthObject {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_potentially_hazardous_asteroid: bool,
    pub estimated_diameter: EstimatedDiameter,
    #[serde(default)]
    pub close_approach_data: Vec<CloseApproach>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct EstimatedDiameter {
    pub kilometers: DiameterRange,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DiameterRange {
    pub estimated_diameter_min: f64,
    pub estimated_diameter_max: f64,
}

impl DiameterRange {
    pub fn midpoint(&self) -> f64 {
        (self.estimated_diameter_min + self.estimated_diameter_max) / 2.0
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloseApproach {
    #[serde(default)]
    pub miss_distance: Option<MissDistance>,
}

/// The upstream sends distances as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct MissDistance {
    #[serde(default)]
    pub kilometers: Option<Value>,
}

impl MissDistance {
    pub fn kilometers(&self) -> Option<f64> {
        match self.kilometers.as_ref()? {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl NearEarthObject {
    /// Miss distance of the first recorded close approach, if it has one.
    pub fn first_miss_distance_km(&self) -> Option<f64> {
        self.close_approach_data
            .first()?
            .miss_distance
            .as_ref()?
            .kilometers()
    }
}

/// Aggregate statistics over a sample of objects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeoStatistics {
    pub total_count: u64,
    pub sample_size: usize,
    pub potentially_hazardous_count: usize,
    pub average_diameter_km: f64,
    pub largest_diameter_km: f64,
    pub smallest_diameter_km: f64,
    pub average_miss_distance_km: f64,
}

/// Compute statistics over `neos`.
///
/// Diameters use each object's kilometre estimate: the average is over
/// midpoints, the largest over maxima, the smallest over minima, all rounded
/// to three decimals. The miss-distance average covers only objects whose
/// first close approach carries a distance and is rounded to whole
/// kilometres. An empty sample yields zeros.
pub fn summarize(total_count: u64, neos: &[NearEarthObject]) -> NeoStatistics {
    let hazardous = neos
        .iter()
        .filter(|neo| neo.is_potentially_hazardous_asteroid)
        .count();

    let (average, largest, smallest) = if neos.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let ranges = neos.iter().map(|neo| neo.estimated_diameter.kilometers);
        let total: f64 = ranges.clone().map(|r| r.midpoint()).sum();
        let largest = ranges
            .clone()
            .map(|r| r.estimated_diameter_max)
            .fold(f64::NEG_INFINITY, f64::max);
        let smallest = ranges
            .map(|r| r.estimated_diameter_min)
            .fold(f64::INFINITY, f64::min);
        (total / neos.len() as f64, largest, smallest)
    };

    let distances: Vec<f64> = neos
        .iter()
        .filter_map(NearEarthObject::first_miss_distance_km)
        .collect();
    let average_distance = if distances.is_empty() {
        0.0
    } else {
        distances.iter().sum::<f64>() / distances.len() as f64
    };

    NeoStatistics {
        total_count,
        sample_size: neos.len(),
        potentially_hazardous_count: hazardous,
        average_diameter_km: round_to(average, 3),
        largest_diameter_km: round_to(largest, 3),
        smallest_diameter_km: round_to(smallest, 3),
        average_miss_distance_km: average_distance.round(),
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
