use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

pub const BUILTIN_GENERATOR_PRESETS: &str = include_str!("data/generator_presets.json");

/// Tunable parameters for one generation run.
///
/// Defaults are the long-standing reference values; none of the fields is
/// bounds-checked beyond being non-negative where that is semantically
/// required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed for the deterministic sampler stream.
    pub seed: u64,
    /// Minimum log-scaled density for a point to enter the station pool.
    pub min_station_size: f64,
    /// Number of independent route walks.
    pub route_count: u32,
    pub edges_per_route_average: f64,
    pub edges_per_route_variation: f64,
    /// Higher values bias the start-station draw toward larger stations.
    pub start_stop_choice_power: f64,
    /// Higher values bias the in-radius target draw toward the best-matched
    /// candidates.
    pub target_stop_in_radius_choice_power: f64,
    /// Maximum edge length as a fraction of the region diameter.
    pub max_edge_distance_factor: f64,
    /// Maximum relative size difference between the two ends of an edge.
    pub max_size_difference_factor: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            min_station_size: 0.01,
            route_count: 100,
            edges_per_route_average: 10.0,
            edges_per_route_variation: 2.0,
            start_stop_choice_power: 4.0,
            target_stop_in_radius_choice_power: 3.0,
            max_edge_distance_factor: 0.5,
            max_size_difference_factor: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorPreset {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub params: GeneratorConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorPresetsFile {
    pub presets: Vec<GeneratorPreset>,
}

#[derive(Debug, Clone)]
pub struct GeneratorPresets {
    by_id: HashMap<String, GeneratorPreset>,
}

impl GeneratorPresets {
    pub fn builtin() -> Arc<Self> {
        let parsed: GeneratorPresetsFile = serde_json::from_str(BUILTIN_GENERATOR_PRESETS)
            .expect("builtin generator presets should parse");
        let mut by_id = HashMap::new();
        for preset in parsed.presets.into_iter() {
            by_id.insert(preset.id.clone(), preset);
        }
        Arc::new(Self { by_id })
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let parsed: GeneratorPresetsFile = serde_json::from_str(json)?;
        let mut by_id = HashMap::new();
        for preset in parsed.presets.into_iter() {
            by_id.insert(preset.id.clone(), preset);
        }
        Ok(Self { by_id })
    }

    pub fn from_file(path: &Path) -> Result<Self, PresetsError> {
        let contents = fs::read_to_string(path).map_err(|source| PresetsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let presets = GeneratorPresets::from_json_str(&contents)?;
        Ok(presets)
    }

    pub fn get(&self, id: &str) -> Option<&GeneratorPreset> {
        self.by_id.get(id)
    }

    pub fn first(&self) -> Option<&GeneratorPreset> {
        self.by_id.values().next()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum PresetsError {
    #[error("failed to parse generator presets: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read generator presets from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Load the preset catalogue from `TRANSIT_PRESETS_PATH` when set, falling
/// back to the builtin catalogue embedded in the binary.
pub fn load_presets_from_env() -> Arc<GeneratorPresets> {
    if let Some(path) = env::var("TRANSIT_PRESETS_PATH").ok().map(PathBuf::from) {
        match GeneratorPresets::from_file(&path) {
            Ok(presets) => {
                tracing::info!(
                    target: "transit::config",
                    path = %path.display(),
                    "presets.loaded=file"
                );
                return Arc::new(presets);
            }
            Err(err) => {
                tracing::warn!(
                    target: "transit::config",
                    path = %path.display(),
                    error = %err,
                    "presets.load_failed"
                );
            }
        }
    }
    tracing::info!(target: "transit::config", "presets.loaded=builtin");
    GeneratorPresets::builtin()
}
