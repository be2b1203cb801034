//! Stochastic transit-network synthesis from a population-density grid.
//!
//! Stations are drawn from the density surface with power-law weighted
//! sampling; each route grows edge by edge through a directional random
//! walk whose search radius shrinks after the first step. For a fixed seed
//! the whole pipeline (ingest order, pool sort, walk order, sampler stream)
//! is deterministic, so two runs over the same grid produce identical
//! networks.

pub mod config;
pub mod grid;
pub mod ingest;
pub mod network;
pub mod point;
pub mod pool;
pub mod render;
pub mod sampler;
pub mod snapshot;
pub mod walker;

pub use config::{
    load_presets_from_env, GeneratorConfig, GeneratorPreset, GeneratorPresets, PresetsError,
};
pub use grid::RegionGrid;
pub use ingest::{load_region_cells, read_region_cells, IngestError};
pub use network::{
    generate_network, DensityWalkSynthesis, GenerationError, NetworkBuilder, NetworkRefinement,
    Route, RouteSynthesisStrategy, TransitNetwork,
};
pub use point::{scale_density, Edge, Point};
pub use pool::{EmptyPool, StationPool};
pub use render::{render_network, RenderError};
pub use sampler::SeededSampler;
pub use snapshot::{
    capture_snapshot, encode_snapshot, write_snapshot, NetworkSnapshot, SnapshotError,
};
pub use walker::{RouteWalker, WalkOutcome, WalkedRoute};
