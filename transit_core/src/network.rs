use thiserror::Error;

use crate::{
    config::GeneratorConfig,
    grid::RegionGrid,
    point::Edge,
    pool::{EmptyPool, StationPool},
    sampler::SeededSampler,
    walker::{RouteWalker, WalkOutcome, WalkedRoute},
};

/// Fatal generation failures. A stalled walk is not one of these; it is the
/// [`WalkOutcome::Stalled`] variant and the partial route stays committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No point passed the minimum-density filter. Aborts the whole run;
    /// no partial network is emitted.
    #[error("no eligible stations: the pool is empty after filtering")]
    EmptyInput,
    /// A stage was invoked before a concrete strategy was supplied.
    #[error("{stage} invoked with no strategy supplied")]
    Unimplemented { stage: &'static str },
}

impl From<EmptyPool> for GenerationError {
    fn from(_: EmptyPool) -> Self {
        GenerationError::EmptyInput
    }
}

/// One committed route: an insertion-order id plus the ids of its edges in
/// the builder's flat edge list. Append-only during construction, immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub route_id: u32,
    pub edge_ids: Vec<usize>,
}

/// The collected output of a generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitNetwork {
    pub edges: Vec<Edge>,
    pub routes: Vec<Route>,
}

/// A pluggable route-synthesis capability.
///
/// The density-walk synthesis of [`DensityWalkSynthesis`] is the provided
/// variant; the trait exists so alternatives can be swapped in without
/// touching the builder.
pub trait RouteSynthesisStrategy {
    /// Produce every route for one run. Implementations must consume the
    /// sampler in a fixed, documented order: the sequence of draws is part
    /// of the reproducibility contract.
    fn synthesize(
        &self,
        grid: &mut RegionGrid,
        sampler: &mut SeededSampler,
    ) -> Result<Vec<WalkedRoute>, GenerationError>;
}

/// Post-processing contract for a future refinement stage. No variant is
/// provided; installing one is the caller's choice.
///
/// Contract:
/// - `merge_similar_routes`: given the edge list, produce an equivalent edge
///   list with no two edges whose endpoints are within a small tolerance of
///   each other, preserving total station coverage.
/// - `repair_connectivity`: form connected clusters over the possibly
///   disconnected edges, then repeatedly connect the two most significant
///   stations (by value) of the two closest clusters until one cluster
///   remains, without altering previously committed edges.
pub trait NetworkRefinement {
    fn merge_similar_routes(
        &self,
        edges: &mut Vec<Edge>,
        routes: &mut Vec<Route>,
    ) -> Result<(), GenerationError>;

    fn repair_connectivity(
        &self,
        edges: &mut Vec<Edge>,
        routes: &mut Vec<Route>,
    ) -> Result<(), GenerationError>;
}

/// The stochastic walk synthesis: `route_count` independent walks, run
/// strictly in index order so a fixed seed reproduces the same network.
pub struct DensityWalkSynthesis<'a> {
    pool: &'a StationPool,
    config: &'a GeneratorConfig,
}

impl<'a> DensityWalkSynthesis<'a> {
    pub fn new(pool: &'a StationPool, config: &'a GeneratorConfig) -> Self {
        Self { pool, config }
    }
}

impl RouteSynthesisStrategy for DensityWalkSynthesis<'_> {
    fn synthesize(
        &self,
        grid: &mut RegionGrid,
        sampler: &mut SeededSampler,
    ) -> Result<Vec<WalkedRoute>, GenerationError> {
        if self.pool.is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        let walker = RouteWalker::new(self.pool, self.config);
        let mut walked = Vec::with_capacity(self.config.route_count as usize);
        for index in 0..self.config.route_count {
            let route = walker.walk_route(grid, sampler)?;
            tracing::debug!(
                target: "transit::network",
                route = index,
                edges = route.edges.len(),
                stalled = (route.outcome == WalkOutcome::Stalled),
                "network.walk.finished"
            );
            walked.push(route);
        }
        Ok(walked)
    }
}

/// Collects the edges and routes of sequential walks into a flat network;
/// ids equal insertion order.
#[derive(Default)]
pub struct NetworkBuilder {
    edges: Vec<Edge>,
    routes: Vec<Route>,
    refinement: Option<Box<dyn NetworkRefinement>>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self {
            edges: Vec::new(),
            routes: Vec::new(),
            refinement: None,
        }
    }

    /// Run a synthesis strategy and commit everything it produced.
    pub fn run(
        &mut self,
        strategy: &dyn RouteSynthesisStrategy,
        grid: &mut RegionGrid,
        sampler: &mut SeededSampler,
    ) -> Result<(), GenerationError> {
        let walked = strategy.synthesize(grid, sampler)?;
        let stalled = walked
            .iter()
            .filter(|route| route.outcome == WalkOutcome::Stalled)
            .count();
        for route in walked {
            self.commit_route(route);
        }
        tracing::info!(
            target: "transit::network",
            routes = self.routes.len(),
            edges = self.edges.len(),
            stalled,
            "network.generate.done"
        );
        Ok(())
    }

    fn commit_route(&mut self, walked: WalkedRoute) {
        let route_id = self.routes.len() as u32;
        let mut edge_ids = Vec::with_capacity(walked.edges.len());
        for edge in walked.edges {
            edge_ids.push(self.edges.len());
            self.edges.push(edge);
        }
        self.routes.push(Route { route_id, edge_ids });
    }

    /// Install a refinement strategy for [`NetworkBuilder::refine`].
    pub fn set_refinement(&mut self, refinement: Box<dyn NetworkRefinement>) {
        self.refinement = Some(refinement);
    }

    /// Apply the installed post-processing stage.
    ///
    /// Fails fast with [`GenerationError::Unimplemented`] when no strategy
    /// has been installed; this is a deliberate not-yet-built signal, not a
    /// recoverable runtime condition.
    pub fn refine(&mut self) -> Result<(), GenerationError> {
        let Some(refinement) = self.refinement.as_ref() else {
            return Err(GenerationError::Unimplemented {
                stage: "network refinement",
            });
        };
        refinement.merge_similar_routes(&mut self.edges, &mut self.routes)?;
        refinement.repair_connectivity(&mut self.edges, &mut self.routes)?;
        Ok(())
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn into_network(self) -> TransitNetwork {
        TransitNetwork {
            edges: self.edges,
            routes: self.routes,
        }
    }
}

/// Generate a complete network from a prepared grid and pool.
///
/// Builds the sampler from `config.seed`, runs the density-walk synthesis
/// and returns the collected network. Two calls with identical inputs
/// produce identical output.
pub fn generate_network(
    grid: &mut RegionGrid,
    pool: &StationPool,
    config: &GeneratorConfig,
) -> Result<TransitNetwork, GenerationError> {
    tracing::info!(
        target: "transit::network",
        routes = config.route_count,
        pool = pool.len(),
        seed = config.seed,
        "network.generate.start"
    );
    let mut sampler = SeededSampler::new(config.seed);
    let strategy = DensityWalkSynthesis::new(pool, config);
    let mut builder = NetworkBuilder::new();
    builder.run(&strategy, grid, &mut sampler)?;
    Ok(builder.into_network())
}
