use crate::{
    config::GeneratorConfig,
    grid::RegionGrid,
    point::{Edge, Point},
    pool::{EmptyPool, StationPool},
    sampler::SeededSampler,
};

/// Terminal state of one walk.
///
/// Stalling is not an error: the edges emitted before the stall stay
/// committed and the route is simply shorter than requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkOutcome {
    Completed,
    Stalled,
}

/// Edges committed by one walk, plus how the walk ended.
#[derive(Debug, Clone)]
pub struct WalkedRoute {
    pub edges: Vec<Edge>,
    pub outcome: WalkOutcome,
}

/// Transient per-walk state. Owned by exactly one walk and dropped when the
/// walk terminates.
struct WalkState {
    anchor: Point,
    offset_x: i32,
    offset_y: i32,
    first_step: bool,
    remaining: u32,
}

/// Grows a single route edge by edge: a directional random walk over the
/// density grid whose search radius shrinks after the first step.
pub struct RouteWalker<'a> {
    pool: &'a StationPool,
    config: &'a GeneratorConfig,
}

impl<'a> RouteWalker<'a> {
    pub fn new(pool: &'a StationPool, config: &'a GeneratorConfig) -> Self {
        Self { pool, config }
    }

    /// Run one walk to completion or stall.
    ///
    /// Marking stations mutates the shared grid and is visible to later
    /// walks; the grid handle is borrowed mutably for the duration of the
    /// walk, which makes the single-writer discipline structural.
    pub fn walk_route(
        &self,
        grid: &mut RegionGrid,
        sampler: &mut SeededSampler,
    ) -> Result<WalkedRoute, EmptyPool> {
        let required = self.sample_required_trips(sampler);
        let start = self
            .pool
            .sample_weighted(sampler, self.config.start_stop_choice_power)?;
        let mut state = WalkState {
            anchor: start,
            offset_x: 0,
            offset_y: 0,
            first_step: true,
            remaining: required,
        };
        let mut edges = Vec::with_capacity(required as usize);

        while state.remaining > 0 {
            let radius = self.step_radius(&state);
            let mut candidates = grid.points_within(
                state.anchor.x + state.offset_x,
                state.anchor.y + state.offset_y,
                radius.ceil(),
                state.anchor.value,
                state.anchor.value * self.config.max_size_difference_factor,
            );
            // An edge joins two distinct grid points.
            candidates.retain(|c| (c.x, c.y) != (state.anchor.x, state.anchor.y));

            let anchor_value = state.anchor.value;
            candidates.sort_by(|a, b| {
                closeness(anchor_value, b).total_cmp(&closeness(anchor_value, a))
            });

            let Some(index) = sampler.weighted_index(
                candidates.len(),
                self.config.target_stop_in_radius_choice_power,
            ) else {
                tracing::debug!(
                    target: "transit::walker",
                    committed = edges.len(),
                    abandoned = state.remaining,
                    "walker.step.stalled"
                );
                return Ok(WalkedRoute {
                    edges,
                    outcome: WalkOutcome::Stalled,
                });
            };
            let target = candidates[index];

            grid.mark_station(state.anchor.x, state.anchor.y);
            grid.mark_station(target.x, target.y);
            edges.push(Edge {
                from: state.anchor,
                to: target,
            });

            // Carry half the step as a directional offset; combined with the
            // post-first-step radius halving this straightens the route.
            state.offset_x = half_step(target.x - state.anchor.x);
            state.offset_y = half_step(target.y - state.anchor.y);
            state.anchor = target;
            state.first_step = false;
            state.remaining -= 1;
        }

        Ok(WalkedRoute {
            edges,
            outcome: WalkOutcome::Completed,
        })
    }

    /// Edge count for one route: average plus a symmetric uniform spread of
    /// `edges_per_route_variation`, rounded up, never below zero.
    fn sample_required_trips(&self, sampler: &mut SeededSampler) -> u32 {
        let u = sampler.next_uniform();
        let trips = ((u - 0.5) * 2.0 * self.config.edges_per_route_variation
            + self.config.edges_per_route_average)
            .ceil();
        if trips > 0.0 {
            trips as u32
        } else {
            0
        }
    }

    /// Search radius for the next candidate, proportional to the anchor's
    /// share of the maximum density and the region diameter. Halved after
    /// the first step.
    fn step_radius(&self, state: &WalkState) -> f64 {
        state.anchor.value / self.pool.max_value()
            * self.pool.max_distance()
            * self.config.max_edge_distance_factor
            * if state.first_step { 1.0 } else { 0.5 }
    }
}

/// Rank candidates by how closely their size matches the anchor, not by
/// absolute size: `anchor.value - |candidate.value - anchor.value|`,
/// sorted descending.
fn closeness(anchor_value: f64, candidate: &Point) -> f64 {
    anchor_value - (candidate.value - anchor_value).abs()
}

/// Half of `delta`, rounded toward positive infinity (also for negatives),
/// matching the offset carry of the reference generator.
fn half_step(delta: i32) -> i32 {
    (f64::from(delta) / 2.0).ceil() as i32
}
