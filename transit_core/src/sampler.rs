use std::f64::consts::FRAC_PI_2;

/// Reproducible pseudo-random source plus the weighted-selection primitive
/// used everywhere a station is chosen.
///
/// The stream is a pure function of an explicit counter, so a sampler can be
/// passed into each walk and two runs from the same seed consume identical
/// sequences. There is no process-wide state.
#[derive(Debug, Clone)]
pub struct SeededSampler {
    counter: u64,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        Self { counter: seed }
    }

    /// Next uniform draw in `[0, 1)`: the fractional part of
    /// `sin(counter) * 10000`, advancing the counter by one.
    ///
    /// Fixed-seed fixtures depend on this exact sequence; do not change it.
    pub fn next_uniform(&mut self) -> f64 {
        let x = (self.counter as f64).sin() * 10_000.0;
        self.counter += 1;
        x - x.floor()
    }

    /// Biased index selection over `n` candidates already sorted descending
    /// by desirability. Returns `None` when `n == 0`.
    ///
    /// Draws one uniform `u`, shapes it as `sin(u * pi/2)^power` and folds
    /// the result back into `[0, 1]` before scaling to an index. Higher
    /// `power` sharpens the bias toward index 0. The fold makes the
    /// distribution unimodal near zero rather than monotonic; that shape is
    /// part of the output contract and must not be replaced with a simpler
    /// decay.
    pub fn weighted_index(&mut self, n: usize, power: f64) -> Option<usize> {
        if n == 0 {
            return None;
        }
        let u = self.next_uniform();
        let beta = (u * FRAC_PI_2).sin().powf(power);
        let folded = if beta <= 0.5 {
            2.0 * beta
        } else {
            2.0 * (1.0 - beta)
        };
        Some(((folded * n as f64) as usize).min(n - 1))
    }
}
