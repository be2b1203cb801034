use thiserror::Error;

use crate::{point::Point, sampler::SeededSampler};

/// Sampling was requested from a pool with no eligible stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("station pool is empty")]
pub struct EmptyPool;

/// The eligible stations derived from the grid: points passing the
/// minimum-density filter, sorted descending by value.
///
/// The sort happens exactly once, before any sampling; weighted-selection
/// indices are interpreted against that fixed order, so the pool is never
/// re-sorted mid-generation. The extent statistics (`max_value`,
/// `max_distance`) are computed over the eligible points only and feed the
/// walker's radius formula.
#[derive(Debug, Clone)]
pub struct StationPool {
    points: Vec<Point>,
    min_station_size: f64,
    max_value: f64,
    max_x: i32,
    max_y: i32,
}

impl StationPool {
    pub fn filter_and_sort(
        points: impl IntoIterator<Item = Point>,
        min_station_size: f64,
    ) -> Self {
        let mut eligible = Vec::new();
        let mut max_value = 0.0f64;
        let mut max_x = 0;
        let mut max_y = 0;
        for point in points {
            if point.value < min_station_size {
                continue;
            }
            max_value = max_value.max(point.value);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
            eligible.push(point);
        }
        eligible.sort_by(|a, b| b.value.total_cmp(&a.value));
        Self {
            points: eligible,
            min_station_size,
            max_value,
            max_x,
            max_y,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    /// Largest coordinate extent over the eligible points, the proxy for the
    /// region diameter in the walker's radius formula.
    pub fn max_distance(&self) -> f64 {
        f64::from(self.max_x.max(self.max_y))
    }

    /// Weighted draw biased toward the largest stations.
    ///
    /// Retries until the drawn point passes the minimum-density re-check.
    /// The pool is already filtered, so the first draw normally passes.
    pub fn sample_weighted(
        &self,
        sampler: &mut SeededSampler,
        power: f64,
    ) -> Result<Point, EmptyPool> {
        if self.points.is_empty() {
            return Err(EmptyPool);
        }
        loop {
            let index = sampler
                .weighted_index(self.points.len(), power)
                .ok_or(EmptyPool)?;
            let point = self.points[index];
            if point.value >= self.min_station_size {
                return Ok(point);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[(i32, i32, f64)]) -> Vec<Point> {
        values.iter().map(|&(x, y, v)| Point::new(x, y, v)).collect()
    }

    #[test]
    fn pool_is_sorted_descending_by_value() {
        let pool = StationPool::filter_and_sort(points(&[(0, 0, 1.0), (1, 0, 3.0), (2, 0, 2.0)]), 0.5);
        let values: Vec<f64> = pool.points().iter().map(|p| p.value).collect();
        assert_eq!(values, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn filter_is_monotonic_in_min_station_size() {
        let samples = points(&[(0, 0, 0.2), (1, 0, 0.6), (2, 0, 1.4), (3, 0, 2.8)]);
        let mut previous = usize::MAX;
        for min in [0.0, 0.5, 1.0, 2.0, 5.0] {
            let pool = StationPool::filter_and_sort(samples.clone(), min);
            assert!(pool.len() <= previous, "pool grew when min rose to {min}");
            previous = pool.len();
        }
    }

    #[test]
    fn extent_statistics_cover_eligible_points_only() {
        let pool = StationPool::filter_and_sort(
            points(&[(2, 9, 4.0), (40, 1, 0.01), (3, 3, 6.0)]),
            1.0,
        );
        assert_eq!(pool.max_value(), 6.0);
        assert_eq!(pool.max_distance(), 9.0);
    }

    #[test]
    fn sampling_an_empty_pool_fails() {
        let pool = StationPool::filter_and_sort(points(&[(0, 0, 0.001)]), 1.0);
        let mut sampler = SeededSampler::new(1);
        assert_eq!(pool.sample_weighted(&mut sampler, 4.0), Err(EmptyPool));
    }

    #[test]
    fn sampling_returns_an_eligible_point() {
        let pool = StationPool::filter_and_sort(points(&[(0, 0, 2.0), (1, 0, 5.0)]), 1.0);
        let mut sampler = SeededSampler::new(1);
        for _ in 0..100 {
            let point = pool.sample_weighted(&mut sampler, 4.0).unwrap();
            assert!(point.value >= 1.0);
        }
    }
}
