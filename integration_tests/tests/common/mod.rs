use transit_core::{GeneratorConfig, Point, RegionGrid, StationPool};

/// Build a grid and pool from `(x, y, value)` triples; values are already
/// log-scaled.
pub fn prepare(
    points: &[(i32, i32, f64)],
    config: &GeneratorConfig,
) -> (RegionGrid, StationPool) {
    let points: Vec<Point> = points.iter().map(|&(x, y, v)| Point::new(x, y, v)).collect();
    let grid = RegionGrid::from_points(points.iter().copied());
    let pool = StationPool::filter_and_sort(points, config.min_station_size);
    (grid, pool)
}

/// A deterministic mid-sized region with smoothly varying density.
pub fn synthetic_region(side: i32) -> Vec<(i32, i32, f64)> {
    (0..side)
        .flat_map(|x| {
            (0..side).map(move |y| {
                let value = 1.0 + f64::from((x * 29 + y * 11) % 53) / 12.0;
                (x, y, value)
            })
        })
        .collect()
}
