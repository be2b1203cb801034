use transit_core::{
    capture_snapshot, generate_network, GeneratorConfig, Point, RegionGrid, StationPool,
};

fn synthetic_region(side: i32) -> Vec<Point> {
    (0..side)
        .flat_map(|x| {
            (0..side).map(move |y| {
                let value = 1.0 + f64::from((x * 13 + y * 7) % 41) / 10.0;
                Point::new(x, y, value)
            })
        })
        .collect()
}

fn generated() -> (transit_core::TransitNetwork, RegionGrid, GeneratorConfig) {
    let config = GeneratorConfig {
        route_count: 15,
        edges_per_route_average: 5.0,
        edges_per_route_variation: 2.0,
        min_station_size: 0.5,
        ..GeneratorConfig::default()
    };
    let points = synthetic_region(16);
    let mut grid = RegionGrid::from_points(points.iter().copied());
    let pool = StationPool::filter_and_sort(points, config.min_station_size);
    let network = generate_network(&mut grid, &pool, &config).expect("generation succeeds");
    (network, grid, config)
}

#[test]
fn every_route_is_endpoint_continuous() {
    let (network, _, _) = generated();
    for route in &network.routes {
        for pair in route.edge_ids.windows(2) {
            let a = network.edges[pair[0]];
            let b = network.edges[pair[1]];
            assert_eq!(a.to, b.from, "route {} breaks continuity", route.route_id);
        }
    }
}

#[test]
fn every_edge_respects_the_size_difference_bound() {
    let (network, _, config) = generated();
    for edge in &network.edges {
        let bound = edge.from.value * config.max_size_difference_factor;
        assert!(
            (edge.to.value - edge.from.value).abs() <= bound,
            "edge {:?} exceeds the size window",
            edge
        );
    }
}

#[test]
fn route_count_matches_the_configuration() {
    let (network, _, config) = generated();
    assert_eq!(network.routes.len(), config.route_count as usize);
}

#[test]
fn every_edge_endpoint_is_a_marked_station() {
    let (network, grid, _) = generated();
    let snapshot = capture_snapshot(&network, &grid);
    let stations: Vec<(i32, i32)> = snapshot.stations.iter().map(|s| (s.x, s.y)).collect();
    for edge in &snapshot.edges {
        assert!(stations.binary_search(&(edge.from_x, edge.from_y)).is_ok());
        assert!(stations.binary_search(&(edge.to_x, edge.to_y)).is_ok());
    }
}
