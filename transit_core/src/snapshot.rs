use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{grid::RegionGrid, network::TransitNetwork};

/// Counts for quick consumer-side sanity checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub station_count: usize,
    pub edge_count: usize,
    pub route_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationState {
    pub x: i32,
    pub y: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeState {
    pub edge_id: usize,
    pub from_x: i32,
    pub from_y: i32,
    pub to_x: i32,
    pub to_y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteState {
    pub route_id: u32,
    pub edge_ids: Vec<usize>,
}

/// The exported `{stations, edges, routes}` collection. The core has no
/// dependency on whoever consumes this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub header: SnapshotHeader,
    pub stations: Vec<StationState>,
    pub edges: Vec<EdgeState>,
    pub routes: Vec<RouteState>,
}

/// Capture the generated network plus the grid's station flags into plain
/// state structs. Stations are sorted by coordinate and edges/routes keep
/// their id order, so the snapshot of a fixed-seed run is byte-stable.
pub fn capture_snapshot(network: &TransitNetwork, grid: &RegionGrid) -> NetworkSnapshot {
    let stations: Vec<StationState> = grid
        .stations()
        .into_iter()
        .map(|point| StationState {
            x: point.x,
            y: point.y,
            value: point.value,
        })
        .collect();

    let edges: Vec<EdgeState> = network
        .edges
        .iter()
        .enumerate()
        .map(|(edge_id, edge)| EdgeState {
            edge_id,
            from_x: edge.from.x,
            from_y: edge.from.y,
            to_x: edge.to.x,
            to_y: edge.to.y,
        })
        .collect();

    let routes: Vec<RouteState> = network
        .routes
        .iter()
        .map(|route| RouteState {
            route_id: route.route_id,
            edge_ids: route.edge_ids.clone(),
        })
        .collect();

    NetworkSnapshot {
        header: SnapshotHeader {
            station_count: stations.len(),
            edge_count: edges.len(),
            route_count: routes.len(),
        },
        stations,
        edges,
        routes,
    }
}

pub fn encode_snapshot(snapshot: &NetworkSnapshot) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(snapshot)
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode network snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write network snapshot to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub fn write_snapshot(path: &Path, snapshot: &NetworkSnapshot) -> Result<(), SnapshotError> {
    let bytes = encode_snapshot(snapshot)?;
    fs::write(path, bytes).map_err(|source| SnapshotError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        target: "transit::network",
        path = %path.display(),
        stations = snapshot.header.station_count,
        edges = snapshot.header.edge_count,
        "snapshot.written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        network::Route,
        point::{Edge, Point},
    };

    #[test]
    fn capture_orders_stations_by_coordinate() {
        let mut grid = RegionGrid::new();
        grid.put(5, 5, 2.0);
        grid.put(0, 1, 3.0);
        grid.mark_station(5, 5);
        grid.mark_station(0, 1);

        let a = Point::new(0, 1, 3.0);
        let b = Point::new(5, 5, 2.0);
        let network = TransitNetwork {
            edges: vec![Edge { from: b, to: a }],
            routes: vec![Route {
                route_id: 0,
                edge_ids: vec![0],
            }],
        };

        let snapshot = capture_snapshot(&network, &grid);
        assert_eq!(snapshot.header.station_count, 2);
        assert_eq!(snapshot.header.edge_count, 1);
        assert_eq!(snapshot.header.route_count, 1);
        assert_eq!((snapshot.stations[0].x, snapshot.stations[0].y), (0, 1));
        assert_eq!((snapshot.stations[1].x, snapshot.stations[1].y), (5, 5));
        assert_eq!(snapshot.edges[0].from_x, 5);
        assert_eq!(snapshot.edges[0].to_x, 0);
    }

    #[test]
    fn encoding_round_trips() {
        let snapshot = NetworkSnapshot {
            header: SnapshotHeader {
                station_count: 0,
                edge_count: 0,
                route_count: 0,
            },
            stations: Vec::new(),
            edges: Vec::new(),
            routes: Vec::new(),
        };
        let bytes = encode_snapshot(&snapshot).unwrap();
        let decoded: NetworkSnapshot = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, snapshot);
    }
}
