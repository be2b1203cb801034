use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
    str::FromStr,
};

use thiserror::Error;

use crate::point::{scale_density, Point};

/// Zero-based column layout of the region-cells table: `x`, `y`, two
/// columns the generator ignores, then the raw density.
const COL_X: usize = 0;
const COL_Y: usize = 1;
const COL_DENSITY: usize = 4;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read region cells from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse region cells: {0}")]
    Csv(#[from] csv::Error),
    #[error("region cells line {line} is malformed: {message}")]
    Record { line: u64, message: String },
}

/// Load the density grid from a region-cells CSV file.
///
/// Returns log-scaled points in file order. The order matters: it becomes
/// the grid's insertion order and is therefore part of the reproducibility
/// contract. Generation must not start until this has returned.
pub fn load_region_cells(path: &Path) -> Result<Vec<Point>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let points = read_region_cells(file)?;
    tracing::info!(
        target: "transit::ingest",
        path = %path.display(),
        samples = points.len(),
        "ingest.loaded"
    );
    Ok(points)
}

/// Parse region cells from any reader. The first line is a header and is
/// skipped; every following record needs integer coordinates and a float
/// density in the expected columns.
pub fn read_region_cells<R: Read>(reader: R) -> Result<Vec<Point>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let mut points = Vec::new();
    for record in reader.records() {
        let record = record?;
        let x: i32 = parse_field(&record, COL_X, "x")?;
        let y: i32 = parse_field(&record, COL_Y, "y")?;
        let raw: f64 = parse_field(&record, COL_DENSITY, "density")?;
        points.push(Point::new(x, y, scale_density(raw)));
    }
    Ok(points)
}

fn parse_field<T>(record: &csv::StringRecord, index: usize, name: &str) -> Result<T, IngestError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let field = record.get(index).ok_or_else(|| IngestError::Record {
        line,
        message: format!("missing column {index} ({name})"),
    })?;
    field.trim().parse().map_err(|err| IngestError::Record {
        line,
        message: format!("column {index} ({name}): {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
x,y,lat,lon,density
0,0,52.1,4.3,5.0
1,0,52.1,4.4,0.0
2,3,52.2,4.4,-1.5
";

    #[test]
    fn header_is_skipped_and_values_are_log_scaled() {
        let points = read_region_cells(SAMPLE.as_bytes()).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!((points[0].x, points[0].y), (0, 0));
        assert!((points[0].value - 6.0f64.ln()).abs() < 1e-12);
        assert_eq!(points[1].value, 0.0);
        assert_eq!(points[2].value, -1.5);
    }

    #[test]
    fn file_order_is_preserved() {
        let points = read_region_cells(SAMPLE.as_bytes()).unwrap();
        let coords: Vec<(i32, i32)> = points.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 3)]);
    }

    #[test]
    fn malformed_coordinate_reports_its_line() {
        let bad = "x,y,lat,lon,density\n0,0,0,0,1.0\noops,0,0,0,1.0\n";
        let err = read_region_cells(bad.as_bytes()).unwrap_err();
        match err {
            IngestError::Record { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("x"), "unexpected message: {message}");
            }
            other => panic!("expected Record error, got {other}"),
        }
    }

    #[test]
    fn short_record_reports_missing_column() {
        let bad = "x,y,lat,lon,density\n0,0,0\n";
        let err = read_region_cells(bad.as_bytes()).unwrap_err();
        match err {
            IngestError::Record { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("density"), "unexpected message: {message}");
            }
            other => panic!("expected Record error, got {other}"),
        }
    }
}
