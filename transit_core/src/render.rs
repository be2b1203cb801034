use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb, RgbImage};
use thiserror::Error;

use crate::{grid::RegionGrid, network::TransitNetwork};

const BACKGROUND: Rgb<u8> = Rgb([24, 26, 34]);
const EDGE_COLOR: Rgb<u8> = Rgb([222, 165, 54]);
const STATION_COLOR: Rgb<u8> = Rgb([235, 235, 235]);
const MARGIN: i32 = 8;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("nothing to render: the grid holds no points")]
    EmptyGrid,
    #[error("failed to write network image to {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Draw the generated network to a PNG: one line per edge, one disc per
/// marked station scaled by its value. Purely an output surface; nothing
/// here feeds back into generation.
pub fn render_network(
    network: &TransitNetwork,
    grid: &RegionGrid,
    path: &Path,
) -> Result<(), RenderError> {
    let (min_x, min_y, max_x, max_y) = grid.extent().ok_or(RenderError::EmptyGrid)?;
    let width = (max_x - min_x + 1 + 2 * MARGIN) as u32;
    let height = (max_y - min_y + 1 + 2 * MARGIN) as u32;
    let mut img: RgbImage = ImageBuffer::from_pixel(width, height, BACKGROUND);

    let tx = |x: i32| x - min_x + MARGIN;
    let ty = |y: i32| y - min_y + MARGIN;

    for edge in &network.edges {
        draw_line(
            &mut img,
            tx(edge.from.x),
            ty(edge.from.y),
            tx(edge.to.x),
            ty(edge.to.y),
            EDGE_COLOR,
        );
    }

    for station in grid.stations() {
        let radius = (1.0 + station.value.max(0.0)).sqrt();
        draw_disc(&mut img, tx(station.x), ty(station.y), radius, STATION_COLOR);
    }

    img.save(path).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        target: "transit::render",
        path = %path.display(),
        width,
        height,
        "render.written"
    );
    Ok(())
}

fn draw_disc(img: &mut RgbImage, cx: i32, cy: i32, radius: f64, color: Rgb<u8>) {
    let r = radius.ceil() as i32;
    let r2 = radius * radius;
    let w = img.width() as i32;
    let h = img.height() as i32;
    for dy in -r..=r {
        for dx in -r..=r {
            if f64::from(dx * dx + dy * dy) <= r2 {
                let x = cx + dx;
                let y = cy + dy;
                if x >= 0 && x < w && y >= 0 && y < h {
                    img.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }
}

fn draw_line(img: &mut RgbImage, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb<u8>) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;
    let (mut x, mut y) = (x0, y0);
    let w = img.width() as i32;
    let h = img.height() as i32;
    loop {
        if x >= 0 && x < w && y >= 0 && y < h {
            img.put_pixel(x as u32, y as u32, color);
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}
