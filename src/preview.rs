//! Отладочная растеризация модели в PNG
//!
//! Настоящий рендер живёт снаружи и получает модель как данные; здесь только
//! быстрый предпросмотр для CLI.

use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::{draw_cross_mut, draw_filled_circle_mut, draw_line_segment_mut};
use std::path::Path;

use crate::dungeon::{Dungeon, DungeonCell};
use crate::geometry::Point;
use crate::region::RegionMap;

const ROAD: Rgba<u8> = Rgba([120, 80, 40, 255]);
const TOWN: Rgba<u8> = Rgba([200, 30, 30, 255]);
const CITY: Rgba<u8> = Rgba([120, 0, 0, 255]);
const LANDMARK: Rgba<u8> = Rgba([60, 0, 90, 255]);
const FEATURE: Rgba<u8> = Rgba([230, 170, 20, 255]);

impl DungeonCell {
    pub fn to_rgb(&self) -> [u8; 3] {
        match self {
            DungeonCell::Wall => [30, 30, 35],
            DungeonCell::Floor => [200, 195, 180],
            DungeonCell::Door => [140, 90, 40],
            DungeonCell::SecretDoor => [90, 60, 110],
            DungeonCell::StairsUp => [60, 170, 60],
            DungeonCell::StairsDown => [170, 50, 50],
            DungeonCell::Water => [50, 100, 190],
        }
    }
}

/// Заливает сетку цветными квадратами `cell_px × cell_px`.
fn fill_cells(
    width: usize,
    height: usize,
    cell_px: u32,
    color_at: impl Fn(usize, usize) -> [u8; 3],
) -> RgbaImage {
    let cell_px = cell_px.max(1);
    ImageBuffer::from_fn(width as u32 * cell_px, height as u32 * cell_px, |px, py| {
        let [r, g, b] = color_at((px / cell_px) as usize, (py / cell_px) as usize);
        Rgba([r, g, b, 255])
    })
}

fn scale(p: &Point, cell_px: u32) -> (f32, f32) {
    let s = cell_px.max(1) as f32;
    (p.x as f32 * s, p.y as f32 * s)
}

/// Биомы, дороги, поселения (крупные — больше) и ориентиры.
#[must_use]
pub fn render_region(map: &RegionMap, cell_px: u32) -> RgbaImage {
    let mut img = fill_cells(map.width(), map.height(), cell_px, |x, y| {
        map.biome_at(x, y).map_or([0, 0, 0], |b| b.to_rgb())
    });

    for road in &map.roads {
        for pair in road.waypoints.windows(2) {
            draw_line_segment_mut(
                &mut img,
                scale(&pair[0], cell_px),
                scale(&pair[1], cell_px),
                ROAD,
            );
        }
    }

    let unit = cell_px.max(1) as i32;
    for s in &map.settlements {
        let (x, y) = scale(&s.position, cell_px);
        let (radius, color) = if s.is_major {
            (unit.max(3), CITY)
        } else {
            ((unit / 2).max(2), TOWN)
        };
        draw_filled_circle_mut(&mut img, (x as i32, y as i32), radius, color);
    }

    for l in &map.landmarks {
        let (x, y) = scale(&l.position, cell_px);
        draw_cross_mut(&mut img, LANDMARK, x as i32, y as i32);
    }
    img
}

/// Клетки подземелья и маркеры объектов.
#[must_use]
pub fn render_dungeon(dungeon: &Dungeon, cell_px: u32) -> RgbaImage {
    let mut img = fill_cells(dungeon.grid.width, dungeon.grid.height, cell_px, |x, y| {
        dungeon.cell(x, y).unwrap_or(DungeonCell::Wall).to_rgb()
    });
    let unit = cell_px.max(1) as i32;
    for f in &dungeon.features {
        let center = (
            f.position.x as i32 * unit + unit / 2,
            f.position.y as i32 * unit + unit / 2,
        );
        draw_filled_circle_mut(&mut img, center, (unit / 3).max(1), FEATURE);
    }
    img
}

pub fn save_png(img: &RgbaImage, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
    img.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DungeonConfig, RegionConfig};
    use crate::dungeon::generate_dungeon;
    use crate::region::generate_region;
    use crate::seed::Seed;

    #[test]
    fn region_image_has_scaled_size() {
        let map = generate_region(Seed(2), 0, &RegionConfig::default()).unwrap();
        let img = render_region(&map, 4);
        assert_eq!(img.dimensions(), (64 * 4, 48 * 4));
        // Угол карты всегда глубокая вода
        let [r, g, b] = crate::biome::Biome::DeepWater.to_rgb();
        assert_eq!(img.get_pixel(0, 0), &Rgba([r, g, b, 255]));
    }

    #[test]
    fn dungeon_image_marks_stairs() {
        let d = generate_dungeon(Seed(2), 0, &DungeonConfig::default()).unwrap();
        let img = render_dungeon(&d, 3);
        assert_eq!(img.dimensions(), (30 * 3, 20 * 3));
        let [r, g, b] = DungeonCell::StairsUp.to_rgb();
        let (x, y) = (d.stairs_up.x as u32 * 3, d.stairs_up.y as u32 * 3);
        assert_eq!(img.get_pixel(x, y), &Rgba([r, g, b, 255]));
    }
}
