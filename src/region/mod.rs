//! Региональная карта: биомы, поселения, дороги, ориентиры
//!
//! Порядок шагов фиксирован и определяет порядок обращений к генератору:
//! поле шума → классификация (без случайных чисел) → поселения → дороги → ориентиры.

pub mod placement;
pub mod roads;
pub mod terrain;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::biome::{Biome, Thresholds};
use crate::config::RegionConfig;
use crate::error::ConfigResult;
use crate::geometry::{Grid, Point};
use crate::noise::build_source;
use crate::seed::{Seed, SequenceRng};

pub use placement::{LandmarkKind, LandmarkMarker, Settlement};
pub use roads::RoadPath;

/// Клетка грубой сетки с её биомом.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainCell {
    pub column: usize,
    pub row: usize,
    pub biome: Biome,
}

/// Результат генерации региона. После генерации не изменяется.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMap {
    pub seed: Seed,
    pub variation: u32,
    pub terrain: Grid<Biome>,
    pub settlements: Vec<Settlement>,
    pub roads: Vec<RoadPath>,
    pub landmarks: Vec<LandmarkMarker>,
}

impl RegionMap {
    #[must_use]
    pub fn width(&self) -> usize {
        self.terrain.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.terrain.height
    }

    #[must_use]
    pub fn biome_at(&self, column: usize, row: usize) -> Option<Biome> {
        self.terrain.get(column, row).copied()
    }

    #[must_use]
    pub fn biome_at_point(&self, p: &Point) -> Option<Biome> {
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let (x, y) = p.cell();
        self.biome_at(x, y)
    }

    /// Список клеток построчно.
    pub fn terrain_cells(&self) -> impl Iterator<Item = TerrainCell> + '_ {
        self.terrain.iter_cells().map(|(column, row, &biome)| TerrainCell {
            column,
            row,
            biome,
        })
    }

    /// Сколько клеток каждого биома.
    #[must_use]
    pub fn biome_histogram(&self) -> BTreeMap<Biome, usize> {
        let mut counts = BTreeMap::new();
        for &b in &self.terrain.data {
            *counts.entry(b).or_insert(0) += 1;
        }
        counts
    }
}

/// Генерирует региональную карту.
///
/// Конфигурация проверяется до первого случайного числа; при ошибке
/// возвращается `ConfigError`, иначе — полная и структурно корректная карта.
pub fn generate_region(seed: Seed, variation: u32, cfg: &RegionConfig) -> ConfigResult<RegionMap> {
    cfg.validate()?;
    let weights = cfg.resolve_weights()?;
    let thresholds = Thresholds::from_weights(&weights);

    let mut rng = SequenceRng::new(seed.with_variation(variation));
    let (width, height) = (cfg.width as usize, cfg.height as usize);

    // === 1. Рельеф ===
    let source = build_source(cfg.noise.backend, &mut rng);
    let terrain = terrain::classify_terrain(source.as_ref(), width, height, &cfg.noise, &thresholds);

    // === 2. Поселения ===
    let settlements = placement::place_settlements(&mut rng, &terrain, cfg);

    // === 3. Дороги ===
    let roads = roads::generate_roads(&mut rng, width, height, cfg.road_count);

    // === 4. Ориентиры ===
    let landmarks = placement::place_landmarks(&mut rng, &terrain, &settlements, cfg);

    info!(
        target: "realmforge::region",
        %seed,
        variation,
        width,
        height,
        settlements = settlements.len(),
        roads = roads.len(),
        landmarks = landmarks.len(),
        "регион сгенерирован"
    );

    Ok(RegionMap {
        seed,
        variation,
        terrain,
        settlements,
        roads,
        landmarks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn invalid_config_fails_before_work() {
        let cfg = RegionConfig {
            height: 0,
            ..RegionConfig::default()
        };
        assert!(matches!(
            generate_region(Seed(1), 0, &cfg),
            Err(ConfigError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn histogram_counts_every_cell() {
        let map = generate_region(Seed(3), 0, &RegionConfig::default()).unwrap();
        let total: usize = map.biome_histogram().values().sum();
        assert_eq!(total, map.width() * map.height());
        assert_eq!(map.terrain_cells().count(), total);
    }

    #[test]
    fn biome_at_point_matches_cell() {
        let map = generate_region(Seed(3), 0, &RegionConfig::default()).unwrap();
        let p = Point::new(10.7, 5.2);
        assert_eq!(map.biome_at_point(&p), map.biome_at(10, 5));
        assert_eq!(map.biome_at_point(&Point::new(-1.0, 2.0)), None);
        assert_eq!(map.biome_at(map.width(), 0), None);
    }

    #[test]
    fn variation_changes_output() {
        let cfg = RegionConfig::default();
        let a = generate_region(Seed(77), 0, &cfg).unwrap();
        let b = generate_region(Seed(77), 1, &cfg).unwrap();
        assert_ne!(a.terrain, b.terrain);
    }
}
