use crate::biome::{Biome, Thresholds, classify};
use crate::config::NoiseSettings;
use crate::geometry::Grid;
use crate::noise::NoiseSource;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Множитель затухания у края: 0 на самой границе, 1 дальше `fade` клеток.
#[must_use]
pub fn edge_factor(x: usize, y: usize, width: usize, height: usize, fade: f64) -> f64 {
    if fade <= 0.0 {
        return 1.0;
    }
    let d = x
        .min(y)
        .min(width.saturating_sub(1 + x))
        .min(height.saturating_sub(1 + y));
    (d as f64 / fade).min(1.0)
}

/// Высота и влажность клетки.
///
/// Оба поля берутся из одного источника шума, влажность — со сдвигом
/// координат, поэтому поля статистически независимы.
#[must_use]
pub fn sample_cell(
    source: &dyn NoiseSource,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    noise: &NoiseSettings,
) -> (f64, f64) {
    let nx = x as f64 * noise.scale;
    let ny = y as f64 * noise.scale;

    let elevation = source.fractal(nx, ny, noise.octaves, noise.persistence)
        * edge_factor(x, y, width, height, noise.edge_fade);
    let moisture = source.fractal(
        nx + noise.moisture_offset,
        ny + noise.moisture_offset,
        noise.octaves,
        noise.persistence,
    );
    (elevation, moisture)
}

/// Классифицирует всю сетку. Клетки независимы, порядок результата построчный,
/// так что параллельная и последовательная версии дают одно и то же.
pub fn classify_terrain(
    source: &dyn NoiseSource,
    width: usize,
    height: usize,
    noise: &NoiseSettings,
    thresholds: &Thresholds,
) -> Grid<Biome> {
    let cell = |i: usize| {
        let (x, y) = (i % width, i / width);
        let (elevation, moisture) = sample_cell(source, x, y, width, height, noise);
        classify(elevation, moisture, thresholds)
    };

    #[cfg(feature = "parallel")]
    let data: Vec<Biome> = (0..width * height).into_par_iter().map(cell).collect();
    #[cfg(not(feature = "parallel"))]
    let data: Vec<Biome> = (0..width * height).map(cell).collect();

    Grid {
        width,
        height,
        data,
    }
}
