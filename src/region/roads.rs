use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::seed::SequenceRng;

/// Минимальное и максимальное (включительно) число точек дороги.
pub const MIN_WAYPOINTS: usize = 3;
pub const MAX_WAYPOINTS: usize = 6;

/// Дорога — упорядоченная ломаная. Чисто декоративная связка, не маршрут
/// между поселениями.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadPath {
    pub waypoints: Vec<Point>,
}

impl RoadPath {
    /// Длина ломаной.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance(&pair[1]))
            .sum()
    }
}

/// `count` дорог из 3–6 случайных точек в пределах карты.
pub fn generate_roads(
    rng: &mut SequenceRng,
    width: usize,
    height: usize,
    count: usize,
) -> Vec<RoadPath> {
    let (w, h) = (width as f64, height as f64);
    (0..count)
        .map(|_| {
            let n = rng.range(MIN_WAYPOINTS, MAX_WAYPOINTS + 1);
            let waypoints = (0..n)
                .map(|_| {
                    let x = rng.range_f64(0.0, w);
                    let y = rng.range_f64(0.0, h);
                    Point::new(x, y)
                })
                .collect();
            RoadPath { waypoints }
        })
        .collect()
}
