//! Размещение поселений и ориентиров выборкой с отклонением
//!
//! Каждое место получает не больше `max_placement_attempts` попыток; если
//! ни одна не прошла, место пропускается. Это не ошибка: итоговое число
//! объектов может быть меньше запрошенного.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::biome::Biome;
use crate::config::RegionConfig;
use crate::geometry::{Grid, Point};
use crate::seed::SequenceRng;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub position: Point,
    pub display_name: String,
    pub is_major: bool,
    /// Имя пришло от вызывающей стороны, а не из генератора имён
    pub is_named_by_caller: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandmarkKind {
    Ruin,
    Tower,
    Shrine,
    Cave,
    Monolith,
    Battlefield,
}

impl LandmarkKind {
    pub const ALL: [LandmarkKind; 6] = [
        LandmarkKind::Ruin,
        LandmarkKind::Tower,
        LandmarkKind::Shrine,
        LandmarkKind::Cave,
        LandmarkKind::Monolith,
        LandmarkKind::Battlefield,
    ];

    #[must_use]
    pub fn noun(self) -> &'static str {
        match self {
            LandmarkKind::Ruin => "Ruins",
            LandmarkKind::Tower => "Tower",
            LandmarkKind::Shrine => "Shrine",
            LandmarkKind::Cave => "Cave",
            LandmarkKind::Monolith => "Monolith",
            LandmarkKind::Battlefield => "Battlefield",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkMarker {
    pub position: Point,
    pub display_name: String,
    pub kind: LandmarkKind,
}

/// Случайная точка с отступом `margin` от краёв.
fn random_point(rng: &mut SequenceRng, terrain: &Grid<Biome>, margin: f64) -> Point {
    let x = rng.range_f64(margin, terrain.width as f64 - margin);
    let y = rng.range_f64(margin, terrain.height as f64 - margin);
    Point::new(x, y)
}

fn on_land(terrain: &Grid<Biome>, p: &Point) -> bool {
    let (x, y) = p.cell();
    terrain.get(x, y).is_some_and(|b| !b.is_water())
}

/// До `attempts` попыток найти точку, удовлетворяющую `accept`.
fn sample_position(
    rng: &mut SequenceRng,
    terrain: &Grid<Biome>,
    margin: f64,
    attempts: usize,
    accept: impl Fn(&Point) -> bool,
) -> Option<Point> {
    (0..attempts)
        .map(|_| random_point(rng, terrain, margin))
        .find(|p| on_land(terrain, p) && accept(p))
}

/// Ставит сначала именованные поселения (в заданном порядке), затем
/// процедурные, пока не наберётся `settlement_count`.
///
/// Именованные поселения пробуются все, даже если их больше целевого числа.
pub fn place_settlements(
    rng: &mut SequenceRng,
    terrain: &Grid<Biome>,
    cfg: &RegionConfig,
) -> Vec<Settlement> {
    let named = &cfg.settlement_names;
    let slots = cfg.settlement_count.max(named.len());
    let mut placed: Vec<Settlement> = Vec::with_capacity(slots);
    let mut skipped = 0usize;

    for slot in 0..slots {
        let position = sample_position(
            rng,
            terrain,
            cfg.edge_margin,
            cfg.max_placement_attempts,
            |p| {
                placed
                    .iter()
                    .all(|s| s.position.distance(p) >= cfg.min_settlement_distance)
            },
        );
        let Some(position) = position else {
            debug!(
                target: "realmforge::region",
                slot,
                named = slot < named.len(),
                "место для поселения не найдено, пропуск"
            );
            skipped += 1;
            continue;
        };

        let settlement = if let Some(name) = named.get(slot) {
            Settlement {
                position,
                display_name: name.clone(),
                is_major: true,
                is_named_by_caller: true,
            }
        } else {
            let taken: Vec<String> = placed.iter().map(|s| s.display_name.clone()).collect();
            let display_name = cfg.names.settlement_name(rng, &taken);
            Settlement {
                position,
                display_name,
                is_major: rng.chance(cfg.major_fraction),
                is_named_by_caller: false,
            }
        };
        placed.push(settlement);
    }

    debug!(
        target: "realmforge::region",
        placed = placed.len(),
        skipped,
        "поселения размещены"
    );
    placed
}

/// Ориентиры держат дистанцию только от поселений, не друг от друга.
pub fn place_landmarks(
    rng: &mut SequenceRng,
    terrain: &Grid<Biome>,
    settlements: &[Settlement],
    cfg: &RegionConfig,
) -> Vec<LandmarkMarker> {
    let mut landmarks = Vec::with_capacity(cfg.landmark_count);
    for slot in 0..cfg.landmark_count {
        let position = sample_position(
            rng,
            terrain,
            cfg.edge_margin,
            cfg.max_placement_attempts,
            |p| {
                settlements
                    .iter()
                    .all(|s| s.position.distance(p) >= cfg.landmark_min_distance)
            },
        );
        let Some(position) = position else {
            debug!(target: "realmforge::region", slot, "место для ориентира не найдено, пропуск");
            continue;
        };
        let kind = rng
            .pick(&LandmarkKind::ALL)
            .copied()
            .unwrap_or(LandmarkKind::Ruin);
        let display_name = cfg.names.landmark_name(rng, kind.noun());
        landmarks.push(LandmarkMarker {
            position,
            display_name,
            kind,
        });
    }
    landmarks
}
