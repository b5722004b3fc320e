//! Подземелье: комнаты, коридоры, двери, лестницы, вода, декор, роли
//!
//! Одна сетка, изначально заполненная стенами, проходит через фиксированную
//! последовательность шагов. Комнаты соединяются строго по порядку генерации
//! (i с i − 1), без остовного дерева и поиска ближайших.

pub mod carve;
pub mod graph;
pub mod partition;
pub mod theme;

use std::collections::BTreeSet;

use petgraph::graph::UnGraph;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::DungeonConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::geometry::{Grid, Rect};
use crate::seed::{Seed, SequenceRng};

pub use carve::{CellPos, Corridor, DungeonCell, Feature};
pub use theme::{DungeonTheme, RoomRole};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: usize,
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub role: RoomRole,
    pub name: String,
}

impl Room {
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Результат генерации подземелья. Сетка — авторитетное состояние.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    pub seed: Seed,
    pub variation: u32,
    pub title: String,
    pub theme: String,
    pub grid: Grid<DungeonCell>,
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
    pub features: Vec<Feature>,
    pub water_rooms: BTreeSet<usize>,
    pub stairs_up: CellPos,
    pub stairs_down: CellPos,
}

impl Dungeon {
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<DungeonCell> {
        self.grid.get(x, y).copied()
    }

    #[must_use]
    pub fn count(&self, kind: DungeonCell) -> usize {
        self.grid.data.iter().filter(|&&c| c == kind).count()
    }

    #[must_use]
    pub fn entry(&self) -> Option<&Room> {
        self.rooms.first()
    }

    /// Комната, которой принадлежит клетка.
    #[must_use]
    pub fn room_at(&self, x: usize, y: usize) -> Option<&Room> {
        self.rooms.iter().find(|r| r.rect().contains(x, y))
    }

    pub fn room_graph(&self) -> UnGraph<usize, ()> {
        graph::build_room_graph(self.rooms.len(), &self.corridors)
    }

    /// Граф комнат связен.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        graph::is_single_component(&self.room_graph())
    }

    /// Клетки, достижимые от лестницы вверх по полу, дверям и лестницам.
    #[must_use]
    pub fn reachable_from_entry(&self) -> Grid<bool> {
        graph::flood_navigable(&self.grid, (self.stairs_up.x, self.stairs_up.y))
    }
}

/// Роль по позиции: первая — вход, последняя — босс, затопленные — особые,
/// остальные по кругу.
fn role_for(index: usize, total: usize, water_rooms: &BTreeSet<usize>) -> RoomRole {
    if index == 0 {
        RoomRole::Entry
    } else if index + 1 == total {
        RoomRole::Boss
    } else if water_rooms.contains(&index) {
        RoomRole::Special
    } else {
        RoomRole::MIDDLE_CYCLE[(index - 1) % RoomRole::MIDDLE_CYCLE.len()]
    }
}

/// Генерирует подземелье.
///
/// Конфигурация проверяется до первого случайного числа. Лист разбиения, в
/// который не помещается минимальная комната, просто не даёт комнаты, так что
/// число комнат — нижняя оценка плотности, а не гарантия.
pub fn generate_dungeon(seed: Seed, variation: u32, cfg: &DungeonConfig) -> ConfigResult<Dungeon> {
    cfg.validate()?;
    let theme = cfg.resolve_theme()?;

    let mut rng = SequenceRng::new(seed.with_variation(variation));
    let (width, height) = (cfg.width as usize, cfg.height as usize);
    let mut grid = Grid::new(width, height, DungeonCell::Wall);

    // === 1. Разбиение ===
    let sizes = partition::RoomSizes {
        min: cfg.min_room_size as usize,
        max: cfg.max_room_size as usize,
    };
    let rects = partition::partition(Rect::new(0, 0, width, height), cfg.depth, sizes, &mut rng);
    // Корень не меньше минимальной комнаты со стенами, так что хотя бы одна комната есть
    let (Some(&entry), Some(&boss)) = (rects.first(), rects.last()) else {
        return Err(ConfigError::InvalidDimensions {
            what: "dungeon",
            width: cfg.width,
            height: cfg.height,
            reason: "no room fits the grid".to_string(),
        });
    };
    carve::carve_rooms(&mut grid, &rects);

    // === 2. Коридоры ===
    let (corridors, corridor_mask) = carve::carve_corridors(&mut grid, &rects, &mut rng);

    // === 3. Двери ===
    let doors = carve::place_doors(
        &mut grid,
        &rects,
        &mut rng,
        cfg.door_chance,
        cfg.secret_door_chance,
    );

    // === 4. Лестницы ===
    let (stairs_up, stairs_down) = carve::place_stairs(&mut grid, &entry, &boss);

    // === 5. Вода ===
    let water_rooms = carve::flood_rooms(
        &mut grid,
        &rects,
        &corridor_mask,
        &mut rng,
        cfg.water_room_fraction,
    );

    // === 6. Декор ===
    let features = carve::place_features(
        &grid,
        &rects,
        &mut rng,
        &theme.features,
        cfg.feature_chance,
        cfg.feature_min_area as usize,
    );

    // === 7. Роли и названия ===
    let rooms: Vec<Room> = rects
        .iter()
        .enumerate()
        .map(|(id, r)| {
            let role = role_for(id, rects.len(), &water_rooms);
            Room {
                id,
                x: r.x,
                y: r.y,
                width: r.width,
                height: r.height,
                role,
                name: theme.room_name(role, &mut rng),
            }
        })
        .collect();
    let title = theme.title(cfg.location_name.as_deref(), &mut rng);

    debug!(
        target: "realmforge::dungeon",
        doors,
        water = water_rooms.len(),
        features = features.len(),
        "детали подземелья расставлены"
    );
    info!(
        target: "realmforge::dungeon",
        %seed,
        variation,
        theme = %theme.key,
        rooms = rooms.len(),
        "подземелье сгенерировано"
    );

    Ok(Dungeon {
        seed,
        variation,
        title,
        theme: theme.key,
        grid,
        rooms,
        corridors,
        features,
        water_rooms,
        stairs_up,
        stairs_down,
    })
}
