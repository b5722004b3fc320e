//! Вырезание комнат и коридоров, двери, лестницы, вода и декор
//!
//! Все функции работают с одной сеткой, изначально заполненной стенами.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::geometry::{Grid, Rect};
use crate::seed::SequenceRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DungeonCell {
    Wall,
    Floor,
    Door,
    SecretDoor,
    StairsUp,
    StairsDown,
    Water,
}

impl DungeonCell {
    /// Клетки, по которым можно пройти (пол, двери, лестницы).
    #[must_use]
    pub fn is_navigable(self) -> bool {
        matches!(
            self,
            DungeonCell::Floor
                | DungeonCell::Door
                | DungeonCell::SecretDoor
                | DungeonCell::StairsUp
                | DungeonCell::StairsDown
        )
    }

    #[must_use]
    pub fn is_door(self) -> bool {
        matches!(self, DungeonCell::Door | DungeonCell::SecretDoor)
    }
}

/// Клетка сетки подземелья.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPos {
    pub x: usize,
    pub y: usize,
}

impl From<(usize, usize)> for CellPos {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

/// Г-образный коридор между центрами двух комнат.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    pub from_room: usize,
    pub to_room: usize,
    pub start: CellPos,
    pub elbow: CellPos,
    pub end: CellPos,
}

/// Декоративный или интерактивный объект внутри комнаты.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub position: CellPos,
    pub kind: String,
}

pub fn carve_rooms(grid: &mut Grid<DungeonCell>, rooms: &[Rect]) {
    for room in rooms {
        for (x, y) in room.cells() {
            grid.set(x, y, DungeonCell::Floor);
        }
    }
}

/// Прямой отрезок по одной из осей, концы включительно.
fn carve_line(
    grid: &mut Grid<DungeonCell>,
    mask: &mut Grid<bool>,
    from: (usize, usize),
    to: (usize, usize),
) {
    let (x0, x1) = (from.0.min(to.0), from.0.max(to.0));
    let (y0, y1) = (from.1.min(to.1), from.1.max(to.1));
    for y in y0..=y1 {
        for x in x0..=x1 {
            grid.set(x, y, DungeonCell::Floor);
            mask.set(x, y, true);
        }
    }
}

/// Соединяет каждую комнату с предыдущей по порядку генерации.
///
/// Цепочка гарантирует, что от входа достижима любая комната. Возвращает
/// коридоры и маску клеток, через которые они прошли.
pub fn carve_corridors(
    grid: &mut Grid<DungeonCell>,
    rooms: &[Rect],
    rng: &mut SequenceRng,
) -> (Vec<Corridor>, Grid<bool>) {
    let mut mask = Grid::new(grid.width, grid.height, false);
    let mut corridors = Vec::with_capacity(rooms.len().saturating_sub(1));

    for (i, pair) in rooms.windows(2).enumerate() {
        let start = pair[0].center();
        let end = pair[1].center();
        let elbow = if rng.chance(0.5) {
            // Сначала по горизонтали
            (end.0, start.1)
        } else {
            (start.0, end.1)
        };
        carve_line(grid, &mut mask, start, elbow);
        carve_line(grid, &mut mask, elbow, end);
        corridors.push(Corridor {
            from_room: i,
            to_room: i + 1,
            start: start.into(),
            elbow: elbow.into(),
            end: end.into(),
        });
    }
    (corridors, mask)
}

/// Клетки кольца стены вокруг комнаты (без углов), через которые проходит
/// пол: внутренний сосед в комнате, внешний проходим.
#[must_use]
pub fn door_candidates(grid: &Grid<DungeonCell>, room: &Rect) -> Vec<(usize, usize)> {
    let walkable = |x: usize, y: usize| grid.get(x, y).is_some_and(|c| c.is_navigable());
    let mut out = Vec::new();

    for x in room.x..room.right() {
        // Верх
        if room.y >= 2 && walkable(x, room.y - 1) && walkable(x, room.y - 2) {
            out.push((x, room.y - 1));
        }
        // Низ
        if walkable(x, room.bottom()) && walkable(x, room.bottom() + 1) {
            out.push((x, room.bottom()));
        }
    }
    for y in room.y..room.bottom() {
        if room.x >= 2 && walkable(room.x - 1, y) && walkable(room.x - 2, y) {
            out.push((room.x - 1, y));
        }
        if walkable(room.right(), y) && walkable(room.right() + 1, y) {
            out.push((room.right(), y));
        }
    }
    out
}

/// С вероятностью `door_chance` ставит одну дверь на входе в комнату,
/// из них доля `secret_chance` — потайные.
pub fn place_doors(
    grid: &mut Grid<DungeonCell>,
    rooms: &[Rect],
    rng: &mut SequenceRng,
    door_chance: f64,
    secret_chance: f64,
) -> usize {
    let mut placed = 0;
    for room in rooms {
        let candidates = door_candidates(grid, room);
        if candidates.is_empty() || !rng.chance(door_chance) {
            continue;
        }
        let Some(&(x, y)) = rng.pick(&candidates) else {
            continue;
        };
        let cell = if rng.chance(secret_chance) {
            DungeonCell::SecretDoor
        } else {
            DungeonCell::Door
        };
        grid.set(x, y, cell);
        placed += 1;
    }
    placed
}

/// Лестница вверх в центре входа, вниз — в центре последней комнаты.
/// Если комната одна, спуск ставится рядом с подъёмом.
pub fn place_stairs(grid: &mut Grid<DungeonCell>, entry: &Rect, boss: &Rect) -> (CellPos, CellPos) {
    let up = entry.center();
    let down = if entry == boss {
        let (cx, cy) = up;
        if cx + 1 < entry.right() {
            (cx + 1, cy)
        } else {
            (cx - 1, cy)
        }
    } else {
        boss.center()
    };
    grid.set(up.0, up.1, DungeonCell::StairsUp);
    grid.set(down.0, down.1, DungeonCell::StairsDown);
    (up.into(), down.into())
}

/// Затопляет долю промежуточных комнат (не первую и не последнюю).
///
/// Клетки коридоров внутри затопленной комнаты остаются полом, образуя
/// сухой проход, так что связность не нарушается.
pub fn flood_rooms(
    grid: &mut Grid<DungeonCell>,
    rooms: &[Rect],
    corridor_mask: &Grid<bool>,
    rng: &mut SequenceRng,
    fraction: f64,
) -> BTreeSet<usize> {
    if rooms.len() < 3 {
        return BTreeSet::new();
    }
    let mut candidates: Vec<usize> = (1..rooms.len() - 1).collect();
    let count = (candidates.len() as f64 * fraction).round() as usize;
    if count == 0 {
        return BTreeSet::new();
    }
    candidates.shuffle(rng);

    let flooded: BTreeSet<usize> = candidates.into_iter().take(count).collect();
    for &i in &flooded {
        for (x, y) in rooms[i].cells() {
            let dry_path = corridor_mask.get(x, y).copied().unwrap_or(false);
            if !dry_path && grid.get(x, y) == Some(&DungeonCell::Floor) {
                grid.set(x, y, DungeonCell::Water);
            }
        }
    }
    flooded
}

/// Сколько раз пробуем найти свободную клетку под объект.
const FEATURE_ATTEMPTS: usize = 10;

/// В достаточно больших комнатах с вероятностью `chance` ставит один объект
/// на свободную клетку пола внутри комнаты (не у стены).
pub fn place_features(
    grid: &Grid<DungeonCell>,
    rooms: &[Rect],
    rng: &mut SequenceRng,
    vocabulary: &[String],
    chance: f64,
    min_area: usize,
) -> Vec<Feature> {
    let mut features = Vec::new();
    if vocabulary.is_empty() {
        return features;
    }
    for room in rooms {
        if room.area() < min_area || room.width < 3 || room.height < 3 || !rng.chance(chance) {
            continue;
        }
        let spot = (0..FEATURE_ATTEMPTS)
            .map(|_| {
                (
                    rng.range(room.x + 1, room.right() - 1),
                    rng.range(room.y + 1, room.bottom() - 1),
                )
            })
            .find(|&(x, y)| grid.get(x, y) == Some(&DungeonCell::Floor));
        let (Some((x, y)), Some(kind)) = (spot, rng.pick(vocabulary)) else {
            continue;
        };
        features.push(Feature {
            position: CellPos { x, y },
            kind: kind.clone(),
        });
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;

    fn two_rooms() -> (Grid<DungeonCell>, Vec<Rect>) {
        let mut grid = Grid::new(30, 12, DungeonCell::Wall);
        let rooms = vec![Rect::new(2, 2, 5, 5), Rect::new(20, 3, 6, 6)];
        carve_rooms(&mut grid, &rooms);
        (grid, rooms)
    }

    #[test]
    fn corridor_connects_centres() {
        let (mut grid, rooms) = two_rooms();
        let mut rng = SequenceRng::new(Seed(1));
        let (corridors, mask) = carve_corridors(&mut grid, &rooms, &mut rng);
        assert_eq!(corridors.len(), 1);
        let c = corridors[0];
        assert_eq!((c.start.x, c.start.y), rooms[0].center());
        assert_eq!((c.end.x, c.end.y), rooms[1].center());
        assert!(c.elbow.x == c.end.x || c.elbow.x == c.start.x);
        assert!(mask.get(c.elbow.x, c.elbow.y).copied().unwrap());
        assert_eq!(grid.get(c.elbow.x, c.elbow.y), Some(&DungeonCell::Floor));
    }

    #[test]
    fn door_candidates_sit_on_corridor_entrances() {
        let (mut grid, rooms) = two_rooms();
        // Горизонтальный коридор на уровне y = 4 между комнатами
        for x in 7..20 {
            grid.set(x, 4, DungeonCell::Floor);
        }
        assert_eq!(door_candidates(&grid, &rooms[0]), vec![(7, 4)]);
        assert_eq!(door_candidates(&grid, &rooms[1]), vec![(19, 4)]);
    }

    #[test]
    fn doors_always_placed_with_certainty() {
        let (mut grid, rooms) = two_rooms();
        for x in 7..20 {
            grid.set(x, 4, DungeonCell::Floor);
        }
        let mut rng = SequenceRng::new(Seed(3));
        let placed = place_doors(&mut grid, &rooms, &mut rng, 1.0, 1.0);
        assert_eq!(placed, 2);
        assert_eq!(grid.get(7, 4), Some(&DungeonCell::SecretDoor));
        assert_eq!(grid.get(19, 4), Some(&DungeonCell::SecretDoor));
    }

    #[test]
    fn single_room_stairs_are_distinct() {
        let mut grid = Grid::new(10, 10, DungeonCell::Wall);
        let room = Rect::new(1, 1, 4, 4);
        carve_rooms(&mut grid, &[room]);
        let (up, down) = place_stairs(&mut grid, &room, &room);
        assert_ne!(up, down);
        assert!(room.contains(down.x, down.y));
        assert_eq!(grid.get(up.x, up.y), Some(&DungeonCell::StairsUp));
        assert_eq!(grid.get(down.x, down.y), Some(&DungeonCell::StairsDown));
    }

    #[test]
    fn flooding_keeps_corridor_walkway() {
        let mut grid = Grid::new(40, 10, DungeonCell::Wall);
        let rooms = vec![
            Rect::new(1, 1, 4, 4),
            Rect::new(12, 1, 6, 6),
            Rect::new(30, 2, 4, 4),
        ];
        carve_rooms(&mut grid, &rooms);
        let mut rng = SequenceRng::new(Seed(5));
        let (_, mask) = carve_corridors(&mut grid, &rooms, &mut rng);
        let flooded = flood_rooms(&mut grid, &rooms, &mask, &mut rng, 1.0);
        assert_eq!(flooded, BTreeSet::from([1]));
        let (cx, cy) = rooms[1].center();
        assert_eq!(grid.get(cx, cy), Some(&DungeonCell::Floor));
        assert!(rooms[1].cells().any(|(x, y)| grid.get(x, y) == Some(&DungeonCell::Water)));
        assert!(!rooms[0].cells().any(|(x, y)| grid.get(x, y) == Some(&DungeonCell::Water)));
    }

    #[test]
    fn features_land_on_floor_inside_rooms() {
        let mut grid = Grid::new(30, 30, DungeonCell::Wall);
        let rooms = vec![Rect::new(1, 1, 8, 8), Rect::new(12, 12, 8, 8)];
        carve_rooms(&mut grid, &rooms);
        let vocab = vec!["altar".to_string()];
        let mut rng = SequenceRng::new(Seed(2));
        let features = place_features(&grid, &rooms, &mut rng, &vocab, 1.0, 16);
        assert_eq!(features.len(), 2);
        for (f, room) in features.iter().zip(&rooms) {
            assert!(room.contains(f.position.x, f.position.y));
            assert_eq!(f.kind, "altar");
        }
    }
}
