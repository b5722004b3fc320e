//! Рекурсивное разбиение прямоугольника (BSP) на комнаты
//!
//! Чистая функция: на вход область и глубина, на выход список прямоугольников
//! комнат в порядке генерации (сначала первая половина, затем вторая).

use std::cmp::Ordering;

use crate::geometry::Rect;
use crate::seed::SequenceRng;

/// Допустимые размеры стороны комнаты.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomSizes {
    pub min: usize,
    pub max: usize,
}

impl RoomSizes {
    /// Сторона комнаты вместе со стеной с каждой стороны.
    fn padded(self) -> usize {
        self.min + 2
    }
}

/// Делит `region` до глубины `depth` и вырезает по одной комнате в каждом листе.
///
/// Область делится по длинной стороне (при равенстве — случайно). Если длинная
/// сторона не вмещает две минимальные комнаты со стенами, область становится
/// листом раньше срока. Лист, в который не помещается минимальная комната,
/// не даёт комнаты.
pub fn partition(region: Rect, depth: u32, sizes: RoomSizes, rng: &mut SequenceRng) -> Vec<Rect> {
    if depth == 0 {
        return carve_leaf(region, sizes, rng).into_iter().collect();
    }

    let vertical = match region.width.cmp(&region.height) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => rng.chance(0.5),
    };
    let length = if vertical { region.width } else { region.height };
    let padded = sizes.padded();
    if length < padded * 2 {
        return carve_leaf(region, sizes, rng).into_iter().collect();
    }

    let cut = rng.range(padded, length - padded + 1);
    let (first, second) = if vertical {
        (
            Rect::new(region.x, region.y, cut, region.height),
            Rect::new(region.x + cut, region.y, region.width - cut, region.height),
        )
    } else {
        (
            Rect::new(region.x, region.y, region.width, cut),
            Rect::new(region.x, region.y + cut, region.width, region.height - cut),
        )
    };

    let mut rooms = partition(first, depth - 1, sizes, rng);
    rooms.extend(partition(second, depth - 1, sizes, rng));
    rooms
}

/// Комната случайного размера внутри листа, с отступом в одну клетку от краёв.
fn carve_leaf(leaf: Rect, sizes: RoomSizes, rng: &mut SequenceRng) -> Option<Rect> {
    let avail_w = leaf.width.saturating_sub(2);
    let avail_h = leaf.height.saturating_sub(2);
    if avail_w < sizes.min || avail_h < sizes.min {
        return None;
    }

    let width = rng.range(sizes.min, avail_w.min(sizes.max) + 1);
    let height = rng.range(sizes.min, avail_h.min(sizes.max) + 1);
    let x = leaf.x + 1 + rng.range(0, avail_w - width + 1);
    let y = leaf.y + 1 + rng.range(0, avail_h - height + 1);
    Some(Rect::new(x, y, width, height))
}
