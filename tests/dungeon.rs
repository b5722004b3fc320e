use realmforge::dungeon::Dungeon;
use realmforge::{DungeonCell, DungeonConfig, RoomRole, Seed, generate_dungeon};

fn configs() -> Vec<DungeonConfig> {
    let mut out = Vec::new();
    for theme in ["undead", "cult", "bandit", "beast", "arcane"] {
        out.push(DungeonConfig::for_theme(theme).unwrap());
    }
    out.push(DungeonConfig {
        width: 60,
        height: 40,
        depth: 6,
        water_room_fraction: 0.5,
        ..DungeonConfig::default()
    });
    out.push(DungeonConfig {
        width: 12,
        height: 9,
        min_room_size: 3,
        max_room_size: 5,
        ..DungeonConfig::default()
    });
    out
}

fn for_each_dungeon(mut check: impl FnMut(&Dungeon, &DungeonConfig)) {
    for cfg in configs() {
        for seed in 0..15 {
            let d = generate_dungeon(Seed(seed), 0, &cfg).unwrap();
            check(&d, &cfg);
        }
    }
}

fn neighbors(d: &Dungeon, x: usize, y: usize) -> Vec<DungeonCell> {
    let mut out = Vec::new();
    if x > 0 {
        out.extend(d.cell(x - 1, y));
    }
    if y > 0 {
        out.extend(d.cell(x, y - 1));
    }
    out.extend(d.cell(x + 1, y));
    out.extend(d.cell(x, y + 1));
    out
}

#[test]
fn same_inputs_give_identical_dungeons() {
    let cfg = DungeonConfig::default();
    let a = generate_dungeon(Seed(99), 2, &cfg).unwrap();
    let b = generate_dungeon(Seed(99), 2, &cfg).unwrap();
    assert_eq!(a, b);
}

#[test]
fn every_room_is_reachable_from_entry() {
    for_each_dungeon(|d, _| {
        assert!(d.is_connected());
        let reach = d.reachable_from_entry();
        for room in &d.rooms {
            let reached = room
                .rect()
                .cells()
                .any(|(x, y)| reach.get(x, y) == Some(&true));
            assert!(reached, "комната {} недостижима (сид {})", room.id, d.seed);
        }
    });
}

#[test]
fn exactly_one_staircase_each_way() {
    for_each_dungeon(|d, _| {
        assert_eq!(d.count(DungeonCell::StairsUp), 1);
        assert_eq!(d.count(DungeonCell::StairsDown), 1);

        let entry = d.entry().unwrap();
        let boss = d.rooms.last().unwrap();
        assert!(entry.rect().contains(d.stairs_up.x, d.stairs_up.y));
        assert!(boss.rect().contains(d.stairs_down.x, d.stairs_down.y));
        assert_eq!(d.cell(d.stairs_up.x, d.stairs_up.y), Some(DungeonCell::StairsUp));
        assert_eq!(d.cell(d.stairs_down.x, d.stairs_down.y), Some(DungeonCell::StairsDown));
    });
}

#[test]
fn doors_separate_two_walkable_spaces() {
    for_each_dungeon(|d, _| {
        for (x, y, cell) in d.grid.iter_cells() {
            if !cell.is_door() {
                continue;
            }
            let open = neighbors(d, x, y)
                .into_iter()
                .filter(|c| c.is_navigable())
                .count();
            assert!(open >= 2, "дверь ({x}, {y}) ведёт в тупик");
            assert!(d.room_at(x, y).is_none(), "дверь внутри комнаты");
        }
    });
}

#[test]
fn rooms_respect_size_limits_and_grid() {
    for_each_dungeon(|d, cfg| {
        let (min, max) = (cfg.min_room_size as usize, cfg.max_room_size as usize);
        for room in &d.rooms {
            assert!((min..=max).contains(&room.width), "ширина {}", room.width);
            assert!((min..=max).contains(&room.height), "высота {}", room.height);
            assert!(room.x + room.width <= d.grid.width);
            assert!(room.y + room.height <= d.grid.height);
        }
    });
}

#[test]
fn water_and_features_stay_in_their_rooms() {
    for_each_dungeon(|d, _| {
        let last = d.rooms.len().saturating_sub(1);
        assert!(!d.water_rooms.contains(&0));
        assert!(d.rooms.len() < 2 || !d.water_rooms.contains(&last));
        for &i in &d.water_rooms {
            assert_eq!(d.rooms[i].role, RoomRole::Special);
        }
        for (x, y, cell) in d.grid.iter_cells() {
            if *cell == DungeonCell::Water {
                let owner = d.room_at(x, y).map(|r| r.id);
                assert!(owner.is_some_and(|id| d.water_rooms.contains(&id)));
            }
        }
        for f in &d.features {
            assert_eq!(d.cell(f.position.x, f.position.y), Some(DungeonCell::Floor));
            assert!(d.room_at(f.position.x, f.position.y).is_some());
        }
    });
}

#[test]
fn undead_crypt_thirty_by_twenty() {
    let cfg = DungeonConfig {
        width: 30,
        height: 20,
        depth: 4,
        ..DungeonConfig::for_theme("undead").unwrap()
    };
    let d = generate_dungeon(Seed::from("Embers of the Fallen Throne"), 0, &cfg).unwrap();
    assert!(!d.rooms.is_empty());
    assert_eq!(d.count(DungeonCell::StairsUp), 1);
    assert_eq!(d.count(DungeonCell::StairsDown), 1);
    assert!(d.is_connected());
    assert_eq!(d.corridors.len(), d.rooms.len() - 1);
    assert_eq!(d.theme, "undead");
    assert_eq!(d.rooms[0].role, RoomRole::Entry);
    if d.rooms.len() > 1 {
        assert_eq!(d.rooms.last().map(|r| r.role), Some(RoomRole::Boss));
    }
    assert!(d.rooms.iter().all(|r| !r.name.is_empty()));
    assert!(!d.title.is_empty());
}

#[test]
fn dungeon_survives_json() {
    let d = generate_dungeon(Seed(5), 0, &DungeonConfig::default()).unwrap();
    let json = serde_json::to_string(&d).unwrap();
    let back: Dungeon = serde_json::from_str(&json).unwrap();
    assert_eq!(back, d);
}
