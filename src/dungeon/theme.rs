//! Темы подземелий: пулы названий комнат и словарь декоративных объектов
//!
//! Тема выбирается снаружи (например, по категории кампании) и целиком
//! передаётся в конфигурации.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::seed::SequenceRng;

/// Смысловая роль комнаты.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoomRole {
    Entry,
    Combat,
    Treasure,
    Ritual,
    Utility,
    Library,
    Boss,
    Special,
}

impl RoomRole {
    /// Порядок ролей для промежуточных комнат.
    pub const MIDDLE_CYCLE: [RoomRole; 6] = [
        RoomRole::Combat,
        RoomRole::Treasure,
        RoomRole::Combat,
        RoomRole::Library,
        RoomRole::Utility,
        RoomRole::Ritual,
    ];

    /// Название по умолчанию, если в теме нет пула для роли.
    #[must_use]
    pub fn fallback_name(self) -> &'static str {
        match self {
            RoomRole::Entry => "Entrance",
            RoomRole::Combat => "Guard Room",
            RoomRole::Treasure => "Vault",
            RoomRole::Ritual => "Ritual Chamber",
            RoomRole::Utility => "Storeroom",
            RoomRole::Library => "Study",
            RoomRole::Boss => "Inner Sanctum",
            RoomRole::Special => "Flooded Hall",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonTheme {
    pub key: String,
    /// Заголовок без имени локации.
    pub default_title: String,
    /// Шаблоны заголовка, `{location}` заменяется на имя локации.
    #[serde(default)]
    pub title_patterns: Vec<String>,
    #[serde(default)]
    pub room_names: BTreeMap<RoomRole, Vec<String>>,
    #[serde(default)]
    pub features: Vec<String>,
}

fn pool(entries: &[(RoomRole, &[&str])]) -> BTreeMap<RoomRole, Vec<String>> {
    entries
        .iter()
        .map(|(role, names)| (*role, names.iter().map(|s| (*s).to_string()).collect()))
        .collect()
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl DungeonTheme {
    pub const PRESETS: [&'static str; 5] = ["undead", "cult", "bandit", "beast", "arcane"];

    /// Встроенная тема по ключу.
    pub fn named(key: &str) -> ConfigResult<Self> {
        let theme = match key {
            "undead" => Self {
                key: key.to_string(),
                default_title: "The Restless Crypt".to_string(),
                title_patterns: words(&["Crypts beneath {location}", "The Barrow of {location}"]),
                room_names: pool(&[
                    (RoomRole::Entry, &["Collapsed Stair", "Mourners' Gate"]),
                    (RoomRole::Combat, &["Ossuary", "Bone Gallery", "Charnel Pit"]),
                    (RoomRole::Treasure, &["Grave-Goods Vault", "Reliquary"]),
                    (RoomRole::Ritual, &["Embalming Hall", "Shrine of Whispers"]),
                    (RoomRole::Utility, &["Gravediggers' Store", "Coffin Room"]),
                    (RoomRole::Library, &["Necrologue Archive", "Hall of Epitaphs"]),
                    (RoomRole::Boss, &["Lich's Sepulchre", "Tomb of the First King"]),
                    (RoomRole::Special, &["Drowned Catacomb", "Black Pool"]),
                ]),
                features: words(&["sarcophagus", "bone pile", "candelabra", "open grave"]),
            },
            "cult" => Self {
                key: key.to_string(),
                default_title: "The Hidden Temple".to_string(),
                title_patterns: words(&["Sanctum under {location}", "The Cellars of {location}"]),
                room_names: pool(&[
                    (RoomRole::Entry, &["False Chapel", "Penitents' Door"]),
                    (RoomRole::Combat, &["Acolyte Barracks", "Hall of Masks"]),
                    (RoomRole::Treasure, &["Tithe Room", "Offering Vault"]),
                    (RoomRole::Ritual, &["Summoning Circle", "Blood Altar"]),
                    (RoomRole::Utility, &["Robing Room", "Kitchen"]),
                    (RoomRole::Library, &["Forbidden Library", "Scriptorium"]),
                    (RoomRole::Boss, &["High Priest's Chamber", "Heart of the Cult"]),
                    (RoomRole::Special, &["Baptismal Pool", "Flooded Crypt"]),
                ]),
                features: words(&["altar", "brazier", "idol", "ritual circle"]),
            },
            "bandit" => Self {
                key: key.to_string(),
                default_title: "The Smugglers' Warren".to_string(),
                title_patterns: words(&["Hideout near {location}", "Tunnels of {location}"]),
                room_names: pool(&[
                    (RoomRole::Entry, &["Lookout Post", "Hidden Entrance"]),
                    (RoomRole::Combat, &["Guard Post", "Mess Hall", "Barracks"]),
                    (RoomRole::Treasure, &["Loot Cache", "Strongroom"]),
                    (RoomRole::Ritual, &["Gambling Den", "Shrine to Luck"]),
                    (RoomRole::Utility, &["Stables", "Storeroom", "Armory"]),
                    (RoomRole::Library, &["Map Room", "Ledger Office"]),
                    (RoomRole::Boss, &["Chief's Quarters"]),
                    (RoomRole::Special, &["Underground Dock", "Flooded Cellar"]),
                ]),
                features: words(&["crate stack", "weapon rack", "campfire", "barrels"]),
            },
            "beast" => Self {
                key: key.to_string(),
                default_title: "The Gnawing Caves".to_string(),
                title_patterns: words(&["Lair beneath {location}", "The Dens of {location}"]),
                room_names: pool(&[
                    (RoomRole::Entry, &["Cave Mouth", "Muddy Slope"]),
                    (RoomRole::Combat, &["Nest", "Hunting Ground", "Den"]),
                    (RoomRole::Treasure, &["Trophy Hoard", "Glittering Grotto"]),
                    (RoomRole::Ritual, &["Moon Pool", "Painted Cave"]),
                    (RoomRole::Utility, &["Larder", "Bone Midden"]),
                    (RoomRole::Library, &["Carved Gallery", "Echo Chamber"]),
                    (RoomRole::Boss, &["Alpha's Lair", "Brood Chamber"]),
                    (RoomRole::Special, &["Underground Lake", "Dripping Grotto"]),
                ]),
                features: words(&["stalagmite", "nest", "carcass", "fungus patch"]),
            },
            "arcane" => Self {
                key: key.to_string(),
                default_title: "The Sealed Laboratory".to_string(),
                title_patterns: words(&["Vaults of {location}", "The Undercroft of {location}"]),
                room_names: pool(&[
                    (RoomRole::Entry, &["Warded Antechamber", "Glyph Hall"]),
                    (RoomRole::Combat, &["Golem Foundry", "Proving Hall"]),
                    (RoomRole::Treasure, &["Reagent Vault", "Crystal Store"]),
                    (RoomRole::Ritual, &["Conjuring Room", "Star Chamber"]),
                    (RoomRole::Utility, &["Alchemy Lab", "Apprentice Cells"]),
                    (RoomRole::Library, &["Grand Library", "Orrery Room"]),
                    (RoomRole::Boss, &["Archmage's Sanctum"]),
                    (RoomRole::Special, &["Elemental Cistern", "Scrying Pool"]),
                ]),
                features: words(&["arcane focus", "bookshelf", "glowing rune", "alembic"]),
            },
            other => return Err(ConfigError::UnknownTheme(other.to_string())),
        };
        Ok(theme)
    }

    /// Название комнаты из пула роли.
    pub fn room_name(&self, role: RoomRole, rng: &mut SequenceRng) -> String {
        self.room_names
            .get(&role)
            .and_then(|names| rng.pick(names))
            .map_or_else(|| role.fallback_name().to_string(), Clone::clone)
    }

    /// Заголовок подземелья; имя локации подставляется в случайный шаблон.
    pub fn title(&self, location: Option<&str>, rng: &mut SequenceRng) -> String {
        match (location, rng.pick(&self.title_patterns)) {
            (Some(loc), Some(pattern)) => pattern.replace("{location}", loc),
            (Some(loc), None) => format!("{} of {loc}", self.default_title),
            (None, _) => self.default_title.clone(),
        }
    }
}

impl Default for DungeonTheme {
    fn default() -> Self {
        Self {
            key: "generic".to_string(),
            default_title: "The Forgotten Dungeon".to_string(),
            title_patterns: Vec::new(),
            room_names: BTreeMap::new(),
            features: words(&["pillar", "statue", "rubble"]),
        }
    }
}
