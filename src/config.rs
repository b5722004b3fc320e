// src/config.rs
//! Конфигурация генерации
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией:
//! - Региональная карта: размеры, таблица весов биомов, поселения, дороги, ориентиры
//! - Подземелье: размеры сетки, глубина разбиения, размеры комнат, тема
//! - Запрос генерации: сид, счётчик вариаций и обе секции
//!
//! Все структуры поддерживают сериализацию в TOML/JSON. Проверка (`validate`)
//! выполняется до первого обращения к генератору случайных чисел.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::biome::BiomeWeights;
use crate::dungeon::theme::DungeonTheme;
use crate::error::{ConfigError, ConfigResult, check_probability};
use crate::names::NamePools;
use crate::noise::{FIELD_SIZE, NoiseBackend};
use crate::seed::SeedInput;

/// Верхняя граница размеров любой сетки.
pub const MAX_GRID_SIDE: u32 = 4096;

/// Верхняя граница числа поселений, дорог и ориентиров.
pub const MAX_PLACED_OBJECTS: usize = 4096;

/// Верхняя граница попыток на одно место.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 10_000;

/// Параметры шумовых полей высоты и влажности.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseSettings {
    /// Реализация шума (по умолчанию решётка значений)
    #[serde(default)]
    pub backend: NoiseBackend,

    /// Масштаб координат: клетка карты → координата шума
    #[serde(default = "default_noise_scale")]
    pub scale: f64,

    /// Количество октав фрактального шума
    #[serde(default = "default_octaves")]
    pub octaves: u32,

    /// Затухание амплитуды на октаву
    #[serde(default = "default_persistence")]
    pub persistence: f64,

    /// Сдвиг координат поля влажности относительно поля высот
    #[serde(default = "default_moisture_offset")]
    pub moisture_offset: f64,

    /// Ширина полосы у края карты (в клетках), где высота затухает к нулю.
    /// `0.0` отключает затухание.
    #[serde(default = "default_edge_fade")]
    pub edge_fade: f64,
}

fn default_noise_scale() -> f64 {
    0.08
}
fn default_octaves() -> u32 {
    4
}
fn default_persistence() -> f64 {
    0.5
}
fn default_moisture_offset() -> f64 {
    137.31
}
fn default_edge_fade() -> f64 {
    6.0
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            backend: NoiseBackend::Value,
            scale: 0.08,
            octaves: 4,
            persistence: 0.5,
            moisture_offset: default_moisture_offset(),
            edge_fade: 6.0,
        }
    }
}

impl NoiseSettings {
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(invalid("noise.scale", format!("must be > 0, got {}", self.scale)));
        }
        if !(1..=12).contains(&self.octaves) {
            return Err(invalid(
                "noise.octaves",
                format!("must be in 1..=12, got {}", self.octaves),
            ));
        }
        if !self.persistence.is_finite() || self.persistence <= 0.0 || self.persistence > 1.0 {
            return Err(invalid(
                "noise.persistence",
                format!("must be in (0, 1], got {}", self.persistence),
            ));
        }
        if !self.moisture_offset.is_finite() {
            return Err(invalid("noise.moisture_offset", "must be finite".to_string()));
        }
        // Частота каждой октавы вдвое выше, и сдвиг вместе с ней
        let period = FIELD_SIZE as f64;
        let mut shift = self.moisture_offset;
        for _ in 0..self.octaves {
            let phase = shift.rem_euclid(period);
            if phase < 1e-9 || period - phase < 1e-9 {
                return Err(invalid(
                    "noise.moisture_offset",
                    format!(
                        "{} aliases the {FIELD_SIZE}-cell noise lattice, moisture would copy elevation",
                        self.moisture_offset
                    ),
                ));
            }
            shift *= 2.0;
        }
        if !self.edge_fade.is_finite() || self.edge_fade < 0.0 {
            return Err(invalid(
                "noise.edge_fade",
                format!("must be >= 0, got {}", self.edge_fade),
            ));
        }
        Ok(())
    }
}

/// Параметры региональной карты.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Ширина карты в клетках (по умолчанию 64)
    #[serde(default = "default_region_width")]
    pub width: u32,

    /// Высота карты в клетках (по умолчанию 48)
    #[serde(default = "default_region_height")]
    pub height: u32,

    /// Имя встроенной таблицы весов биомов (`default`, `ancient`, ...)
    #[serde(default = "default_biome_table")]
    pub biome_table: String,

    /// Явные веса; если заданы, заменяют `biome_table`
    #[serde(default)]
    pub biome_weights: Option<BiomeWeights>,

    /// Имена поселений от вызывающей стороны; ставятся раньше процедурных
    #[serde(default)]
    pub settlement_names: Vec<String>,

    /// Целевое число поселений (включая именованные)
    #[serde(default = "default_settlement_count")]
    pub settlement_count: usize,

    /// Минимальное расстояние между поселениями
    #[serde(default = "default_min_settlement_distance")]
    pub min_settlement_distance: f64,

    /// Доля крупных поселений среди процедурных
    #[serde(default = "default_major_fraction")]
    pub major_fraction: f64,

    /// Количество дорог
    #[serde(default = "default_road_count")]
    pub road_count: usize,

    /// Количество ориентиров
    #[serde(default = "default_landmark_count")]
    pub landmark_count: usize,

    /// Минимальное расстояние от ориентира до любого поселения
    #[serde(default = "default_landmark_min_distance")]
    pub landmark_min_distance: f64,

    /// Попыток на одно место, после чего место пропускается
    #[serde(default = "default_max_placement_attempts")]
    pub max_placement_attempts: usize,

    /// Отступ от края карты для поселений и ориентиров
    #[serde(default = "default_edge_margin")]
    pub edge_margin: f64,

    #[serde(default)]
    pub noise: NoiseSettings,

    #[serde(default)]
    pub names: NamePools,
}

fn default_region_width() -> u32 {
    64
}
fn default_region_height() -> u32 {
    48
}
fn default_biome_table() -> String {
    "default".to_string()
}
fn default_settlement_count() -> usize {
    8
}
fn default_min_settlement_distance() -> f64 {
    6.0
}
fn default_major_fraction() -> f64 {
    0.25
}
fn default_road_count() -> usize {
    4
}
fn default_landmark_count() -> usize {
    5
}
fn default_landmark_min_distance() -> f64 {
    3.0
}
fn default_max_placement_attempts() -> usize {
    60
}
fn default_edge_margin() -> f64 {
    1.0
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 48,
            biome_table: default_biome_table(),
            biome_weights: None,
            settlement_names: Vec::new(),
            settlement_count: 8,
            min_settlement_distance: 6.0,
            major_fraction: 0.25,
            road_count: 4,
            landmark_count: 5,
            landmark_min_distance: 3.0,
            max_placement_attempts: 60,
            edge_margin: 1.0,
            noise: NoiseSettings::default(),
            names: NamePools::default(),
        }
    }
}

impl RegionConfig {
    /// Итоговая таблица весов: явные веса или встроенная таблица по имени.
    pub fn resolve_weights(&self) -> ConfigResult<BiomeWeights> {
        let weights = match &self.biome_weights {
            Some(w) => w.clone(),
            None => BiomeWeights::named(&self.biome_table)?,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        check_dimensions("region", self.width, self.height, 4)?;
        if !self.edge_margin.is_finite() || self.edge_margin < 0.0 {
            return Err(invalid(
                "edge_margin",
                format!("must be >= 0, got {}", self.edge_margin),
            ));
        }
        let short_side = f64::from(self.width.min(self.height));
        if self.edge_margin * 2.0 >= short_side {
            return Err(ConfigError::InvalidDimensions {
                what: "region",
                width: self.width,
                height: self.height,
                reason: format!("edge margin {} leaves no placeable area", self.edge_margin),
            });
        }
        for (name, value) in [
            ("min_settlement_distance", self.min_settlement_distance),
            ("landmark_min_distance", self.landmark_min_distance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(name, format!("must be >= 0, got {value}")));
            }
        }
        // Ориентиры держатся от поселений ближе, чем поселения друг от друга
        if self.landmark_min_distance > self.min_settlement_distance {
            return Err(invalid(
                "landmark_min_distance",
                format!(
                    "must not exceed min_settlement_distance ({}), got {}",
                    self.min_settlement_distance, self.landmark_min_distance
                ),
            ));
        }
        check_probability("major_fraction", self.major_fraction)?;
        for (name, count) in [
            ("settlement_count", self.settlement_count),
            ("settlement_names", self.settlement_names.len()),
            ("road_count", self.road_count),
            ("landmark_count", self.landmark_count),
        ] {
            if count > MAX_PLACED_OBJECTS {
                return Err(invalid(
                    name,
                    format!("must be at most {MAX_PLACED_OBJECTS}, got {count}"),
                ));
            }
        }
        if !(1..=MAX_PLACEMENT_ATTEMPTS).contains(&self.max_placement_attempts) {
            return Err(invalid(
                "max_placement_attempts",
                format!(
                    "must be in 1..={MAX_PLACEMENT_ATTEMPTS}, got {}",
                    self.max_placement_attempts
                ),
            ));
        }
        self.noise.validate()?;
        self.resolve_weights()?;
        Ok(())
    }
}

/// Тема подземелья: ключ встроенной темы или полностью описанная тема.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeSpec {
    Key(String),
    Custom(DungeonTheme),
}

impl Default for ThemeSpec {
    fn default() -> Self {
        ThemeSpec::Key("undead".to_string())
    }
}

/// Параметры подземелья.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DungeonConfig {
    /// Ширина сетки в клетках (по умолчанию 30)
    #[serde(default = "default_dungeon_width")]
    pub width: u32,

    /// Высота сетки в клетках (по умолчанию 20)
    #[serde(default = "default_dungeon_height")]
    pub height: u32,

    /// Глубина рекурсивного разбиения
    #[serde(default = "default_depth")]
    pub depth: u32,

    #[serde(default = "default_min_room_size")]
    pub min_room_size: u32,

    #[serde(default = "default_max_room_size")]
    pub max_room_size: u32,

    /// Вероятность поставить дверь в комнату
    #[serde(default = "default_door_chance")]
    pub door_chance: f64,

    /// Доля дверей, которые становятся потайными
    #[serde(default = "default_secret_door_chance")]
    pub secret_door_chance: f64,

    /// Доля промежуточных комнат, затопленных водой
    #[serde(default = "default_water_room_fraction")]
    pub water_room_fraction: f64,

    /// Вероятность объекта в достаточно большой комнате
    #[serde(default = "default_feature_chance")]
    pub feature_chance: f64,

    /// Минимальная площадь комнаты для объекта
    #[serde(default = "default_feature_min_area")]
    pub feature_min_area: u32,

    #[serde(default)]
    pub theme: ThemeSpec,

    /// Имя локации для заголовка
    #[serde(default)]
    pub location_name: Option<String>,
}

fn default_dungeon_width() -> u32 {
    30
}
fn default_dungeon_height() -> u32 {
    20
}
fn default_depth() -> u32 {
    4
}
fn default_min_room_size() -> u32 {
    4
}
fn default_max_room_size() -> u32 {
    10
}
fn default_door_chance() -> f64 {
    0.75
}
fn default_secret_door_chance() -> f64 {
    0.2
}
fn default_water_room_fraction() -> f64 {
    0.15
}
fn default_feature_chance() -> f64 {
    0.6
}
fn default_feature_min_area() -> u32 {
    16
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 20,
            depth: 4,
            min_room_size: 4,
            max_room_size: 10,
            door_chance: 0.75,
            secret_door_chance: 0.2,
            water_room_fraction: 0.15,
            feature_chance: 0.6,
            feature_min_area: 16,
            theme: ThemeSpec::default(),
            location_name: None,
        }
    }
}

impl DungeonConfig {
    /// Конфигурация по умолчанию со встроенной темой.
    pub fn for_theme(key: &str) -> ConfigResult<Self> {
        DungeonTheme::named(key)?;
        Ok(Self {
            theme: ThemeSpec::Key(key.to_string()),
            ..Self::default()
        })
    }

    pub fn resolve_theme(&self) -> ConfigResult<DungeonTheme> {
        match &self.theme {
            ThemeSpec::Key(key) => DungeonTheme::named(key),
            ThemeSpec::Custom(theme) => Ok(theme.clone()),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.min_room_size < 2 || self.min_room_size > self.max_room_size {
            return Err(ConfigError::InvalidRoomSize {
                min: self.min_room_size,
                max: self.max_room_size,
            });
        }
        // Комната плюс стена с каждой стороны
        check_dimensions("dungeon", self.width, self.height, self.min_room_size + 2)?;
        if self.depth > 16 {
            return Err(invalid("depth", format!("must be <= 16, got {}", self.depth)));
        }
        check_probability("door_chance", self.door_chance)?;
        check_probability("secret_door_chance", self.secret_door_chance)?;
        check_probability("water_room_fraction", self.water_room_fraction)?;
        check_probability("feature_chance", self.feature_chance)?;
        self.resolve_theme()?;
        Ok(())
    }
}

/// Запрос генерации целиком: то, что обычно лежит в TOML-файле.
///
/// ```toml
/// seed = "Embers of the Fallen Throne"
/// variation = 0
///
/// [region]
/// width = 64
/// height = 48
/// biome_table = "ancient"
/// settlement_names = ["Breachill", "Fortress Klazkoth"]
///
/// [dungeon]
/// theme = "undead"
/// location_name = "Breachill"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GenerationRequest {
    #[serde(default)]
    pub seed: SeedInput,

    #[serde(default)]
    pub variation: u32,

    #[serde(default)]
    pub region: RegionConfig,

    #[serde(default)]
    pub dungeon: DungeonConfig,
}

impl GenerationRequest {
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Загружает запрос из TOML-файла.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }
}

fn invalid(name: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidParameter { name, reason }
}

fn check_dimensions(what: &'static str, width: u32, height: u32, min_side: u32) -> ConfigResult<()> {
    let reason = if width == 0 || height == 0 {
        Some("dimensions must be non-zero".to_string())
    } else if width < min_side || height < min_side {
        Some(format!("each side must be at least {min_side}"))
    } else if width > MAX_GRID_SIDE || height > MAX_GRID_SIDE {
        Some(format!("each side must be at most {MAX_GRID_SIDE}"))
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ConfigError::InvalidDimensions {
            what,
            width,
            height,
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(RegionConfig::default().validate().is_ok());
        assert!(DungeonConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_dimensions_rejected() {
        let cfg = RegionConfig {
            width: 0,
            ..RegionConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidDimensions { what: "region", .. })
        ));
        let cfg = DungeonConfig {
            height: 0,
            ..DungeonConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidDimensions { what: "dungeon", .. })
        ));
    }

    #[test]
    fn min_room_above_max_rejected() {
        let cfg = DungeonConfig {
            min_room_size: 8,
            max_room_size: 5,
            ..DungeonConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidRoomSize { min: 8, max: 5 })
        );
    }

    #[test]
    fn unknown_tables_rejected() {
        let cfg = RegionConfig {
            biome_table: "lunar".to_string(),
            ..RegionConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::UnknownBiomeTable("lunar".to_string()))
        );
        let cfg = DungeonConfig {
            theme: ThemeSpec::Key("circus".to_string()),
            ..DungeonConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::UnknownTheme("circus".to_string()))
        );
    }

    #[test]
    fn bad_noise_rejected() {
        let mut cfg = RegionConfig::default();
        cfg.noise.octaves = 0;
        assert!(cfg.validate().is_err());
        cfg.noise.octaves = 4;
        cfg.noise.persistence = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn landmark_separation_not_above_settlement_separation() {
        let cfg = RegionConfig {
            min_settlement_distance: 4.0,
            landmark_min_distance: 5.0,
            ..RegionConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidParameter { name: "landmark_min_distance", .. })
        ));
        let equal = RegionConfig {
            landmark_min_distance: 4.0,
            ..cfg
        };
        assert!(equal.validate().is_ok());
    }

    #[test]
    fn placement_counts_are_capped() {
        let cfg = RegionConfig {
            settlement_count: usize::MAX,
            ..RegionConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidParameter { name: "settlement_count", .. })
        ));
        let cfg = RegionConfig {
            landmark_count: MAX_PLACED_OBJECTS + 1,
            ..RegionConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = RegionConfig {
            max_placement_attempts: 0,
            ..RegionConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = RegionConfig {
            settlement_count: MAX_PLACED_OBJECTS,
            ..RegionConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn moisture_offset_must_not_alias_lattice() {
        let mut noise = NoiseSettings::default();
        assert!(noise.validate().is_ok());
        for offset in [0.0, 256.0, 512.0, -768.0, 128.0, 64.0] {
            noise.moisture_offset = offset;
            assert!(
                matches!(
                    noise.validate(),
                    Err(ConfigError::InvalidParameter { name: "noise.moisture_offset", .. })
                ),
                "offset {offset} accepted"
            );
        }
        // 64 совпадает с решёткой только начиная с третьей октавы
        noise.octaves = 2;
        assert!(noise.validate().is_ok());
    }

    #[test]
    fn request_parses_from_toml() {
        let req = GenerationRequest::from_toml_str(
            r#"
            seed = "Embers of the Fallen Throne"
            variation = 2

            [region]
            biome_table = "ancient"
            settlement_names = ["Breachill", "Fortress Klazkoth"]

            [dungeon]
            width = 40
            theme = "cult"
            "#,
        )
        .unwrap();
        assert_eq!(req.variation, 2);
        assert_eq!(req.region.width, 64);
        assert_eq!(req.region.settlement_names.len(), 2);
        assert_eq!(req.dungeon.width, 40);
        assert_eq!(req.dungeon.height, 20);
        assert_eq!(req.dungeon.theme, ThemeSpec::Key("cult".to_string()));
        assert!(req.region.validate().is_ok());
        assert!(req.dungeon.validate().is_ok());
    }

    #[test]
    fn custom_theme_parses() {
        let req = GenerationRequest::from_toml_str(
            r#"
            [dungeon.theme]
            key = "mine"
            default_title = "The Old Mine"
            features = ["cart"]
            "#,
        )
        .unwrap();
        let theme = req.dungeon.resolve_theme().unwrap();
        assert_eq!(theme.key, "mine");
        assert_eq!(theme.features, vec!["cart".to_string()]);
    }

    #[test]
    fn garbage_toml_is_parse_error() {
        assert!(matches!(
            GenerationRequest::from_toml_str("seed = [1, 2"),
            Err(ConfigError::Parse(_))
        ));
    }
}
