//! Биомы и их классификация по высоте и влажности
//!
//! Таблицы весов сдвигают пороги, сам порядок проверок фиксирован.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Biome {
    DeepWater,
    ShallowWater,
    Tundra,
    Desert,
    Plains,
    Grassland,
    Hills,
    Forest,
    Swamp,
    Mountain,
    SnowPeak,
}

impl Biome {
    /// Любая вода (на ней не ставятся поселения и ориентиры).
    #[must_use]
    pub fn is_water(self) -> bool {
        matches!(self, Biome::DeepWater | Biome::ShallowWater)
    }

    pub fn to_rgb(&self) -> [u8; 3] {
        match self {
            Biome::DeepWater => [0, 48, 110],
            Biome::ShallowWater => [40, 100, 170],
            Biome::Tundra => [200, 220, 180],
            Biome::Desert => [210, 190, 120],
            Biome::Plains => [170, 200, 110],
            Biome::Grassland => [130, 190, 90],
            Biome::Hills => [150, 150, 95],
            Biome::Forest => [50, 115, 55],
            Biome::Swamp => [80, 100, 60],
            Biome::Mountain => [140, 135, 130],
            Biome::SnowPeak => [235, 240, 250],
        }
    }
}

/// Таблица весов биомов: смещает пороги классификации под тему кампании.
///
/// `1.0` — нейтрально, больше — биом встречается чаще.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeWeights {
    #[serde(default = "default_weight")]
    pub water: f64,
    #[serde(default = "default_weight")]
    pub mountain: f64,
    #[serde(default = "default_weight")]
    pub forest: f64,
    #[serde(default = "default_weight")]
    pub swamp: f64,
    #[serde(default = "default_weight")]
    pub desert: f64,
    #[serde(default = "default_weight")]
    pub tundra: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Default for BiomeWeights {
    fn default() -> Self {
        Self {
            water: 1.0,
            mountain: 1.0,
            forest: 1.0,
            swamp: 1.0,
            desert: 1.0,
            tundra: 1.0,
        }
    }
}

impl BiomeWeights {
    /// Имена встроенных таблиц.
    pub const PRESETS: [&'static str; 7] = [
        "default",
        "ancient",
        "wilderness",
        "frozen",
        "desert",
        "coastal",
        "swamp",
    ];

    /// Встроенная таблица по имени категории.
    ///
    /// ```
    /// use realmforge::biome::BiomeWeights;
    /// assert!(BiomeWeights::named("ancient").is_ok());
    /// assert!(BiomeWeights::named("nope").is_err());
    /// ```
    pub fn named(name: &str) -> ConfigResult<Self> {
        let base = Self::default();
        let weights = match name {
            "default" => base,
            // Руины древних империй: больше гор и пустошей
            "ancient" => Self {
                mountain: 1.25,
                desert: 1.2,
                forest: 0.9,
                ..base
            },
            "wilderness" => Self {
                forest: 1.4,
                swamp: 1.2,
                desert: 0.7,
                ..base
            },
            "frozen" => Self {
                tundra: 2.5,
                mountain: 1.2,
                desert: 0.8,
                ..base
            },
            "desert" => Self {
                desert: 1.5,
                water: 0.8,
                forest: 0.6,
                ..base
            },
            "coastal" => Self {
                water: 1.25,
                mountain: 0.8,
                ..base
            },
            "swamp" => Self {
                swamp: 2.5,
                forest: 1.2,
                ..base
            },
            other => return Err(ConfigError::UnknownBiomeTable(other.to_string())),
        };
        Ok(weights)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let fields = [
            ("water", self.water),
            ("mountain", self.mountain),
            ("forest", self.forest),
            ("swamp", self.swamp),
            ("desert", self.desert),
            ("tundra", self.tundra),
        ];
        for (name, w) in fields {
            if !w.is_finite() || w <= 0.0 || w > 4.0 {
                return Err(ConfigError::InvalidParameter {
                    name: "biome_weights",
                    reason: format!("{name} weight must be in (0, 4], got {w}"),
                });
            }
        }
        Ok(())
    }
}

/// Пороги классификации, вычисленные из весов.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub deep_water: f64,
    pub water: f64,
    pub hills: f64,
    pub mountain: f64,
    pub snow: f64,
    pub wet: f64,
    pub dry: f64,
    pub swamp_band: f64,
    pub tundra_band: f64,
}

impl Thresholds {
    #[must_use]
    pub fn from_weights(w: &BiomeWeights) -> Self {
        let water = (0.36 * w.water).clamp(0.05, 0.6);
        let mountain = (1.0 - 0.32 * w.mountain).clamp(water + 0.1, 0.95);
        Self {
            deep_water: water * 0.65,
            water,
            hills: mountain - 0.07,
            mountain,
            snow: (mountain + 0.08).min(0.98),
            wet: (1.0 - 0.42 * w.forest).clamp(0.3, 0.9),
            dry: (0.40 * w.desert).clamp(0.05, 0.6),
            swamp_band: 0.06 * w.swamp,
            tundra_band: 0.08 * w.tundra,
        }
    }
}

/// Назначает биом по высоте и влажности в фиксированном порядке приоритетов:
/// вода, горы, влажные, сухие, равнины.
#[must_use]
pub fn classify(elevation: f64, moisture: f64, t: &Thresholds) -> Biome {
    if elevation < t.water {
        return if elevation < t.deep_water {
            Biome::DeepWater
        } else {
            Biome::ShallowWater
        };
    }

    if elevation > t.snow {
        return Biome::SnowPeak;
    }
    if elevation > t.mountain {
        return Biome::Mountain;
    }

    if moisture > t.wet {
        if elevation < t.water + t.swamp_band {
            Biome::Swamp
        } else {
            Biome::Forest
        }
    } else if moisture < t.dry {
        if elevation < t.water + t.tundra_band {
            Biome::Tundra
        } else {
            Biome::Desert
        }
    } else if elevation > t.hills {
        Biome::Hills
    } else if moisture > 0.5 {
        Biome::Grassland
    } else {
        Biome::Plains
    }
}
