pub mod biome;
pub mod cache;
pub mod config;
pub mod dungeon;
pub mod error;
pub mod geometry;
pub mod names;
pub mod noise;
pub mod preview;
pub mod region;
pub mod seed;

pub use biome::{Biome, BiomeWeights};
pub use cache::MapCache;
pub use config::{DungeonConfig, GenerationRequest, NoiseSettings, RegionConfig, ThemeSpec};
pub use dungeon::{Dungeon, DungeonCell, DungeonTheme, Room, RoomRole, generate_dungeon};
pub use error::{ConfigError, ConfigResult};
pub use noise::{NoiseBackend, NoiseField, NoiseSource};
pub use region::{RegionMap, generate_region};
pub use seed::{Seed, SeedInput, SequenceRng};
