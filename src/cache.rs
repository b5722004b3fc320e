//! Кэш сгенерированных карт
//!
//! Ключ — (сид, вариация, хэш конфигурации). Сама генерация не требует
//! синхронизации; кэш — единственный разделяемый ресурс, поэтому он под `RwLock`.
//! Генерация выполняется вне блокировки: при гонке двух потоков за одним
//! ключом оба получат одинаковый результат, в кэше останется первый.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::trace;

use crate::config::{DungeonConfig, RegionConfig};
use crate::dungeon::{Dungeon, generate_dungeon};
use crate::error::{ConfigError, ConfigResult};
use crate::region::{RegionMap, generate_region};
use crate::seed::Seed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub seed: Seed,
    pub variation: u32,
    pub config_hash: u64,
}

impl CacheKey {
    pub fn new<C: Serialize>(seed: Seed, variation: u32, config: &C) -> ConfigResult<Self> {
        let bytes = serde_json::to_vec(config).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut hasher = DefaultHasher::new();
        bytes.hash(&mut hasher);
        Ok(Self {
            seed,
            variation,
            config_hash: hasher.finish(),
        })
    }
}

type Shelf<T> = RwLock<HashMap<CacheKey, Arc<T>>>;

#[derive(Debug, Default)]
pub struct MapCache {
    regions: Shelf<RegionMap>,
    dungeons: Shelf<Dungeon>,
}

fn get_or_generate<T>(
    shelf: &Shelf<T>,
    key: CacheKey,
    generate: impl FnOnce() -> ConfigResult<T>,
) -> ConfigResult<Arc<T>> {
    if let Some(hit) = shelf.read().get(&key) {
        trace!(target: "realmforge::cache", ?key, "попадание в кэш");
        return Ok(Arc::clone(hit));
    }
    let fresh = Arc::new(generate()?);
    let mut guard = shelf.write();
    Ok(Arc::clone(guard.entry(key).or_insert(fresh)))
}

impl MapCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(
        &self,
        seed: Seed,
        variation: u32,
        cfg: &RegionConfig,
    ) -> ConfigResult<Arc<RegionMap>> {
        let key = CacheKey::new(seed, variation, cfg)?;
        get_or_generate(&self.regions, key, || generate_region(seed, variation, cfg))
    }

    pub fn dungeon(
        &self,
        seed: Seed,
        variation: u32,
        cfg: &DungeonConfig,
    ) -> ConfigResult<Arc<Dungeon>> {
        let key = CacheKey::new(seed, variation, cfg)?;
        get_or_generate(&self.dungeons, key, || generate_dungeon(seed, variation, cfg))
    }

    /// Количество закэшированных регионов и подземелий.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.read().len() + self.dungeons.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.regions.write().clear();
        self.dungeons.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_request_hits_cache() {
        let cache = MapCache::new();
        let cfg = DungeonConfig::default();
        let a = cache.dungeon(Seed(1), 0, &cfg).unwrap();
        let b = cache.dungeon(Seed(1), 0, &cfg).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn different_config_is_different_entry() {
        let cache = MapCache::new();
        let cfg = RegionConfig::default();
        let other = RegionConfig {
            road_count: 1,
            ..RegionConfig::default()
        };
        let a = cache.region(Seed(1), 0, &cfg).unwrap();
        let b = cache.region(Seed(1), 0, &other).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        let c = cache.region(Seed(1), 1, &cfg).unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 3);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = MapCache::new();
        let cfg = DungeonConfig {
            width: 0,
            ..DungeonConfig::default()
        };
        assert!(cache.dungeon(Seed(1), 0, &cfg).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn shared_across_threads() {
        let cache = Arc::new(MapCache::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache
                        .dungeon(Seed(i % 2), 0, &DungeonConfig::default())
                        .map(|d| d.rooms.len())
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap().is_ok());
        }
        assert_eq!(cache.len(), 2);
    }
}
