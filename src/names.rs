//! Процедурные имена поселений и ориентиров
//!
//! Пулы передаются явно через конфигурацию, глобальных таблиц нет: два
//! параллельных прохода с разными пулами не мешают друг другу.

use serde::{Deserialize, Serialize};

use crate::seed::SequenceRng;

/// Сколько раз пытаемся получить ещё не занятое имя.
const UNIQUE_NAME_ATTEMPTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamePools {
    #[serde(default = "default_settlement_prefixes")]
    pub settlement_prefixes: Vec<String>,
    #[serde(default = "default_settlement_suffixes")]
    pub settlement_suffixes: Vec<String>,
    #[serde(default = "default_landmark_adjectives")]
    pub landmark_adjectives: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn default_settlement_prefixes() -> Vec<String> {
    strings(&[
        "Ash", "Black", "Bram", "Cold", "Dun", "Elder", "Fair", "Gold", "Grey", "Hollow", "Iron",
        "Kings", "Marsh", "Mill", "North", "Oak", "Raven", "Red", "Salt", "Stone", "Thorn",
        "West", "Whit", "Wolf",
    ])
}

fn default_settlement_suffixes() -> Vec<String> {
    strings(&[
        "bridge", "brook", "burg", "by", "cross", "dale", "fall", "field", "ford", "gate",
        "haven", "hold", "mere", "moor", "stead", "ton", "wick", "wood",
    ])
}

fn default_landmark_adjectives() -> Vec<String> {
    strings(&[
        "Broken", "Forgotten", "Hollow", "Shattered", "Silent", "Sunken", "Weeping", "Whispering",
        "Crimson", "Ashen",
    ])
}

impl Default for NamePools {
    fn default() -> Self {
        Self {
            settlement_prefixes: default_settlement_prefixes(),
            settlement_suffixes: default_settlement_suffixes(),
            landmark_adjectives: default_landmark_adjectives(),
        }
    }
}

impl NamePools {
    /// Имя поселения, не совпадающее с уже занятыми.
    ///
    /// Если за несколько попыток свободное имя не нашлось, к последнему
    /// варианту дописывается порядковый номер.
    pub fn settlement_name(&self, rng: &mut SequenceRng, taken: &[String]) -> String {
        let mut candidate = String::new();
        for _ in 0..UNIQUE_NAME_ATTEMPTS {
            let prefix = rng.pick(&self.settlement_prefixes).map_or("New", String::as_str);
            let suffix = rng.pick(&self.settlement_suffixes).map_or("ton", String::as_str);
            candidate = format!("{prefix}{suffix}");
            if !taken.contains(&candidate) {
                return candidate;
            }
        }
        let mut n = 2;
        loop {
            let numbered = format!("{candidate} {n}");
            if !taken.contains(&numbered) {
                return numbered;
            }
            n += 1;
        }
    }

    /// Имя ориентира вида «Прилагательное + Существительное».
    pub fn landmark_name(&self, rng: &mut SequenceRng, noun: &str) -> String {
        match rng.pick(&self.landmark_adjectives) {
            Some(adjective) => format!("{adjective} {noun}"),
            None => noun.to_string(),
        }
    }
}
