//! Ошибки конфигурации
//!
//! Генерация сама по себе не падает: размещение объектов работает по схеме
//! «несколько попыток, затем пропуск». Единственный класс ошибок — неверная
//! конфигурация, которая отклоняется до первого обращения к генератору случайных чисел.

use thiserror::Error;

/// Ошибки, возникающие при проверке или загрузке конфигурации.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Нулевой или слишком маленький размер сетки.
    #[error("invalid {what} dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        /// Какая сетка проверялась (region / dungeon).
        what: &'static str,
        width: u32,
        height: u32,
        reason: String,
    },

    /// Минимальный размер комнаты больше максимального или меньше допустимого.
    #[error("invalid room size range: min {min}, max {max}")]
    InvalidRoomSize { min: u32, max: u32 },

    /// Вероятность или доля вне диапазона [0, 1].
    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    /// Неверный числовой параметр (расстояние, масштаб шума и т.п.).
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Неизвестная тема подземелья.
    #[error("unknown dungeon theme: {0}")]
    UnknownTheme(String),

    /// Неизвестная таблица весов биомов.
    #[error("unknown biome weight table: {0}")]
    UnknownBiomeTable(String),

    /// Не удалось прочитать файл конфигурации.
    #[error("failed to read config file {path}: {reason}")]
    Io { path: String, reason: String },

    /// Файл конфигурации не разобран.
    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Результат операций, которые проверяют конфигурацию.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Проверяет, что значение лежит в [0, 1].
pub(crate) fn check_probability(name: &'static str, value: f64) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_bounds_are_inclusive() {
        assert!(check_probability("p", 0.0).is_ok());
        assert!(check_probability("p", 1.0).is_ok());
        assert!(check_probability("p", f64::NAN).is_err());
        assert_eq!(
            check_probability("door_chance", 1.5),
            Err(ConfigError::ProbabilityOutOfRange {
                name: "door_chance",
                value: 1.5
            })
        );
    }

    #[test]
    fn messages_are_descriptive() {
        let err = ConfigError::InvalidRoomSize { min: 8, max: 4 };
        assert_eq!(err.to_string(), "invalid room size range: min 8, max 4");
    }
}
