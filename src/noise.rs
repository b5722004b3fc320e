//! Синтез шумовых полей
//!
//! `NoiseField` — тороидальная решётка случайных значений, выборка из которой
//! идёт билинейной интерполяцией со сглаживанием `3t² − 2t³` по обеим осям.
//! Фрактальная композиция (октавы) определена на уровне трейта, поэтому
//! одинаково работает и для альтернативного бэкенда на `fastnoise-lite`.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use serde::{Deserialize, Serialize};

use crate::seed::SequenceRng;

/// Размер решётки по умолчанию (степень двойки для бесшовного зацикливания).
pub const FIELD_SIZE: usize = 256;

/// Наибольшее значение f64 строго меньше 1.0.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON;

/// Источник двумерного шума со значениями в [0, 1).
pub trait NoiseSource: Sync {
    /// Значение в точке с дробными координатами.
    fn sample(&self, x: f64, y: f64) -> f64;

    /// Сумма `octaves` выборок с удвоением частоты и затуханием амплитуды на
    /// `persistence`, нормированная на суммарную амплитуду.
    fn fractal(&self, x: f64, y: f64, octaves: u32, persistence: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut norm = 0.0;
        for _ in 0..octaves.max(1) {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            norm += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }
        (total / norm).clamp(0.0, BELOW_ONE)
    }
}

/// Выбор реализации шума для региональной карты.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NoiseBackend {
    /// Решётка значений (`NoiseField`).
    #[default]
    Value,
    /// OpenSimplex2 из `fastnoise-lite`.
    Simplex,
}

/// Тороидальная решётка независимых значений из `SequenceRng`.
///
/// Создаётся один раз на проход генерации и после этого только читается.
#[derive(Debug, Clone)]
pub struct NoiseField {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl NoiseField {
    /// Заполняет решётку `FIELD_SIZE × FIELD_SIZE` построчно.
    pub fn new(rng: &mut SequenceRng) -> Self {
        Self::with_size(rng, FIELD_SIZE, FIELD_SIZE)
    }

    /// Размеры округляются вверх до степени двойки.
    pub fn with_size(rng: &mut SequenceRng, width: usize, height: usize) -> Self {
        let width = width.max(1).next_power_of_two();
        let height = height.max(1).next_power_of_two();
        let values = (0..width * height).map(|_| rng.next_f64()).collect();
        Self {
            width,
            height,
            values,
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Узел решётки с зацикливанием по обеим осям.
    fn lattice(&self, x: i64, y: i64) -> f64 {
        let xi = (x & (self.width as i64 - 1)) as usize;
        let yi = (y & (self.height as i64 - 1)) as usize;
        self.values[yi * self.width + xi]
    }
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

impl NoiseSource for NoiseField {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = smoothstep(x - x0);
        let ty = smoothstep(y - y0);
        let (ix, iy) = (x0 as i64, y0 as i64);

        let v00 = self.lattice(ix, iy);
        let v10 = self.lattice(ix + 1, iy);
        let v01 = self.lattice(ix, iy + 1);
        let v11 = self.lattice(ix + 1, iy + 1);

        let top = v00 + (v10 - v00) * tx;
        let bottom = v01 + (v11 - v01) * tx;
        (top + (bottom - top) * ty).clamp(0.0, BELOW_ONE)
    }
}

/// Обёртка над OpenSimplex2 с отображением [-1, 1] → [0, 1).
pub struct SimplexSource {
    noise: FastNoiseLite,
}

impl SimplexSource {
    /// Сид берётся из той же последовательности, что и решётка значений.
    pub fn new(rng: &mut SequenceRng) -> Self {
        let mut noise = FastNoiseLite::new();
        noise.set_seed(Some(rng.next_i32_seed()));
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        // Частота 1.0: масштаб задаёт вызывающая сторона, как и для решётки
        noise.set_frequency(Some(1.0));
        Self { noise }
    }
}

impl NoiseSource for SimplexSource {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let v = f64::from(self.noise.get_noise_2d(x as f32, y as f32));
        ((v + 1.0) * 0.5).clamp(0.0, BELOW_ONE)
    }
}

/// Создаёт источник шума выбранного бэкенда.
pub fn build_source(backend: NoiseBackend, rng: &mut SequenceRng) -> Box<dyn NoiseSource> {
    match backend {
        NoiseBackend::Value => Box::new(NoiseField::new(rng)),
        NoiseBackend::Simplex => Box::new(SimplexSource::new(rng)),
    }
}
