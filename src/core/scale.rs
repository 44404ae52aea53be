use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Continuous scale mapping a domain onto a pixel range.
///
/// The range may be inverted (`range_start > range_end`) for y axes where
/// larger values sit higher on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        let (domain_start, domain_end) = domain;
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start: range.0,
            range_end: range.1,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let range_span = self.range_end - self.range_start;
        if range_span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / range_span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }
}

/// Discrete scale placing each key in an evenly spaced band.
///
/// Follows d3 `scaleBand` semantics with alignment 0.5: `step` is the
/// distance between band starts and `bandwidth` the drawn width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    keys: Vec<f64>,
    range_start: f64,
    range_end: f64,
    padding_inner: f64,
    padding_outer: f64,
}

impl BandScale {
    pub fn new(
        keys: Vec<f64>,
        range: (f64, f64),
        padding_inner: f64,
        padding_outer: f64,
    ) -> ChartResult<Self> {
        if keys.is_empty() {
            return Err(ChartError::InvalidData(
                "band scale requires at least one key".to_owned(),
            ));
        }
        if !(0.0..1.0).contains(&padding_inner) || !padding_outer.is_finite() || padding_outer < 0.0
        {
            return Err(ChartError::InvalidData(
                "band padding must satisfy 0 <= inner < 1 and outer >= 0".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() || range.1 <= range.0 {
            return Err(ChartError::InvalidData(
                "band range must be finite and increasing".to_owned(),
            ));
        }

        Ok(Self {
            keys,
            range_start: range.0,
            range_end: range.1,
            padding_inner,
            padding_outer,
        })
    }

    #[must_use]
    pub fn keys(&self) -> &[f64] {
        &self.keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        let n = self.keys.len() as f64;
        (self.range_end - self.range_start) / (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0)
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    fn offset(&self) -> f64 {
        let n = self.keys.len() as f64;
        let used = self.step() * (n - self.padding_inner);
        self.range_start + (self.range_end - self.range_start - used) * 0.5
    }

    /// Left edge of the band at `index`.
    #[must_use]
    pub fn band_start(&self, index: usize) -> f64 {
        self.offset() + self.step() * index as f64
    }

    #[must_use]
    pub fn band_center(&self, index: usize) -> f64 {
        self.band_start(index) + self.bandwidth() * 0.5
    }

    #[must_use]
    pub fn index_of(&self, key: f64) -> Option<usize> {
        self.keys.iter().position(|candidate| *candidate == key)
    }

    /// Fractional band index whose center sits at `pixel`.
    #[must_use]
    pub fn invert_index(&self, pixel: f64) -> f64 {
        let step = self.step();
        if step <= 0.0 {
            return 0.0;
        }
        (pixel - self.offset() - self.bandwidth() * 0.5) / step
    }
}

/// X scale for one chart: discrete bands or a continuous mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum XScale {
    Band(BandScale),
    Linear(LinearScale),
}

impl XScale {
    /// Pixel of the key's mark center; `None` for a key outside a band domain.
    #[must_use]
    pub fn map_key(&self, key: f64) -> Option<f64> {
        match self {
            Self::Band(band) => band.index_of(key).map(|idx| band.band_center(idx)),
            Self::Linear(linear) => Some(linear.map(key)),
        }
    }

    /// Domain value under `pixel`.
    ///
    /// For band scales this interpolates between the neighboring band keys,
    /// which keeps the result monotonic in `pixel`.
    #[must_use]
    pub fn invert(&self, pixel: f64) -> f64 {
        match self {
            Self::Band(band) => {
                let keys = band.keys();
                let last = keys.len() - 1;
                let position = band.invert_index(pixel).clamp(0.0, last as f64);
                let lower = position.floor() as usize;
                let upper = (lower + 1).min(last);
                let t = position - lower as f64;
                keys[lower] + (keys[upper] - keys[lower]) * t
            }
            Self::Linear(linear) => linear.invert(pixel),
        }
    }

    #[must_use]
    pub fn bandwidth(&self) -> Option<f64> {
        match self {
            Self::Band(band) => Some(band.bandwidth()),
            Self::Linear(_) => None,
        }
    }

    #[must_use]
    pub fn is_band(&self) -> bool {
        matches!(self, Self::Band(_))
    }
}
