use serde::{Deserialize, Serialize};

use crate::core::format::{format_by_magnitude, short_year_label};
use crate::core::series::TickFormat;

/// One axis tick: domain position and display text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// Tick count that fits `axis_span_px` at roughly `target_spacing_px` apart.
#[must_use]
pub fn axis_tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

/// Round-number ticks covering `[start, stop]`, in the style of d3 `ticks`.
#[must_use]
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !start.is_finite() || !stop.is_finite() || count == 0 {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let (lo, hi, reversed) = if stop < start {
        (stop, start, true)
    } else {
        (start, stop, false)
    };
    let Some((i1, i2, inc)) = tick_spec(lo, hi, count as f64) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }

    let mut ticks: Vec<f64> = (i1..=i2)
        .map(|i| {
            if inc < 0.0 {
                i as f64 / -inc
            } else {
                i as f64 * inc
            }
        })
        .collect();
    if reversed {
        ticks.reverse();
    }
    ticks
}

fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
    let step = (stop - start) / count.max(0.0);
    if !step.is_finite() || step == 0.0 {
        return None;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    let (i1, i2, inc) = if power < 0.0 {
        let inc = 10f64.powf(-power) / factor;
        let mut i1 = (start * inc).round() as i64;
        let mut i2 = (stop * inc).round() as i64;
        if (i1 as f64) / inc < start {
            i1 += 1;
        }
        if (i2 as f64) / inc > stop {
            i2 -= 1;
        }
        (i1, i2, -inc)
    } else {
        let inc = 10f64.powf(power) * factor;
        let mut i1 = (start / inc).round() as i64;
        let mut i2 = (stop / inc).round() as i64;
        if (i1 as f64) * inc < start {
            i1 += 1;
        }
        if (i2 as f64) * inc > stop {
            i2 -= 1;
        }
        (i1, i2, inc)
    };

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    if !inc.is_finite() || inc == 0.0 {
        return None;
    }
    Some((i1, i2, inc))
}

/// Y-axis ticks: explicit values inside the domain, or nice ticks.
#[must_use]
pub fn value_ticks(domain: (f64, f64), count: usize, explicit: Option<&[f64]>) -> Vec<Tick> {
    let values: Vec<f64> = match explicit {
        Some(values) if !values.is_empty() => {
            let (lo, hi) = (domain.0.min(domain.1), domain.0.max(domain.1));
            values
                .iter()
                .copied()
                .filter(|value| value.is_finite() && *value >= lo && *value <= hi)
                .collect()
        }
        _ => nice_ticks(domain.0, domain.1, count),
    };

    let max_abs = domain.0.abs().max(domain.1.abs());
    values
        .into_iter()
        .map(|value| Tick {
            value,
            label: format_by_magnitude(value, max_abs),
        })
        .collect()
}

/// Evenly thins `len` indices down to at most `count`, always keeping the last one.
#[must_use]
pub fn thin_indices(len: usize, count: usize) -> Vec<usize> {
    if len == 0 || count == 0 {
        return Vec::new();
    }
    if len <= count {
        return (0..len).collect();
    }

    let stride = len.div_ceil(count);
    let mut indices: Vec<usize> = (0..len).step_by(stride).collect();
    let last = len - 1;
    let tail_index = indices.len() - 1;
    let tail = indices[tail_index];
    if tail != last {
        // Swap the final sampled tick for the real last one when they would crowd.
        if last - tail < stride / 2 {
            indices[tail_index] = last;
        } else {
            indices.push(last);
        }
    }
    indices
}

/// Formats a key label for an x tick.
#[must_use]
pub fn format_x_label(label: &str, format: TickFormat, axis_max_abs: f64) -> String {
    match format {
        TickFormat::Label => label.to_owned(),
        TickFormat::ShortYear => short_year_label(label),
        TickFormat::Magnitude => label
            .trim()
            .parse::<f64>()
            .map(|value| format_by_magnitude(value, axis_max_abs))
            .unwrap_or_else(|_| label.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::{axis_tick_target_count, nice_ticks, thin_indices, value_ticks};

    #[test]
    fn nice_ticks_land_on_round_numbers() {
        assert_eq!(nice_ticks(0.0, 27.0, 5), vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0]);
        assert_eq!(nice_ticks(0.0, 1.0, 4), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn explicit_ticks_outside_domain_are_dropped() {
        let ticks = value_ticks((0.0, 50.0), 5, Some(&[0.0, 25.0, 75.0]));
        let values: Vec<f64> = ticks.iter().map(|tick| tick.value).collect();
        assert_eq!(values, vec![0.0, 25.0]);
    }

    #[test]
    fn target_count_is_clamped() {
        assert_eq!(axis_tick_target_count(0.0, 50.0, 2, 8), 2);
        assert_eq!(axis_tick_target_count(1000.0, 50.0, 2, 8), 8);
        assert_eq!(axis_tick_target_count(200.0, 50.0, 2, 8), 5);
    }

    #[test]
    fn thinning_keeps_first_and_last() {
        let indices = thin_indices(20, 6);
        assert_eq!(indices.first(), Some(&0));
        assert_eq!(indices.last(), Some(&19));
        assert!(indices.len() <= 7);
        assert_eq!(thin_indices(3, 6), vec![0, 1, 2]);
    }
}
