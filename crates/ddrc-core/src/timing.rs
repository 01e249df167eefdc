//! Frequency-dependent unit arithmetic.
//!
//! All conversions use integer arithmetic with the same truncation the vendor
//! tool applies. The clock period itself is truncated, so every cycle count
//! derived from it inherits that rounding.

use serde::Serialize;

use crate::error::{CoreError, Result};

/// Sentinel meaning "parameter not applicable". Always converts to 0 cycles.
pub const NOT_APPLICABLE: i64 = -1;

/// Converts between picoseconds and DDR clock cycles at a fixed frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimingConverter {
    freq_hz: u32,
    clock_period_ps: i64,
}

impl TimingConverter {
    /// Create a converter for the given DDR clock.
    ///
    /// The period is `1e9 / (freq_hz / 1000)` with both divisions truncating.
    /// Frequencies below 1 kHz would divide by zero and are rejected.
    pub fn new(freq_hz: u32) -> Result<Self> {
        let khz = i64::from(freq_hz / 1000);
        if khz == 0 {
            return Err(CoreError::InvalidFrequency {
                freq_hz: u64::from(freq_hz),
            });
        }
        let clock_period_ps = 1_000_000_000 / khz;
        tracing::debug!(freq_hz, clock_period_ps, "timing converter ready");
        Ok(Self {
            freq_hz,
            clock_period_ps,
        })
    }

    /// DDR clock frequency in Hz.
    pub fn freq_hz(&self) -> u32 {
        self.freq_hz
    }

    /// Truncated clock period in picoseconds.
    pub fn clock_period_ps(&self) -> i64 {
        self.clock_period_ps
    }

    /// Ceiling conversion from picoseconds to cycles.
    ///
    /// Computes `(ps + divisor * period - 1) / period`. With `divisor == 1`
    /// this is a plain ceiling; refresh timing passes `divisor == 2` and then
    /// halves the result itself. Results beyond `i64` saturate.
    pub fn ps_to_cycles_ceil(&self, ps: i64, divisor: i64) -> i64 {
        if ps == NOT_APPLICABLE {
            return 0;
        }
        let period = i128::from(self.clock_period_ps);
        let cycles = (i128::from(ps) + i128::from(divisor) * period - 1).div_euclid(period);
        saturate(cycles)
    }

    /// Floor conversion from picoseconds to cycles.
    pub fn ps_to_cycles_floor(&self, ps: i64) -> i64 {
        if ps == NOT_APPLICABLE {
            return 0;
        }
        ps.div_euclid(self.clock_period_ps)
    }

    /// Saturates at the `i64` bounds.
    pub fn ns_to_ps(ns: i64) -> i64 {
        ns.saturating_mul(1000)
    }

    /// Saturates at the `i64` bounds.
    pub fn cycles_to_ps(&self, cycles: i64) -> i64 {
        cycles.saturating_mul(self.clock_period_ps)
    }
}

fn saturate(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value < 0 { i64::MIN } else { i64::MAX })
}
