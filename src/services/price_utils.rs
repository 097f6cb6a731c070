use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

pub const PRICE_DECIMALS: u32 = 8;
pub const PERCENT_DECIMALS: u32 = 2;

/// Round half-to-even through `Decimal` so that binary float noise
/// (e.g. 0.1 + 0.2) does not leak into the response.
/// Non-finite inputs collapse to zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

pub fn round_price(value: f64) -> f64 {
    round_to(value, PRICE_DECIMALS)
}

pub fn round_percent(value: f64) -> f64 {
    round_to(value, PERCENT_DECIMALS)
}

/// Absolute and percentage change from `reference` to `current`.
/// The percentage is 0 when `reference` is 0.
pub fn price_change(current: f64, reference: f64) -> (f64, f64) {
    let change = current - reference;
    let percent = if reference != 0.0 {
        change / reference * 100.0
    } else {
        0.0
    };
    (change, percent)
}

/// Integer part of the mean, 0 for an empty slice
pub fn mean_volume(volumes: &[u64]) -> u64 {
    if volumes.is_empty() {
        return 0;
    }
    let total: f64 = volumes.iter().map(|v| *v as f64).sum();
    (total / volumes.len() as f64) as u64
}
