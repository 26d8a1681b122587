use anyhow::Result;
use ethers::types::U256;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::constants::PROJECT_NAME;
use crate::errors::PriceError;

// rust_decimal keeps at most 28 fractional digits
const MAX_DECIMAL_SCALE: u32 = 28;

pub fn setup_logger() -> Result<()> {
    let colors = ColoredLevelConfig {
        trace: Color::Cyan,
        debug: Color::Magenta,
        info: Color::Green,
        warn: Color::Yellow,
        error: Color::BrightRed,
    };

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}[{}] {}",
                chrono::Local::now().format("[%H:%M:%S]"),
                colors.color(record.level()),
                message
            ))
        })
        .chain(std::io::stdout())
        .level(LevelFilter::Error)
        .level_for(PROJECT_NAME, LevelFilter::Info)
        .apply()?;

    Ok(())
}

/// Parses a decimal the way upstream APIs print them, plain or in exponent form.
pub fn parse_decimal(raw: &str) -> Result<Decimal, PriceError> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| PriceError::InvalidDecimal(raw.to_string()))
}

/// Converts raw integer base units into human-readable token units.
/// Precision beyond what `Decimal` can hold is truncated from the least significant end.
pub fn units_to_decimal(raw: U256, decimals: u8) -> Result<Decimal, PriceError> {
    let ten = U256::from(10u8);
    let i128_max = U256::from(i128::MAX as u128);
    let mut raw = raw;
    let mut scale = decimals as u32;

    while scale > MAX_DECIMAL_SCALE {
        raw /= ten;
        scale -= 1;
    }

    loop {
        if raw <= i128_max {
            if let Ok(value) = Decimal::try_from_i128_with_scale(raw.as_u128() as i128, scale) {
                return Ok(value.normalize());
            }
        }
        if scale == 0 {
            return Err(PriceError::InvalidDecimal(format!("{} overflows", raw)));
        }
        raw /= ten;
        scale -= 1;
    }
}

/// Rounds half away from zero to `digits` significant digits.
pub fn to_significant(value: Decimal, digits: u32) -> Decimal {
    if value.is_zero() {
        return Decimal::ZERO;
    }
    value
        .round_sf_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero)
        .unwrap_or(value)
        .normalize()
}

pub fn format_decimal(value: Decimal) -> String {
    value.normalize().to_string()
}
