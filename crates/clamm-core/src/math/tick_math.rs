//! # Tick Math
//!
//! Conversions between tick indexes and Q64.64 sqrt prices, bit-exact with the
//! pool program. A tick `t` maps to `sqrt(1.0001)^t * 2^64`.
//!
//! Positive ticks multiply Q96 powers of `sqrt(1.0001)` in a 256-bit
//! accumulator; negative ticks multiply Q64 powers of `1/sqrt(1.0001)` in a
//! 128-bit accumulator. The inverse takes a fixed-precision log2 and brackets
//! the result with precomputed error margins.

use ethnum::U256;

use crate::constants::{MAX_SQRT_PRICE, MAX_TICK, MIN_SQRT_PRICE, MIN_TICK, Q64};
use crate::errors::{CoreError, CoreResult};

/// sqrt(1.0001)^(2^i) in Q96, i = 0..19
const POSITIVE_TICK_FACTORS_X96: [u128; 19] = [
    79232123823359799118286999567,
    79236085330515764027303304731,
    79244008939048815603706035061,
    79259858533276714757314932305,
    79291567232598584799939703904,
    79355022692464371645785046466,
    79482085999252804386437311141,
    79736823300114093921829183326,
    80248749790819932309965073892,
    81282483887344747381513967011,
    83390072131320151908154831281,
    87770609709833776024991924138,
    97234110755111693312479820773,
    119332217159966728226237229890,
    179736315981702064433883588727,
    407748233172238350107850275304,
    2098478828474011932436660412517,
    55581415166113811149459800483533,
    38992368544603139932233054999993551,
];

/// (1/sqrt(1.0001))^(2^i) in Q64, i = 0..19
const NEGATIVE_TICK_FACTORS_X64: [u128; 19] = [
    18445821805675392311,
    18444899583751176498,
    18443055278223354162,
    18439367220385604838,
    18431993317065449817,
    18417254355718160513,
    18387811781193591352,
    18329067761203520168,
    18212142134806087854,
    17980523815641551639,
    17526086738831147013,
    16651378430235024244,
    15030750278693429944,
    12247334978882834399,
    8131365268884726200,
    3584323654723342297,
    696457651847595233,
    26294789957452057,
    37481735321082,
];

/// log_sqrt(1.0001)(2) in Q32.32 scaled to Q64 on multiplication
const LOG_B_2_X32: i128 = 59543866431248;

/// Rounds of squaring used for the fractional part of log2
const BIT_PRECISION: u32 = 14;

/// Lower error margin of the log estimate, Q64
const LOG_B_P_ERR_MARGIN_LOWER_X64: i128 = 184467440737095516;

/// Upper error margin of the log estimate, Q64
const LOG_B_P_ERR_MARGIN_UPPER_X64: i128 = 15793534762490258745;

/// Get the Q64.64 sqrt price at a tick index
pub fn sqrt_price_at_tick(tick: i32) -> CoreResult<u128> {
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(CoreError::OutOfRange);
    }

    if tick >= 0 {
        Ok(sqrt_price_at_positive_tick(tick as u32))
    } else {
        Ok(sqrt_price_at_negative_tick(tick.unsigned_abs()))
    }
}

fn sqrt_price_at_positive_tick(tick: u32) -> u128 {
    let mut ratio = if tick & 1 != 0 {
        U256::from(POSITIVE_TICK_FACTORS_X96[0])
    } else {
        U256::ONE << 96u32
    };

    for (bit, factor) in POSITIVE_TICK_FACTORS_X96.iter().enumerate().skip(1) {
        if tick & (1 << bit) != 0 {
            ratio = (ratio * U256::from(*factor)) >> 96u32;
        }
    }

    // ratio < 2^128 for every tick up to MAX_TICK
    (ratio >> 32u32).as_u128()
}

fn sqrt_price_at_negative_tick(abs_tick: u32) -> u128 {
    let mut ratio = if abs_tick & 1 != 0 {
        NEGATIVE_TICK_FACTORS_X64[0]
    } else {
        Q64
    };

    for (bit, factor) in NEGATIVE_TICK_FACTORS_X64.iter().enumerate().skip(1) {
        if abs_tick & (1 << bit) != 0 {
            // both factors are at most 2^64, so the product fits in u128
            ratio = (ratio * factor) >> 64;
        }
    }

    ratio
}

/// Get the greatest tick whose sqrt price is at or below `sqrt_price`
pub fn tick_at_sqrt_price(sqrt_price: u128) -> CoreResult<i32> {
    if !(MIN_SQRT_PRICE..=MAX_SQRT_PRICE).contains(&sqrt_price) {
        return Err(CoreError::OutOfRange);
    }

    // Integer part of log2, signed so prices below 1.0 need no inversion
    let msb = 127 - sqrt_price.leading_zeros();
    let log2_p_integer_x32 = ((msb as i128) - 64) << 32;

    // Fractional part by repeated squaring of the normalized mantissa
    let mut bit: u128 = 0x8000_0000_0000_0000;
    let mut log2_p_fraction_x64: u128 = 0;
    let mut r = if msb >= 64 {
        sqrt_price >> (msb - 63)
    } else {
        sqrt_price << (63 - msb)
    };

    for _ in 0..BIT_PRECISION {
        r *= r;
        let is_r_more_than_two = r >> 127;
        r >>= 63 + is_r_more_than_two as u32;
        log2_p_fraction_x64 += bit * is_r_more_than_two;
        bit >>= 1;
    }

    let log2_p_fraction_x32 = (log2_p_fraction_x64 >> 32) as i128;
    let log2_p_x32 = log2_p_integer_x32 + log2_p_fraction_x32;

    // Change of base to sqrt(1.0001)
    let logbp_x64 = log2_p_x32 * LOG_B_2_X32;

    let tick_low = ((logbp_x64 - LOG_B_P_ERR_MARGIN_LOWER_X64) >> 64) as i32;
    let tick_high = ((logbp_x64 + LOG_B_P_ERR_MARGIN_UPPER_X64) >> 64) as i32;

    if tick_low == tick_high {
        return Ok(tick_low);
    }

    // The estimate can be off by one; the exact forward map settles it
    if sqrt_price_at_tick(tick_high)? <= sqrt_price {
        Ok(tick_high)
    } else {
        Ok(tick_low)
    }
}
