//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Conversion between arbitrary IEEE-like floating point bit layouts.
//!
//! A layout stores its fields from the least significant bit upward as
//! `[fraction | exponent | sign]`. All conversions go through [`convert`],
//! which works on raw bit patterns held in a `u64`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Drop the bits shifted out.
    Truncate,
    /// Round to nearest, ties to even.
    NearestEven,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatLayout {
    pub fraction_bits: u32,
    pub exponent_bits: u32,
    pub has_sign: bool,
    pub has_subnormals: bool,
    pub has_infinity: bool,
    pub has_nan: bool,
}

const fn ieee(fraction_bits: u32, exponent_bits: u32) -> FloatLayout {
    FloatLayout {
        fraction_bits,
        exponent_bits,
        has_sign: true,
        has_subnormals: true,
        has_infinity: true,
        has_nan: true,
    }
}

pub const FLOAT64: FloatLayout = ieee(52, 11);
pub const FLOAT32: FloatLayout = ieee(23, 8);
pub const FLOAT16: FloatLayout = ieee(10, 5);
pub const BFLOAT16: FloatLayout = ieee(7, 8);
pub const FLOAT8_E5M2: FloatLayout = ieee(2, 5);

/// OCP float8 e4m3: no infinity, and the only NaN encoding is S.1111.111,
/// which leaves S.1111.110 (448) as the largest finite value.
pub const FLOAT8_E4M3: FloatLayout = FloatLayout {
    fraction_bits: 3,
    exponent_bits: 4,
    has_sign: true,
    has_subnormals: true,
    has_infinity: false,
    has_nan: true,
};

impl FloatLayout {
    pub const fn total_bits(&self) -> u32 {
        self.fraction_bits + self.exponent_bits + self.has_sign as u32
    }

    pub const fn fraction_mask(&self) -> u64 {
        (1u64 << self.fraction_bits) - 1
    }

    pub const fn exponent_mask(&self) -> u64 {
        ((1u64 << self.exponent_bits) - 1) << self.fraction_bits
    }

    /// Mask covering both the fraction and the exponent fields.
    pub const fn magnitude_mask(&self) -> u64 {
        self.fraction_mask() | self.exponent_mask()
    }

    pub const fn sign_mask(&self) -> u64 {
        if self.has_sign {
            1u64 << (self.total_bits() - 1)
        } else {
            0
        }
    }

    pub const fn bias(&self) -> i64 {
        (1i64 << (self.exponent_bits - 1)) - 1
    }

    /// Largest biased exponent that still encodes a finite value.
    const fn max_biased_exponent(&self) -> i64 {
        let all_ones = (1i64 << self.exponent_bits) - 1;
        if self.has_infinity {
            all_ones - 1
        } else {
            all_ones
        }
    }

    /// Largest magnitude pattern that is not a NaN. For layouts with
    /// infinity this is the infinity encoding itself.
    pub const fn max_legal(&self) -> u64 {
        if self.has_infinity {
            self.exponent_mask()
        } else if self.has_nan {
            self.magnitude_mask() - 1
        } else {
            self.magnitude_mask()
        }
    }

    /// Smallest magnitude pattern that decodes as a NaN.
    pub const fn min_nan(&self) -> u64 {
        if self.has_infinity {
            self.exponent_mask() + 1
        } else {
            self.magnitude_mask()
        }
    }

    /// Canonical quiet NaN magnitude (top fraction bit set).
    pub const fn quiet_nan(&self) -> u64 {
        if self.has_infinity {
            self.exponent_mask() | (1u64 << (self.fraction_bits - 1))
        } else {
            self.magnitude_mask()
        }
    }

    pub const fn is_nan(&self, bits: u64) -> bool {
        self.has_nan && (bits & self.magnitude_mask()) >= self.min_nan()
    }
}

/// Shift `value` right by `shift` bits, rounding the discarded bits away
/// according to `rounding`.
pub fn shift_right_rounded(value: u64, shift: u32, rounding: Rounding) -> u64 {
    if shift == 0 {
        return value;
    }
    if shift > 64 {
        return 0;
    }

    let value = value as u128;
    let quotient = value >> shift;
    match rounding {
        Rounding::Truncate => quotient as u64,
        Rounding::NearestEven => {
            let remainder = value & ((1u128 << shift) - 1);
            let half = 1u128 << (shift - 1);
            if remainder > half || (remainder == half && quotient & 1 == 1) {
                (quotient + 1) as u64
            } else {
                quotient as u64
            }
        }
    }
}

fn shift_rounded(value: u64, shift: i64, rounding: Rounding) -> u64 {
    if shift >= 0 {
        shift_right_rounded(value, shift as u32, rounding)
    } else {
        value << (-shift) as u32
    }
}

/// Convert the raw pattern `bits` from the `source` layout to the `target`
/// layout.
///
/// Zero, NaN and infinity are carried across explicitly. Finite values
/// whose exponent is too large saturate to the target's largest legal
/// pattern (infinity when the target has one). Values too small for a
/// normal target exponent become subnormals, or signed zero when the target
/// does not support subnormals. Source subnormals are read as zero when the
/// source layout does not support them.
pub fn convert(source: &FloatLayout, target: &FloatLayout, bits: u64, rounding: Rounding) -> u64 {
    let negative = source.has_sign && bits & source.sign_mask() != 0;
    let sign = if negative { target.sign_mask() } else { 0 };
    let magnitude = bits & source.magnitude_mask();

    if magnitude == 0 {
        return sign;
    }

    if source.is_nan(magnitude) {
        if target.has_nan {
            return sign | target.quiet_nan();
        }
        return sign | target.max_legal();
    }

    if negative && !target.has_sign {
        return 0;
    }

    if source.has_infinity && magnitude == source.max_legal() {
        return sign | target.max_legal();
    }

    // Layouts sharing exponent width and sign only differ in fraction
    // length, so the exponent field lines up after a plain shift.
    if source.exponent_bits == target.exponent_bits
        && source.has_sign == target.has_sign
        && source.has_infinity == target.has_infinity
        && source.has_subnormals == target.has_subnormals
    {
        let shift = source.fraction_bits as i64 - target.fraction_bits as i64;
        let shifted = shift_rounded(magnitude, shift, rounding);
        return sign | shifted.min(target.max_legal());
    }

    let fraction = magnitude & source.fraction_mask();
    let biased_exponent = (magnitude >> source.fraction_bits) as i64;

    // Normalise so that significand carries an explicit leading one at bit
    // `source.fraction_bits` and the value is
    // significand * 2^(exponent - source.fraction_bits).
    let (significand, exponent) = if biased_exponent == 0 {
        if !source.has_subnormals {
            return sign;
        }
        let leading_one = 63 - fraction.leading_zeros();
        let normalise = source.fraction_bits - leading_one;
        (fraction << normalise, 1 - source.bias() - normalise as i64)
    } else {
        (
            fraction | (1u64 << source.fraction_bits),
            biased_exponent - source.bias(),
        )
    };

    let target_exponent = exponent + target.bias();
    let fraction_shift = source.fraction_bits as i64 - target.fraction_bits as i64;

    if target_exponent >= 1 {
        let mut exponent = target_exponent;
        let mut significand = shift_rounded(significand, fraction_shift, rounding);
        if significand >> (target.fraction_bits + 1) != 0 {
            significand >>= 1;
            exponent += 1;
        }
        if exponent > target.max_biased_exponent() {
            return sign | target.max_legal();
        }
        let result =
            ((exponent as u64) << target.fraction_bits) | (significand & target.fraction_mask());
        return sign | result.min(target.max_legal());
    }

    if !target.has_subnormals {
        return sign;
    }

    // Subnormal target: value = fraction * 2^(1 - bias - target.fraction_bits).
    // A fraction that rounds up to 1 << fraction_bits lands on the smallest
    // normal, which is exactly its encoding.
    let subnormal = shift_rounded(significand, fraction_shift + 1 - target_exponent, rounding);
    sign | subnormal
}

pub fn to_f64(layout: &FloatLayout, bits: u64) -> f64 {
    f64::from_bits(convert(layout, &FLOAT64, bits, Rounding::Truncate))
}

pub fn from_f64(layout: &FloatLayout, value: f64) -> u64 {
    convert(&FLOAT64, layout, value.to_bits(), Rounding::NearestEven)
}
