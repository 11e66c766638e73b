//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

/// Signed two's complement fixed point number: `total_bits` wide, the low
/// `fraction_bits` holding the fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedLayout {
    pub integer_bits: u32,
    pub fraction_bits: u32,
    pub total_bits: u32,
}

pub const FIXED12_12: FixedLayout = FixedLayout {
    integer_bits: 12,
    fraction_bits: 12,
    total_bits: 24,
};

pub const FIXED16_16: FixedLayout = FixedLayout {
    integer_bits: 16,
    fraction_bits: 16,
    total_bits: 32,
};

pub const FIXED8_24: FixedLayout = FixedLayout {
    integer_bits: 8,
    fraction_bits: 24,
    total_bits: 32,
};

impl FixedLayout {
    pub fn scale(&self) -> f64 {
        (1u64 << self.fraction_bits) as f64
    }

    pub fn fraction_mask(&self) -> i64 {
        (1i64 << self.fraction_bits) - 1
    }

    /// Sign extend the low `total_bits` of `raw`.
    pub fn wrap(&self, raw: i64) -> i64 {
        let unused = 64 - self.total_bits;
        (raw << unused) >> unused
    }

    /// Float to raw, truncating toward zero.
    pub fn from_f64(&self, value: f64) -> i64 {
        self.wrap((value * self.scale()) as i64)
    }

    pub fn to_f64(&self, raw: i64) -> f64 {
        self.wrap(raw) as f64 / self.scale()
    }

    pub fn from_i64(&self, value: i64) -> i64 {
        self.wrap(value.wrapping_shl(self.fraction_bits))
    }

    /// Raw to integer, truncating toward zero.
    pub fn to_i64(&self, raw: i64) -> i64 {
        self.wrap(raw) / (1i64 << self.fraction_bits)
    }

    pub fn add(&self, a: i64, b: i64) -> i64 {
        self.wrap(a.wrapping_add(b))
    }

    pub fn sub(&self, a: i64, b: i64) -> i64 {
        self.wrap(a.wrapping_sub(b))
    }

    pub fn mul(&self, a: i64, b: i64) -> i64 {
        self.wrap(a.wrapping_mul(b) >> self.fraction_bits)
    }

    /// A zero divisor yields `i64::MAX` before narrowing.
    pub fn div(&self, a: i64, b: i64) -> i64 {
        let quotient = if b == 0 {
            i64::MAX
        } else {
            a.wrapping_shl(self.fraction_bits).wrapping_div(b)
        };
        self.wrap(quotient)
    }

    /// Clear the fraction bits, keeping the two's complement integer part.
    pub fn trunc(&self, raw: i64) -> i64 {
        self.wrap(raw & !self.fraction_mask())
    }
}
