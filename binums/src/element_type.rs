//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! The closed set of numeric element types and their static properties.
//!
//! Every property lives in a table indexed by the type's ordinal. Lookups
//! by a raw ordinal never index out of bounds: anything past the end of a
//! table resolves to the `Undefined` entry.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ElementType {
    #[default]
    Undefined = 0,
    Float32 = 1,
    Uint8 = 2,
    Int8 = 3,
    Uint16 = 4,
    Int16 = 5,
    Int32 = 6,
    Int64 = 7,
    StringChar8 = 8,
    Bool8 = 9,
    Float16 = 10,
    Float64 = 11,
    Uint32 = 12,
    Uint64 = 13,
    Complex64 = 14,
    Complex128 = 15,
    Bfloat16 = 16,
    Fixed12_12 = 17,
    Fixed16_16 = 18,
    Fixed8_24 = 19,
}

const TYPE_COUNT: usize = 20;

/// Half-open range of bit positions, `begin` being the least significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BitRange {
    pub begin: u32,
    pub end: u32,
}

impl BitRange {
    const fn new(begin: u32, end: u32) -> Self {
        Self { begin, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Extract this field from `bits`, shifted down to bit zero.
    pub fn extract(&self, bits: u64) -> u64 {
        if self.is_empty() {
            return 0;
        }
        let shifted = bits >> self.begin;
        match self.len() {
            64 => shifted,
            len => shifted & ((1u64 << len) - 1),
        }
    }
}

/// How a type's bits split into fields. Unused fields are empty ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Substructure {
    pub fraction: BitRange,
    pub integer: BitRange,
    pub exponent: BitRange,
    pub sign: BitRange,
}

const fn fields(
    fraction: (u32, u32),
    integer: (u32, u32),
    exponent: (u32, u32),
    sign: (u32, u32),
) -> Substructure {
    Substructure {
        fraction: BitRange::new(fraction.0, fraction.1),
        integer: BitRange::new(integer.0, integer.1),
        exponent: BitRange::new(exponent.0, exponent.1),
        sign: BitRange::new(sign.0, sign.1),
    }
}

const NONE: (u32, u32) = (0, 0);

const ALL_TYPES: [ElementType; TYPE_COUNT] = [
    ElementType::Undefined,
    ElementType::Float32,
    ElementType::Uint8,
    ElementType::Int8,
    ElementType::Uint16,
    ElementType::Int16,
    ElementType::Int32,
    ElementType::Int64,
    ElementType::StringChar8,
    ElementType::Bool8,
    ElementType::Float16,
    ElementType::Float64,
    ElementType::Uint32,
    ElementType::Uint64,
    ElementType::Complex64,
    ElementType::Complex128,
    ElementType::Bfloat16,
    ElementType::Fixed12_12,
    ElementType::Fixed16_16,
    ElementType::Fixed8_24,
];

const NAMES: [&str; TYPE_COUNT] = [
    "undefined",
    "float32",
    "uint8",
    "int8",
    "uint16",
    "int16",
    "int32",
    "int64",
    "string8",
    "bool8",
    "float16",
    "float64",
    "uint32",
    "uint64",
    "complex64",
    "complex128",
    "bfloat16",
    "fixed12_12",
    "fixed16_16",
    "fixed8_24",
];

const BYTE_SIZES: [u32; TYPE_COUNT] = [0, 4, 1, 1, 2, 2, 4, 8, 0, 1, 2, 8, 4, 8, 8, 16, 2, 3, 4, 4];

const SIGNED: [bool; TYPE_COUNT] = [
    false, true, false, true, false, true, true, true, false, false, true, true, false, false, true,
    true, true, true, true, true,
];

const FRACTIONAL: [bool; TYPE_COUNT] = [
    false, true, false, false, false, false, false, false, false, false, true, true, false, false,
    true, true, true, true, true, true,
];

// Promotion rank, lowest first:
//   undefined bool8 string8 uint8 int8 uint16 int16 uint32 int32 uint64
//   int64 float16 float32 float64 complex64 complex128 bfloat16 fixed8_24
//   fixed12_12 fixed16_16
const PRIORITIES: [u8; TYPE_COUNT] = [
    0, 12, 3, 4, 5, 6, 8, 10, 2, 1, 11, 13, 7, 9, 14, 15, 16, 18, 19, 17,
];

const SUBSTRUCTURES: [Substructure; TYPE_COUNT] = [
    //     fraction   integer    exponent   sign
    fields(NONE, NONE, NONE, NONE),
    fields((0, 23), NONE, (23, 31), (31, 32)),
    fields(NONE, (0, 8), NONE, NONE),
    fields(NONE, (0, 7), NONE, (7, 8)),
    fields(NONE, (0, 16), NONE, NONE),
    fields(NONE, (0, 15), NONE, (15, 16)),
    fields(NONE, (0, 31), NONE, (31, 32)),
    fields(NONE, (0, 63), NONE, (63, 64)),
    fields(NONE, NONE, NONE, NONE),
    fields(NONE, (0, 8), NONE, NONE),
    fields((0, 10), NONE, (10, 15), (15, 16)),
    fields((0, 52), NONE, (52, 63), (63, 64)),
    fields(NONE, (0, 32), NONE, NONE),
    fields(NONE, (0, 64), NONE, NONE),
    fields(NONE, NONE, NONE, NONE),
    fields(NONE, NONE, NONE, NONE),
    fields((0, 7), NONE, (7, 15), (15, 16)),
    fields((0, 12), (12, 23), NONE, (23, 24)),
    fields((0, 16), (16, 31), NONE, (31, 32)),
    fields((0, 24), (24, 31), NONE, (31, 32)),
];

fn lookup<T: Copy>(table: &[T; TYPE_COUNT], ordinal: usize) -> T {
    table.get(ordinal).copied().unwrap_or(table[0])
}

impl ElementType {
    pub fn from_ordinal(ordinal: usize) -> ElementType {
        lookup(&ALL_TYPES, ordinal)
    }

    /// Look up a type by its display name.
    pub fn from_name(name: &str) -> Option<ElementType> {
        NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(ElementType::from_ordinal)
    }

    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        lookup(&NAMES, self.ordinal())
    }

    pub fn byte_size(self) -> u32 {
        lookup(&BYTE_SIZES, self.ordinal())
    }

    pub fn bit_size(self) -> u32 {
        self.byte_size() * 8
    }

    pub fn is_signed(self) -> bool {
        lookup(&SIGNED, self.ordinal())
    }

    pub fn is_fractional(self) -> bool {
        lookup(&FRACTIONAL, self.ordinal())
    }

    pub fn substructure(self) -> Substructure {
        lookup(&SUBSTRUCTURES, self.ordinal())
    }

    pub fn priority(self) -> u8 {
        lookup(&PRIORITIES, self.ordinal())
    }

    pub fn all() -> impl Iterator<Item = ElementType> {
        ALL_TYPES.into_iter()
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
