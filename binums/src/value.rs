//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! A number of any element type, stored as raw little-endian bytes next to
//! its type tag.
//!
//! All access goes through the tag: reading a value as `f64`, as `i64` or
//! as its raw bit pattern, and writing from `f64` or `i64`. Changing the
//! type of a value always goes through [`NumericValue::cast`].

use crate::element_type::ElementType;
use crate::error::{Error, Result};
use crate::fixed_layout::{FixedLayout, FIXED12_12, FIXED16_16, FIXED8_24};
use crate::float_layout::{self, FloatLayout, BFLOAT16, FLOAT16};
use crate::format::DisplayFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumericValue {
    bytes: [u8; 8],
    element_type: ElementType,
    pub flags: DisplayFlags,
}

/// How the bits of a supported type are interpreted.
enum Encoding {
    Unsigned,
    Signed,
    Bool,
    Float32,
    Float64,
    Layout(FloatLayout),
    Fixed(FixedLayout),
}

fn encoding(element_type: ElementType) -> Result<Encoding> {
    use ElementType::*;

    Ok(match element_type {
        Uint8 | Uint16 | Uint32 | Uint64 => Encoding::Unsigned,
        Int8 | Int16 | Int32 | Int64 => Encoding::Signed,
        Bool8 => Encoding::Bool,
        Float32 => Encoding::Float32,
        Float64 => Encoding::Float64,
        Float16 => Encoding::Layout(FLOAT16),
        Bfloat16 => Encoding::Layout(BFLOAT16),
        Fixed12_12 => Encoding::Fixed(FIXED12_12),
        Fixed16_16 => Encoding::Fixed(FIXED16_16),
        Fixed8_24 => Encoding::Fixed(FIXED8_24),
        Undefined | StringChar8 | Complex64 | Complex128 => {
            return Err(Error::UnsupportedType(element_type))
        }
    })
}

fn sign_extend(bits: u64, width: u32) -> i64 {
    let unused = 64 - width;
    ((bits << unused) as i64) >> unused
}

impl NumericValue {
    /// A zero of the given type.
    pub fn new(element_type: ElementType) -> Self {
        Self {
            bytes: [0; 8],
            element_type,
            flags: DisplayFlags::default(),
        }
    }

    pub fn from_f64(element_type: ElementType, value: f64) -> Result<Self> {
        let mut number = Self::new(element_type);
        number.write_from_f64(value)?;
        Ok(number)
    }

    pub fn from_i64(element_type: ElementType, value: i64) -> Result<Self> {
        let mut number = Self::new(element_type);
        number.write_from_i64(value)?;
        Ok(number)
    }

    pub fn from_raw_bits(element_type: ElementType, bits: u64) -> Result<Self> {
        let mut number = Self::new(element_type);
        number.write_raw_bits(bits)?;
        Ok(number)
    }

    pub fn with_flags(mut self, flags: DisplayFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// The bytes occupied by the value, least significant first.
    pub fn bytes(&self) -> &[u8] {
        let size = (self.element_type.byte_size() as usize).min(self.bytes.len());
        &self.bytes[..size]
    }

    fn load(&self) -> u64 {
        let bits = u64::from_le_bytes(self.bytes);
        match self.element_type.bit_size() {
            0 => 0,
            width if width >= 64 => bits,
            width => bits & ((1u64 << width) - 1),
        }
    }

    fn store(&mut self, bits: u64) {
        self.bytes = [0; 8];
        let size = self.bytes().len();
        self.bytes[..size].copy_from_slice(&bits.to_le_bytes()[..size]);
    }

    /// The bit pattern of the value, sign extended to 64 bits for signed,
    /// floating point and fixed point types.
    pub fn read_raw_bits(&self) -> Result<i64> {
        let bits = self.load();
        Ok(match encoding(self.element_type)? {
            Encoding::Unsigned | Encoding::Bool => bits as i64,
            _ => sign_extend(bits, self.element_type.bit_size()),
        })
    }

    pub fn read_as_f64(&self) -> Result<f64> {
        let bits = self.load();
        Ok(match encoding(self.element_type)? {
            Encoding::Unsigned => bits as f64,
            Encoding::Signed => sign_extend(bits, self.element_type.bit_size()) as f64,
            Encoding::Bool => (bits != 0) as u8 as f64,
            Encoding::Float32 => f32::from_bits(bits as u32) as f64,
            Encoding::Float64 => f64::from_bits(bits),
            Encoding::Layout(layout) => float_layout::to_f64(&layout, bits),
            Encoding::Fixed(layout) => layout.to_f64(bits as i64),
        })
    }

    /// The numeric value as an integer; fractions truncate toward zero.
    pub fn read_as_i64(&self) -> Result<i64> {
        let bits = self.load();
        Ok(match encoding(self.element_type)? {
            Encoding::Unsigned => bits as i64,
            Encoding::Signed => sign_extend(bits, self.element_type.bit_size()),
            Encoding::Bool => (bits != 0) as i64,
            Encoding::Fixed(layout) => layout.to_i64(bits as i64),
            Encoding::Float32 | Encoding::Float64 | Encoding::Layout(_) => {
                self.read_as_f64()? as i64
            }
        })
    }

    /// Reduced precision floats round to nearest even; integer and fixed
    /// point types truncate toward zero.
    pub fn write_from_f64(&mut self, value: f64) -> Result<()> {
        let bits = match encoding(self.element_type)? {
            Encoding::Unsigned if self.element_type == ElementType::Uint64 && value >= 0.0 => {
                value as u64
            }
            Encoding::Unsigned | Encoding::Signed => value as i64 as u64,
            Encoding::Bool => (value != 0.0) as u64,
            Encoding::Float32 => (value as f32).to_bits() as u64,
            Encoding::Float64 => value.to_bits(),
            Encoding::Layout(layout) => float_layout::from_f64(&layout, value),
            Encoding::Fixed(layout) => layout.from_f64(value) as u64,
        };
        self.store(bits);
        Ok(())
    }

    /// Integer types keep the low bits of `value`.
    pub fn write_from_i64(&mut self, value: i64) -> Result<()> {
        let bits = match encoding(self.element_type)? {
            Encoding::Unsigned | Encoding::Signed => value as u64,
            Encoding::Bool => (value != 0) as u64,
            Encoding::Float32 => (value as f32).to_bits() as u64,
            Encoding::Float64 => (value as f64).to_bits(),
            Encoding::Layout(layout) => float_layout::from_f64(&layout, value as f64),
            Encoding::Fixed(layout) => layout.from_i64(value) as u64,
        };
        self.store(bits);
        Ok(())
    }

    pub fn write_raw_bits(&mut self, bits: u64) -> Result<()> {
        encoding(self.element_type)?;
        self.store(bits);
        Ok(())
    }

    /// Convert to `output_type`. Fractional sources pass through `f64`,
    /// integral sources through `i64`; a cast to the same type copies the
    /// bytes unchanged.
    pub fn cast(&self, output_type: ElementType) -> Result<NumericValue> {
        encoding(self.element_type)?;
        let mut output = NumericValue::new(output_type).with_flags(self.flags);

        if output_type == self.element_type {
            output.bytes = self.bytes;
            return Ok(output);
        }

        if self.element_type.is_fractional() {
            let value = self.read_as_f64()?;
            if output_type.is_fractional() {
                output.write_from_f64(value)?;
            } else {
                output.write_from_i64(value as i64)?;
            }
        } else {
            let value = self.read_as_i64()?;
            if output_type.is_fractional() {
                output.write_from_f64(value as f64)?;
            } else {
                output.write_from_i64(value)?;
            }
        }

        log::trace!(
            "cast {} {:?} -> {} {:?}",
            self.element_type,
            self.bytes(),
            output_type,
            output.bytes()
        );
        Ok(output)
    }
}
