//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Arithmetic kernels, one native representation per arithmetic capable
//! element type. Operands are cast into the kernel's type before use and
//! results are written back as values of that type.

use std::num::Wrapping;
use std::ops::{Add, Mul, Sub};

use num_traits::{One, Zero};

use crate::element_type::ElementType;
use crate::error::{Error, Result};
use crate::fixed_layout::{FixedLayout, FIXED12_12, FIXED16_16, FIXED8_24};
use crate::float_layout::{self, FloatLayout, BFLOAT16, FLOAT16};
use crate::operation::OperationKind;
use crate::value::NumericValue;

pub trait Native:
    Copy + Zero + One + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self>
{
    const ELEMENT_TYPE: ElementType;

    fn read(value: &NumericValue) -> Result<Self>;
    fn write(self) -> Result<NumericValue>;
    fn quotient(self, divisor: Self) -> Result<Self>;
    /// Drop the fractional part.
    fn truncate(self) -> Self;
}

macro_rules! integer_native {
    ($t:ty, $element_type:expr) => {
        impl Native for Wrapping<$t> {
            const ELEMENT_TYPE: ElementType = $element_type;

            fn read(value: &NumericValue) -> Result<Self> {
                Ok(Wrapping(value.cast(Self::ELEMENT_TYPE)?.read_as_i64()? as $t))
            }

            fn write(self) -> Result<NumericValue> {
                NumericValue::from_i64(Self::ELEMENT_TYPE, self.0 as i64)
            }

            fn quotient(self, divisor: Self) -> Result<Self> {
                if divisor.0 == 0 {
                    return Err(Error::DivisionByZero(Self::ELEMENT_TYPE));
                }
                Ok(Wrapping(self.0.wrapping_div(divisor.0)))
            }

            fn truncate(self) -> Self {
                self
            }
        }
    };
}

integer_native!(u8, ElementType::Uint8);
integer_native!(i8, ElementType::Int8);
integer_native!(u16, ElementType::Uint16);
integer_native!(i16, ElementType::Int16);
integer_native!(u32, ElementType::Uint32);
integer_native!(i32, ElementType::Int32);
integer_native!(u64, ElementType::Uint64);
integer_native!(i64, ElementType::Int64);

macro_rules! float_native {
    ($t:ty, $element_type:expr) => {
        impl Native for $t {
            const ELEMENT_TYPE: ElementType = $element_type;

            fn read(value: &NumericValue) -> Result<Self> {
                Ok(value.cast(Self::ELEMENT_TYPE)?.read_as_f64()? as $t)
            }

            fn write(self) -> Result<NumericValue> {
                NumericValue::from_f64(Self::ELEMENT_TYPE, self as f64)
            }

            fn quotient(self, divisor: Self) -> Result<Self> {
                Ok(self / divisor)
            }

            fn truncate(self) -> Self {
                self.trunc()
            }
        }
    };
}

float_native!(f32, ElementType::Float32);
float_native!(f64, ElementType::Float64);

/// Reduced precision floats compute in `f32` and round every result back
/// to their own layout.
macro_rules! reduced_float_native {
    ($name:ident, $layout:expr, $element_type:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name(f32);

        impl $name {
            const LAYOUT: FloatLayout = $layout;

            fn round(value: f32) -> Self {
                let bits = float_layout::from_f64(&Self::LAYOUT, value as f64);
                Self(float_layout::to_f64(&Self::LAYOUT, bits) as f32)
            }
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self::round(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self::round(self.0 - rhs.0)
            }
        }

        impl Mul for $name {
            type Output = Self;

            fn mul(self, rhs: Self) -> Self {
                Self::round(self.0 * rhs.0)
            }
        }

        impl Zero for $name {
            fn zero() -> Self {
                Self(0.0)
            }

            fn is_zero(&self) -> bool {
                self.0 == 0.0
            }
        }

        impl One for $name {
            fn one() -> Self {
                Self(1.0)
            }
        }

        impl Native for $name {
            const ELEMENT_TYPE: ElementType = $element_type;

            fn read(value: &NumericValue) -> Result<Self> {
                Ok(Self(value.cast(Self::ELEMENT_TYPE)?.read_as_f64()? as f32))
            }

            fn write(self) -> Result<NumericValue> {
                NumericValue::from_f64(Self::ELEMENT_TYPE, self.0 as f64)
            }

            fn quotient(self, divisor: Self) -> Result<Self> {
                Ok(Self::round(self.0 / divisor.0))
            }

            fn truncate(self) -> Self {
                Self(self.0.trunc())
            }
        }
    };
}

reduced_float_native!(Float16, FLOAT16, ElementType::Float16);
reduced_float_native!(Bfloat16, BFLOAT16, ElementType::Bfloat16);

/// Fixed point kernels operate on the sign extended raw value.
macro_rules! fixed_native {
    ($name:ident, $layout:expr, $element_type:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(i64);

        impl $name {
            const LAYOUT: FixedLayout = $layout;
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(Self::LAYOUT.add(self.0, rhs.0))
            }
        }

        impl Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(Self::LAYOUT.sub(self.0, rhs.0))
            }
        }

        impl Mul for $name {
            type Output = Self;

            fn mul(self, rhs: Self) -> Self {
                Self(Self::LAYOUT.mul(self.0, rhs.0))
            }
        }

        impl Zero for $name {
            fn zero() -> Self {
                Self(0)
            }

            fn is_zero(&self) -> bool {
                self.0 == 0
            }
        }

        impl One for $name {
            fn one() -> Self {
                Self(Self::LAYOUT.from_i64(1))
            }
        }

        impl Native for $name {
            const ELEMENT_TYPE: ElementType = $element_type;

            fn read(value: &NumericValue) -> Result<Self> {
                Ok(Self(value.cast(Self::ELEMENT_TYPE)?.read_raw_bits()?))
            }

            fn write(self) -> Result<NumericValue> {
                NumericValue::from_raw_bits(Self::ELEMENT_TYPE, self.0 as u64)
            }

            fn quotient(self, divisor: Self) -> Result<Self> {
                Ok(Self(Self::LAYOUT.div(self.0, divisor.0)))
            }

            fn truncate(self) -> Self {
                Self(Self::LAYOUT.trunc(self.0))
            }
        }
    };
}

fixed_native!(Fixed12_12, FIXED12_12, ElementType::Fixed12_12);
fixed_native!(Fixed16_16, FIXED16_16, ElementType::Fixed16_16);
fixed_native!(Fixed8_24, FIXED8_24, ElementType::Fixed8_24);

fn dot<T: Native>(values: &[T]) -> T {
    values
        .chunks(2)
        .map(|pair| match pair {
            [a, b] => *a * *b,
            [a] => *a,
            _ => T::zero(),
        })
        .fold(T::zero(), |sum, product| sum + product)
}

/// Run `kind` over `operands` in the native type `T`.
pub fn apply<T: Native>(
    kind: OperationKind,
    operands: &[NumericValue],
) -> Result<Vec<NumericValue>> {
    let values = operands.iter().map(T::read).collect::<Result<Vec<T>>>()?;

    let results = match kind {
        OperationKind::Add => vec![values.iter().fold(T::zero(), |sum, v| sum + *v)],
        OperationKind::Subtract => vec![match values.split_first() {
            Some((first, rest)) => rest.iter().fold(*first, |difference, v| difference - *v),
            None => T::zero(),
        }],
        OperationKind::Multiply => vec![values.iter().fold(T::one(), |product, v| product * *v)],
        OperationKind::Divide => vec![match values.split_first() {
            Some((first, rest)) => rest
                .iter()
                .try_fold(*first, |quotient, v| quotient.quotient(*v))?,
            None => T::zero(),
        }],
        OperationKind::Dot => vec![dot(&values)],
        OperationKind::Truncate => values.iter().map(|v| v.truncate()).collect(),
        OperationKind::Nop => values,
        OperationKind::Nothing => Vec::new(),
    };

    results.into_iter().map(T::write).collect()
}
