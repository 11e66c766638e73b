//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::num::Wrapping;

use crate::element_type::ElementType;
use crate::error::{Error, Result};
use crate::kernel::{self, Bfloat16, Fixed12_12, Fixed16_16, Fixed8_24, Float16};
use crate::value::NumericValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Nop,
    Add,
    Subtract,
    Multiply,
    Divide,
    Dot,
    Truncate,
    Nothing,
}

impl OperationKind {
    pub fn name(self) -> &'static str {
        match self {
            OperationKind::Nop => "nop",
            OperationKind::Add => "add",
            OperationKind::Subtract => "subtract",
            OperationKind::Multiply => "multiply",
            OperationKind::Divide => "divide",
            OperationKind::Dot => "dot",
            OperationKind::Truncate => "truncate",
            OperationKind::Nothing => "nothing",
        }
    }

    /// Operations producing one result per operand.
    pub fn is_elementwise(self) -> bool {
        matches!(self, OperationKind::Nop | OperationKind::Truncate)
    }
}

/// Half-open `[begin, end)` range of operand indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub begin: usize,
    pub end: usize,
}

impl Range {
    pub fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end, "range begins after it ends");
        Self { begin, end }
    }

    pub fn slice<'a>(&self, values: &'a [NumericValue]) -> &'a [NumericValue] {
        debug_assert!(self.begin <= self.end && self.end <= values.len());
        &values[self.begin..self.end]
    }
}

/// One pending operation and the operands it consumes. An `Undefined`
/// result type means the type is inferred from the operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationRecord {
    pub kind: OperationKind,
    pub range: Range,
    pub result_type: ElementType,
}

pub fn promote_types<I: IntoIterator<Item = ElementType>>(types: I) -> ElementType {
    let mut types = types.into_iter();
    let Some(first) = types.next() else {
        return ElementType::Undefined;
    };
    types.fold(first, |promoted, candidate| {
        if candidate.priority() > promoted.priority() {
            candidate
        } else {
            promoted
        }
    })
}

/// The highest priority type among `operands`, or `Undefined` when there
/// are none.
pub fn promote_type(operands: &[NumericValue]) -> ElementType {
    promote_types(operands.iter().map(NumericValue::element_type))
}

/// Apply `kind` to `operands`, computing in `result_type_hint`, or in the
/// promoted operand type when the hint is `Undefined`. Without a hint, `Nop`
/// returns the operands as they are.
pub fn perform(
    kind: OperationKind,
    operands: &[NumericValue],
    result_type_hint: ElementType,
) -> Result<Vec<NumericValue>> {
    match (kind, result_type_hint) {
        (OperationKind::Nothing, _) => return Ok(Vec::new()),
        (OperationKind::Nop, ElementType::Undefined) => return Ok(operands.to_vec()),
        _ => {}
    }

    let output_type = match result_type_hint {
        ElementType::Undefined => promote_type(operands),
        hint => hint,
    };
    log::debug!(
        "{} over {} operands as {}",
        kind.name(),
        operands.len(),
        output_type
    );

    let results = match output_type {
        ElementType::Uint8 => kernel::apply::<Wrapping<u8>>(kind, operands),
        ElementType::Int8 => kernel::apply::<Wrapping<i8>>(kind, operands),
        ElementType::Uint16 => kernel::apply::<Wrapping<u16>>(kind, operands),
        ElementType::Int16 => kernel::apply::<Wrapping<i16>>(kind, operands),
        ElementType::Uint32 => kernel::apply::<Wrapping<u32>>(kind, operands),
        ElementType::Int32 => kernel::apply::<Wrapping<i32>>(kind, operands),
        ElementType::Uint64 => kernel::apply::<Wrapping<u64>>(kind, operands),
        ElementType::Int64 => kernel::apply::<Wrapping<i64>>(kind, operands),
        ElementType::Float16 => kernel::apply::<Float16>(kind, operands),
        ElementType::Bfloat16 => kernel::apply::<Bfloat16>(kind, operands),
        ElementType::Float32 => kernel::apply::<f32>(kind, operands),
        ElementType::Float64 => kernel::apply::<f64>(kind, operands),
        ElementType::Fixed12_12 => kernel::apply::<Fixed12_12>(kind, operands),
        ElementType::Fixed16_16 => kernel::apply::<Fixed16_16>(kind, operands),
        ElementType::Fixed8_24 => kernel::apply::<Fixed8_24>(kind, operands),
        ElementType::Undefined => Ok(Vec::new()),
        ElementType::Bool8
        | ElementType::StringChar8
        | ElementType::Complex64
        | ElementType::Complex128 => Err(Error::UnsupportedType(output_type)),
    }?;

    debug_assert!(
        !kind.is_elementwise()
            || output_type == ElementType::Undefined
            || results.len() == operands.len()
    );

    let flags = operands.first().map(|v| v.flags).unwrap_or_default();
    Ok(results.into_iter().map(|v| v.with_flags(flags)).collect())
}
