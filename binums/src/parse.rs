//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Number literals and the command token grammar.

use crate::element_type::ElementType;
use crate::error::{Error, Result};
use crate::format::{DisplayFlags, FloatDisplay, RawRadix};
use crate::float_layout::{shift_right_rounded, Rounding};
use crate::operation::{OperationKind, OperationRecord, Range};
use crate::value::NumericValue;

/// Result of a float parse of the longest valid prefix of a literal.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FloatPrefix {
    value: f64,
    length: usize,
    has_decimal_point: bool,
}

fn count_digits(bytes: &[u8], radix: u32) -> usize {
    bytes
        .iter()
        .take_while(|b| (**b as char).is_digit(radix))
        .count()
}

fn strip_sign(literal: &str) -> (bool, &str) {
    if let Some(rest) = literal.strip_prefix('-') {
        (true, rest)
    } else {
        (false, literal.strip_prefix('+').unwrap_or(literal))
    }
}

fn hex_prefix(literal: &str) -> Option<&str> {
    let rest = literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))?;
    let next = rest.bytes().next()?;
    if next.is_ascii_hexdigit() || (next == b'.' && rest.as_bytes().get(1)?.is_ascii_hexdigit()) {
        Some(rest)
    } else {
        None
    }
}

/// Round `mantissa * 2^exponent` to the nearest float64. `sticky` marks
/// nonzero digits dropped below the mantissa.
fn hex_float_value(mantissa: u64, exponent: i64, sticky: bool) -> f64 {
    if mantissa == 0 {
        return 0.0;
    }

    let lead = mantissa.leading_zeros();
    let significand = (mantissa << lead) | sticky as u64;
    let unbiased = exponent.saturating_sub(lead as i64).saturating_add(63);
    if unbiased > 1023 {
        return f64::INFINITY;
    }

    // a carry out of the significand rolls into the exponent field
    let bits = if unbiased >= -1022 {
        let rounded = shift_right_rounded(significand, 11, Rounding::NearestEven);
        (((unbiased + 1022) as u64) << 52) + rounded
    } else {
        let shift = (-1011i64).saturating_sub(unbiased).min(65) as u32;
        shift_right_rounded(significand, shift, Rounding::NearestEven)
    };
    f64::from_bits(bits)
}

/// Parse a hexadecimal float body such as `1.5p5` (after `0x`).
fn parse_hex_float(body: &str) -> (f64, usize, bool) {
    let bytes = body.as_bytes();
    let mut mantissa: u64 = 0;
    let mut exponent: i64 = 0;
    let mut sticky = false;
    let mut index = 0;
    let mut seen_point = false;

    while index < bytes.len() {
        let c = bytes[index];
        if c == b'.' && !seen_point {
            seen_point = true;
        } else if let Some(digit) = (c as char).to_digit(16) {
            if mantissa >> 60 == 0 {
                mantissa = (mantissa << 4) | digit as u64;
                if seen_point {
                    exponent -= 4;
                }
            } else {
                sticky |= digit != 0;
                if !seen_point {
                    exponent = exponent.saturating_add(4);
                }
            }
        } else {
            break;
        }
        index += 1;
    }

    if let Some(b'p' | b'P') = bytes.get(index) {
        let (negative, digits) = strip_sign(&body[index + 1..]);
        let count = count_digits(digits.as_bytes(), 10);
        if count > 0 {
            let sign_length = body[index + 1..].len() - digits.len();
            let value: i64 = digits[..count].parse().unwrap_or(i64::MAX);
            exponent = exponent.saturating_add(if negative { -value } else { value });
            index += 1 + sign_length + count;
        }
    }

    (hex_float_value(mantissa, exponent, sticky), index, seen_point)
}

/// Longest prefix float parse: decimal with optional exponent, hex float,
/// `inf`, `infinity` or `nan`, each with an optional sign.
fn parse_float_prefix(literal: &str) -> Option<FloatPrefix> {
    let (negative, body) = strip_sign(literal);
    let sign_length = literal.len() - body.len();
    let sign = if negative { -1.0 } else { 1.0 };
    let lower = body.to_ascii_lowercase();

    for (word, value) in [("infinity", f64::INFINITY), ("inf", f64::INFINITY), ("nan", f64::NAN)] {
        if lower.starts_with(word) {
            return Some(FloatPrefix {
                value: sign * value,
                length: sign_length + word.len(),
                has_decimal_point: false,
            });
        }
    }

    if let Some(hex) = hex_prefix(body) {
        let (value, length, has_decimal_point) = parse_hex_float(hex);
        return Some(FloatPrefix {
            value: sign * value,
            length: sign_length + 2 + length,
            has_decimal_point,
        });
    }

    let bytes = body.as_bytes();
    let integer_digits = count_digits(bytes, 10);
    let mut length = integer_digits;
    let mut fraction_digits = 0;
    let has_decimal_point = bytes.get(length) == Some(&b'.');
    if has_decimal_point {
        fraction_digits = count_digits(&bytes[length + 1..], 10);
        length += 1 + fraction_digits;
    }
    if integer_digits + fraction_digits == 0 {
        return None;
    }
    if let Some(b'e' | b'E') = bytes.get(length) {
        let (_, exponent) = strip_sign(&body[length + 1..]);
        let exponent_digits = count_digits(exponent.as_bytes(), 10);
        if exponent_digits > 0 {
            length = body.len() - exponent.len() + exponent_digits;
        }
    }

    let value: f64 = body[..length].parse().ok()?;
    Some(FloatPrefix {
        value: sign * value,
        length: sign_length + length,
        has_decimal_point,
    })
}

/// Integer parse with `0x`, `0b` and `0o` prefixes. Decimal values out of
/// range saturate; signed parses clamp to the `i64` range, unsigned ones
/// to the `u64` range with negation wrapping around.
fn parse_integer(literal: &str, signed: bool) -> i64 {
    let (negative, body) = strip_sign(literal);
    let (radix, digits) = if let Some(hex) = hex_prefix(body) {
        (16, hex)
    } else if let Some(binary) = body.strip_prefix("0b") {
        (2, binary)
    } else if let Some(octal) = body.strip_prefix("0o") {
        (8, octal)
    } else if body.starts_with('0') {
        (8, body)
    } else {
        (10, body)
    };

    let count = count_digits(digits.as_bytes(), radix);
    let magnitude = u64::from_str_radix(&digits[..count], radix);
    let magnitude = match (count, magnitude) {
        (0, _) => 0,
        (_, Ok(magnitude)) => magnitude,
        (_, Err(_)) => u64::MAX,
    };

    if signed {
        if negative {
            if magnitude > i64::MIN.unsigned_abs() {
                i64::MIN
            } else {
                (magnitude as i64).wrapping_neg()
            }
        } else {
            magnitude.min(i64::MAX as u64) as i64
        }
    } else if negative {
        magnitude.wrapping_neg() as i64
    } else {
        magnitude as i64
    }
}

/// Parse one literal into a value of `preferred_type`, or of a type
/// inferred from the literal when `preferred_type` is `Undefined`. In raw
/// mode the literal is the bit pattern of a fractional type rather than its
/// value.
pub fn parse_number(literal: &str, preferred_type: ElementType, raw: bool) -> Result<NumericValue> {
    let float = parse_float_prefix(literal);
    let float_value = float.map_or(0.0, |f| f.value);
    let has_decimal_point = float.is_some_and(|f| f.has_decimal_point);

    let signed = preferred_type == ElementType::Undefined
        || (preferred_type.is_signed() && !raw)
        || literal.starts_with('-');
    let integer_value = parse_integer(literal, signed);

    log::trace!("literal {literal:?}: float {float_value}, integer {integer_value}");

    if preferred_type == ElementType::Undefined {
        return if has_decimal_point {
            if raw {
                NumericValue::from_raw_bits(ElementType::Float64, integer_value as u64)
            } else {
                NumericValue::from_f64(ElementType::Float64, float_value)
            }
        } else if i32::try_from(integer_value).is_ok() {
            NumericValue::from_i64(ElementType::Int32, integer_value)
        } else if u32::try_from(integer_value).is_ok() {
            NumericValue::from_i64(ElementType::Uint32, integer_value)
        } else {
            NumericValue::from_i64(ElementType::Int64, integer_value)
        };
    }

    if preferred_type.is_fractional() {
        if raw {
            NumericValue::from_raw_bits(preferred_type, integer_value as u64)
        } else if float_value == 0.0 {
            NumericValue::from_i64(preferred_type, integer_value)
        } else {
            NumericValue::from_f64(preferred_type, float_value)
        }
    } else {
        NumericValue::from_i64(preferred_type, integer_value)
    }
}

/// A token holds numbers when it starts with a digit, or with a minus sign
/// followed by a digit.
pub fn is_number_token(token: &str) -> bool {
    let mut bytes = token.bytes();
    match bytes.next() {
        Some(b'-') => bytes.next().is_some_and(|b| b.is_ascii_digit()),
        Some(b) => b.is_ascii_digit(),
        None => false,
    }
}

pub fn operation_from_token(token: &str) -> Option<OperationKind> {
    Some(match token {
        "nop" | "identity" => OperationKind::Nop,
        "add" => OperationKind::Add,
        "sub" | "subtract" => OperationKind::Subtract,
        "mul" | "multiply" => OperationKind::Multiply,
        "div" | "divide" => OperationKind::Divide,
        "dot" | "dotproduct" => OperationKind::Dot,
        "trunc" | "truncate" => OperationKind::Truncate,
        "nothing" => OperationKind::Nothing,
        _ => return None,
    })
}

pub fn element_type_from_token(token: &str) -> Option<ElementType> {
    let alias = match token {
        "i8" => ElementType::Int8,
        "ui8" => ElementType::Uint8,
        "i16" => ElementType::Int16,
        "ui16" => ElementType::Uint16,
        "i32" | "int" => ElementType::Int32,
        "ui32" | "uint" => ElementType::Uint32,
        "i64" => ElementType::Int64,
        "ui64" => ElementType::Uint64,
        "f16" => ElementType::Float16,
        "f16m7e8s1" => ElementType::Bfloat16,
        "f32" | "float" => ElementType::Float32,
        "f64" | "double" => ElementType::Float64,
        _ => {
            return ElementType::from_name(token)
                .filter(|element_type| *element_type != ElementType::StringChar8)
        }
    };
    Some(alias)
}

/// Apply a display token to `flags`; false when `token` is not one.
fn apply_display_token(token: &str, flags: &mut DisplayFlags) -> bool {
    match token {
        "bin" | "binary" | "showrawbinary" => flags.raw_radix = RawRadix::Binary,
        "hex" | "hexadecimal" | "showrawhexadecimal" => flags.raw_radix = RawRadix::Hex,
        "dec" | "decimal" | "showrawdecimal" => flags.raw_radix = RawRadix::Decimal,
        "oct" | "octal" | "showrawoctal" => flags.raw_radix = RawRadix::Octal,
        "floathex" | "showfloathexadecimal" => flags.float_display = FloatDisplay::Hex,
        "floatdec" | "showfloatdecimal" => flags.float_display = FloatDisplay::Decimal,
        "fields" | "showrawfields" => flags.show_fields = true,
        "nofields" | "hiderawfields" => flags.show_fields = false,
        _ => return false,
    }
    true
}

/// Parsed command line: every value in order, and the operations that
/// consume ranges of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Command {
    pub values: Vec<NumericValue>,
    pub operations: Vec<OperationRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    /// No parenthesis seen for the current operation.
    Ungrouped,
    Open,
    /// The current operation's operands were closed by `)`.
    Closed,
}

struct CommandParser {
    command: Command,
    preferred_type: ElementType,
    raw: bool,
    flags: DisplayFlags,
    group: Group,
    after_operation: bool,
}

impl CommandParser {
    fn new() -> Self {
        Self {
            command: Command::default(),
            preferred_type: ElementType::Undefined,
            raw: false,
            flags: DisplayFlags::default(),
            group: Group::Ungrouped,
            after_operation: false,
        }
    }

    /// End the current operation's operand range at the current value
    /// count, unless `)` already ended it.
    fn close_range(&mut self) {
        let count = self.command.values.len();
        if self.group == Group::Closed {
            return;
        }
        if let Some(last) = self.command.operations.last_mut() {
            last.range = Range::new(last.range.begin, count);
        }
    }

    fn start_operation(&mut self, kind: OperationKind) {
        self.close_range();
        let count = self.command.values.len();
        log::debug!("operation {} from value {count} as {}", kind.name(), self.preferred_type);
        self.command.operations.push(OperationRecord {
            kind,
            range: Range::new(count, count),
            result_type: self.preferred_type,
        });
        self.group = Group::Ungrouped;
    }

    fn push_numbers(&mut self, token: &str) -> Result<()> {
        if self.group == Group::Closed {
            self.start_operation(OperationKind::Nop);
        }
        for literal in token.split(',') {
            let value = parse_number(literal, self.preferred_type, self.raw)?;
            self.command.values.push(value.with_flags(self.flags));
        }
        Ok(())
    }

    fn token(&mut self, token: &str) -> Result<()> {
        let after_operation = std::mem::replace(&mut self.after_operation, false);

        if is_number_token(token) {
            return self.push_numbers(token);
        }

        match token {
            "(" => {
                if self.group == Group::Open {
                    return Err(Error::MalformedSyntax(String::from("nested \"(\"")));
                }
                if !after_operation {
                    return Err(Error::MalformedSyntax(String::from(
                        "\"(\" must follow an operation",
                    )));
                }
                self.group = Group::Open;
            }
            ")" => {
                if self.group != Group::Open {
                    return Err(Error::MalformedSyntax(String::from("unmatched \")\"")));
                }
                self.close_range();
                self.group = Group::Closed;
            }
            "raw" => self.raw = true,
            "num" => self.raw = false,
            _ => {
                if let Some(kind) = operation_from_token(token) {
                    if self.group == Group::Open {
                        return Err(Error::MalformedSyntax(format!(
                            "operation \"{token}\" inside parentheses"
                        )));
                    }
                    self.start_operation(kind);
                    self.after_operation = true;
                } else if let Some(element_type) = element_type_from_token(token) {
                    self.preferred_type = element_type;
                } else if !apply_display_token(token, &mut self.flags) {
                    return Err(Error::UnknownToken(token.to_string()));
                }
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Command> {
        if self.group == Group::Open {
            return Err(Error::MalformedSyntax(String::from("unclosed \"(\"")));
        }
        self.close_range();
        Ok(self.command)
    }
}

/// Parse command tokens left to right. Type, mode and display tokens apply
/// to the numbers after them; each operation consumes the numbers up to the
/// next operation or closing parenthesis.
pub fn parse_command<S: AsRef<str>>(tokens: &[S]) -> Result<Command> {
    let mut parser = CommandParser::new();
    for token in tokens {
        parser.token(token.as_ref())?;
    }
    parser.finish()
}
