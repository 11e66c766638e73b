//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::element_type::BitRange;
use crate::error::Result;
use crate::value::NumericValue;

const BASE_2_DIGITS: [char; 2] = ['0', '1'];
const BASE_8_DIGITS: [char; 8] = ['0', '1', '2', '3', '4', '5', '6', '7'];
const BASE_10_DIGITS: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];
const BASE_16_DIGITS_LOWER: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
];
const BASE_16_DIGITS_UPPER: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
];

/// Significant digits of the decimal float rendering (`%.24g`).
const FLOAT_DECIMAL_PRECISION: i32 = 24;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum RawRadix {
    Binary,
    Octal,
    Decimal,
    #[default]
    Hex,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum FloatDisplay {
    #[default]
    Decimal,
    Hex,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct DisplayFlags {
    pub raw_radix: RawRadix,
    pub float_display: FloatDisplay,
    pub show_fields: bool,
}

fn copy_buffer_to_target(buffer: &[u8], target: &mut String) {
    for c in buffer.iter() {
        target.push(*c as char);
    }
}

fn digits_for(radix: RawRadix) -> (u64, &'static [char]) {
    match radix {
        RawRadix::Binary => (2, &BASE_2_DIGITS),
        RawRadix::Octal => (8, &BASE_8_DIGITS),
        RawRadix::Decimal => (10, &BASE_10_DIGITS),
        RawRadix::Hex => (16, &BASE_16_DIGITS_UPPER),
    }
}

/// Number of digits needed to print every value of a `bit_count` wide field.
fn digit_count(bit_count: u32, base: u64) -> usize {
    let mut max_value = match bit_count {
        0 => 0,
        bits if bits >= 64 => u64::MAX,
        _ => (1u64 << bit_count) - 1,
    };
    let mut count = 1;
    while max_value >= base {
        max_value /= base;
        count += 1;
    }
    count
}

/// Write the field `range` of `bits` in the given radix, zero padded to the
/// full width of the field.
fn fmt_write_raw(target: &mut String, bits: u64, range: BitRange, radix: RawRadix) {
    let (base, digits) = digits_for(radix);
    let count = match radix {
        RawRadix::Binary => range.len() as usize,
        RawRadix::Hex => range.len().div_ceil(4) as usize,
        RawRadix::Octal | RawRadix::Decimal => digit_count(range.len(), base),
    };

    match radix {
        RawRadix::Binary => target.push_str("0b"),
        RawRadix::Octal => target.push_str("0o"),
        RawRadix::Hex => target.push_str("0x"),
        RawRadix::Decimal => {}
    }

    // 64 binary digits is the widest any field can need
    let mut buffer = [b'0'; 64];
    let start = buffer.len() - count.min(buffer.len());
    let mut value = range.extract(bits);
    for slot in buffer[start..].iter_mut().rev() {
        *slot = digits[(value % base) as usize] as u8;
        value /= base;
    }
    copy_buffer_to_target(&buffer[start..], target);
}

fn fmt_write_field(target: &mut String, name: &str, bits: u64, range: BitRange, radix: RawRadix) {
    if range.is_empty() {
        return;
    }
    if let Some(c) = target.chars().last() {
        if !matches!(c, ' ' | '(' | '[' | '{') {
            target.push(' ');
        }
    }
    target.push_str(name);
    target.push(':');
    fmt_write_raw(target, bits, range, radix);
}

fn fmt_write_special(target: &mut String, value: f64) -> bool {
    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value.is_nan() {
        target.push_str(sign);
        target.push_str("nan");
    } else if value.is_infinite() {
        target.push_str(sign);
        target.push_str("inf");
    } else {
        return false;
    }
    true
}

fn strip_trailing_zeros(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// Shortest of fixed or scientific notation with 24 significant digits,
/// trailing zeros removed, as C's `%.24g` prints it.
pub fn fmt_write_float_decimal(target: &mut String, value: f64) {
    if fmt_write_special(target, value) {
        return;
    }
    if value == 0.0 {
        target.push_str(if value.is_sign_negative() { "-0" } else { "0" });
        return;
    }

    let precision = FLOAT_DECIMAL_PRECISION;
    let scientific = format!("{:.*e}", (precision - 1) as usize, value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision {
        target.push_str(strip_trailing_zeros(mantissa));
        target.push('e');
        target.push(if exponent < 0 { '-' } else { '+' });
        if exponent.abs() < 10 {
            target.push('0');
        }
        target.push_str(&exponent.abs().to_string());
    } else {
        let fixed = format!("{:.*}", (precision - 1 - exponent) as usize, value);
        target.push_str(strip_trailing_zeros(&fixed));
    }
}

/// Hexadecimal float as C's `%a` prints it, e.g. `-0x1.52p+5`.
pub fn fmt_write_float_hex(target: &mut String, value: f64) {
    if fmt_write_special(target, value) {
        return;
    }

    let bits = value.to_bits();
    if value.is_sign_negative() {
        target.push('-');
    }
    let biased_exponent = ((bits >> 52) & 0x7FF) as i64;
    let mut fraction = bits & ((1u64 << 52) - 1);

    let (leading, exponent) = match (biased_exponent, fraction) {
        (0, 0) => ('0', 0),
        (0, _) => ('0', -1022),
        _ => ('1', biased_exponent - 1023),
    };
    target.push_str("0x");
    target.push(leading);

    if fraction != 0 {
        target.push('.');
        let mut nibbles = 13;
        while fraction & 0xF == 0 {
            fraction >>= 4;
            nibbles -= 1;
        }
        for shift in (0..nibbles).rev() {
            target.push(BASE_16_DIGITS_LOWER[((fraction >> (shift * 4)) & 0xF) as usize]);
        }
    }

    target.push('p');
    if exponent >= 0 {
        target.push('+');
    }
    target.push_str(&exponent.to_string());
}

/// The human readable part of a value: a float, or a signed or unsigned
/// integer depending on the type.
pub fn fmt_write_numeric(
    target: &mut String,
    value: &NumericValue,
    float_display: FloatDisplay,
) -> Result<()> {
    let element_type = value.element_type();
    if element_type.is_fractional() {
        let number = value.read_as_f64()?;
        match float_display {
            FloatDisplay::Decimal => fmt_write_float_decimal(target, number),
            FloatDisplay::Hex => fmt_write_float_hex(target, number),
        }
    } else if element_type.is_signed() {
        target.push_str(&value.read_raw_bits()?.to_string());
    } else {
        target.push_str(&(value.read_raw_bits()? as u64).to_string());
    }
    Ok(())
}

/// The raw bits of a value, whole or split into fields.
pub fn fmt_write_bits(
    target: &mut String,
    value: &NumericValue,
    radix: RawRadix,
    show_fields: bool,
) -> Result<()> {
    let element_type = value.element_type();
    let bits = value.read_raw_bits()? as u64;
    if show_fields {
        let fields = element_type.substructure();
        fmt_write_field(target, "int", bits, fields.integer, radix);
        fmt_write_field(target, "frac", bits, fields.fraction, radix);
        fmt_write_field(target, "exp", bits, fields.exponent, radix);
        fmt_write_field(target, "sign", bits, fields.sign, radix);
    } else {
        let whole = BitRange {
            begin: 0,
            end: element_type.bit_size(),
        };
        fmt_write_raw(target, bits, whole, radix);
    }
    Ok(())
}

/// One line describing `value`, such as `   float32 -42.25 (0xC2290000)`
/// when flanked by `" ("` and `")"`.
pub fn format_value(value: &NumericValue, left_flank: &str, right_flank: &str) -> Result<String> {
    let flags = value.flags;
    let mut target = format!("{:>10} ", value.element_type().name());
    fmt_write_numeric(&mut target, value, flags.float_display)?;
    target.push_str(left_flank);
    fmt_write_bits(&mut target, value, flags.raw_radix, flags.show_fields)?;
    target.push_str(right_flank);
    Ok(target)
}

fn push_row(target: &mut String, label: &str, content: &str) {
    target.push_str(&format!("{:>14} {}\n", label, content));
}

/// The type, decimal, hex float, hex, octal, binary and binary fields rows
/// of `value`, one per line.
pub fn format_all_representations(value: &NumericValue) -> Result<String> {
    let mut target = String::new();
    push_row(&mut target, "type", value.element_type().name());

    let rows: [(&str, fn(&mut String, &NumericValue) -> Result<()>); 6] = [
        ("decimal", |s, v| fmt_write_numeric(s, v, FloatDisplay::Decimal)),
        ("floathex", |s, v| fmt_write_numeric(s, v, FloatDisplay::Hex)),
        ("hex", |s, v| fmt_write_bits(s, v, RawRadix::Hex, false)),
        ("oct", |s, v| fmt_write_bits(s, v, RawRadix::Octal, false)),
        ("bin", |s, v| fmt_write_bits(s, v, RawRadix::Binary, false)),
        ("fields bin", |s, v| fmt_write_bits(s, v, RawRadix::Binary, true)),
    ];
    for (label, write) in rows {
        let mut content = String::new();
        write(&mut content, value)?;
        push_row(&mut target, label, &content);
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element_type::ElementType;
    use test_log::test;

    fn decimal(value: f64) -> String {
        let mut s = String::new();
        fmt_write_float_decimal(&mut s, value);
        s
    }

    fn hex(value: f64) -> String {
        let mut s = String::new();
        fmt_write_float_hex(&mut s, value);
        s
    }

    fn line(element_type: ElementType, value: f64, flags: DisplayFlags) -> String {
        let value = NumericValue::from_f64(element_type, value).unwrap().with_flags(flags);
        format_value(&value, " (", ")").unwrap()
    }

    #[test]
    fn test_float_decimal() {
        assert_eq!(decimal(-42.25), "-42.25");
        assert_eq!(decimal(0.06500244140625), "0.06500244140625");
        assert_eq!(decimal(0.1), "0.100000000000000005551115");
        assert_eq!(decimal(1e30), "1.00000000000000001988462e+30");
        assert_eq!(decimal(2f64.powi(-20)), "9.5367431640625e-07");
        assert_eq!(decimal(65504.0), "65504");
        assert_eq!(decimal(-0.0), "-0");
        assert_eq!(decimal(f64::NEG_INFINITY), "-inf");
        assert_eq!(decimal(f64::NAN), "nan");
    }

    #[test]
    fn test_float_hex() {
        assert_eq!(hex(-42.25), "-0x1.52p+5");
        assert_eq!(hex(1.0), "0x1p+0");
        assert_eq!(hex(0.5), "0x1p-1");
        assert_eq!(hex(0.0), "0x0p+0");
        assert_eq!(hex(-0.0), "-0x0p+0");
        assert_eq!(hex(f64::from_bits(1)), "0x0.0000000000001p-1022");
        assert_eq!(hex(std::f64::consts::PI), "0x1.921fb54442d18p+1");
        assert_eq!(hex(f64::INFINITY), "inf");
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(8, 8), 3);
        assert_eq!(digit_count(64, 8), 22);
        assert_eq!(digit_count(64, 10), 20);
        assert_eq!(digit_count(1, 8), 1);
        assert_eq!(digit_count(24, 10), 8);
    }

    #[test]
    fn test_raw_radix() {
        let flags = |raw_radix| DisplayFlags {
            raw_radix,
            ..DisplayFlags::default()
        };
        assert_eq!(
            line(ElementType::Int8, -42.0, flags(RawRadix::Hex)),
            "      int8 -42 (0xD6)"
        );
        assert_eq!(
            line(ElementType::Int8, -42.0, flags(RawRadix::Binary)),
            "      int8 -42 (0b11010110)"
        );
        assert_eq!(
            line(ElementType::Int8, -42.0, flags(RawRadix::Octal)),
            "      int8 -42 (0o326)"
        );
        assert_eq!(
            line(ElementType::Uint16, 42.0, flags(RawRadix::Decimal)),
            "    uint16 42 (00042)"
        );
        assert_eq!(
            line(ElementType::Fixed12_12, -42.25, flags(RawRadix::Hex)),
            "fixed12_12 -42.25 (0xFD5C00)"
        );
        assert_eq!(
            line(ElementType::Int64, -1.0, flags(RawRadix::Octal)),
            "     int64 -1 (0o1777777777777777777777)"
        );
    }

    #[test]
    fn test_fields() {
        let flags = DisplayFlags {
            raw_radix: RawRadix::Binary,
            show_fields: true,
            ..DisplayFlags::default()
        };
        assert_eq!(
            line(ElementType::Float16, -42.25, flags),
            "   float16 -42.25 (frac:0b0101001000 exp:0b10100 sign:0b1)"
        );
        assert_eq!(
            line(ElementType::Uint8, 13.0, flags),
            "     uint8 13 (int:0b00001101)"
        );
        let flags = DisplayFlags {
            show_fields: true,
            ..DisplayFlags::default()
        };
        assert_eq!(
            line(ElementType::Fixed16_16, -1.5, flags),
            "fixed16_16 -1.5 (int:0x7FFE frac:0x8000 sign:0x1)"
        );
    }

    #[test]
    fn test_float_hex_display() {
        let flags = DisplayFlags {
            float_display: FloatDisplay::Hex,
            ..DisplayFlags::default()
        };
        assert_eq!(
            line(ElementType::Float32, 12.75, flags),
            "   float32 0x1.98p+3 (0x414C0000)"
        );
    }

    #[test]
    fn test_all_representations() {
        let value = NumericValue::from_f64(ElementType::Float16, -42.25).unwrap();
        let expected = String::from(
            "          type float16
       decimal -42.25
      floathex -0x1.52p+5
           hex 0xD148
           oct 0o150510
           bin 0b1101000101001000
    fields bin frac:0b0101001000 exp:0b10100 sign:0b1
",
        );
        similar_asserts::assert_eq!(format_all_representations(&value).unwrap(), expected);
    }
}
