//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use clap::Parser;
use gettextrs::gettext;

use element_type::ElementType;
use error::Result;
use format::{format_all_representations, format_value};
use parse::{parse_command, Command};
use value::NumericValue;

pub mod element_type;
pub mod error;
pub mod fixed_layout;
pub mod float_layout;
pub mod format;
mod kernel;
pub mod operation;
pub mod parse;
pub mod value;

pub const PROJECT_NAME: &str = "posixutils-rs";

/// binums - inspect numbers across integer, float and fixed-point encodings
#[derive(Parser, Debug, Default)]
#[command(version, about = gettext("binums - inspect numbers across integer, float and fixed-point encodings"))]
pub struct Args {
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = gettext("Numbers, data types, display options and operations")
    )]
    pub tokens: Vec<String>,
}

/// Types listed by the single value report, in listing order.
const REPORT_TYPES: [ElementType; 15] = [
    ElementType::Uint8,
    ElementType::Uint16,
    ElementType::Uint32,
    ElementType::Uint64,
    ElementType::Int8,
    ElementType::Int16,
    ElementType::Int32,
    ElementType::Int64,
    ElementType::Float16,
    ElementType::Bfloat16,
    ElementType::Float32,
    ElementType::Float64,
    ElementType::Fixed12_12,
    ElementType::Fixed16_16,
    ElementType::Fixed8_24,
];

pub fn usage() -> String {
    let mut text = gettext("Usage:");
    text.push('\n');
    for example in [
        "binums 12.75  // floating point value in various formats",
        "binums 0b1101  // read binary integer",
        "binums float32 raw 0x40490FDB  // read raw floating point bits",
        "binums float16 raw 0x5140  // read raw floating point bits",
        "binums fields hex 7 12.75 -13 bin 7 12.75 -13  // see fields of numbers",
        "binums int8 fields 13 -13  // see fields of numbers",
        "binums uint32 add 1.5 3.25  // perform operation",
        "binums float32 add float16 2 3  // read float16, compute in float32",
        "binums uint32 mul 3 2 add 3 2 subtract 3 2 dot 1 2 3 4",
        "binums add ( 1 2 ) 3  // group operands, 3 is shown on its own",
        "binums 0x1.5p5  // floating point hexadecimal",
        "binums fixed12_12 sub 3.5 2  // fixed point arithmetic",
        "binums float32 trunc 3.7 -3.7  // drop fractions",
    ] {
        text.push_str(&format!("   {example}\n"));
    }

    text.push('\n');
    text.push_str(&gettext("Options:"));
    text.push('\n');
    for option in [
        "bin hex dec oct - display raw bits as binary/hex/decimal/octal",
        "floathex floatdec - display floating values as hex or decimal (default)",
        "raw num - read input as raw bit data or as number (default)",
        "fields nofields - show numeric component bitfields",
        "add subtract multiply divide dot truncate nop nothing - apply operation to following numbers",
        "( ) - enclose the operands of the preceding operation",
        "float16 bfloat16 float32 float64 - set floating point data type",
        "uint8 uint16 uint32 uint64 int8 int16 int32 int64 - set integer data type",
        "fixed12_12 fixed16_16 fixed8_24 - set fixed precision data type",
        "bool8 - set boolean data type",
    ] {
        text.push_str(&format!("   {}\n", gettext(option)));
    }
    text
}

fn push_value_lines(report: &mut String, values: &[NumericValue]) -> Result<()> {
    for value in values {
        if value.element_type() != ElementType::Undefined {
            report.push_str(&format!("    {}\n", format_value(value, " (", ")")?));
        }
    }
    Ok(())
}

fn push_listing_line(
    report: &mut String,
    value: &NumericValue,
    original: ElementType,
    flank: &str,
) -> Result<()> {
    let marker = if value.element_type() == original { " -> " } else { "    " };
    report.push_str(&format!("{marker}{}\n", format_value(value, flank, "")?));
    Ok(())
}

/// Every representation of a single value, then the value converted into
/// each listed type and its bits read back as each listed type.
fn single_value_report(value: &NumericValue) -> Result<String> {
    let original = value.element_type();
    let number = value.read_as_f64()?;
    let bits = value.read_raw_bits()? as u64;

    let mut report = String::from("Representations:\n");
    report.push_str(&format_all_representations(value)?);

    report.push_str("\nTo binary:\n");
    for element_type in REPORT_TYPES {
        let converted = NumericValue::from_f64(element_type, number)?.with_flags(value.flags);
        push_listing_line(&mut report, &converted, original, " -> ")?;
    }

    report.push_str("\nFrom binary:\n");
    for element_type in REPORT_TYPES {
        let reinterpreted =
            NumericValue::from_raw_bits(element_type, bits)?.with_flags(value.flags);
        push_listing_line(&mut report, &reinterpreted, original, " <- ")?;
    }
    Ok(report)
}

fn operations_report(command: &Command) -> Result<String> {
    let mut report = String::new();
    for operation in &command.operations {
        let name = operation.kind.name();
        let operands = operation.range.slice(&command.values);
        report.push_str(&format!("Operands to {name}:\n"));
        push_value_lines(&mut report, operands)?;

        let results = operation::perform(operation.kind, operands, operation.result_type)?;
        report.push_str(&format!("Result from {name}:\n"));
        push_value_lines(&mut report, &results)?;
        report.push('\n');
    }
    Ok(report)
}

/// Build the full report for `args`. Nothing is returned on error, so a
/// failing command prints no partial output.
pub fn run(args: &Args) -> Result<String> {
    let command = parse_command(&args.tokens)?;
    log::debug!(
        "{} values, {} operations",
        command.values.len(),
        command.operations.len()
    );

    match command.values.as_slice() {
        _ if !command.operations.is_empty() => operations_report(&command),
        [value] => single_value_report(value),
        values => {
            let mut report = String::new();
            push_value_lines(&mut report, values)?;
            Ok(report)
        }
    }
}
