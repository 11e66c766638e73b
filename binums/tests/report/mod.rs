//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::testing::{run_test, run_test_with_checker, TestPlan};

fn binums_test(args: &[&str], expected_output: &str) {
    run_test(TestPlan {
        expected_out: String::from(expected_output),
        ..TestPlan::new(args)
    });
}

fn stdout_lines(args: &[&str]) -> Vec<String> {
    let mut lines = Vec::new();
    run_test_with_checker(TestPlan::new(args), |plan, output| {
        assert_eq!(output.status.code(), Some(plan.expected_exit_code));
        assert!(output.stderr.is_empty());
        lines = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(String::from)
            .collect();
    });
    lines
}

#[test]
fn test_literal_listing() {
    binums_test(
        &[
            "uint8", "42", "int8", "-42", "uint16", "42", "int16", "-42", "uint32", "42", "int32",
            "-42", "uint64", "42", "int64", "-42", "fixed12_12", "-42.25", "fixed16_16",
            "-42.25", "fixed8_24", "-42.25", "float16", "-42.25", "float32", "-42.25",
            "float64", "-42.25",
        ],
        "         uint8 42 (0x2A)
          int8 -42 (0xD6)
        uint16 42 (0x002A)
         int16 -42 (0xFFD6)
        uint32 42 (0x0000002A)
         int32 -42 (0xFFFFFFD6)
        uint64 42 (0x000000000000002A)
         int64 -42 (0xFFFFFFFFFFFFFFD6)
    fixed12_12 -42.25 (0xFD5C00)
    fixed16_16 -42.25 (0xFFD5C000)
     fixed8_24 -42.25 (0xD5C00000)
       float16 -42.25 (0xD148)
       float32 -42.25 (0xC2290000)
       float64 -42.25 (0xC045200000000000)
",
    );
}

#[test]
fn test_single_value_report() {
    binums_test(
        &["12.75"],
        "Representations:
          type float64
       decimal 12.75
      floathex 0x1.98p+3
           hex 0x4029800000000000
           oct 0o0400514000000000000000
           bin 0b0100000000101001100000000000000000000000000000000000000000000000
    fields bin frac:0b1001100000000000000000000000000000000000000000000000 exp:0b10000000010 sign:0b0

To binary:
         uint8 12 -> 0x0C
        uint16 12 -> 0x000C
        uint32 12 -> 0x0000000C
        uint64 12 -> 0x000000000000000C
          int8 12 -> 0x0C
         int16 12 -> 0x000C
         int32 12 -> 0x0000000C
         int64 12 -> 0x000000000000000C
       float16 12.75 -> 0x4A60
      bfloat16 12.75 -> 0x414C
       float32 12.75 -> 0x414C0000
 ->    float64 12.75 -> 0x4029800000000000
    fixed12_12 12.75 -> 0x00CC00
    fixed16_16 12.75 -> 0x000CC000
     fixed8_24 12.75 -> 0x0CC00000

From binary:
         uint8 0 <- 0x00
        uint16 0 <- 0x0000
        uint32 0 <- 0x00000000
        uint64 4623367229960880128 <- 0x4029800000000000
          int8 0 <- 0x00
         int16 0 <- 0x0000
         int32 0 <- 0x00000000
         int64 4623367229960880128 <- 0x4029800000000000
       float16 0 <- 0x0000
      bfloat16 0 <- 0x0000
       float32 0 <- 0x00000000
 ->    float64 12.75 <- 0x4029800000000000
    fixed12_12 0 <- 0x000000
    fixed16_16 0 <- 0x00000000
     fixed8_24 0 <- 0x00000000
",
    );
}

#[test]
fn test_raw_float_bits() {
    let lines = stdout_lines(&["float32", "raw", "0x40490FDB"]);
    assert_eq!(lines[1], "          type float32");
    assert_eq!(lines[2], "       decimal 3.1415927410125732421875");
    assert_eq!(lines[4], "           hex 0x40490FDB");

    let lines = stdout_lines(&["float16", "raw", "0x5140"]);
    assert_eq!(lines[2], "       decimal 42");
    assert_eq!(lines[7], "    fields bin frac:0b0101000000 exp:0b10100 sign:0b0");
}

#[test]
fn test_binary_integer_literal() {
    let lines = stdout_lines(&["0b1101"]);
    assert_eq!(lines[1], "          type int32");
    assert_eq!(lines[2], "       decimal 13");
    assert_eq!(lines[16], " ->      int32 13 -> 0x0000000D");
}

#[test]
fn test_hex_float_literal() {
    let lines = stdout_lines(&["0x1.5p5"]);
    assert_eq!(lines[1], "          type float64");
    assert_eq!(lines[2], "       decimal 42");
    assert_eq!(lines[3], "      floathex 0x1.5p+5");
}

#[test]
fn test_fields_display() {
    binums_test(
        &["int8", "fields", "13", "-13"],
        "          int8 13 (int:0x0D sign:0x0)
          int8 -13 (int:0x73 sign:0x1)
",
    );
    binums_test(
        &["fields", "bin", "7", "12.75"],
        "         int32 7 (int:0b0000000000000000000000000000111 sign:0b0)
       float64 12.75 (frac:0b1001100000000000000000000000000000000000000000000000 exp:0b10000000010 sign:0b0)
",
    );
}

#[test]
fn test_operations() {
    binums_test(
        &["uint32", "mul", "3", "2", "add", "3", "2", "subtract", "3", "2", "dot", "1", "2", "3", "4"],
        "Operands to multiply:
        uint32 3 (0x00000003)
        uint32 2 (0x00000002)
Result from multiply:
        uint32 6 (0x00000006)

Operands to add:
        uint32 3 (0x00000003)
        uint32 2 (0x00000002)
Result from add:
        uint32 5 (0x00000005)

Operands to subtract:
        uint32 3 (0x00000003)
        uint32 2 (0x00000002)
Result from subtract:
        uint32 1 (0x00000001)

Operands to dot:
        uint32 1 (0x00000001)
        uint32 2 (0x00000002)
        uint32 3 (0x00000003)
        uint32 4 (0x00000004)
Result from dot:
        uint32 14 (0x0000000E)

",
    );
}

#[test]
fn test_mixed_precision_operation() {
    binums_test(
        &["float32", "add", "float16", "2", "3"],
        "Operands to add:
       float16 2 (0x4000)
       float16 3 (0x4200)
Result from add:
       float32 5 (0x40A00000)

",
    );
}

#[test]
fn test_fixed_point_subtract() {
    binums_test(
        &["fixed12_12", "sub", "3.5", "2"],
        "Operands to subtract:
    fixed12_12 3.5 (0x003800)
    fixed12_12 2 (0x002000)
Result from subtract:
    fixed12_12 1.5 (0x001800)

",
    );
}

#[test]
fn test_truncate() {
    binums_test(
        &["float32", "trunc", "3.7,-3.7"],
        "Operands to truncate:
       float32 3.7000000476837158203125 (0x406CCCCD)
       float32 -3.7000000476837158203125 (0xC06CCCCD)
Result from truncate:
       float32 3 (0x40400000)
       float32 -3 (0xC0400000)

",
    );
}

#[test]
fn test_grouped_operands() {
    binums_test(
        &["int16", "add", "(", "1", "2", ")", "3"],
        "Operands to add:
         int16 1 (0x0001)
         int16 2 (0x0002)
Result from add:
         int16 3 (0x0003)

Operands to nop:
         int16 3 (0x0003)
Result from nop:
         int16 3 (0x0003)

",
    );
}

#[test]
fn test_nop_keeps_operand_types() {
    binums_test(
        &["nop", "-1", "0x1.0p-1074", "017"],
        "Operands to nop:
         int32 -1 (0xFFFFFFFF)
       float64 4.94065645841246544176569e-324 (0x0000000000000001)
         int32 15 (0x0000000F)
Result from nop:
         int32 -1 (0xFFFFFFFF)
       float64 4.94065645841246544176569e-324 (0x0000000000000001)
         int32 15 (0x0000000F)

",
    );
}
