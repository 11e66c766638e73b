//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::testing::{run_test, TestPlan};

fn binums_error_test(args: &[&str], expected_err: &str, expected_out: &str) {
    run_test(TestPlan {
        expected_out: String::from(expected_out),
        expected_err: String::from(expected_err),
        expected_exit_code: 1,
        ..TestPlan::new(args)
    });
}

#[test]
fn test_no_arguments_prints_usage() {
    binums_error_test(&[], "", &binums::usage());
}

#[test]
fn test_unknown_token() {
    binums_error_test(
        &["add", "1", "bogus"],
        "binums: Unknown parameter: \"bogus\"\n",
        &binums::usage(),
    );
}

#[test]
fn test_division_by_zero() {
    binums_error_test(
        &["int8", "div", "1", "0"],
        "binums: Division by zero in int8 arithmetic\n",
        "",
    );
}

#[test]
fn test_unsupported_types() {
    binums_error_test(
        &["complex64", "1"],
        "binums: Unsupported element type: complex64\n",
        "",
    );
    binums_error_test(
        &["bool8", "add", "1", "0"],
        "binums: Unsupported element type: bool8\n",
        "",
    );
}

#[test]
fn test_malformed_grouping() {
    binums_error_test(
        &["add", "(", "1", "2"],
        "binums: Malformed syntax: unclosed \"(\"\n",
        "",
    );
    binums_error_test(
        &["add", "1", ")"],
        "binums: Malformed syntax: unmatched \")\"\n",
        "",
    );
    binums_error_test(
        &["add", "(", "1", "(", "2", ")", ")"],
        "binums: Malformed syntax: nested \"(\"\n",
        "",
    );
}

#[test]
fn test_no_partial_output() {
    binums_error_test(
        &["add", "1", "2", "div", "int8", "1", "0"],
        "binums: Division by zero in int8 arithmetic\n",
        "",
    );
}
