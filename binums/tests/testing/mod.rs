//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::process::{Command, Output, Stdio};

pub struct TestPlan {
    pub args: Vec<String>,
    pub expected_out: String,
    pub expected_err: String,
    pub expected_exit_code: i32,
}

impl TestPlan {
    pub fn new(args: &[&str]) -> Self {
        Self {
            args: args.iter().map(|s| String::from(*s)).collect(),
            expected_out: String::new(),
            expected_err: String::new(),
            expected_exit_code: 0,
        }
    }
}

pub fn run_test_base(args: &[String]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_binums"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run binums")
}

pub fn run_test(plan: TestPlan) {
    let output = run_test_base(&plan.args);

    let stdout = String::from_utf8_lossy(&output.stdout);
    similar_asserts::assert_eq!(stdout.to_string(), plan.expected_out);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr, plan.expected_err);

    assert_eq!(output.status.code(), Some(plan.expected_exit_code));
    if plan.expected_exit_code == 0 {
        assert!(output.status.success());
    }
}

pub fn run_test_with_checker<F: FnMut(&TestPlan, &Output)>(plan: TestPlan, mut checker: F) {
    let output = run_test_base(&plan.args);
    checker(&plan, &output);
}
