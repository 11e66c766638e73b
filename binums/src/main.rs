//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use binums::error::Error;
use binums::{run, usage, Args, PROJECT_NAME};
use clap::Parser;
use gettextrs::{bind_textdomain_codeset, setlocale, textdomain, LocaleCategory};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setlocale(LocaleCategory::LcAll, "");
    textdomain(PROJECT_NAME)?;
    bind_textdomain_codeset(PROJECT_NAME, "UTF-8")?;

    env_logger::init();

    let args = Args::parse();

    let mut exit_code = 0;

    if args.tokens.is_empty() {
        exit_code = 1;
        print!("{}", usage());
    } else {
        match run(&args) {
            Ok(report) => print!("{report}"),
            Err(e) => {
                exit_code = 1;
                eprintln!("binums: {e}");
                if let Error::UnknownToken(_) = e {
                    print!("{}", usage());
                }
            }
        }
    }

    std::process::exit(exit_code)
}
