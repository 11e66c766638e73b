//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use crate::element_type::ElementType;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unsupported element type: {0}")]
    UnsupportedType(ElementType),
    #[error("Unknown parameter: \"{0}\"")]
    UnknownToken(String),
    #[error("Malformed syntax: {0}")]
    MalformedSyntax(String),
    #[error("Division by zero in {0} arithmetic")]
    DivisionByZero(ElementType),
}

pub type Result<T> = std::result::Result<T, Error>;
