/* Copyright 2024-2025 Joachim Metz <joachim.metz@gmail.com>
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may
 * obtain a copy of the License at https://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
 * WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied. See the
 * License for the specific language governing permissions and limitations
 * under the License.
 */

use std::error::Error;
use std::fmt;

/// Error raised while building a scanner.
#[derive(Debug)]
pub enum BuildError {
    /// A specification or pattern identifier is already in use.
    DuplicateIdentifier(String),

    /// A signature offset sign violates the configured offset mode.
    InvalidOffset(String),

    /// A skip value is out of bounds.
    InvalidSkipValue(String),

    /// An internal invariant was broken during the build.
    InvariantBroken(String),

    /// No pattern offset with a positive value weight was found, the
    /// patterns cannot be distinguished.
    NoDiscriminator(String),

    /// A signature expression is too short to discriminate between formats.
    PatternTooShort(String),
}

impl Error for BuildError {}

impl fmt::Display for BuildError {
    /// Formats the error as a string.
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuildError::DuplicateIdentifier(message) => {
                write!(formatter, "Duplicate identifier: {}", message)
            }
            BuildError::InvalidOffset(message) => {
                write!(formatter, "Invalid offset: {}", message)
            }
            BuildError::InvalidSkipValue(message) => {
                write!(formatter, "Invalid skip value: {}", message)
            }
            BuildError::InvariantBroken(message) => {
                write!(formatter, "Invariant broken: {}", message)
            }
            BuildError::NoDiscriminator(message) => {
                write!(formatter, "No discriminator: {}", message)
            }
            BuildError::PatternTooShort(message) => {
                write!(formatter, "Pattern too short: {}", message)
            }
        }
    }
}

/// Error raised while scanning.
#[derive(Debug)]
pub enum ScanError {
    /// A data offset fell outside the buffer being scanned.
    DataOffsetOutOfBounds(String),

    /// A scan state transition was requested from an unsupported phase.
    UnsupportedState(String),
}

impl Error for ScanError {}

impl fmt::Display for ScanError {
    /// Formats the error as a string.
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScanError::DataOffsetOutOfBounds(message) => {
                write!(formatter, "Data offset out of bounds: {}", message)
            }
            ScanError::UnsupportedState(message) => {
                write!(formatter, "Unsupported state: {}", message)
            }
        }
    }
}
