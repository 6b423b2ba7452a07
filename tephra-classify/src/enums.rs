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

/// Classify mode.
#[derive(Clone, Debug, PartialEq)]
pub enum ClassifyMode {
    /// The entire data stream is scanned.
    FullScan,

    /// Only the beginning and the end of the data stream are scanned, where
    /// the data stream is larger than twice the buffer size.
    HeadTailScan,
}

/// Signature offset handling mode.
#[derive(Clone, Debug, PartialEq)]
pub enum OffsetMode {
    /// The offset must be positive, signatures with a negative offset are skipped.
    Positive,

    /// The offset must be positive, a negative offset fails the build.
    PositiveStrict,

    /// The offset must be negative, signatures with a positive offset are skipped.
    Negative,

    /// The offset must be negative, a positive offset fails the build.
    NegativeStrict,
}

/// Scan phase.
#[derive(Clone, Debug, PartialEq)]
pub enum ScanPhase {
    /// The scan has not processed any data yet.
    Start,

    /// The scan is processing data.
    Scanning,

    /// The scan has been stopped.
    Stopped,
}
