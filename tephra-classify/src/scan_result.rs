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

use std::sync::Arc;

use super::types::{PatternReference, SpecificationReference};

/// Result of a scan, a pattern found at a specific offset.
#[derive(Debug)]
pub struct ScanResult {
    /// Offset of the match relative from the start of the file.
    pub file_offset: u64,

    /// Matched pattern.
    pub pattern: PatternReference,
}

impl ScanResult {
    /// Creates a new scan result.
    pub(crate) fn new(file_offset: u64, pattern: &PatternReference) -> Self {
        Self {
            file_offset: file_offset,
            pattern: Arc::clone(pattern),
        }
    }

    /// Retrieves the specification of the matched pattern.
    pub fn specification(&self) -> &SpecificationReference {
        &self.pattern.specification
    }
}
