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

use std::collections::HashMap;

use super::errors::BuildError;

/// Boyer-Moore-Horspool skip table.
#[derive(Debug)]
pub(crate) struct SkipTable {
    /// Skip pattern length, the length of the smallest pattern.
    pub skip_pattern_length: usize,

    /// Skip value per byte value.
    skip_values: HashMap<u8, usize>,
}

impl SkipTable {
    /// Creates a new skip table.
    pub fn new(skip_pattern_length: usize) -> Self {
        Self {
            skip_pattern_length: skip_pattern_length,
            skip_values: HashMap::new(),
        }
    }

    /// Retrieves the skip value for a specific byte value.
    ///
    /// Byte values that do not appear in the table yield the skip pattern
    /// length.
    pub fn skip_value(&self, byte_value: u8) -> usize {
        match self.skip_values.get(&byte_value) {
            Some(skip_value) => *skip_value,
            None => self.skip_pattern_length,
        }
    }

    /// Sets a skip value, keeping the smallest value for the byte value.
    pub fn set_skip_value(&mut self, byte_value: u8, skip_value: usize) -> Result<(), BuildError> {
        if skip_value >= self.skip_pattern_length {
            return Err(BuildError::InvalidSkipValue(format!(
                "Skip value: {} out of bounds",
                skip_value
            )));
        }
        match self.skip_values.get(&byte_value) {
            Some(existing_skip_value) if *existing_skip_value <= skip_value => {}
            _ => {
                self.skip_values.insert(byte_value, skip_value);
            }
        };
        Ok(())
    }
}
