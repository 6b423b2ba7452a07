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

use std::collections::BTreeMap;
use std::sync::Arc;

use tephra_core::mediator::{Mediator, MediatorReference};

use super::constants::COMMON_BYTE_VALUES;
use super::errors::BuildError;
use super::pattern_weights::PatternWeights;
use super::skip_table::SkipTable;
use super::types::PatternReference;

/// Mapping between a byte value and the patterns that exhibit it at a
/// specific pattern offset.
pub(crate) struct ByteValuePatterns {
    /// Byte value.
    pub byte_value: u8,

    /// Patterns.
    pub patterns: Vec<PatternReference>,
}

impl ByteValuePatterns {
    /// Creates a new byte value to patterns mapping.
    pub fn new(byte_value: u8) -> Self {
        Self {
            byte_value: byte_value,
            patterns: Vec::new(),
        }
    }

    /// Adds a pattern.
    pub fn add_pattern(&mut self, pattern: &PatternReference) -> Result<(), BuildError> {
        if self
            .patterns
            .iter()
            .any(|existing_pattern| existing_pattern.identifier == pattern.identifier)
        {
            return Err(BuildError::DuplicateIdentifier(format!(
                "Pattern: {} is already defined",
                pattern.identifier
            )));
        }
        self.patterns.push(Arc::clone(pattern));

        Ok(())
    }
}

/// Pattern table.
///
/// Indexes the byte value of every pattern per pattern offset and derives the
/// pattern weights that drive the scan tree splits. A table is specialised
/// for either bound or unbound patterns, the two are never mixed.
pub(crate) struct PatternTable {
    /// Mediator.
    mediator: MediatorReference,

    /// Byte values per pattern offset.
    byte_values_per_offset: BTreeMap<i64, BTreeMap<u8, ByteValuePatterns>>,

    /// Patterns.
    pub patterns: Vec<PatternReference>,

    /// Largest pattern length.
    pub largest_pattern_length: usize,

    /// Smallest pattern length.
    pub smallest_pattern_length: usize,

    /// Occurrence (pattern) weights.
    occurrence_weights: PatternWeights,

    /// Similarity (pattern) weights.
    similarity_weights: PatternWeights,

    /// Value (pattern) weights.
    value_weights: PatternWeights,
}

impl PatternTable {
    /// Creates a new pattern table from patterns.
    ///
    /// Patterns whose bound flag does not match `is_bound` are not part of
    /// the table. An `is_bound` of `None` handles every pattern as unbound.
    pub fn new(
        patterns: &[PatternReference],
        ignore_list: &[i64],
        is_bound: Option<bool>,
    ) -> Result<Self, BuildError> {
        let mut pattern_table: PatternTable = Self {
            mediator: Mediator::current(),
            byte_values_per_offset: BTreeMap::new(),
            patterns: Vec::new(),
            largest_pattern_length: 0,
            smallest_pattern_length: 0,
            occurrence_weights: PatternWeights::new(),
            similarity_weights: PatternWeights::new(),
            value_weights: PatternWeights::new(),
        };
        for pattern in patterns.iter() {
            if let Some(is_bound_value) = is_bound {
                if pattern.is_bound() != is_bound_value {
                    continue;
                }
            }
            let pattern_length: usize = pattern.expression().len();

            if pattern_length < 4 {
                return Err(BuildError::PatternTooShort(format!(
                    "Expression of pattern: {} smaller than 4 bytes",
                    pattern.identifier
                )));
            }
            if pattern_table.smallest_pattern_length == 0
                || pattern_length < pattern_table.smallest_pattern_length
            {
                pattern_table.smallest_pattern_length = pattern_length;
            }
            if pattern_length > pattern_table.largest_pattern_length {
                pattern_table.largest_pattern_length = pattern_length;
            }
            pattern_table.patterns.push(Arc::clone(pattern));
            pattern_table.add_pattern(pattern, ignore_list, is_bound)?;
        }
        Ok(pattern_table)
    }

    /// Retrieves the byte values for a specific pattern offset.
    pub fn byte_values_at(&self, pattern_offset: i64) -> Option<&BTreeMap<u8, ByteValuePatterns>> {
        self.byte_values_per_offset.get(&pattern_offset)
    }

    /// Calculates the pattern weights.
    pub fn calculate_pattern_weights(&mut self) -> Result<(), BuildError> {
        for (pattern_offset, byte_values) in self.byte_values_per_offset.iter() {
            self.occurrence_weights.add_offset(*pattern_offset)?;
            self.similarity_weights.add_offset(*pattern_offset)?;
            self.value_weights.add_offset(*pattern_offset)?;

            let number_of_byte_values: usize = byte_values.len();

            if number_of_byte_values > 1 {
                self.occurrence_weights
                    .set_weight(*pattern_offset, number_of_byte_values as isize)?;
            }
            for (byte_value, byte_value_patterns) in byte_values.iter() {
                let number_of_patterns: usize = byte_value_patterns.patterns.len();

                if number_of_patterns > 1 {
                    self.similarity_weights
                        .add_weight(*pattern_offset, number_of_patterns as isize)?;
                }
                if !COMMON_BYTE_VALUES[*byte_value as usize] {
                    self.value_weights.add_weight(*pattern_offset, 1)?;
                }
            }
        }
        Ok(())
    }

    /// Retrieves the most significant pattern offset, the offset that most
    /// discriminates between the patterns in the table.
    pub fn most_significant_pattern_offset(&self) -> Result<i64, BuildError> {
        if self.patterns.is_empty() {
            return Err(BuildError::InvariantBroken(String::from(
                "Missing patterns",
            )));
        }
        let pattern_offset: i64 = match self.patterns.len() {
            1 => self.pattern_offset_by_value_weights()?,
            2 => self.pattern_offset_by_occurrence_weights()?,
            _ => self.pattern_offset_by_similarity_weights()?,
        };
        if self.mediator.debug_output {
            self.mediator.debug_print(format!(
                "PatternTable::most_significant_pattern_offset {{\n"
            ));
            self.mediator
                .debug_print(format!("    pattern_offset: {}\n", pattern_offset));
            self.mediator.debug_print(format!("}}\n\n"));
        }
        Ok(pattern_offset)
    }

    /// Retrieves the skip table for the patterns in the table.
    pub fn skip_table(&self) -> Result<SkipTable, BuildError> {
        let mut skip_table: SkipTable = SkipTable::new(self.smallest_pattern_length);

        for pattern in self.patterns.iter() {
            let expression: &[u8] = pattern.expression();
            let mut skip_value: usize = self.smallest_pattern_length;

            for expression_index in 0..self.smallest_pattern_length {
                skip_value -= 1;
                skip_table.set_skip_value(expression[expression_index], skip_value)?;
            }
        }
        Ok(skip_table)
    }

    /// Adds the byte values per offset of the pattern to the table.
    fn add_pattern(
        &mut self,
        pattern: &PatternReference,
        ignore_list: &[i64],
        is_bound: Option<bool>,
    ) -> Result<(), BuildError> {
        let mut pattern_offset: i64 = match is_bound {
            Some(true) => pattern.offset(),
            _ => 0,
        };
        for byte_value in pattern.expression().iter() {
            if !ignore_list.contains(&pattern_offset) {
                let byte_values: &mut BTreeMap<u8, ByteValuePatterns> = self
                    .byte_values_per_offset
                    .entry(pattern_offset)
                    .or_insert_with(BTreeMap::new);

                match byte_values.get_mut(byte_value) {
                    Some(byte_value_patterns) => byte_value_patterns.add_pattern(pattern)?,
                    None => {
                        let mut byte_value_patterns: ByteValuePatterns =
                            ByteValuePatterns::new(*byte_value);
                        byte_value_patterns.add_pattern(pattern)?;

                        byte_values.insert(*byte_value, byte_value_patterns);
                    }
                };
            }
            pattern_offset += 1;
        }
        Ok(())
    }

    /// Retrieves the pattern offset with the largest occurrence weight, with
    /// ties broken by the largest value weight.
    fn pattern_offset_by_occurrence_weights(&self) -> Result<i64, BuildError> {
        let largest_weight: isize = self.occurrence_weights.largest_weight();

        if self.mediator.debug_output {
            self.mediator.debug_print(format!(
                "PatternTable::pattern_offset_by_occurrence_weights {{\n"
            ));
            self.mediator
                .debug_print(format!("    largest_occurrence_weight: {}\n", largest_weight));
            self.mediator.debug_print(format!("}}\n\n"));
        }
        if largest_weight <= 0 {
            return self.pattern_offset_by_value_weights();
        }
        let occurrence_offsets: Vec<i64> = self.occurrence_weights.offsets_for_weight(largest_weight);

        if occurrence_offsets.len() == 1 {
            return Ok(occurrence_offsets[0]);
        }
        let mut largest_value_weight: isize = 0;
        let mut pattern_offset: i64 = occurrence_offsets[0];

        for (offset_index, occurrence_offset) in occurrence_offsets.iter().enumerate() {
            let value_weight: isize = self.value_weights.weight_for_offset(*occurrence_offset);

            if offset_index == 0 || value_weight > largest_value_weight {
                largest_value_weight = value_weight;
                pattern_offset = *occurrence_offset;
            }
        }
        Ok(pattern_offset)
    }

    /// Retrieves the pattern offset with the largest similarity weight, with
    /// ties broken by the largest occurrence weight and next the largest
    /// value weight.
    fn pattern_offset_by_similarity_weights(&self) -> Result<i64, BuildError> {
        let largest_weight: isize = self.similarity_weights.largest_weight();

        if self.mediator.debug_output {
            self.mediator.debug_print(format!(
                "PatternTable::pattern_offset_by_similarity_weights {{\n"
            ));
            self.mediator
                .debug_print(format!("    largest_similarity_weight: {}\n", largest_weight));
            self.mediator.debug_print(format!("}}\n\n"));
        }
        if largest_weight <= 0 {
            return self.pattern_offset_by_occurrence_weights();
        }
        let similarity_offsets: Vec<i64> = self.similarity_weights.offsets_for_weight(largest_weight);

        if similarity_offsets.len() == 1 {
            return Ok(similarity_offsets[0]);
        }
        let mut largest_occurrence_weight: isize = 0;
        let mut largest_value_weight: isize = 0;
        let mut pattern_offset: i64 = similarity_offsets[0];

        for (offset_index, similarity_offset) in similarity_offsets.iter().enumerate() {
            let occurrence_weight: isize =
                self.occurrence_weights.weight_for_offset(*similarity_offset);
            let value_weight: isize = self.value_weights.weight_for_offset(*similarity_offset);

            let select_offset: bool = if offset_index == 0 {
                true
            } else if occurrence_weight > largest_occurrence_weight {
                true
            } else {
                occurrence_weight == largest_occurrence_weight
                    && value_weight > largest_value_weight
            };
            if select_offset {
                largest_occurrence_weight = occurrence_weight;
                largest_value_weight = value_weight;
                pattern_offset = *similarity_offset;
            }
        }
        Ok(pattern_offset)
    }

    /// Retrieves the pattern offset with the largest value weight.
    fn pattern_offset_by_value_weights(&self) -> Result<i64, BuildError> {
        let largest_weight: isize = self.value_weights.largest_weight();

        if self.mediator.debug_output {
            self.mediator.debug_print(format!(
                "PatternTable::pattern_offset_by_value_weights {{\n"
            ));
            self.mediator
                .debug_print(format!("    largest_value_weight: {}\n", largest_weight));
            self.mediator.debug_print(format!("}}\n\n"));
        }
        if largest_weight <= 0 {
            return Err(BuildError::NoDiscriminator(String::from(
                "No pattern offset with a positive value weight",
            )));
        }
        let value_offsets: Vec<i64> = self.value_weights.offsets_for_weight(largest_weight);

        Ok(value_offsets[0])
    }
}
