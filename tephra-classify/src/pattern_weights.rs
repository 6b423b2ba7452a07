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

use std::collections::{BTreeMap, BTreeSet};

use super::errors::BuildError;

/// Pattern weights.
///
/// Tracks a weight per pattern offset and the inverse relation, so that the
/// largest weight and the offsets carrying a specific weight can be retrieved
/// directly. Offsets iterate in ascending order to keep tie-breaking
/// deterministic.
pub(crate) struct PatternWeights {
    /// Offsets per weight.
    offsets_per_weight: BTreeMap<isize, BTreeSet<i64>>,

    /// Weight per offset.
    weight_per_offset: BTreeMap<i64, isize>,
}

impl PatternWeights {
    /// Creates new pattern weights.
    pub fn new() -> Self {
        Self {
            offsets_per_weight: BTreeMap::new(),
            weight_per_offset: BTreeMap::new(),
        }
    }

    /// Adds a pattern offset and sets its weight to 0.
    pub fn add_offset(&mut self, pattern_offset: i64) -> Result<(), BuildError> {
        if self.weight_per_offset.contains_key(&pattern_offset) {
            return Err(BuildError::InvariantBroken(format!(
                "Pattern offset: {} already set",
                pattern_offset
            )));
        }
        self.weight_per_offset.insert(pattern_offset, 0);

        Ok(())
    }

    /// Adds a weight for a specific pattern offset.
    pub fn add_weight(&mut self, pattern_offset: i64, weight: isize) -> Result<(), BuildError> {
        let total_weight: isize = match self.weight_per_offset.get(&pattern_offset) {
            Some(current_weight) => current_weight + weight,
            None => {
                return Err(BuildError::InvariantBroken(format!(
                    "Pattern offset: {} not set",
                    pattern_offset
                )));
            }
        };
        self.change_weight(pattern_offset, total_weight);

        Ok(())
    }

    /// Retrieves the largest weight or 0 if none.
    pub fn largest_weight(&self) -> isize {
        match self.offsets_per_weight.last_key_value() {
            Some((weight, _)) => *weight,
            None => 0,
        }
    }

    /// Retrieves the offsets for a specific weight, in ascending order.
    pub fn offsets_for_weight(&self, weight: isize) -> Vec<i64> {
        match self.offsets_per_weight.get(&weight) {
            Some(pattern_offsets) => pattern_offsets.iter().copied().collect(),
            None => Vec::new(),
        }
    }

    /// Sets a weight for a specific pattern offset.
    pub fn set_weight(&mut self, pattern_offset: i64, weight: isize) -> Result<(), BuildError> {
        if !self.weight_per_offset.contains_key(&pattern_offset) {
            return Err(BuildError::InvariantBroken(format!(
                "Pattern offset: {} not set",
                pattern_offset
            )));
        }
        self.change_weight(pattern_offset, weight);

        Ok(())
    }

    /// Retrieves the weight for a specific pattern offset.
    pub fn weight_for_offset(&self, pattern_offset: i64) -> isize {
        match self.weight_per_offset.get(&pattern_offset) {
            Some(weight) => *weight,
            None => 0,
        }
    }

    /// Changes the weight of a pattern offset, keeping the inverse relation
    /// synchronised. Offsets with weight 0 are not tracked in the inverse.
    fn change_weight(&mut self, pattern_offset: i64, weight: isize) {
        if let Some(previous_weight) = self.weight_per_offset.insert(pattern_offset, weight) {
            if previous_weight != 0 {
                if let Some(pattern_offsets) = self.offsets_per_weight.get_mut(&previous_weight) {
                    pattern_offsets.remove(&pattern_offset);

                    if pattern_offsets.is_empty() {
                        self.offsets_per_weight.remove(&previous_weight);
                    }
                }
            }
        }
        if weight != 0 {
            match self.offsets_per_weight.get_mut(&weight) {
                Some(pattern_offsets) => {
                    pattern_offsets.insert(pattern_offset);
                }
                None => {
                    let mut pattern_offsets: BTreeSet<i64> = BTreeSet::new();
                    pattern_offsets.insert(pattern_offset);

                    self.offsets_per_weight.insert(weight, pattern_offsets);
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_offset() -> Result<(), BuildError> {
        let mut pattern_weights: PatternWeights = PatternWeights::new();

        pattern_weights.add_offset(0)?;

        assert_eq!(pattern_weights.weight_for_offset(0), 0);
        assert_eq!(pattern_weights.largest_weight(), 0);

        let result = pattern_weights.add_offset(0);
        assert!(result.is_err());

        Ok(())
    }

    #[test]
    fn test_add_weight() -> Result<(), BuildError> {
        let mut pattern_weights: PatternWeights = PatternWeights::new();

        pattern_weights.add_offset(4)?;
        pattern_weights.add_offset(8)?;

        pattern_weights.add_weight(4, 1)?;
        pattern_weights.add_weight(4, 2)?;
        pattern_weights.add_weight(8, 1)?;

        assert_eq!(pattern_weights.weight_for_offset(4), 3);
        assert_eq!(pattern_weights.weight_for_offset(8), 1);
        assert_eq!(pattern_weights.largest_weight(), 3);
        assert_eq!(pattern_weights.offsets_for_weight(3), vec![4]);
        assert_eq!(pattern_weights.offsets_for_weight(1), vec![8]);

        let result = pattern_weights.add_weight(12, 1);
        assert!(result.is_err());

        Ok(())
    }

    #[test]
    fn test_set_weight() -> Result<(), BuildError> {
        let mut pattern_weights: PatternWeights = PatternWeights::new();

        pattern_weights.add_offset(0)?;
        pattern_weights.add_offset(1)?;

        pattern_weights.set_weight(0, 2)?;
        pattern_weights.set_weight(1, 2)?;

        assert_eq!(pattern_weights.largest_weight(), 2);
        assert_eq!(pattern_weights.offsets_for_weight(2), vec![0, 1]);

        pattern_weights.set_weight(1, 5)?;

        assert_eq!(pattern_weights.largest_weight(), 5);
        assert_eq!(pattern_weights.offsets_for_weight(2), vec![0]);

        let result = pattern_weights.set_weight(12, 1);
        assert!(result.is_err());

        Ok(())
    }
}
