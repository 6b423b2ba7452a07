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

use super::errors::BuildError;

/// Range of data defined by an offset and size.
#[derive(Clone, Debug)]
pub struct Range {
    /// Start offset.
    pub start_offset: i64,

    /// Size.
    pub size: i64,

    /// End offset.
    pub end_offset: i64,
}

impl Range {
    /// Creates a new range.
    pub fn new(range_offset: i64, range_size: i64) -> Result<Self, BuildError> {
        if range_offset < 0 {
            return Err(BuildError::InvariantBroken(String::from(
                "Invalid range offset value",
            )));
        }
        if range_size < 0 {
            return Err(BuildError::InvariantBroken(String::from(
                "Invalid range size value",
            )));
        }
        Ok(Self {
            start_offset: range_offset,
            size: range_size,
            end_offset: range_offset + range_size,
        })
    }
}

/// Ordered list of non-overlapping ranges.
pub struct RangeList {
    /// Ranges.
    pub ranges: Vec<Range>,
}

impl RangeList {
    /// Creates a new range list.
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Retrieves the number of ranges.
    pub fn number_of_ranges(&self) -> usize {
        self.ranges.len()
    }

    /// Retrieves the range spanning the entire range list.
    pub fn spanning_range(&self) -> Option<Range> {
        if self.ranges.is_empty() {
            return None;
        }
        let first_range: &Range = &self.ranges[0];
        let last_range: &Range = &self.ranges[self.ranges.len() - 1];

        Some(Range {
            start_offset: first_range.start_offset,
            size: last_range.end_offset - first_range.start_offset,
            end_offset: last_range.end_offset,
        })
    }

    /// Inserts the range defined by the offset and size in the list.
    ///
    /// A range that overlaps or touches an existing range is merged with it.
    pub fn insert(&mut self, range_offset: i64, range_size: i64) -> Result<(), BuildError> {
        if range_offset < 0 {
            return Err(BuildError::InvariantBroken(String::from(
                "Invalid range offset value",
            )));
        }
        if range_size < 0 {
            return Err(BuildError::InvariantBroken(String::from(
                "Invalid range size value",
            )));
        }
        let mut insert_index: Option<usize> = None;
        let mut merge_index: Option<usize> = None;

        let number_of_ranges: usize = self.ranges.len();
        let range_end_offset: i64 = range_offset + range_size;

        if number_of_ranges == 0 {
            insert_index = Some(0);
        } else {
            let mut range_index: usize = 0;

            while range_index < number_of_ranges {
                let range: &Range = &self.ranges[range_index];

                // Ranges with a negative start offset are skipped.
                if range.start_offset < 0 {
                    range_index += 1;
                    continue;
                }
                // Insert the range before an existing one.
                if range_end_offset < range.start_offset {
                    insert_index = Some(range_index);
                    break;
                }
                // Ignore the range since the existing one contains it.
                if range_offset >= range.start_offset && range_end_offset <= range.end_offset {
                    break;
                }
                // Merge the range since it overlaps the existing one at the end.
                if range_offset >= range.start_offset && range_offset <= range.end_offset {
                    merge_index = Some(range_index);
                    break;
                }
                // Merge the range since it overlaps the existing one at the start.
                if range_end_offset >= range.start_offset && range_end_offset <= range.end_offset {
                    merge_index = Some(range_index);
                    break;
                }
                // Merge the range since it contains the existing one.
                if range_offset <= range.start_offset && range_end_offset >= range.end_offset {
                    merge_index = Some(range_index);
                    break;
                }
                range_index += 1;
            }
            // Insert the range after the last one.
            if range_index >= number_of_ranges {
                insert_index = Some(number_of_ranges);
            }
        }
        match (insert_index, merge_index) {
            (Some(_), Some(_)) => Err(BuildError::InvariantBroken(String::from(
                "Unable to insert the range both insert and merge specified",
            ))),
            (Some(index), None) => {
                self.ranges.insert(index, Range::new(range_offset, range_size)?);
                Ok(())
            }
            (None, Some(index)) => {
                let range: &mut Range = &mut self.ranges[index];

                if range_offset < range.start_offset {
                    range.size += range.start_offset - range_offset;
                    range.start_offset = range_offset;
                }
                if range_end_offset > range.end_offset {
                    range.size += range_end_offset - range.end_offset;
                    range.end_offset = range_end_offset;
                }
                Ok(())
            }
            (None, None) => Ok(()),
        }
    }
}
