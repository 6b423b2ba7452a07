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

use super::enums::OffsetMode;
use super::errors::{BuildError, ScanError};
use super::pattern::build_patterns;
use super::pattern_table::PatternTable;
use super::range_list::{Range, RangeList};
use super::skip_table::SkipTable;
use super::specification::SpecificationStore;
use super::types::PatternReference;

/// Scan object, the value of a scan tree branch.
#[derive(Debug)]
pub(crate) enum ScanObject {
    /// Index of a sub node within the scan tree.
    Node(usize),

    /// Matched pattern.
    Pattern(PatternReference),
}

/// Scan tree node, dispatching on the byte value at one pattern offset.
#[derive(Debug)]
pub(crate) struct ScanTreeNode {
    /// Pattern offset, negative values are relative from the end of the data.
    pub pattern_offset: i64,

    /// Scan objects per byte value.
    byte_values: BTreeMap<u8, ScanObject>,

    /// Default (non-match) scan object.
    default_value: Option<ScanObject>,

    /// Index of the parent node within the scan tree.
    parent: Option<usize>,
}

impl ScanTreeNode {
    /// Creates a new scan tree node.
    fn new(pattern_offset: i64) -> Self {
        Self {
            pattern_offset: pattern_offset,
            byte_values: BTreeMap::new(),
            default_value: None,
            parent: None,
        }
    }

    /// Adds a scan object for a specific byte value.
    fn add_byte_value(&mut self, byte_value: u8, scan_object: ScanObject) -> Result<(), BuildError> {
        if self.byte_values.contains_key(&byte_value) {
            return Err(BuildError::InvariantBroken(format!(
                "Byte value: 0x{:02x} already set",
                byte_value
            )));
        }
        self.byte_values.insert(byte_value, scan_object);

        Ok(())
    }

    /// Sets the default (non-match) scan object.
    fn set_default_value(&mut self, scan_object: ScanObject) -> Result<(), BuildError> {
        if self.default_value.is_some() {
            return Err(BuildError::InvariantBroken(String::from(
                "Default value already set",
            )));
        }
        self.default_value = Some(scan_object);

        Ok(())
    }
}

/// Scan tree.
///
/// Decision tree over a set of patterns that dispatches on the byte value at
/// one pattern offset per level. The nodes are stored in an arena and refer
/// to each other by index.
pub struct ScanTree {
    /// Nodes.
    nodes: Vec<ScanTreeNode>,

    /// Index of the root node or None if the tree holds no patterns.
    pub(crate) root_node: Option<usize>,

    /// Ranges in which the patterns are expected to be found.
    range_list: RangeList,

    /// Skip table.
    pub(crate) skip_table: SkipTable,

    /// Largest pattern length.
    pub(crate) largest_pattern_length: usize,
}

impl ScanTree {
    /// Builds a scan tree for the specifications in a store.
    ///
    /// An `is_bound` of `Some(true)` builds the tree over the bound patterns
    /// at their signature offsets, `Some(false)` over the unbound patterns
    /// and `None` over all patterns, handled as unbound.
    pub fn build(
        specification_store: &SpecificationStore,
        is_bound: Option<bool>,
        offset_mode: Option<&OffsetMode>,
    ) -> Result<Self, BuildError> {
        let mut range_list: RangeList = RangeList::new();
        let pattern_list: Vec<PatternReference> =
            build_patterns(specification_store, is_bound, offset_mode, &mut range_list)?;

        let mut scan_tree: ScanTree = Self {
            nodes: Vec::new(),
            root_node: None,
            range_list: range_list,
            skip_table: SkipTable::new(0),
            largest_pattern_length: 0,
        };
        let ignore_list: Vec<i64> = Vec::new();
        let mut pattern_table: PatternTable =
            PatternTable::new(&pattern_list, &ignore_list, is_bound)?;

        if !pattern_table.patterns.is_empty() {
            pattern_table.calculate_pattern_weights()?;

            let root_index: usize = scan_tree.build_node(&pattern_table, &ignore_list, is_bound)?;
            scan_tree.root_node = Some(root_index);
        }
        scan_tree.skip_table = pattern_table.skip_table()?;
        scan_tree.largest_pattern_length = pattern_table.largest_pattern_length;

        Ok(scan_tree)
    }

    /// Retrieves the range spanning the ranges of all patterns or None if
    /// the tree holds no patterns.
    pub fn spanning_range(&self) -> Option<Range> {
        self.range_list.spanning_range()
    }

    /// Determines the scan object for the byte value at a specific data
    /// offset, where a node without a matching branch falls back to its
    /// default scan object or the nearest default up the parent chain.
    pub(crate) fn compare_byte_value(
        &self,
        node_index: usize,
        data: &[u8],
        data_offset: usize,
        match_on_boundary: bool,
    ) -> Result<Option<&ScanObject>, ScanError> {
        let data_size: usize = data.len();

        if data_offset >= data_size {
            return Err(ScanError::DataOffsetOutOfBounds(format!(
                "Data offset: {} out of bounds",
                data_offset
            )));
        }
        let node: &ScanTreeNode = &self.nodes[node_index];

        // A negative pattern offset is relative from the end of the data.
        let mut probe_offset: i64 = data_offset as i64 + node.pattern_offset;
        if probe_offset < 0 {
            probe_offset += data_size as i64;
        }
        if !match_on_boundary && probe_offset >= data_size as i64 {
            return Err(ScanError::DataOffsetOutOfBounds(format!(
                "Pattern offset: {} out of bounds",
                probe_offset
            )));
        }
        let mut scan_object: Option<&ScanObject> = None;

        // A probe offset outside the data continues with the default scan
        // object.
        if probe_offset >= 0 && probe_offset < data_size as i64 {
            let byte_value: u8 = data[probe_offset as usize];
            scan_object = node.byte_values.get(&byte_value);
        }
        if scan_object.is_none() {
            scan_object = node.default_value.as_ref();

            if scan_object.is_none() {
                let mut parent_index: Option<usize> = node.parent;

                while let Some(index) = parent_index {
                    let parent_node: &ScanTreeNode = &self.nodes[index];

                    if parent_node.default_value.is_some() {
                        scan_object = parent_node.default_value.as_ref();
                        break;
                    }
                    parent_index = parent_node.parent;
                }
            }
        }
        Ok(scan_object)
    }

    /// Builds a scan tree node over the patterns in the table and returns its
    /// index within the tree.
    fn build_node(
        &mut self,
        pattern_table: &PatternTable,
        ignore_list: &[i64],
        is_bound: Option<bool>,
    ) -> Result<usize, BuildError> {
        let pattern_offset: i64 = pattern_table.most_significant_pattern_offset()?;

        let mut sub_ignore_list: Vec<i64> = ignore_list.to_vec();
        sub_ignore_list.push(pattern_offset);

        let node_index: usize = self.nodes.len();
        self.nodes.push(ScanTreeNode::new(pattern_offset));

        let mut remaining_patterns: Vec<PatternReference> = pattern_table.patterns.clone();

        if let Some(byte_values) = pattern_table.byte_values_at(pattern_offset) {
            for (byte_value, byte_value_patterns) in byte_values.iter() {
                let number_of_patterns: usize = byte_value_patterns.patterns.len();

                if number_of_patterns == 0 {
                    return Err(BuildError::InvariantBroken(format!(
                        "Missing patterns for offset: {} byte value: 0x{:02x}",
                        pattern_offset, byte_value_patterns.byte_value
                    )));
                }
                let scan_object: ScanObject = if number_of_patterns == 1 {
                    ScanObject::Pattern(Arc::clone(&byte_value_patterns.patterns[0]))
                } else {
                    let mut sub_pattern_table: PatternTable = PatternTable::new(
                        &byte_value_patterns.patterns,
                        &sub_ignore_list,
                        is_bound,
                    )?;
                    sub_pattern_table.calculate_pattern_weights()?;

                    let sub_node_index: usize =
                        self.build_node(&sub_pattern_table, &sub_ignore_list, is_bound)?;
                    self.nodes[sub_node_index].parent = Some(node_index);

                    ScanObject::Node(sub_node_index)
                };
                self.nodes[node_index].add_byte_value(*byte_value, scan_object)?;

                remaining_patterns.retain(|pattern| {
                    !byte_value_patterns
                        .patterns
                        .iter()
                        .any(|byte_value_pattern| byte_value_pattern.identifier == pattern.identifier)
                });
            }
        }
        match remaining_patterns.len() {
            0 => {}
            1 => {
                self.nodes[node_index]
                    .set_default_value(ScanObject::Pattern(Arc::clone(&remaining_patterns[0])))?;
            }
            _ => {
                let mut sub_pattern_table: PatternTable =
                    PatternTable::new(&remaining_patterns, &sub_ignore_list, is_bound)?;
                sub_pattern_table.calculate_pattern_weights()?;

                let sub_node_index: usize =
                    self.build_node(&sub_pattern_table, &sub_ignore_list, is_bound)?;
                self.nodes[sub_node_index].parent = Some(node_index);

                self.nodes[node_index].set_default_value(ScanObject::Node(sub_node_index))?;
            }
        };
        Ok(node_index)
    }
}
