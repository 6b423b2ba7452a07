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

use std::cmp::min;
use std::sync::Arc;

use tephra_core::mediator::{Mediator, MediatorReference};

use super::errors::{BuildError, ScanError};
use super::scan_result::ScanResult;
use super::scan_state::ScanState;
use super::scan_tree::{ScanObject, ScanTree};
use super::specification::SpecificationStore;
use super::types::PatternReference;

/// Scan tree-based format signature scanner.
///
/// The scanner and its scan trees are immutable after construction and can
/// be shared between concurrent scans, each owning its own scan state.
pub struct Scanner {
    /// Mediator.
    mediator: MediatorReference,

    /// Scan tree of the patterns bound to an offset, consulted once at the
    /// start of the data.
    bound_scan_tree: ScanTree,

    /// Scan tree of the unbound patterns, driving the streaming scan.
    unbound_scan_tree: ScanTree,
}

impl Scanner {
    /// Creates a new scanner for the specifications in a store.
    pub fn new(specification_store: &SpecificationStore) -> Result<Self, BuildError> {
        let bound_scan_tree: ScanTree = ScanTree::build(specification_store, Some(true), None)?;
        let unbound_scan_tree: ScanTree = ScanTree::build(specification_store, Some(false), None)?;

        Ok(Self {
            mediator: Mediator::current(),
            bound_scan_tree: bound_scan_tree,
            unbound_scan_tree: unbound_scan_tree,
        })
    }

    /// Starts a scan.
    pub fn scan_start(&self) -> ScanState {
        ScanState::new(self.unbound_scan_tree.root_node)
    }

    /// Scans a buffer of data at a specific offset relative from the start
    /// of the file.
    ///
    /// The data is expected to be fed contiguously, the tail carried over
    /// from the previous buffer is discarded when a gap is encountered.
    pub fn scan_buffer(
        &self,
        scan_state: &mut ScanState,
        file_offset: u64,
        data: &[u8],
    ) -> Result<(), ScanError> {
        // The bound scan tree is only consulted at the start of the file,
        // its pattern offsets are absolute.
        if file_offset == 0 {
            self.scan_buffer_with_bounded_scan_tree(scan_state, file_offset, data)?;
        }
        self.scan_buffer_with_scan_state(scan_state, file_offset, data, false)
    }

    /// Stops a scan, scanning the data remaining from the last buffer, and
    /// returns the collected scan results.
    pub fn scan_stop(&self, scan_state: &mut ScanState) -> Result<Vec<ScanResult>, ScanError> {
        if !scan_state.remaining_data.is_empty() {
            let data: Vec<u8> = std::mem::take(&mut scan_state.remaining_data);
            let file_offset: u64 = scan_state.file_offset;

            self.scan_buffer_with_scan_state(scan_state, file_offset, &data, true)?;
        }
        scan_state.stop()?;

        Ok(scan_state.take_results())
    }

    /// Scans the start of a buffer with the bounded scan tree.
    fn scan_buffer_with_bounded_scan_tree(
        &self,
        scan_state: &mut ScanState,
        file_offset: u64,
        data: &[u8],
    ) -> Result<(), ScanError> {
        let root_index: usize = match self.bound_scan_tree.root_node {
            Some(root_index) => root_index,
            None => return Ok(()),
        };
        let data_size: usize = data.len();

        if data_size == 0 {
            return Ok(());
        }
        let mut node_index: usize = root_index;
        let mut pattern_match: Option<PatternReference> = None;

        loop {
            let scan_object: Option<&ScanObject> =
                self.bound_scan_tree
                    .compare_byte_value(node_index, data, 0, true)?;

            match scan_object {
                Some(ScanObject::Node(sub_node_index)) => node_index = *sub_node_index,
                Some(ScanObject::Pattern(pattern)) => {
                    pattern_match = Some(Arc::clone(pattern));
                    break;
                }
                None => break,
            };
        }
        if let Some(pattern) = pattern_match {
            let expression: &[u8] = pattern.expression();
            let signature_offset: i64 = pattern.offset();

            // A negative signature offset is relative from the end of the
            // data.
            let match_offset: i64 = if signature_offset < 0 {
                data_size as i64 + signature_offset
            } else {
                signature_offset
            };
            let match_end_offset: i64 = match_offset + expression.len() as i64;

            if match_offset >= 0
                && match_end_offset <= data_size as i64
                && &data[match_offset as usize..match_end_offset as usize] == expression
            {
                if self.mediator.debug_output {
                    self.mediator.debug_print(format!(
                        "Scanner::scan_buffer_with_bounded_scan_tree {{\n    pattern: {} found at offset: {}\n}}\n\n",
                        pattern.identifier,
                        file_offset + match_offset as u64,
                    ));
                }
                scan_state.add_result(file_offset + match_offset as u64, &pattern);
            }
        }
        Ok(())
    }

    /// Scans a buffer with the unbound scan tree, skipping ahead with the
    /// Boyer-Moore-Horspool skip table.
    fn scan_buffer_with_scan_state(
        &self,
        scan_state: &mut ScanState,
        file_offset: u64,
        data: &[u8],
        match_on_boundary: bool,
    ) -> Result<(), ScanError> {
        let mut node_index: usize = match scan_state.scan_tree_node {
            Some(node_index) => node_index,
            // Without unbound patterns there is nothing to stream.
            None => {
                return scan_state.scanning(file_offset + data.len() as u64, None);
            }
        };
        let root_index: usize = match self.unbound_scan_tree.root_node {
            Some(root_index) => root_index,
            None => {
                return scan_state.scanning(file_offset + data.len() as u64, None);
            }
        };
        let mut file_offset: u64 = file_offset;
        let mut carry: Vec<u8>;

        // Prepend the tail carried over from the previous buffer when the
        // new data continues it, otherwise discard the carry. A gap
        // indicates an intentional skip within the data.
        let data: &[u8] = if scan_state.remaining_data.is_empty() {
            data
        } else if scan_state.remaining_file_offset + scan_state.remaining_data.len() as u64
            == file_offset
        {
            carry = std::mem::take(&mut scan_state.remaining_data);
            carry.extend_from_slice(data);
            file_offset = scan_state.remaining_file_offset;
            &carry
        } else {
            scan_state.remaining_data.clear();
            data
        };
        let data_size: usize = data.len();
        let largest_pattern_length: usize = self.unbound_scan_tree.largest_pattern_length;
        let skip_pattern_length: usize = self.unbound_scan_tree.skip_table.skip_pattern_length;

        let mut data_offset: usize = 0;

        while data_offset < data_size {
            if !match_on_boundary && data_offset + largest_pattern_length >= data_size {
                break;
            }
            let mut pattern_match: Option<PatternReference> = None;

            loop {
                let scan_object: Option<&ScanObject> = self.unbound_scan_tree.compare_byte_value(
                    node_index,
                    data,
                    data_offset,
                    match_on_boundary,
                )?;
                match scan_object {
                    Some(ScanObject::Node(sub_node_index)) => node_index = *sub_node_index,
                    Some(ScanObject::Pattern(pattern)) => {
                        pattern_match = Some(Arc::clone(pattern));
                        break;
                    }
                    None => break,
                };
            }
            let mut skip_value: usize = 0;

            if let Some(pattern) = pattern_match {
                let expression: &[u8] = pattern.expression();
                let data_end_offset: usize = data_offset + expression.len();

                if data_end_offset <= data_size
                    && &data[data_offset..data_end_offset] == expression
                    && (!pattern.is_bound()
                        || pattern.offset() == file_offset as i64 + data_offset as i64)
                {
                    if self.mediator.debug_output {
                        self.mediator.debug_print(format!(
                            "Scanner::scan_buffer_with_scan_state {{\n    pattern: {} found at offset: {}\n}}\n\n",
                            pattern.identifier,
                            file_offset + data_offset as u64,
                        ));
                    }
                    scan_state.add_result(file_offset + data_offset as u64, &pattern);
                    skip_value = expression.len();
                }
            }
            if skip_value == 0 {
                // Determine the Boyer-Moore-Horspool skip value from the
                // last position of the smallest pattern, probing backward
                // while the byte value maps to a skip of 0.
                let mut last_data_offset: usize =
                    min(data_offset + skip_pattern_length - 1, data_size - 1);

                loop {
                    skip_value = self.unbound_scan_tree.skip_table.skip_value(data[last_data_offset]);

                    if skip_value != 0 || last_data_offset <= data_offset {
                        break;
                    }
                    last_data_offset -= 1;
                }
                if skip_value == 0 {
                    skip_value = 1;
                }
            }
            node_index = root_index;
            data_offset += skip_value;
        }
        if !match_on_boundary && data_offset < data_size {
            scan_state.remaining_data = data[data_offset..].to_vec();
            scan_state.remaining_file_offset = file_offset + data_offset as u64;
        }
        scan_state.scanning(file_offset + data_offset as u64, Some(node_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::super::specification::Specification;
    use super::super::test_store;

    #[test]
    fn test_new() -> Result<(), BuildError> {
        let specification_store: SpecificationStore = test_store::create_specification_store()?;
        let _ = Scanner::new(&specification_store)?;

        Ok(())
    }

    #[test]
    fn test_scan_with_lnk_signature() -> Result<(), BuildError> {
        let specification_store: SpecificationStore = test_store::create_specification_store()?;
        let scanner: Scanner = Scanner::new(&specification_store)?;

        let mut data: Vec<u8> = vec![0; 512];
        data[0..20].copy_from_slice(&[
            0x4c, 0x00, 0x00, 0x00, 0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xc0, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x46,
        ]);
        let mut scan_state: ScanState = scanner.scan_start();
        scanner.scan_buffer(&mut scan_state, 0, &data).unwrap();
        let scan_results: Vec<ScanResult> = scanner.scan_stop(&mut scan_state).unwrap();

        assert_eq!(scan_results.len(), 1);
        assert_eq!(scan_results[0].file_offset, 0);
        assert_eq!(scan_results[0].pattern.identifier.as_str(), "lnk_0");

        Ok(())
    }

    #[test]
    fn test_scan_with_regf_signature() -> Result<(), BuildError> {
        let specification_store: SpecificationStore = test_store::create_specification_store()?;
        let scanner: Scanner = Scanner::new(&specification_store)?;

        let mut data: Vec<u8> = vec![0; 1024];
        data[0..4].copy_from_slice("regf".as_bytes());

        let mut scan_state: ScanState = scanner.scan_start();
        scanner.scan_buffer(&mut scan_state, 0, &data).unwrap();
        let scan_results: Vec<ScanResult> = scanner.scan_stop(&mut scan_state).unwrap();

        assert_eq!(scan_results.len(), 1);
        assert_eq!(scan_results[0].file_offset, 0);
        assert_eq!(scan_results[0].pattern.identifier.as_str(), "regf_0");

        Ok(())
    }

    #[test]
    fn test_scan_without_match() -> Result<(), BuildError> {
        let specification_store: SpecificationStore = test_store::create_specification_store()?;
        let scanner: Scanner = Scanner::new(&specification_store)?;

        let data: [u8; 16] = [
            0x01, 0xfa, 0xe0, 0xbe, 0x99, 0x8e, 0xdb, 0x70, 0xea, 0xcc, 0x6b, 0xae, 0x2f, 0xf5,
            0xa2, 0xe4,
        ];
        let mut scan_state: ScanState = scanner.scan_start();
        scanner.scan_buffer(&mut scan_state, 0, &data).unwrap();
        let scan_results: Vec<ScanResult> = scanner.scan_stop(&mut scan_state).unwrap();

        assert_eq!(scan_results.len(), 0);

        Ok(())
    }

    #[test]
    fn test_scan_with_match_on_buffer_boundary() -> Result<(), BuildError> {
        let specification_store: SpecificationStore = test_store::create_specification_store()?;
        let scanner: Scanner = Scanner::new(&specification_store)?;

        // The zip spanned archive signature straddles the two buffers.
        let mut data1: Vec<u8> = vec![0; 32];
        data1[30] = 0x50;
        data1[31] = 0x4b;

        let mut data2: Vec<u8> = vec![0; 32];
        data2[0] = 0x07;
        data2[1] = 0x08;

        let mut scan_state: ScanState = scanner.scan_start();
        scanner.scan_buffer(&mut scan_state, 0, &data1).unwrap();
        scanner
            .scan_buffer(&mut scan_state, data1.len() as u64, &data2)
            .unwrap();
        let scan_results: Vec<ScanResult> = scanner.scan_stop(&mut scan_state).unwrap();

        assert_eq!(scan_results.len(), 1);
        assert_eq!(scan_results[0].file_offset, 30);
        assert_eq!(
            scan_results[0].pattern.identifier.as_str(),
            "zip_spanned_0"
        );

        Ok(())
    }

    #[test]
    fn test_scan_with_match_near_buffer_end() -> Result<(), BuildError> {
        let specification_store: SpecificationStore = test_store::create_specification_store()?;
        let scanner: Scanner = Scanner::new(&specification_store)?;

        let data_size: usize = 1024 * 1024;
        let mut data: Vec<u8> = vec![0; data_size];
        data[data_size - 4..].copy_from_slice(b"PK\x07\x08");

        let mut scan_state: ScanState = scanner.scan_start();
        scanner.scan_buffer(&mut scan_state, 0, &data).unwrap();
        let scan_results: Vec<ScanResult> = scanner.scan_stop(&mut scan_state).unwrap();

        assert_eq!(scan_results.len(), 1);
        assert_eq!(scan_results[0].file_offset, (data_size - 4) as u64);
        assert_eq!(
            scan_results[0].pattern.identifier.as_str(),
            "zip_spanned_0"
        );

        Ok(())
    }

    #[test]
    fn test_scan_with_bound_signature_at_end_of_data() -> Result<(), BuildError> {
        let specification_store: SpecificationStore = test_store::create_specification_store()?;
        let scanner: Scanner = Scanner::new(&specification_store)?;

        let mut data: Vec<u8> = vec![0; 512];
        data[490..494].copy_from_slice(b"PK\x05\x06");

        let mut scan_state: ScanState = scanner.scan_start();
        scanner.scan_buffer(&mut scan_state, 0, &data).unwrap();
        let scan_results: Vec<ScanResult> = scanner.scan_stop(&mut scan_state).unwrap();

        assert_eq!(scan_results.len(), 1);
        assert_eq!(scan_results[0].file_offset, 490);
        assert_eq!(scan_results[0].pattern.identifier.as_str(), "zip_eocd_0");

        Ok(())
    }

    #[test]
    fn test_scan_is_stable_under_rechunking() -> Result<(), BuildError> {
        let specification_store: SpecificationStore = test_store::create_specification_store()?;
        let scanner: Scanner = Scanner::new(&specification_store)?;

        let mut data: Vec<u8> = vec![0; 4096];
        data[100..104].copy_from_slice(b"PK\x03\x04");
        data[1030..1034].copy_from_slice(b"PK\x07\x08");
        data[2500..2506].copy_from_slice(&[0x37, 0x7a, 0xbc, 0xaf, 0x27, 0x1c]);

        let mut scan_state: ScanState = scanner.scan_start();
        scanner.scan_buffer(&mut scan_state, 0, &data).unwrap();
        let scan_results: Vec<ScanResult> = scanner.scan_stop(&mut scan_state).unwrap();

        let single_buffer_matches: Vec<(u64, String)> = scan_results
            .iter()
            .map(|scan_result| {
                (
                    scan_result.file_offset,
                    scan_result.pattern.identifier.clone(),
                )
            })
            .collect();

        assert_eq!(single_buffer_matches.len(), 3);

        for chunk_size in [17, 256, 1031] {
            let mut scan_state: ScanState = scanner.scan_start();
            let mut file_offset: u64 = 0;

            for chunk in data.chunks(chunk_size) {
                scanner
                    .scan_buffer(&mut scan_state, file_offset, chunk)
                    .unwrap();
                file_offset += chunk.len() as u64;
            }
            let scan_results: Vec<ScanResult> = scanner.scan_stop(&mut scan_state).unwrap();

            let chunked_matches: Vec<(u64, String)> = scan_results
                .iter()
                .map(|scan_result| {
                    (
                        scan_result.file_offset,
                        scan_result.pattern.identifier.clone(),
                    )
                })
                .collect();

            assert_eq!(chunked_matches, single_buffer_matches);
        }
        Ok(())
    }

    #[test]
    fn test_scan_results_are_ordered_by_file_offset() -> Result<(), BuildError> {
        let specification_store: SpecificationStore = test_store::create_specification_store()?;
        let scanner: Scanner = Scanner::new(&specification_store)?;

        let mut data: Vec<u8> = vec![0; 2048];
        data[0..4].copy_from_slice("regf".as_bytes());
        data[512..516].copy_from_slice(b"PK\x03\x04");
        data[1024..1028].copy_from_slice(b"PK\x07\x08");

        let mut scan_state: ScanState = scanner.scan_start();
        scanner.scan_buffer(&mut scan_state, 0, &data).unwrap();
        let scan_results: Vec<ScanResult> = scanner.scan_stop(&mut scan_state).unwrap();

        assert_eq!(scan_results.len(), 3);

        let mut previous_file_offset: u64 = 0;
        for scan_result in scan_results.iter() {
            assert!(scan_result.file_offset >= previous_file_offset);
            previous_file_offset = scan_result.file_offset;
        }
        Ok(())
    }

    #[test]
    fn test_scan_discards_carry_on_gap() -> Result<(), BuildError> {
        let specification_store: SpecificationStore = test_store::create_specification_store()?;
        let scanner: Scanner = Scanner::new(&specification_store)?;

        // The first buffer ends in a partial zip spanned archive signature,
        // the second buffer is fed at a non-contiguous offset and may not
        // complete it.
        let mut data1: Vec<u8> = vec![0; 32];
        data1[30] = 0x50;
        data1[31] = 0x4b;

        let mut data2: Vec<u8> = vec![0; 32];
        data2[0] = 0x07;
        data2[1] = 0x08;

        let mut scan_state: ScanState = scanner.scan_start();
        scanner.scan_buffer(&mut scan_state, 0, &data1).unwrap();
        scanner.scan_buffer(&mut scan_state, 4096, &data2).unwrap();
        let scan_results: Vec<ScanResult> = scanner.scan_stop(&mut scan_state).unwrap();

        assert_eq!(scan_results.len(), 0);

        Ok(())
    }

    #[test]
    fn test_scan_with_empty_data() -> Result<(), BuildError> {
        let specification_store: SpecificationStore = test_store::create_specification_store()?;
        let scanner: Scanner = Scanner::new(&specification_store)?;

        let data: [u8; 0] = [];

        let mut scan_state: ScanState = scanner.scan_start();
        scanner.scan_buffer(&mut scan_state, 0, &data).unwrap();
        let scan_results: Vec<ScanResult> = scanner.scan_stop(&mut scan_state).unwrap();

        assert_eq!(scan_results.len(), 0);

        Ok(())
    }

    #[test]
    fn test_scan_without_unbound_signatures() -> Result<(), BuildError> {
        let mut specification_store: SpecificationStore = SpecificationStore::new();

        let specification: &mut Specification = specification_store.add_specification("qcow")?;
        specification.add_signature(&[0x51, 0x46, 0x49, 0xfb], Some(0), true);

        let scanner: Scanner = Scanner::new(&specification_store)?;

        let mut data: Vec<u8> = vec![0; 64];
        data[0..4].copy_from_slice(&[0x51, 0x46, 0x49, 0xfb]);

        let mut scan_state: ScanState = scanner.scan_start();
        scanner.scan_buffer(&mut scan_state, 0, &data).unwrap();
        let scan_results: Vec<ScanResult> = scanner.scan_stop(&mut scan_state).unwrap();

        assert_eq!(scan_results.len(), 1);
        assert_eq!(scan_results[0].pattern.identifier.as_str(), "qcow_0");

        Ok(())
    }
}
