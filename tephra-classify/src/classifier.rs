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
use std::io::SeekFrom;
use std::sync::Arc;

use tephra_core::mediator::{Mediator, MediatorReference};
use tephra_core::{DataStreamReference, ErrorTrace};

use super::enums::ClassifyMode;
use super::errors::ScanError;
use super::scan_result::ScanResult;
use super::scan_state::ScanState;
use super::scanner::Scanner;
use super::types::SpecificationReference;

/// Format classification, a format specification and the scan results that
/// support it.
pub struct Classification {
    /// Format specification.
    specification: SpecificationReference,

    /// Scan results, in the order the matches were found.
    pub scan_results: Vec<ScanResult>,
}

impl Classification {
    /// Creates a new classification.
    fn new(specification: &SpecificationReference) -> Self {
        Self {
            specification: Arc::clone(specification),
            scan_results: Vec::new(),
        }
    }

    /// Retrieves the format identifier.
    pub fn identifier(&self) -> &str {
        &self.specification.identifier
    }

    /// Retrieves the MIME types or an empty list if none.
    pub fn mime_types(&self) -> &[String] {
        &self.specification.mime_types
    }

    /// Retrieves the Universal Type Identifiers (UTI) or an empty list if
    /// none.
    pub fn universal_type_identifiers(&self) -> &[String] {
        &self.specification.universal_type_identifiers
    }
}

/// Format classifier.
///
/// Drives a scanner over a buffer or a data stream and aggregates the scan
/// results into classifications, one per matched format specification.
pub struct Classifier<'a> {
    /// Mediator.
    mediator: MediatorReference,

    /// Scanner.
    scanner: &'a Scanner,

    /// Classify mode.
    mode: ClassifyMode,
}

impl<'a> Classifier<'a> {
    /// Size of the buffers used when classifying a data stream.
    pub const BUFFER_SIZE: usize = 16 * 1024 * 1024;

    /// Creates a new classifier.
    pub fn new(scanner: &'a Scanner, mode: ClassifyMode) -> Self {
        Self {
            mediator: Mediator::current(),
            scanner: scanner,
            mode: mode,
        }
    }

    /// Classifies the data in a buffer, assuming all necessary data is
    /// available.
    pub fn classify_buffer(
        &self,
        file_offset: u64,
        data: &[u8],
    ) -> Result<Vec<Classification>, ScanError> {
        let mut scan_state: ScanState = self.scanner.scan_start();

        self.scanner.scan_buffer(&mut scan_state, file_offset, data)?;
        let scan_results: Vec<ScanResult> = self.scanner.scan_stop(&mut scan_state)?;

        Ok(self.get_classifications(scan_results))
    }

    /// Classifies the data in a data stream.
    ///
    /// In head and tail mode only the first and last buffer of a larger
    /// data stream are scanned, smaller data streams are scanned entirely.
    pub fn classify_data_stream(
        &self,
        data_stream: &DataStreamReference,
    ) -> Result<Vec<Classification>, ErrorTrace> {
        let mut scan_state: ScanState = self.scanner.scan_start();

        let data_size: u64 = tephra_core::data_stream_get_size!(data_stream);
        let buffer_size: u64 = Self::BUFFER_SIZE as u64;

        let mut data: Vec<u8> = vec![0; Self::BUFFER_SIZE];

        if self.mode == ClassifyMode::HeadTailScan && data_size > 2 * buffer_size {
            tephra_core::data_stream_read_exact_at_position!(
                data_stream,
                &mut data,
                SeekFrom::Start(0)
            );
            match self.scanner.scan_buffer(&mut scan_state, 0, &data) {
                Ok(_) => {}
                Err(error) => {
                    return Err(tephra_core::error_trace_new_with_error!(
                        "Unable to scan head buffer",
                        error
                    ));
                }
            };
            let tail_offset: u64 = data_size - buffer_size;

            tephra_core::data_stream_read_exact_at_position!(
                data_stream,
                &mut data,
                SeekFrom::Start(tail_offset)
            );
            match self.scanner.scan_buffer(&mut scan_state, tail_offset, &data) {
                Ok(_) => {}
                Err(error) => {
                    return Err(tephra_core::error_trace_new_with_error!(
                        "Unable to scan tail buffer",
                        error
                    ));
                }
            };
        } else {
            let mut file_offset: u64 = 0;

            loop {
                let read_count: usize = tephra_core::data_stream_read_at_position!(
                    data_stream,
                    &mut data,
                    SeekFrom::Start(file_offset)
                );
                if read_count == 0 {
                    break;
                }
                match self
                    .scanner
                    .scan_buffer(&mut scan_state, file_offset, &data[0..read_count])
                {
                    Ok(_) => {}
                    Err(error) => {
                        return Err(tephra_core::error_trace_new_with_error!(
                            "Unable to scan buffer",
                            error
                        ));
                    }
                };
                file_offset += read_count as u64;
            }
        }
        let scan_results: Vec<ScanResult> = match self.scanner.scan_stop(&mut scan_state) {
            Ok(scan_results) => scan_results,
            Err(error) => {
                return Err(tephra_core::error_trace_new_with_error!(
                    "Unable to stop scan",
                    error
                ));
            }
        };
        Ok(self.get_classifications(scan_results))
    }

    /// Aggregates scan results into classifications, combining the results
    /// of one specification into a single classification. The
    /// classifications are ordered by format identifier.
    fn get_classifications(&self, scan_results: Vec<ScanResult>) -> Vec<Classification> {
        let mut classifications: BTreeMap<String, Classification> = BTreeMap::new();

        for scan_result in scan_results {
            let specification: SpecificationReference = Arc::clone(scan_result.specification());

            if self.mediator.debug_output {
                self.mediator.debug_print(format!(
                    "Classifier::get_classifications {{\n    scan result at offset: 0x{:08x} specification: {}\n}}\n\n",
                    scan_result.file_offset, specification.identifier,
                ));
            }
            classifications
                .entry(specification.identifier.clone())
                .or_insert_with(|| Classification::new(&specification))
                .scan_results
                .push(scan_result);
        }
        classifications.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tephra_core::open_fake_data_stream;

    use super::super::errors::BuildError;
    use super::super::specification::SpecificationStore;
    use super::super::test_store;

    fn lnk_data(data_size: usize) -> Vec<u8> {
        let mut data: Vec<u8> = vec![0; data_size];
        data[0..20].copy_from_slice(&[
            0x4c, 0x00, 0x00, 0x00, 0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xc0, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x46,
        ]);
        data
    }

    #[test]
    fn test_classify_buffer() -> Result<(), BuildError> {
        let specification_store: SpecificationStore = test_store::create_specification_store()?;
        let scanner: Scanner = Scanner::new(&specification_store)?;
        let classifier: Classifier = Classifier::new(&scanner, ClassifyMode::FullScan);

        let data: Vec<u8> = lnk_data(512);
        let classifications: Vec<Classification> = classifier.classify_buffer(0, &data).unwrap();

        assert_eq!(classifications.len(), 1);
        assert_eq!(classifications[0].identifier(), "lnk");
        assert_eq!(classifications[0].scan_results.len(), 1);
        assert_eq!(classifications[0].scan_results[0].file_offset, 0);

        Ok(())
    }

    #[test]
    fn test_classify_buffer_combines_scan_results() -> Result<(), BuildError> {
        let specification_store: SpecificationStore = test_store::create_specification_store()?;
        let scanner: Scanner = Scanner::new(&specification_store)?;
        let classifier: Classifier = Classifier::new(&scanner, ClassifyMode::FullScan);

        let mut data: Vec<u8> = vec![0; 1024];
        data[100..104].copy_from_slice(b"PK\x07\x08");
        data[600..604].copy_from_slice(b"PK\x07\x08");

        let classifications: Vec<Classification> = classifier.classify_buffer(0, &data).unwrap();

        assert_eq!(classifications.len(), 1);
        assert_eq!(classifications[0].identifier(), "zip_spanned");
        assert_eq!(classifications[0].scan_results.len(), 2);
        assert_eq!(classifications[0].scan_results[0].file_offset, 100);
        assert_eq!(classifications[0].scan_results[1].file_offset, 600);

        Ok(())
    }

    #[test]
    fn test_classify_buffer_with_metadata() -> Result<(), BuildError> {
        let specification_store: SpecificationStore = test_store::create_specification_store()?;
        let scanner: Scanner = Scanner::new(&specification_store)?;
        let classifier: Classifier = Classifier::new(&scanner, ClassifyMode::FullScan);

        let mut data: Vec<u8> = vec![0; 512];
        data[0..6].copy_from_slice(&[0x37, 0x7a, 0xbc, 0xaf, 0x27, 0x1c]);

        let classifications: Vec<Classification> = classifier.classify_buffer(0, &data).unwrap();

        assert_eq!(classifications.len(), 1);
        assert_eq!(classifications[0].identifier(), "7zip");
        assert_eq!(
            classifications[0].mime_types(),
            &[String::from("application/x-7z-compressed")]
        );
        assert_eq!(
            classifications[0].universal_type_identifiers(),
            &[String::from("org.7-zip.7-zip-archive")]
        );
        Ok(())
    }

    #[test]
    fn test_classify_data_stream() -> Result<(), ErrorTrace> {
        let specification_store: SpecificationStore = match test_store::create_specification_store()
        {
            Ok(specification_store) => specification_store,
            Err(error) => {
                return Err(tephra_core::error_trace_new_with_error!(
                    "Unable to create specification store",
                    error
                ));
            }
        };
        let scanner: Scanner = match Scanner::new(&specification_store) {
            Ok(scanner) => scanner,
            Err(error) => {
                return Err(tephra_core::error_trace_new_with_error!(
                    "Unable to build scanner",
                    error
                ));
            }
        };
        let classifier: Classifier = Classifier::new(&scanner, ClassifyMode::FullScan);

        let data_stream: DataStreamReference = open_fake_data_stream(lnk_data(100 * 1024));
        let classifications: Vec<Classification> = classifier.classify_data_stream(&data_stream)?;

        assert_eq!(classifications.len(), 1);
        assert_eq!(classifications[0].identifier(), "lnk");

        Ok(())
    }

    #[test]
    fn test_classify_data_stream_head_tail_equals_full_scan() -> Result<(), ErrorTrace> {
        let specification_store: SpecificationStore = match test_store::create_specification_store()
        {
            Ok(specification_store) => specification_store,
            Err(error) => {
                return Err(tephra_core::error_trace_new_with_error!(
                    "Unable to create specification store",
                    error
                ));
            }
        };
        let scanner: Scanner = match Scanner::new(&specification_store) {
            Ok(scanner) => scanner,
            Err(error) => {
                return Err(tephra_core::error_trace_new_with_error!(
                    "Unable to build scanner",
                    error
                ));
            }
        };
        // A data stream not larger than twice the buffer size is scanned
        // entirely in both modes.
        let mut data: Vec<u8> = lnk_data(100 * 1024);
        let data_size: usize = data.len();
        data[data_size - 22..data_size - 18].copy_from_slice(b"PK\x05\x06");

        let full_scan_classifier: Classifier = Classifier::new(&scanner, ClassifyMode::FullScan);
        let data_stream: DataStreamReference = open_fake_data_stream(data.clone());
        let full_scan_classifications: Vec<Classification> =
            full_scan_classifier.classify_data_stream(&data_stream)?;

        let head_tail_classifier: Classifier = Classifier::new(&scanner, ClassifyMode::HeadTailScan);
        let data_stream: DataStreamReference = open_fake_data_stream(data);
        let head_tail_classifications: Vec<Classification> =
            head_tail_classifier.classify_data_stream(&data_stream)?;

        let full_scan_identifiers: Vec<&str> = full_scan_classifications
            .iter()
            .map(|classification| classification.identifier())
            .collect();
        let head_tail_identifiers: Vec<&str> = head_tail_classifications
            .iter()
            .map(|classification| classification.identifier())
            .collect();

        assert_eq!(full_scan_identifiers, vec!["lnk", "zip_eocd"]);
        assert_eq!(head_tail_identifiers, full_scan_identifiers);

        Ok(())
    }

    #[test]
    fn test_classify_buffer_without_match() -> Result<(), BuildError> {
        let specification_store: SpecificationStore = test_store::create_specification_store()?;
        let scanner: Scanner = Scanner::new(&specification_store)?;
        let classifier: Classifier = Classifier::new(&scanner, ClassifyMode::FullScan);

        let data: [u8; 16] = [
            0x01, 0xfa, 0xe0, 0xbe, 0x99, 0x8e, 0xdb, 0x70, 0xea, 0xcc, 0x6b, 0xae, 0x2f, 0xf5,
            0xa2, 0xe4,
        ];
        let classifications: Vec<Classification> = classifier.classify_buffer(0, &data).unwrap();

        assert_eq!(classifications.len(), 0);

        Ok(())
    }
}
