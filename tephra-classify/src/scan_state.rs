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

use super::enums::ScanPhase;
use super::errors::ScanError;
use super::scan_result::ScanResult;
use super::types::PatternReference;

/// State of a single scan.
///
/// The state is the only mutable runtime object of the scanner, one per
/// concurrent scan, owned by the caller and passed back through the scan
/// functions.
pub struct ScanState {
    /// Scan phase.
    pub(crate) phase: ScanPhase,

    /// Offset relative from the start of the file where the scan continues.
    pub(crate) file_offset: u64,

    /// Index of the active scan tree node.
    pub(crate) scan_tree_node: Option<usize>,

    /// Data carried over from the previous buffer.
    pub(crate) remaining_data: Vec<u8>,

    /// Offset of the carried data relative from the start of the file.
    pub(crate) remaining_file_offset: u64,

    /// Scan results.
    results: Vec<ScanResult>,
}

impl ScanState {
    /// Creates a new scan state.
    pub(crate) fn new(scan_tree_node: Option<usize>) -> Self {
        Self {
            phase: ScanPhase::Start,
            file_offset: 0,
            scan_tree_node: scan_tree_node,
            remaining_data: Vec::new(),
            remaining_file_offset: 0,
            results: Vec::new(),
        }
    }

    /// Adds a scan result.
    pub(crate) fn add_result(&mut self, file_offset: u64, pattern: &PatternReference) {
        self.results.push(ScanResult::new(file_offset, pattern));
    }

    /// Retrieves the scan phase.
    pub fn phase(&self) -> &ScanPhase {
        &self.phase
    }

    /// Retrieves the scan results.
    pub fn results(&self) -> &[ScanResult] {
        &self.results
    }

    /// Sets the phase to scanning.
    pub(crate) fn scanning(
        &mut self,
        file_offset: u64,
        scan_tree_node: Option<usize>,
    ) -> Result<(), ScanError> {
        match self.phase {
            ScanPhase::Start | ScanPhase::Scanning => {}
            _ => {
                return Err(ScanError::UnsupportedState(String::from(
                    "Unsupported scan phase",
                )));
            }
        };
        self.file_offset = file_offset;
        self.scan_tree_node = scan_tree_node;
        self.phase = ScanPhase::Scanning;

        Ok(())
    }

    /// Sets the phase to stopped.
    pub(crate) fn stop(&mut self) -> Result<(), ScanError> {
        match self.phase {
            ScanPhase::Start | ScanPhase::Scanning => {}
            _ => {
                return Err(ScanError::UnsupportedState(String::from(
                    "Unsupported scan phase",
                )));
            }
        };
        self.scan_tree_node = None;
        self.phase = ScanPhase::Stopped;

        Ok(())
    }

    /// Takes the scan results out of the state.
    pub(crate) fn take_results(&mut self) -> Vec<ScanResult> {
        std::mem::take(&mut self.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanning() -> Result<(), ScanError> {
        let mut scan_state: ScanState = ScanState::new(Some(0));

        assert_eq!(scan_state.phase(), &ScanPhase::Start);

        scan_state.scanning(512, Some(0))?;

        assert_eq!(scan_state.phase(), &ScanPhase::Scanning);
        assert_eq!(scan_state.file_offset, 512);

        Ok(())
    }

    #[test]
    fn test_stop() -> Result<(), ScanError> {
        let mut scan_state: ScanState = ScanState::new(Some(0));

        scan_state.stop()?;

        assert_eq!(scan_state.phase(), &ScanPhase::Stopped);
        assert!(scan_state.scan_tree_node.is_none());

        let result = scan_state.scanning(0, Some(0));
        assert!(result.is_err());

        let result = scan_state.stop();
        assert!(result.is_err());

        Ok(())
    }
}
