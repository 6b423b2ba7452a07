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

use std::io::SeekFrom;
use std::sync::{Arc, RwLock};

use super::data_stream::{DataStream, DataStreamReference};
use super::errors::ErrorTrace;

/// Fake (in-memory) data stream, for testing.
pub struct FakeDataStream {
    /// Data.
    data: Vec<u8>,

    /// Current offset.
    current_offset: u64,
}

impl FakeDataStream {
    /// Creates a new fake data stream.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: data,
            current_offset: 0,
        }
    }
}

impl DataStream for FakeDataStream {
    /// Retrieves the size of the data.
    fn get_size(&mut self) -> Result<u64, ErrorTrace> {
        Ok(self.data.len() as u64)
    }

    /// Reads data at the current position.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ErrorTrace> {
        let data_size: u64 = self.data.len() as u64;

        if self.current_offset >= data_size {
            return Ok(0);
        }
        let read_size: u64 = std::cmp::min(buf.len() as u64, data_size - self.current_offset);
        let start_offset: usize = self.current_offset as usize;
        let end_offset: usize = start_offset + read_size as usize;

        buf[0..read_size as usize].copy_from_slice(&self.data[start_offset..end_offset]);
        self.current_offset += read_size;

        Ok(read_size as usize)
    }

    /// Sets the current position of the data.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, ErrorTrace> {
        let data_size: i64 = self.data.len() as i64;

        let offset: i64 = match pos {
            SeekFrom::Current(relative_offset) => self.current_offset as i64 + relative_offset,
            SeekFrom::End(relative_offset) => data_size + relative_offset,
            SeekFrom::Start(offset) => offset as i64,
        };
        if offset < 0 {
            return Err(ErrorTrace::new(format!(
                "{}: Invalid offset: {} value out of bounds",
                crate::error_trace_function!(),
                offset,
            )));
        }
        self.current_offset = offset as u64;

        Ok(self.current_offset)
    }
}

/// Opens a new fake data stream.
pub fn open_fake_data_stream(data: Vec<u8>) -> DataStreamReference {
    Arc::new(RwLock::new(FakeDataStream::new(data)))
}
