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

/// Lookup table of byte values that appear in many unrelated formats and
/// therefore carry little evidence, such as ASCII digits and letters.
pub(crate) const COMMON_BYTE_VALUES: [bool; 256] = common_byte_values();

const fn common_byte_values() -> [bool; 256] {
    let mut lookup_table: [bool; 256] = [false; 256];

    lookup_table[0x00] = true;
    lookup_table[0x01] = true;
    lookup_table[0x09] = true;
    lookup_table[0x0a] = true;
    lookup_table[0x0d] = true;
    lookup_table[0x20] = true;
    lookup_table[0xff] = true;

    let mut byte_value: usize = 0x30;
    while byte_value <= 0x39 {
        lookup_table[byte_value] = true;
        byte_value += 1;
    }
    let mut byte_value: usize = 0x41;
    while byte_value <= 0x5a {
        lookup_table[byte_value] = true;
        byte_value += 1;
    }
    let mut byte_value: usize = 0x61;
    while byte_value <= 0x7a {
        lookup_table[byte_value] = true;
        byte_value += 1;
    }
    lookup_table
}
