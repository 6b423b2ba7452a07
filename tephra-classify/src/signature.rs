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

use std::cmp::PartialEq;

/// Signature of a format specification.
#[derive(Clone, Debug)]
pub struct Signature {
    /// Expression, a literal byte string.
    pub expression: Vec<u8>,

    /// Offset of the expression, relative from the start of the data when
    /// positive and relative from the end of the data when negative.
    pub offset: Option<i64>,

    /// Value to indicate the expression must be found at the offset.
    pub is_bound: bool,
}

impl Signature {
    /// Creates a new signature.
    pub fn new(expression: &[u8], offset: Option<i64>, is_bound: bool) -> Self {
        Self {
            expression: Vec::from(expression),
            offset: offset,
            is_bound: is_bound,
        }
    }
}

impl PartialEq for Signature {
    /// Determines if the signature is equivalent to another signature.
    fn eq(&self, other: &Signature) -> bool {
        self.expression == other.expression
    }
}
