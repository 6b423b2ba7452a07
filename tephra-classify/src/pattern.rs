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

use std::sync::Arc;

use super::enums::OffsetMode;
use super::errors::BuildError;
use super::range_list::RangeList;
use super::specification::SpecificationStore;
use super::types::{PatternReference, SignatureReference, SpecificationReference};

/// Pattern, a signature lifted into scannable form.
#[derive(Debug)]
pub struct Pattern {
    /// Identifier.
    pub identifier: String,

    /// Signature.
    pub signature: SignatureReference,

    /// Specification that contains the signature.
    pub specification: SpecificationReference,
}

impl Pattern {
    /// Creates a new pattern.
    pub fn new(
        signature_index: usize,
        signature: &SignatureReference,
        specification: &SpecificationReference,
    ) -> Self {
        // The underscore keeps the identifier within the character set that
        // regular expression based scanner back-ends support.
        Self {
            identifier: format!("{}_{}", specification.identifier, signature_index),
            signature: Arc::clone(signature),
            specification: Arc::clone(specification),
        }
    }

    /// Retrieves the signature expression.
    pub fn expression(&self) -> &[u8] {
        &self.signature.expression
    }

    /// Value to indicate the signature is bound to its offset.
    pub fn is_bound(&self) -> bool {
        self.signature.is_bound
    }

    /// Retrieves the signature offset or 0 if the signature has none.
    pub fn offset(&self) -> i64 {
        self.signature.offset.unwrap_or(0)
    }
}

/// Builds the patterns from the specifications in a store.
///
/// The signature offsets are only observed when `is_bound` is `Some(true)`,
/// otherwise the patterns are handled as starting at offset 0. The extents of
/// the accepted signatures are recorded in the range list, with negative
/// offsets reflected to their absolute value.
pub(crate) fn build_patterns(
    specification_store: &SpecificationStore,
    is_bound: Option<bool>,
    offset_mode: Option<&OffsetMode>,
    range_list: &mut RangeList,
) -> Result<Vec<PatternReference>, BuildError> {
    let mut patterns: Vec<PatternReference> = Vec::new();

    for specification in specification_store.specifications() {
        let specification_reference: SpecificationReference = Arc::new(specification.clone());

        for (signature_index, signature) in specification_reference.signatures.iter().enumerate() {
            if signature.expression.is_empty() {
                continue;
            }
            let mut signature_offset: i64 = match is_bound {
                Some(true) => signature.offset.unwrap_or(0),
                _ => 0,
            };
            if signature_offset < 0 {
                match offset_mode {
                    Some(OffsetMode::Positive) => continue,
                    Some(OffsetMode::PositiveStrict) => {
                        return Err(BuildError::InvalidOffset(String::from(
                            "Signature offset less than 0",
                        )));
                    }
                    _ => {}
                }
                // The range list does not allow negative offsets.
                signature_offset = -signature_offset;
            } else if signature_offset > 0 {
                match offset_mode {
                    Some(OffsetMode::Negative) => continue,
                    Some(OffsetMode::NegativeStrict) => {
                        return Err(BuildError::InvalidOffset(String::from(
                            "Signature offset greater than 0",
                        )));
                    }
                    _ => {}
                }
            }
            let signature_pattern_length: usize = signature.expression.len();

            if signature_pattern_length < 4 {
                return Err(BuildError::PatternTooShort(format!(
                    "Signature expression of: {} smaller than 4 bytes",
                    specification_reference.identifier
                )));
            }
            patterns.push(Arc::new(Pattern::new(
                signature_index,
                signature,
                &specification_reference,
            )));
            range_list.insert(signature_offset, signature_pattern_length as i64)?;
        }
    }
    Ok(patterns)
}
