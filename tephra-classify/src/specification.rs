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

use super::errors::BuildError;
use super::signature::Signature;
use super::types::SignatureReference;

/// Format specification.
#[derive(Clone, Debug)]
pub struct Specification {
    /// Identifier, unique within the enclosing store.
    pub identifier: String,

    /// Signatures.
    pub signatures: Vec<SignatureReference>,

    /// MIME types.
    pub mime_types: Vec<String>,

    /// Universal Type Identifiers (UTI).
    pub universal_type_identifiers: Vec<String>,
}

impl Specification {
    /// Creates a new specification.
    pub fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            signatures: Vec::new(),
            mime_types: Vec::new(),
            universal_type_identifiers: Vec::new(),
        }
    }

    /// Adds a MIME type.
    pub fn add_mime_type(&mut self, mime_type: &str) {
        self.mime_types.push(mime_type.to_string());
    }

    /// Adds a signature.
    pub fn add_signature(&mut self, expression: &[u8], offset: Option<i64>, is_bound: bool) {
        self.signatures
            .push(Arc::new(Signature::new(expression, offset, is_bound)));
    }

    /// Adds a Universal Type Identifier (UTI).
    pub fn add_universal_type_identifier(&mut self, universal_type_identifier: &str) {
        self.universal_type_identifiers
            .push(universal_type_identifier.to_string());
    }
}

/// Store of format specifications.
pub struct SpecificationStore {
    /// Specifications per identifier.
    specifications: BTreeMap<String, Specification>,
}

impl SpecificationStore {
    /// Creates a new specification store.
    pub fn new() -> Self {
        Self {
            specifications: BTreeMap::new(),
        }
    }

    /// Adds a specification for a specific format identifier.
    pub fn add_specification(&mut self, identifier: &str) -> Result<&mut Specification, BuildError> {
        if self.specifications.contains_key(identifier) {
            return Err(BuildError::DuplicateIdentifier(format!(
                "Specification: {} is already defined in store",
                identifier
            )));
        }
        Ok(self
            .specifications
            .entry(identifier.to_string())
            .or_insert_with(|| Specification::new(identifier)))
    }

    /// Retrieves the number of specifications.
    pub fn number_of_specifications(&self) -> usize {
        self.specifications.len()
    }

    /// Retrieves an iterator over the specifications.
    pub fn specifications(&self) -> impl Iterator<Item = &Specification> {
        self.specifications.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specification_add_signature() {
        let mut specification: Specification = Specification::new("regf");

        assert_eq!(specification.signatures.len(), 0);

        specification.add_signature("regf".as_bytes(), Some(0), true);

        assert_eq!(specification.signatures.len(), 1);
    }

    #[test]
    fn test_specification_add_mime_type() {
        let mut specification: Specification = Specification::new("zip");

        specification.add_mime_type("application/zip");
        specification.add_universal_type_identifier("com.pkware.zip-archive");

        assert_eq!(specification.mime_types.len(), 1);
        assert_eq!(specification.universal_type_identifiers.len(), 1);
    }

    #[test]
    fn test_store_add_specification() -> Result<(), BuildError> {
        let mut specification_store: SpecificationStore = SpecificationStore::new();

        assert_eq!(specification_store.number_of_specifications(), 0);

        let specification: &mut Specification = specification_store.add_specification("regf")?;
        specification.add_signature("regf".as_bytes(), Some(0), true);

        assert_eq!(specification_store.number_of_specifications(), 1);

        let result = specification_store.add_specification("regf");
        assert!(result.is_err());

        Ok(())
    }
}
