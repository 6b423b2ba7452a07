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

mod classifier;
mod constants;
mod enums;
mod errors;
mod pattern;
mod pattern_table;
mod pattern_weights;
mod range_list;
mod scan_result;
mod scan_state;
mod scan_tree;
mod scanner;
mod signature;
mod skip_table;
mod specification;
mod types;

#[cfg(test)]
mod test_store;

pub use classifier::{Classification, Classifier};
pub use enums::{ClassifyMode, OffsetMode, ScanPhase};
pub use errors::{BuildError, ScanError};
pub use pattern::Pattern;
pub use range_list::{Range, RangeList};
pub use scan_result::ScanResult;
pub use scan_state::ScanState;
pub use scan_tree::ScanTree;
pub use scanner::Scanner;
pub use signature::Signature;
pub use specification::{Specification, SpecificationStore};
pub use types::{PatternReference, SignatureReference, SpecificationReference};
