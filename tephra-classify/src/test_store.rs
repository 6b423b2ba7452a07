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

use super::errors::BuildError;
use super::specification::{Specification, SpecificationStore};

/// Creates a specification store for testing purposes.
pub(crate) fn create_specification_store() -> Result<SpecificationStore, BuildError> {
    let mut store: SpecificationStore = SpecificationStore::new();

    let specification: &mut Specification = store.add_specification("7zip")?;
    specification.add_mime_type("application/x-7z-compressed");
    specification.add_universal_type_identifier("org.7-zip.7-zip-archive");
    specification.add_signature(&[0x37, 0x7a, 0xbc, 0xaf, 0x27, 0x1c], Some(0), false);

    let specification: &mut Specification = store.add_specification("esedb")?;
    specification.add_signature(&[0xef, 0xcd, 0xab, 0x89], Some(4), true);

    let specification: &mut Specification = store.add_specification("evt")?;
    specification.add_signature(
        &[
            0x30, 0x00, 0x00, 0x00, 0x4c, 0x66, 0x4c, 0x65, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00,
            0x00, 0x00,
        ],
        Some(0),
        true,
    );

    let specification: &mut Specification = store.add_specification("evtx")?;
    specification.add_signature(b"ElfFile\x00", Some(0), true);

    let specification: &mut Specification = store.add_specification("ewf")?;
    specification.add_signature(&[0x45, 0x56, 0x46, 0x09, 0x0d, 0x0a, 0xff, 0x00], Some(0), true);

    let specification: &mut Specification = store.add_specification("lnk")?;
    specification.add_signature(
        &[
            0x4c, 0x00, 0x00, 0x00, 0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xc0, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x46,
        ],
        Some(0),
        false,
    );

    let specification: &mut Specification = store.add_specification("msiecf_index_dat")?;
    specification.add_signature(b"Client UrlCache MMF Ver ", Some(0), true);

    let specification: &mut Specification = store.add_specification("nk2")?;
    specification.add_signature(
        &[0x0d, 0xf0, 0xad, 0xba, 0xa0, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00],
        Some(0),
        true,
    );

    let specification: &mut Specification = store.add_specification("olecf")?;
    specification.add_signature(
        &[0xd0, 0xcf, 0x11, 0xe0, 0xa1, 0xb1, 0x1a, 0xe1],
        Some(0),
        true,
    );
    specification.add_signature(
        &[0x0e, 0x11, 0xfc, 0x0d, 0xd0, 0xcf, 0x11, 0x0e],
        Some(0),
        true,
    );

    let specification: &mut Specification = store.add_specification("pff")?;
    specification.add_signature(b"!BDN", Some(0), true);

    let specification: &mut Specification = store.add_specification("qcow")?;
    specification.add_signature(&[0x51, 0x46, 0x49, 0xfb], Some(0), true);

    let specification: &mut Specification = store.add_specification("rar")?;
    specification.add_mime_type("application/x-rar-compressed");
    specification.add_universal_type_identifier("com.rarlab.rar-archive");
    specification.add_signature(&[0x52, 0x61, 0x72, 0x21, 0x1a, 0x07, 0x00], Some(0), true);

    let specification: &mut Specification = store.add_specification("regf")?;
    specification.add_signature(b"regf", Some(0), true);

    let specification: &mut Specification = store.add_specification("thumbcache_db_cache")?;
    specification.add_signature(b"CMMM", Some(0), true);

    let specification: &mut Specification = store.add_specification("thumbcache_db_index")?;
    specification.add_signature(b"IMMM", Some(0), true);

    let specification: &mut Specification = store.add_specification("zip")?;
    specification.add_mime_type("application/zip");
    specification.add_universal_type_identifier("com.pkware.zip-archive");
    specification.add_signature(b"PK00", Some(0), true);
    specification.add_signature(b"PK\x01\x02", None, false);
    specification.add_signature(b"PK\x05\x05", None, false);
    specification.add_signature(b"PK\x06\x06", None, false);
    specification.add_signature(b"PK\x06\x07", None, false);
    specification.add_signature(b"PK\x06\x08", None, false);

    // The end of central directory record of a non-empty, non-commented
    // archive.
    let specification: &mut Specification = store.add_specification("zip_eocd")?;
    specification.add_signature(b"PK\x05\x06", Some(-22), true);

    let specification: &mut Specification = store.add_specification("zip_localfile")?;
    specification.add_signature(b"PK\x03\x04", Some(0), false);

    // The data descriptor signature of a spanned archive.
    let specification: &mut Specification = store.add_specification("zip_spanned")?;
    specification.add_signature(b"PK\x07\x08", None, false);

    Ok(store)
}
