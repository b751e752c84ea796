/*
 * Copyright (c) 2021 Works Applications Co., Ltd.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{PocketError, PocketResult};

/// Bytes backing a dictionary
pub enum Storage {
    File(Mmap),
    Borrowed(&'static [u8]),
    Owned(Vec<u8>),
}

impl Storage {
    /// Maps the file at `path` into memory
    pub fn map_file<P: AsRef<Path>>(path: P) -> PocketResult<Storage> {
        let path = path.as_ref();
        let unavailable = |cause| PocketError::DictionaryUnavailable {
            path: path.to_path_buf(),
            cause,
        };

        let file = File::open(path).map_err(unavailable)?;
        // the file is a read-only build artifact
        let mapping = unsafe { Mmap::map(&file) }.map_err(unavailable)?;
        Ok(Storage::File(mapping))
    }
}

impl AsRef<[u8]> for Storage {
    fn as_ref(&self) -> &[u8] {
        match self {
            Storage::File(m) => &m[..],
            Storage::Borrowed(b) => b,
            Storage::Owned(v) => v,
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Storage::File(_) => "File",
            Storage::Borrowed(_) => "Borrowed",
            Storage::Owned(_) => "Owned",
        };
        write!(f, "Storage::{}({} bytes)", kind, self.as_ref().len())
    }
}
