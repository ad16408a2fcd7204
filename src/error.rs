// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Structural upload failures. All of them are raised before anything is written.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unsupported file '{0}': only .csv statements can be uploaded")]
    WrongExtension(String),

    #[error("Could not read '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No valid rows found in '{0}' (each row needs a date and a category)")]
    NoValidRows(String),
}
