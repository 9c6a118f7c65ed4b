/*
 * SPDX-FileCopyrightText: 2026 The sparse-heatmap developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod colormap;
pub mod ingest;
pub mod matrix;
pub mod render;

#[cfg(feature = "cli")]
pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));

    /// The package version followed by the commit it was built from and the
    /// build environment.
    pub fn version_string() -> String {
        let commit = match (GIT_COMMIT_HASH_SHORT, GIT_DIRTY) {
            (Some(hash), Some(true)) => format!("commit {hash}, with local changes"),
            (Some(hash), _) => format!("commit {hash}"),
            (None, _) => "not built from a git checkout".to_owned(),
        };
        format!(
            "{PKG_VERSION} ({commit})\nbuilt {BUILD_DATE} for {TARGET}\ncompiler: {RUSTC_VERSION}"
        )
    }
}

/// Prelude module to import everything from this crate
pub mod prelude {
    pub use crate::colormap::*;
    pub use crate::ingest::*;
    pub use crate::matrix::*;
    pub use crate::render::*;
}
