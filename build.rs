/*
 * SPDX-FileCopyrightText: 2026 The sparse-heatmap developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::io::Write;
use std::path::PathBuf;

fn main() -> std::io::Result<()> {
    built::write_built_file()?;

    // built does not export a plain build date, so we append one
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "OUT_DIR is not set")
    })?);
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(out_dir.join("built.rs"))?;
    writeln!(
        file,
        "#[allow(dead_code)]\npub const BUILD_DATE: &str = {:?};",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
    )?;
    Ok(())
}
