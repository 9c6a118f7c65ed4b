/*
 * SPDX-FileCopyrightText: 2026 The sparse-heatmap developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */
use anyhow::Result;
use sparse_heatmap::cli::init_envlogger;
use sparse_heatmap::cli::main as cli_main;

pub fn main() -> Result<()> {
    // Initialize the logger
    init_envlogger()?;
    // Call the main function of the CLI with cli args
    cli_main(std::env::args_os())
}
