/*
 * SPDX-FileCopyrightText: 2026 The sparse-heatmap developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use clap::error::ErrorKind;
use sparse_heatmap::cli::{is_usage_error, parse_args, run, CliArgs, RenderArgs};
use sparse_heatmap::prelude::*;
use std::path::Path;
use std::process::{Command, Output};

fn args(input: &Path, output: &Path) -> CliArgs {
    CliArgs {
        input_file: input.to_owned(),
        output_file: output.to_owned(),
        render: RenderArgs {
            width: 320,
            height: 240,
        },
    }
}

#[test]
fn test_argument_count() {
    for argv in [
        vec!["sparse-heatmap"],
        vec!["sparse-heatmap", "in.txt"],
        vec!["sparse-heatmap", "in.txt", "out.png", "extra"],
        vec!["sparse-heatmap", "a", "b", "c", "d"],
    ] {
        let err = parse_args(&argv).unwrap_err();
        assert!(is_usage_error(&err), "{:?}: {:?}", argv, err.kind());
    }

    let parsed = parse_args(["sparse-heatmap", "in.txt", "out.png"]).unwrap();
    assert_eq!(parsed.input_file, Path::new("in.txt"));
    assert_eq!(parsed.output_file, Path::new("out.png"));
    assert_eq!(RenderOptions::from(parsed.render), RenderOptions::default());
}

#[test]
fn test_help_is_not_a_usage_error() {
    let err = parse_args(["sparse-heatmap", "--help"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    assert!(!is_usage_error(&err));

    let err = parse_args(["sparse-heatmap", "--version"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    assert!(!is_usage_error(&err));
}

#[test]
fn test_invalid_size() {
    let err = parse_args(["sparse-heatmap", "in.txt", "out.png", "--height", "0"]).unwrap_err();
    assert!(is_usage_error(&err));
}

#[test]
fn test_run_png() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("m.txt");
    let output = dir.path().join("m.png");
    std::fs::write(&input, "0 0 1.0\n0 1 2.0\n1 0 3.0\n")?;

    run(args(&input, &output))?;

    let img = image::open(&output)?.to_rgb8();
    assert_eq!(img.dimensions(), (320, 240));
    // the background is white
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);

    // At 320x240 a 2x2 grid has 108-pixel cells starting at (23, 12), so the
    // cell centers are at x = 77, 185 and y = 66, 174. Row 0 is at the top
    // and column 0 is at the left.
    let range = ValueRange::new(0.0, 3.0);
    for ((x, y), value) in [
        ((77, 66), 1.0),
        ((185, 66), 2.0),
        ((77, 174), 3.0),
        ((185, 174), 0.0),
    ] {
        let color = Hot.color_of(value, range);
        assert_eq!(
            img.get_pixel(x, y).0,
            [color.0, color.1, color.2],
            "pixel ({}, {}) should show {}",
            x,
            y,
            value
        );
    }
    Ok(())
}

#[test]
fn test_run_svg() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("m.txt");
    let output = dir.path().join("m.svg");
    std::fs::write(&input, "0 0 1.0\n0 1 2.0\n1 0 3.0\n")?;

    run(args(&input, &output))?;

    let svg = std::fs::read_to_string(&output)?;
    assert!(svg.starts_with("<svg"));
    // the color scale is labeled at both ends and at three points in between
    assert_eq!(svg.matches("<text").count(), 5);
    for label in ["0", "0.75", "1.5", "2.25", "3"] {
        let closed = format!("{}</text>", label);
        assert!(svg.lines().any(|l| l == closed), "missing label {}", label);
    }

    // a constant matrix has a single label
    std::fs::write(&input, "0 0 -4.5\n")?;
    run(args(&input, &output))?;
    let svg = std::fs::read_to_string(&output)?;
    assert_eq!(svg.matches("<text").count(), 1);
    Ok(())
}

#[test]
fn test_run_empty_input() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("empty.txt");
    let output = dir.path().join("empty.png");
    std::fs::write(&input, "")?;

    run(args(&input, &output))?;
    assert!(output.exists());
    Ok(())
}

#[test]
fn test_malformed_input_writes_nothing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("bad.txt");
    let output = dir.path().join("bad.png");
    std::fs::write(&input, "0 0 1.0\n0 1\n")?;

    assert!(run(args(&input, &output)).is_err());
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_missing_input_writes_nothing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let output = dir.path().join("out.png");
    assert!(run(args(&dir.path().join("missing.txt"), &output)).is_err());
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_unwritable_output() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("m.txt");
    std::fs::write(&input, "0 0 1.0\n")?;

    let output = dir.path().join("no").join("such").join("dir.png");
    assert!(run(args(&input, &output)).is_err());
    let output = dir.path().join("no").join("such").join("dir.svg");
    assert!(run(args(&input, &output)).is_err());

    let output = dir.path().join("m.pdf");
    let err = run(args(&input, &output)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RenderError>(),
        Some(RenderError::UnsupportedFormat { .. })
    ));
    Ok(())
}

/// Runs the compiled binary with the given arguments in `dir`.
fn run_binary(dir: &Path, argv: &[&str]) -> Result<Output> {
    Ok(Command::new(env!("CARGO_BIN_EXE_sparse-heatmap"))
        .args(argv)
        .current_dir(dir)
        .env("RUST_LOG", "warn")
        .output()?)
}

#[test]
fn test_binary_usage() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let cases: [&[&str]; 3] = [&[], &["in.txt"], &["a", "b", "c"]];
    for argv in cases {
        let output = run_binary(dir.path(), argv)?;
        assert_eq!(output.status.code(), Some(1), "{:?}", argv);
        let stdout = String::from_utf8(output.stdout)?;
        assert!(stdout.starts_with("Usage:"), "{:?}: {:?}", argv, stdout);
    }

    let output = run_binary(dir.path(), &["--help"])?;
    assert_eq!(output.status.code(), Some(0));

    let output = run_binary(dir.path(), &["--version"])?;
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with(&format!("sparse-heatmap {}", env!("CARGO_PKG_VERSION"))));
    assert!(stdout.contains("compiler: rustc"), "{}", stdout);
    Ok(())
}

#[test]
fn test_binary_exit_status() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("good.txt"), "0 0 1.0\n1 1 2.0\n")?;
    std::fs::write(dir.path().join("bad.txt"), "0 0 1.0\n0 1\n")?;

    let output = run_binary(dir.path(), &["good.txt", "good.png"])?;
    assert!(output.status.success());
    assert!(dir.path().join("good.png").exists());

    let output = run_binary(dir.path(), &["bad.txt", "bad.png"])?;
    assert!(!output.status.success());
    assert!(!dir.path().join("bad.png").exists());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("line 2"), "{}", stderr);
    Ok(())
}
