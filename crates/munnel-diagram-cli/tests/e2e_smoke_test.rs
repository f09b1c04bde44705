use std::{fs, io::Write};

use tempfile::{TempDir, tempdir};

use munnel_diagram::DiagramError;
use munnel_diagram_cli::{Args, run};

/// Arguments reading an empty config file, so user and project configs
/// never leak into a run. Keep the returned directory alive for the test.
fn isolated_args() -> (TempDir, Args) {
    let config_dir = tempdir().expect("Failed to create config directory");
    let config_path = config_dir.path().join("config.toml");
    fs::write(&config_path, "").expect("Failed to write empty config");

    let args = Args {
        config: Some(config_path.to_string_lossy().to_string()),
        log_level: "off".to_string(),
        ..Args::default()
    };
    (config_dir, args)
}

#[test]
fn e2e_renders_to_explicit_path() {
    let (_config_dir, base) = isolated_args();
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("munnel_connectivity.svg");

    let args = Args {
        output: Some(output_path.to_string_lossy().to_string()),
        format: Some("svg".to_string()),
        ..base
    };

    match run(&args) {
        Ok(()) => {}
        Err(err) if err.is_renderer_unavailable() => {
            eprintln!("skipping: {err}");
            return;
        }
        Err(err) => panic!("Failed to render: {err:?}"),
    }

    let svg = fs::read_to_string(&output_path).expect("Failed to read output");
    assert!(svg.contains("<svg"), "Output should contain SVG tag");

    let entries = fs::read_dir(temp_dir.path()).unwrap().count();
    assert_eq!(entries, 1, "Only the image should be written");
}

#[test]
fn e2e_emit_dot_keeps_source() {
    let (_config_dir, base) = isolated_args();
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("diagram.png");

    let args = Args {
        output: Some(output_path.to_string_lossy().to_string()),
        emit_dot: true,
        ..base
    };

    match run(&args) {
        Ok(()) => {}
        Err(err) if err.is_renderer_unavailable() => return,
        Err(err) => panic!("Failed to render: {err:?}"),
    }

    assert!(output_path.exists());
    let dot = fs::read_to_string(temp_dir.path().join("diagram.dot")).expect("DOT kept");
    assert!(dot.contains("Munnel Server"));
}

#[test]
fn e2e_print_dot_needs_no_graphviz() {
    let (_config_dir, base) = isolated_args();
    let args = Args {
        print_dot: true,
        ..base
    };

    run(&args).expect("Printing DOT should not require Graphviz");
}

#[test]
fn e2e_config_file_is_applied() {
    let (_config_dir, base) = isolated_args();
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let out_dir = temp_dir.path().join("out");
    let config_path = temp_dir.path().join("config.toml");

    let mut file = fs::File::create(&config_path).unwrap();
    writeln!(
        file,
        "[output]\nformat = \"svg\"\ndirectory = {:?}\n\n[style]\nbackground_color = \"white\"",
        out_dir.to_string_lossy()
    )
    .unwrap();

    let args = Args {
        config: Some(config_path.to_string_lossy().to_string()),
        ..base
    };

    match run(&args) {
        Ok(()) => {}
        Err(err) if err.is_renderer_unavailable() => return,
        Err(err) => panic!("Failed to render: {err:?}"),
    }

    assert!(out_dir.join("munnel_connectivity.svg").exists());
}

#[test]
fn e2e_invalid_format_fails_before_rendering() {
    let (_config_dir, base) = isolated_args();
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = Args {
        output: Some(temp_dir.path().join("x.bmp").to_string_lossy().to_string()),
        format: Some("bmp".to_string()),
        ..base
    };

    let err = run(&args).unwrap_err();

    assert!(matches!(err, DiagramError::Config(_)));
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn e2e_output_extension_selects_format() {
    let (_config_dir, base) = isolated_args();
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("diagram.svg");

    let args = Args {
        output: Some(output_path.to_string_lossy().to_string()),
        ..base
    };

    match run(&args) {
        Ok(()) => {}
        Err(err) if err.is_renderer_unavailable() => return,
        Err(err) => panic!("Failed to render: {err:?}"),
    }

    let svg = fs::read_to_string(&output_path).expect("Output should be SVG text");
    assert!(svg.contains("<svg"), "Output should contain SVG tag");
}

#[test]
fn e2e_emit_dot_onto_image_path_is_rejected() {
    let (_config_dir, base) = isolated_args();
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = Args {
        output: Some(temp_dir.path().join("munnel.dot").to_string_lossy().to_string()),
        format: Some("png".to_string()),
        emit_dot: true,
        ..base
    };

    let err = run(&args).unwrap_err();

    assert!(matches!(err, DiagramError::Config(_)));
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}
