// Runs the built assetembed binary against a temporary asset tree.

use std::path::Path;
use std::process::{Command, Output};

fn assetembed(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_assetembed"))
        .args(args)
        .current_dir(cwd)
        .env_remove("ASSETEMBED_PACKAGE")
        .output()
        .expect("Failed to spawn assetembed")
}

fn setup() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let assets = dir.path().join("static");
    std::fs::create_dir_all(assets.join("img")).unwrap();
    std::fs::write(assets.join("index.html"), "<h1>hi</h1>\n").unwrap();
    std::fs::write(assets.join("img/dot.bin"), [0u8, 1, 2, 255]).unwrap();
    dir
}

#[test]
fn test_generate_then_verify() {
    let dir = setup();

    let output = assetembed(
        &["generate", "static", "-e", "zbase64", "-c", "-j", "2", "-o", "gen.rs"],
        dir.path(),
    );
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("gen.rs"), "unexpected output: {stdout}");

    let generated = std::fs::read_to_string(dir.path().join("gen.rs")).unwrap();
    assert!(generated.contains("pub mod assets {"));
    assert!(generated.contains("pub fn load_assets()"));
    assert!(generated.contains("use flate2::read::ZlibDecoder;"));

    let output = assetembed(&["verify", "gen.rs", "static"], dir.path());
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "PASS\t2 comparisons"
    );
}

#[test]
fn test_verify_detects_modified_file() {
    let dir = setup();

    let output = assetembed(&["generate", "static", "-e", "hex", "-o", "gen.rs"], dir.path());
    assert!(output.status.success());

    std::fs::write(dir.path().join("static/index.html"), "<h1>changed</h1>\n").unwrap();

    let output = assetembed(&["verify", "gen.rs", "static"], dir.path());
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("FAIL"), "unexpected output: {stdout}");
    assert!(stdout.contains("fail\t\"/index.html\""));

    // Quiet mode keeps stdout empty but still fails
    let output = assetembed(&["verify", "-q", "gen.rs", "static"], dir.path());
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_generate_to_stdout_uses_config_file() {
    let dir = setup();
    std::fs::write(
        dir.path().join("assetembed.json"),
        r#"{ "package": "web", "function": "load_web", "encoding": "hex" }"#,
    )
    .unwrap();

    let output = assetembed(&["generate", "static", "-o", "-"], dir.path());
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pub mod web {"));
    assert!(stdout.contains("pub fn load_web()"));
    assert!(stdout.contains(r#"assets.insert("/img/dot.bin", decode(br"000102ff")?);"#));
}

#[test]
fn test_generate_rejects_invalid_function_name() {
    let dir = setup();

    let output = assetembed(&["generate", "static", "-f", "load-assets", "-o", "gen.rs"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a Rust identifier"));
    assert!(!dir.path().join("gen.rs").exists());
}

#[test]
fn test_generate_missing_directory() {
    let dir = setup();

    let output = assetembed(&["generate", "does-not-exist", "-o", "gen.rs"], dir.path());
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load assets"));
    assert!(!dir.path().join("gen.rs").exists());
}
