use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "battle-city"])
        .status()
        .expect("failed to invoke cargo check for battle-city CLI binary");

    assert!(status.success(), "cargo check --bin battle-city should succeed");
}

#[test]
fn help_lists_every_option() {
    let output = Command::new(env!("CARGO_BIN_EXE_battle-city"))
        .arg("--help")
        .output()
        .expect("failed to launch battle-city --help");
    assert!(output.status.success());

    let help = String::from_utf8_lossy(&output.stdout);
    for option in [
        "--seed",
        "--headless <TICKS>",
        "--show-fps",
        "--vsync",
        "--no-sprites",
        "--sprite-manifest <PATH>",
        "--log-level",
    ] {
        assert!(help.contains(option), "help is missing {option}:\n{help}");
    }
}
