use std::process::Command;

fn headless(args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_battle-city"))
        .args(args)
        .output()
        .expect("failed to launch battle-city");
    assert!(
        output.status.success(),
        "battle-city exited with {:?}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is utf-8")
}

#[test]
fn headless_run_prints_a_summary() {
    let stdout = headless(&["--headless", "120", "--seed", "7", "--log-level", "warn"]);

    assert!(stdout.starts_with("seed 7: "), "unexpected summary: {stdout}");
    assert!(stdout.contains("score"));
}

#[test]
fn same_seed_produces_same_summary() {
    let args = ["--headless", "900", "--seed", "1234", "--log-level", "error"];

    assert_eq!(headless(&args), headless(&args));
}
