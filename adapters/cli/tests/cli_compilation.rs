use std::process::Command;

#[test]
fn ratmaze_binary_type_checks() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "ratmaze"])
        .status()
        .expect("cargo should be runnable from the cli crate");

    assert!(status.success(), "the ratmaze terminal host failed to type-check");
}
