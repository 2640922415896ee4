use std::{fs, path::PathBuf, process::Command};

fn burrow_defence(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_burrow-defence"))
        .args(args)
        .env("RUST_LOG", "info")
        .output()
        .expect("failed to launch burrow-defence");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

fn summary_line(stdout: &str) -> &str {
    stdout
        .lines()
        .find(|line| line.contains("session finished"))
        .unwrap_or_else(|| panic!("no session summary in output:\n{stdout}"))
}

fn scratch_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "burrow-defence-{}-{name}.toml",
        std::process::id()
    ));
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn batch_run_reports_first_wave_summary() {
    let (success, stdout, stderr) = burrow_defence(&["--seed", "7", "--ticks", "600"]);
    assert!(success, "burrow-defence failed: {stderr}");

    let summary = summary_line(&stdout);
    assert!(summary.contains("ticks=600"), "{summary}");
    assert!(summary.contains("wave=1"), "{summary}");
    assert!(summary.contains("map=0"), "{summary}");
    assert!(summary.contains("game_over=false"), "{summary}");
    assert!(
        stdout
            .lines()
            .any(|line| line.contains("cue total") && line.contains("wave_start")),
        "wave start cue missing from tally:\n{stdout}"
    );
}

#[test]
fn batch_runs_are_reproducible_for_a_seed() {
    let args = ["--seed", "11", "--ticks", "900", "--fast-forward"];
    let (first_ok, first, _) = burrow_defence(&args);
    let (second_ok, second, _) = burrow_defence(&args);
    assert!(first_ok && second_ok);
    let fields = |stdout: &str| {
        summary_line(stdout)
            .split_once("session finished")
            .map(|(_, fields)| fields.to_owned())
    };
    assert_eq!(fields(&first), fields(&second));
}

#[test]
fn undefended_config_loses_lives_to_the_wave() {
    let path = scratch_config(
        "undefended",
        "seed = 5\nstarting_lives = 20\n\n[[maps]]\nanchors = [[0, 5], [6, 5]]\n",
    );
    let (success, stdout, stderr) =
        burrow_defence(&["--config", path.to_str().expect("utf-8 path"), "--ticks", "4000"]);
    let _ = fs::remove_file(&path);
    assert!(success, "burrow-defence failed: {stderr}");

    let summary = summary_line(&stdout);
    assert!(summary.contains("towers=0"), "{summary}");
    assert!(summary.contains("lives=12"), "{summary}");
}

#[test]
fn invalid_config_is_reported_without_running() {
    let path = scratch_config("invalid", "[[maps]]\nanchors = [[0, 5]]\n");
    let (success, stdout, stderr) =
        burrow_defence(&["--config", path.to_str().expect("utf-8 path")]);
    let _ = fs::remove_file(&path);

    assert!(!success);
    assert!(stderr.contains("invalid config"), "{stderr}");
    assert!(!stdout.contains("session finished"));

    let (success, _, stderr) = burrow_defence(&["--config", "/nonexistent/burrow.toml"]);
    assert!(!success);
    assert!(stderr.contains("failed to read config"), "{stderr}");
}
