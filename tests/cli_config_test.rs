use std::process::Command;
use tempfile::TempDir;

#[test]
fn test_init_command() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();

    let output = Command::new(env!("CARGO_BIN_EXE_codevision"))
        .arg("init")
        .current_dir(temp_path)
        .output()
        .expect("Failed to run init command");

    assert!(output.status.success());

    // Check that config file was created
    let config_path = temp_path.join(".codevision/settings.toml");
    assert!(config_path.exists());
    assert!(temp_path.join(".codevisionignore").exists());

    // Verify config content
    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("version = 1"));
    assert!(content.contains("[indexing]"));
    assert!(content.contains("[merge]"));
    assert!(content.contains("[logging]"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();

    let run = |args: &[&str]| {
        Command::new(env!("CARGO_BIN_EXE_codevision"))
            .args(args)
            .current_dir(temp_path)
            .output()
            .expect("Failed to run init command")
    };

    assert!(run(&["init"]).status.success());
    let second = run(&["init"]);
    assert_eq!(second.status.code(), Some(6));
    assert!(run(&["init", "--force"]).status.success());
}

#[test]
fn test_config_command() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();

    // Create a custom config
    let config_dir = temp_path.join(".codevision");
    std::fs::create_dir_all(&config_dir).unwrap();

    let config_content = r#"
version = 2
[indexing]
parallel_threads = 99
"#;

    std::fs::write(config_dir.join("settings.toml"), config_content).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_codevision"))
        .arg("config")
        .current_dir(temp_path)
        .output()
        .expect("Failed to run config command");

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("version = 2"));
    assert!(stdout.contains("parallel_threads = 99"));
}

#[test]
fn test_explicit_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    let custom = temp_path.join("custom.toml");
    std::fs::write(&custom, "[merge]\nseparator_width = 7\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_codevision"))
        .args(["--config", custom.to_str().unwrap(), "config"])
        .current_dir(temp_path)
        .output()
        .expect("Failed to run config command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("separator_width = 7"));
}

#[test]
fn test_malformed_config_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let temp_path = temp_dir.path();
    let config_dir = temp_path.join(".codevision");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("settings.toml"),
        "[indexing]\nparallel_threads = \"many\"\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_codevision"))
        .arg("config")
        .current_dir(temp_path)
        .output()
        .expect("Failed to run config command");

    assert_eq!(output.status.code(), Some(6));
}
