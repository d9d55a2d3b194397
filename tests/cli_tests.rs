use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;


use test_utils::{versions_json, MockProject, MockVersion, TestEnv};

/// Helper to get the binary command
fn modtaur_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_modtaur"))
}

/// Point a command at the environment's config directory
fn with_test_config(cmd: &mut Command, env: &TestEnv) {
    cmd.env("MODTAUR_CONFIG_DIR", &env.config_dir);
}

/// Mount the catalog endpoints for one single-version mod
fn mount_simple_mod(server: &mut mockito::ServerGuard, id: &str, slug: &str) -> mockito::Mock {
    let url = server.url();
    let project = MockProject::new(id, slug);
    let version = MockVersion::new(&format!("v-{}", slug), id).with_file(
        &format!("{}/files/{}.jar", url, slug),
        &format!("{}.jar", slug),
        true,
    );

    server
        .mock("GET", format!("/project/{}", slug).as_str())
        .with_body(project.json())
        .create();
    server
        .mock("GET", format!("/project/{}/version", slug).as_str())
        .with_body(versions_json(&[version]))
        .create();
    server
        .mock("GET", format!("/files/{}.jar", slug).as_str())
        .with_body("jar bytes")
        .create()
}

#[test]
fn test_help_lists_commands() {
    modtaur_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("load"))
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("cache"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_load_missing_modpack_fails() {
    let env = TestEnv::new();

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("load")
        .arg("no-such-pack.json")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_load_end_to_end() {
    let mut server = mockito::Server::new();
    let env = TestEnv::new();
    env.configure_catalog(&server.url());
    mount_simple_mod(&mut server, "AANobbMI", "sodium");

    let modpack = env.write_modpack(
        "pack",
        r#"{"version": "1.20.1", "loader": "fabric", "mods": ["sodium"]}"#,
    );

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("load")
        .arg(&modpack)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Loading modpack 'pack' for Minecraft 1.20.1 (fabric)",
        ))
        .stdout(predicate::str::contains("✓ sodium - sodium.jar"))
        .stdout(predicate::str::contains(
            "✓ Loaded 1 projects (1 downloaded, 0 from store)",
        ));

    assert!(env.mods_dir().join("sodium.jar").exists());
    assert!(env.store_dir.join("mods/1.20.1/sodium.jar").exists());
}

#[test]
fn test_load_second_run_installs_from_store() {
    let mut server = mockito::Server::new();
    let env = TestEnv::new();
    env.configure_catalog(&server.url());

    let project = MockProject::new("AANobbMI", "sodium");
    let version = MockVersion::new("v1", "AANobbMI").with_file(
        &format!("{}/files/sodium.jar", server.url()),
        "sodium.jar",
        true,
    );
    server
        .mock("GET", "/project/sodium")
        .with_body(project.json())
        .create();
    server
        .mock("GET", "/project/sodium/version")
        .with_body(versions_json(&[version]))
        .create();
    let download = server
        .mock("GET", "/files/sodium.jar")
        .with_body("jar bytes")
        .expect(1)
        .create();

    let modpack = env.write_modpack(
        "pack",
        r#"{"version": "1.20.1", "loader": "fabric", "mods": ["sodium"]}"#,
    );

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("load").arg(&modpack).assert().success();

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("load")
        .arg(&modpack)
        .assert()
        .success()
        .stdout(predicate::str::contains("(from store)"))
        .stdout(predicate::str::contains(
            "✓ Loaded 1 projects (0 downloaded, 1 from store)",
        ));

    // One download across both runs
    download.assert();
    assert!(env.mods_dir().join("sodium.jar").exists());
}

#[test]
fn test_load_clears_previous_files() {
    let mut server = mockito::Server::new();
    let env = TestEnv::new();
    env.configure_catalog(&server.url());
    mount_simple_mod(&mut server, "AANobbMI", "sodium");

    fs::write(env.mods_dir().join("stale.jar"), "old contents").unwrap();

    let modpack = env.write_modpack(
        "pack",
        r#"{"version": "1.20.1", "loader": "fabric", "mods": ["sodium"]}"#,
    );

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("load")
        .arg(&modpack)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 1 files from"));

    assert!(!env.mods_dir().join("stale.jar").exists());
    assert_eq!(env.installed_mods(), vec!["sodium.jar"]);
}

#[test]
fn test_load_keep_previous_retains_files() {
    let mut server = mockito::Server::new();
    let env = TestEnv::new();
    env.configure_catalog(&server.url());
    mount_simple_mod(&mut server, "AANobbMI", "sodium");

    fs::write(env.mods_dir().join("stale.jar"), "old contents").unwrap();

    let modpack = env.write_modpack(
        "pack",
        r#"{"version": "1.20.1", "loader": "fabric", "mods": ["sodium"]}"#,
    );

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("load")
        .arg(&modpack)
        .arg("--keep-previous")
        .assert()
        .success();

    assert_eq!(env.installed_mods(), vec!["sodium.jar", "stale.jar"]);
}

#[test]
fn test_load_resourcepacks_flag() {
    let mut server = mockito::Server::new();
    let env = TestEnv::new();
    env.configure_catalog(&server.url());

    let project = MockProject::new("1KVo5zza", "faithful").with_kind("resourcepack");
    let version = MockVersion::new("v1", "1KVo5zza")
        .with_loaders(vec!["minecraft"])
        .with_file(
            &format!("{}/files/faithful.zip", server.url()),
            "faithful.zip",
            true,
        );
    server
        .mock("GET", "/project/faithful")
        .with_body(project.json())
        .create();
    server
        .mock("GET", "/project/faithful/version")
        .with_body(versions_json(&[version]))
        .create();
    server
        .mock("GET", "/files/faithful.zip")
        .with_body("zip bytes")
        .create();

    let modpack = env.write_modpack(
        "pack",
        r#"{"version": "1.20.1", "loader": "fabric", "mods": [], "resourcepacks": ["faithful"]}"#,
    );

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("load")
        .arg(&modpack)
        .arg("--resourcepacks")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ faithful - faithful.zip"));

    assert_eq!(env.installed_resourcepacks(), vec!["faithful.zip"]);
}

#[test]
fn test_skip_mods_requires_resourcepacks_flag() {
    let env = TestEnv::new();
    let modpack = env.write_modpack(
        "pack",
        r#"{"version": "1.20.1", "loader": "fabric", "mods": ["sodium"]}"#,
    );

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("load")
        .arg(&modpack)
        .arg("--skip-mods")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--resourcepacks"));
}

#[test]
fn test_load_reports_partial_failure() {
    let mut server = mockito::Server::new();
    let env = TestEnv::new();
    env.configure_catalog(&server.url());
    mount_simple_mod(&mut server, "AANobbMI", "sodium");

    server
        .mock("GET", "/project/missingmod")
        .with_status(404)
        .create();

    let modpack = env.write_modpack(
        "pack",
        r#"{"version": "1.20.1", "loader": "fabric", "mods": ["sodium", "missingmod"]}"#,
    );

    // A failed entry is reported but does not fail the run
    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("load")
        .arg(&modpack)
        .assert()
        .success()
        .stdout(predicate::str::contains("✗ missingmod"))
        .stdout(predicate::str::contains(
            "⚠ Finished with 1 failures (1 downloaded, 0 from store)",
        ));

    assert_eq!(env.installed_mods(), vec!["sodium.jar"]);
}

#[test]
fn test_verify_compatible_modpack() {
    let mut server = mockito::Server::new();
    let env = TestEnv::new();
    env.configure_catalog(&server.url());

    let project = MockProject::new("AANobbMI", "sodium");
    server
        .mock("GET", "/project/sodium")
        .with_body(project.json())
        .create();

    let modpack = env.write_modpack(
        "pack",
        r#"{"version": "1.20.1", "loader": "fabric", "mods": ["sodium"]}"#,
    );

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("verify")
        .arg(&modpack)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ sodium"))
        .stdout(predicate::str::contains("✓ All 1 entries are compatible"));
}

#[test]
fn test_verify_incompatible_exits_nonzero() {
    let mut server = mockito::Server::new();
    let env = TestEnv::new();
    env.configure_catalog(&server.url());

    let project = MockProject::new("AANobbMI", "sodium").with_game_versions(vec!["1.19.2"]);
    server
        .mock("GET", "/project/sodium")
        .with_body(project.json())
        .create();

    let modpack = env.write_modpack(
        "pack",
        r#"{"version": "1.20.1", "loader": "fabric", "mods": ["sodium"]}"#,
    );

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("verify")
        .arg(&modpack)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("no version for Minecraft 1.20.1"))
        .stdout(predicate::str::contains("0/1 entries compatible"));
}

#[test]
fn test_verify_with_game_version_override() {
    let mut server = mockito::Server::new();
    let env = TestEnv::new();
    env.configure_catalog(&server.url());

    let project = MockProject::new("AANobbMI", "sodium").with_game_versions(vec!["1.19.2"]);
    server
        .mock("GET", "/project/sodium")
        .with_body(project.json())
        .create();

    let modpack = env.write_modpack(
        "pack",
        r#"{"version": "1.20.1", "loader": "fabric", "mods": ["sodium"]}"#,
    );

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("verify")
        .arg(&modpack)
        .arg("--game-version")
        .arg("1.19.2")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Verifying 1 entries against Minecraft 1.19.2 (fabric)",
        ))
        .stdout(predicate::str::contains("✓ All 1 entries are compatible"));
}

#[test]
fn test_cache_path_prints_store_location() {
    let env = TestEnv::new();
    env.configure_catalog("http://localhost:9");

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("cache")
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains(env.store_dir.to_str().unwrap()));
}

#[test]
fn test_cache_info_uninitialized() {
    let env = TestEnv::new();
    env.configure_catalog("http://localhost:9");

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("cache")
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mods stored: 0"))
        .stdout(predicate::str::contains("Not initialized"));
}

#[test]
fn test_cache_info_counts_artifacts() {
    let env = TestEnv::new();
    env.configure_catalog("http://localhost:9");

    fs::create_dir_all(env.store_dir.join("mods/1.20.1")).unwrap();
    fs::write(env.store_dir.join("mods/1.20.1/sodium.jar"), "jar bytes").unwrap();

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("cache")
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mods stored: 1"))
        .stdout(predicate::str::contains("Status: Active"));
}

#[test]
fn test_cache_clean_empty_store() {
    let env = TestEnv::new();
    env.configure_catalog("http://localhost:9");

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("cache")
        .arg("clean")
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Store is already empty."));
}

#[test]
fn test_cache_clean_removes_store() {
    let env = TestEnv::new();
    env.configure_catalog("http://localhost:9");

    fs::create_dir_all(env.store_dir.join("mods/1.20.1")).unwrap();
    fs::write(env.store_dir.join("mods/1.20.1/sodium.jar"), "jar bytes").unwrap();

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("cache")
        .arg("clean")
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed store, freed"));

    assert!(!env.store_dir.exists());
}

#[test]
fn test_cache_clean_prompt_cancels_on_no() {
    let env = TestEnv::new();
    env.configure_catalog("http://localhost:9");

    fs::create_dir_all(env.store_dir.join("mods/1.20.1")).unwrap();
    fs::write(env.store_dir.join("mods/1.20.1/sodium.jar"), "jar bytes").unwrap();

    let mut cmd = modtaur_cmd();
    with_test_config(&mut cmd, &env);
    cmd.arg("cache")
        .arg("clean")
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Clean cancelled."));

    assert!(env.store_dir.exists());
}

#[test]
fn test_completions_bash() {
    modtaur_cmd()
        .arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("modtaur"));
}
