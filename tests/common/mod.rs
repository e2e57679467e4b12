use assert_cmd::Command;
use std::path::Path;

/// `tcache` command pointed at `dir`, isolated from the caller's environment
pub fn tcache_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tcache").unwrap();
    cmd.env("TCACHE_DIR", dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Write an enabled sync config into `dir`
#[allow(dead_code)]
pub fn write_sync_config(dir: &Path, extra: &str) {
    std::fs::write(
        dir.join(".github-config.toml"),
        format!(
            "enabled = true\nrepository = \"dev/logs\"\nbranch = \"main\"\n\
             token = \"secret-token\"\n{}",
            extra
        ),
    )
    .unwrap();
}
