use std::path::Path;

fn main() {
    // git 管理下のときだけ HEAD / index の変化で再実行
    for path in [".git/HEAD", ".git/index"] {
        if Path::new(path).exists() {
            println!("cargo:rerun-if-changed={}", path);
        }
    }
    println!("cargo:rerun-if-changed=build.rs");

    let output = std::process::Command::new("git")
        .args(["describe", "--always", "--dirty", "--tags"])
        .output();

    // git が無い環境（crates.io 展開など）ではパッケージバージョン
    let version = match output {
        Ok(o) if o.status.success() => String::from_utf8_lossy(&o.stdout).trim().to_string(),
        _ => format!("v{}", std::env::var("CARGO_PKG_VERSION").unwrap_or_default()),
    };
    println!("cargo:rustc-env=GIT_VERSION={}", version);
}
