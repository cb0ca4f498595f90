// build.rs
//! 构建脚本 - 处理架构相关配置与版本信息

use std::env;
use std::fs;
use std::path::Path;
use std::process::Command;

fn main() {
    let target = env::var("TARGET").unwrap();
    let out_dir = env::var("OUT_DIR").unwrap();

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rustc-check-cfg=cfg(arch_mips32)");

    // Ultiparc 是 MIPS-I 内核，其余目标只使用模拟硬件
    if target.starts_with("mips-") || target.starts_with("mipsel-") {
        println!("cargo:rustc-cfg=arch_mips32");
    }

    let version_rs = render_version(&target);
    fs::write(Path::new(&out_dir).join("version.rs"), version_rs).unwrap();
}

/// 当前提交的短哈希，不在 git 仓库中时为 "unknown"
fn git_hash() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// 生成 `ultisoc_hal::version` 的内容
fn render_version(target: &str) -> String {
    let entries = [
        ("VERSION", env!("CARGO_PKG_VERSION").to_string()),
        ("TARGET", target.to_string()),
        ("GIT_HASH", git_hash()),
        ("BUILD_TIME", chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()),
    ];

    let mut out = String::from("// Auto-generated build information\n");
    for (name, value) in entries {
        out.push_str(&format!("pub const {}: &str = {:?};\n", name, value));
    }
    out
}
