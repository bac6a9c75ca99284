use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=PURPLE_RAIN_BUILD");
    println!("cargo:rerun-if-env-changed=GITHUB_SHA");

    let target = target_id();
    let build_id = match std::env::var("PURPLE_RAIN_BUILD") {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => match revision() {
            Some(sha) => format!("{target} ({sha})"),
            None => target,
        },
    };

    println!("cargo:rustc-env=PURPLE_RAIN_BUILD={}", build_id);
}

fn short_hex(s: &str) -> Option<String> {
    let s = s.trim();
    let short = &s[..s.len().min(7)];
    if short.is_empty() || !short.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(short.to_ascii_lowercase())
}

fn revision() -> Option<String> {
    let from_git = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .and_then(|s| short_hex(&s));

    from_git.or_else(|| std::env::var("GITHUB_SHA").ok().and_then(|s| short_hex(&s)))
}

fn target_id() -> String {
    let os = match std::env::var("CARGO_CFG_TARGET_OS").as_deref() {
        Ok("macos") => "darwin".to_string(),
        Ok(other) => other.to_string(),
        Err(_) => "unknown".to_string(),
    };
    let arch = std::env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_else(|_| "unknown".to_string());
    format!("{os}-{arch}")
}
