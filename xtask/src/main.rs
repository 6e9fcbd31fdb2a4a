//! Custom cargo commands for guardstack.
//!
//! Usage:
//!   cargo xtask verify    - Run full verification suite
//!   cargo xtask test      - Run all tests
//!   cargo xtask kani      - Run Kani proofs
//!   cargo xtask fuzz      - Run each fuzz target briefly
//!   cargo xtask check     - Quick check (no Kani, no fuzzing)

use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::process::Command;

/// Functions duplicated into the standalone Kani crate, and where the
/// originals live.
const EXTRACTED: &[(&str, &str)] = &[
    ("src/buffer.rs", "grown_capacity"),
    ("src/buffer.rs", "shrunk_capacity"),
    ("src/buffer.rs", "should_shrink"),
    ("src/checksum.rs", "compute"),
];

const FUZZ_TARGETS: &[&str] = &["op_sequence", "corruption_detection"];

fn main() -> Result<()> {
    let task = env::args().nth(1);
    match task.as_deref() {
        Some("verify") => verify()?,
        Some("test") => test()?,
        Some("kani") => kani()?,
        Some("fuzz") => fuzz()?,
        Some("check") => check()?,
        Some("bench") => bench()?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  verify    Run full verification suite (tests + clippy + Kani + copy alignment)
  test      Run all Rust tests
  kani      Run Kani proofs only
  fuzz      Run every fuzz target for 30 seconds
  check     Quick check (cargo check + test + clippy)
  bench     Run benchmarks
"#
    );
}

/// Full verification suite
fn verify() -> Result<()> {
    println!("==========================================");
    println!("guardstack Verification Suite");
    println!("==========================================\n");

    // Step 1: Contract call sites
    println!("[1/5] Checking contract call sites...");
    check_contract_calls()?;
    println!("✓ Contracts wired in\n");

    // Step 2: Run tests
    println!("[2/5] Running Rust tests...");
    run_cargo(&["test", "--quiet"])?;
    println!("✓ All Rust tests passed\n");

    // Step 3: Clippy
    println!("[3/5] Running clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;
    println!("✓ Clippy passed\n");

    // Step 4: Kani
    println!("[4/5] Running Kani proofs...");
    kani()?;
    println!("✓ Kani proofs pass\n");

    // Step 5: The proofs must be about the code that ships
    println!("[5/5] Verifying extracted copies match src...");
    verify_extracted_copies()?;
    println!("✓ Copies aligned\n");

    println!("==========================================");
    println!("✓ ALL VERIFICATION CHECKS PASSED");
    println!("==========================================");
    println!("\nSafe to commit changes.");

    Ok(())
}

/// Run all tests
fn test() -> Result<()> {
    run_cargo(&["test"])
}

/// Run Kani proofs in the standalone crate
fn kani() -> Result<()> {
    let kani_dir = project_root()?.join("kani-proofs");
    if !kani_dir.exists() {
        println!("  (no kani-proofs directory, skipping)");
        return Ok(());
    }

    let status = Command::new("cargo")
        .arg("kani")
        .current_dir(&kani_dir)
        .status()
        .context("Failed to run cargo kani (is kani-verifier installed?)")?;

    if !status.success() {
        bail!("Kani proofs failed");
    }

    Ok(())
}

/// Run each fuzz target for a short, fixed time
fn fuzz() -> Result<()> {
    let fuzz_dir = project_root()?.join("fuzz");

    for target in FUZZ_TARGETS {
        println!("Fuzzing {}...", target);
        let status = Command::new("cargo")
            .args(["+nightly", "fuzz", "run", target, "--", "-max_total_time=30"])
            .current_dir(&fuzz_dir)
            .status()
            .with_context(|| format!("Failed to run cargo fuzz for {}", target))?;

        if !status.success() {
            bail!("Fuzz target {} found a failure", target);
        }
    }

    println!("\n✓ No fuzz failures");
    Ok(())
}

/// Quick check (no Kani)
fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/3] cargo check...");
    run_cargo(&["check"])?;

    println!("[2/3] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[3/3] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

/// Run benchmarks
fn bench() -> Result<()> {
    run_cargo(&["bench"])
}

// ============================================================================
// Helper functions
// ============================================================================

fn project_root() -> Result<PathBuf> {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("Failed to read current directory")?,
    };

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let root = project_root()?;

    let status = Command::new("cargo")
        .args(args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }

    Ok(())
}

/// Each mutation path must still call into `contracts`.
fn check_contract_calls() -> Result<()> {
    let root = project_root()?;
    let src_dir = root.join("src");

    let output = Command::new("grep")
        .args(["-r", "contracts::check_", "--include=*.rs"])
        .current_dir(&src_dir)
        .output()
        .context("Failed to run grep")?;

    let count = output
        .stdout
        .split(|&b| b == b'\n')
        .filter(|l| !l.is_empty())
        .count();

    if count < 5 {
        bail!(
            "Expected at least 5 contract call sites, found {}. Someone may have removed invariant checks!",
            count
        );
    }

    Ok(())
}

fn verify_extracted_copies() -> Result<()> {
    let root = project_root()?;
    let kani_path = root.join("kani-proofs/src/lib.rs");
    let kani_src = std::fs::read_to_string(&kani_path)
        .with_context(|| format!("Failed to read {}", kani_path.display()))?;

    for (file, name) in EXTRACTED {
        let original = std::fs::read_to_string(root.join(file))
            .with_context(|| format!("Failed to read {}", file))?;

        let Some(expected) = extract_fn(&original, name) else {
            bail!("{} not found in {}", name, file);
        };
        let Some(copy) = extract_fn(&kani_src, name) else {
            bail!("{} not found in kani-proofs", name);
        };
        if expected != copy {
            bail!(
                "{} in kani-proofs has drifted from {}:\n--- src\n{}\n--- kani\n{}",
                name,
                file,
                expected,
                copy
            );
        }
    }

    Ok(())
}

/// Body of `pub fn <name>` up to its closing brace, whitespace-normalized.
fn extract_fn(content: &str, name: &str) -> Option<String> {
    let start = content.find(&format!("pub fn {}(", name))?;
    let mut depth = 0usize;
    let mut body = String::new();
    for c in content[start..].chars() {
        body.push(c);
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(body.split_whitespace().collect::<Vec<_>>().join(" "));
                }
            }
            _ => {}
        }
    }
    None
}
