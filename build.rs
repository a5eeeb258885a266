use std::collections::BTreeSet;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

const ENV_PREFIX: &str = "PF_";

fn is_env_key_char(byte: u8) -> bool {
    byte.is_ascii_uppercase() || byte.is_ascii_digit() || byte == b'_'
}

fn collect_env_keys(source: &str, out: &mut BTreeSet<String>) {
    let bytes = source.as_bytes();
    let prefix = ENV_PREFIX.as_bytes();
    let mut i = 0usize;
    while i + prefix.len() <= bytes.len() {
        if &bytes[i..i + prefix.len()] != prefix {
            i += 1;
            continue;
        }
        let mut j = i + prefix.len();
        while j < bytes.len() && is_env_key_char(bytes[j]) {
            j += 1;
        }
        if j > i + prefix.len() {
            if let Some(raw) = source.get(i..j) {
                out.insert(raw.to_string());
            }
            i = j;
        } else {
            i += 1;
        }
    }
}

fn scan_sources(dir: &Path, keys: &mut BTreeSet<String>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            scan_sources(&path, keys)?;
        } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs")
            && let Ok(content) = fs::read_to_string(&path)
        {
            collect_env_keys(&content, keys);
        }
    }
    Ok(())
}

fn write_generated_allowlist() -> std::io::Result<()> {
    let mut keys = BTreeSet::new();
    scan_sources(Path::new("src"), &mut keys)?;

    let mut generated = String::from("pub const GENERATED_PF_ENV_ALLOWLIST: &[&str] = &[\n");
    for key in keys {
        let _ = writeln!(generated, "    \"{key}\",");
    }
    generated.push_str("];\n");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    fs::write(Path::new(&out_dir).join("pf_env_allowlist.rs"), generated)
}

fn main() {
    write_generated_allowlist().expect("failed to generate PF env allowlist");

    // A unique-ish build id without pulling a UUID crate into build-dependencies.
    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap();
    println!(
        "cargo:rustc-env=BUILD_UUID={:x}-{:x}",
        now.as_secs(),
        now.subsec_nanos()
    );
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src");
}
