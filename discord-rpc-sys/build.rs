//! Build script for discord-rpc-sys.
//!
//! 1. Locates or (feature `download`) downloads the pre-built `discord-rpc`
//!    shared library and exports its directory as `DISCORD_RPC_BUNDLED_DIR`.
//! 2. Optionally runs `bindgen` to regenerate Rust bindings (feature `regenerate`).
//!
//! Nothing is linked: the library is opened at runtime with `libloading`.
//!
//! # Environment variables
//!
//! - `DISCORD_RPC_DIR` — Path to a local directory containing the shared
//!   library. When set, skips downloading and is exported as-is.
//!
//! - `DISCORD_RPC_VERSION` — Override the upstream release version to download.
//!   Defaults to [`DEFAULT_VERSION`].
//!
//! - `DISCORD_RPC_UPDATE_BINDINGS` — When set (any value) alongside the
//!   `regenerate` feature, the freshly generated `bindings.rs` is copied back to
//!   `src/bindings.rs` so it can be committed to the repository.

use std::env;
use std::path::PathBuf;

/// GitHub repository for downloading upstream releases.
#[cfg(feature = "download")]
const GITHUB_REPO: &str = "discord/discord-rpc";

/// Upstream release the committed bindings were generated from.
#[cfg(feature = "download")]
const DEFAULT_VERSION: &str = "3.4.0";

fn main() {
    println!("cargo:rerun-if-env-changed=DISCORD_RPC_DIR");
    println!("cargo:rerun-if-env-changed=DISCORD_RPC_VERSION");
    println!("cargo:rerun-if-env-changed=DISCORD_RPC_UPDATE_BINDINGS");
    println!("cargo:rerun-if-env-changed=DOCS_RS");

    // docs.rs builds run in a network-isolated sandbox; skip downloading.
    if env::var("DOCS_RS").is_ok() {
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));

    #[cfg(feature = "regenerate")]
    {
        let manifest_dir =
            PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
        let header = manifest_dir.join("include").join("wrapper.h");
        println!("cargo:rerun-if-changed={}", header.display());
        generate_bindings(&header, &out_dir);
    }

    if let Ok(dir) = env::var("DISCORD_RPC_DIR") {
        // Option 1: Local library directory (development).
        println!("cargo:warning=Using local discord-rpc directory: {dir}");
        println!("cargo:rustc-env=DISCORD_RPC_BUNDLED_DIR={dir}");
        return;
    }

    // Option 2: Download from GitHub Releases.
    #[cfg(feature = "download")]
    {
        let target = env::var("TARGET").expect("TARGET not set");
        let version = env::var("DISCORD_RPC_VERSION").unwrap_or_else(|_| DEFAULT_VERSION.into());
        let lib_dir = out_dir.join("lib");
        let lib_file = lib_dir.join(lib_filename(&target));
        if !lib_file.exists() {
            download::fetch(&version, &target, &lib_dir);
        }
        println!(
            "cargo:rustc-env=DISCORD_RPC_BUNDLED_DIR={}",
            lib_dir.display()
        );
    }
    let _ = out_dir;
}

/// Shared library filename for the given target.
#[cfg(feature = "download")]
fn lib_filename(target: &str) -> &'static str {
    if target.contains("windows") {
        "discord-rpc.dll"
    } else if target.contains("apple") {
        "libdiscord-rpc.dylib"
    } else {
        "libdiscord-rpc.so"
    }
}

#[cfg(feature = "download")]
mod download {
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    use super::{GITHUB_REPO, lib_filename};

    /// Download the release archive for `target` and copy its shared library into `dest`.
    pub(super) fn fetch(version: &str, target: &str, dest: &Path) {
        let (platform, flavor) = platform(target);
        let url = format!(
            "https://github.com/{GITHUB_REPO}/releases/download/v{version}/discord-rpc-{platform}.zip"
        );

        eprintln!("Downloading {url}");

        let resp = ureq::get(&url)
            .call()
            .unwrap_or_else(|e| panic!("Failed to download discord-rpc from {url}: {e}"));

        let staging = dest.join("__extract");
        fs::create_dir_all(&staging).expect("Failed to create output directory");
        extract_zip(resp.into_body().into_reader(), &staging);

        let name = lib_filename(target);
        let found = find_library(&staging, name, flavor).unwrap_or_else(|| {
            panic!(
                "{name} ({flavor}) not found in release archive {}",
                staging.display()
            )
        });
        fs::copy(&found, dest.join(name)).expect("Failed to copy shared library");
        let _ = fs::remove_dir_all(&staging);
    }

    /// Release archive platform and the directory flavor holding the dynamic build.
    fn platform(target: &str) -> (&'static str, &'static str) {
        if target.contains("windows") {
            if target.starts_with("i686") {
                ("win", "win32-dynamic")
            } else {
                ("win", "win64-dynamic")
            }
        } else if target.contains("apple") {
            ("osx", "osx-dynamic")
        } else {
            ("linux", "linux-dynamic")
        }
    }

    /// Extract a `.zip` archive into `dest`.
    fn extract_zip(reader: impl io::Read, dest: &Path) {
        // zip crate requires Read + Seek, so buffer to a temp file first.
        let tmp = dest.join("__download.zip");
        {
            let mut file = fs::File::create(&tmp).expect("Failed to create temp zip file");
            let mut reader = reader;
            io::copy(&mut reader, &mut file).expect("Failed to write zip data");
        }

        let file = fs::File::open(&tmp).expect("Failed to open temp zip file");
        let mut archive = zip::ZipArchive::new(file).expect("Failed to read zip archive");
        archive
            .extract(dest)
            .expect("Failed to extract zip archive");

        let _ = fs::remove_file(&tmp);
    }

    /// Walk `root` for `name`, preferring a match under a `flavor` directory.
    fn find_library(root: &Path, name: &str, flavor: &str) -> Option<PathBuf> {
        let mut stack = vec![root.to_path_buf()];
        let mut fallback = None;
        while let Some(dir) = stack.pop() {
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if path.file_name().is_some_and(|n| n == name) {
                    if path.components().any(|c| c.as_os_str() == flavor) {
                        return Some(path);
                    }
                    fallback.get_or_insert(path);
                }
            }
        }
        fallback
    }
}

/// Run `bindgen` on the C headers to produce `$OUT_DIR/bindings.rs`.
///
/// Bindings are emitted in dynamic-library form: a `DiscordRpc` struct that
/// resolves every entry point through `libloading` when constructed.
#[cfg(feature = "regenerate")]
fn generate_bindings(header: &std::path::Path, out_dir: &std::path::Path) {
    let bindings = bindgen::Builder::default()
        .header(header.to_str().expect("path is not valid UTF-8"))
        .allowlist_function("Discord_.*")
        .allowlist_type("Discord.*")
        .allowlist_var("DISCORD_.*")
        .dynamic_library_name("DiscordRpc")
        .dynamic_link_require_all(true)
        // Layout assertions are host-specific; the sys crate tests them separately.
        .layout_tests(false)
        .derive_debug(true)
        .derive_default(true)
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
        .generate()
        .expect("bindgen failed to generate bindings from discord_rpc.h");

    let out_file = out_dir.join("bindings.rs");
    bindings
        .write_to_file(&out_file)
        .expect("Failed to write bindings.rs");

    if env::var("DISCORD_RPC_UPDATE_BINDINGS").is_ok() {
        let manifest_dir =
            PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
        let committed = manifest_dir.join("src").join("bindings.rs");
        std::fs::copy(&out_file, &committed).expect("Failed to copy bindings.rs to src/");
        println!(
            "cargo:warning=Updated committed bindings: {}",
            committed.display()
        );
    }
}
