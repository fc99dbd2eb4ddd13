fn main() {
    // Surface GIT_HASH to the crate when the build environment provides it;
    // config::version() falls back to CARGO_PKG_VERSION otherwise.
    if let Ok(git_hash) = std::env::var("GIT_HASH") {
        println!("cargo:rustc-env=GIT_HASH={git_hash}");
    }
    println!("cargo:rerun-if-env-changed=GIT_HASH");
}
