// build.rs — Platform detection for the usage oracle.
//
// Emits `cargo:rustc-cfg=has_procfs` on targets that expose `/proc/stat` and
// `/proc/<pid>/statm`. The system tick counters and the RSS monitor read
// those files; elsewhere they report zeroed counters.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let procfs_targets = ["linux", "android"];
    if procfs_targets.contains(&target_os.as_str()) {
        println!("cargo:rustc-cfg=has_procfs");
    }
}
