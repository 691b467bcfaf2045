use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=FFMPEG_DIR");
    println!("cargo:rerun-if-env-changed=VCPKG_ROOT");
    println!("cargo:rerun-if-env-changed=VCPKGRS_DYNAMIC");

    // ffmpeg-sys-next finds FFmpeg via pkg-config everywhere but Windows,
    // where vcpkg discovery needs a nudge.
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" || env::var_os("FFMPEG_DIR").is_some() {
        return;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        println!(
            "cargo:warning=FFMPEG_DIR is not set. On Windows, install FFmpeg via vcpkg and set VCPKG_ROOT + FFMPEG_DIR for reliable builds."
        );
        return;
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let ffmpeg_dir = PathBuf::from(&vcpkg_root).join("installed").join(&triplet);

    if ffmpeg_dir.exists() {
        println!(
            "cargo:warning=Detected vcpkg FFmpeg at {}. Set FFMPEG_DIR={} to make ffmpeg-sys-next discovery explicit.",
            ffmpeg_dir.display(),
            ffmpeg_dir.display(),
        );
    } else {
        println!(
            "cargo:warning=VCPKG_ROOT is set but no FFmpeg install was found at {}.",
            ffmpeg_dir.display(),
        );
    }
}
