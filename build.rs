//! This build script prepares everything the crate pulls in from `OUT_DIR`:
//!
//! - `memory.x` for the linker (firmware builds only)
//! - `utc.rs` holding the build time, used as the initial wall clock
//! - `background.bin` / `bluetooth.bin`, the packed 1-bit face assets

use image::GenericImageView;
use std::{
    env,
    error::Error,
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

/// Convert a bitmap asset into packed 1-bit rows (MSB first, set bit = white).
///
/// A missing or wrongly sized source is written out as an empty asset, which the
/// face rejects as corrupt at startup.
fn convert_asset(input: &str, output: &Path, width: u32, height: u32) -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed={}", input);

    if !Path::new(input).exists() {
        println!("cargo:warning=Asset '{}' not found, writing empty raster", input);
        File::create(output)?.write_all(&[])?;
        return Ok(());
    }

    let img = image::open(input)?;
    if img.dimensions() != (width, height) {
        println!(
            "cargo:warning=Asset '{}' is {}x{}, expected {}x{}",
            input,
            img.width(),
            img.height(),
            width,
            height
        );
        File::create(output)?.write_all(&[])?;
        return Ok(());
    }

    let gray = img.to_luma8();
    let bytes_per_row = width.div_ceil(8);
    let mut buffer = vec![0u8; (bytes_per_row * height) as usize];
    for (x, y, pixel) in gray.enumerate_pixels() {
        if pixel[0] >= 128 {
            let byte_index = (y * bytes_per_row + x / 8) as usize;
            buffer[byte_index] |= 0x80 >> (x % 8);
        }
    }

    File::create(output)?.write_all(&buffer)?;
    Ok(())
}

fn main() {
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());

    // Put memory layout in the output directory and ensure it's on the linker search path.
    if env::var("CARGO_CFG_TARGET_ARCH").as_deref() == Ok("arm") {
        File::create(out.join("memory.x"))
            .unwrap()
            .write_all(include_bytes!("memory.x"))
            .unwrap();
        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
        println!("cargo:rerun-if-changed=memory.x");
    }

    // create rs file with current UTC time
    File::create(out.join("utc.rs"))
        .unwrap()
        .write_fmt(format_args!(
            "pub const BUILD_TIMESTAMP: i64 = {:?};",
            chrono::Utc::now().timestamp()
        ))
        .unwrap();

    for (input, output, width, height) in [
        ("assets/background.pbm", "background.bin", 144, 168),
        ("assets/bluetooth.pbm", "bluetooth.bin", 9, 9),
    ] {
        if let Err(e) = convert_asset(input, &out.join(output), width, height) {
            println!("cargo:warning=Failed to convert {}: {}", input, e);
            File::create(out.join(output)).unwrap().write_all(&[]).unwrap();
        }
    }

    println!("cargo:rerun-if-changed=build.rs");
}
