//! Custom assertions for quantized outputs.

use std::path::Path;

use intensity_quant::{QuantLevel, REFERENCE_PALETTE};

/// Assert that a losslessly encoded output only uses the first K palette
/// entries. Palette entries are B,G,R, the file is R,G,B.
pub fn assert_uses_active_palette(path: &Path, level: QuantLevel) {
    let image = image::open(path)
        .unwrap_or_else(|e| panic!("open {}: {e}", path.display()))
        .to_rgb8();
    let active: Vec<[u8; 3]> = REFERENCE_PALETTE
        .active(level)
        .iter()
        .map(|c| c.reversed().to_bytes())
        .collect();

    for (x, y, pixel) in image.enumerate_pixels() {
        assert!(
            active.contains(&pixel.0),
            "pixel ({x}, {y}) = {:?} is not among the first {level} palette entries",
            pixel.0
        );
    }
}

pub fn assert_dimensions(path: &Path, width: u32, height: u32) {
    let image = image::open(path).unwrap_or_else(|e| panic!("open {}: {e}", path.display()));
    assert_eq!(
        (image.width(), image.height()),
        (width, height),
        "dimensions of {}",
        path.display()
    );
}
