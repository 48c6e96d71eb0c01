//! Live end-to-end test against the OpenAI API.
//!
//! Gated behind `E2E_ENABLED` and `OPENAI_API_KEY` so it never runs in CI
//! unless explicitly requested. The key is read here only; the library and
//! the server never consult the environment for credentials.
//!
//! Run with:
//!   E2E_ENABLED=1 OPENAI_API_KEY=sk-... cargo test --test e2e -- --nocapture

use edgequake_img2xlsx::{process_batch_sync, to_xlsx_bytes, ExtractionConfig, Upload};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Skip unless E2E_ENABLED is set and a key is available.
macro_rules! e2e_key_or_skip {
    () => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        match std::env::var("OPENAI_API_KEY") {
            Ok(k) if !k.trim().is_empty() => k,
            _ => {
                println!("SKIP — OPENAI_API_KEY is not set");
                return;
            }
        }
    }};
}

fn blank_png() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 32, Rgb([255, 255, 255])));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
    buf
}

#[test]
fn live_batch_produces_one_row_per_image() {
    let key = e2e_key_or_skip!();
    let config = ExtractionConfig::builder()
        .api_key(key)
        .model("gpt-4o-mini")
        .max_tokens(300)
        .build()
        .unwrap();

    let uploads = vec![
        Upload::new("blank-1.png", blank_png()),
        Upload::new("blank-2.png", blank_png()),
    ];
    let set = process_batch_sync(config, &uploads).unwrap();

    assert_eq!(set.len(), 2);
    for [file, text, translation] in set.rows() {
        println!("{file}: {text:?} → {translation:?}");
        assert!(!text.is_empty());
        assert!(!translation.is_empty());
    }
    assert!(to_xlsx_bytes(&set).unwrap().starts_with(b"PK"));
}
