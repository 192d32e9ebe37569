use std::path::Path;
use std::process::Command;

use wallhue::color::{chroma, distance, ChannelOrder, Color};
use wallhue::pipeline::load::{load_image, PixelBuffer};
use wallhue::pipeline::quantize::{ClusterQuantizer, QuantizeMethod};
use wallhue::pipeline::select::{SelectorConfig, Vibrancy};
use wallhue::pipeline::{extract_palette, ExtractConfig};
use wallhue::template::{process_templates, render};
use wallhue::theme::ColorDocument;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn solid(width: u32, height: u32, rgb: [u8; 3]) -> PixelBuffer {
    let data = rgb.repeat((width * height) as usize);
    PixelBuffer::new(width, height, ChannelOrder::Rgb, data).unwrap()
}

/// Left half `left`, right half `right`.
fn two_blocks(width: u32, height: u32, left: [u8; 3], right: [u8; 3]) -> PixelBuffer {
    let img = image::RgbImage::from_fn(width, height, |x, _| {
        image::Rgb(if x < width / 2 { left } else { right })
    });
    PixelBuffer::from_rgb_image(img)
}

fn create_colorful(path: &Path) {
    let img = image::RgbImage::from_fn(64, 64, |x, y| {
        let region = (x / 16) + (y / 16) * 4;
        match region % 8 {
            0 => image::Rgb([220, 50, 50]),   // red
            1 => image::Rgb([50, 200, 50]),   // green
            2 => image::Rgb([50, 50, 220]),   // blue
            3 => image::Rgb([220, 220, 50]),  // yellow
            4 => image::Rgb([200, 50, 200]),  // magenta
            5 => image::Rgb([50, 200, 200]),  // cyan
            6 => image::Rgb([20, 20, 20]),    // black
            _ => image::Rgb([240, 240, 240]), // white
        }
    });
    img.save(path).unwrap();
}

fn config(method: QuantizeMethod, count: usize) -> ExtractConfig {
    ExtractConfig {
        method,
        kmeans: ClusterQuantizer {
            k: 4,
            ..Default::default()
        },
        selector: SelectorConfig {
            count,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn hexes(doc: &ColorDocument) -> Vec<String> {
    doc.iter().map(|(_, record)| record.hex.clone()).collect()
}

/// Validate the structure of a CSS variable block.
fn validate_css_block(output: &str, expected_colors: usize) {
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), expected_colors + 2, "unexpected block: {output}");
    assert_eq!(lines[0], "* {");
    assert_eq!(*lines.last().unwrap(), "}");

    let line_re = regex::Regex::new(r"^  --color(\d+): #[0-9A-F]{6};$").unwrap();
    for (i, line) in lines[1..lines.len() - 1].iter().enumerate() {
        let caps = line_re
            .captures(line)
            .unwrap_or_else(|| panic!("malformed line: '{line}'"));
        assert_eq!(caps[1].parse::<usize>().unwrap(), i);
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn solid_red_yields_single_red_entry() {
    let pixels = solid(4, 4, [255, 0, 0]);
    let palette = extract_palette(&pixels, &config(QuantizeMethod::Kmeans, 1)).unwrap();
    let doc = ColorDocument::from_palette(&palette);

    assert_eq!(doc.len(), 1);
    assert_eq!(doc.get("color0").unwrap().hex, "#FF0000");
}

#[test]
fn blue_and_green_blocks_both_survive() {
    let pixels = two_blocks(4, 4, [0, 0, 255], [0, 255, 0]);
    for method in [QuantizeMethod::Kmeans, QuantizeMethod::MedianCut] {
        let palette = extract_palette(&pixels, &config(method, 2)).unwrap();
        let mut found = hexes(&ColorDocument::from_palette(&palette));
        found.sort();
        assert_eq!(found, vec!["#0000FF", "#00FF00"], "{method:?}");
    }
}

#[test]
fn short_palette_is_not_an_error() {
    let pixels = two_blocks(8, 8, [200, 40, 40], [40, 40, 200]);
    let palette = extract_palette(&pixels, &config(QuantizeMethod::Kmeans, 16)).unwrap();
    assert_eq!(palette.len(), 2);
}

#[test]
fn gray_image_still_produces_a_palette() {
    let pixels = solid(8, 8, [128, 128, 128]);
    let palette = extract_palette(&pixels, &config(QuantizeMethod::MedianCut, 4)).unwrap();
    assert_eq!(palette.len(), 1);
}

#[test]
fn empty_palette_when_fallback_disabled_and_nothing_vibrant() {
    let pixels = solid(8, 8, [128, 128, 128]);
    let mut cfg = config(QuantizeMethod::Kmeans, 4);
    cfg.selector.fallback = false;
    let err = extract_palette(&pixels, &cfg).unwrap_err();
    assert!(matches!(err, wallhue::Error::EmptyPalette));
    assert_eq!(err.stage(), "extract");
}

#[test]
fn colorful_image_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("colorful.png");
    create_colorful(&image_path);

    let pixels = load_image(&image_path).unwrap();
    let palette = extract_palette(&pixels, &ExtractConfig::default()).unwrap();
    assert!(palette.len() >= 6, "got {} colors", palette.len());

    let doc = ColorDocument::from_palette(&palette);
    validate_css_block(&doc.css_block(), doc.len());
}

#[test]
fn record_builder_is_idempotent() {
    let pixels = two_blocks(8, 8, [220, 120, 20], [20, 120, 220]);
    let palette = extract_palette(&pixels, &ExtractConfig::default()).unwrap();
    let first = ColorDocument::from_palette(&palette);
    let second = ColorDocument::from_palette(&palette);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    assert_eq!(first.css_block(), second.css_block());
}

#[test]
fn template_rendering_against_extracted_palette() {
    let pixels = solid(4, 4, [255, 0, 0]);
    let palette = extract_palette(&pixels, &config(QuantizeMethod::Kmeans, 1)).unwrap();
    let doc = ColorDocument::from_palette(&palette);

    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::write(
        input.path().join("waybar.css.tlp"),
        "@define-color accent {color0.hex};\n@define-color missing {color9.hex};\n",
    )
    .unwrap();

    let report = process_templates(&doc, input.path(), output.path()).unwrap();

    assert!(report.success());
    assert_eq!(report.unresolved, 1);
    let content = std::fs::read_to_string(output.path().join("waybar.css")).unwrap();
    assert_eq!(
        content,
        "@define-color accent #FF0000;\n@define-color missing {color9.hex};\n"
    );
}

// ---------------------------------------------------------------------------
// Property tests
// ---------------------------------------------------------------------------

mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use wallhue::pipeline::quantize::{MedianCutQuantizer, Quantizer, WeightedColor};
    use wallhue::pipeline::select::select_palette;

    fn arb_color() -> impl Strategy<Value = Color> {
        any::<[u8; 3]>().prop_map(|[r, g, b]| Color::new(r, g, b))
    }

    fn arb_candidates() -> impl Strategy<Value = Vec<WeightedColor>> {
        proptest::collection::vec((arb_color(), 1u32..1000), 0..40).prop_map(|v| {
            v.into_iter()
                .map(|(c, weight)| WeightedColor {
                    color: c.to_lab(),
                    weight,
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn rgb_lab_round_trip(c in arb_color()) {
            let back = Color::from_lab(c.to_lab());
            prop_assert!((c.r as i16 - back.r as i16).abs() <= 1, "{:?} -> {:?}", c, back);
            prop_assert!((c.g as i16 - back.g as i16).abs() <= 1, "{:?} -> {:?}", c, back);
            prop_assert!((c.b as i16 - back.b as i16).abs() <= 1, "{:?} -> {:?}", c, back);
        }

        #[test]
        fn distance_is_a_symmetric_metric(a in arb_color(), b in arb_color()) {
            let (la, lb) = (a.to_lab(), b.to_lab());
            prop_assert_eq!(distance(&la, &la), 0.0);
            prop_assert_eq!(distance(&la, &lb), distance(&lb, &la));
        }

        #[test]
        fn hsl_hue_in_range(c in arb_color()) {
            let h = c.to_hsl().hue.into_positive_degrees();
            prop_assert!((0.0..360.0).contains(&h), "hue {}", h);
            let h = c.to_hsv().hue.into_positive_degrees();
            prop_assert!((0.0..360.0).contains(&h), "hue {}", h);
        }

        #[test]
        fn selector_invariants(candidates in arb_candidates(), count in 1usize..12) {
            let config = SelectorConfig { count, ..Default::default() };
            let palette = select_palette(&candidates, &config);

            prop_assert!(palette.len() <= count);
            for (i, a) in palette.iter().enumerate() {
                for b in palette.iter().skip(i + 1) {
                    prop_assert!(distance(a, b) >= config.min_distance);
                }
            }

            let vibrancy = Vibrancy::default();
            let best = candidates
                .iter()
                .filter(|wc| vibrancy.accepts(&wc.color))
                .map(|wc| chroma(&wc.color))
                .fold(None, |acc: Option<f32>, c| Some(acc.map_or(c, |a| a.max(c))));
            if let Some(best) = best {
                prop_assert_eq!(chroma(&palette.colors()[0]), best);
            }
        }

        #[test]
        fn median_cut_size_bounds(
            pixels in proptest::collection::vec(arb_color(), 0..300),
            depth in 0u32..6,
        ) {
            let out = MedianCutQuantizer { depth }.quantize(&pixels);
            prop_assert!(out.len() <= 1 << depth);
            prop_assert_eq!(out.is_empty(), pixels.is_empty());
        }

        #[test]
        fn text_without_placeholders_is_unchanged(text in "[^{]*") {
            let doc = ColorDocument::default();
            let out = render(&text, &doc);
            prop_assert_eq!(out.text, text);
            prop_assert!(out.unresolved.is_empty());
        }
    }
}

// ---------------------------------------------------------------------------
// CLI integration tests (run the actual binary)
// ---------------------------------------------------------------------------

fn cargo_bin() -> &'static str {
    env!("CARGO_BIN_EXE_wallhue")
}

#[test]
fn cli_writes_css_and_templates() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("colorful.png");
    create_colorful(&image_path);
    let templates = dir.path().join("templates");
    let themes = dir.path().join("themes");
    std::fs::create_dir_all(&templates).unwrap();
    std::fs::write(templates.join("colors.tlp"), "accent={color0.strip}\n").unwrap();

    let output = Command::new(cargo_bin())
        .arg(&image_path)
        .arg("--output")
        .arg(&themes)
        .arg("--templates")
        .arg(&templates)
        .output()
        .expect("failed to run binary");

    assert!(
        output.status.success(),
        "binary failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    validate_css_block(&stdout, stdout.lines().count() - 2);

    let rendered = std::fs::read_to_string(themes.join("colors")).unwrap();
    assert!(regex::Regex::new(r"^accent=[0-9A-F]{6}\n$")
        .unwrap()
        .is_match(&rendered));
    assert!(themes.join("colors.json").exists());
}

#[test]
fn cli_json_format() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("colorful.png");
    create_colorful(&image_path);

    let output = Command::new(cargo_bin())
        .arg(&image_path)
        .args(["--format", "json", "--method", "median-cut", "-n", "4"])
        .arg("-o")
        .arg(dir.path().join("themes"))
        .arg("-t")
        .arg(dir.path().join("templates"))
        .output()
        .expect("failed to run binary");

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let doc = value.as_object().unwrap();
    assert!(!doc.is_empty() && doc.len() <= 4);
    for record in doc.values() {
        for key in ["hex", "strip", "rgb", "rgba", "hsl", "hsv", "lab"] {
            assert!(record.get(key).is_some(), "missing {key}");
        }
    }
}

#[test]
fn cli_help_output() {
    let output = Command::new(cargo_bin())
        .arg("--help")
        .output()
        .expect("failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("wallhue"));
    assert!(stdout.contains("--method"));
    assert!(stdout.contains("--templates"));
    assert!(stdout.contains("--min-distance"));
}

#[test]
fn cli_file_not_found_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(cargo_bin())
        .arg("/nonexistent/image.png")
        .arg("-o")
        .arg(dir.path().join("themes"))
        .arg("-t")
        .arg(dir.path().join("templates"))
        .output()
        .expect("failed to run binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("file not found"),
        "expected file-not-found error, got: {stderr}"
    );
    assert!(stderr.contains("decode stage failed"), "{stderr}");
}
