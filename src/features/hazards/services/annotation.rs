use image::{Rgb, RgbImage};
use std::path::Path;

use crate::features::hazards::models::{BoundingBox, Detection};
use crate::shared::constants::ANNOTATED_PREFIX;

const BOX_THICKNESS: u32 = 3;

// Per-class outline colours, cycled by class id
const PALETTE: [[u8; 3]; 8] = [
    [255, 56, 56],
    [255, 157, 151],
    [255, 112, 31],
    [255, 178, 29],
    [207, 210, 49],
    [72, 249, 10],
    [26, 147, 52],
    [0, 212, 187],
];

/// `detected_<original>`
pub fn annotated_file_name(original: &str) -> String {
    format!("{}{}", ANNOTATED_PREFIX, original)
}

/// Draw every detection box over the source image and write it to `target`.
///
/// Blocking: decodes and re-encodes the image. The output format follows the
/// target extension.
pub fn render_annotated(
    source: &Path,
    target: &Path,
    detections: &[Detection],
) -> Result<(), image::ImageError> {
    let mut canvas = image::open(source)?.to_rgb8();

    for detection in detections {
        let colour = PALETTE[detection.class_id.rem_euclid(PALETTE.len() as i64) as usize];
        draw_box(&mut canvas, &detection.bbox, Rgb(colour));
    }

    canvas.save(target)
}

fn draw_box(canvas: &mut RgbImage, bbox: &BoundingBox, colour: Rgb<u8>) {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return;
    }

    let clamp_x = |v: f64| (v.max(0.0) as u32).min(width - 1);
    let clamp_y = |v: f64| (v.max(0.0) as u32).min(height - 1);

    let (x1, x2) = (clamp_x(bbox.x1.min(bbox.x2)), clamp_x(bbox.x1.max(bbox.x2)));
    let (y1, y2) = (clamp_y(bbox.y1.min(bbox.y2)), clamp_y(bbox.y1.max(bbox.y2)));

    for t in 0..BOX_THICKNESS {
        let top = (y1 + t).min(y2);
        let bottom = y2.saturating_sub(t).max(y1);
        let left = (x1 + t).min(x2);
        let right = x2.saturating_sub(t).max(x1);

        for x in x1..=x2 {
            canvas.put_pixel(x, top, colour);
            canvas.put_pixel(x, bottom, colour);
        }
        for y in y1..=y2 {
            canvas.put_pixel(left, y, colour);
            canvas.put_pixel(right, y, colour);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(class_id: i64, x1: f64, y1: f64, x2: f64, y2: f64) -> Detection {
        Detection {
            name: "pothole".to_string(),
            class_id,
            confidence: 0.9,
            bbox: BoundingBox { x1, y1, x2, y2 },
        }
    }

    #[test]
    fn test_annotated_file_name() {
        assert_eq!(annotated_file_name("road.jpg"), "detected_road.jpg");
    }

    #[test]
    fn test_render_draws_outline_and_keeps_interior() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.png");
        let target = dir.path().join("out.png");
        RgbImage::from_pixel(40, 30, Rgb([0, 0, 0]))
            .save(&source)
            .unwrap();

        render_annotated(&source, &target, &[detection(0, 5.0, 5.0, 30.0, 20.0)]).unwrap();

        let out = image::open(&target).unwrap().to_rgb8();
        assert_eq!(out.dimensions(), (40, 30));
        assert_eq!(*out.get_pixel(5, 5), Rgb(PALETTE[0]));
        assert_eq!(*out.get_pixel(30, 12), Rgb(PALETTE[0]));
        assert_eq!(*out.get_pixel(17, 12), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_boxes_outside_the_image_are_clamped() {
        let mut canvas = RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]));
        draw_box(
            &mut canvas,
            &BoundingBox {
                x1: -20.0,
                y1: -5.0,
                x2: 500.0,
                y2: 500.0,
            },
            Rgb([255, 0, 0]),
        );
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([255, 0, 0]));
        assert_eq!(*canvas.get_pixel(9, 9), Rgb([255, 0, 0]));
    }

    #[test]
    fn test_undecodable_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.jpg");
        std::fs::write(&source, b"not an image").unwrap();

        assert!(render_annotated(&source, &dir.path().join("out.jpg"), &[]).is_err());
    }
}
