use super::*;

fn profile(ext: &str) -> ImageProfile {
    ImageProfile {
        extension: ext.to_string(),
    }
}

#[test]
fn extension_selects_format_case_insensitively() {
    let enc = ImageFileEncoder::new(&profile("PNG"), true, [0, 0, 0, 255]).unwrap();
    assert_eq!(enc.format(), image::ImageFormat::Png);
    let enc = ImageFileEncoder::new(&profile("jpeg"), true, [0, 0, 0, 255]).unwrap();
    assert_eq!(enc.format(), image::ImageFormat::Jpeg);
    let enc = ImageFileEncoder::new(&profile("tif"), true, [0, 0, 0, 255]).unwrap();
    assert_eq!(enc.format(), image::ImageFormat::Tiff);
}

#[test]
fn unknown_extension_is_rejected_up_front() {
    assert!(ImageFileEncoder::new(&profile("nope"), true, [0, 0, 0, 255]).is_err());
}

#[test]
fn encode_requires_an_output_path() {
    let mut enc = ImageFileEncoder::new(&profile("png"), true, [0, 0, 0, 255]).unwrap();
    let frame = FrameBuffer::solid(2, 2, [1, 2, 3, 255]);
    assert!(matches!(
        enc.encode(&frame, None),
        Err(ExportError::Validation(_))
    ));
}

#[test]
fn png_round_trips_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f-1.png");
    let mut enc = ImageFileEncoder::new(&profile("png"), true, [0, 0, 0, 255]).unwrap();
    let frame = FrameBuffer::solid(3, 2, [10, 20, 30, 200]);
    enc.encode(&frame, Some(&path)).unwrap();

    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(2, 1).0, [10, 20, 30, 200]);
}

#[test]
fn jpeg_is_flattened_to_rgb() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f-1.jpg");
    let mut enc = ImageFileEncoder::new(&profile("jpg"), true, [0, 0, 0, 255]).unwrap();
    enc.encode(&FrameBuffer::solid(8, 8, [255, 255, 255, 0]), Some(&path))
        .unwrap();

    let img = image::open(&path).unwrap();
    assert_eq!(img.color(), image::ColorType::Rgb8);
    // Fully transparent white over black background.
    assert!(img.to_rgb8().get_pixel(4, 4).0.iter().all(|&c| c < 8));
}

#[test]
fn refuses_to_overwrite_when_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f-1.png");
    std::fs::write(&path, b"existing").unwrap();
    let mut enc = ImageFileEncoder::new(&profile("png"), false, [0, 0, 0, 255]).unwrap();
    let err = enc
        .encode(&FrameBuffer::solid(1, 1, [0, 0, 0, 255]), Some(&path))
        .unwrap_err();
    assert!(matches!(err, ExportError::Encode(_)));
    assert_eq!(std::fs::read(&path).unwrap(), b"existing");
}
