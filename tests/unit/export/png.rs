use super::*;

#[test]
fn png_roundtrip_unpremultiplies() {
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![100, 50, 0, 128, 10, 20, 30, 255],
        premultiplied: true,
    };
    let bytes = encode_png(&frame).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (2, 1));
    assert_eq!(decoded.get_pixel(0, 0).0, [199, 100, 0, 128]);
    assert_eq!(decoded.get_pixel(1, 0).0, [10, 20, 30, 255]);
}

#[test]
fn empty_frame_is_encode_error() {
    let frame = FrameRGBA::transparent(0, 3);
    assert!(matches!(encode_png(&frame), Err(LampError::Encode(_))));
}
