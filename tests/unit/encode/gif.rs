use super::*;
use crate::foundation::core::Canvas;
use image::AnimationDecoder as _;

fn cfg(num_frames: u64, loop_count: u16) -> SinkConfig {
    SinkConfig {
        canvas: Canvas {
            width: 4,
            height: 3,
        },
        num_frames,
        frame_delay_ms: 50,
        loop_count,
    }
}

fn solid(rgb: [u8; 3]) -> FrameRGBA {
    let mut data = Vec::with_capacity(4 * 3 * 4);
    for _ in 0..12 {
        data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }
    FrameRGBA {
        width: 4,
        height: 3,
        data,
        premultiplied: true,
    }
}

fn encode(frames: &[FrameRGBA], loop_count: u16) -> Vec<u8> {
    let mut bytes = Vec::new();
    {
        let mut sink = GifSink::new(&mut bytes);
        sink.begin(cfg(frames.len() as u64, loop_count)).unwrap();
        for (i, f) in frames.iter().enumerate() {
            sink.push_frame(FrameIndex(i as u64), f).unwrap();
        }
        assert_eq!(sink.frames_written(), frames.len() as u64);
        sink.end().unwrap();
    }
    bytes
}

#[test]
fn writes_decodable_gif_with_all_frames() {
    let frames = [solid([255, 0, 0]), solid([0, 255, 0]), solid([0, 0, 255])];
    let bytes = encode(&frames, 0);
    assert_eq!(&bytes[..3], b"GIF");
    assert_eq!(*bytes.last().unwrap(), 0x3B, "gif trailer");

    let decoder = image::codecs::gif::GifDecoder::new(std::io::Cursor::new(bytes)).unwrap();
    let decoded = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(decoded.len(), 3);
    for f in &decoded {
        assert_eq!(f.buffer().dimensions(), (4, 3));
        let (num, den) = f.delay().numer_denom_ms();
        assert_eq!(num / den, 50);
    }
    let first = decoded[0].buffer().get_pixel(0, 0);
    assert!(first[0] > 200 && first[1] < 50 && first[2] < 50);
}

#[test]
fn infinite_loop_writes_netscape_extension() {
    let bytes = encode(&[solid([1, 2, 3]), solid([3, 2, 1])], 0);
    let needle = b"NETSCAPE2.0";
    assert!(bytes.windows(needle.len()).any(|w| w == needle));
}

#[test]
fn repeat_mapping() {
    assert!(matches!(repeat_for(0), Repeat::Infinite));
    assert!(matches!(repeat_for(3), Repeat::Finite(3)));
}

#[test]
fn lifecycle_errors_are_encode_errors() {
    let mut bytes = Vec::new();
    let mut sink = GifSink::new(&mut bytes);
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &solid([0, 0, 0])),
        Err(SkylineError::Encode(_))
    ));
    assert!(sink.end().is_err());
    assert!(sink.begin(cfg(1, 0)).is_err(), "sink cannot restart once ended");
}

#[test]
fn out_of_order_frames_are_rejected() {
    let mut bytes = Vec::new();
    let mut sink = GifSink::new(&mut bytes);
    sink.begin(cfg(2, 0)).unwrap();
    sink.push_frame(FrameIndex(1), &solid([0, 0, 0])).unwrap();
    assert!(sink.push_frame(FrameIndex(0), &solid([0, 0, 0])).is_err());
}
