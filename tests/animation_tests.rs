//! Multi-frame decoding: disposal methods and carried canvas state.

use zengif::bits::FixedBitWriter;
use zengif::lzw;
use zengif::{
    DisposalMethod, GifDecoder, GifEncoder, GraphicsControlExtension, ImageDescriptor,
    IndexedFrame, LogicalScreenDescriptor,
};

fn compress_indices(indices: &[u8], min_code_size: u8) -> Vec<u8> {
    let mut packed = FixedBitWriter::new(u32::from(min_code_size));
    for &i in indices {
        packed.write(u32::from(i));
    }
    let bits = packed.bit_len();
    lzw::compress(&packed.finish(), bits, min_code_size)
}

fn append_subblocks(out: &mut Vec<u8>, data: &[u8]) {
    for chunk in data.chunks(255) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
    out.push(0);
}

struct TestFrame {
    disposal: DisposalMethod,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    indices: Vec<u8>,
}

/// A 2x2-canvas GIF89a with a two-entry global table (black, white) and
/// one GCE-carrying frame per entry in `frames`.
fn animated_gif(frames: &[TestFrame]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"GIF89a");
    let screen = LogicalScreenDescriptor {
        canvas_width: 2,
        canvas_height: 2,
        gct_present: true,
        gct_size: 0,
        ..Default::default()
    };
    out.extend_from_slice(&screen.to_bytes());
    out.extend_from_slice(&[0, 0, 0, 255, 255, 255]);

    for frame in frames {
        let gce = GraphicsControlExtension {
            disposal: frame.disposal,
            user_input: false,
            transparent_enabled: false,
            delay: 10,
            transparent_index: 0,
        };
        out.extend_from_slice(&[0x21, 0xf9, 4]);
        out.extend_from_slice(&gce.to_bytes());
        out.push(0);

        out.push(0x2c);
        let descriptor = ImageDescriptor {
            x: frame.x,
            y: frame.y,
            width: frame.width,
            height: frame.height,
            ..Default::default()
        };
        out.extend_from_slice(&descriptor.to_bytes());
        out.push(2);
        append_subblocks(&mut out, &compress_indices(&frame.indices, 2));
    }
    out.push(0x3b);
    out
}

#[test]
fn restore_to_background_clears_the_region_for_the_next_frame() {
    let data = animated_gif(&[
        TestFrame {
            disposal: DisposalMethod::RestoreToBackground,
            x: 0,
            y: 0,
            width: 2,
            height: 2,
            indices: vec![1, 1, 1, 1],
        },
        TestFrame {
            disposal: DisposalMethod::DoNotDispose,
            x: 1,
            y: 1,
            width: 1,
            height: 1,
            indices: vec![0],
        },
    ]);

    let decoder = GifDecoder::new(&data).unwrap();
    let mut frames = decoder.frames();

    // Frame 1 paints white everywhere.
    let first = frames.next().unwrap().unwrap();
    assert_eq!(first.pixel(0, 0), [255, 255, 255, 255]);
    assert_eq!(first.pixel(1, 1), [255, 255, 255, 255]);

    // Frame 1's region is restored to background before frame 2, so only
    // frame 2's own pixel is opaque.
    let second = frames.next().unwrap().unwrap();
    assert_eq!(second.pixel(0, 0), [0, 0, 0, 0]);
    assert_eq!(second.pixel(1, 0), [0, 0, 0, 0]);
    assert_eq!(second.pixel(0, 1), [0, 0, 0, 0]);
    assert_eq!(second.pixel(1, 1), [0, 0, 0, 255]);

    assert!(frames.next().is_none());
}

#[test]
fn do_not_dispose_carries_pixels_forward() {
    let data = animated_gif(&[
        TestFrame {
            disposal: DisposalMethod::DoNotDispose,
            x: 0,
            y: 0,
            width: 2,
            height: 2,
            indices: vec![1, 1, 1, 1],
        },
        TestFrame {
            disposal: DisposalMethod::DoNotDispose,
            x: 0,
            y: 0,
            width: 1,
            height: 1,
            indices: vec![0],
        },
    ]);

    let decoder = GifDecoder::new(&data).unwrap();
    let frames: Vec<_> = decoder.frames().collect::<Result<_, _>>().unwrap();
    // Frame 2 overwrites one pixel and keeps frame 1 underneath.
    assert_eq!(frames[1].pixel(0, 0), [0, 0, 0, 255]);
    assert_eq!(frames[1].pixel(1, 0), [255, 255, 255, 255]);
    assert_eq!(frames[1].pixel(1, 1), [255, 255, 255, 255]);
}

#[test]
fn restore_to_previous_rewinds_the_carry_state() {
    let data = animated_gif(&[
        TestFrame {
            disposal: DisposalMethod::DoNotDispose,
            x: 0,
            y: 0,
            width: 2,
            height: 2,
            indices: vec![1, 1, 1, 1],
        },
        // This frame is painted but must not affect what frame 3 sees.
        TestFrame {
            disposal: DisposalMethod::RestoreToPrevious,
            x: 0,
            y: 0,
            width: 1,
            height: 1,
            indices: vec![0],
        },
        TestFrame {
            disposal: DisposalMethod::DoNotDispose,
            x: 1,
            y: 1,
            width: 1,
            height: 1,
            indices: vec![0],
        },
    ]);

    let decoder = GifDecoder::new(&data).unwrap();
    let frames: Vec<_> = decoder.frames().collect::<Result<_, _>>().unwrap();

    // Frame 2 shows its black pixel over frame 1.
    assert_eq!(frames[1].pixel(0, 0), [0, 0, 0, 255]);
    // Frame 3 starts from frame 1's state: (0,0) is white again.
    assert_eq!(frames[2].pixel(0, 0), [255, 255, 255, 255]);
    assert_eq!(frames[2].pixel(1, 1), [0, 0, 0, 255]);
}

#[test]
fn foreach_frame_visits_every_frame() {
    let palette = vec![
        zengif::ColorTableEntry::new(0, 0, 0),
        zengif::ColorTableEntry::new(255, 0, 0),
    ];
    let mut encoder = GifEncoder::new();
    for _ in 0..4 {
        let frame = IndexedFrame::from_indices(&[1, 0, 0, 1], 2, palette.clone(), 0, 0, 2, 2, None);
        encoder.add_frame(&frame, Some(5));
    }
    let bytes = encoder.finish();

    let decoder = GifDecoder::new(&bytes).unwrap();
    let mut seen = 0;
    decoder
        .foreach_frame(|canvas| {
            assert_eq!(canvas.pixel(0, 0), [255, 0, 0, 255]);
            seen += 1;
        })
        .unwrap();
    assert_eq!(seen, 4);
}

#[cfg(feature = "std")]
#[test]
fn decode_file_roundtrip() {
    let palette = vec![
        zengif::ColorTableEntry::new(1, 2, 3),
        zengif::ColorTableEntry::new(4, 5, 6),
    ];
    let frame = IndexedFrame::from_indices(&[0, 1, 1, 0], 2, palette, 0, 0, 2, 2, None);
    let mut encoder = GifEncoder::new();
    encoder.add_frame(&frame, None);

    let path = std::env::temp_dir().join("zengif_decode_file_roundtrip.gif");
    encoder.finish_to_path(&path).unwrap();

    let mut seen = 0;
    zengif::decode_file(&path, |canvas| {
        assert_eq!(canvas.pixel(0, 0), [1, 2, 3, 255]);
        assert_eq!(canvas.pixel(1, 0), [4, 5, 6, 255]);
        seen += 1;
    })
    .unwrap();
    assert_eq!(seen, 1);
    std::fs::remove_file(&path).ok();

    assert_eq!(
        zengif::decode_file("definitely/not/a/real/path.gif", |_| {}),
        Err(zengif::GifError::FileNotFound)
    );
}
