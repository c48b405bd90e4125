// Byte-exact checks of the emitted frame and raw-block containers.

mod common;

use common::{compress_bytes, pseudo_random};
use lz4opt::format::{BLOCK_HEADER_SIZE, FRAME_HEADER_SIZE};
use lz4opt::xxhash::xxh32_oneshot;
use lz4opt::{Settings, Status};

#[test]
fn empty_input_frame_bytes() {
    // Empty input reduces the block-max code to 4 (64 KiB): descriptor bytes
    // 40 40, whose computed checksum byte is C0, then the 4-zero footer.
    let out = compress_bytes(&[], &Settings::default());
    assert_eq!(
        out,
        [0x04, 0x22, 0x4D, 0x18, 0x40, 0x40, 0xC0, 0x00, 0x00, 0x00, 0x00]
    );
}

#[test]
fn header_checksum_byte_is_computed_from_descriptor() {
    // A 200 KiB input reduces to code 5 (256 KiB); the checksum byte must
    // equal the XXH32-derived value for the emitted descriptor.
    let data = pseudo_random(11, 200 * 1024);
    let out = compress_bytes(&data, &Settings::default());
    assert_eq!(&out[..4], &[0x04, 0x22, 0x4D, 0x18]);
    assert_eq!(out[4], 0x40);
    assert_eq!(out[5], 5 << 4);
    let expected = ((xxh32_oneshot(&out[4..6], 0) >> 8) & 0xFF) as u8;
    assert_eq!(out[6], expected);
}

#[test]
fn independent_mode_sets_flag_bit() {
    let settings = Settings {
        independent_blocks: true,
        ..Settings::default()
    };
    let out = compress_bytes(b"independent", &settings);
    assert_eq!(out[4], 0x60);
    let expected = ((xxh32_oneshot(&out[4..6], 0) >> 8) & 0xFF) as u8;
    assert_eq!(out[6], expected);
}

#[test]
fn frame_ends_with_zero_terminator() {
    let data = vec![b'f'; 1000];
    let out = compress_bytes(&data, &Settings::default());
    assert_eq!(&out[out.len() - 4..], &[0, 0, 0, 0]);
}

#[test]
fn raw_mode_has_no_frame_header() {
    let data = vec![0u8; 100];
    let settings = Settings {
        raw_block: true,
        ..Settings::default()
    };
    let out = compress_bytes(&data, &settings);
    // First byte is a block token, not the frame magic; stream ends with the
    // 2-byte end marker.
    assert_ne!(&out[..4], &[0x04, 0x22, 0x4D, 0x18]);
    assert_eq!(&out[out.len() - 2..], &[0, 0]);
}

#[test]
fn block_headers_carry_payload_sizes() {
    // Two dependent 64 KiB blocks; walk the block headers and confirm they
    // chain exactly to the frame terminator.
    let data: Vec<u8> = b"walkable ".iter().cycle().take(100_000).copied().collect();
    let settings = Settings {
        block_max_code: 4,
        ..Settings::default()
    };
    let out = compress_bytes(&data, &settings);

    let mut pos = FRAME_HEADER_SIZE;
    let mut blocks = 0;
    loop {
        let value = u32::from_le_bytes([out[pos], out[pos + 1], out[pos + 2], out[pos + 3]]);
        pos += BLOCK_HEADER_SIZE;
        let size = (value & 0x7FFF_FFFF) as usize;
        if size == 0 {
            break;
        }
        pos += size;
        blocks += 1;
    }
    assert_eq!(blocks, 2);
    assert_eq!(pos, out.len(), "terminator must be the last 4 bytes");
}

#[test]
fn decoder_accepts_all_block_codes() {
    // Hand-build an empty frame for each code; the decoder must accept every
    // one of them and produce empty output.
    for code in 4..=7u8 {
        let mut frame = vec![0x04, 0x22, 0x4D, 0x18, 0x40, code << 4, 0];
        frame[6] = ((xxh32_oneshot(&frame[4..6], 0) >> 8) & 0xFF) as u8;
        frame.extend_from_slice(&[0, 0, 0, 0]);

        let mut src = &frame[..];
        let mut out = Vec::new();
        lz4opt::decompress_stream(&mut src, &mut out, None, &Settings::default()).unwrap();
        assert!(out.is_empty());
    }
}

#[test]
fn truncated_stream_after_header_yields_empty_output() {
    // Header but no terminator: the driver stops at EOF without error, like
    // a stream whose writer died; nothing has been decoded.
    let mut frame = vec![0x04u8, 0x22, 0x4D, 0x18, 0x40, 0x40, 0];
    frame[6] = ((xxh32_oneshot(&frame[4..6], 0) >> 8) & 0xFF) as u8;

    let mut src = &frame[..];
    let mut out = Vec::new();
    let stats = lz4opt::decompress_stream(&mut src, &mut out, None, &Settings::default()).unwrap();
    assert_eq!(stats.original_size, 0);
    assert!(out.is_empty());
}

#[test]
fn garbage_stream_is_rejected() {
    let garbage = pseudo_random(99, 64);
    let mut src = &garbage[..];
    let mut out = Vec::new();
    let err =
        lz4opt::decompress_stream(&mut src, &mut out, None, &Settings::default()).unwrap_err();
    assert!(matches!(err, Status::Format | Status::Checksum));
}
