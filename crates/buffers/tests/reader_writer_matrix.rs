//! Writer/Reader roundtrip matrix for the buffers crate.

use blueprint_pack_buffers::{BufferError, Reader, Writer};

#[test]
fn roundtrip_integers() {
    let mut w = Writer::new();
    w.u8(0xFF);
    w.u32(u32::MAX);
    w.i32(i32::MIN);
    w.u64(u64::MAX);
    w.i64(i64::MIN);
    let data = w.flush();
    assert_eq!(data.len(), 1 + 4 + 4 + 8 + 8);

    let mut r = Reader::new(&data);
    assert_eq!(r.u8(), Ok(0xFF));
    assert_eq!(r.u32(), Ok(u32::MAX));
    assert_eq!(r.i32(), Ok(i32::MIN));
    assert_eq!(r.u64(), Ok(u64::MAX));
    assert_eq!(r.i64(), Ok(i64::MIN));
    assert_eq!(r.size(), 0);
}

#[test]
fn roundtrip_floats_bit_exact() {
    let floats = [0.0f32, -0.0, 1.5, f32::MIN_POSITIVE, f32::MAX, f32::NAN, f32::INFINITY];
    let doubles = [0.1f64, -0.0, f64::EPSILON, f64::NEG_INFINITY];
    let mut w = Writer::new();
    for f in floats {
        w.f32(f);
    }
    for d in doubles {
        w.f64(d);
    }
    let data = w.flush();
    let mut r = Reader::new(&data);
    for f in floats {
        assert_eq!(r.f32().unwrap().to_bits(), f.to_bits());
    }
    for d in doubles {
        assert_eq!(r.f64().unwrap().to_bits(), d.to_bits());
    }
}

#[test]
fn little_endian_layout() {
    let mut w = Writer::new();
    w.i32(0x0403_0201);
    assert_eq!(w.flush(), vec![0x01, 0x02, 0x03, 0x04]);
}

#[test]
fn reader_at_and_array() {
    let data = [9u8, 1, 2, 3, 4];
    let mut r = Reader::at(&data, 1).unwrap();
    assert_eq!(r.array::<4>(), Ok([1, 2, 3, 4]));
    assert!(matches!(
        Reader::at(&data, 6),
        Err(BufferError::OutOfRange { offset: 6, len: 5 })
    ));
}

#[test]
fn short_read_at_end_of_slice() {
    let data = [1u8, 2, 3, 4, 5, 6];
    let mut r = Reader::at(&data, 4).unwrap();
    assert_eq!(r.size(), 2);
    assert_eq!(
        r.u32(),
        Err(BufferError::EndOfBuffer {
            offset: 4,
            needed: 4,
            available: 2,
        })
    );
    assert_eq!(r.u8(), Ok(5));
}

#[test]
fn buffer_error_display_mentions_offset() {
    let err = BufferError::EndOfBuffer {
        offset: 16,
        needed: 4,
        available: 1,
    };
    assert_eq!(err.offset(), 16);
    assert!(err.to_string().contains("offset 16"));
}
