//! Deflated data set adapter, accessed through the registry.
#![cfg(feature = "deflate")]

use dcmio_encoding::transfer_syntax::{DataRWAdapter, FinishWrite};
use dcmio_encoding::TransferSyntaxIndex;
use dcmio_transfer_syntax_registry::TransferSyntaxRegistry;
use std::io::{Read, Write};

const DEFLATED: &str = "1.2.840.10008.1.2.1.99";

#[test]
fn deflated_stream_round_trip() {
    let ts = TransferSyntaxRegistry.get(DEFLATED).unwrap();
    assert!(ts.is_deflated());
    let adapter = ts.data_adapter().expect("deflate adapter");

    let payload: Vec<u8> = (0..4096).map(|i| (i % 13) as u8).collect();
    let mut compressed = Vec::new();
    {
        let mut writer = adapter.adapt_writer(Box::new(&mut compressed));
        writer.write_all(&payload).unwrap();
        writer.finish().unwrap();
    }
    assert!(compressed.len() < payload.len());
    // raw deflate, not zlib
    assert_ne!(&compressed[..2], &[0x78, 0x9C]);

    let mut reader = adapter.adapt_reader(Box::new(&compressed[..]));
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out, payload);
}

#[test]
fn zlib_wrapped_stream_is_accepted() {
    let payload = b"\x08\x00\x05\x00CS\x0a\x00ISO_IR 100".to_vec();
    let mut encoder =
        flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&payload).unwrap();
    let compressed = encoder.finish().unwrap();
    assert_eq!(&compressed[..2], &[0x78, 0x9C]);

    let ts = TransferSyntaxRegistry.get(DEFLATED).unwrap();
    let adapter = ts.data_adapter().unwrap();
    let mut reader = adapter.adapt_reader(Box::new(&compressed[..]));
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert_eq!(out, payload);
}
