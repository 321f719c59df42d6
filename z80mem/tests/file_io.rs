use std::fs;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;
use z80mem::{Memory, MemoryError};

type Rom = Memory<0x0000, 0x3FFF>;

#[test]
fn save_then_load_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rom.bin");

    let rom = Rom::random_with(StdRng::seed_from_u64(0x280));
    rom.save(&path).unwrap();
    assert_eq!(fs::read(&path).unwrap(), rom.as_slice());

    let copy = Rom::from_file(&path).unwrap();
    assert_eq!(copy.as_slice(), rom.as_slice());
}

#[test]
fn save_range_into_smaller_block() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("span.bin");

    let mut ram = Memory::<0x8000, 0x80FF>::filled(0x00);
    for address in 0x8040..0x8048 {
        ram.write(address, address as u8).unwrap();
    }
    ram.save_range(&path, 0x8040..0x8048).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), 8);

    let span = Memory::<0x2000, 0x2007>::from_file(&path).unwrap();
    assert_eq!(span.as_slice(), &ram.as_slice()[0x40..0x48]);
    assert_eq!(span.read(0x2000).unwrap(), 0x40);
}

#[test]
fn load_ignores_trailing_bytes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("long.bin");
    fs::write(&path, (0..=255u8).collect::<Vec<_>>()).unwrap();

    let mut memory = Memory::<0x1000, 0x100F>::filled(0xFF);
    memory.load(&path).unwrap();
    assert_eq!(memory.as_slice(), (0..16u8).collect::<Vec<_>>().as_slice());
}

#[test]
fn load_short_file_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("short.bin");
    fs::write(&path, [0xAAu8; 15]).unwrap();

    let err = Memory::<0x1000, 0x100F>::from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        MemoryError::SizeMismatch {
            file_size: 15,
            memory_size: 16,
            ..
        }
    ));

    let mut memory = Memory::<0x1000, 0x100F>::filled(0x11);
    assert!(memory.load(&path).is_err());
    assert!(memory.as_slice().iter().all(|&b| b == 0x11));
}

#[test]
fn load_missing_file_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.bin");

    let err = Rom::from_file(&path).unwrap_err();
    assert!(matches!(err, MemoryError::NotFound { path: p } if p == path));
}

#[test]
fn save_refuses_to_overwrite() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("existing.bin");
    fs::write(&path, b"keep me").unwrap();

    let memory = Memory::<0x1000, 0x100F>::filled(0x00);
    let err = memory.save(&path).unwrap_err();
    assert!(matches!(err, MemoryError::AlreadyExists { .. }));
    assert_eq!(fs::read(&path).unwrap(), b"keep me");
}

#[test]
fn save_overflow_writes_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("overflow.bin");

    let memory = Memory::<0x1000, 0x100F>::filled(0x00);
    let err = memory.save_range(&path, 0x1000..0x1011).unwrap_err();
    assert!(matches!(
        err,
        MemoryError::Overflow {
            operation: "save",
            requested: 17,
            size: 16
        }
    ));
    assert!(!path.exists());
}

#[test]
fn error_messages_name_the_values() {
    let memory = Memory::<0x1000, 0x100F>::filled(0x00);
    assert_eq!(
        memory.read(0x2000).unwrap_err().to_string(),
        "address $2000 outside memory window $1000-$100F"
    );
    assert_eq!(
        memory.dump_range(0x1000..0x1020).unwrap_err().to_string(),
        "memory overflow: requested dump size 32 bytes larger than memory size 16 bytes"
    );
}
