//! Typed memory I/O against the simulated backend and the live process

use memory_monitor::core::types::{Address, Bitness, Platform, TextEncoding};
use memory_monitor::memory::{MemoryIO, PlatformBackend, SimulatedMemory};
use memory_monitor::process::ProcessHandle;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const BASE: Address = Address::new(0x7000_0000);

fn simulated(size: usize) -> MemoryIO<SimulatedMemory> {
    MemoryIO::new(SimulatedMemory::new(BASE, size))
}

#[test]
fn test_unmapped_reads_are_zero() {
    let io = simulated(16);
    let outside = Address::new(0x10);

    assert_eq!(io.read::<u32>(outside), 0);
    assert_eq!(io.read::<f64>(outside), 0.0);
    assert_eq!(io.read_array::<u16>(outside, 3), vec![0, 0, 0]);
    assert_eq!(io.read_pointer(outside), Address::null());
    assert_eq!(io.read_string(outside, TextEncoding::Utf16Le), "");
    assert!(io.read_string_array(outside, TextEncoding::Utf8).is_empty());
}

#[test]
fn test_writes_outside_range_fail_without_side_effects() {
    let io = simulated(8);
    assert!(!io.write(BASE.add(6), 0xFFFF_FFFFu32));
    assert!(!io.write_string(BASE, "too long for the range", TextEncoding::Ascii));
    assert_eq!(io.backend().contents(), vec![0; 8]);
}

#[test]
fn test_string_encodings() {
    let io = simulated(128);
    for encoding in [
        TextEncoding::Ascii,
        TextEncoding::Latin1,
        TextEncoding::Utf8,
        TextEncoding::Utf16Le,
        TextEncoding::Utf16Be,
    ] {
        assert!(io.write_string(BASE, "status", encoding), "{}", encoding);
        assert_eq!(io.read_string_bounded(BASE, encoding, 64), "status", "{}", encoding);
    }
}

#[test]
fn test_string_array_round_trip() {
    let io = simulated(256);
    let names = ["alpha", "beta", "gamma"];
    assert!(io.write_string_array(BASE, &names, TextEncoding::Utf16Le));
    assert_eq!(
        io.read_string_array_bounded(BASE, TextEncoding::Utf16Le, 64),
        vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()]
    );
}

#[test]
fn test_pointer_chain_across_bitness() {
    for bitness in [Bitness::Bit32, Bitness::Bit64] {
        let io = MemoryIO::new(SimulatedMemory::new(BASE, 64).with_bitness(bitness));
        let target = BASE.add(0x20);
        match bitness {
            Bitness::Bit32 => assert!(io.write(BASE, target.as_usize() as u32)),
            Bitness::Bit64 => assert!(io.write(BASE, target.as_usize() as u64)),
        }
        assert!(io.write(target.add(4), 77i16));

        let resolved = io.read_pointer(BASE).offset(4);
        assert_eq!(io.read::<i16>(resolved), 77);
        assert_eq!(io.bitness(), bitness);
        assert_eq!(io.is_64bit(), bitness.is_64bit());
    }
}

#[test]
fn test_pointer_keeps_high_bits_of_64bit_target() {
    let io = MemoryIO::new(SimulatedMemory::new(BASE, 8).with_bitness(Bitness::Bit64));
    let raw = 0x0000_7FFE_DEAD_BEEFu64;
    assert!(io.write(BASE, raw));

    #[cfg(target_pointer_width = "64")]
    assert_eq!(io.read_pointer(BASE).as_u64(), raw);

    // a 32-bit host cannot hold the pointer, so it reads as null
    #[cfg(target_pointer_width = "32")]
    assert!(io.read_pointer(BASE).is_null());
}

#[test]
fn test_simulated_platform_identity() {
    let io = simulated(4);
    assert_eq!(io.platform(), Platform::Simulated);
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_live_process_round_trip() {
    let io = MemoryIO::for_process(ProcessHandle::current());
    assert_eq!(Some(io.platform()), Platform::host());
    assert_eq!(io.bitness(), Bitness::host());

    let mut cell = Box::new([0u32; 4]);
    let address = Address::new(cell.as_mut_ptr() as usize);

    assert!(io.write_array(address, &[10u32, 20, 30, 40]));
    assert_eq!(io.read_array::<u32>(address, 4), vec![10, 20, 30, 40]);
    assert!(io.write(address.add(4), 99u32));
    assert_eq!(io.read::<u32>(address.add(4)), 99);

    // keep the writes observable through the original allocation
    assert_eq!(std::hint::black_box(&cell)[1], 99);
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_live_process_invalid_address() {
    let io = MemoryIO::new(PlatformBackend::for_process(ProcessHandle::current()));
    assert_eq!(io.read::<u64>(Address::new(0x8)), 0);
    assert!(!io.write(Address::new(0x8), 1u64));
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_live_process_pointer_read() {
    let io = MemoryIO::for_process(ProcessHandle::current());
    let value = Box::new(0x5A5Au16);
    let pointer = Box::new(&*value as *const u16 as usize);

    let resolved = io.read_pointer(Address::new(&*pointer as *const usize as usize));
    assert_eq!(resolved, Address::new(&*value as *const u16 as usize));
    assert_eq!(io.read::<u16>(resolved), 0x5A5A);
}

proptest! {
    #[test]
    fn prop_integer_round_trip(value: i64, offset in 0usize..56) {
        let io = simulated(64);
        prop_assert!(io.write(BASE.add(offset), value));
        prop_assert_eq!(io.read::<i64>(BASE.add(offset)), value);
    }

    #[test]
    fn prop_float_round_trip_is_bit_exact(bits: u64) {
        let io = simulated(8);
        let value = f64::from_bits(bits);
        prop_assert!(io.write(BASE, value));
        prop_assert_eq!(io.read::<f64>(BASE).to_bits(), bits);
    }

    #[test]
    fn prop_array_round_trip(values in proptest::collection::vec(any::<u32>(), 0..16)) {
        let io = simulated(64);
        prop_assert!(io.write_array(BASE, &values));
        prop_assert_eq!(io.read_array::<u32>(BASE, values.len()), values);
    }

    #[test]
    fn prop_utf8_string_round_trip(text in "[a-zA-Z0-9 ]{0,40}") {
        let io = simulated(64);
        prop_assert!(io.write_string(BASE, &text, TextEncoding::Utf8));
        prop_assert_eq!(io.read_string_bounded(BASE, TextEncoding::Utf8, 64), text);
    }
}
