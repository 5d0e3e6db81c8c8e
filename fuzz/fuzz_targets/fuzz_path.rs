#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use wbempath::heap::FailAt;
use wbempath::{CreateMode, ObjectPath, OutputMode, PathError, WbemPath};

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

/// Pieces that steer generated input toward the path grammar.
static FRAGMENTS: &[&str] = &[
    r"\\", "//", r"\", "/", ":", ".", "root", "cimv2", "Win32_Process", r#"Name="x""#, "",
    "é", "\u{1F600}",
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if !seed.is_multiple_of(4) {
        return fuzzer_mutate(data, size, max_size);
    }

    // Keep the raw header bytes and regenerate the text from fragments.
    let header = size.min(4);
    let mut len = header;
    with_rng(|rng| {
        for _ in 0..rng.random_range(1..16) {
            let fragment = FRAGMENTS[rng.random_range(0..FRAGMENTS.len())].as_bytes();
            if len + fragment.len() > max_size {
                break;
            }
            data[len..len + fragment.len()].copy_from_slice(fragment);
            len += fragment.len();
        }
    });
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    fail_at: Option<u8>,
    flags: i32,
    text: &'a str,
}

fn check(input: &Input<'_>) {
    let mut path = WbemPath::new();

    if let Some(site) = input.fail_at {
        let mut heap = FailAt::new(usize::from(site));
        let result = path.set_text_in(CreateMode::ACCEPT_ALL, Some(input.text), &mut heap);
        if heap.tripped() {
            assert_eq!(result, Err(PathError::OutOfMemory));
            assert!(path.buffer().is_empty());
            assert_eq!(path.namespace_count(), Ok(0));
            return;
        }
        assert_eq!(result, Ok(()));
    } else {
        path.set_text(CreateMode::ACCEPT_ALL, Some(input.text))
            .expect("unbounded parse");
    }

    assert_eq!(path.buffer().text(), Some(input.text));

    for mode in OutputMode::ALL {
        let text = path.text(mode).expect("unbounded render");
        let mut capacity = 0;
        path.get_text(mode.flags(), &mut capacity, None)
            .expect("size query");
        let mut buffer = vec![0u16; capacity as usize];
        path.get_text(mode.flags(), &mut capacity, Some(&mut buffer))
            .expect("copy");
        let expected: Vec<u16> = text.unwrap_or_default().encode_utf16().chain([0]).collect();
        assert_eq!(buffer, expected);
    }

    let mut capacity = 0;
    let result = path.get_text(input.flags, &mut capacity, None);
    match OutputMode::from_flags(input.flags) {
        Some(_) => assert!(result.is_ok() && capacity > 0),
        None => assert_eq!(result, Err(PathError::InvalidParameter)),
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = arbitrary::Unstructured::new(data);
    if let Ok(input) = Input::arbitrary(&mut u) {
        check(&input);
    }
});
