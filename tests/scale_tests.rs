use rand::Rng;
use std::time::Instant;
use tandemsort::prelude::*;

#[test]
fn test_sort_1m_rows() {
    let count = 1_000_000;
    println!("Generating {} random rows...", count);

    let mut rng = rand::rng();
    let mut keys: Vec<u64> = Vec::with_capacity(count);
    for _ in 0..count {
        keys.push(rng.random::<u64>());
    }
    let original = keys.clone();
    let mut payload: Vec<u32> = (0..count as u32).collect();

    println!("Sorting {} rows...", count);
    let start = Instant::now();
    let stats = tandemsort_with(&mut keys, &mut payload, 0, count).unwrap();
    let duration = start.elapsed();
    println!(
        "Sorted 1M rows in {:?} ({} runs, {} merges, {} gallops)",
        duration, stats.runs, stats.merges, stats.gallops
    );

    // limited verification to save time
    for i in 0..count - 1 {
        assert!(keys[i] <= keys[i + 1], "Sort failed at index {}", i);
    }
    // sampled lockstep check: each payload entry still indexes its key
    for i in (0..count).step_by(997) {
        assert_eq!(keys[i], original[payload[i] as usize]);
    }
}

#[test]
#[ignore]
fn test_sort_50m_rows() {
    // WARNING: this test wants a few GB of RAM.
    // 50M rows * (8 bytes key + 4 bytes payload) = ~600MB live data, plus the
    // pristine key copy kept for the lockstep check.
    let count = 50_000_000;
    println!("Generating {} random rows... (expect high RAM usage)", count);

    let mut rng = rand::rng();
    let mut keys: Vec<u64> = Vec::with_capacity(count);
    for _ in 0..count {
        keys.push(rng.random::<u64>());
    }
    let original = keys.clone();
    let mut payload: Vec<u32> = (0..count as u32).collect();

    println!("Sorting {} rows...", count);
    let start = Instant::now();
    let stats = tandemsort_with(&mut keys, &mut payload, 0, count).unwrap();
    let duration = start.elapsed();
    println!(
        "Sorted 50M rows in {:?} ({} merges, {} gallops)",
        duration, stats.merges, stats.gallops
    );

    // Verify sample
    for i in (0..count - 1).step_by(10_000) {
        assert!(keys[i] <= keys[i + 1], "Sort failed at index {}", i);
        assert_eq!(keys[i], original[payload[i] as usize]);
    }
}
