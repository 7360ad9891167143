use rand::Rng;
use tandemsort::prelude::*;

#[test]
fn test_basic_sort_with_tags() {
    let mut keys = vec![5, 3, 3, 1, 4];
    let mut tags = vec!["a", "b", "c", "d", "e"];

    tandemsort_with(&mut keys, &mut tags, 0, 5).unwrap();

    assert_eq!(keys, vec![1, 3, 3, 4, 5]);
    // The duplicate 3s were tagged "b" then "c"; stability keeps that order.
    assert_eq!(tags, vec!["d", "b", "c", "e", "a"]);
}

#[test]
fn test_presorted_input_is_one_run() {
    let mut keys: Vec<u32> = (0..1000).collect();
    let original = keys.clone();

    let stats = tandemsort(&mut keys, 0, 1000).unwrap();

    assert_eq!(keys, original);
    assert_eq!(stats.runs, 1);
    assert_eq!(stats.merges, 0);
    assert_eq!(stats.gallops, 0);
}

#[test]
fn test_reverse_sorted_input_is_one_reversal() {
    let mut keys: Vec<u32> = (0..50).rev().collect();
    let mut payload: Vec<usize> = (0..50).collect();

    let stats = tandemsort_with(&mut keys, &mut payload, 0, 50).unwrap();

    assert_eq!(keys, (0..50).collect::<Vec<u32>>());
    assert_eq!(payload, (0..50).rev().collect::<Vec<usize>>());
    assert_eq!(stats.runs, 1);
    assert_eq!(stats.reversed_runs, 1);
    assert_eq!(stats.merges, 0);
}

#[test]
fn test_gallop_mode_triggers_on_block_interleaved_runs() {
    // Two long ascending runs whose value blocks interleave: merging them
    // hands one side hundreds of consecutive wins, which must engage
    // galloping mode.
    let mut keys: Vec<u32> = (0..256)
        .chain(512..768)
        .chain(256..512)
        .chain(768..1024)
        .collect();
    let original = keys.clone();
    let mut payload: Vec<usize> = (0..1024).collect();

    let stats = tandemsort_with(&mut keys, &mut payload, 0, 1024).unwrap();

    assert_eq!(keys, (0..1024).collect::<Vec<u32>>());
    assert_eq!(stats.runs, 2);
    assert!(stats.gallops > 0, "merge never entered galloping mode");
    // Lockstep: each payload entry still indexes its original key.
    for i in 0..1024 {
        assert_eq!(keys[i], original[payload[i]]);
    }
}

#[test]
fn test_stability_with_duplicate_keys() {
    // Eight distinct keys, each repeated many times, scattered through the
    // input. Payloads record input order; equal keys must keep it.
    let mut keys: Vec<u32> = (0u64..4096).map(|i| (i * 2654435761 % 8) as u32).collect();
    let mut payload: Vec<usize> = (0..4096).collect();

    tandemsort_with(&mut keys, &mut payload, 0, 4096).unwrap();

    for w in payload.windows(2).zip(keys.windows(2)) {
        let (p, k) = w;
        if k[0] == k[1] {
            assert!(p[0] < p[1], "equal keys reordered: {:?} {:?}", p, k);
        }
    }
}

#[test]
fn test_multi_column_lockstep() {
    let mut keys = vec![4u64, 2, 9, 2, 7];
    let mut ids = vec![40u32, 20, 90, 21, 70];
    let mut names = vec![
        "forty".to_string(),
        "twenty".to_string(),
        "ninety".to_string(),
        "twenty-one".to_string(),
        "seventy".to_string(),
    ];

    tandemsort_with(&mut keys, &mut (&mut ids[..], &mut names[..]), 0, 5).unwrap();

    assert_eq!(keys, vec![2, 2, 4, 7, 9]);
    assert_eq!(ids, vec![20, 21, 40, 70, 90]);
    assert_eq!(names, vec!["twenty", "twenty-one", "forty", "seventy", "ninety"]);
}

#[test]
fn test_subrange_leaves_rest_untouched() {
    let mut keys = vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0];
    let mut payload: Vec<usize> = (0..10).collect();

    tandemsort_with(&mut keys, &mut payload, 3, 7).unwrap();

    assert_eq!(keys, vec![9, 8, 7, 3, 4, 5, 6, 2, 1, 0]);
    assert_eq!(payload, vec![0, 1, 2, 6, 5, 4, 3, 7, 8, 9]);
}

#[test]
fn test_empty_and_single_ranges() {
    let mut keys = vec![3, 1, 2];

    let stats = tandemsort(&mut keys, 1, 1).unwrap();
    assert_eq!(keys, vec![3, 1, 2]);
    assert_eq!(stats.runs, 0);

    tandemsort(&mut keys, 0, 1).unwrap();
    assert_eq!(keys, vec![3, 1, 2]);

    let mut empty: Vec<u32> = vec![];
    tandemsort(&mut empty, 0, 0).unwrap();
    assert!(empty.is_empty());
}

#[test]
fn test_all_equal_keys() {
    let mut keys = vec![7u32; 500];
    let mut payload: Vec<usize> = (0..500).collect();

    tandemsort_with(&mut keys, &mut payload, 0, 500).unwrap();

    assert_eq!(keys, vec![7u32; 500]);
    // One giant ascending run of equal keys; nothing may move.
    assert_eq!(payload, (0..500).collect::<Vec<usize>>());
}

#[test]
fn test_invalid_range_is_rejected_before_mutation() {
    let mut keys = vec![3, 1, 2];

    let err = tandemsort(&mut keys, 2, 1).unwrap_err();
    assert_eq!(err, SortError::InvalidRange { lo: 2, hi: 1, len: 3 });

    let err = tandemsort(&mut keys, 0, 4).unwrap_err();
    assert_eq!(err, SortError::InvalidRange { lo: 0, hi: 4, len: 3 });

    assert_eq!(keys, vec![3, 1, 2]);
}

#[test]
fn test_satellite_length_mismatch_is_rejected() {
    let mut keys = vec![3, 1, 2, 0];
    let mut tags = vec!["a", "b", "c"];

    let err = tandemsort_with(&mut keys, &mut tags, 0, 4).unwrap_err();
    assert_eq!(
        err,
        SortError::SatelliteLength {
            expected: 4,
            found: 3
        }
    );
    assert_eq!(keys, vec![3, 1, 2, 0]);
    assert_eq!(tags, vec!["a", "b", "c"]);
}

#[test]
fn test_comparator_variant_sorts_descending() {
    let mut keys = vec![1u32, 4, 2, 5, 3];
    let mut payload = vec!["one", "four", "two", "five", "three"];

    tandemsort_with_by(&mut keys, &mut payload, 0, 5, |a, b| b.cmp(a)).unwrap();

    assert_eq!(keys, vec![5, 4, 3, 2, 1]);
    assert_eq!(payload, vec!["five", "four", "three", "two", "one"]);
}

#[test]
fn test_resort_is_idempotent() {
    let mut rng = rand::rng();
    let mut keys: Vec<u64> = (0..2048).map(|_| rng.random_range(0..512)).collect();
    let mut payload: Vec<usize> = (0..2048).collect();

    tandemsort_with(&mut keys, &mut payload, 0, 2048).unwrap();
    let keys_once = keys.clone();
    let payload_once = payload.clone();

    let stats = tandemsort_with(&mut keys, &mut payload, 0, 2048).unwrap();

    assert_eq!(keys, keys_once);
    assert_eq!(payload, payload_once);
    assert_eq!(stats.runs, 1);
    assert_eq!(stats.merges, 0);
}

#[test]
fn test_fuzz_random_against_std() {
    let mut rng = rand::rng();

    for _ in 0..200 {
        let len = rng.random_range(0..600);
        let keys: Vec<u16> = (0..len).map(|_| rng.random_range(0..64)).collect();

        let mut expected: Vec<(u16, usize)> =
            keys.iter().copied().zip(0..len).collect();
        expected.sort_by_key(|row| row.0);

        let mut sorted_keys = keys.clone();
        let mut payload: Vec<usize> = (0..len).collect();
        tandemsort_with(&mut sorted_keys, &mut payload, 0, len).unwrap();

        let actual: Vec<(u16, usize)> =
            sorted_keys.into_iter().zip(payload).collect();
        assert_eq!(actual, expected, "len={}", len);
    }
}

#[test]
fn test_fuzz_random_large() {
    let mut rng = rand::rng();

    // Fewer iterations of merge-heavy sizes to exercise the collapse policy.
    for _ in 0..20 {
        let len = rng.random_range(2_000..10_000);
        let keys: Vec<u64> = (0..len).map(|_| rng.random::<u64>()).collect();

        let mut expected: Vec<(u64, usize)> =
            keys.iter().copied().zip(0..len).collect();
        expected.sort_by_key(|row| row.0);

        let mut sorted_keys = keys.clone();
        let mut payload: Vec<usize> = (0..len).collect();
        tandemsort_with(&mut sorted_keys, &mut payload, 0, len).unwrap();

        let actual: Vec<(u64, usize)> =
            sorted_keys.into_iter().zip(payload).collect();
        assert_eq!(actual, expected, "len={}", len);
    }
}
