// End-to-end searches through the public API.

use hash_cracker::{
    hex_digest, run_search, Algorithm, BruteForce, Cracker, Keyspace, SearchResult, TargetSet,
    Wordlist,
};
use std::collections::BTreeSet;

fn targets_of(words: &[(Algorithm, &str)]) -> TargetSet {
    TargetSet::parse(
        words
            .iter()
            .map(|(algo, word)| hex_digest(*algo, word.as_bytes())),
    )
    .unwrap()
}

fn found_set(result: &SearchResult) -> BTreeSet<String> {
    result
        .matches
        .iter()
        .map(|report| report.candidate.clone())
        .collect()
}

#[test]
fn finds_zebra_in_the_full_keyspace() {
    let targets = targets_of(&[(Algorithm::Sha256, "zebra")]);

    let result = run_search(&targets, 4).unwrap();

    assert_eq!(result.matches.len(), 1);
    let report = &result.matches[0];
    assert_eq!(report.candidate, "zebra");
    // "zebra" sits in the last quarter of the keyspace
    assert_eq!(report.worker_id, 3);
    assert!(report.elapsed <= result.elapsed);

    assert_eq!(result.keyspace_size, 26u64.pow(5));
    assert_eq!(result.candidates_tried(), 11_881_376);
    assert_eq!(result.workers.len(), 4);
    assert!(!result.stopped_early);
}

#[test]
fn no_match_after_full_sweep() {
    // 8 letters, out of reach of a 5 letters keyspace
    let targets = targets_of(&[
        (Algorithm::Sha256, "password"),
        (Algorithm::Md5, "password"),
    ]);

    let result = run_search(&targets, 3).unwrap();

    assert!(result.matches.is_empty());
    assert!(result.is_exhaustive());
    assert_eq!(result.candidates_tried(), 26u64.pow(5));
    assert!(result.elapsed > std::time::Duration::ZERO);
}

#[test]
fn mixed_algorithms_in_one_search() {
    let keyspace = BruteForce::new("abcdefghijklmnopqrstuvwxyz", 4).unwrap();
    let targets = targets_of(&[
        (Algorithm::Md5, "kiwi"),
        (Algorithm::Sha256, "pear"),
        (Algorithm::Sha256, "lime"),
    ]);

    let result = Cracker::new(4)
        .unwrap()
        .run(&keyspace, &targets, |_| {})
        .unwrap();

    let expected: BTreeSet<String> = ["kiwi", "lime", "pear"]
        .iter()
        .map(|word| word.to_string())
        .collect();
    assert_eq!(found_set(&result), expected);
}

#[test]
fn repeated_runs_find_the_same_set() {
    let keyspace = BruteForce::new("abcdefghijklmnopqrstuvwxyz", 3).unwrap();
    let targets = targets_of(&[
        (Algorithm::Sha256, "cat"),
        (Algorithm::Sha256, "dog"),
        (Algorithm::Md5, "owl"),
        (Algorithm::Md5, "zzz"),
    ]);
    let cracker = Cracker::new(4).unwrap();

    let first = found_set(&cracker.run(&keyspace, &targets, |_| {}).unwrap());
    for _ in 0..3 {
        let again = found_set(&cracker.run(&keyspace, &targets, |_| {}).unwrap());
        assert_eq!(again, first);
    }
    assert_eq!(first.len(), 4);
}

#[test]
fn worker_count_does_not_change_the_matches() {
    let keyspace = BruteForce::new("abcdefghijklmnopqrstuvwxyz", 3).unwrap();
    let targets = targets_of(&[
        (Algorithm::Sha256, "aaa"),
        (Algorithm::Sha256, "fox"),
        (Algorithm::Md5, "bee"),
        (Algorithm::Md5, "zzz"),
    ]);

    let reference = found_set(
        &Cracker::new(1)
            .unwrap()
            .run(&keyspace, &targets, |_| {})
            .unwrap(),
    );

    for workers in [2, 3, 5, 8, 13, 26] {
        let result = Cracker::new(workers)
            .unwrap()
            .run(&keyspace, &targets, |_| {})
            .unwrap();
        assert_eq!(found_set(&result), reference, "{} workers", workers);
        assert_eq!(result.candidates_tried(), keyspace.len());
        assert_eq!(result.matches.len(), reference.len());
    }
}

#[test]
fn partitions_reported_by_workers_tile_the_keyspace() {
    let keyspace = BruteForce::new("abcdefg", 4).unwrap();
    let targets = targets_of(&[(Algorithm::Sha256, "gfed")]);

    let result = Cracker::new(6)
        .unwrap()
        .run(&keyspace, &targets, |_| {})
        .unwrap();

    let mut next = 0;
    for worker in &result.workers {
        assert_eq!(worker.partition.start, next);
        assert_eq!(worker.tried, worker.partition.len());
        next = worker.partition.end;
    }
    assert_eq!(next, keyspace.len());
}

#[test]
fn zero_workers_is_a_configuration_error() {
    let targets = targets_of(&[(Algorithm::Sha256, "zebra")]);
    assert!(matches!(
        run_search(&targets, 0),
        Err(hash_cracker::Error::InvalidWorkerCount(0))
    ));
}

#[test]
fn dictionary_search() {
    let wordlist = Wordlist::new(
        "admin123\npassword\n123456\npassword1\nletmein\n"
            .lines()
            .map(String::from)
            .collect(),
    )
    .unwrap();
    let targets = targets_of(&[(Algorithm::Sha256, "letmein"), (Algorithm::Md5, "123456")]);

    let result = Cracker::new(2)
        .unwrap()
        .run(&wordlist, &targets, |_| {})
        .unwrap();

    let expected: BTreeSet<String> = ["123456", "letmein"]
        .iter()
        .map(|word| word.to_string())
        .collect();
    assert_eq!(found_set(&result), expected);
}
