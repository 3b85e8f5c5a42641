use pwm_scan::error::MotifError;
use pwm_scan::fasta::reverse_complement;
use pwm_scan::{load_matrix, BindingSiteHit, MotifScanner, DEFAULT_THRESHOLD};
use rstest::{fixture, rstest};
use std::io::Write;
use tempfile::NamedTempFile;

/// a=[1,0] c=[0,1] g=[0,0] t=[0,0]
#[fixture]
fn pair_scanner() -> MotifScanner {
    MotifScanner::new(load_matrix("tests/data/pwm.txt").unwrap())
}

/// a=[2,0,1] c=[-1,3,0] g=[0,-2,2] t=[1,1,-1]
#[fixture]
fn triple_scanner() -> MotifScanner {
    MotifScanner::new(load_matrix("tests/data/pwm3.txt").unwrap())
}

fn scanner_from(content: &str) -> MotifScanner {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    MotifScanner::new(load_matrix(file.path()).unwrap())
}

fn offsets(hits: &[BindingSiteHit]) -> Vec<usize> {
    hits.iter().map(|h| h.offset).collect()
}

#[rstest]
fn test_find_stops_before_last_window(pair_scanner: MotifScanner) {
    // "ac" at offset 2 would score e^2 but is never scanned
    let hits = pair_scanner.find("acac", 1.0).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].offset, 0);
    assert!((hits[0].score - 2f64.exp()).abs() < 1e-12);
}

#[rstest]
fn test_score_forward_strand_wins(triple_scanner: MotifScanner) {
    // forward 2 + 3 + 2 = 7, reverse complement "cgt" -1 - 2 - 1 = -4
    assert_eq!(triple_scanner.score("acg").unwrap(), 7f64.exp());
}

#[rstest]
fn test_score_reverse_strand_wins(triple_scanner: MotifScanner) {
    // forward 1 + 1 - 1 = 1, reverse complement "aaa" 2 + 0 + 1 = 3
    assert_eq!(triple_scanner.score("ttt").unwrap(), 3f64.exp());
    // forward "cgt" is -4, its reverse complement "acg" is 7
    assert_eq!(triple_scanner.score("CGT").unwrap(), 7f64.exp());
}

#[rstest]
fn test_score_matches_both_strand_sums(triple_scanner: MotifScanner) {
    let table = triple_scanner.table();
    let strand_sum = |window: &str| -> i64 {
        window
            .chars()
            .enumerate()
            .map(|(pos, symbol)| table.weight(symbol, pos).unwrap())
            .sum()
    };

    for window in ["aaa", "acg", "gtc", "TTA", "cGa", "tgc", "ggg"] {
        let forward = strand_sum(window);
        let reverse = strand_sum(&reverse_complement(window).unwrap());
        let expected = (forward.max(reverse) as f64).exp();
        assert_eq!(triple_scanner.score(window).unwrap(), expected, "{}", window);
    }
}

#[rstest]
fn test_score_is_case_insensitive(triple_scanner: MotifScanner) {
    assert_eq!(
        triple_scanner.score("GaT").unwrap(),
        triple_scanner.score("gat").unwrap()
    );
}

#[rstest]
fn test_score_is_deterministic(triple_scanner: MotifScanner) {
    let first = triple_scanner.score("gca").unwrap();
    for _ in 0..10 {
        assert_eq!(triple_scanner.score("gca").unwrap(), first);
    }
}

#[rstest]
#[case("")]
#[case("a")]
#[case("acg")]
#[case("acgtacgt")]
fn test_score_rejects_wrong_length(pair_scanner: MotifScanner, #[case] window: &str) {
    let result = pair_scanner.score(window);
    assert!(matches!(
        result,
        Err(MotifError::InvalidLength { expected: 2, found }) if found == window.len()
    ));
}

#[rstest]
#[case("an")]
#[case("n-")]
#[case("u ")]
fn test_score_rejects_invalid_symbol(pair_scanner: MotifScanner, #[case] window: &str) {
    assert!(matches!(
        pair_scanner.score(window),
        Err(MotifError::InvalidSymbol { .. })
    ));
}

#[rstest]
#[case("")]
#[case("a")]
#[case("ac")]
fn test_find_short_sequence_is_empty(pair_scanner: MotifScanner, #[case] sequence: &str) {
    assert!(pair_scanner.find(sequence, 0.0).unwrap().is_empty());
}

#[rstest]
fn test_find_invalid_symbol_aborts_scan(pair_scanner: MotifScanner) {
    let result = pair_scanner.find("acnacac", DEFAULT_THRESHOLD);
    assert!(matches!(
        result,
        Err(MotifError::InvalidSymbol {
            position: 2,
            symbol: 'n'
        })
    ));
}

#[rstest]
fn test_find_ignores_symbol_past_scan_bound(pair_scanner: MotifScanner) {
    // the final base is never part of a scanned window
    let hits = pair_scanner.find("acacx", 1.0).unwrap();
    assert_eq!(offsets(&hits), vec![0, 2]);
}

#[rstest]
fn test_find_never_reports_last_window(triple_scanner: MotifScanner) {
    let sequence = "ttgacgtaacgcatgacgtca";
    let hits = triple_scanner.find(sequence, 0.0).unwrap();
    // every scanned window scores above zero
    assert_eq!(hits.len(), sequence.len() - 3);
    assert!(hits.iter().all(|h| h.offset < sequence.len() - 3));
}

#[rstest]
fn test_find_offsets_increase(triple_scanner: MotifScanner) {
    let hits = triple_scanner
        .find("acgttacgcgtaacgtttacgg", 10.0)
        .unwrap();
    assert!(!hits.is_empty());
    assert!(hits.windows(2).all(|w| w[0].offset < w[1].offset));
    assert!(hits.iter().all(|h| h.score > 10.0));
}

#[rstest]
fn test_find_threshold_is_monotone(triple_scanner: MotifScanner) {
    let sequence = "acgttacgcgtaacgtttacggATTTCGCGA";
    let thresholds = [DEFAULT_THRESHOLD, 0.5, 1.0, 2.0, 10.0, 100.0, 1000.0];

    for pair in thresholds.windows(2) {
        let low = offsets(&triple_scanner.find(sequence, pair[0]).unwrap());
        let high = offsets(&triple_scanner.find(sequence, pair[1]).unwrap());
        assert!(high.iter().all(|o| low.contains(o)), "{:?}", pair);
    }
}

#[rstest]
fn test_find_threshold_is_strict(pair_scanner: MotifScanner) {
    // "ca" scores exactly e^0 = 1
    let hits = pair_scanner.find("cag", 1.0).unwrap();
    assert!(hits.is_empty());
    let hits = pair_scanner.find("cag", 0.999).unwrap();
    assert_eq!(offsets(&hits), vec![0]);
}

#[test]
fn test_scanner_is_shareable_across_threads() {
    let scanner = MotifScanner::new(load_matrix("tests/data/pwm3.txt").unwrap());
    let expected = scanner.find("acgttacgcgtaacg", 1.0).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| scanner.find("acgttacgcgtaacg", 1.0).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_score_large_weights_do_not_overflow() {
    // two positions of 2^62 sum past i64::MAX
    let big = i64::MAX / 2 + 1;
    let scanner = scanner_from(&format!("ALPHABET= ACGT\n\n{big} 0 0 0\n{big} 0 0 0\n"));

    assert_eq!(scanner.score("aa").unwrap(), f64::INFINITY);
    let hits = scanner.find("aaa", 1.0).unwrap();
    assert_eq!(offsets(&hits), vec![0]);
    assert_eq!(hits[0].score, f64::INFINITY);
}

#[test]
fn test_score_large_negative_weights_do_not_wrap() {
    let min = i64::MIN;
    let scanner = scanner_from(&format!("ALPHABET= ACGT\n\n{min} 0 0 -1\n{min} 0 0 -1\n"));

    // forward is 2 * i64::MIN, reverse complement "tt" is -2
    assert_eq!(scanner.score("aa").unwrap(), (-2f64).exp());
}
