/// Tests for FASTA input: parsing, validation policies and file round trips
use flate2::write::GzEncoder;
use flate2::Compression;
use kaidoku::bio::fasta::{
    parse_fasta, parse_fasta_from_bytes, read_msa_input, write_fasta, ParsePolicy,
};
use kaidoku::bio::sequence::{MoleculeType, Sequence};
use kaidoku::KaidokuError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::TempDir;

#[test]
fn test_multiline_records_are_joined_and_uppercased() {
    let sequences = parse_fasta_from_bytes(b">s1 first one\nacgt\nACGT\n\n>s2\r\nTT GG\r\n").unwrap();

    assert_eq!(sequences.len(), 2);
    assert_eq!(sequences[0].id, "s1");
    assert_eq!(sequences[0].description.as_deref(), Some("first one"));
    assert_eq!(sequences[0].sequence, b"ACGTACGT");
    assert_eq!(sequences[0].label(), "s1 first one");
    assert_eq!(sequences[1].sequence, b"TTGG");
}

#[test]
fn test_data_before_header_is_a_parse_error() {
    assert!(matches!(
        parse_fasta_from_bytes(b"ACGT\n>s1\nACGT\n"),
        Err(KaidokuError::Parse(_))
    ));
}

#[test]
fn test_strict_policy_rejects_batch() {
    let result = read_msa_input(
        ">s1\nACGT\n>s2\nACGU\n>s3\nACGA\n",
        MoleculeType::Nucleotide,
        ParsePolicy::Strict,
    );
    assert!(matches!(result, Err(KaidokuError::InvalidInput(_))));
}

#[test]
fn test_lenient_policy_reports_skipped_records() {
    let parsed = read_msa_input(
        ">s1\nACGT\n>empty\n>s2\nACGU\n>s3\nACGA\n",
        MoleculeType::Nucleotide,
        ParsePolicy::Lenient,
    )
    .unwrap();

    let kept: Vec<&str> = parsed.sequences.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(kept, vec!["s1", "s3"]);
    let skipped: Vec<&str> = parsed.rejected.iter().map(|r| r.header.as_str()).collect();
    assert_eq!(skipped, vec!["empty", "s2"]);
}

#[test]
fn test_lenient_still_needs_two_sequences() {
    let result = read_msa_input(">s1\nACGT\n>s2\nXXXX\n", MoleculeType::Nucleotide, ParsePolicy::Lenient);
    assert!(matches!(result, Err(KaidokuError::InvalidInput(_))));
}

#[test]
fn test_protein_alphabet() {
    let text = ">p1\nMKTAYIAKQR\n>p2\nMKTQR\n";
    assert!(read_msa_input(text, MoleculeType::Protein, ParsePolicy::Strict).is_ok());
    assert!(read_msa_input(text, MoleculeType::Nucleotide, ParsePolicy::Strict).is_err());
    // B and Z are not among the 20 standard residues
    assert!(read_msa_input(">p1\nMKB\n>p2\nMKZ\n", MoleculeType::Protein, ParsePolicy::Strict).is_err());
}

#[test]
fn test_pre_gapped_input_is_accepted() {
    let parsed = read_msa_input(">s1\nAC-GT\n>s2\nACGGT\n", MoleculeType::Nucleotide, ParsePolicy::Strict).unwrap();
    assert_eq!(parsed.sequences[0].sequence, b"AC-GT");
}

#[test]
fn test_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("input.fasta");
    let long: Vec<u8> = b"ACGT".iter().copied().cycle().take(200).collect();
    let sequences = vec![
        Sequence::new("s1".to_string(), long.clone()).with_description("long one".to_string()),
        Sequence::new("s2".to_string(), b"ACGA".to_vec()),
    ];

    write_fasta(&path, &sequences).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.lines().all(|l| l.len() <= 80));

    let parsed = parse_fasta(&path).unwrap();
    assert_eq!(parsed, sequences);
}

#[test]
fn test_gzip_input() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("input.fasta.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
    encoder.write_all(b">s1\nACGT\n>s2\nACGA\n").unwrap();
    encoder.finish().unwrap();

    let parsed = parse_fasta(&path).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[1].sequence, b"ACGA");
}

#[test]
fn test_empty_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.fasta");
    std::fs::write(&path, b"").unwrap();
    assert!(parse_fasta(&path).unwrap().is_empty());
}

#[test]
fn test_missing_file_is_io_error() {
    assert!(matches!(
        parse_fasta("/nonexistent/input.fasta"),
        Err(KaidokuError::Io(_))
    ));
}
