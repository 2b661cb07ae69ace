use crate::bio::sequence::{MoleculeType, Sequence};
use crate::KaidokuError;
use flate2::read::GzDecoder;
use memmap2::Mmap;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{char, line_ending, not_line_ending, space1},
    combinator::{map, opt},
    sequence::preceded,
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{info, warn};

/// What to do with records that fail alphabet validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Reject the whole batch on the first invalid record
    #[default]
    Strict,
    /// Skip invalid records and report them
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub header: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct ParsedInput {
    pub sequences: Vec<Sequence>,
    pub rejected: Vec<RejectedRecord>,
}

/// Parse a FASTA header line
fn parse_header(input: &[u8]) -> IResult<&[u8], (&str, Option<&str>)> {
    let (input, _) = tag(b">")(input)?;
    let (input, id) = map(
        take_till(|c: u8| c == b' ' || c == b'\t' || c == b'\n' || c == b'\r'),
        |s| std::str::from_utf8(s).unwrap_or(""),
    )(input)?;
    let (input, description) = opt(preceded(
        space1,
        map(not_line_ending, |s| std::str::from_utf8(s).unwrap_or("")),
    ))(input)?;
    let (input, _) = opt(line_ending)(input)?;

    let description = description.map(str::trim).filter(|d| !d.is_empty());
    Ok((input, (id, description)))
}

/// Parse sequence lines until next header or EOF
fn parse_sequence(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let mut sequence = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() && remaining[0] != b'>' {
        let (rest, line) =
            take_till::<_, _, nom::error::Error<_>>(|c: u8| c == b'\n')(remaining)?;
        let (rest, _) = opt(char::<_, nom::error::Error<_>>('\n'))(rest)?;

        // Drop whitespace (including stray '\r') inside residue lines
        for &c in line {
            if !c.is_ascii_whitespace() {
                sequence.push(c.to_ascii_uppercase());
            }
        }

        remaining = rest;
    }

    Ok((remaining, sequence))
}

/// Parse a single FASTA record
fn parse_record(input: &[u8]) -> IResult<&[u8], Sequence> {
    let (input, (id, description)) = parse_header(input)?;
    let (input, sequence) = parse_sequence(input)?;

    let mut seq = Sequence::new(id.to_string(), sequence);
    if let Some(desc) = description {
        seq = seq.with_description(desc.to_string());
    }

    Ok((input, seq))
}

/// Parse FASTA from bytes. Records with empty sequences are kept so that
/// validation can report them.
pub fn parse_fasta_from_bytes(data: &[u8]) -> Result<Vec<Sequence>, KaidokuError> {
    let mut sequences = Vec::new();
    let mut remaining = data;

    loop {
        while !remaining.is_empty() && remaining[0].is_ascii_whitespace() {
            remaining = &remaining[1..];
        }

        if remaining.is_empty() {
            break;
        }

        if remaining[0] != b'>' {
            return Err(KaidokuError::Parse(
                "Sequence data found before the first FASTA header".to_string(),
            ));
        }

        let (rest, seq) = parse_record(remaining)
            .map_err(|e| KaidokuError::Parse(format!("Failed to parse FASTA record: {:?}", e)))?;
        sequences.push(seq);
        remaining = rest;
    }

    Ok(sequences)
}

pub fn parse_fasta_str(text: &str) -> Result<Vec<Sequence>, KaidokuError> {
    parse_fasta_from_bytes(text.as_bytes())
}

/// Parse a FASTA file into sequences (supports .gz compression)
pub fn parse_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<Sequence>, KaidokuError> {
    let path = path.as_ref();

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let file = File::open(path)?;
        let mut decoder = GzDecoder::new(BufReader::new(file));
        let mut buffer = Vec::new();
        decoder.read_to_end(&mut buffer)?;
        parse_fasta_from_bytes(&buffer)
    } else {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Vec::new());
        }
        let mmap = unsafe { Mmap::map(&file)? };
        parse_fasta_from_bytes(&mmap[..])
    }
}

/// Validate parsed records against the molecule alphabet and require at
/// least two usable sequences.
pub fn validate_records(
    records: Vec<Sequence>,
    molecule: MoleculeType,
    policy: ParsePolicy,
) -> Result<ParsedInput, KaidokuError> {
    if records.is_empty() {
        return Err(KaidokuError::InvalidInput(format!(
            "No valid {} sequences found",
            molecule
        )));
    }

    let mut sequences = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for record in records {
        match record.validate(molecule) {
            Ok(()) => sequences.push(record),
            Err(KaidokuError::InvalidInput(reason)) if policy == ParsePolicy::Lenient => {
                warn!("Skipping record {}: {}", record.label(), reason);
                rejected.push(RejectedRecord {
                    header: record.label(),
                    reason,
                });
            }
            Err(e) => return Err(e),
        }
    }

    if sequences.len() < 2 {
        return Err(KaidokuError::InvalidInput(format!(
            "At least two valid {} sequences required, found {}",
            molecule,
            sequences.len()
        )));
    }

    info!(
        "Parsed {} valid sequences, {} rejected",
        sequences.len(),
        rejected.len()
    );

    Ok(ParsedInput {
        sequences,
        rejected,
    })
}

/// Parse and validate FASTA text for a multiple alignment job
pub fn read_msa_input(
    text: &str,
    molecule: MoleculeType,
    policy: ParsePolicy,
) -> Result<ParsedInput, KaidokuError> {
    validate_records(parse_fasta_str(text)?, molecule, policy)
}

/// Write sequences to a FASTA file (supports .gz compression)
pub fn write_fasta<P: AsRef<Path>>(path: P, sequences: &[Sequence]) -> Result<(), KaidokuError> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let path = path.as_ref();
    let file = File::create(path)?;

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let encoder = GzEncoder::new(file, Compression::default());
        let mut writer = BufWriter::new(encoder);
        write_fasta_to_writer(&mut writer, sequences)?;
        writer.flush()?;
    } else {
        let mut writer = BufWriter::new(file);
        write_fasta_to_writer(&mut writer, sequences)?;
        writer.flush()?;
    }

    Ok(())
}

/// Write sequences to any writer, 80 residues per line
pub fn write_fasta_to_writer<W: Write>(
    writer: &mut W,
    sequences: &[Sequence],
) -> Result<(), KaidokuError> {
    for seq in sequences {
        writeln!(writer, "{}", seq.header())?;

        for chunk in seq.sequence.chunks(80) {
            writeln!(writer, "{}", String::from_utf8_lossy(chunk))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        let input = b">sp|P12345|PROTEIN_HUMAN Description here\nACGT";
        let (remaining, (id, desc)) = parse_header(input).unwrap();
        assert_eq!(id, "sp|P12345|PROTEIN_HUMAN");
        assert_eq!(desc, Some("Description here"));
        assert_eq!(remaining, b"ACGT");
    }

    #[test]
    fn test_header_at_eof() {
        let (remaining, (id, desc)) = parse_header(b">lonely").unwrap();
        assert_eq!(id, "lonely");
        assert_eq!(desc, None);
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_multiline_record_is_concatenated_and_uppercased() {
        let seqs = parse_fasta_str(">s1\nacgt\nACGT\r\n>s2\nGG TT\n").unwrap();
        assert_eq!(seqs.len(), 2);
        assert_eq!(seqs[0].sequence, b"ACGTACGT");
        assert_eq!(seqs[1].sequence, b"GGTT");
    }

    #[test]
    fn test_data_before_header_is_rejected() {
        let result = parse_fasta_str("ACGT\n>s1\nACGT\n");
        assert!(matches!(result, Err(KaidokuError::Parse(_))));
    }

    #[test]
    fn test_strict_policy_rejects_batch() {
        let result = read_msa_input(
            ">s1\nACGT\n>s2\nACGTX\n>s3\nACGA\n",
            MoleculeType::Nucleotide,
            ParsePolicy::Strict,
        );
        assert!(matches!(result, Err(KaidokuError::InvalidInput(_))));
    }

    #[test]
    fn test_lenient_policy_skips_invalid() {
        let parsed = read_msa_input(
            ">s1\nACGT\n>s2\nACGTX\n>s3\nACGA\n",
            MoleculeType::Nucleotide,
            ParsePolicy::Lenient,
        )
        .unwrap();
        assert_eq!(parsed.sequences.len(), 2);
        assert_eq!(parsed.rejected.len(), 1);
        assert_eq!(parsed.rejected[0].header, "s2");
    }

    #[test]
    fn test_single_sequence_is_not_enough() {
        let result = read_msa_input(">s1\nACGT\n", MoleculeType::Nucleotide, ParsePolicy::Strict);
        assert!(matches!(result, Err(KaidokuError::InvalidInput(_))));
    }
}
