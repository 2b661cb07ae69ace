use crate::report::{MsaReport, PairwiseReport};
use anyhow::Result;
use serde_json::json;

/// The report object itself, keyed `taxa`, `stats`, `details`, `clustal`
pub fn generate_json_report(report: &MsaReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn generate_pairwise_json(report: &PairwiseReport) -> Result<String> {
    let value = json!({
        "metadata": {
            "generated": chrono::Utc::now().to_rfc3339(),
            "tool": "kaidoku",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "sequences": {
            "seq1": report.seq1,
            "seq2": report.seq2,
        },
        "alignment": {
            "seq1": report.aligned_seq1,
            "markers": report.markers,
            "seq2": report.aligned_seq2,
            "length": report.aligned_seq1.len(),
        },
        "statistics": {
            "matches": report.matches,
            "mismatches": report.mismatches,
            "gaps": report.gaps,
            "score": report.score,
            "identity": report.identity,
        },
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::alignment::nw_aligner::NeedlemanWunsch;
    use crate::bio::alignment::scoring::NucleotideMatrix;

    #[test]
    fn test_pairwise_json_fields() {
        let alignment = NeedlemanWunsch::new(NucleotideMatrix::new()).align(b"ACGT", b"AGGT");
        let report = PairwiseReport::new("a", "b", &alignment);
        let value: serde_json::Value =
            serde_json::from_str(&generate_pairwise_json(&report).unwrap()).unwrap();

        assert_eq!(value["alignment"]["markers"], "|X||");
        assert_eq!(value["statistics"]["mismatches"], 1);
        assert_eq!(value["statistics"]["identity"], 75.0);
        assert!(value["metadata"]["generated"].is_string());
    }
}
