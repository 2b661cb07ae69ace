use crate::core::aligner::MsaOutcome;
use crate::report::PairwiseReport;
use anyhow::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use std::fmt::Write;

pub fn generate_text_report(outcome: &MsaOutcome) -> Result<String> {
    let report = &outcome.report;
    let stats = &report.stats;
    let mut output = String::new();

    writeln!(&mut output, "Multiple Sequence Alignment Report")?;
    writeln!(&mut output, "==================================")?;
    writeln!(
        &mut output,
        "Generated: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(&mut output)?;

    writeln!(&mut output, "Summary")?;
    writeln!(&mut output, "-------")?;
    writeln!(&mut output, "- Sequences:         {:>8}", stats.num_sequences)?;
    writeln!(&mut output, "- Alignment length:  {:>8}", stats.alignment_length)?;
    writeln!(&mut output, "- Avg conservation:  {:>7.2}%", stats.avg_conservation)?;
    writeln!(&mut output, "- Sum-of-pairs:      {:>8}", stats.sum_of_pairs_score)?;
    writeln!(&mut output)?;

    if !outcome.rejected.is_empty() {
        writeln!(&mut output, "Skipped Records")?;
        writeln!(&mut output, "---------------")?;
        for record in &outcome.rejected {
            writeln!(&mut output, "  {}: {}", record.header, record.reason)?;
        }
        writeln!(&mut output)?;
    }

    writeln!(&mut output, "Pairwise Identity")?;
    writeln!(&mut output, "-----------------")?;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Sequence 1", "Sequence 2", "Identity (%)"]);
    for pair in &report.details {
        table.add_row(vec![
            Cell::new(&pair.seq1),
            Cell::new(&pair.seq2),
            Cell::new(format!("{:.2}", pair.identity)).set_alignment(CellAlignment::Right),
        ]);
    }
    writeln!(&mut output, "{}", table)?;
    writeln!(&mut output)?;

    write!(&mut output, "{}", report.clustal)?;
    Ok(output)
}

pub fn generate_pairwise_text(report: &PairwiseReport) -> Result<String> {
    let mut output = String::new();

    writeln!(&mut output, "Global Alignment")?;
    writeln!(&mut output, "================")?;
    let label_width = report.seq1.chars().count().max(report.seq2.chars().count());
    writeln!(&mut output, "{:<label_width$}  {}", report.seq1, report.aligned_seq1)?;
    writeln!(&mut output, "{:<label_width$}  {}", "", report.markers)?;
    writeln!(&mut output, "{:<label_width$}  {}", report.seq2, report.aligned_seq2)?;
    writeln!(&mut output)?;
    writeln!(&mut output, "- Matches:    {}", report.matches)?;
    writeln!(&mut output, "- Mismatches: {}", report.mismatches)?;
    writeln!(&mut output, "- Gaps:       {}", report.gaps)?;
    writeln!(&mut output, "- Score:      {}", report.score)?;
    writeln!(&mut output, "- Identity:   {:.2}%", report.identity)?;
    Ok(output)
}
