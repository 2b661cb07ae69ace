//! Clustal-style text rendering of an alignment.

use crate::bio::msa::Alignment;
use crate::bio::sequence::GAP;

pub struct ClustalFormatter {
    block_width: usize,
}

impl ClustalFormatter {
    pub fn new(block_width: usize) -> Self {
        Self {
            block_width: block_width.max(1),
        }
    }

    /// Header, then blocks of rows each followed by a marker line.
    ///
    /// Markers: `*` when every row holds the same residue, `:` when more
    /// than one row holds a residue, blank otherwise.
    pub fn format(&self, alignment: &Alignment) -> String {
        let label_width = alignment
            .rows()
            .iter()
            .map(|r| r.header.chars().count())
            .max()
            .unwrap_or(0);

        let mut lines = vec!["CLUSTAL multiple sequence alignment\n".to_string()];
        let width = alignment.width();

        for start in (0..width).step_by(self.block_width) {
            let end = (start + self.block_width).min(width);
            for row in alignment.rows() {
                lines.push(format!(
                    "{:<label_width$}  {}",
                    row.header,
                    String::from_utf8_lossy(&row.residues[start..end])
                ));
            }

            let markers: String = (start..end).map(|col| marker(alignment, col)).collect();
            lines.push(format!("{:<label_width$}  {}", "", markers));
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

impl Default for ClustalFormatter {
    fn default() -> Self {
        Self::new(60)
    }
}

fn marker(alignment: &Alignment, col: usize) -> char {
    let mut column = alignment.column(col);
    let first = column.next();
    let residues = alignment.column(col).filter(|&c| c != GAP).count();

    match first {
        Some(f) if f != GAP && column.all(|c| c == f) => '*',
        _ if residues > 1 => ':',
        _ => ' ',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bio::msa::AlignedRow;
    use pretty_assertions::assert_eq;

    fn alignment(rows: &[(&str, &[u8])]) -> Alignment {
        Alignment::new(
            rows.iter()
                .enumerate()
                .map(|(i, (h, r))| AlignedRow {
                    index: i,
                    header: h.to_string(),
                    residues: r.to_vec(),
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_block() {
        let input = alignment(&[("s1", b"ACGT-A"), ("seq2", b"ACCTGA"), ("s3", b"AC-T-A")]);
        let expected = concat!(
            "CLUSTAL multiple sequence alignment\n",
            "\n",
            "s1    ACGT-A\n",
            "seq2  ACCTGA\n",
            "s3    AC-T-A\n",
            "      **:* *\n",
        );
        assert_eq!(ClustalFormatter::default().format(&input), expected);
    }

    #[test]
    fn test_blocks_split_at_width() {
        let input = alignment(&[("a", b"ACGTA"), ("b", b"ACGTT")]);
        let output = ClustalFormatter::new(2).format(&input);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[2], "a  AC");
        assert_eq!(lines[3], "b  AC");
        assert_eq!(lines[4], "   **");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "a  GT");
        assert_eq!(lines[10], "a  A");
        assert_eq!(lines[12], "   :");
    }

    #[test]
    fn test_lone_residue_gets_no_marker() {
        let input = alignment(&[("a", b"A"), ("b", b"-")]);
        assert!(ClustalFormatter::default().format(&input).ends_with("   \n"));
    }
}
