/// Multiple alignment pipeline
use crate::bio::alignment::nw_aligner::{NeedlemanWunsch, PairwiseAlignment};
use crate::bio::clustering::{DistanceMatrix, DistanceMethod, GuideTree, IdentityScorer, KmerIdentity};
use crate::bio::fasta::{parse_fasta, read_msa_input, validate_records, ParsedInput, RejectedRecord};
use crate::bio::msa::{Alignment, ConservationProfile, ProgressiveAligner, RefinementEngine};
use crate::bio::sequence::{MoleculeType, Sequence};
use crate::core::config::Config;
use crate::report::{ClustalFormatter, MsaReport};
use crate::KaidokuError;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Everything a job produced, for the output formats that need more than
/// the report
pub struct MsaOutcome {
    pub alignment: Alignment,
    pub distances: DistanceMatrix,
    pub tree: GuideTree,
    pub conservation: ConservationProfile,
    pub rejected: Vec<RejectedRecord>,
    pub report: MsaReport,
}

pub struct MultipleAligner {
    config: Config,
    scorer: Option<Box<dyn IdentityScorer>>,
    silent: bool,
}

impl MultipleAligner {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            scorer: None,
            silent: true,
        }
    }

    /// Replace the configured distance method
    pub fn with_identity_scorer<I: IdentityScorer + 'static>(mut self, scorer: I) -> Self {
        self.scorer = Some(Box::new(scorer));
        self
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Align FASTA text
    pub fn run(&self, fasta: &str) -> Result<MsaOutcome, KaidokuError> {
        let parsed = read_msa_input(
            fasta,
            self.config.alignment.molecule,
            self.config.alignment.parse_policy,
        )?;
        self.execute(parsed)
    }

    /// Align a FASTA file, plain or gzip compressed
    pub fn run_file<P: AsRef<Path>>(&self, path: P) -> Result<MsaOutcome, KaidokuError> {
        let records = parse_fasta(path)?;
        let parsed = validate_records(
            records,
            self.config.alignment.molecule,
            self.config.alignment.parse_policy,
        )?;
        self.execute(parsed)
    }

    /// Align already-parsed sequences; they are validated first
    pub fn run_sequences(&self, sequences: Vec<Sequence>) -> Result<MsaOutcome, KaidokuError> {
        let parsed = validate_records(
            sequences,
            self.config.alignment.molecule,
            self.config.alignment.parse_policy,
        )?;
        self.execute(parsed)
    }

    /// Global alignment of two sequences with the configured scoring
    pub fn align_pairwise(
        &self,
        a: &Sequence,
        b: &Sequence,
    ) -> Result<PairwiseAlignment, KaidokuError> {
        let molecule = self.config.alignment.molecule;
        a.validate(molecule)?;
        b.validate(molecule)?;
        let scoring = self.config.alignment.scoring();
        Ok(NeedlemanWunsch::new(&scoring).align(&a.sequence, &b.sequence))
    }

    fn execute(&self, parsed: ParsedInput) -> Result<MsaOutcome, KaidokuError> {
        let ParsedInput {
            sequences,
            rejected,
        } = parsed;
        let settings = &self.config.alignment;
        let scoring = settings.scoring();

        let pb = if self.silent {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };

        pb.set_message(format!("Computing distances for {} sequences", sequences.len()));
        let exact;
        let kmer;
        let scorer: &dyn IdentityScorer = match (&self.scorer, settings.distance) {
            (Some(custom), _) => custom.as_ref(),
            (None, DistanceMethod::Exact) => {
                exact = NeedlemanWunsch::new(&scoring);
                &exact
            }
            (None, DistanceMethod::Kmer) => {
                kmer = KmerIdentity::new(settings.kmer_size);
                &kmer
            }
        };
        let distances =
            DistanceMatrix::build(&sequences, scorer, self.config.performance.parallel_distance)?;

        pb.set_message("Building guide tree");
        let tree = GuideTree::build(&distances)?;

        pb.set_message("Progressive alignment");
        let alignment = ProgressiveAligner::new(&scoring).align(&sequences, &tree)?;

        pb.set_message("Refining alignment");
        let mut rng = StdRng::seed_from_u64(settings.seed);
        let alignment = RefinementEngine::new(&scoring)
            .with_iterations(settings.refine_iterations)
            .with_policy(settings.refine_policy)
            .refine(alignment, &mut rng)?;

        let conservation = ConservationProfile::score(&alignment);
        let sum_of_pairs = alignment.sum_of_pairs(&scoring);
        let report = MsaReport::new(
            &alignment,
            &distances,
            &conservation,
            sum_of_pairs,
            &ClustalFormatter::new(self.config.output.block_width),
        );

        pb.finish_and_clear();
        info!(
            "Aligned {} {} sequences: {} columns, {:.1}% average conservation",
            alignment.num_sequences(),
            settings.molecule,
            alignment.width(),
            conservation.average()
        );

        Ok(MsaOutcome {
            alignment,
            distances,
            tree,
            conservation,
            rejected,
            report,
        })
    }
}

/// One-shot alignment of FASTA text with default settings
pub fn align_sequences(fasta: &str, molecule: MoleculeType) -> Result<MsaReport, KaidokuError> {
    let mut config = Config::default();
    config.alignment.molecule = molecule;
    Ok(MultipleAligner::new(config).run(fasta)?.report)
}
