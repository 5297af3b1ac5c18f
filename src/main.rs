use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use symcomp::align::{self, AlignOpt, AlignOutputs, Scoring};
use symcomp::compare::{self, CompareOpt};
use symcomp::genome::{self, GenomeStatsOpt};
use symcomp::io::gff::FeatureKind;
use symcomp::plot::{self, PlotOpt, PlotPair};

#[derive(Parser, Debug)]
#[command(
    name = "symcomp",
    author,
    version,
    about = "Compare gene lengths and protein sequence loss between paired genomes",
    arg_required_else_help = true
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare gene/CDS length distributions between two genomes using GFF3
    Compare {
        /// GFF3 of the first genome (e.g. the symbiont)
        #[arg(long)]
        gff1: PathBuf,
        /// GFF3 of the second genome (e.g. the free-living relative)
        #[arg(long)]
        gff2: PathBuf,
        #[arg(long, default_value = "genome1")]
        label1: String,
        #[arg(long, default_value = "genome2")]
        label2: String,
        /// Feature type to measure
        #[arg(long, value_enum, default_value_t = FeatureKind::Cds)]
        feature: FeatureKind,
        /// Attribute tried first when pairing features across genomes. It takes
        /// precedence over the fallback order ID, locus_tag, gene, Name, protein_id;
        /// pass `--pair-key ID` to pair on ID first
        #[arg(long = "pair-key", default_value = "locus_tag")]
        pair_key: String,
        /// Prefix for output files
        #[arg(long = "out-prefix", default_value = "comparison")]
        out_prefix: String,
    },
    /// Genome size and GC% for FASTA files, as TSV and Markdown
    GenomeStats {
        /// FASTA files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Labels, one per file (default: file name)
        #[arg(long, num_args = 1..)]
        labels: Option<Vec<String>>,
        #[arg(long, default_value = "genome_stats.tsv")]
        tsv: PathBuf,
        #[arg(long, default_value = "genome_stats.md")]
        md: PathBuf,
    },
    /// Globally align paired proteins and map residues lost in the query
    Align {
        /// Query FASTA (e.g. symbiont proteins)
        #[arg(short = 'q', long = "query")]
        query: PathBuf,
        /// Reference FASTA (e.g. free-living homologs)
        #[arg(short = 'r', long = "reference")]
        reference: PathBuf,
        /// Per-pair loss table (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Per-segment table
        #[arg(long)]
        segments: Option<PathBuf>,
        /// Text dump of every alignment
        #[arg(long)]
        alignments: Option<PathBuf>,
        /// Pair records by position instead of by id
        #[arg(long = "by-order")]
        by_order: bool,
        #[arg(long = "match", default_value_t = 2, allow_hyphen_values = true)]
        match_score: i32,
        #[arg(long = "mismatch", default_value_t = -1, allow_hyphen_values = true)]
        mismatch: i32,
        #[arg(long = "gap", default_value_t = -2, allow_hyphen_values = true)]
        gap: i32,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
    },
    /// Length histograms per comparison and a genome size vs. median gene length scatter (SVG)
    Plot {
        /// Directory holding `compare` outputs (*.lengths.tsv, *.stats.txt)
        #[arg(long = "results-dir", default_value = "results")]
        results_dir: PathBuf,
        /// Genome stats table from `genome-stats`
        #[arg(long, default_value = "genome_stats.tsv")]
        stats: PathBuf,
        /// Directory for the figures
        #[arg(long, default_value = "figures")]
        outdir: PathBuf,
        /// Number of histogram bins
        #[arg(long, default_value_t = 60)]
        bins: usize,
        /// Comparison to plot as PREFIX:LABEL1:LABEL2; repeatable
        /// (default: every *.stats.txt in the results directory)
        #[arg(long = "pair")]
        pairs: Vec<PlotPair>,
    },
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Compare {
            gff1,
            gff2,
            label1,
            label2,
            feature,
            pair_key,
            out_prefix,
        } => {
            let opt = CompareOpt {
                gff1,
                gff2,
                label1,
                label2,
                feature,
                pair_key,
                out_prefix,
            };
            run_compare(&opt)
        }
        Commands::GenomeStats { files, labels, tsv, md } => {
            let opt = GenomeStatsOpt { files, labels, tsv, md };
            let table = genome::run_genome_stats(&opt)?;
            println!("{}", table);
            Ok(())
        }
        Commands::Align {
            query,
            reference,
            out,
            segments,
            alignments,
            by_order,
            match_score,
            mismatch,
            gap,
            threads,
        } => {
            let opt = AlignOpt {
                scoring: Scoring { match_score, mismatch, gap },
                threads,
                by_order,
            };
            let outputs = AlignOutputs {
                table: out,
                segments,
                alignments,
            };
            let summary = align::align_fasta_pairs(&query, &reference, &outputs, opt)?;
            eprintln!(
                "aligned {} pairs; {} with loss, {} residues lost; {} query / {} reference records unpaired",
                summary.pairs,
                summary.pairs_with_loss,
                summary.lost_residues,
                summary.unmatched_query,
                summary.unmatched_reference
            );
            Ok(())
        }
        Commands::Plot {
            results_dir,
            stats,
            outdir,
            bins,
            pairs,
        } => {
            let opt = PlotOpt {
                results_dir,
                stats,
                outdir,
                bins,
                pairs,
            };
            for path in plot::run_plot(&opt)? {
                println!("Wrote: {}", path.display());
            }
            Ok(())
        }
    }
}

fn run_compare(opt: &CompareOpt) -> Result<()> {
    let (cmp, written) = compare::run_compare(opt)?;
    for path in &written {
        println!("Wrote: {}", path.display());
    }
    match cmp.paired {
        Some(pt) => println!("Paired on {} shared IDs. See stats file for details.", pt.shared_ids),
        None => println!("No shared IDs for pairing; only unpaired test reported."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn pair_key_help_names_fallback_order() {
        let mut cmd = Cli::command();
        let compare = cmd.find_subcommand_mut("compare").unwrap();
        let help = compare.render_long_help().to_string();
        assert!(help.contains("ID, locus_tag, gene, Name, protein_id"));
        assert!(help.contains("--pair-key ID"));
    }

    #[test]
    fn plot_defaults() {
        let cli = Cli::try_parse_from(["symcomp", "plot"]).unwrap();
        match cli.command {
            Commands::Plot { results_dir, stats, outdir, bins, pairs } => {
                assert_eq!(results_dir, PathBuf::from("results"));
                assert_eq!(stats, PathBuf::from("genome_stats.tsv"));
                assert_eq!(outdir, PathBuf::from("figures"));
                assert_eq!(bins, 60);
                assert!(pairs.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
