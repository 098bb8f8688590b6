use std::io::Write;

use anyhow::{anyhow, bail, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use seqsite::align::{self, GapParams, GapPolicy, SimpleScore};
use seqsite::container::{MutableSiteContainer, SequenceContainer, SiteContainer, VectorSiteContainer};
use seqsite::io::{self, Snapshot, SnapshotMeta};
use seqsite::seq::tools;
use seqsite::sites;
use seqsite::util::alphabet::Alphabet;
use seqsite::util::genetic_code::GeneticCode;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(
    name = "seqsite",
    author,
    version,
    about = "Filter, resample, align and score multiple sequence alignments",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Alphabet of the input alignment (dna, rna, protein, dna-codon, rna-codon)
    #[arg(short = 'a', long, default_value = "dna", global = true)]
    alphabet: Alphabet,

    /// Worker threads for parallel steps (0 = all cores)
    #[arg(short = 't', long = "threads", default_value_t = 1, global = true)]
    threads: usize,

    /// Suppress warnings
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print alignment dimensions and per-site statistics
    Stats {
        /// Alignment (FASTA or snapshot)
        input: String,
        /// Write one TSV line per site instead of a summary
        #[arg(long)]
        per_site: bool,
    },
    /// Remove or rewrite sites
    Filter {
        input: String,
        #[arg(short, long, value_enum, default_value_t = FilterMode::GapOnly)]
        mode: FilterMode,
        /// Gap frequency threshold for `--mode gap-freq`
        #[arg(long, default_value_t = 0.5)]
        max_gap_freq: f64,
        /// NCBI genetic code id for `--mode stop-codon`
        #[arg(long, default_value_t = 1)]
        genetic_code: u32,
        /// Replace remaining gaps with the unknown state
        #[arg(long)]
        gaps_to_unknown: bool,
        /// Restore site coordinates to 1..n afterwards
        #[arg(long)]
        reindex: bool,
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Resample sites with replacement
    Bootstrap {
        input: String,
        /// Number of replicates
        #[arg(short = 'n', long, default_value_t = 1)]
        replicates: usize,
        /// Sites per replicate (defaults to the alignment length)
        #[arg(long)]
        sites: Option<usize>,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Replicate k is written to `<prefix>.<k>.fa`; stdout if omitted
        #[arg(short, long)]
        out_prefix: Option<String>,
    },
    /// Majority-rule consensus sequence
    Consensus {
        input: String,
        #[arg(long, default_value = "consensus")]
        name: String,
        #[arg(long)]
        ignore_gap: bool,
        #[arg(long)]
        resolve_unknown: bool,
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Pairwise distance (or similarity) matrix
    Distance {
        input: String,
        #[arg(long, value_enum, default_value_t = GapPolicy::IgnoreAllGapColumns)]
        gap_policy: GapPolicy,
        /// Report similarity instead of distance
        #[arg(long)]
        similarity: bool,
        #[arg(long)]
        unresolved_as_gap: bool,
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Global alignment of two sequences (Needleman-Wunsch)
    Pairwise {
        /// FASTA with the two sequences (gaps are ignored)
        input: String,
        #[arg(long = "match", default_value_t = 1)]
        match_score: i32,
        #[arg(long = "mismatch", default_value_t = -1, allow_hyphen_values = true)]
        mismatch_score: i32,
        /// Gap opening score; 0 gives a linear gap penalty
        #[arg(long = "gap-open", default_value_t = 0, allow_hyphen_values = true)]
        gap_open: i32,
        /// Score added per gap position
        #[arg(long = "gap-ext", default_value_t = -2, allow_hyphen_values = true)]
        gap_extend: i32,
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Column (CS) and sum-of-pairs (SPS) scores against a reference alignment
    Compare {
        test: String,
        reference: String,
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Save an alignment as a binary snapshot, or describe an existing one
    Snapshot {
        input: String,
        /// Output snapshot; without it the input snapshot is described
        #[arg(short, long)]
        out: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FilterMode {
    /// Sites where every sequence has a gap
    GapOnly,
    /// Sites with only gaps or unresolved states
    GapOrUnresolved,
    /// Sites with at least one gap
    AnyGap,
    /// Sites with a gap or an unresolved state
    Incomplete,
    /// Sites whose gap frequency exceeds --max-gap-freq
    GapFreq,
    /// Sites containing a stop codon (codon alphabets)
    StopCodon,
    /// Keep every site
    Keep,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.quiet, cli.verbose);
    rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build_global()
        .map_err(|e| anyhow!("cannot start thread pool: {}", e))?;

    let alphabet = cli.alphabet;
    match cli.command {
        Commands::Stats { input, per_site } => run_stats(&input, alphabet, per_site),
        Commands::Filter { input, mode, max_gap_freq, genetic_code, gaps_to_unknown, reindex, out } => {
            let opt = FilterOpt { mode, max_gap_freq, genetic_code, gaps_to_unknown, reindex };
            run_filter(&input, alphabet, opt, out.as_deref())
        }
        Commands::Bootstrap { input, replicates, sites, seed, out_prefix } => {
            run_bootstrap(&input, alphabet, replicates, sites, seed, out_prefix.as_deref())
        }
        Commands::Consensus { input, name, ignore_gap, resolve_unknown, out } => {
            let aln = load_alignment(&input, alphabet)?;
            let cons = align::consensus(&aln, &name, ignore_gap, resolve_unknown)?;
            let single = VectorSiteContainer::from_sequences(vec![cons], alphabet)?;
            io::write_alignment_to(out.as_deref(), &single, 60)
        }
        Commands::Distance { input, gap_policy, similarity, unresolved_as_gap, out } => {
            run_distance(&input, alphabet, gap_policy, !similarity, unresolved_as_gap, out.as_deref())
        }
        Commands::Pairwise { input, match_score, mismatch_score, gap_open, gap_extend, out } => {
            let scores = SimpleScore::new(alphabet, match_score, mismatch_score);
            run_pairwise(&input, alphabet, &scores, GapParams::affine(gap_open, gap_extend), out.as_deref())
        }
        Commands::Compare { test, reference, out } => run_compare(&test, &reference, alphabet, out.as_deref()),
        Commands::Snapshot { input, out } => run_snapshot(&input, alphabet, out.as_deref()),
    }
}

fn init_logger(quiet: bool, verbose: u8) {
    let level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    if let Err(e) = env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            let level = record.level().as_str().to_lowercase();
            writeln!(buf, "[seqsite {level:>5}] {}", record.args())
        })
        .try_init()
    {
        eprintln!("failed to setup logger: {e}");
    }
}

/// FASTA 或快照；快照的字母表必须与命令行一致
fn load_alignment(path: &str, alphabet: Alphabet) -> Result<VectorSiteContainer> {
    if io::is_snapshot_file(path)? {
        let snap = Snapshot::load_from_file(path)?;
        if snap.alignment.alphabet() != alphabet {
            bail!(
                "snapshot '{}' holds a {} alignment, but --alphabet is {}",
                path,
                snap.alignment.alphabet(),
                alphabet
            );
        }
        info!("loaded snapshot {} ({} sequences)", path, snap.alignment.num_sequences());
        return Ok(snap.alignment);
    }
    io::read_alignment_file(path, alphabet)
}

fn open_output(path: Option<&str>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(std::io::BufWriter::new(
            std::fs::File::create(p).map_err(|e| anyhow!("cannot create '{}': {}", p, e))?,
        )),
        None => Box::new(std::io::BufWriter::new(std::io::stdout())),
    })
}

fn run_stats(input: &str, alphabet: Alphabet, per_site: bool) -> Result<()> {
    let aln = load_alignment(input, alphabet)?;
    let mut out = open_output(None)?;
    if per_site {
        writeln!(out, "position\tgaps\tstates\tconstant\tentropy")?;
        for site in aln.iter_sites() {
            let constant = tools::is_constant(site, true).map(|c| c.to_string()).unwrap_or_else(|_| "NA".into());
            let entropy = tools::entropy(site, true).map(|h| format!("{h:.4}")).unwrap_or_else(|_| "NA".into());
            writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}",
                site.position(),
                tools::gap_count(site),
                tools::distinct_state_count(site),
                constant,
                entropy
            )?;
        }
    } else {
        let gap_only = aln.iter_sites().filter(|s| tools::is_gap_only(*s)).count();
        let with_gap = aln.iter_sites().filter(|s| tools::has_gap(*s)).count();
        let complete = aln.iter_sites().filter(|s| tools::is_complete(*s)).count();
        let constant = aln
            .iter_sites()
            .filter(|s| tools::is_constant(*s, true).unwrap_or(false))
            .count();
        writeln!(out, "alignment:\t{}", input)?;
        writeln!(out, "alphabet:\t{}", alphabet)?;
        writeln!(out, "sequences:\t{}", aln.num_sequences())?;
        writeln!(out, "sites:\t{}", aln.num_sites())?;
        writeln!(out, "gap_only_sites:\t{}", gap_only)?;
        writeln!(out, "sites_with_gaps:\t{}", with_gap)?;
        writeln!(out, "complete_sites:\t{}", complete)?;
        writeln!(out, "constant_sites:\t{}", constant)?;
    }
    out.flush()?;
    Ok(())
}

#[derive(Clone, Copy, Debug)]
struct FilterOpt {
    mode: FilterMode,
    max_gap_freq: f64,
    genetic_code: u32,
    gaps_to_unknown: bool,
    reindex: bool,
}

fn run_filter(input: &str, alphabet: Alphabet, opt: FilterOpt, out: Option<&str>) -> Result<()> {
    let mut aln = load_alignment(input, alphabet)?;
    let before = aln.num_sites();
    match opt.mode {
        FilterMode::GapOnly => {
            sites::remove_gap_only_sites(&mut aln)?;
        }
        FilterMode::GapOrUnresolved => {
            sites::remove_gap_or_unresolved_only_sites(&mut aln)?;
        }
        FilterMode::AnyGap => aln = sites::sites_without_gaps(&aln)?,
        FilterMode::Incomplete => aln = sites::complete_sites(&aln)?,
        FilterMode::GapFreq => {
            sites::remove_gap_sites(&mut aln, opt.max_gap_freq)?;
        }
        FilterMode::StopCodon => {
            let code = GeneticCode::from_ncbi_id(opt.genetic_code)?;
            sites::remove_sites_with_stop_codon(&mut aln, &code)?;
        }
        FilterMode::Keep => {}
    }
    if opt.gaps_to_unknown {
        sites::change_gaps_to_unknown(&mut aln)?;
    }
    if opt.reindex {
        aln.reindex_sites();
    }
    info!("{:?}: kept {} of {} sites", opt.mode, aln.num_sites(), before);
    if aln.num_sites() == 0 {
        warn!("no site left after filtering");
    }
    io::write_alignment_to(out, &aln, 60)
}

fn run_bootstrap(
    input: &str,
    alphabet: Alphabet,
    replicates: usize,
    n_sites: Option<usize>,
    seed: u64,
    out_prefix: Option<&str>,
) -> Result<()> {
    let aln = load_alignment(input, alphabet)?;
    let n = n_sites.unwrap_or_else(|| aln.num_sites());
    let mut rng = StdRng::seed_from_u64(seed);
    for k in 0..replicates {
        let rep = sites::sample_sites(&aln, n, &mut rng)?;
        match out_prefix {
            Some(prefix) => io::write_alignment_to(Some(&format!("{prefix}.{k}.fa")), &rep, 60)?,
            None => io::write_alignment_to(None, &rep, 60)?,
        }
    }
    info!("wrote {} replicates of {} sites (seed {})", replicates, n, seed);
    Ok(())
}

fn run_distance(
    input: &str,
    alphabet: Alphabet,
    policy: GapPolicy,
    as_distance: bool,
    unresolved_as_gap: bool,
    out: Option<&str>,
) -> Result<()> {
    let aln = load_alignment(input, alphabet)?;
    let m = align::similarity_matrix(&aln, as_distance, policy, unresolved_as_gap)?;
    let mut w = open_output(out)?;
    // PHYLIP 风格的方阵
    writeln!(w, "{}", m.len())?;
    for (i, name) in m.names().iter().enumerate() {
        write!(w, "{}", name)?;
        for j in 0..m.len() {
            write!(w, "\t{:.6}", m.get(i, j)?)?;
        }
        writeln!(w)?;
    }
    w.flush()?;
    Ok(())
}

fn run_pairwise(input: &str, alphabet: Alphabet, scores: &SimpleScore, gap: GapParams, out: Option<&str>) -> Result<()> {
    let seqs = io::read_sequences_file(input, alphabet)?;
    if seqs.len() < 2 {
        bail!("'{}' must contain two sequences, found {}", input, seqs.len());
    }
    if seqs.len() > 2 {
        warn!("'{}' has {} sequences, aligning the first two", input, seqs.len());
    }
    let res = if gap.opening == 0 {
        align::needleman_wunsch(&seqs[0], &seqs[1], scores, gap.extending)?
    } else {
        align::needleman_wunsch_affine(&seqs[0], &seqs[1], scores, gap)?
    };
    info!("{} vs {}: score {}", seqs[0].name(), seqs[1].name(), res.score);
    eprintln!("score\t{}", res.score);
    eprintln!("cigar\t{}", res.cigar());
    io::write_alignment_to(out, &res.alignment, 60)
}

fn run_compare(test: &str, reference: &str, alphabet: Alphabet, out: Option<&str>) -> Result<()> {
    let test_aln = load_alignment(test, alphabet)?;
    let ref_aln = load_alignment(reference, alphabet)?;
    let test_pos = sites::sequence_positions(&test_aln)?;
    let ref_pos = sites::sequence_positions(&ref_aln)?;
    let cs = align::column_scores(&test_pos, &ref_pos)?;
    let sps = align::sum_of_pairs_scores(&test_pos, &ref_pos)?;

    let mut w = open_output(out)?;
    writeln!(w, "column\tcs\tsps")?;
    for (j, (c, p)) in cs.iter().zip(&sps).enumerate() {
        let c = c.map(|v| v.to_string()).unwrap_or_else(|| "NA".into());
        let p = p.map(|v| format!("{v:.4}")).unwrap_or_else(|| "NA".into());
        writeln!(w, "{}\t{}\t{}", j + 1, c, p)?;
    }
    w.flush()?;

    let defined: Vec<i32> = cs.iter().flatten().copied().collect();
    let pairs: Vec<f64> = sps.iter().flatten().copied().collect();
    if !defined.is_empty() {
        info!("CS = {:.4}", defined.iter().sum::<i32>() as f64 / defined.len() as f64);
    }
    if !pairs.is_empty() {
        info!("SPS = {:.4}", pairs.iter().sum::<f64>() / pairs.len() as f64);
    }
    Ok(())
}

fn run_snapshot(input: &str, alphabet: Alphabet, out: Option<&str>) -> Result<()> {
    match out {
        Some(path) => {
            let aln = io::read_alignment_file(input, alphabet)?;
            let snap = Snapshot::new(aln, SnapshotMeta::now(Some(input)));
            snap.save_to_file(path)?;
            println!("snapshot saved: {}", path);
        }
        None => {
            let snap = Snapshot::load_from_file(input)?;
            let none = || "-".to_string();
            println!("snapshot:\t{}", input);
            println!("alphabet:\t{}", snap.alignment.alphabet());
            println!("sequences:\t{}", snap.alignment.num_sequences());
            println!("sites:\t{}", snap.alignment.num_sites());
            println!("source:\t{}", snap.meta.source_file.unwrap_or_else(none));
            println!("command:\t{}", snap.meta.build_args.unwrap_or_else(none));
            println!("created:\t{}", snap.meta.build_timestamp.unwrap_or_else(none));
        }
    }
    Ok(())
}
