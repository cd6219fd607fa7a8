use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use htvq::codebook::{vector_len, NUM_STAGES};
use htvq::container::{self, ContainerWriter};
use htvq::image::pgm;
use htvq::{
    compress_image, decompress_image, metrics, Codebook, CodecConfig, SearchMode, Stage4Pairing,
};

#[derive(Parser, Debug)]
#[command(name = "htvq")]
#[command(about = "Compress greyscale images with hierarchical table-lookup vector quantization")]
#[command(version)]
struct Cli {
    /// Show verbose statistics and debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a PGM image into a codeword stream
    Encode(EncodeArgs),
    /// Decode a codeword stream into a PGM image
    Decode(DecodeArgs),
    /// Compare two PGM images
    Psnr(PsnrArgs),
    /// Print codebook layout and fingerprint
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Codebook file
    #[arg(short, long)]
    codebook: PathBuf,

    /// Input PGM image (use - for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output codeword stream (use - for stdout)
    #[arg(short, long)]
    output: PathBuf,

    /// Block width in pixels
    #[arg(long, default_value = "4")]
    block_width: usize,

    /// Block height in pixels
    #[arg(long, default_value = "4")]
    block_height: usize,

    /// Blocks per batch
    #[arg(long, default_value = "64")]
    block_count: usize,

    /// Number of threads (0 = auto, 1 = single-threaded)
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,

    /// Use full nearest-codeword search instead of table lookups
    #[arg(long)]
    brute_force: bool,

    /// Pair pixel (3, 3) of 8x4 blocks instead of repeating (3, 2)
    #[arg(long)]
    corrected_pairing: bool,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Codebook file
    #[arg(short, long)]
    codebook: PathBuf,

    /// Input codeword stream (use - for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output PGM image (use - for stdout)
    #[arg(short, long)]
    output: PathBuf,

    /// Blocks per batch
    #[arg(long, default_value = "64")]
    block_count: usize,

    /// Number of threads (0 = auto, 1 = single-threaded)
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,
}

#[derive(Args, Debug)]
struct PsnrArgs {
    /// Original image
    #[arg(long)]
    reference: PathBuf,

    /// Reconstructed image
    #[arg(long)]
    distorted: PathBuf,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Codebook file
    #[arg(short, long)]
    codebook: PathBuf,
}

const EXIT_OK: u8 = 0;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: Cli) -> Result<u8, Box<dyn std::error::Error>> {
    match cli.command {
        Command::Encode(args) => run_encode(&args, cli.verbose),
        Command::Decode(args) => run_decode(&args, cli.verbose),
        Command::Psnr(args) => run_psnr(&args),
        Command::Inspect(args) => run_inspect(&args),
    }
}

fn open_input(path: &Path) -> io::Result<Box<dyn Read>> {
    if path.to_str() == Some("-") {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

fn open_output(path: &Path) -> io::Result<Box<dyn Write>> {
    if path.to_str() == Some("-") {
        Ok(Box::new(io::stdout().lock()))
    } else {
        Ok(Box::new(BufWriter::new(File::create(path)?)))
    }
}

fn run_encode(args: &EncodeArgs, verbose: bool) -> Result<u8, Box<dyn std::error::Error>> {
    let codebook = Codebook::open(&args.codebook)?;
    let image = pgm::read(open_input(&args.input)?)?;

    let config = CodecConfig {
        block_width: args.block_width,
        block_height: args.block_height,
        block_count: args.block_count,
        num_threads: args.threads,
        search: if args.brute_force { SearchMode::BruteForce } else { SearchMode::Hierarchical },
        pairing: if args.corrected_pairing {
            Stage4Pairing::Corrected
        } else {
            Stage4Pairing::Reference
        },
    };

    let start = std::time::Instant::now();
    let (compressed, stats) = compress_image(&codebook, &image, &config)?;
    let elapsed = start.elapsed();

    let mut writer = ContainerWriter::new(open_output(&args.output)?);
    writer.write_image(&compressed)?;
    writer.flush()?;

    if verbose {
        let pixels = image.len() as f64;
        eprintln!("Encoding complete:");
        eprintln!("  Image:            {}x{}", image.columns(), image.rows());
        eprintln!("  Blocks:           {}", stats.blocks);
        eprintln!("  Batches:          {}", stats.batches);
        eprintln!("  Threads:          {}", stats.threads);
        eprintln!("  Output bytes:     {}", writer.bytes_written());
        eprintln!("  Bits per pixel:   {:.3}", compressed.codewords.len() as f64 * 8.0 / pixels);
        eprintln!("  Time:             {:.2?}", elapsed);
    }

    Ok(EXIT_OK)
}

fn run_decode(args: &DecodeArgs, verbose: bool) -> Result<u8, Box<dyn std::error::Error>> {
    let codebook = Codebook::open(&args.codebook)?;
    let compressed = container::read_image(&mut open_input(&args.input)?)?;

    let config = CodecConfig {
        block_width: compressed.block_width,
        block_height: compressed.block_height,
        block_count: args.block_count,
        num_threads: args.threads,
        ..Default::default()
    };

    let start = std::time::Instant::now();
    let (image, stats) = decompress_image(&codebook, &compressed, &config)?;
    let elapsed = start.elapsed();

    let mut output = open_output(&args.output)?;
    pgm::write(&image, &mut output)?;
    output.flush()?;

    if verbose {
        eprintln!("Decoding complete:");
        eprintln!("  Image:            {}x{}", image.columns(), image.rows());
        eprintln!("  Blocks:           {}", stats.blocks);
        eprintln!("  Threads:          {}", stats.threads);
        eprintln!("  Time:             {:.2?}", elapsed);
    }

    Ok(EXIT_OK)
}

fn run_psnr(args: &PsnrArgs) -> Result<u8, Box<dyn std::error::Error>> {
    let reference = pgm::open(&args.reference)?;
    let distorted = pgm::open(&args.distorted)?;

    println!("PSNR:      {:.4} dB", metrics::psnr(&reference, &distorted)?);
    println!("Peak PSNR: {:.4} dB", metrics::peak_psnr(&reference, &distorted)?);
    println!("MSE:       {:.4}", metrics::mse(&reference, &distorted)?);

    Ok(EXIT_OK)
}

fn run_inspect(args: &InspectArgs) -> Result<u8, Box<dyn std::error::Error>> {
    let codebook = Codebook::open(&args.codebook)?;

    println!("Fingerprint: 0x{:08x}", codebook.fingerprint());
    for stage in 0..NUM_STAGES {
        let stage_codebook = codebook.stage(stage);
        let used = {
            let table = codebook.lookup_table(stage);
            let mut seen = [false; 256];
            for &cw in table {
                seen[cw as usize] = true;
            }
            seen.iter().filter(|&&s| s).count()
        };
        println!(
            "Stage {}: {} entries x {} values, {} codewords reachable from the lookup table",
            stage,
            stage_codebook.len(),
            vector_len(stage),
            used
        );
    }

    Ok(EXIT_OK)
}
