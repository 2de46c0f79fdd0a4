use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use defl::{BatchDecoder, BatchEncoder, CompressConfig, Decoder, Encoder, DEFAULT_WINDOW_SIZE};
use log::{debug, info, LevelFilter};
use memmap2::Mmap;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

const DEFLATED_EXT: &str = "defl";
const INFLATED_EXT: &str = "infl";

#[derive(Parser, Debug)]
#[command(name = "defl")]
#[command(about = "Compress and decompress files with a single-block LZSS + Huffman coder")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Number of threads when several files are given (0 = auto)
    #[arg(short = 't', long, default_value = "1", global = true)]
    threads: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress FILE into FILE.defl
    Deflate {
        /// Input files (use - for stdin)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file for a single input (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How far back to look for repeats, in bytes
        #[arg(short, long, default_value_t = DEFAULT_WINDOW_SIZE)]
        window: usize,
    },
    /// Decompress FILE.defl into FILE.infl
    Inflate {
        /// Input names, with or without the .defl suffix (use - for stdin)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file for a single input (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Bytes of one input, mapped when it is a regular file
enum Input {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl AsRef<[u8]> for Input {
    fn as_ref(&self) -> &[u8] {
        match self {
            Input::Mapped(map) => &map[..],
            Input::Owned(buf) => &buf[..],
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    // A logger may already be installed; the codec still works without one
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        Command::Deflate { inputs, output, window } => {
            let config = CompressConfig::with_window_size(window);
            config.validate()?;
            let jobs = plan(&inputs, output, |path| {
                (path.to_path_buf(), append_ext(path, DEFLATED_EXT))
            })?;
            run_jobs(&jobs, |data| {
                if data.len() == 1 {
                    Ok(vec![Encoder::new(config.clone()).encode(data[0].as_ref())?])
                } else {
                    Ok(BatchEncoder::new(config.clone(), args.threads).encode_all(data)?)
                }
            })
        }
        Command::Inflate { inputs, output } => {
            let jobs = plan(&inputs, output, |path| {
                let base = strip_ext(path, DEFLATED_EXT);
                (append_ext(&base, DEFLATED_EXT), append_ext(&base, INFLATED_EXT))
            })?;
            run_jobs(&jobs, |data| {
                if data.len() == 1 {
                    Ok(vec![Decoder::new().decode(data[0].as_ref())?])
                } else {
                    Ok(BatchDecoder::new(args.threads).decode_all(data)?)
                }
            })
        }
    }
}

/// Pair every input with its output path
fn plan<F>(
    inputs: &[PathBuf],
    output: Option<PathBuf>,
    derive: F,
) -> Result<Vec<(PathBuf, PathBuf)>, Box<dyn std::error::Error>>
where
    F: Fn(&Path) -> (PathBuf, PathBuf),
{
    if output.is_some() && inputs.len() > 1 {
        return Err("--output can only be used with a single input".into());
    }

    Ok(inputs
        .iter()
        .map(|path| {
            let (input, derived) =
                if is_stdio(path) { (path.clone(), path.clone()) } else { derive(path) };
            (input, output.clone().unwrap_or(derived))
        })
        .collect())
}

fn run_jobs<F>(jobs: &[(PathBuf, PathBuf)], code: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&[Input]) -> Result<Vec<Vec<u8>>, Box<dyn std::error::Error>>,
{
    let inputs = jobs.iter().map(|(input, _)| open_input(input)).collect::<io::Result<Vec<_>>>()?;

    let start = Instant::now();
    let outputs = code(&inputs)?;
    let elapsed = start.elapsed();

    // Unmap before any output is created; an output may replace its own input
    let sizes: Vec<usize> = inputs.iter().map(|i| i.as_ref().len()).collect();
    drop(inputs);

    for ((input_path, output_path), (size, output)) in jobs.iter().zip(sizes.iter().zip(&outputs))
    {
        write_output(output_path, output)?;
        info!(
            "{} ({} bytes) -> {} ({} bytes)",
            input_path.display(),
            size,
            output_path.display(),
            output.len()
        );
    }

    let total: usize = sizes.iter().sum();
    debug!(
        "processed {} bytes in {:.2?} ({:.1} MB/s)",
        total,
        elapsed,
        total as f64 / elapsed.as_secs_f64().max(f64::EPSILON) / 1_000_000.0
    );
    Ok(())
}

fn open_input(path: &Path) -> io::Result<Input> {
    if is_stdio(path) {
        let mut buf = Vec::new();
        io::stdin().lock().read_to_end(&mut buf)?;
        return Ok(Input::Owned(buf));
    }

    let file = File::open(path)?;
    let metadata = file.metadata()?;
    // Zero-length files cannot be mapped on every platform
    if !metadata.is_file() || metadata.len() == 0 {
        let mut buf = Vec::new();
        (&file).read_to_end(&mut buf)?;
        return Ok(Input::Owned(buf));
    }

    // SAFETY: read-only mapping, released before any output file is opened
    let map = unsafe { Mmap::map(&file)? };
    Ok(Input::Mapped(map))
}

fn write_output(path: &Path, data: &[u8]) -> io::Result<()> {
    if is_stdio(path) {
        let mut stdout = io::stdout().lock();
        stdout.write_all(data)?;
        return stdout.flush();
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(data)?;
    writer.flush()
}

fn is_stdio(path: &Path) -> bool {
    path.to_str() == Some("-")
}

fn append_ext(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

fn strip_ext(path: &Path, ext: &str) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some(ext) {
        path.with_extension("")
    } else {
        path.to_path_buf()
    }
}
