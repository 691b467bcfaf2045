use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use reframe::{LogLevel, VideoCodec, probe, reencode, set_native_log_level};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  reframe info input.mp4 --json\n  reframe reencode input.mp4 output.webm --codec vp8\n  reframe reencode clip.avi clip.ogg --codec theora --log-level quiet";

#[derive(Debug, Parser)]
#[command(
    name = "reframe",
    version,
    about = "Inspect and re-encode video files frame by frame",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print a file's negotiated stream parameters (alias: probe).
    #[command(
        visible_alias = "probe",
        after_help = "Examples:\n  reframe info input.mp4\n  reframe info input.mp4 --json"
    )]
    Info {
        /// Input video path.
        input: PathBuf,

        /// Output as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Re-encode a video into another codec/container.
    #[command(
        after_help = "Examples:\n  reframe reencode input.mp4 output.webm --codec vp8\n  reframe reencode input.mp4 output.avi --codec ffvhuff"
    )]
    Reencode {
        /// Input video path.
        input: PathBuf,

        /// Output video path; the container is inferred from the extension.
        output: PathBuf,

        /// Output video codec (mpeg4, h264, hevc, vp8, vp9, theora, ffvhuff).
        #[arg(long)]
        codec: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(name) = &cli.log_level {
        match LogLevel::from_name(name) {
            Some(level) => set_native_log_level(level),
            None => {
                eprintln!("{} unknown log level '{name}'", "error:".red().bold());
                return ExitCode::FAILURE;
            }
        }
    }

    let result = match cli.command {
        Commands::Info { input, json } => run_info(&input, json),
        Commands::Reencode {
            input,
            output,
            codec,
        } => run_reencode(&input, &output, &codec),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run_info(input: &PathBuf, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let parameters = probe(input)?;

    if as_json {
        let audio = parameters.audio.as_ref().map(|audio| {
            json!({
                "codec": audio.codec_name,
                "sample_rate": audio.sample_rate,
                "channels": audio.channels.count(),
            })
        });
        let value = json!({
            "path": input.display().to_string(),
            "width": parameters.width,
            "height": parameters.height,
            "frame_rate": {
                "numerator": parameters.frame_rate.numerator(),
                "denominator": parameters.frame_rate.denominator(),
                "value": parameters.frame_rate.value(),
            },
            "bit_rate": parameters.bit_rate,
            "codec": parameters.codec_name,
            "duration_seconds": parameters.duration.as_secs_f64(),
            "audio": audio,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", input.display().to_string().bold());
    println!(
        "  {} {}x{}",
        "size:".cyan(),
        parameters.width,
        parameters.height
    );
    println!(
        "  {} {} ({:.3} fps)",
        "frame rate:".cyan(),
        parameters.frame_rate,
        parameters.frame_rate.value()
    );
    println!("  {} {}", "codec:".cyan(), parameters.codec_name);
    if parameters.bit_rate > 0 {
        println!("  {} {} b/s", "bit rate:".cyan(), parameters.bit_rate);
    }
    println!(
        "  {} {:.2}s",
        "duration:".cyan(),
        parameters.duration.as_secs_f64()
    );
    match &parameters.audio {
        Some(audio) => println!(
            "  {} {} @ {} Hz, {} ch",
            "audio:".cyan(),
            audio.codec_name,
            audio.sample_rate,
            audio.channels.count()
        ),
        None => println!("  {} none", "audio:".cyan()),
    }

    Ok(())
}

fn run_reencode(
    input: &PathBuf,
    output: &PathBuf,
    codec_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let codec = VideoCodec::from_name(codec_name)
        .ok_or_else(|| format!("unknown codec '{codec_name}'"))?;

    let summary = reencode(input, output, codec)?;

    println!(
        "{} {} frames ({:.2}s) -> {}",
        "re-encoded".green().bold(),
        summary.frames,
        summary.duration.as_secs_f64(),
        output.display(),
    );
    Ok(())
}
