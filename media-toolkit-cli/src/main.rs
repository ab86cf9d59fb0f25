use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use media_toolkit::audio::extract_audio;
use media_toolkit::audio::format::DEFAULT_BITRATE;
use media_toolkit::ffmpeg::ToolStatus;
use media_toolkit::imaging::format::{clamp_quality, is_image_filename, DEFAULT_QUALITY};
use media_toolkit::imaging::{convert_image, image_info};
use media_toolkit::pdf::merge::merge_files;
use media_toolkit::pdf::split::{extract_pages, split_into_pages};
use media_toolkit::pdf::{is_pdf_filename, pdf_info};
use media_toolkit::video::compress::{
    compress_to_resolution, compress_to_target_size, compress_with_quality,
};
use media_toolkit::video::planner::{
    clamp_parts, estimate_size, format_duration, plan_parts, EstimateParams, PartPlan,
};
use media_toolkit::video::presets::is_video_path;
use media_toolkit::video::probe::{probe_duration, video_summary};
use media_toolkit::video::split::split_video;
use media_toolkit::video::validate_video_path;

#[derive(Parser)]
#[command(
    name = "mediakit",
    about = "Local media processing: images, PDFs, audio and video",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a media, PDF or image file
    Info {
        /// Input file
        input: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert an image to another format
    Convert {
        /// Input image file
        input: PathBuf,

        /// Output format (png, jpg, jpeg, webp, gif, bmp, tiff)
        #[arg(short = 'f', long)]
        format: String,

        /// Quality 1-100, for jpg/jpeg output
        #[arg(short, long)]
        quality: Option<i64>,

        /// Output file (defaults to the input name with the new extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Merge multiple PDFs into one
    Merge {
        /// Input PDF files, in merge order
        files: Vec<PathBuf>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Split a PDF into pages, or extract a page range
    SplitPdf {
        /// Input PDF file
        input: PathBuf,

        /// Pages to extract (e.g., "1,3,5-7"); omit to split every page
        #[arg(long)]
        pages: Option<String>,

        /// Output directory (defaults to the input's directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract the audio track from a video
    ExtractAudio {
        /// Input video file
        input: PathBuf,

        /// Audio format (mp3, aac, wav, flac, ogg)
        #[arg(short = 'f', long, default_value = "mp3")]
        format: String,

        /// Bitrate in kbps, ignored for lossless formats
        #[arg(short, long, default_value = DEFAULT_BITRATE)]
        bitrate: String,

        /// Output file (defaults to the input name with the audio extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Split a video into equal parts
    SplitVideo {
        /// Input video file
        input: PathBuf,

        /// Number of parts (2-20)
        #[arg(short = 'n', long, default_value = "2")]
        parts: i64,

        /// Output directory (defaults to the input's directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Preview how a video would split, without splitting it
    Plan {
        /// Input video file
        input: PathBuf,

        /// Number of parts (2-20)
        #[arg(short = 'n', long, default_value = "2")]
        parts: i64,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compress a video by target size, quality preset or resolution
    Compress {
        /// Input video file
        input: PathBuf,

        /// Target size in MB (two-pass encode)
        #[arg(long)]
        target_size: Option<f64>,

        /// Quality preset: high, medium or low
        #[arg(long)]
        quality: Option<String>,

        /// Resolution: 2160p, 1440p, 1080p, 720p, 480p or 360p
        #[arg(long)]
        resolution: Option<String>,

        /// Output file (defaults next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print a size estimate instead of encoding
        #[arg(long)]
        estimate: bool,
    },

    /// Check that ffmpeg and ffprobe are available
    CheckTools,
}

enum CompressMode {
    TargetSize(f64),
    Quality(String),
    Resolution { resolution: String, quality: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { input, json } => {
            let filename = input
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            if is_pdf_filename(&filename) {
                let info = pdf_info(&input, &filename)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                } else {
                    println!("PDF: {}", info.filename);
                    println!("Pages: {}", info.num_pages);
                    println!("Size: {} bytes", info.size_bytes);
                }
            } else if is_image_filename(&filename) {
                let info = image_info(&input, &filename)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                } else {
                    println!("Image: {}", info.filename);
                    println!("Format: {}", info.format);
                    println!("Mode: {}", info.mode);
                    println!("Dimensions: {}x{}", info.width, info.height);
                    println!("Size: {} bytes", info.size_bytes);
                }
            } else if is_video_path(&input) {
                let summary = video_summary(&input).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                } else {
                    println!("Video: {filename}");
                    println!(
                        "Duration: {} ({:.1}s)",
                        summary.duration_formatted, summary.duration
                    );
                    println!("Resolution: {}", summary.resolution);
                    println!("Codec: {}", summary.codec);
                    println!("Size: {} bytes", summary.file_size);
                }
            } else {
                eprintln!("Unsupported file type: {}", input.display());
                std::process::exit(1);
            }
        }

        Commands::Convert {
            input,
            format,
            quality,
            output,
        } => {
            let quality = quality.map(clamp_quality).unwrap_or(DEFAULT_QUALITY);
            let output = output.unwrap_or_else(|| input.with_extension(&format));
            if output == input {
                eprintln!(
                    "Output would overwrite the input; pass -o to choose another path"
                );
                std::process::exit(1);
            }

            let (bytes, _) = convert_image(&input, &format, quality)?;
            std::fs::write(&output, &bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("✓ Converted to {} ({} bytes)", output.display(), bytes.len());
        }

        Commands::Merge { files, output } => {
            if files.len() < 2 {
                eprintln!("Need at least 2 PDFs to merge");
                std::process::exit(1);
            }
            for file in &files {
                if !is_pdf_filename(&file.to_string_lossy()) {
                    eprintln!("File '{}' is not a PDF", file.display());
                    std::process::exit(1);
                }
            }

            let bytes = merge_files(&files)?;
            std::fs::write(&output, &bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!("✓ Merged {} files into {}", files.len(), output.display());
        }

        Commands::SplitPdf {
            input,
            pages,
            output,
        } => {
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document")
                .to_string();
            let out_dir = output.unwrap_or_else(|| {
                input
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."))
            });
            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;

            match pages {
                Some(spec) => {
                    let bytes = extract_pages(&input, &spec)?;
                    let out = out_dir.join(format!("{stem}_extracted.pdf"));
                    std::fs::write(&out, bytes)?;
                    println!("✓ Extracted pages {spec} to {}", out.display());
                }
                None => {
                    let parts = split_into_pages(&input, &stem)?;
                    let count = parts.len();
                    for (name, bytes) in parts {
                        std::fs::write(out_dir.join(&name), bytes)?;
                    }
                    println!("✓ Split into {count} pages in {}", out_dir.display());
                }
            }
        }

        Commands::ExtractAudio {
            input,
            format,
            bitrate,
            output,
        } => {
            validate_video_path(&input)?;
            let (bytes, audio_format) = extract_audio(&input, &format, &bitrate).await?;
            let output = output.unwrap_or_else(|| input.with_extension(audio_format.extension));
            std::fs::write(&output, &bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "✓ Extracted {} audio to {} ({} bytes)",
                audio_format.name,
                output.display(),
                bytes.len()
            );
        }

        Commands::SplitVideo {
            input,
            parts,
            output,
        } => {
            validate_video_path(&input)?;
            let num_parts = clamp_parts(parts);
            let duration = probe_duration(&input).await?;
            println!(
                "Splitting {} ({}) into {num_parts} parts:",
                input.display(),
                format_duration(duration)
            );
            print_plan(&plan_parts(duration, num_parts));

            let files = split_video(&input, num_parts as i64, output.as_deref()).await?;
            println!("✓ Wrote {} parts:", files.len());
            for file in &files {
                println!("  {}", file.display());
            }
        }

        Commands::Plan { input, parts, json } => {
            validate_video_path(&input)?;
            let num_parts = clamp_parts(parts);
            let duration = probe_duration(&input).await?;
            let plan = plan_parts(duration, num_parts);

            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                println!(
                    "Total duration: {} ({duration:.1}s)",
                    format_duration(duration)
                );
                print_plan(&plan);
            }
        }

        Commands::Compress {
            input,
            target_size,
            quality,
            resolution,
            output,
            estimate,
        } => {
            let mode = match (target_size, resolution, quality) {
                (Some(mb), None, None) => CompressMode::TargetSize(mb),
                (None, Some(resolution), quality) => CompressMode::Resolution {
                    resolution,
                    quality: quality.unwrap_or_else(|| "medium".to_string()),
                },
                (None, None, Some(quality)) => CompressMode::Quality(quality),
                _ => {
                    eprintln!(
                        "Pass exactly one of --target-size, --quality or --resolution \
                         (--quality may accompany --resolution)"
                    );
                    std::process::exit(1);
                }
            };

            validate_video_path(&input)?;
            if estimate {
                print_estimate(&input, &mode).await?;
                return Ok(());
            }

            let out = match &mode {
                CompressMode::TargetSize(mb) => {
                    compress_to_target_size(&input, *mb, output).await?
                }
                CompressMode::Quality(quality) => {
                    compress_with_quality(&input, quality, output).await?
                }
                CompressMode::Resolution {
                    resolution,
                    quality,
                } => compress_to_resolution(&input, resolution, quality, output).await?,
            };

            let original = std::fs::metadata(&input)?.len();
            let compressed = std::fs::metadata(&out)?.len();
            let reduction = (1.0 - compressed as f64 / original as f64) * 100.0;
            println!("✓ Compressed to {}", out.display());
            println!(
                "  {:.1} MB -> {:.1} MB ({reduction:.1}% smaller)",
                mb(original),
                mb(compressed)
            );
        }

        Commands::CheckTools => {
            let status = ToolStatus::detect();
            match &status.ffmpeg {
                Some(path) => println!("ffmpeg:  {}", path.display()),
                None => println!("ffmpeg:  not found"),
            }
            match &status.ffprobe {
                Some(path) => println!("ffprobe: {}", path.display()),
                None => println!("ffprobe: not found"),
            }

            if !status.all_present() {
                eprintln!("Install ffmpeg to enable audio and video operations");
                std::process::exit(1);
            }
            println!("✓ All tools available");
        }
    }

    Ok(())
}

fn print_plan(parts: &[PartPlan]) {
    println!("Part  Start     End       Duration");
    for part in parts {
        println!(
            "{:<5} {:<9} {:<9} {}",
            part.part, part.start, part.end, part.duration
        );
    }
}

async fn print_estimate(input: &Path, mode: &CompressMode) -> Result<()> {
    let summary = video_summary(input).await?;
    let params = match mode {
        CompressMode::TargetSize(mb) => EstimateParams {
            mode: "target_size".to_string(),
            target_size_mb: Some(*mb),
            ..Default::default()
        },
        CompressMode::Quality(quality) => EstimateParams {
            mode: "quality".to_string(),
            quality: Some(quality.clone()),
            ..Default::default()
        },
        CompressMode::Resolution {
            resolution,
            quality,
        } => EstimateParams {
            mode: "resolution".to_string(),
            resolution: Some(resolution.clone()),
            quality: Some(quality.clone()),
            ..Default::default()
        },
    };

    let estimate = estimate_size(
        &params,
        summary.file_size as f64 / 1024.0 / 1024.0,
        summary.width,
        summary.height,
    );
    println!("Original:  {:.2} MB", estimate.original_size_mb);
    println!(
        "Estimated: {:.2} MB ({:.1}% reduction)",
        estimate.estimated_size_mb, estimate.estimated_reduction_percent
    );
    Ok(())
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}
