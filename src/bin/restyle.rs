//! Restyle a photo through a running relay and save the result.

use clap::{Parser, ValueEnum};
use restyle::{encoder, logger, ClientConfig, ImagePayload, RelayClient, Style};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "restyle")]
#[command(about = "Restyle a photo as a lo-fi snapshot or a paper cutout collage")]
#[command(version)]
struct Cli {
    /// Photo to transform (png, jpeg or webp)
    input: PathBuf,

    /// Style to apply
    #[arg(short, long, value_enum)]
    style: StyleArg,

    /// Where to write the result. Defaults to `<input>-<style>.<ext>`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Relay endpoint
    #[arg(long, env = "RELAY_ENDPOINT")]
    endpoint: Option<String>,

    /// Log requests and responses
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Lofi,
    Cutout,
}

impl From<StyleArg> for Style {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Lofi => Style::Lofi,
            StyleArg::Cutout => Style::Cutout,
        }
    }
}

fn default_output(input: &Path, style: Style, image: &ImagePayload) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    input.with_file_name(format!(
        "{}-{}.{}",
        stem,
        style,
        image.media_type.extension()
    ))
}

async fn run(cli: Cli) -> restyle::Result<PathBuf> {
    let style = Style::from(cli.style);
    let config = match cli.endpoint {
        Some(endpoint) => ClientConfig::new().with_endpoint(endpoint),
        None => ClientConfig::from_env(),
    };

    let image = encoder::encode_file(&cli.input)?;
    let client = RelayClient::from_config(&config);

    eprintln!("Applying '{}' via {} ...", style.label(), client.endpoint());
    let result = client.transform(&image, style).await?;

    let output = cli
        .output
        .unwrap_or_else(|| default_output(&cli.input, style, &result));
    let bytes = encoder::decode(&result)?;
    std::fs::write(&output, bytes).map_err(|e| {
        restyle::RestyleError::Transformation(format!(
            "Failed to save {}: {}",
            output.display(),
            e
        ))
    })?;

    Ok(output)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose {
        logger::LogLevel::Debug
    } else {
        logger::LogLevel::Warn
    };
    if let Err(e) = logger::init_with_config(logger::LoggerConfig::new().with_level(level)) {
        eprintln!("Logging disabled: {}", e);
    }

    match run(cli).await {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            match &e {
                restyle::RestyleError::Encoding(detail) => eprintln!("Invalid file: {}", detail),
                restyle::RestyleError::Transport(_) => eprintln!("{}", e),
                _ => eprintln!("{}", e.public_message()),
            }
            ExitCode::FAILURE
        }
    }
}
