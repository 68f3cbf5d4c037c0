mod platform;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Convert and upscale images on a PhotoPro server
struct Args {
    /// Base URL of the processing server
    #[arg(long, value_name = "URL", global = true)]
    server: Option<String>,

    /// Directory holding settings, the file registry, and the log file
    #[arg(long = "state-dir", value_name = "DIR", global = true)]
    state_dir: Option<PathBuf>,

    /// More log output; repeat for more detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an image to another format
    Convert {
        /// Image to upload
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, ignore_case = true, value_name = "FORMAT")]
        format: OutputFormat,

        /// Media type to declare instead of guessing from the extension
        #[arg(long = "media-type", value_name = "TYPE")]
        media_type: Option<String>,

        /// Save the converted file here
        #[arg(long, value_name = "PATH")]
        save: Option<PathBuf>,

        /// Run the same conversion this many more times
        #[arg(long, value_name = "N", default_value = "0")]
        again: u32,
    },
    /// Upscale an image 4x
    Upscale {
        /// Image to upload
        file: PathBuf,

        /// Upscaling model
        #[arg(long, value_name = "NAME")]
        model: Option<String>,

        /// Media type to declare instead of guessing from the extension
        #[arg(long = "media-type", value_name = "TYPE")]
        media_type: Option<String>,

        /// Save the upscaled file here
        #[arg(long, value_name = "PATH")]
        save: Option<PathBuf>,

        /// Run the same upscale this many more times
        #[arg(long, value_name = "N", default_value = "0")]
        again: u32,
    },
    /// Validate an image and show its preview details without uploading
    Preview {
        file: PathBuf,

        #[arg(long = "media-type", value_name = "TYPE")]
        media_type: Option<String>,

        /// Also show the dimensions after a 4x upscale
        #[arg(long, action = ArgAction::SetTrue)]
        upscale: bool,
    },
    /// List local and server files
    Files,
    /// Delete one local file entry by its list position
    Delete {
        index: usize,

        /// Do not ask for confirmation
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Delete every file on the server and forget local entries
    Clear {
        /// Do not ask for confirmation
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
    /// Report whether the Real-ESRGAN backend is available
    Status,
}

/// Formats the server can convert to.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Jpg,
    Png,
    Webp,
    Bmp,
}

impl OutputFormat {
    fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Jpg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
            OutputFormat::Bmp => "bmp",
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match platform::run_app(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
