use std::path::PathBuf;

use clap::Parser;

/// Generate an image from a text prompt
#[derive(Debug, Parser)]
#[command(name = "promptpix", about = "Turn keywords into a generated image URL")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "promptpix.toml", env = "PROMPTPIX_CONFIG")]
    pub config: PathBuf,

    /// Generate once for these keywords and exit; omit for interactive mode
    pub prompt: Vec<String>,
}

impl Args {
    /// Keywords given on the command line, joined by spaces
    pub fn one_shot_prompt(&self) -> Option<String> {
        (!self.prompt.is_empty()).then(|| self.prompt.join(" "))
    }
}
