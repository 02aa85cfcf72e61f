//! Command-line arguments for the `atelier` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::config::AtelierConfig;

/// Let a DALL-E generator and a vision critic refine an image together.
///
/// Every flag is optional; with none the built-in demo runs.
#[derive(Parser, Debug, Default)]
#[command(name = "atelier", version, about)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of agent turns
    #[arg(long)]
    pub max_rounds: Option<u32>,

    /// Where to write the image
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Opening message sent to the generator
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Apply flags on top of file and environment settings.
    pub fn apply(&self, config: &mut AtelierConfig) {
        if let Some(rounds) = self.max_rounds {
            config.max_rounds = rounds;
        }
        if let Some(ref output) = self.output {
            config.image_path = output.clone();
        }
        if let Some(ref prompt) = self.prompt {
            config.opening_message = prompt.clone();
        }
    }

    /// Tracing filter used when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "atelier=debug"
        } else {
            "atelier=info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_is_valid() {
        let cli = Cli::try_parse_from(["atelier"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.max_rounds.is_none());
        assert!(!cli.verbose);
        assert_eq!(cli.default_log_filter(), "atelier=info");
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "atelier",
            "--max-rounds",
            "3",
            "-o",
            "out/cat.png",
            "--prompt",
            "Draw a dog",
            "-v",
        ])
        .unwrap();
        let mut config = AtelierConfig::default();

        cli.apply(&mut config);

        assert_eq!(config.max_rounds, 3);
        assert_eq!(config.image_path, PathBuf::from("out/cat.png"));
        assert_eq!(config.opening_message, "Draw a dog");
        assert_eq!(cli.default_log_filter(), "atelier=debug");
    }

    #[test]
    fn non_numeric_rounds_is_error() {
        assert!(Cli::try_parse_from(["atelier", "--max-rounds", "ten"]).is_err());
    }
}
