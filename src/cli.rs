use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract localization keys from HTML and translate them to English
    Extract {
        /// Translation key prefix (e.g. SURVEY)
        #[arg(short, long)]
        prefix: String,

        /// Input HTML file (reads stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Model id (see `models`)
        #[arg(short, long)]
        model: Option<String>,

        /// API key for the model's backend (defaults to the configured env var)
        #[arg(short = 'k', long)]
        api_key: Option<String>,

        /// Output JSON file (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract localization keys and translate them to Spanish, English, French and Portuguese
    Multi {
        /// Translation key prefix (e.g. SURVEY)
        #[arg(short, long)]
        prefix: String,

        /// Input HTML file (reads stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Model id (see `models`)
        #[arg(short, long)]
        model: Option<String>,

        /// API key for the model's backend (defaults to the configured env var)
        #[arg(short = 'k', long)]
        api_key: Option<String>,

        /// Output directory for one JSON file per language (prints to stdout when omitted)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// List available models
    Models {
        /// Only list models served by this backend (openai, google)
        #[arg(short, long)]
        backend: Option<String>,
    },

    /// Write the default configuration file
    InitConfig {
        /// Destination path
        #[arg(short, long, default_value = "lokalize.toml")]
        output: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extract() {
        let args = Args::try_parse_from([
            "lokalize", "-v", "extract", "-p", "SURVEY", "-i", "form.html", "-m", "gpt-4",
        ])
        .unwrap();
        assert!(args.verbose);
        match args.command {
            Commands::Extract { prefix, input, model, api_key, output } => {
                assert_eq!(prefix, "SURVEY");
                assert_eq!(input, Some(PathBuf::from("form.html")));
                assert_eq!(model.as_deref(), Some("gpt-4"));
                assert!(api_key.is_none());
                assert!(output.is_none());
            }
            _ => panic!("expected extract command"),
        }
    }

    #[test]
    fn test_prefix_is_required() {
        assert!(Args::try_parse_from(["lokalize", "multi", "-i", "form.html"]).is_err());
    }
}
