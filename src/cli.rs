use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agri-advisor",
    version,
    about = "Crop, fertilizer and irrigation advice from soil, season and weather"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compose an advisory for a field
    Advise(AdviseArgs),
    /// Show the loaded rule table
    Rules,
    /// List supported translation languages
    Languages,
    /// List accepted soil types, seasons and common crops
    Options {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Translate texts with the configured provider
    Translate(TranslateArgs),
    /// Run interactive setup
    Init,
    /// Validate config and test connections
    Check,
}

#[derive(Args, Debug, Clone)]
pub struct AdviseArgs {
    /// Soil type (Sandy, Clay, Loamy, Black, Red, Alluvial)
    #[arg(long)]
    pub soil: String,

    /// Season (Kharif, Rabi, Summer, Winter)
    #[arg(long)]
    pub season: String,

    /// Crop to validate; omit for a crop recommendation
    #[arg(long)]
    pub crop: Option<String>,

    /// City for current weather
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub location: Option<String>,

    /// Latitude for current weather
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude for current weather
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Skip weather even when a default location is configured
    #[arg(long)]
    pub no_weather: bool,

    /// Translate the advisory (en, hi, pa)
    #[arg(long)]
    pub lang: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TranslateArgs {
    /// Target language (en, hi, pa)
    #[arg(long)]
    pub lang: String,

    /// Texts to translate
    #[arg(required = true)]
    pub texts: Vec<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_advise_with_coordinates() {
        let cli = Cli::try_parse_from([
            "agri-advisor",
            "advise",
            "--soil",
            "Clay",
            "--season",
            "Kharif",
            "--crop",
            "Rice",
            "--lat",
            "30.9",
            "--lon",
            "-75.8",
            "--lang",
            "hi",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Advise(args) => {
                assert_eq!(args.soil, "Clay");
                assert_eq!(args.crop.as_deref(), Some("Rice"));
                assert_eq!(args.lat, Some(30.9));
                assert_eq!(args.lon, Some(-75.8));
                assert_eq!(args.lang.as_deref(), Some("hi"));
                assert!(!args.json);
            }
            _ => panic!("expected advise"),
        }
    }

    #[test]
    fn location_conflicts_with_coordinates() {
        let result = Cli::try_parse_from([
            "agri-advisor",
            "advise",
            "--soil",
            "Clay",
            "--season",
            "Kharif",
            "--location",
            "Delhi",
            "--lat",
            "1",
            "--lon",
            "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_translate_texts() {
        let cli = Cli::try_parse_from([
            "agri-advisor",
            "translate",
            "--lang",
            "pa",
            "rice crop",
            "wheat",
        ])
        .unwrap();
        match cli.command {
            Commands::Translate(args) => {
                assert_eq!(args.lang, "pa");
                assert_eq!(args.texts, vec!["rice crop", "wheat"]);
            }
            _ => panic!("expected translate"),
        }
    }

    #[test]
    fn translate_requires_text() {
        let result = Cli::try_parse_from(["agri-advisor", "translate", "--lang", "hi"]);
        assert!(result.is_err());
    }

    #[test]
    fn latitude_requires_longitude() {
        let result = Cli::try_parse_from([
            "agri-advisor", "advise", "--soil", "Clay", "--season", "Kharif", "--lat", "1",
        ]);
        assert!(result.is_err());
    }
}
