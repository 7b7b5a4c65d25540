use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::feed_list::LayoutKind;
use crate::settings::Settings;
use crate::theme::ThemeVariant;

#[derive(Parser, Debug)]
#[command(name = "loadmore")]
#[command(about = "Scroll a paged feed that loads more as you reach the end", long_about = None)]
pub struct Cli {
    /// List layout
    #[arg(short, long, value_enum)]
    pub layout: Option<LayoutKind>,

    /// Lanes for grid and staggered layouts
    #[arg(short, long)]
    pub columns: Option<usize>,

    /// Items per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Pages before the feed runs out
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Simulated fetch latency in milliseconds
    #[arg(long, value_name = "MS")]
    pub latency_ms: Option<u64>,

    /// Fail every Nth page request
    #[arg(long, value_name = "N")]
    pub fail_every: Option<u64>,

    /// Force dark mode
    #[arg(long, conflicts_with = "light")]
    pub dark: bool,

    /// Force light mode
    #[arg(long, conflicts_with = "dark")]
    pub light: bool,

    /// Custom config directory (default: ~/.config/loadmore)
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Enable verbose logging (prints log path, sets DEBUG level)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Layer command-line flags over `settings`.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(layout) = self.layout {
            settings.layout = layout;
        }
        if let Some(columns) = self.columns {
            settings.columns = columns.max(1);
        }
        if let Some(page_size) = self.page_size {
            settings.page_size = page_size.max(1);
        }
        if let Some(max_pages) = self.max_pages {
            settings.max_pages = max_pages;
        }
        if let Some(latency_ms) = self.latency_ms {
            settings.latency_ms = latency_ms;
        }
        if self.fail_every.is_some() {
            settings.fail_every = self.fail_every;
        }
        if self.dark {
            settings.theme = Some(ThemeVariant::Dark);
        } else if self.light {
            settings.theme = Some(ThemeVariant::Light);
        }
        settings
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective settings
    Show {
        /// Output format (toml or json)
        #[arg(short, long, default_value = "toml")]
        format: OutputFormat,
    },
    /// Show the settings file location
    Path,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Toml,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {s}. Use 'toml' or 'json'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let cli = Cli::parse_from([
            "loadmore",
            "--layout",
            "grid",
            "--columns",
            "4",
            "--fail-every",
            "3",
            "--light",
        ]);
        let settings = cli.apply(Settings::default());

        assert_eq!(settings.layout, LayoutKind::Grid);
        assert_eq!(settings.columns, 4);
        assert_eq!(settings.fail_every, Some(3));
        assert_eq!(settings.theme, Some(ThemeVariant::Light));
        assert_eq!(settings.page_size, Settings::default().page_size);
    }

    #[test]
    fn absent_flags_keep_settings() {
        let cli = Cli::parse_from(["loadmore"]);
        let file = Settings {
            layout: LayoutKind::Staggered,
            fail_every: Some(2),
            ..Default::default()
        };
        assert_eq!(cli.apply(file.clone()), file);
    }

    #[test]
    fn zero_columns_are_clamped() {
        let cli = Cli::parse_from(["loadmore", "-c", "0"]);
        assert_eq!(cli.apply(Settings::default()).columns, 1);
    }

    #[test]
    fn dark_and_light_conflict() {
        assert!(Cli::try_parse_from(["loadmore", "--dark", "--light"]).is_err());
    }

    #[test]
    fn config_show_parses_format() {
        let cli = Cli::parse_from(["loadmore", "config", "show", "--format", "JSON"]);
        let Some(Commands::Config(args)) = cli.command else {
            panic!("expected config command");
        };
        assert!(matches!(
            args.command,
            ConfigCommands::Show {
                format: OutputFormat::Json
            }
        ));
    }

    #[test]
    fn output_format_rejects_unknown() {
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
