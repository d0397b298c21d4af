//! Command-line value types mapped onto library enums.

use clap::ValueEnum;

use tilepath_lib::{RouteOutputFormat, SearchStrategy};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl From<OutputFormat> for RouteOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => RouteOutputFormat::Text,
            OutputFormat::Json => RouteOutputFormat::Json,
        }
    }
}

/// Search strategy selectable with `--strategy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Dijkstra,
    BestFirst,
}

impl From<StrategyArg> for SearchStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Dijkstra => SearchStrategy::Dijkstra,
            StrategyArg::BestFirst => SearchStrategy::BestFirst,
        }
    }
}

/// Log line format selectable with `--log-format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}
