//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "steep")]
#[command(about = "A wall-clock-accurate countdown timer service")]
#[command(version = "0.2.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "2500")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Initial countdown duration, minutes part
    #[arg(short, long, default_value = "0")]
    pub minutes: u64,

    /// Initial countdown duration, seconds part
    #[arg(short, long, default_value = "0")]
    pub seconds: u64,

    /// Resync cadence for the ticker in milliseconds
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u64).range(10..))]
    pub tick_ms: u64,

    /// Command held open while the countdown runs to keep the host awake
    #[arg(long)]
    pub keep_awake_command: Option<String>,

    /// Command run when the countdown completes
    #[arg(long)]
    pub alert_command: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
