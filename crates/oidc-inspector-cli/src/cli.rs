//! CLI argument parsing types

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI application structure
#[derive(Parser, Debug)]
#[command(
    name = "oidc-inspector",
    version,
    about = "Inspect OpenID Connect / OAuth 2.0 discovery documents",
    long_about = "Fetches an authorization server's discovery document, classifies its \
                  fields (endpoints, capabilities, other), validates them against \
                  OIDC Discovery 1.0 / RFC 8414 structural rules, and cross-checks \
                  jwks_uri against the published JWK Set.\n\n\
                  This tool only inspects metadata; it never joins a protocol flow, \
                  issues no tokens, and verifies no signatures."
)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Enable verbose output (tracing to stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch and inspect a discovery document from an issuer URL
    Inspect(InspectArgs),

    /// Inspect a pasted document (from a file, or stdin with no argument)
    Paste(PasteArgs),
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Issuer base URL or full discovery document URL
    pub url: String,

    /// Use the RFC 8414 path (/.well-known/oauth-authorization-server)
    /// instead of OIDC Discovery
    #[arg(long)]
    pub oauth: bool,

    /// Skip the key-set fetch; jwks_uri stays pending
    #[arg(long)]
    pub no_jwks: bool,
}

#[derive(Args, Debug)]
pub struct PasteArgs {
    /// File holding the document; stdin when omitted
    pub file: Option<PathBuf>,

    /// Fetch and cross-check jwks_uri as well
    #[arg(long)]
    pub jwks: bool,
}

/// Output format selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Labeled groups with colored pass/error/pending badges
    Human,
    /// Machine-readable JSON report
    Json,
}
