//! # oidc-inspector CLI
//!
//! Terminal front end for the discovery-document inspector: fetch (or paste)
//! a document, print the classified field groups, and badge every endpoint
//! and capability check.

mod cli;
mod report;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, InspectArgs, OutputFormat, PasteArgs};
use oidc_inspector::{
    InspectorSession, KeySetAction, RetrievalError, Retriever, WellKnownPath,
    parse_pasted_document,
};
use report::{InspectionReport, render_error};
use std::io::Read;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "oidc_inspector=debug".into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<RetrievalError>() {
            Some(retrieval) => eprintln!("{}", render_error(retrieval)),
            None => eprintln!("error: {e:#}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Inspect(args) => inspect(args, cli.format).await,
        Commands::Paste(args) => paste(args, cli.format).await,
    }
}

async fn inspect(args: InspectArgs, format: OutputFormat) -> anyhow::Result<()> {
    let well_known = if args.oauth {
        WellKnownPath::OauthAuthorizationServer
    } else {
        WellKnownPath::OpenIdConfiguration
    };

    let retriever = Retriever::new()?;
    let mut session = InspectorSession::new(well_known);

    let token = session.issue_request_token();
    let fetched = retriever.fetch_document(&args.url, well_known).await?;
    let action = session.accept_document(token, fetched);

    if !args.no_jwks {
        resolve_key_set(&retriever, &mut session, action).await;
    }

    emit(&session, format)
}

async fn paste(args: PasteArgs, format: OutputFormat) -> anyhow::Result<()> {
    let raw = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let pasted = parse_pasted_document(&raw)?;
    let mut session = InspectorSession::new(WellKnownPath::OpenIdConfiguration);
    let action = session.load_document(pasted);

    if args.jwks {
        let retriever = Retriever::new()?;
        resolve_key_set(&retriever, &mut session, action).await;
    }

    emit(&session, format)
}

async fn resolve_key_set(
    retriever: &Retriever,
    session: &mut InspectorSession,
    action: Option<KeySetAction>,
) {
    if action != Some(KeySetAction::IssueKeySetFetch) {
        return;
    }
    let Some(uri) = session.key_set_uri().map(str::to_string) else {
        return;
    };
    let status = retriever.fetch_key_set(&uri).await;
    session.complete_key_set_fetch(status);
}

fn emit(session: &InspectorSession, format: OutputFormat) -> anyhow::Result<()> {
    let report = InspectionReport::from_session(session);
    match format {
        OutputFormat::Human => {
            let mut stdout = std::io::stdout().lock();
            report.render(&mut stdout)?;
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
