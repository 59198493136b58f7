//! `record-reconcile` — merge an edited description with the server's record.
//!
//! Usage:
//!   record-reconcile <remote.json> <local.json> [resource-id]
//!
//! The merged record is written to stdout as JSON. Identifier fields only
//! the remote record has are copied across; everything else comes from the
//! local description. When a resource id is given it is written at the
//! configured canonical path (`/resourceInfo/id` by default).
//!
//! Set `RECORD_RECONCILE_CONFIG` to a TOML file to override the defaults,
//! and `RUST_LOG` to control logging on stderr.

use std::io::{self, Write};
use std::path::PathBuf;

use record_reconcile::cli::reconcile_files;
use record_reconcile::config::ReconcileConfig;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (remote, local) = match (args.get(1), args.get(2)) {
        (Some(r), Some(l)) => (PathBuf::from(r), PathBuf::from(l)),
        _ => {
            eprintln!("Usage: record-reconcile <remote.json> <local.json> [resource-id]");
            std::process::exit(1);
        }
    };
    let id = args.get(3).map(String::as_str);

    let config = match ReconcileConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    match reconcile_files(&remote, &local, id, &config) {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{}", output.json) {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }
}
