//! Grouprole synchronization driver
//!
//! Loads role definitions from a manifest, synchronizes each selected
//! role's permissions onto its persisted group and reports per-role
//! success or failure. A single role failing to bind does not abort the
//! batch.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use grouprole_roles::{
    LoadOptions, RoleDefinition, RoleInstance, RoleManifest, RoleRegistry, RolesConfig,
    SetupObserver, SignalHub, SourceCatalog,
};
use grouprole_store::{MemoryBackend, RoleBackend, StoreState};

/// Synchronize declared roles onto persisted groups.
#[derive(Parser, Debug)]
#[command(name = "grouprole")]
#[command(about = "Populate group permissions from declared roles")]
struct Args {
    /// Roles to set up (default: all registered roles)
    roles: Vec<String>,

    /// Clear role/group permissions before setting the declared ones
    #[arg(short = 'c', long)]
    clear: bool,

    /// Enable fuzzy role name matching (spaces, dash, underscore and case
    /// are ignored)
    #[arg(short = 'F', long)]
    fuzzy: bool,

    /// Path of the role manifest to load roles from
    #[arg(long, env = "GROUPROLE_ROLES_MANIFEST")]
    manifest: PathBuf,

    /// Path of the JSON store snapshot to synchronize against; loaded
    /// before the run and written back after
    #[arg(long, env = "GROUPROLE_STORE")]
    store: Option<PathBuf>,
}

/// Logs setup notifications as they are dispatched.
struct LoggingObserver;

impl SetupObserver for LoggingObserver {
    fn pre_setup(&self, role: &RoleDefinition, clear: bool) {
        tracing::debug!(role = %role.name(), clear, "starting role setup");
    }

    fn post_setup(&self, role: &RoleDefinition) {
        tracing::debug!(role = %role.name(), "finished role setup");
    }
}

fn normalize(name: &str) -> String {
    name.to_lowercase().replace(['-', '_'], " ")
}

/// Whether a role name passes the selection.
///
/// An empty selection matches everything; otherwise an exact match is
/// required, or a normalized one when fuzzy matching is enabled.
fn matches_selection(name: &str, selection: &[String], fuzzy: bool) -> bool {
    if selection.is_empty() || selection.iter().any(|s| s == name) {
        return true;
    }
    fuzzy && selection.iter().any(|s| normalize(s) == normalize(name))
}

/// Run the synchronization batch, writing user-facing progress to `out`.
///
/// Binding failures are reported per role and the batch continues; any
/// other error aborts the run.
fn sync_roles(
    registry: &RoleRegistry,
    backend: &dyn RoleBackend,
    signals: &SignalHub,
    args: &Args,
    out: &mut dyn Write,
) -> Result<()> {
    if args.clear {
        writeln!(out, "Clear mode enabled, already bound permissions will be removed!")?;
    }

    for (name, definition) in registry.iter() {
        if !matches_selection(name, &args.roles, args.fuzzy) {
            continue;
        }
        writeln!(out, "Setting permissions for role \"{name}\"...")?;
        let instance = RoleInstance::new(definition, backend).with_signals(signals);
        match instance.setup_permissions(args.clear) {
            Ok(()) => writeln!(out, "Role \"{name}\" setup completed!")?,
            Err(err) if err.is_binding() => {
                writeln!(out, "Unable to bind permission to \"{name}\" ({err})")?;
            }
            Err(err) => return Err(err).context(format!("synchronizing role {name}")),
        }
    }

    Ok(())
}

fn load_backend(store: Option<&Path>) -> Result<MemoryBackend> {
    match store {
        Some(path) if path.exists() => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading store snapshot {}", path.display()))?;
            let state: StoreState = serde_json::from_str(&json)
                .with_context(|| format!("parsing store snapshot {}", path.display()))?;
            Ok(MemoryBackend::from_state(state))
        }
        Some(path) => {
            tracing::warn!(path = %path.display(), "store snapshot missing, starting empty");
            Ok(MemoryBackend::new())
        }
        None => {
            tracing::warn!("no store snapshot given, synchronizing against an empty store");
            Ok(MemoryBackend::new())
        }
    }
}

fn save_backend(backend: &MemoryBackend, store: Option<&Path>) -> Result<()> {
    if let Some(path) = store {
        let json = serde_json::to_string_pretty(&backend.state())?;
        std::fs::write(path, json)
            .with_context(|| format!("writing store snapshot {}", path.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let module = args.manifest.display().to_string();
    let json = std::fs::read_to_string(&args.manifest)
        .with_context(|| format!("reading role manifest {module}"))?;
    let source = RoleManifest::from_json(&json)?.into_source()?;
    let catalog = SourceCatalog::new().with_source(module.clone(), source);
    let config = RolesConfig::module(module);

    let mut registry = RoleRegistry::new();
    registry.load(&catalog, &config, LoadOptions::default())?;

    let backend = load_backend(args.store.as_deref())?;
    let mut signals = SignalHub::new();
    signals.subscribe(LoggingObserver);

    sync_roles(&registry, &backend, &signals, &args, &mut std::io::stdout())?;
    save_backend(&backend, args.store.as_deref())?;

    Ok(())
}
