//! Serve command: the dev server lifecycle.
//!
//! 1. Resolve configuration
//! 2. Run the initial build and stage its output in memory
//! 3. Start the source watcher and the HTTP server
//! 4. Rebuild on change, announcing each batch to connected browsers
//! 5. On Ctrl+C close every event stream and stop the server

use crate::cli::ServeArgs;
use crate::config::{NotifyMode, ServeConfig};
use crate::dev::{
    AppState, BuildAdapter, BuildEngine, CommandEngine, DevServer, FileWatcher, StoreBridge,
};
use crate::error::{BuildError, Result};
use crate::ui;
use fob_memfs::{FileInfo, VirtualFileStore};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::signal;
use tokio::sync::{mpsc, oneshot};

/// How long the server gets to finish in-flight requests on shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub async fn execute(args: ServeArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let config = ServeConfig::load(&cwd, args.config.as_deref(), &args.overrides())?;

    let shutdown = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    serve(config, cwd, shutdown).await
}

/// Run the dev server for the project at `cwd` until `shutdown` resolves.
///
/// # Errors
///
/// Fails if the initial build fails, a watch path is missing, or the
/// address cannot be bound. Later rebuild failures are only reported.
pub async fn serve(
    config: ServeConfig,
    cwd: PathBuf,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let state = AppState::from_config(&config);
    let engine = CommandEngine::new(&config.command, &cwd, &config.out_dir)?;
    let adapter = stage_adapter(&config, &state, engine.out_dir());

    ui::info(&format!("Running {}", config.command.join(" ")));
    let started = Instant::now();
    match rebuild(&engine, &adapter, &state.store).await {
        Ok(staged) => ui::print_staged_summary(&staged, started.elapsed()),
        Err(err) => {
            ui::error("Initial build failed");
            return Err(err.into());
        }
    }

    let (watcher, mut changes) = FileWatcher::new(
        cwd.clone(),
        &config.watch,
        config.ignore_patterns(),
        config.debounce_ms,
    )?;
    let watched: Vec<String> = config.watch.iter().map(|p| p.display().to_string()).collect();
    ui::info(&format!("Watching {}", watched.join(", ")));

    let server = DevServer::bind(&config.bind_address(), state.clone()).await?;
    ui::success(&ui::server_banner(&server.url()?, &config.stream_path));

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server_task = tokio::spawn(server.run(async {
        let _ = stop_rx.await;
    }));

    ui::info("Press Ctrl+C to stop");
    tokio::pin!(shutdown);

    let debounce = Duration::from_millis(config.debounce_ms);
    loop {
        tokio::select! {
            Some(change) = changes.recv() => {
                ui::info(&format!("Changed: {}", display_relative(change.path(), watcher.root())));
                let rebuild = async {
                    drain_burst(&mut changes, debounce).await;
                    rebuild_and_report(&engine, &adapter, &state.store).await;
                };
                if !until_shutdown(rebuild, &mut shutdown).await {
                    ui::info("Shutting down...");
                    break;
                }
            }

            _ = &mut shutdown => {
                ui::info("Shutting down...");
                break;
            }

            result = &mut server_task => {
                match result {
                    Ok(Err(err)) => return Err(err),
                    Ok(Ok(())) => ui::warning("Server stopped unexpectedly"),
                    Err(join_err) => ui::error(&format!("Server task failed: {}", join_err)),
                }
                return Ok(());
            }
        }
    }

    // Open event streams would otherwise hold the graceful shutdown forever.
    state.hub.close_all();
    let _ = stop_tx.send(());

    match tokio::time::timeout(SHUTDOWN_GRACE, &mut server_task).await {
        Ok(Ok(result)) => result?,
        Ok(Err(join_err)) => tracing::warn!("server task failed: {}", join_err),
        Err(_) => {
            tracing::warn!("server did not stop in time, aborting");
            server_task.abort();
        }
    }

    ui::success("Dev server stopped");
    Ok(())
}

/// Adapter for the configured notify mode.
///
/// Batch mode announces through the adapter; per-write mode registers a
/// [`StoreBridge`] on the store and leaves the adapter silent.
fn stage_adapter(config: &ServeConfig, state: &AppState, out_dir: &Path) -> BuildAdapter {
    let adapter = BuildAdapter::new(out_dir, state.store.clone()).with_prefix(&config.prefix);

    match config.notify_mode {
        NotifyMode::Batch => adapter.with_notifier(state.hub.clone()),
        NotifyMode::PerWrite => {
            StoreBridge::attach(&state.store, state.hub.clone());
            adapter
        }
    }
}

/// Build once and stage the result. Returns metadata of the staged files.
pub async fn rebuild(
    engine: &dyn BuildEngine,
    adapter: &BuildAdapter,
    store: &VirtualFileStore,
) -> Result<Vec<FileInfo>, BuildError> {
    let files = engine.build().await?;
    let paths = adapter.update(&files)?;

    Ok(paths
        .iter()
        .filter_map(|path| store.stat(path).ok())
        .collect())
}

async fn rebuild_and_report(engine: &dyn BuildEngine, adapter: &BuildAdapter, store: &VirtualFileStore) {
    let started = Instant::now();

    match rebuild(engine, adapter, store).await {
        Ok(staged) => ui::success(&format!(
            "Rebuilt {} files in {}",
            staged.len(),
            ui::format_duration(started.elapsed())
        )),
        Err(err) => {
            // Browsers keep the last good build.
            ui::error(&format!("Rebuild failed: {}", err));
        }
    }
}

/// Run `work` to completion unless `shutdown` resolves first.
///
/// Returns `false` when shutdown won; `work` is dropped mid-flight, which
/// kills a running build command.
async fn until_shutdown<S>(work: impl Future<Output = ()>, shutdown: &mut S) -> bool
where
    S: Future<Output = ()> + Unpin,
{
    tokio::select! {
        _ = work => true,
        _ = shutdown => false,
    }
}

/// Wait out the debounce window, then discard the rest of the burst.
async fn drain_burst<T>(changes: &mut mpsc::Receiver<T>, debounce: Duration) {
    tokio::time::sleep(debounce).await;

    let mut coalesced = 0usize;
    while changes.try_recv().is_ok() {
        coalesced += 1;
    }

    if coalesced > 0 {
        tracing::debug!(coalesced, "coalesced file changes into one rebuild");
    }
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
