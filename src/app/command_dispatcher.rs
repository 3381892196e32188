//! CLI command routing: runs the subcommand against the runtime context and
//! returns the exit outcome.

use futures_util::StreamExt;
use futures_util::future::join_all;
use indicatif::ProgressBar;
use mediacache_core::{AcquireOutcome, TransferEvent, TransferHandle, TransferOutcome};
use tracing::{info, warn};

use crate::app::context::RunContext;
use crate::app::exit_handler::{ProcessExit, determine_exit_outcome};
use crate::app::progress_manager::{TransferBars, set_percent};
use crate::cli::Command;

/// Runs `command` and returns the exit outcome.
pub(crate) async fn dispatch(command: &Command, ctx: &RunContext) -> ProcessExit {
    match command {
        Command::Catalog { genre, search } => {
            run_catalog_command(ctx, genre.as_deref(), search.as_deref());
            ProcessExit::Success
        }
        Command::Download { ids } => run_download_command(ctx, ids).await,
        Command::List => {
            run_list_command(ctx);
            ProcessExit::Success
        }
        Command::Remove { ids } => run_remove_command(ctx, ids).await,
        Command::Path { id } => run_path_command(ctx, id),
        Command::Status => {
            run_status_command(ctx);
            ProcessExit::Success
        }
    }
}

fn cached_marker(cached: bool) -> &'static str {
    if cached { "*" } else { " " }
}

fn run_catalog_command(ctx: &RunContext, genre: Option<&str>, search: Option<&str>) {
    let items = ctx.catalog.search(search.unwrap_or(""), genre);
    if items.is_empty() {
        println!("No catalog items match.");
        return;
    }
    for item in items {
        println!(
            "{} {:>4}  {} ({}, {})  [{}]",
            cached_marker(ctx.cache.is_cached(&item.id)),
            item.id,
            item.title,
            item.release_year,
            item.duration,
            item.genres.join(", ")
        );
    }
}

fn run_list_command(ctx: &RunContext) {
    let records = ctx.cache.records();
    if records.is_empty() {
        println!("No cached items.");
        return;
    }
    for record in records {
        println!(
            "{:>4}  {:<40} {:>10}",
            record.item.id, record.item.title, record.download_size
        );
    }
}

fn run_status_command(ctx: &RunContext) {
    let summary = ctx.cache.storage_summary();
    println!("Cache directory: {}", ctx.cache.layout().dir().display());
    println!("Cached items:    {}", summary.items);
    println!("Storage used:    {:.1} MB", summary.total_mb);
}

fn run_path_command(ctx: &RunContext, id: &str) -> ProcessExit {
    if let Some(path) = ctx.cache.local_address(id) {
        println!("{}", path.display());
        ProcessExit::Success
    } else {
        eprintln!("{id} is not cached");
        ProcessExit::Failure
    }
}

async fn run_remove_command(ctx: &RunContext, ids: &[String]) -> ProcessExit {
    let failures = ctx.cache.evict_many(ids).await;
    for (id, error) in &failures {
        eprintln!("{id}: {error}");
    }
    let failed = failures.len();
    info!(requested = ids.len(), failed, "remove finished");
    determine_exit_outcome(ids.len() - failed, failed)
}

async fn run_download_command(ctx: &RunContext, ids: &[String]) -> ProcessExit {
    let bars = TransferBars::new(ctx.show_progress);
    let mut succeeded = 0;
    let mut failed = 0;
    let mut transfers = Vec::new();

    for id in ids {
        let Some(item) = ctx.catalog.get(id) else {
            eprintln!("{id}: not in catalog");
            failed += 1;
            continue;
        };
        if !item.downloadable {
            eprintln!("{id}: not available for download");
            failed += 1;
            continue;
        }

        match ctx.cache.acquire(item) {
            AcquireOutcome::Started(handle) => {
                let bar = bars.add(&item.id, &item.title);
                transfers.push(follow_transfer(handle, bar));
            }
            AcquireOutcome::AlreadyCached => {
                println!("{id}: already cached");
                succeeded += 1;
            }
            AcquireOutcome::AlreadyTransferring => {
                println!("{id}: already downloading");
            }
            AcquireOutcome::InvalidId => {
                eprintln!("{id}: identifier cannot be cached");
                failed += 1;
            }
        }
    }

    for (id, outcome) in join_all(transfers).await {
        match outcome {
            TransferOutcome::Completed(record) => {
                println!("{id}: downloaded ({})", record.download_size);
                succeeded += 1;
            }
            TransferOutcome::Failed { reason } => {
                eprintln!("{id}: download failed: {reason}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        warn!(succeeded, failed, "some downloads failed");
    }
    determine_exit_outcome(succeeded, failed)
}

/// Drives one transfer's bar from its event stream.
async fn follow_transfer(mut handle: TransferHandle, bar: ProgressBar) -> (String, TransferOutcome) {
    let id = handle.id().to_string();
    while let Some(event) = handle.next().await {
        match event {
            TransferEvent::Progress(percent) => set_percent(&bar, percent),
            TransferEvent::Completed(record) => {
                bar.finish_with_message(format!("done ({})", record.download_size));
                return (id, TransferOutcome::Completed(record));
            }
            TransferEvent::Failed { reason } => {
                bar.abandon_with_message("failed");
                return (id, TransferOutcome::Failed { reason });
            }
        }
    }
    bar.abandon();
    (id, handle.finish().await)
}
