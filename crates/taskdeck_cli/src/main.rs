//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `taskdeck_core` linkage.
//! - Run a short scripted session against in-memory storage with
//!   deterministic output.

use taskdeck_core::logging::init_logging_from_config;
use taskdeck_core::{
    CoreConfig, FilterPatch, MemoryKvStore, NewTask, StatusFilter, TaskPriority, TaskStore,
};

fn main() {
    // File logging only when TASKDECK_LOG_DIR is set.
    if let Err(err) = init_logging_from_config(&CoreConfig::from_env()) {
        eprintln!("logging disabled: {err}");
    }

    println!("taskdeck_core ping={}", taskdeck_core::ping());
    println!("taskdeck_core version={}", taskdeck_core::core_version());

    let mut store = TaskStore::new(MemoryKvStore::new());
    if let Err(err) = store.load() {
        eprintln!("load failed: {err}");
        std::process::exit(1);
    }

    let milk = store.add(NewTask::new("Buy milk", TaskPriority::High));
    store.add(NewTask::new("Clean house", TaskPriority::Medium));
    if let Err(err) = store.toggle_complete(&milk.id) {
        eprintln!("toggle failed: {err}");
        std::process::exit(1);
    }

    store.set_filter(&FilterPatch {
        status: Some(StatusFilter::Active),
        ..FilterPatch::default()
    });
    let counts = store.counts();
    println!(
        "tasks total={} active={} completed={} visible={}",
        counts.total,
        counts.active,
        counts.completed,
        store.filtered_tasks().len()
    );
}
