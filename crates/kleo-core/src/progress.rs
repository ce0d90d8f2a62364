// ─────────────────────────────────────────────────────────────────────
// Kleopatra Orbit Search — Progress
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Best-effort progress observers for long grid computations.
//!
//! Observers are called from worker threads and must return immediately.
//! [`ConsoleProgress`] skips a redraw whenever another thread holds the
//! terminal instead of waiting for it.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

const GREEN: &str = "\x1b[92m";
const BLUE: &str = "\x1b[94m";
const RESET: &str = "\x1b[0m";

/// Observer of a staged computation. All methods default to no-ops.
pub trait ProgressObserver: Send + Sync {
    fn on_start(&self, _stage: &str, _total: usize) {}
    fn on_progress(&self, _done: usize, _total: usize) {}
    fn on_finish(&self, _stage: &str, _elapsed: Duration) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Text progress bar on stderr.
#[derive(Debug)]
pub struct ConsoleProgress {
    width: usize,
    fill: char,
    last_cells: AtomicUsize,
    terminal: Mutex<()>,
}

impl ConsoleProgress {
    pub fn new(width: usize, fill: char) -> Self {
        ConsoleProgress {
            width: width.max(1),
            fill,
            last_cells: AtomicUsize::new(usize::MAX),
            terminal: Mutex::new(()),
        }
    }

    fn write_line(&self, line: &str) {
        let Ok(_guard) = self.terminal.try_lock() else {
            return;
        };
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(line.as_bytes());
        let _ = err.flush();
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new(40, '━')
    }
}

impl ProgressObserver for ConsoleProgress {
    fn on_start(&self, stage: &str, _total: usize) {
        self.last_cells.store(usize::MAX, Ordering::Relaxed);
        self.write_line(&format!("{BLUE}{stage}...{RESET}"));
    }

    fn on_progress(&self, done: usize, total: usize) {
        let cells = filled_cells(done, total, self.width);
        // Redraw only when the bar visibly changes or the run completes.
        let previous = self.last_cells.swap(cells, Ordering::Relaxed);
        if previous == cells && done < total {
            return;
        }
        let mut line = format!("\r{}", render_bar(done, total, self.width, self.fill));
        if done >= total {
            line.push('\n');
        }
        self.write_line(&line);
    }

    fn on_finish(&self, stage: &str, elapsed: Duration) {
        self.write_line(&format!(
            "\r{GREEN}{stage} completed in {:.3} s{RESET}\n",
            elapsed.as_secs_f64()
        ));
    }
}

fn filled_cells(done: usize, total: usize, width: usize) -> usize {
    if total == 0 {
        return width;
    }
    done.min(total) * width / total
}

/// Render `done/total ╢━━━   ╟` with the bar padded to `width` cells.
pub fn render_bar(done: usize, total: usize, width: usize, fill: char) -> String {
    let cells = filled_cells(done, total, width);
    let bar: String = std::iter::repeat(fill).take(cells).collect();
    let pad = " ".repeat(width - cells);
    format!("{done}/{total} {GREEN}╢{bar}{pad}╟{RESET}")
}
