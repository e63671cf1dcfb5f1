use std::cmp::min;
use std::time::Duration;

use gale_core::prelude::DelegatedShutdownListener;
use indicatif::{ProgressBar, ProgressStyle};

/// Displays a progress bar while the run executes to show how long is left.
pub(crate) fn start_progress(planned_runtime: Duration, shutdown_listener: DelegatedShutdownListener) {
    std::thread::Builder::new()
        .name("progress".to_string())
        .spawn(move || {
            let started = std::time::Instant::now();
            let pb = ProgressBar::new(planned_runtime.as_secs());
            pb.set_style(
                ProgressStyle::with_template(
                    "{spinner:.green} [{wide_bar:.cyan/blue}] {pos}s / {len}s",
                )
                .expect("Failed to set progress style")
                .progress_chars("#>-"),
            );

            loop {
                if shutdown_listener.should_shutdown() {
                    log::trace!("Progress thread shutting down");
                    pb.finish_and_clear();
                    break;
                }

                pb.set_position(min(started.elapsed().as_secs(), planned_runtime.as_secs()));
                std::thread::sleep(Duration::from_secs(1));
            }
        })
        .expect("Failed to start progress thread");
}
