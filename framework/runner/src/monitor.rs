use gale_core::prelude::DelegatedShutdownListener;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, MINIMUM_CPU_UPDATE_INTERVAL};

/// Monitor the load generator's own resource usage and report high usage.
///
/// A saturated generator produces latency numbers that say more about the
/// generator than the target, so sustained high CPU usage gets a warning. The
/// run itself is not interrupted.
pub(crate) fn start_monitor(shutdown_listener: DelegatedShutdownListener) {
    std::thread::Builder::new()
        .name("monitor".to_string())
        .spawn(move || {
            let this_process_pid = Pid::from_u32(std::process::id());
            let mut sys = System::new();

            sys.refresh_cpu_usage();
            let cpu_count = sys.cpus().len().max(1);

            loop {
                if shutdown_listener.should_shutdown() {
                    break;
                }

                sys.refresh_processes_specifics(
                    ProcessesToUpdate::Some(&[this_process_pid]),
                    true,
                    ProcessRefreshKind::nothing().with_cpu(),
                );

                if let Some(process) = sys.process(this_process_pid) {
                    let usage = process.cpu_usage() / cpu_count as f32;
                    if usage > 80.0 {
                        log::warn!(
                            "The load generator is using {:.2}% of {} available cores. Latency numbers may reflect generator saturation rather than the target",
                            usage,
                            cpu_count
                        );
                    }
                }

                std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
            }
        })
        .expect("Failed to start monitor thread");
}
