use chrono::Utc;
use teloxide::Bot;
use tokio::time::{sleep, Duration};

use crate::app_context::AppContext;
use crate::monitor::MonitorRuntime;

pub(super) fn start_monitor_job(app_context: AppContext, bot: Option<Bot>) {
    tokio::spawn(async move {
        let mut runtime = MonitorRuntime::new(
            app_context.config.clone(),
            app_context.fleet.clone(),
            bot,
            app_context.subscribers.clone(),
        );
        let interval_secs = runtime.check_interval_secs();
        let mut previous_tick = None;

        loop {
            let now = Utc::now();
            if let Some(previous) = previous_tick {
                let elapsed_secs = now.signed_duration_since(previous).num_seconds().max(0);
                let threshold_secs = (interval_secs * 2) as i64;
                if elapsed_secs > threshold_secs {
                    log::warn!(
                        "monitor_loop_delayed elapsed_secs={} threshold_secs={}",
                        elapsed_secs,
                        threshold_secs
                    );
                }
            }
            previous_tick = Some(now);

            if let Err(error) = runtime.run_once().await {
                // Session contract violations are programming errors; a loop
                // that keeps going would fail the same way every tick.
                log::error!("monitor_job_stopped error={}", error);
                return;
            }

            sleep(Duration::from_secs(interval_secs)).await;
        }
    });
}
