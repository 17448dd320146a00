use teloxide::Bot;

use crate::app_context::AppContext;

mod monitor;

pub fn start_background_jobs(app_context: AppContext, bot: Option<Bot>) {
    monitor::start_monitor_job(app_context, bot);
}
