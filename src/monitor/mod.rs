mod pass;
mod probes;
mod runtime;

pub use pass::run_pass;
pub use runtime::MonitorRuntime;
