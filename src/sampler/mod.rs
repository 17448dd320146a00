mod parse;
mod source;

pub use parse::DiskUsage;
pub use source::{ReadingSource, SampleError, ServerReadings, ServiceStatus, SshReadingSource};

#[cfg(test)]
pub(crate) use source::MockReadingSource;
