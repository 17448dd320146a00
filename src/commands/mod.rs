mod command_def;
mod handler;

pub use command_def::MyCommands;
pub use handler::answer;
