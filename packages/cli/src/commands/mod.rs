pub mod compile;
pub mod init;
pub mod preview;

pub use compile::{compile, CompileArgs};
pub use init::{init, InitArgs};
pub use preview::{preview, PreviewArgs};
