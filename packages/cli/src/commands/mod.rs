pub mod apply;
pub mod compile;
pub mod init;
pub mod preview;
pub mod store;

pub use apply::{apply, ApplyArgs};
pub use compile::{compile, CompileArgs};
pub use init::{init, InitArgs};
pub use preview::{preview, PreviewArgs};
pub use store::{store, StoreArgs};
