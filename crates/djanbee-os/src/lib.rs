mod command;
mod fs_utils;
mod pip;
mod platform;
mod unix;
mod windows;

pub use command::{CommandRunner, ProcessRunner};
pub use fs_utils::{search_folder, search_subfolders, set_dir, write_text_file};
pub use pip::PipManager;
pub use platform::{OsManager, Platform, SystemManager};
pub use unix::UnixOsManager;
pub use windows::WindowsOsManager;
