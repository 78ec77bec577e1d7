pub mod app_state;
pub mod clone_state;
pub mod diff_state;
pub mod file_list_state;
pub mod selection;
pub mod text_buffer;

pub use app_state::{AppState, FocusPanel};
pub use clone_state::CloneDialogState;
pub use diff_state::{DiffState, ViewOptions};
pub use file_list_state::FileListState;
pub use text_buffer::TextBuffer;
