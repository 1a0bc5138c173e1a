//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: app name, backend status, status message
//! - `ExchangeView`: one query and its response
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `InputBox`: the draft, sized to its content
//! - `MessageList`: scrollable transcript that follows new exchanges
//! - `FilePanel`: overlay for staging files
//!
//! Stateful components keep their state in `TuiState` and are wrapped by a
//! transient component each frame. They receive app data as props instead of
//! reading `App` directly.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── exchange.rs      (single exchange renderer)
//! ├── message_list.rs  (scrollable exchange container)
//! ├── file_panel.rs    (upload overlay)
//! └── input_box/       (draft editor)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod exchange;
pub mod file_panel;
pub mod input_box;
pub mod message_list;

pub use file_panel::{FilePanel, FilePanelState, PanelEvent};
pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
