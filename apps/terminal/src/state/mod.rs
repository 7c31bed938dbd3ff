//! # State Module
//!
//! Runtime state of the terminal.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐    ┌──────────────────────────────┐  │
//! │  │        Coordinator           │    │       TerminalConfig         │  │
//! │  │                              │    │                              │  │
//! │  │  Mutex<AppState>             │    │  store_name                  │  │
//! │  │  Option<Database>            │    │  database_path               │  │
//! │  │  revision / saved revision   │    │  stock_policy, advisory      │  │
//! │  └──────────────────────────────┘    └──────────────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Coordinator: one std Mutex, never held across an .await            │
//! │  • TerminalConfig: read-only after initialization                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod coordinator;

pub use config::{AdvisoryConfig, TerminalConfig, DEFAULT_ADVISORY_TIMEOUT_SECS};
pub use coordinator::Coordinator;
