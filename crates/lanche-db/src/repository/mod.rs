//! # Repository Module
//!
//! Database repository implementations for Lanche POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Coordinator (apps/terminal)                                           │
//! │       │                                                                 │
//! │       │  db.state().save(&snapshot)                                    │
//! │       ▼                                                                 │
//! │  StateRepository                                                       │
//! │  ├── load(&self)                → Option<AppState>                     │
//! │  ├── load_concern(&self, key)   → Option<T>                            │
//! │  ├── save(&self, &AppState)     → one transaction, one row per concern │
//! │  └── stored_concerns(&self)     → keys present on disk                 │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  state_documents (concern, payload, updated_at)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`StateRepository`](state::StateRepository) - Whole-state documents keyed by concern

pub mod state;
