//! # State Module
//!
//! In-process stores owned by the console. Each store guards its data
//! with its own lock so unrelated actions never contend.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      LocalStorage (storage.json)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  AuthState   │  │  CartState   │  │    UiState       │              │
//! │  │              │  │              │  │                  │              │
//! │  │  RwLock<     │  │  Arc<Mutex<  │  │  Mutex<          │              │
//! │  │   Session>   │  │    Cart>>    │  │   UiSnapshot>    │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • AuthState: read on every request (token), written on login/logout   │
//! │  • CartState: one mutation at a time, persisted under the lock         │
//! │  • UiState: small copyable snapshot                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod cart;
mod ui;

pub use auth::{AuthState, Session};
pub use cart::CartState;
pub use ui::{Theme, UiSnapshot, UiState};

#[cfg(test)]
pub(crate) use auth::tests::{login_response, token_expiring_in};
#[cfg(test)]
pub(crate) use cart::tests::appliance;
