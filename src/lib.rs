//! # Poli - prediction-market copy-trading dashboard
//!
//! A terminal dashboard for following prediction-market traders: browse
//! markets, rank traders on a leaderboard, and manage which wallets you
//! copy and how.
//!
//! ## Architecture
//!
//! - **App**: Terminal lifecycle and the event loop
//! - **Data**: `DataSource` trait, the snapshot-backed source and seeded
//!   synthetic detail figures
//! - **Projection**: Stable filter, sort and limit over record slices
//! - **State**: Centralized store reduced from `Action`s
//! - **Events**: Key handling that turns input into actions
//! - **UI**: Layout and rendering logic
//! - **Config**: Configuration management

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod format;
pub mod projection;
pub mod state;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use data::{DataSource, SnapshotSource};
pub use error::{Error, Result};
pub use projection::{Projection, project, take};
