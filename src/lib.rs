//! 食事する哲学者の問題
//!
//! 全員の状態を 1 つのロックで守り、哲学者ごとの条件変数で待機するモニタによる解法。
//! 両隣が食事中でないときに限り食事を始めるので、隣同士が同じ箸を同時に使うことはなく、
//! 箸を置いた哲学者が両隣を必ず確認し直すのでデッドロックもしない。

pub mod async_table;
pub mod config;
pub mod error;
pub mod logging;
pub mod philosopher;
pub mod random;
pub mod ring;
pub mod signal;
pub mod table;

pub use async_table::AsyncTable;
pub use config::{Config, DurationRange, Runtime};
pub use error::{Error, Result};
pub use table::{Snapshot, Status, Table};
