// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod average;
pub mod grid;
pub mod refresh;
pub mod sessions;
pub mod streaks;

pub use refresh::{StreakEngine, StreakSnapshot};
pub use sessions::SessionProcessor;
