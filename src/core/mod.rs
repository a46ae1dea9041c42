// rcloadenv: Runtime Config environment loader
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for environment and process management.
//!
//! ```text
//!          core
//!           |
//!     +-----+-----+
//!     v           v
//!    env       process
//!     |           |
//!   Env       LaunchPlan
//!   merge     exec / spawn
//! ```

pub mod env;
pub mod process;
