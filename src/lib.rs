// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod reconciler;
pub mod utils;
pub mod commands;
