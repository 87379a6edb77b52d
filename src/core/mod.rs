// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure business rules. Nothing in here touches the database or the clock;
//! `now` / `today` is always passed in.

pub mod alerts;
pub mod goals;
pub mod plans;
pub mod recurring;
pub mod reports;
pub mod transactions;
