// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::utils::parse_id;

pub mod accounts;
pub mod doctor;
pub mod holdings;
pub mod reports;
pub mod transactions;

pub(crate) fn arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.trim())
        .with_context(|| format!("--{} is required", name))
}

pub(crate) fn id_arg(m: &clap::ArgMatches, name: &str) -> Result<Uuid> {
    parse_id(arg(m, name)?)
}
