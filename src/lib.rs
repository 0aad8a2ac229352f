// Copyright 2026, Convoy Authors
// SPDX-License-Identifier: Apache-2.0
pub mod apply;
pub mod config;
pub mod constants;
pub mod error;
pub mod kubernetes;
pub mod manifest;
pub mod scheme;

#[cfg(test)]
pub(crate) mod test_utils;
