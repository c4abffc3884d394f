// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    zero = { 0, "0s" },
    seconds = { 59, "59s" },
    minutes = { 60, "1m" },
    minutes_floor = { 119, "1m" },
    hours = { 3600, "1h" },
    days = { 86400 * 3, "3d" },
)]
fn formats_compact(secs: u64, expected: &str) {
    assert_eq!(format_elapsed(secs), expected);
}
