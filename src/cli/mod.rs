// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

pub mod args;
pub mod boot;
pub mod compress;
pub mod cpio;
pub mod hexpatch;
pub mod payload;
