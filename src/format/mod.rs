// SPDX-FileCopyrightText: 2024-2025 Andrew Gunnerson
// SPDX-License-Identifier: GPL-3.0-only

pub mod bootimage;
pub mod compression;
pub mod cpio;
pub mod magic;
pub mod payload;
