// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Document data model: scene projects, hotspots and dialogs.

pub mod dialog;
pub mod hotspot;
pub mod project;
