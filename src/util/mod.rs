// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Coordinate conversion and shape editing.

pub mod geometry;
pub mod shape;
