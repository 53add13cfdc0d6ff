// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod errors;
pub mod exception_handlers;
pub mod handlers;
pub mod host;
pub mod routes;
