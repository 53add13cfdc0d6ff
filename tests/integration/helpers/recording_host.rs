// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use orm_lifespan::domain::errors::ErrorKind;
use orm_lifespan::domain::host::{ExceptionHandler, Host, Lifespan};
use std::sync::Arc;

/// 只记录注册内容的宿主
#[derive(Default)]
pub struct RecordingHost {
    pub handlers: Vec<(ErrorKind, ExceptionHandler)>,
    pub lifespan: Option<Arc<dyn Lifespan>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.handlers.iter().map(|(kind, _)| *kind).collect()
    }
}

impl Host for RecordingHost {
    fn add_exception_handler(&mut self, kind: ErrorKind, handler: ExceptionHandler) {
        self.handlers.push((kind, handler));
    }

    fn set_lifespan(&mut self, lifespan: Arc<dyn Lifespan>) {
        self.lifespan = Some(lifespan);
    }
}
