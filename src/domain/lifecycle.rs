// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;

/// ORM 生命周期状态
///
/// 只允许 `Unstarted -> Initializing -> Ready -> Closed` 单向推进，
/// 初始化失败时回到 `Unstarted`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unstarted,
    Initializing,
    Ready,
    Closed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Unstarted => "unstarted",
            LifecycleState::Initializing => "initializing",
            LifecycleState::Ready => "ready",
            LifecycleState::Closed => "closed",
        };
        f.write_str(name)
    }
}
