// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Mnemo agent: command parsing, personality, prompt assembly, and
//! the memory-augmented chat pipeline.

pub mod command;
pub mod handler;
pub mod personality;
pub mod prompts;

pub use command::Command;
pub use handler::{split_reply, ChatEvent, Handler, MAX_REPLY_CHARS};
