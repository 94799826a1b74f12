// SYNOID Chroma Library Root
// Copyright (c) 2026 Xing_The_Creator | SYNOID

pub mod config;
pub mod emotion;
pub mod server;
pub mod state;
