//! Terminal portfolio: animated background scenes, fragment routing with a
//! timed transition, a persisted theme, an AI chat panel and a contact form.

pub mod action;
pub mod app;
pub mod chat;
pub mod command;
pub mod config;
pub mod content;
pub mod error;
pub mod gemini;
pub mod mail;
pub mod router;
pub mod scene;
pub mod theme;
pub mod ui;
pub mod ui_state;
