//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation, persistence and delivery so route
//! handlers stay focused on request parsing, auth gating and status codes.

pub mod about;
pub mod auth;
pub mod certificate;
pub mod content;
pub mod mailer;
pub mod message;
pub mod offering;
pub mod project;
pub mod session;
pub mod skill;
pub mod storage;
pub mod support;
pub mod theme;
