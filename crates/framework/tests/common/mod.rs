//! # Shared Test Infrastructure
//!
//! This module collects the helpers the unit tests build on. Everything
//! here works against temporary directories so tests never touch the
//! checkout or require installed tools.
