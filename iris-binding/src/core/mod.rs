//! Core types shared by every inference component

pub mod unified_error;
