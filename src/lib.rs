//! finforecast — forecast report generator for personal-finance ledgers.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. The TMPL mini-language engine used
//! by the HTML report adapter lives in [`template`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod template;
pub mod cli;
