//! Atelier: two-agent image refinement.
//!
//! A generator agent turns prompts into images through a `generate_image`
//! function backed by the OpenAI Images API. A vision-capable critic reviews
//! each image against acceptance criteria and either asks for changes or
//! approves. The exchange is bounded by a round limit, and every produced
//! image is written to a fixed path on disk.
//!
//! # Quick Start
//!
//! ```no_run
//! use atelier::prelude::*;
//!
//! # async fn example() -> atelier::error::Result<()> {
//! let config = AtelierConfig::from_env()?;
//! let outcome = ImageRefinement::from_config(&config)?.run().await?;
//! println!("{} after {} rounds", outcome.status, outcome.rounds);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod chat;
pub mod config;
pub mod error;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod refine;
pub mod store;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
