//! # GitHub Email Getter
//!
//! A Rust library for discovering the public email address of a GitHub
//! user, with concurrent fan-out across one page of the user's followers
//! or following list.
//!
//! ## Main Components
//!
//! - [`EmailGetter`]: the crawler that runs the fallback extraction chain
//!   (users API, profile page, recent commit activity) per account
//! - [`Args`]: command line argument structure configuring a run
//!
//! ## Example
//!
//! ```no_run
//! use github_email_getter_lib::{Args, EmailGetter};
//! use clap::Parser;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Parse command line arguments
//!     let args = Args::parse();
//!
//!     // Run the job and print whatever was found
//!     let getter = EmailGetter::new(&args)?;
//!     for value in getter.run(&args).await {
//!         println!("{}", value);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod args;
mod extractor;
mod fetcher;
mod getter;
mod results;

// Re-export main components for documentation and external use
pub use crate::args::{Args, Relation};
pub use crate::extractor::{decode_mailto, Extractor};
pub use crate::fetcher::{FetchError, Fetcher};
pub use crate::getter::{EmailGetter, RateLimitGate};
pub use crate::results::ResultSet;
