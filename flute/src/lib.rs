//! Flute is a localization system designed to unleash the entire expressive
//! power of natural language translations.
//!
//! This crate re-exports the runtime API of [`flute_bundle`] and the syntax
//! layer as [`syntax`].
//!
//! # Example
//!
//! ```
//! use flute::{FluentArgs, FluentBundle, FluentResource};
//!
//! let resource = FluentResource::try_new(String::from("intro = Welcome, { $name }."))
//!     .expect("Could not parse an FTL string.");
//!
//! let (bundle, _) = FluentBundle::builder("en-US".parse().expect("valid locale"))
//!     .use_isolation(false)
//!     .add_resource(resource)
//!     .build()
//!     .expect("Failed to build the bundle.");
//!
//! let mut args = FluentArgs::new();
//! args.set("name", "Rustacean");
//!
//! let (value, _) = bundle.format("intro", Some(&args))
//!     .expect("Failed to format a message.");
//! assert_eq!(value, "Welcome, Rustacean.");
//! ```

pub use flute_bundle::*;
pub use flute_syntax as syntax;
