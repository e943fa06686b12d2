//! Flute is a localization system for natural-sounding translations.
//!
//! `flute-bundle` is the runtime half of the system: it takes resources
//! parsed by `flute-syntax`, assembles them into a [`FluentBundle`] keyed
//! by identifier, and resolves messages against runtime variables into
//! final strings.
//!
//! # Example
//!
//! ```
//! use flute_bundle::{FluentArgs, FluentBundle, FluentResource};
//!
//! let ftl_string = String::from("hello-world = Hello, world!");
//! let resource = FluentResource::try_new(ftl_string)
//!     .expect("Failed to parse an FTL string.");
//!
//! let (bundle, errors) = FluentBundle::builder("en-US".parse().expect("valid locale"))
//!     .add_resource(resource)
//!     .build()
//!     .expect("Failed to build the bundle.");
//! assert!(errors.is_empty());
//!
//! let (value, _) = bundle.format("hello-world", None)
//!     .expect("Failed to format a message.");
//! assert_eq!(value, "Hello, world!");
//! ```

mod args;
mod bundle;
mod entry;
mod errors;
mod resource;

pub mod functions;
pub mod resolver;
pub mod types;

pub use args::{FluentArgValue, FluentArgs};
pub use bundle::{FluentBundle, FluentBundleBuilder, FormattedMessage};
pub use errors::{FluentError, ResolverError};
pub use functions::{
    CachePolicy, FluentFunction, FunctionContext, FunctionError, FunctionFactory,
    FunctionRegistry, Parameter, ResolvedParameters,
};
pub use resource::FluentResource;
pub use types::{
    FluentBool, FluentNumber, FluentTemporal, FluentType, FluentValue, FunctionOptions,
};
