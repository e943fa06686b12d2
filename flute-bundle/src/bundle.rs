//! `FluentBundle` is a collection of localization messages in Fluent.
//!
//! It stores a list of messages in a single locale which can reference one
//! another, share one set of formatting functions and one function-instance
//! cache, and are expected to be used together.

use std::collections::hash_map::{Entry as HashEntry, HashMap};
use std::fmt::Write;
use std::sync::Arc;

use flute_syntax::ast;
use intl_memoizer::concurrent::IntlLangMemoizer;
use tracing::debug;
use unic_langid::LanguageIdentifier;

use crate::args::FluentArgs;
use crate::entry::{Entry, GetEntry};
use crate::errors::{FluentError, ResolverError};
use crate::functions::{CachePolicy, FunctionCache, FunctionContext, FunctionError, FunctionRegistry, ResolvedParameters};
use crate::resolver::{resolve_pattern_to_value, Scope};
use crate::resource::FluentResource;
use crate::types::{FluentValue, FunctionOptions};

/// A message with its value and all attributes formatted at once, for UI
/// elements that need several related text fields together.
#[derive(Debug, PartialEq)]
pub struct FormattedMessage {
    pub value: Option<String>,
    pub attributes: HashMap<String, String>,
}

/// A collection of localization messages for a single locale, which are meant
/// to be used together in a single view, widget or any other UI abstraction.
///
/// # Examples
///
/// ```
/// use flute_bundle::{FluentArgs, FluentBundle, FluentResource};
///
/// let ftl_string = String::from("intro = Welcome, { $name }.");
/// let resource = FluentResource::try_new(ftl_string)
///     .expect("Could not parse an FTL string.");
///
/// let (bundle, errors) = FluentBundle::builder("en-US".parse().expect("valid locale"))
///     .use_isolation(false)
///     .add_resource(resource)
///     .build()
///     .expect("Failed to build the bundle.");
/// assert!(errors.is_empty());
///
/// let mut args = FluentArgs::new();
/// args.set("name", "Rustacean");
///
/// let (value, errors) = bundle.format("intro", Some(&args))
///     .expect("Failed to format a message.");
/// assert_eq!(value, "Welcome, Rustacean.");
/// assert!(errors.is_empty());
/// ```
///
/// # `FluentBundle` Life Cycle
///
/// A bundle is configured through [`FluentBundleBuilder`]: locale chain,
/// resources, functions, bidi isolation, the placeable budget and the
/// function-cache policy. Building freezes it; a built bundle is immutable
/// and safe to share between threads, and concurrent `format` calls do not
/// interfere — each call owns its scope.
///
/// To format a translation, call [`format`] with a message id, or
/// [`format_attribute`] for a single attribute. [`format_message`] formats
/// the value and all attributes at once.
///
/// The result of `format` is a `(String, Vec<FluentError>)`: the string is
/// the best-effort rendering and should be treated as opaque by the program;
/// the error list is for programmatic inspection and never influences the
/// string. Resolution failures are rendered into the output at the failure
/// site (`{Unknown variable: $x}` and friends) rather than aborting the
/// call.
///
/// [`format`]: Self::format
/// [`format_attribute`]: Self::format_attribute
/// [`format_message`]: Self::format_message
pub struct FluentBundle {
    pub locales: Vec<LanguageIdentifier>,
    pub(crate) resources: Vec<Arc<FluentResource>>,
    pub(crate) entries: HashMap<String, Entry>,
    pub(crate) registry: FunctionRegistry,
    pub(crate) function_cache: FunctionCache,
    pub(crate) intls: IntlLangMemoizer,
    pub(crate) use_isolation: bool,
    pub(crate) max_placeables: usize,
}

impl FluentBundle {
    /// Starts a builder for a bundle in the given locale.
    pub fn builder(locale: LanguageIdentifier) -> FluentBundleBuilder {
        FluentBundleBuilder::new(locale)
    }

    /// Returns true if this bundle contains a message with the given id.
    ///
    /// # Examples
    ///
    /// ```
    /// use flute_bundle::{FluentBundle, FluentResource};
    ///
    /// let resource = FluentResource::try_new(String::from("hello = Hi!"))
    ///     .expect("Failed to parse an FTL string.");
    /// let (bundle, _) = FluentBundle::builder("en-US".parse().expect("valid locale"))
    ///     .add_resource(resource)
    ///     .build()
    ///     .expect("Failed to build the bundle.");
    /// assert_eq!(true, bundle.has_message("hello"));
    /// ```
    pub fn has_message(&self, id: &str) -> bool {
        self.get_entry_message(id).is_some()
    }

    /// The message with the given id, if any.
    pub fn message<'bundle>(&'bundle self, id: &str) -> Option<&'bundle ast::Message<'bundle>> {
        self.get_entry_message(id)
    }

    /// The term with the given id (without its `-` sigil), if any.
    pub fn term<'bundle>(&'bundle self, id: &str) -> Option<&'bundle ast::Term<'bundle>> {
        self.get_entry_term(id)
    }

    /// The installed functions, for introspection.
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Formats the value of the message identified by `id` using `args` to
    /// provide variables.
    ///
    /// # Examples
    ///
    /// ```
    /// use flute_bundle::{FluentArgs, FluentBundle, FluentResource};
    ///
    /// let ftl_string = String::from("
    /// you-have = You have { $count ->
    ///     [one] one message
    ///    *[other] { $count } messages
    ///  }.
    /// ");
    /// let resource = FluentResource::try_new(ftl_string)
    ///     .expect("Could not parse an FTL string.");
    /// let (bundle, _) = FluentBundle::builder("en-US".parse().expect("valid locale"))
    ///     .use_isolation(false)
    ///     .add_resource(resource)
    ///     .build()
    ///     .expect("Failed to build the bundle.");
    ///
    /// let mut args = FluentArgs::new();
    /// args.set("count", 1);
    /// let (value, _) = bundle.format("you-have", Some(&args))
    ///     .expect("Failed to format a message.");
    /// assert_eq!(value, "You have one message.");
    /// ```
    ///
    /// # Errors
    ///
    /// `format` fails fatally only when `id` names no message in the bundle.
    ///
    /// In all other cases it returns a string even if it encountered
    /// errors: unresolvable parts of the message are replaced by rendered
    /// error markers, and cyclic or over-budget expansions render as
    /// `[dirty]`.
    ///
    /// ```
    /// use flute_bundle::{FluentBundle, FluentResource};
    ///
    /// // A message with a cyclic self-reference.
    /// let resource = FluentResource::try_new(String::from("foo = a { foo } b"))
    ///     .expect("Could not parse an FTL string.");
    /// let (bundle, _) = FluentBundle::builder("en-US".parse().expect("valid locale"))
    ///     .use_isolation(false)
    ///     .add_resource(resource)
    ///     .build()
    ///     .expect("Failed to build the bundle.");
    ///
    /// let (value, errors) = bundle.format("foo", None)
    ///     .expect("Failed to format a message.");
    /// assert_eq!(value, "a [dirty] b");
    /// assert_eq!(errors.len(), 1);
    /// ```
    pub fn format<'bundle>(
        &'bundle self,
        id: &str,
        args: Option<&'bundle FluentArgs<'bundle>>,
    ) -> Result<(String, Vec<FluentError>), FluentError> {
        let message = self.get_entry_message(id).ok_or_else(|| {
            FluentError::Resolver(ResolverError::UnknownMessage { id: id.to_owned() })
        })?;

        let mut scope = Scope::new(self, args);
        let mut out = String::new();
        match &message.value {
            Some(pattern) => {
                let value = resolve_pattern_to_value(pattern, &mut scope);
                // Writing into a String is infallible.
                let _ = value.write(&mut out, &self.intls);
            }
            None => {
                let error = ResolverError::NoValue { id: id.to_owned() };
                let _ = write!(out, "{{{}}}", error);
                scope.errors.push(error);
            }
        }
        Ok((out, drain_errors(scope)))
    }

    /// Formats a single attribute of the message identified by `id`.
    ///
    /// A missing attribute is a resolution error, not a fatal one: the
    /// output carries the rendered error marker and the error list records
    /// it. Only an unknown message id fails fatally.
    ///
    /// # Examples
    ///
    /// ```
    /// use flute_bundle::{FluentBundle, FluentResource};
    ///
    /// let ftl_string = String::from("
    /// info = Hi
    ///     .email = me@example.com
    /// ");
    /// let resource = FluentResource::try_new(ftl_string)
    ///     .expect("Could not parse an FTL string.");
    /// let (bundle, _) = FluentBundle::builder("en-US".parse().expect("valid locale"))
    ///     .add_resource(resource)
    ///     .build()
    ///     .expect("Failed to build the bundle.");
    ///
    /// let (value, errors) = bundle.format_attribute("info", "email", None)
    ///     .expect("Failed to format an attribute.");
    /// assert_eq!(value, "me@example.com");
    /// assert!(errors.is_empty());
    ///
    /// let (value, errors) = bundle.format_attribute("info", "phone", None)
    ///     .expect("Failed to format an attribute.");
    /// assert_eq!(value, "{Unknown attribute: info.phone}");
    /// assert_eq!(errors.len(), 1);
    /// ```
    pub fn format_attribute<'bundle>(
        &'bundle self,
        id: &str,
        attribute: &str,
        args: Option<&'bundle FluentArgs<'bundle>>,
    ) -> Result<(String, Vec<FluentError>), FluentError> {
        let message = self.get_entry_message(id).ok_or_else(|| {
            FluentError::Resolver(ResolverError::UnknownMessage { id: id.to_owned() })
        })?;

        let mut scope = Scope::new(self, args);
        let mut out = String::new();
        match message
            .attributes
            .iter()
            .find(|candidate| candidate.id.name == attribute)
        {
            Some(found) => {
                let value = resolve_pattern_to_value(&found.value, &mut scope);
                let _ = value.write(&mut out, &self.intls);
            }
            None => {
                let error = ResolverError::UnknownAttribute {
                    entry: id.to_owned(),
                    attribute: attribute.to_owned(),
                };
                let _ = write!(out, "{{{}}}", error);
                scope.errors.push(error);
            }
        }
        Ok((out, drain_errors(scope)))
    }

    /// Formats both the message value and all attributes identified by
    /// `id`. This is useful for cases where a UI element requires multiple
    /// related text fields, such as a button with display text and
    /// assistive text.
    ///
    /// # Examples
    ///
    /// ```
    /// use flute_bundle::{FluentBundle, FluentResource};
    ///
    /// let ftl_string = String::from("
    /// login-input = Predefined value
    ///     .placeholder = example@email.com
    ///     .title = Type your login email
    /// ");
    /// let resource = FluentResource::try_new(ftl_string)
    ///     .expect("Could not parse an FTL string.");
    /// let (bundle, _) = FluentBundle::builder("en-US".parse().expect("valid locale"))
    ///     .add_resource(resource)
    ///     .build()
    ///     .expect("Failed to build the bundle.");
    ///
    /// let (message, _) = bundle.format_message("login-input", None)
    ///     .expect("Failed to format a message.");
    /// assert_eq!(message.value.as_deref(), Some("Predefined value"));
    /// assert_eq!(
    ///     message.attributes.get("title").map(String::as_str),
    ///     Some("Type your login email"),
    /// );
    /// ```
    pub fn format_message<'bundle>(
        &'bundle self,
        id: &str,
        args: Option<&'bundle FluentArgs<'bundle>>,
    ) -> Result<(FormattedMessage, Vec<FluentError>), FluentError> {
        let message = self.get_entry_message(id).ok_or_else(|| {
            FluentError::Resolver(ResolverError::UnknownMessage { id: id.to_owned() })
        })?;

        let mut scope = Scope::new(self, args);

        let value = message.value.as_ref().map(|pattern| {
            let value = resolve_pattern_to_value(pattern, &mut scope);
            let mut out = String::new();
            let _ = value.write(&mut out, &self.intls);
            out
        });

        let mut attributes = HashMap::with_capacity(message.attributes.len());
        for attribute in &message.attributes {
            let value = resolve_pattern_to_value(&attribute.value, &mut scope);
            let mut out = String::new();
            let _ = value.write(&mut out, &self.intls);
            attributes.insert(attribute.id.name.to_owned(), out);
        }

        Ok((FormattedMessage { value, attributes }, drain_errors(scope)))
    }

    pub(crate) fn function_cache(&self) -> &FunctionCache {
        &self.function_cache
    }

    pub(crate) fn intls(&self) -> &IntlLangMemoizer {
        &self.intls
    }

    /// The first locale of the fallback chain; the builder guarantees at
    /// least one.
    pub(crate) fn primary_locale(&self) -> &LanguageIdentifier {
        &self.locales[0]
    }
}

fn drain_errors(scope: Scope) -> Vec<FluentError> {
    scope.errors.into_iter().map(FluentError::from).collect()
}

/// Configures and builds a [`FluentBundle`].
///
/// The builder collects locales, resources and functions, then freezes them
/// into an immutable bundle. Non-fatal problems (duplicate ids, duplicate
/// function registrations) are reported next to the built bundle; the only
/// fatal build error is a registry without a terminal list reducer.
pub struct FluentBundleBuilder {
    locales: Vec<LanguageIdentifier>,
    resources: Vec<Arc<FluentResource>>,
    registry: FunctionRegistry,
    cache_policy: CachePolicy,
    use_isolation: bool,
    max_placeables: usize,
    errors: Vec<FluentError>,
}

impl FluentBundleBuilder {
    pub fn new(locale: LanguageIdentifier) -> Self {
        Self {
            locales: vec![locale],
            resources: Vec::new(),
            registry: FunctionRegistry::standard(),
            cache_policy: CachePolicy::default(),
            use_isolation: true,
            max_placeables: 100,
            errors: Vec::new(),
        }
    }

    /// Appends a fallback locale for formatters.
    pub fn add_fallback_locale(mut self, locale: LanguageIdentifier) -> Self {
        self.locales.push(locale);
        self
    }

    /// Adds a parsed resource. Entries are indexed at build time; on id
    /// collisions the first occurrence wins.
    pub fn add_resource(mut self, resource: impl Into<Arc<FluentResource>>) -> Self {
        self.resources.push(resource.into());
        self
    }

    /// Whether placeable expansions are wrapped in FSI/PDI isolates.
    /// Defaults to `true`.
    pub fn use_isolation(mut self, use_isolation: bool) -> Self {
        self.use_isolation = use_isolation;
        self
    }

    /// Hard cap on placeable expansions per `format` call. Defaults to 100.
    pub fn max_placeables(mut self, max_placeables: usize) -> Self {
        self.max_placeables = max_placeables;
        self
    }

    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// Replaces the whole function registry. The default is the standard
    /// set.
    pub fn registry(mut self, registry: FunctionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Options applied to every call of `function` in this bundle;
    /// call-site options override them name by name.
    pub fn function_options(mut self, function: &str, options: FunctionOptions) -> Self {
        self.registry.set_global_options(function, options);
        self
    }

    /// Makes the provided rust function available to messages with the name
    /// `id`.
    ///
    /// FTL functions accept both positional and named args; named args were
    /// merged into the per-call options at instantiation, so the closure
    /// receives the resolved positional parameters only.
    ///
    /// # Examples
    ///
    /// ```
    /// use flute_bundle::{FluentBundle, FluentResource, FluentValue};
    ///
    /// let resource = FluentResource::try_new(String::from("length = { STRLEN(\"12345\") }"))
    ///     .expect("Could not parse an FTL string.");
    ///
    /// let (bundle, _) = FluentBundle::builder("en-US".parse().expect("valid locale"))
    ///     .add_resource(resource)
    ///     .add_function("STRLEN", |params, _ctx| {
    ///         let length = params
    ///             .first()
    ///             .map(|value| match value {
    ///                 FluentValue::String(s) => s.len() as i64,
    ///                 _ => 0,
    ///             })
    ///             .unwrap_or(0);
    ///         Ok(vec![FluentValue::from(length)])
    ///     })
    ///     .build()
    ///     .expect("Failed to build the bundle.");
    ///
    /// let (value, _) = bundle.format("length", None)
    ///     .expect("Failed to format a message.");
    /// assert_eq!(value, "5");
    /// ```
    pub fn add_function<F>(mut self, id: &str, function: F) -> Self
    where
        F: for<'a, 'c> Fn(
                &ResolvedParameters<'a>,
                &FunctionContext<'c>,
            ) -> Result<Vec<FluentValue<'a>>, FunctionError>
            + Send
            + Sync
            + 'static,
    {
        if let Err(error) = self.registry.add_function(id, function) {
            self.errors.push(error);
        }
        self
    }

    /// Freezes the configuration into an immutable bundle.
    ///
    /// Returns the bundle together with the non-fatal errors collected
    /// while assembling it (duplicate ids, duplicate function
    /// registrations). Fails only when no terminal reducer is installed.
    pub fn build(self) -> Result<(FluentBundle, Vec<FluentError>), FluentError> {
        if !self.registry.has_reducer() {
            return Err(FluentError::MissingReducer);
        }

        let mut errors = self.errors;
        let mut entries: HashMap<String, Entry> = HashMap::new();

        for (resource_index, resource) in self.resources.iter().enumerate() {
            for (entry_index, entry) in resource.ast().body.iter().enumerate() {
                let (id, slot, kind) = match entry {
                    ast::ResourceEntry::Entry(ast::Entry::Message(ast::Message { id, .. })) => (
                        id.name,
                        Entry::Message([resource_index, entry_index]),
                        "message",
                    ),
                    ast::ResourceEntry::Entry(ast::Entry::Term(ast::Term { id, .. })) => {
                        (id.name, Entry::Term([resource_index, entry_index]), "term")
                    }
                    _ => continue,
                };

                match entries.entry(id.to_owned()) {
                    HashEntry::Vacant(vacant) => {
                        vacant.insert(slot);
                    }
                    HashEntry::Occupied(_) => {
                        debug!(kind, id, "duplicate id ignored; first occurrence wins");
                        errors.push(FluentError::Overriding {
                            kind,
                            id: id.to_owned(),
                        });
                    }
                }
            }
        }

        let intls = IntlLangMemoizer::new(self.locales[0].clone());
        let bundle = FluentBundle {
            locales: self.locales,
            resources: self.resources,
            entries,
            registry: self.registry,
            function_cache: FunctionCache::new(self.cache_policy),
            intls,
            use_isolation: self.use_isolation,
            max_placeables: self.max_placeables,
        };
        Ok((bundle, errors))
    }
}
