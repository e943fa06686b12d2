use std::collections::HashMap;
use std::sync::Arc;

use super::{
    AbsFactory, BooleanFactory, CaseFactory, CountFactory, DateTimeFactory, FluentFunction,
    FunctionError, FunctionFactory, ListFactory, NumSortFactory, NumberFactory, OffsetFactory,
    ResolvedParameters, SignFactory, StringSortFactory, TemporalFieldFactory, TransformFn,
};
use crate::errors::FluentError;
use crate::types::{FluentValue, FunctionOptions};
use unic_langid::LanguageIdentifier;

/// The installed functions of a bundle.
///
/// Besides the factory table the registry wires up the implicit roles: the
/// formatter names for numeric and temporal values and the terminal list
/// reducer (exactly one per bundle; the builder refuses to build without
/// it).
pub struct FunctionRegistry {
    factories: HashMap<String, Arc<dyn FunctionFactory>>,
    global_options: HashMap<String, FunctionOptions>,
    implicit_number: String,
    implicit_temporal: String,
    reducer: String,
}

impl FunctionRegistry {
    /// A registry with the standard function set installed.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        let standard: [(&str, Arc<dyn FunctionFactory>); 12] = [
            ("NUMBER", Arc::new(NumberFactory)),
            ("DATETIME", Arc::new(DateTimeFactory)),
            ("LIST", Arc::new(ListFactory)),
            ("ABS", Arc::new(AbsFactory)),
            ("SIGN", Arc::new(SignFactory)),
            ("OFFSET", Arc::new(OffsetFactory)),
            ("CASE", Arc::new(CaseFactory)),
            ("COUNT", Arc::new(CountFactory)),
            ("STRINGSORT", Arc::new(StringSortFactory)),
            ("NUMSORT", Arc::new(NumSortFactory)),
            ("XTEMPORAL", Arc::new(TemporalFieldFactory)),
            ("BOOLEAN", Arc::new(BooleanFactory)),
        ];
        for (name, factory) in standard {
            // A fresh registry has no collisions.
            let _ = registry.add_factory(name, factory);
        }
        registry
    }

    /// A registry with no functions at all, not even a reducer.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
            global_options: HashMap::new(),
            implicit_number: "NUMBER".to_owned(),
            implicit_temporal: "DATETIME".to_owned(),
            reducer: "LIST".to_owned(),
        }
    }

    pub fn add_factory(
        &mut self,
        name: &str,
        factory: Arc<dyn FunctionFactory>,
    ) -> Result<(), FluentError> {
        use std::collections::hash_map::Entry;
        match self.factories.entry(name.to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(factory);
                Ok(())
            }
            Entry::Occupied(_) => Err(FluentError::Overriding {
                kind: "function",
                id: name.to_owned(),
            }),
        }
    }

    /// Registers a plain closure as a Transform-only function.
    pub fn add_function<F>(&mut self, name: &str, function: F) -> Result<(), FluentError>
    where
        F: for<'a, 'c> Fn(
                &ResolvedParameters<'a>,
                &super::FunctionContext<'c>,
            ) -> Result<Vec<FluentValue<'a>>, FunctionError>
            + Send
            + Sync
            + 'static,
    {
        let transform: TransformFn = Arc::new(function);
        self.add_factory(name, Arc::new(ClosureFactory { transform }))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn FunctionFactory>> {
        self.factories.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Options applied to every call of `function`; call-site options
    /// override them name by name.
    pub fn set_global_options(&mut self, function: &str, options: FunctionOptions) {
        self.global_options.insert(function.to_owned(), options);
    }

    pub fn global_options(&self, function: &str) -> Option<&FunctionOptions> {
        self.global_options.get(function)
    }

    pub fn set_reducer(&mut self, name: &str) {
        self.reducer = name.to_owned();
    }

    pub fn reducer_name(&self) -> &str {
        &self.reducer
    }

    pub fn has_reducer(&self) -> bool {
        self.has(&self.reducer)
    }

    pub fn implicit_number_name(&self) -> &str {
        &self.implicit_number
    }

    pub fn implicit_temporal_name(&self) -> &str {
        &self.implicit_temporal
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

struct ClosureFactory {
    transform: TransformFn,
}

impl FunctionFactory for ClosureFactory {
    fn create(
        &self,
        _locale: &LanguageIdentifier,
        _options: &FunctionOptions,
    ) -> Result<FluentFunction, FunctionError> {
        Ok(FluentFunction::transform_only(self.transform.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_set_is_complete() {
        let registry = FunctionRegistry::standard();
        for name in [
            "NUMBER",
            "DATETIME",
            "LIST",
            "ABS",
            "SIGN",
            "OFFSET",
            "CASE",
            "COUNT",
            "STRINGSORT",
            "NUMSORT",
            "XTEMPORAL",
            "BOOLEAN",
        ] {
            assert!(registry.has(name), "missing standard function {}", name);
        }
        assert!(registry.has_reducer());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = FunctionRegistry::standard();
        let err = registry
            .add_function("NUMBER", |_, _| Ok(vec![]))
            .unwrap_err();
        assert!(matches!(err, FluentError::Overriding { kind: "function", .. }));
    }

    #[test]
    fn empty_registry_has_no_reducer() {
        assert!(!FunctionRegistry::empty().has_reducer());
    }
}
