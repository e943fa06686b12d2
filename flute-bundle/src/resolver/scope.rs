use flute_syntax::ast;

use super::errors::ResolverError;
use crate::args::{FluentArgValue, FluentArgs};
use crate::bundle::FluentBundle;
use crate::functions::FunctionContext;

/// Mutable state of a single `format` call.
///
/// A scope owns the error list, the placeable budget, the traversal set
/// used for cycle detection and the local arguments of the innermost active
/// term reference. Everything else it touches is borrowed from the
/// immutable bundle.
pub struct Scope<'bundle> {
    pub bundle: &'bundle FluentBundle,
    pub(crate) args: Option<&'bundle FluentArgs<'bundle>>,
    /// Call-args of the innermost term reference currently resolving;
    /// `$var` inside a term pattern binds here, never to the caller's args.
    pub(crate) local_args: Option<FluentArgs<'bundle>>,
    /// Patterns currently being resolved, for cycle detection.
    pub(crate) travelled: Vec<&'bundle ast::Pattern<'bundle>>,
    pub(crate) placeables: usize,
    pub(crate) dirty: bool,
    pub errors: Vec<ResolverError>,
}

impl<'bundle> Scope<'bundle> {
    pub fn new(bundle: &'bundle FluentBundle, args: Option<&'bundle FluentArgs<'bundle>>) -> Self {
        Self {
            bundle,
            args,
            local_args: None,
            travelled: Vec::new(),
            placeables: 0,
            dirty: false,
            errors: Vec::new(),
        }
    }

    /// Variable lookup: local term arguments shadow the world while a term
    /// resolves; external arguments do not leak into terms.
    pub(crate) fn lookup_variable(&self, name: &str) -> Option<&FluentArgValue<'bundle>> {
        match &self.local_args {
            Some(local) => local.get(name),
            None => self.args.and_then(|args| args.get(name)),
        }
    }

    pub(crate) fn is_travelled(&self, pattern: &'bundle ast::Pattern<'bundle>) -> bool {
        self.travelled
            .iter()
            .any(|travelled| std::ptr::eq(*travelled, pattern))
    }

    /// Accounts one placeable expansion; returns `false` when the budget is
    /// exhausted (the scope is dirty from then on).
    pub(crate) fn charge_placeable(&mut self) -> bool {
        self.placeables += 1;
        if self.placeables > self.bundle.max_placeables {
            if !self.dirty {
                self.dirty = true;
                self.errors.push(ResolverError::TooManyPlaceables);
            }
            return false;
        }
        true
    }

    pub(crate) fn mark_cyclic(&mut self) {
        if !self.dirty {
            self.dirty = true;
        }
        self.errors.push(ResolverError::Cyclic);
    }

    pub(crate) fn function_context(&self) -> FunctionContext<'bundle> {
        FunctionContext {
            locale: self.bundle.primary_locale(),
            intls: self.bundle.intls(),
        }
    }
}
