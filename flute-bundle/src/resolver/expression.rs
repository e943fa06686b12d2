use flute_syntax::ast;
use flute_syntax::unicode::unescape;

use super::errors::ResolverError;
use super::pattern::resolve_pattern_to_value;
use super::scope::Scope;
use crate::args::{FluentArgValue, FluentArgs};
use crate::entry::GetEntry;
use crate::functions::{
    FluentFunction, FunctionError, Parameter, ResolvedParameters,
};
use crate::types::{ErrorValue, FluentValue};
use std::sync::Arc;

pub(crate) fn resolve_expression<'bundle>(
    expression: &'bundle ast::Expression<'bundle>,
    scope: &mut Scope<'bundle>,
) -> Vec<FluentValue<'bundle>> {
    match expression {
        ast::Expression::InlineExpression(inline) => resolve_inline_expression(inline, scope),
        ast::Expression::SelectExpression { selector, variants } => {
            resolve_select(selector, variants, scope)
        }
    }
}

pub(crate) fn resolve_inline_expression<'bundle>(
    expression: &'bundle ast::InlineExpression<'bundle>,
    scope: &mut Scope<'bundle>,
) -> Vec<FluentValue<'bundle>> {
    match expression {
        ast::InlineExpression::StringLiteral { value } => {
            vec![FluentValue::String(unescape(value))]
        }
        ast::InlineExpression::NumberLiteral { value } => vec![FluentValue::try_number(value)],
        ast::InlineExpression::VariableReference { id } => {
            match scope.lookup_variable(id.name) {
                Some(FluentArgValue::Single(value)) => vec![value.clone()],
                Some(FluentArgValue::Many(values)) => values.clone(),
                None => vec![reference_error(
                    scope,
                    ResolverError::UnknownVariable {
                        id: id.name.to_owned(),
                    },
                )],
            }
        }
        ast::InlineExpression::MessageReference { id, attribute } => {
            vec![resolve_message_reference(id, attribute.as_ref(), scope)]
        }
        ast::InlineExpression::TermReference {
            id,
            attribute,
            arguments,
        } => {
            vec![resolve_term_reference(
                id,
                attribute.as_ref(),
                arguments.as_ref(),
                scope,
            )]
        }
        ast::InlineExpression::FunctionReference { id, arguments } => {
            call_function(id.name, arguments, scope)
        }
        ast::InlineExpression::Placeable { expression } => {
            // A nested placeable counts against the budget of the call.
            if scope.dirty || !scope.charge_placeable() {
                return vec![FluentValue::Error(ErrorValue::Dirty)];
            }
            resolve_expression(expression, scope)
        }
    }
}

fn reference_error<'bundle>(
    scope: &mut Scope<'bundle>,
    error: ResolverError,
) -> FluentValue<'bundle> {
    let value = FluentValue::Error(ErrorValue::Reference(error.to_string()));
    scope.errors.push(error);
    value
}

fn resolve_message_reference<'bundle>(
    id: &'bundle ast::Identifier<'bundle>,
    attribute: Option<&'bundle ast::Identifier<'bundle>>,
    scope: &mut Scope<'bundle>,
) -> FluentValue<'bundle> {
    let Some(message) = scope.bundle.get_entry_message(id.name) else {
        return reference_error(
            scope,
            ResolverError::UnknownMessage {
                id: id.name.to_owned(),
            },
        );
    };

    match attribute {
        Some(attribute) => {
            match message
                .attributes
                .iter()
                .find(|candidate| candidate.id.name == attribute.name)
            {
                Some(found) => resolve_pattern_to_value(&found.value, scope),
                None => reference_error(
                    scope,
                    ResolverError::UnknownAttribute {
                        entry: id.name.to_owned(),
                        attribute: attribute.name.to_owned(),
                    },
                ),
            }
        }
        None => match &message.value {
            Some(pattern) => resolve_pattern_to_value(pattern, scope),
            None => reference_error(
                scope,
                ResolverError::NoValue {
                    id: id.name.to_owned(),
                },
            ),
        },
    }
}

fn resolve_term_reference<'bundle>(
    id: &'bundle ast::Identifier<'bundle>,
    attribute: Option<&'bundle ast::Identifier<'bundle>>,
    arguments: Option<&'bundle ast::CallArguments<'bundle>>,
    scope: &mut Scope<'bundle>,
) -> FluentValue<'bundle> {
    let Some(term) = scope.bundle.get_entry_term(id.name) else {
        return reference_error(
            scope,
            ResolverError::UnknownTerm {
                id: id.name.to_owned(),
            },
        );
    };

    // Terms only see their own call-args; the caller's external arguments
    // never leak in. Positional call-args are rejected at parse time.
    let mut local = FluentArgs::new();
    if let Some(arguments) = arguments {
        for named in &arguments.named {
            local.set(named.name.name, literal_arg_value(&named.value));
        }
    }
    let previous = scope.local_args.replace(local);

    let value = match attribute {
        Some(attribute) => {
            match term
                .attributes
                .iter()
                .find(|candidate| candidate.id.name == attribute.name)
            {
                Some(found) => resolve_pattern_to_value(&found.value, scope),
                None => reference_error(
                    scope,
                    ResolverError::UnknownAttribute {
                        entry: format!("-{}", id.name),
                        attribute: attribute.name.to_owned(),
                    },
                ),
            }
        }
        None => resolve_pattern_to_value(&term.value, scope),
    };

    scope.local_args = previous;
    value
}

/// A named-argument literal as an argument value.
fn literal_arg_value<'bundle>(
    expression: &'bundle ast::InlineExpression<'bundle>,
) -> FluentArgValue<'bundle> {
    match expression {
        ast::InlineExpression::StringLiteral { value } => {
            FluentArgValue::Single(FluentValue::String(unescape(value)))
        }
        ast::InlineExpression::NumberLiteral { value } => {
            FluentArgValue::Single(FluentValue::try_number(value))
        }
        // Unreachable for parsed sources: named arguments are literals.
        _ => FluentArgValue::Single(FluentValue::String("".into())),
    }
}

/// One positional argument, preserving the scalar-vs-list shape of a
/// variable binding.
fn resolve_parameter<'bundle>(
    argument: &'bundle ast::InlineExpression<'bundle>,
    scope: &mut Scope<'bundle>,
) -> Parameter<'bundle> {
    if let ast::InlineExpression::VariableReference { id } = argument {
        if let Some(FluentArgValue::Many(values)) = scope.lookup_variable(id.name) {
            return Parameter::Many(values.clone());
        }
    }
    let mut values = resolve_inline_expression(argument, scope);
    if values.len() == 1 {
        Parameter::Single(values.remove(0))
    } else {
        Parameter::Many(values)
    }
}

fn options_from_named<'bundle>(
    named: &'bundle [ast::NamedArgument<'bundle>],
) -> crate::types::FunctionOptions {
    let mut options = crate::types::FunctionOptions::new();
    for argument in named {
        match &argument.value {
            ast::InlineExpression::StringLiteral { value } => {
                options.set(argument.name.name, unescape(value).into_owned());
            }
            ast::InlineExpression::NumberLiteral { value } => {
                if value.contains('.') {
                    if let Ok(double) = value.parse::<f64>() {
                        options.set(argument.name.name, double);
                    }
                } else if let Ok(integer) = value.parse::<i64>() {
                    options.set(argument.name.name, integer);
                }
            }
            _ => {}
        }
    }
    options
}

/// Instantiates a registered function for this call site, going through the
/// bundle's instance cache. `None` means the function is not registered.
fn function_instance<'bundle>(
    name: &str,
    named: &'bundle [ast::NamedArgument<'bundle>],
    scope: &Scope<'bundle>,
) -> Option<Result<Arc<FluentFunction>, FunctionError>> {
    let bundle = scope.bundle;
    let factory = bundle.registry().get(name)?;

    let call_options = options_from_named(named);
    let merged = match bundle.registry().global_options(name) {
        Some(global) => global.overridden_by(&call_options),
        None => call_options,
    };
    Some(bundle.function_cache().get_or_create(
        name,
        factory,
        bundle.primary_locale(),
        &merged,
    ))
}

fn function_error<'bundle>(
    scope: &mut Scope<'bundle>,
    name: &str,
    error: FunctionError,
) -> Vec<FluentValue<'bundle>> {
    let message = error.to_string();
    scope.errors.push(ResolverError::Function {
        func: name.to_owned(),
        message: message.clone(),
    });
    vec![FluentValue::Error(ErrorValue::Function {
        name: name.to_owned(),
        message,
    })]
}

fn call_function<'bundle>(
    name: &'bundle str,
    arguments: &'bundle ast::CallArguments<'bundle>,
    scope: &mut Scope<'bundle>,
) -> Vec<FluentValue<'bundle>> {
    if scope.bundle.registry().get(name).is_none() {
        let error = ResolverError::UnknownFunction {
            id: name.to_owned(),
        };
        let value = FluentValue::Error(ErrorValue::Reference(error.to_string()));
        scope.errors.push(error);
        return vec![value];
    }

    // Left-to-right evaluation over positional arguments.
    let positional = arguments
        .positional
        .iter()
        .map(|argument| resolve_parameter(argument, scope))
        .collect();
    let params = ResolvedParameters { positional };

    let instance = match function_instance(name, &arguments.named, scope) {
        Some(Ok(instance)) => instance,
        Some(Err(error)) => return function_error(scope, name, error),
        None => return Vec::new(),
    };

    let result = match &instance.transform {
        Some(transform) => transform(&params, &scope.function_context()),
        None => Err(FunctionError::MissingCapability {
            name: name.to_owned(),
            capability: "transform",
        }),
    };
    match result {
        Ok(values) => values,
        Err(error) => function_error(scope, name, error),
    }
}

/// Reduces a multi-value expansion through the bundle's terminal reducer.
pub(crate) fn reduce_values<'bundle>(
    values: Vec<FluentValue<'bundle>>,
    scope: &mut Scope<'bundle>,
) -> Vec<FluentValue<'bundle>> {
    let reducer = scope.bundle.registry().reducer_name().to_owned();
    let instance = match function_instance(&reducer, &[], scope) {
        Some(Ok(instance)) => instance,
        Some(Err(error)) => return function_error(scope, &reducer, error),
        None => return values,
    };
    let Some(transform) = instance.transform.as_ref() else {
        return values;
    };

    let params = ResolvedParameters {
        positional: vec![Parameter::Many(values)],
    };
    match transform(&params, &scope.function_context()) {
        Ok(reduced) => reduced,
        Err(error) => function_error(scope, &reducer, error),
    }
}

fn resolve_select<'bundle>(
    selector: &'bundle ast::InlineExpression<'bundle>,
    variants: &'bundle [ast::Variant<'bundle>],
    scope: &mut Scope<'bundle>,
) -> Vec<FluentValue<'bundle>> {
    let selector_values = resolve_inline_expression(selector, scope);

    let Some(default_index) = variants
        .iter()
        .position(|variant| variant.default)
        .or_else(|| variants.len().checked_sub(1))
    else {
        return vec![FluentValue::String("".into())];
    };
    let keys: Vec<ast::VariantKey<'bundle>> =
        variants.iter().map(|variant| variant.key.clone()).collect();

    // A selector function with the Selector capability picks the variant;
    // otherwise selection falls back on the value's type.
    let mut chosen = None;
    if let ast::InlineExpression::FunctionReference { id, arguments } = selector {
        if let Some(Ok(instance)) = function_instance(id.name, &arguments.named, scope) {
            if let Some(select_fn) = &instance.selector {
                let params = parameters_from_values(&selector_values);
                let index = select_fn(&params, &keys, default_index, &scope.function_context());
                chosen = Some(index.min(variants.len() - 1));
            }
        }
    }

    let index = match chosen {
        Some(index) => index,
        None => plain_select(&selector_values, &keys, scope).unwrap_or(default_index),
    };
    vec![resolve_pattern_to_value(&variants[index].value, scope)]
}

fn parameters_from_values<'bundle>(
    values: &[FluentValue<'bundle>],
) -> ResolvedParameters<'bundle> {
    let positional = if values.len() == 1 {
        vec![Parameter::Single(values[0].clone())]
    } else {
        vec![Parameter::Many(values.to_vec())]
    };
    ResolvedParameters { positional }
}

/// First-match selection over a plain (non-function) selector value.
fn plain_select(
    values: &[FluentValue],
    keys: &[ast::VariantKey],
    scope: &Scope,
) -> Option<usize> {
    // A list selector is not selectable; fall through to the default.
    let [value] = values else { return None };

    match value {
        FluentValue::String(s) => keys
            .iter()
            .position(|key| crate::functions::variant_key_text(key) == s.as_ref()),
        FluentValue::Number(n) => {
            crate::functions::select_number(n, keys, scope.bundle.intls())
        }
        // Errors short-circuit to the default; temporal and custom values
        // fall through without function assistance.
        _ => None,
    }
}
