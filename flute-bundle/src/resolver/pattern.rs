use std::fmt;

use flute_syntax::ast;

use super::expression;
use super::scope::Scope;
use crate::types::{ErrorValue, FluentValue};

const FSI: char = '\u{2068}';
const PDI: char = '\u{2069}';

/// Resolves a pattern to a single value.
///
/// The contract, in order: a dirty scope short-circuits; a pattern with
/// exactly one text element is returned borrowed without tracking (no
/// placeable means no cycle); anything else is tracked in the traversal set
/// while its elements are written out.
pub(crate) fn resolve_pattern_to_value<'bundle>(
    pattern: &'bundle ast::Pattern<'bundle>,
    scope: &mut Scope<'bundle>,
) -> FluentValue<'bundle> {
    if scope.dirty {
        return FluentValue::Error(ErrorValue::Dirty);
    }
    if let [ast::PatternElement::TextElement(text)] = pattern.elements.as_slice() {
        return FluentValue::String((*text).into());
    }
    if scope.is_travelled(pattern) {
        scope.mark_cyclic();
        return FluentValue::Error(ErrorValue::Dirty);
    }

    scope.travelled.push(pattern);
    let mut out = String::new();
    // Writing into a String is infallible.
    let _ = write_pattern(pattern, &mut out, scope);
    scope.travelled.pop();
    FluentValue::String(out.into())
}

pub(crate) fn write_pattern<'bundle, W: fmt::Write>(
    pattern: &'bundle ast::Pattern<'bundle>,
    w: &mut W,
    scope: &mut Scope<'bundle>,
) -> fmt::Result {
    for element in &pattern.elements {
        match element {
            ast::PatternElement::TextElement(text) => w.write_str(text)?,
            ast::PatternElement::Placeable(expression) => {
                if scope.dirty || !scope.charge_placeable() {
                    w.write_str("[dirty]")?;
                    continue;
                }

                let isolate =
                    scope.bundle.use_isolation && !is_isolation_exempt(expression);
                if isolate {
                    w.write_char(FSI)?;
                }
                let values = expression::resolve_expression(expression, scope);
                write_values(w, values, scope)?;
                if isolate {
                    w.write_char(PDI)?;
                }
            }
        }
    }
    Ok(())
}

/// Literals, message/term references and select expressions expand into
/// translation-authored text and need no isolation; variable and function
/// expansions carry caller data of unknown directionality and do.
fn is_isolation_exempt(expression: &ast::Expression) -> bool {
    matches!(
        expression,
        ast::Expression::SelectExpression { .. }
            | ast::Expression::InlineExpression(
                ast::InlineExpression::StringLiteral { .. }
                    | ast::InlineExpression::MessageReference { .. }
                    | ast::InlineExpression::TermReference { .. }
            )
    )
}

/// Reduces an expansion's value list into the output buffer. A single
/// value writes itself; longer lists go through the bundle's terminal
/// reducer.
fn write_values<'bundle, W: fmt::Write>(
    w: &mut W,
    values: Vec<FluentValue<'bundle>>,
    scope: &mut Scope<'bundle>,
) -> fmt::Result {
    match values.len() {
        0 => Ok(()),
        1 => values[0].write(w, scope.bundle.intls()),
        _ => {
            let reduced = expression::reduce_values(values, scope);
            for value in &reduced {
                value.write(w, scope.bundle.intls())?;
            }
            Ok(())
        }
    }
}
