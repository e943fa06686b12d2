use flute_syntax::ast;
use flute_syntax::parser::{parse, ParserError};
use self_cell::self_cell;

type Resource<'s> = ast::Resource<'s>;

self_cell!(
    struct InnerFluentResource {
        owner: String,

        #[covariant]
        dependent: Resource,
    }

    impl {Debug}
);

/// A parsed FTL source: owns the source string, the AST borrowing from it,
/// and the recovery diagnostics collected while parsing.
///
/// # Example
///
/// ```
/// use flute_bundle::FluentResource;
///
/// let ftl = String::from("hello = Hi!\ngoodbye = Bye!\n");
/// let resource = FluentResource::try_new(ftl)
///     .expect("Failed to parse an FTL string.");
/// assert_eq!(resource.errors().len(), 0);
/// ```
#[derive(Debug)]
pub struct FluentResource {
    inner: InnerFluentResource,
    errors: Vec<ParserError>,
}

impl FluentResource {
    /// Parses `source` into a resource.
    ///
    /// On recovered parse errors the resource is still produced — junk
    /// entries stand in for the skipped spans — and returned in the `Err`
    /// arm together with the diagnostics.
    pub fn try_new(source: String) -> Result<Self, (Self, Vec<ParserError>)> {
        let mut parse_errors = None;
        let inner = InnerFluentResource::new(source, |source| match parse(source) {
            Ok(ast) => ast,
            Err((ast, errors)) => {
                parse_errors = Some(errors);
                ast
            }
        });

        match parse_errors {
            None => Ok(Self {
                inner,
                errors: Vec::new(),
            }),
            Some(errors) => Err((
                Self {
                    inner,
                    errors: errors.clone(),
                },
                errors,
            )),
        }
    }

    pub fn source(&self) -> &str {
        self.inner.borrow_owner()
    }

    pub fn ast(&self) -> &ast::Resource<'_> {
        self.inner.borrow_dependent()
    }

    /// Diagnostics recovered while parsing, in source order.
    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    /// Raw source spans skipped during recovery, in source order.
    pub fn junk(&self) -> impl Iterator<Item = &str> {
        self.ast().body.iter().filter_map(|entry| match entry {
            ast::ResourceEntry::Junk(slice) => Some(*slice),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_borrows() {
        let resource = FluentResource::try_new("key = Value\n".to_owned()).unwrap();
        assert_eq!(resource.source(), "key = Value\n");
        assert_eq!(resource.ast().body.len(), 1);
        assert_eq!(resource.junk().count(), 0);
    }

    #[test]
    fn recovered_errors_still_produce_a_resource() {
        let (resource, errors) =
            FluentResource::try_new("key = Value\n0bad\n".to_owned()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(resource.errors(), errors.as_slice());
        assert_eq!(resource.junk().collect::<Vec<_>>(), vec!["0bad\n"]);
    }
}
