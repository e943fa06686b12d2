use flute_syntax::ast;

use crate::bundle::FluentBundle;

/// A bundle index slot: `[resource index, entry index]` into the bundle's
/// resource list. Entries borrow nothing, so the bundle stays freely
/// movable while still resolving lookups in O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Message([usize; 2]),
    Term([usize; 2]),
}

pub trait GetEntry {
    fn get_entry_message<'bundle>(&'bundle self, id: &str) -> Option<&'bundle ast::Message<'bundle>>;
    fn get_entry_term<'bundle>(&'bundle self, id: &str) -> Option<&'bundle ast::Term<'bundle>>;
}

impl GetEntry for FluentBundle {
    fn get_entry_message<'bundle>(
        &'bundle self,
        id: &str,
    ) -> Option<&'bundle ast::Message<'bundle>> {
        match self.entries.get(id)? {
            Entry::Message([resource, entry]) => {
                match self.resources.get(*resource)?.ast().body.get(*entry)? {
                    ast::ResourceEntry::Entry(ast::Entry::Message(message)) => Some(message),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn get_entry_term<'bundle>(&'bundle self, id: &str) -> Option<&'bundle ast::Term<'bundle>> {
        match self.entries.get(id)? {
            Entry::Term([resource, entry]) => {
                match self.resources.get(*resource)?.ast().body.get(*entry)? {
                    ast::ResourceEntry::Entry(ast::Entry::Term(term)) => Some(term),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}
