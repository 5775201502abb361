//! List-then-disambiguate selection, shared by the component and
//! environment gates.

/// How a selected entity was chosen, reported in the version listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Only one candidate existed.
    AutoSelected,
    /// The caller named it.
    Explicit,
}

impl Provenance {
    pub fn label(self) -> &'static str {
        match self {
            Provenance::AutoSelected => "auto-selected",
            Provenance::Explicit => "specified",
        }
    }
}

/// Result of applying the selection policy to a fetched list.
#[derive(Debug)]
pub enum Pick<'a, T> {
    /// Exactly one entity resolved (singleton list or exact name match).
    One(&'a T, Provenance),
    /// Multiple candidates and no name supplied: prompt, do not error.
    NeedChoice,
    /// A name was supplied but matched nothing.
    NoMatch,
    /// Nothing to select from.
    Empty,
}

/// Apply the selection policy: zero is empty, one auto-selects, an explicit
/// name must exact-match, many without a name need a choice.
pub fn pick<'a, T>(
    items: &'a [T],
    requested: Option<&str>,
    name_of: impl Fn(&T) -> &str,
) -> Pick<'a, T> {
    if items.is_empty() {
        return Pick::Empty;
    }
    if let Some(requested) = requested {
        return match items.iter().find(|item| name_of(item) == requested) {
            Some(found) => Pick::One(found, Provenance::Explicit),
            None => Pick::NoMatch,
        };
    }
    if items.len() == 1 {
        return Pick::One(&items[0], Provenance::AutoSelected);
    }
    Pick::NeedChoice
}
