use indexmap::IndexSet;

/// A `name -> set of component-names` mapping, expanded transitively (one
/// level at a time, with a visited set to break cycles) wherever a name
/// appears in a name list.
#[derive(Debug, Clone, Default)]
pub struct Alias {
    pub members: IndexSet<String>,
}
