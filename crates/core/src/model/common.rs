/// Fields shared by every component kind. Each component is a tagged
/// variant of its own type with these fields embedded, rather than a
/// shared base class.
#[derive(Debug, Clone)]
pub struct Common {
    /// Stable identity. Set once at creation and never changed.
    pub name: String,
    /// Mutable display label. Defaults to `name`.
    pub label: String,
    pub description: String,
    /// True once the component has been referenced by an interaction
    /// (elements/data) or by a risk/mitigation (threats/measures), or
    /// always true for notes and clusters once created.
    pub active: bool,
}

impl Common {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            description: String::new(),
            active: false,
        }
    }
}

/// Which of the six named component kinds a name belongs to. Used by the
/// global name registry to enforce cross-kind uniqueness and by name-list
/// expansion's type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Cluster,
    Element,
    Datum,
    Threat,
    Measure,
    Note,
}

impl ComponentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cluster => "cluster",
            Self::Element => "element",
            Self::Datum => "datum",
            Self::Threat => "threat",
            Self::Measure => "measure",
            Self::Note => "note",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
