use indexmap::IndexMap;

/// Label table: name -> program counter location, in definition order.
/// The first definition of a name wins; later ones are rejected so every
/// reference resolves to the first location.
#[derive(Debug, Default, Clone)]
pub struct Labels(IndexMap<String, u16>);

impl Labels {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Returns `false` when `name` was already defined (the table keeps the
    /// earlier location).
    pub fn insert(&mut self, name: &str, location: u16) -> bool {
        if self.0.contains_key(name) {
            return false;
        }
        self.0.insert(name.to_string(), location);
        true
    }

    pub fn get(&self, name: &str) -> Option<u16> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Macro table: name -> raw substitution text. Redefinition overwrites.
#[derive(Debug, Default, Clone)]
pub struct Macros(IndexMap<String, String>);

impl Macros {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, name: &str, text: &str) {
        self.0.insert(name.to_string(), text.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}
