use std::fmt;

/// Kind of interactable object a highlight is shown for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Loose lootable item lying in the world
    Item,
    /// Lootable container (crates, safes, jackets, ...)
    Container,
    /// Dead body that can be searched
    Corpse,
}

impl Category {
    /// All categories, in the order the panel lists them.
    pub const ALL: [Category; 3] = [Category::Item, Category::Container, Category::Corpse];

    /// Stable position of this category inside per-category tables.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Category::Item => 0,
            Category::Container => 1,
            Category::Corpse => 2,
        }
    }

    /// Plural name shown by the panel.
    pub fn label(self) -> &'static str {
        match self {
            Category::Item => "Items",
            Category::Container => "Containers",
            Category::Corpse => "Corpses",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
