use std::fmt;

use serde::{Deserialize, Serialize};

/// The course a menu item belongs to. Each order holds at most one item per
/// category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Entree,
    Side,
    Accompaniment,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Entree, Self::Side, Self::Accompaniment];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entree => "entree",
            Self::Side => "side",
            Self::Accompaniment => "accompaniment",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Entree => "Entree",
            Self::Side => "Side Dish",
            Self::Accompaniment => "Accompaniment",
        }
    }

    /// Parses a category code. Matching ignores case and surrounding
    /// whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entree" => Some(Self::Entree),
            "side" => Some(Self::Side),
            "accompaniment" => Some(Self::Accompaniment),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
