//! Screen identifiers.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Catalog,
    Detail,
}

impl ScreenId {
    pub fn label(self) -> &'static str {
        match self {
            Self::Catalog => "Catalog",
            Self::Detail => "Detail",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
