use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};


/// The one-dimensional barcode symbologies that can be printed on a membership card.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum Symbology {
    #[default]
    Code128,
    Code39,
    Ean13,
}
impl Symbology {
    pub const ALL: [Symbology; 3] = [Symbology::Code128, Symbology::Code39, Symbology::Ean13];

    /// The canonical name, as used by card templates.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Code128 => "Code128",
            Self::Code39 => "Code39",
            Self::Ean13 => "EAN13",
        }
    }

    /// Looks up a symbology by name. Case is ignored, as are dashes, underscores and spaces (so
    /// `"EAN-13"` and `"code_128"` are accepted).
    pub fn from_name(name: &str) -> Option<Self> {
        let folded: String = name.chars()
            .filter(|c| *c != '-' && *c != '_' && *c != ' ')
            .flat_map(|c| c.to_lowercase())
            .collect();
        match folded.as_str() {
            "code128" => Some(Self::Code128),
            "code39" => Some(Self::Code39),
            "ean13" => Some(Self::Ean13),
            _ => None,
        }
    }
}
impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
impl FromStr for Symbology {
    type Err = UnknownSymbology;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .ok_or_else(|| UnknownSymbology(s.to_owned()))
    }
}
impl TryFrom<String> for Symbology {
    type Error = UnknownSymbology;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
impl From<Symbology> for String {
    fn from(value: Symbology) -> Self {
        value.name().to_owned()
    }
}


#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct UnknownSymbology(pub String);
impl fmt::Display for UnknownSymbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown barcode symbology {:?}", self.0)
    }
}
impl std::error::Error for UnknownSymbology {
}
