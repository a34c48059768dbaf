//! Material and finish catalogues.

use serde::{Deserialize, Serialize};

/// Quoted material. Each material has its own reference price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    Glass,
    Mirror,
}

impl Material {
    /// All materials in display order.
    pub const ALL: [Material; 2] = [Material::Glass, Material::Mirror];

    /// Label shown in tables and documents.
    pub fn label(&self) -> &'static str {
        match self {
            Material::Glass => "Glass",
            Material::Mirror => "Mirror",
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Edge/surface finish applied to a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finish {
    Polished,
    Beveled,
    Lapped,
    Sanded,
    Tempered,
    Laminated,
    /// No finish.
    #[default]
    None,
}

impl Finish {
    /// Label shown in tables and documents.
    pub fn label(&self) -> &'static str {
        match self {
            Finish::Polished => "Polished",
            Finish::Beveled => "Beveled",
            Finish::Lapped => "Lapped",
            Finish::Sanded => "Sanded",
            Finish::Tempered => "Tempered",
            Finish::Laminated => "Laminated",
            Finish::None => "None",
        }
    }

    /// Whether any finishing work is done on the piece.
    pub fn is_finished(&self) -> bool {
        !matches!(self, Finish::None)
    }
}

impl std::fmt::Display for Finish {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
