use serde::{Deserialize, Serialize};

/// Coarse category bucket for a holding.
///
/// The form only offers the four known classes, but older records carry
/// free-form "type" strings. Those are kept verbatim in [`AssetClass::Other`]
/// so that no position is ever dropped from an aggregation.
///
/// Serialized as a plain string (`"cash"`, `"bonds"`, ..., or the legacy value).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetClass {
    Cash,
    Bonds,
    Equities,
    Alternatives,
    /// Legacy / unlisted class, keyed by the stored text
    Other(String),
}

impl AssetClass {
    /// The four classes offered by the position form, in display order.
    pub const KNOWN: [AssetClass; 4] = [
        AssetClass::Cash,
        AssetClass::Bonds,
        AssetClass::Equities,
        AssetClass::Alternatives,
    ];

    /// Parse a stored or user-entered class name.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Anything unrecognised becomes `Other` with the trimmed text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "cash" => AssetClass::Cash,
            "bonds" | "bond" => AssetClass::Bonds,
            "equities" | "equity" => AssetClass::Equities,
            "alternatives" | "alternative" => AssetClass::Alternatives,
            _ => AssetClass::Other(trimmed.to_string()),
        }
    }

    /// Canonical form of a value built directly rather than through [`parse`](Self::parse).
    ///
    /// `Other(" Cash ")` becomes `Cash` and `Other(" crypto ")` becomes
    /// `Other("crypto")`, matching what a serde round trip yields.
    pub fn normalized(self) -> Self {
        match self {
            AssetClass::Other(raw) => AssetClass::parse(&raw),
            known => known,
        }
    }

    /// Only bond positions contribute to the accrued-interest total.
    pub fn is_bond_like(&self) -> bool {
        matches!(self, AssetClass::Bonds)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AssetClass::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            AssetClass::Cash => "cash",
            AssetClass::Bonds => "bonds",
            AssetClass::Equities => "equities",
            AssetClass::Alternatives => "alternatives",
            AssetClass::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetClass::Cash => write!(f, "Cash"),
            AssetClass::Bonds => write!(f, "Bonds"),
            AssetClass::Equities => write!(f, "Equities"),
            AssetClass::Alternatives => write!(f, "Alternatives"),
            AssetClass::Other(raw) => write!(f, "{raw}"),
        }
    }
}

impl From<String> for AssetClass {
    fn from(raw: String) -> Self {
        AssetClass::parse(&raw)
    }
}

impl From<&str> for AssetClass {
    fn from(raw: &str) -> Self {
        AssetClass::parse(raw)
    }
}

impl From<AssetClass> for String {
    fn from(class: AssetClass) -> Self {
        class.as_str().to_string()
    }
}
