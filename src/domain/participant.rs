use crate::error::LedgerError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default colors handed out to new participants, in order.
pub const PALETTE: [&str; 16] = [
    "#E57373", "#F06292", "#BA68C8", "#9575CD", "#7986CB", "#64B5F6", "#4DD0E1", "#4DB6AC",
    "#81C784", "#AED581", "#DCE775", "#FFF176", "#FFD54F", "#FFB74D", "#A1887F", "#90A4AE",
];

/// Opaque, stable participant identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A display color in `#RGB` or `#RRGGBB` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn parse(value: &str) -> Result<Self, LedgerError> {
        let value = value.trim();
        let digits = value.strip_prefix('#').unwrap_or("");
        let well_formed = matches!(digits.len(), 3 | 6)
            && digits.chars().all(|c| c.is_ascii_hexdigit());
        if well_formed {
            Ok(Self(value.to_string()))
        } else {
            Err(LedgerError::ValidationError(format!(
                "Invalid color '{}', use #RRGGBB",
                value
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Picks the first palette color nobody uses yet (case-insensitive).
    ///
    /// Once the palette is exhausted a random mid-range color is generated,
    /// each channel in `[30, 230)` so it stays readable on light and dark
    /// backgrounds.
    pub fn next_available<'a>(in_use: impl IntoIterator<Item = &'a Color>) -> Self {
        let used: Vec<String> = in_use
            .into_iter()
            .map(|color| color.0.to_ascii_lowercase())
            .collect();

        if let Some(free) = PALETTE
            .iter()
            .find(|candidate| !used.contains(&candidate.to_ascii_lowercase()))
        {
            return Self((*free).to_string());
        }

        let mut rng = rand::thread_rng();
        let [r, g, b]: [u8; 3] = std::array::from_fn(|_| rng.gen_range(30..230));
        Self(format!("#{:02x}{:02x}{:02x}", r, g, b))
    }
}

impl TryFrom<String> for Color {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Participant {
    /// Builds a participant with a fresh id. The name is trimmed and must
    /// not be blank; uniqueness is checked by the ledger.
    pub fn new(name: &str, color: Option<Color>) -> Result<Self, LedgerError> {
        Ok(Self {
            id: ParticipantId::generate(),
            name: validate_name(name)?,
            color,
        })
    }
}

/// Fields that may change on an existing participant. The id never does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantUpdate {
    pub name: Option<String>,
    pub color: Option<Color>,
}

pub(crate) fn validate_name(name: &str) -> Result<String, LedgerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::ValidationError(
            "Participant name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}
