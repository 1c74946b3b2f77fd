use thiserror::Error;

/// Label used when an app has no entry in [`DESIGNATOR_LABELS`].
pub const DEFAULT_DESIGNATOR_LABEL: &str = "F/N";

/// Designator terminology per app key.
pub static DESIGNATOR_LABELS: &[(&str, &str)] = &[
    ("pcbas", "Ref.Des."),
    ("assemblies", "F/N"),
    ("parts", "F/N"),
];

pub fn designator_label(app: Option<&str>) -> &'static str {
    app.and_then(|key| {
        DESIGNATOR_LABELS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, label)| *label)
    })
    .unwrap_or(DEFAULT_DESIGNATOR_LABEL)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemApp {
    Parts,
    Pcbas,
    Assemblies,
}

impl ItemApp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parts => "parts",
            Self::Pcbas => "pcbas",
            Self::Assemblies => "assemblies",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Parts => "Part",
            Self::Pcbas => "PCBA",
            Self::Assemblies => "Assembly",
        }
    }

    pub fn designator_label(&self) -> &'static str {
        designator_label(Some(self.as_str()))
    }

    pub fn parse(input: &str) -> Result<Self, ItemRefError> {
        match input.trim().to_lowercase().as_str() {
            "parts" | "part" => Ok(Self::Parts),
            "pcbas" | "pcba" => Ok(Self::Pcbas),
            "assemblies" | "assembly" | "asm" => Ok(Self::Assemblies),
            other => Err(ItemRefError::UnknownApp(other.to_string())),
        }
    }
}

impl std::fmt::Display for ItemApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemRefError {
    #[error("expected <app>/<id>, got '{0}'")]
    InvalidFormat(String),
    #[error("unknown app '{0}' (expected parts, pcbas or assemblies)")]
    UnknownApp(String),
    #[error("invalid item id '{0}'")]
    InvalidId(String),
}

/// A tracked entity: the app it lives in plus its backend id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub app: ItemApp,
    pub id: u64,
}

impl ItemRef {
    pub fn new(app: ItemApp, id: u64) -> Self {
        Self { app, id }
    }

    /// Parses `"<app>/<id>"`, e.g. `pcbas/42`.
    pub fn parse(input: &str) -> Result<Self, ItemRefError> {
        let trimmed = input.trim().trim_matches('/');
        let (app, id) = trimmed
            .split_once('/')
            .ok_or_else(|| ItemRefError::InvalidFormat(input.to_string()))?;
        let app = ItemApp::parse(app)?;
        let id = id
            .trim()
            .parse::<u64>()
            .map_err(|_| ItemRefError::InvalidId(id.to_string()))?;
        Ok(Self { app, id })
    }
}

impl std::fmt::Display for ItemRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.app, self.id)
    }
}

impl std::str::FromStr for ItemRef {
    type Err = ItemRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
