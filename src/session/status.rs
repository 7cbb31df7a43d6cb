use std::{fmt, str::FromStr};

use anyhow::{bail, Error};
use serde::Serialize;

use crate::error::QueryError;

/// What the "Currently Searching" indicator shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum SearchStatus {
    #[default]
    None,
    NoInput,
    NotFound,
    Searching(i64),
}

impl From<QueryError> for SearchStatus {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::InputEmpty => SearchStatus::NoInput,
            QueryError::InputInvalid | QueryError::NotFound => SearchStatus::NotFound,
        }
    }
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStatus::None => write!(f, "(none)"),
            SearchStatus::NoInput => write!(f, "(no input)"),
            SearchStatus::NotFound => write!(f, "[TAZ Not Found]"),
            SearchStatus::Searching(id) => write!(f, "{id}"),
        }
    }
}

/// Map tile background. Opaque to the engine: stored for the host, never read by a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    #[default]
    CartoDbPositron,
    EsriImagery,
}

impl Background {
    pub fn to_str(&self) -> &'static str {
        match self {
            Background::CartoDbPositron => "CartoDB Positron",
            Background::EsriImagery => "ESRI Satellite",
        }
    }
}

impl FromStr for Background {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cartodb positron" | "cartodb" | "positron" => Ok(Background::CartoDbPositron),
            "esri satellite" | "esri" | "satellite" => Ok(Background::EsriImagery),
            other => bail!("unknown map background {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels() {
        assert_eq!(SearchStatus::default().to_string(), "(none)");
        assert_eq!(SearchStatus::from(QueryError::InputEmpty).to_string(), "(no input)");
        assert_eq!(SearchStatus::from(QueryError::NotFound).to_string(), "[TAZ Not Found]");
        assert_eq!(SearchStatus::Searching(42).to_string(), "42");
    }

    #[test]
    fn background_names() {
        assert_eq!("CartoDB Positron".parse::<Background>().unwrap(), Background::CartoDbPositron);
        assert_eq!("ESRI Satellite".parse::<Background>().unwrap(), Background::EsriImagery);
        for background in [Background::CartoDbPositron, Background::EsriImagery] {
            assert_eq!(background.to_str().parse::<Background>().unwrap(), background);
        }
        assert!("Stamen Toner".parse::<Background>().is_err());
    }
}
