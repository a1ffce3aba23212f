//! Renderer and layout engine selectors.
//!
//! Authors pick an exporter backend with the `renderer` attribute and, for
//! the PlantUML family, a layout engine with `plantumlLayoutEngine`. Both are
//! closed enumerations:
//!
//! - [`RendererKind`] - which backend family, matched case-sensitively.
//! - [`LayoutEngine`] - PlantUML layout sub-strategy, matched case-insensitively.
//! - [`Renderer`] - the resolved backend with its per-variant parameters.
//! - [`ViewKey`] - the non-empty key of a view within a workspace.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Errors raised while interpreting selector attributes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("unknown diagram renderer `{0}` (expected one of: structurizr, plantuml-c4, mermaid)")]
    UnknownRenderer(String),

    #[error("unknown PlantUML layout engine `{0}` (expected one of: graphviz, smetana, elk)")]
    UnknownLayoutEngine(String),

    #[error("view key must not be empty")]
    EmptyViewKey,
}

/// The backend family requested by the `renderer` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RendererKind {
    /// Native Structurizr renderer (default).
    #[default]
    Structurizr,
    /// C4-PlantUML export rendered by PlantUML.
    PlantUmlC4,
    /// Mermaid export rendered by the Mermaid CLI.
    Mermaid,
}

impl FromStr for RendererKind {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "structurizr" => Ok(Self::Structurizr),
            "plantuml-c4" => Ok(Self::PlantUmlC4),
            "mermaid" => Ok(Self::Mermaid),
            _ => Err(SelectorError::UnknownRenderer(s.to_string())),
        }
    }
}

impl From<RendererKind> for &'static str {
    fn from(val: RendererKind) -> Self {
        match val {
            RendererKind::Structurizr => "structurizr",
            RendererKind::PlantUmlC4 => "plantuml-c4",
            RendererKind::Mermaid => "mermaid",
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Automatic layout engine used by PlantUML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutEngine {
    /// Graphviz `dot` (default).
    #[default]
    Graphviz,
    /// Smetana, the Java port of Graphviz bundled with PlantUML.
    Smetana,
    /// Eclipse Layout Kernel.
    Elk,
}

impl FromStr for LayoutEngine {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "graphviz" => Ok(Self::Graphviz),
            "smetana" => Ok(Self::Smetana),
            "elk" => Ok(Self::Elk),
            _ => Err(SelectorError::UnknownLayoutEngine(s.to_string())),
        }
    }
}

impl From<LayoutEngine> for &'static str {
    fn from(val: LayoutEngine) -> Self {
        match val {
            LayoutEngine::Graphviz => "graphviz",
            LayoutEngine::Smetana => "smetana",
            LayoutEngine::Elk => "elk",
        }
    }
}

impl fmt::Display for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// A resolved exporter backend together with its construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Renderer {
    Structurizr,
    PlantUmlC4 { layout: LayoutEngine },
    Mermaid,
}

impl Renderer {
    /// Resolves the renderer from the raw `renderer` and layout engine attributes.
    ///
    /// Missing values take their defaults (`structurizr` and `graphviz`). The
    /// layout engine is validated whenever a value is supplied, even for
    /// renderers that do not use it.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::UnknownRenderer`] or
    /// [`SelectorError::UnknownLayoutEngine`] naming the offending value.
    ///
    /// # Examples
    ///
    /// ```
    /// use diorama_core::selector::{LayoutEngine, Renderer};
    ///
    /// let renderer = Renderer::resolve(Some("plantuml-c4"), Some("GRAPHVIZ")).unwrap();
    /// assert_eq!(renderer, Renderer::PlantUmlC4 { layout: LayoutEngine::Graphviz });
    ///
    /// assert_eq!(Renderer::resolve(None, None).unwrap(), Renderer::Structurizr);
    /// assert!(Renderer::resolve(Some("mermaid"), Some("circo")).is_err());
    /// ```
    pub fn resolve(renderer: Option<&str>, layout: Option<&str>) -> Result<Self, SelectorError> {
        let layout = layout.map(str::parse::<LayoutEngine>).transpose()?;
        let kind = renderer
            .map(str::parse::<RendererKind>)
            .transpose()?
            .unwrap_or_default();

        Ok(match kind {
            RendererKind::Structurizr => Renderer::Structurizr,
            RendererKind::PlantUmlC4 => Renderer::PlantUmlC4 {
                layout: layout.unwrap_or_default(),
            },
            RendererKind::Mermaid => Renderer::Mermaid,
        })
    }

    /// Returns the backend family of this renderer.
    pub fn kind(&self) -> RendererKind {
        match self {
            Renderer::Structurizr => RendererKind::Structurizr,
            Renderer::PlantUmlC4 { .. } => RendererKind::PlantUmlC4,
            Renderer::Mermaid => RendererKind::Mermaid,
        }
    }
}

impl fmt::Display for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Renderer::PlantUmlC4 { layout } => write!(f, "{} ({layout})", self.kind()),
            _ => write!(f, "{}", self.kind()),
        }
    }
}

/// The key of one view within a model workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewKey(String);

impl ViewKey {
    /// Creates a view key, rejecting empty and whitespace-only values.
    pub fn new(key: impl Into<String>) -> Result<Self, SelectorError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(SelectorError::EmptyViewKey);
        }
        Ok(Self(key))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ViewKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_renderer_kind_round_trip_names() {
        for kind in [
            RendererKind::Structurizr,
            RendererKind::PlantUmlC4,
            RendererKind::Mermaid,
        ] {
            assert_eq!(kind.to_string().parse::<RendererKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_renderer_kind_is_case_sensitive() {
        assert_eq!(
            "Mermaid".parse::<RendererKind>(),
            Err(SelectorError::UnknownRenderer("Mermaid".to_string()))
        );
        assert!("plantuml".parse::<RendererKind>().is_err());
    }

    #[test]
    fn test_resolve_defaults() {
        assert_eq!(Renderer::resolve(None, None), Ok(Renderer::Structurizr));
        assert_eq!(
            Renderer::resolve(Some("plantuml-c4"), None),
            Ok(Renderer::PlantUmlC4 {
                layout: LayoutEngine::Graphviz
            })
        );
    }

    #[test]
    fn test_resolve_injects_layout_engine() {
        assert_eq!(
            Renderer::resolve(Some("plantuml-c4"), Some("Smetana")),
            Ok(Renderer::PlantUmlC4 {
                layout: LayoutEngine::Smetana
            })
        );
    }

    #[test]
    fn test_resolve_unknown_renderer_names_value() {
        let err = Renderer::resolve(Some("graphviz"), None).unwrap_err();
        assert_eq!(err, SelectorError::UnknownRenderer("graphviz".to_string()));
        assert!(err.to_string().contains("`graphviz`"));
    }

    #[test]
    fn test_resolve_invalid_layout_fails_for_every_renderer() {
        for renderer in ["structurizr", "plantuml-c4", "mermaid"] {
            assert_eq!(
                Renderer::resolve(Some(renderer), Some("neato")),
                Err(SelectorError::UnknownLayoutEngine("neato".to_string()))
            );
        }
    }

    #[test]
    fn test_view_key_rejects_blank() {
        assert_eq!(ViewKey::new(""), Err(SelectorError::EmptyViewKey));
        assert_eq!(ViewKey::new("  "), Err(SelectorError::EmptyViewKey));
        assert_eq!(ViewKey::new("SystemContext").unwrap().as_str(), "SystemContext");
    }

    proptest! {
        #[test]
        fn prop_layout_engine_ignores_case(mask in proptest::collection::vec(any::<bool>(), 8)) {
            let name: String = "graphviz"
                .chars()
                .zip(mask)
                .map(|(c, upper)| if upper { c.to_ascii_uppercase() } else { c })
                .collect();
            prop_assert_eq!(name.parse::<LayoutEngine>(), Ok(LayoutEngine::Graphviz));
        }
    }
}
