use serde::{Deserialize, Serialize};
use std::fmt;

/// Asset category derived from the path suffix.
///
/// Variant order is the classification precedence and the bucket order in
/// reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetKind {
    Prefab,
    Model,
    Scene,
    Script,
    Texture,
    Material,
    Shader,
    Font,
    Animation,
    AnimatorController,
    Unclassified,
}

impl AssetKind {
    /// Recognized kinds in precedence order
    pub const RECOGNIZED: [AssetKind; 10] = [
        Self::Prefab,
        Self::Model,
        Self::Scene,
        Self::Script,
        Self::Texture,
        Self::Material,
        Self::Shader,
        Self::Font,
        Self::Animation,
        Self::AnimatorController,
    ];

    /// Kinds that can reference other assets when searching for referrers
    pub const REFERRERS: [AssetKind; 2] = [Self::Prefab, Self::Scene];

    /// File suffix (lowercase, with dot); `None` for unclassified
    pub fn suffix(self) -> Option<&'static str> {
        match self {
            Self::Prefab => Some(".prefab"),
            Self::Model => Some(".fbx"),
            Self::Scene => Some(".unity"),
            Self::Script => Some(".cs"),
            Self::Texture => Some(".png"),
            Self::Material => Some(".mat"),
            Self::Shader => Some(".shader"),
            Self::Font => Some(".ttf"),
            Self::Animation => Some(".anim"),
            Self::AnimatorController => Some(".controller"),
            Self::Unclassified => None,
        }
    }

    /// Bucket name used in reports
    pub fn bucket(self) -> &'static str {
        match self {
            Self::Prefab => "prefab",
            Self::Model => "model",
            Self::Scene => "scene",
            Self::Script => "script",
            Self::Texture => "texture",
            Self::Material => "material",
            Self::Shader => "shader",
            Self::Font => "font",
            Self::Animation => "animation",
            Self::AnimatorController => "animator-controller",
            Self::Unclassified => "unclassified",
        }
    }

    /// Classify a path by suffix, case-insensitively; first rule wins
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_ascii_lowercase();
        Self::RECOGNIZED
            .into_iter()
            .find(|kind| kind.suffix().is_some_and(|suffix| lower.ends_with(suffix)))
            .unwrap_or(Self::Unclassified)
    }

    /// Parse a bucket name
    pub fn from_bucket(name: &str) -> Option<Self> {
        Self::RECOGNIZED
            .into_iter()
            .chain(std::iter::once(Self::Unclassified))
            .find(|kind| kind.bucket().eq_ignore_ascii_case(name))
    }

    pub fn is_recognized(self) -> bool {
        self != Self::Unclassified
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bucket())
    }
}

/// One asset in the project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRecord {
    /// Project-relative path with forward slashes, e.g. `Assets/Tex/skin.png`
    pub path: String,

    pub kind: AssetKind,
}

impl AssetRecord {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let kind = AssetKind::from_path(&path);
        Self { path, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_suffix() {
        assert_eq!(AssetKind::from_path("Assets/Prefabs/Hero.prefab"), AssetKind::Prefab);
        assert_eq!(AssetKind::from_path("Assets/Models/Hero.FBX"), AssetKind::Model);
        assert_eq!(AssetKind::from_path("Assets/Levels/Main.unity"), AssetKind::Scene);
        assert_eq!(AssetKind::from_path("Assets/Scripts/Hero.cs"), AssetKind::Script);
        assert_eq!(AssetKind::from_path("Assets/Tex/skin.PNG"), AssetKind::Texture);
        assert_eq!(AssetKind::from_path("Assets/Mat/hero.mat"), AssetKind::Material);
        assert_eq!(AssetKind::from_path("Assets/Sh/toon.shader"), AssetKind::Shader);
        assert_eq!(AssetKind::from_path("Assets/Fonts/ui.ttf"), AssetKind::Font);
        assert_eq!(AssetKind::from_path("Assets/Anim/run.anim"), AssetKind::Animation);
        assert_eq!(
            AssetKind::from_path("Assets/Anim/run.controller"),
            AssetKind::AnimatorController
        );
    }

    #[test]
    fn test_unknown_suffix_unclassified() {
        assert_eq!(
            AssetKind::from_path("Assets/Mat/hero.mat.unknownext"),
            AssetKind::Unclassified
        );
        assert_eq!(AssetKind::from_path("Assets/readme"), AssetKind::Unclassified);
        assert!(!AssetKind::Unclassified.is_recognized());
    }

    #[test]
    fn test_bucket_names_round_trip() {
        for kind in AssetKind::RECOGNIZED {
            assert_eq!(AssetKind::from_bucket(kind.bucket()), Some(kind));
        }
        assert_eq!(AssetKind::from_bucket("Texture"), Some(AssetKind::Texture));
        assert_eq!(AssetKind::from_bucket("audio"), None);
    }

    #[test]
    fn test_precedence_matches_declaration_order() {
        let mut sorted = AssetKind::RECOGNIZED;
        sorted.sort();
        assert_eq!(sorted, AssetKind::RECOGNIZED);
    }
}
