//! Mesh role classification
//!
//! An ordered rule table maps node names and source material names to the
//! role a mesh plays in the eyewear model. The first matching rule wins.
//! Matching is case-insensitive.

/// Part of the eyewear a mesh represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshRole {
    /// Upper rim of the front frame
    FrameUp,
    /// Lower rim of the front frame
    FrameDown,
    /// Plain temple arm
    Arm,
    /// Temple arm carrying printed text
    ArmOverlay,
    /// Tinted lens
    Lens,
    /// Inner lens backing
    LensBack,
    /// Logo decal
    Logo,
    /// Baked interior seen through the lenses
    FakeInterior,
}

/// Which name a rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    /// The node name
    NodeName,
    /// The mesh's source material name
    MaterialName,
}

/// How a rule compares names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Substring match
    Contains(&'static str),
    /// Whole-name match
    Equals(&'static str),
}

impl Pattern {
    fn matches(self, lowercase_name: &str) -> bool {
        match self {
            Pattern::Contains(needle) => lowercase_name.contains(needle),
            Pattern::Equals(expected) => lowercase_name == expected,
        }
    }
}

/// One row of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifierRule {
    /// Name inspected
    pub field: MatchField,
    /// Lowercase pattern
    pub pattern: Pattern,
    /// Lowercase substring that vetoes the rule
    pub unless_contains: Option<&'static str>,
    /// Role assigned on match
    pub role: MeshRole,
}

impl ClassifierRule {
    const fn node(pattern: Pattern, role: MeshRole) -> Self {
        Self {
            field: MatchField::NodeName,
            pattern,
            unless_contains: None,
            role,
        }
    }

    const fn material(pattern: Pattern, role: MeshRole) -> Self {
        Self {
            field: MatchField::MaterialName,
            pattern,
            unless_contains: None,
            role,
        }
    }
}

/// Rules for the shipped eyewear models
pub const DEFAULT_RULES: [ClassifierRule; 11] = [
    ClassifierRule::node(Pattern::Contains("arm_text"), MeshRole::ArmOverlay),
    ClassifierRule::node(Pattern::Contains("frame_up"), MeshRole::FrameUp),
    ClassifierRule::node(Pattern::Contains("frame_down"), MeshRole::FrameDown),
    ClassifierRule {
        field: MatchField::NodeName,
        pattern: Pattern::Contains("arm"),
        unless_contains: Some("text"),
        role: MeshRole::Arm,
    },
    ClassifierRule::node(Pattern::Contains("glasback"), MeshRole::LensBack),
    ClassifierRule::node(Pattern::Contains("lens_back"), MeshRole::LensBack),
    ClassifierRule::node(Pattern::Contains("lensback"), MeshRole::LensBack),
    ClassifierRule::node(Pattern::Contains("lens"), MeshRole::Lens),
    ClassifierRule::node(Pattern::Contains("logo"), MeshRole::Logo),
    ClassifierRule::material(Pattern::Contains("glass"), MeshRole::Lens),
    ClassifierRule::material(Pattern::Equals("fake"), MeshRole::FakeInterior),
];

/// Ordered rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    rules: Vec<ClassifierRule>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl Classifier {
    /// Create a classifier from rules in priority order
    pub fn new(rules: Vec<ClassifierRule>) -> Self {
        Self { rules }
    }

    /// Rules in priority order
    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }

    /// Role of a mesh, `None` when no rule matches
    pub fn classify(&self, node_name: &str, material_name: Option<&str>) -> Option<MeshRole> {
        let node_name = node_name.to_lowercase();
        let material_name = material_name.map(str::to_lowercase);

        self.rules.iter().find_map(|rule| {
            let name = match rule.field {
                MatchField::NodeName => node_name.as_str(),
                MatchField::MaterialName => material_name.as_deref()?,
            };
            let vetoed = rule.unless_contains.is_some_and(|veto| name.contains(veto));
            (rule.pattern.matches(name) && !vetoed).then_some(rule.role)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roles() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("Frame_Up_001", None), Some(MeshRole::FrameUp));
        assert_eq!(classifier.classify("frame_down", Some("Plastic")), Some(MeshRole::FrameDown));
        assert_eq!(classifier.classify("Arm_L", None), Some(MeshRole::Arm));
        assert_eq!(classifier.classify("Arm_Text_R", None), Some(MeshRole::ArmOverlay));
        assert_eq!(classifier.classify("Lens_L", Some("Glass_Tint")), Some(MeshRole::Lens));
        assert_eq!(classifier.classify("GlasBack_L", Some("glass")), Some(MeshRole::LensBack));
        assert_eq!(classifier.classify("Logo", None), Some(MeshRole::Logo));
        assert_eq!(classifier.classify("Interior", Some("FAKE")), Some(MeshRole::FakeInterior));
    }

    #[test]
    fn test_unmatched_and_exact_rules() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("Hinge", Some("Metal")), None);
        assert_eq!(classifier.classify("Interior", Some("fake_blur")), None);
        assert_eq!(classifier.classify("Interior", None), None);
    }

    #[test]
    fn test_lens_by_node_name() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("lens", None), Some(MeshRole::Lens));
        assert_eq!(classifier.classify("Lens_R", Some("Tint")), Some(MeshRole::Lens));
        assert_eq!(classifier.classify("Lens_Back_L", None), Some(MeshRole::LensBack));
        assert_eq!(classifier.classify("LensBack", Some("Glass")), Some(MeshRole::LensBack));
    }

    #[test]
    fn test_text_veto_without_overlay_rule() {
        let classifier = Classifier::new(vec![DEFAULT_RULES[3]]);
        assert_eq!(classifier.classify("Arm_Text", None), None);
        assert_eq!(classifier.classify("arm_r", None), Some(MeshRole::Arm));
    }
}
