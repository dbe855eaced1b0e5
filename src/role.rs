//! Panel roles and filename-based role inference.
//!
//! A role names the packaging face an artwork image belongs to. When the
//! user picks image files we guess the role from the filename so that a
//! folder of `front.png`, `back.png`, `left.png` needs no manual tagging.
//!
//! ## Matching rules
//!
//! The filename is lowercased and `_`, `-`, `.` and whitespace are treated
//! as word separators, so `bottle_back.png` reads as the words
//! `bottle back png`. Rules are tried in order and the first hit wins:
//!
//! | Role | Matches |
//! |------|---------|
//! | front  | word `front`, `f` or `main` |
//! | back   | word `back` or `b`; a word starting `ingr`; `nutrition`; `directions` |
//! | left   | word `left` or `l` |
//! | right  | word `right` or `r` |
//! | top    | word `top` or `t` |
//! | bottom | word `bottom`; `btm` |
//! | cap    | word `cap` |
//!
//! Anything else is [`PanelRole::Generic`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The packaging face an artwork image represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelRole {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
    Cap,
    #[default]
    Generic,
}

impl PanelRole {
    /// Every role, in display order.
    pub const ALL: [PanelRole; 8] = [
        PanelRole::Front,
        PanelRole::Back,
        PanelRole::Left,
        PanelRole::Right,
        PanelRole::Top,
        PanelRole::Bottom,
        PanelRole::Cap,
        PanelRole::Generic,
    ];

    /// Wire value, as the backend expects it.
    pub fn as_str(self) -> &'static str {
        match self {
            PanelRole::Front => "front",
            PanelRole::Back => "back",
            PanelRole::Left => "left",
            PanelRole::Right => "right",
            PanelRole::Top => "top",
            PanelRole::Bottom => "bottom",
            PanelRole::Cap => "cap",
            PanelRole::Generic => "generic",
        }
    }

    /// Parse a role hint from the backend, falling back to `generic`.
    pub fn from_hint(hint: Option<&str>) -> Self {
        hint.and_then(|h| h.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for PanelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the eight roles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown panel role '{0}' (expected one of: front, back, left, right, top, bottom, cap, generic)")]
pub struct UnknownRole(pub String);

impl FromStr for PanelRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        PanelRole::ALL
            .into_iter()
            .find(|r| r.as_str() == lower)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

// ── Inference ────────────────────────────────────────────────────────────────

static RE_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[_\-.\s]+").unwrap());

static RULES: Lazy<Vec<(PanelRole, Regex)>> = Lazy::new(|| {
    [
        (PanelRole::Front, r"\b(front|f|main)\b"),
        (PanelRole::Back, r"\b(back|b)\b|\bingr|nutrition|directions"),
        (PanelRole::Left, r"\b(left|l)\b"),
        (PanelRole::Right, r"\b(right|r)\b"),
        (PanelRole::Top, r"\b(top|t)\b"),
        (PanelRole::Bottom, r"\bbottom\b|btm"),
        (PanelRole::Cap, r"\bcap\b"),
    ]
    .into_iter()
    .map(|(role, pattern)| (role, Regex::new(pattern).unwrap()))
    .collect()
});

/// Guess a panel role from a filename.
///
/// Deterministic: the same name always yields the same role.
pub fn infer_role(filename: &str) -> PanelRole {
    let lower = filename.to_lowercase();
    let words = RE_SEPARATORS.replace_all(&lower, " ");
    RULES
        .iter()
        .find(|(_, re)| re.is_match(&words))
        .map(|(role, _)| *role)
        .unwrap_or(PanelRole::Generic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_words() {
        assert_eq!(infer_role("front.png"), PanelRole::Front);
        assert_eq!(infer_role("bottle_back.png"), PanelRole::Back);
        assert_eq!(infer_role("Label-LEFT.jpg"), PanelRole::Left);
        assert_eq!(infer_role("side right.png"), PanelRole::Right);
        assert_eq!(infer_role("box_top.png"), PanelRole::Top);
        assert_eq!(infer_role("box_bottom.png"), PanelRole::Bottom);
        assert_eq!(infer_role("cap.png"), PanelRole::Cap);
    }

    #[test]
    fn single_letter_codes() {
        assert_eq!(infer_role("sku123_f.png"), PanelRole::Front);
        assert_eq!(infer_role("sku123_b.png"), PanelRole::Back);
        assert_eq!(infer_role("sku123-l.png"), PanelRole::Left);
        assert_eq!(infer_role("sku123-r.png"), PanelRole::Right);
        assert_eq!(infer_role("sku123_t.png"), PanelRole::Top);
    }

    #[test]
    fn back_panel_keywords() {
        assert_eq!(infer_role("ingredients.png"), PanelRole::Back);
        assert_eq!(infer_role("nutritionfacts.png"), PanelRole::Back);
        assert_eq!(infer_role("usage-directions.png"), PanelRole::Back);
        assert_eq!(infer_role("label_btm.png"), PanelRole::Bottom);
    }

    #[test]
    fn precedence_follows_rule_order() {
        // front beats back, top beats cap
        assert_eq!(infer_role("front_back.png"), PanelRole::Front);
        assert_eq!(infer_role("cap_top.png"), PanelRole::Top);
        assert_eq!(infer_role("main_nutrition.png"), PanelRole::Front);
    }

    #[test]
    fn no_match_is_generic() {
        assert_eq!(infer_role("artwork.png"), PanelRole::Generic);
        assert_eq!(infer_role("backpack.png"), PanelRole::Generic);
        assert_eq!(infer_role("desktop.png"), PanelRole::Generic);
        assert_eq!(infer_role(""), PanelRole::Generic);
    }

    #[test]
    fn inference_is_deterministic() {
        for _ in 0..5 {
            assert_eq!(infer_role("carton_back_v2.png"), PanelRole::Back);
        }
    }

    #[test]
    fn parse_and_display() {
        for role in PanelRole::ALL {
            assert_eq!(role.to_string().parse::<PanelRole>().unwrap(), role);
        }
        assert_eq!("FRONT".parse::<PanelRole>().unwrap(), PanelRole::Front);
        assert!("side".parse::<PanelRole>().is_err());
    }

    #[test]
    fn hint_fallback() {
        assert_eq!(PanelRole::from_hint(Some("back")), PanelRole::Back);
        assert_eq!(PanelRole::from_hint(Some("lid")), PanelRole::Generic);
        assert_eq!(PanelRole::from_hint(None), PanelRole::Generic);
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&PanelRole::Bottom).unwrap();
        assert_eq!(json, "\"bottom\"");
    }
}
