// CHRONOREEL Era Classifier
// Copyright (c) 2026 Xing_The_Creator | CHRONOREEL
//
// Substring rule table mapping narration to a target year and theme.
// The priority order is load-bearing for reproducible runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Year used for the culminating segment. Never matched against real photos.
pub const CELEBRATION_YEAR: i32 = 2026;
pub const DEFAULT_YEAR: i32 = 2016;
/// Synthetic fallbacks before this year get the vintage treatment.
pub const VINTAGE_CUTOFF: i32 = 1980;

const CELEBRATION_MARKERS: [&str; 4] = ["2026", "centenary", "celebration", "future"];
const KNOWN_YEARS: [(&str, i32); 4] = [
    ("1926", 1926),
    ("1957", 1957),
    ("1976", 1976),
    ("2016", 2016),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    VintageMonochrome,
    GlowingRedCelebration,
    Photorealistic,
}

impl Theme {
    /// Qualifier phrases appended to a synthetic image prompt.
    pub fn qualifiers(self) -> &'static str {
        match self {
            Theme::GlowingRedCelebration => {
                "(glowing red theme:1.4), fireworks, celebration, cinematic lighting, 8k, night time"
            }
            Theme::VintageMonochrome => "sepia tone, 1926 vintage photograph, grainy, historical",
            Theme::Photorealistic => "photorealistic, 8k, highly detailed",
        }
    }

    pub fn styled_prompt(self, base: &str) -> String {
        format!("{}, {}", base.trim_end(), self.qualifiers())
    }

    pub fn for_year(year: i32) -> Self {
        if year < VINTAGE_CUTOFF {
            Theme::VintageMonochrome
        } else {
            Theme::Photorealistic
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Theme::VintageMonochrome => "vintage",
            Theme::GlowingRedCelebration => "red celebration",
            Theme::Photorealistic => "photorealistic",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraClassification {
    pub target_year: i32,
    pub theme: Theme,
}

impl EraClassification {
    /// The culminating segment always goes to synthesis.
    pub fn is_celebration(&self) -> bool {
        self.theme == Theme::GlowingRedCelebration
    }
}

pub fn classify(narration: &str) -> EraClassification {
    let text = narration.to_lowercase();

    if CELEBRATION_MARKERS.iter().any(|m| text.contains(m)) {
        return EraClassification {
            target_year: CELEBRATION_YEAR,
            theme: Theme::GlowingRedCelebration,
        };
    }

    let target_year = KNOWN_YEARS
        .iter()
        .find(|(token, _)| text.contains(token))
        .map(|&(_, year)| year)
        .unwrap_or(DEFAULT_YEAR);

    EraClassification {
        target_year,
        theme: Theme::for_year(target_year),
    }
}
