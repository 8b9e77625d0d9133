use crate::error::{RestyleError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const LOFI_TEMPLATE: &str = "Transform this photo so it looks like it was taken with a cheap \
point-and-shoot film camera from the late 1990s. Keep the original subject, pose and \
composition exactly as they are and do not add or remove people or objects. Apply a \
direct on-camera flash look with slightly blown-out highlights on the closest subject and \
darker falloff in the background. Shift the colors toward warm, faded tones: lifted blacks, \
slightly green shadows, creamy yellow highlights and reduced saturation. Add visible but \
natural film grain across the whole frame, a mild soft focus and a subtle vignette in the \
corners. Add a small orange-red digital date stamp in the bottom right corner in the \
classic seven-segment camera font, reading a plausible date from the late 1990s. The result \
must look like a scanned 4x6 print, photo-realistic, not an illustration.";

const CUTOUT_TEMPLATE: &str = "Recreate this photo as a handmade paper-cutout collage. Keep \
the original subject, pose and composition recognisable. Build every element from flat \
pieces of cut and torn paper: construction paper, newsprint, kraft paper and patterned \
scrapbook paper. Use a limited palette of bold, slightly muted colors with no gradients \
inside a piece. Give each piece visible paper texture, slightly rough or torn edges and a \
soft drop shadow so the layers appear physically stacked a few millimetres apart. Simplify \
faces and details into a few clean shapes while keeping the likeness. Place the collage on \
a plain textured cardboard background. Do not add any text, letters or logos. The result \
should look like a photograph of a real paper collage lying on a table, lit by soft \
daylight.";

/// One of the fixed transformation presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Lofi,
    Cutout,
}

impl Style {
    pub const ALL: [Style; 2] = [Style::Lofi, Style::Cutout];

    /// Wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Lofi => "lofi",
            Style::Cutout => "cutout",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Style::Lofi => "Lo-fi retro camera",
            Style::Cutout => "Paper cutout collage",
        }
    }

    /// Instruction text sent to the model for this style.
    pub fn template(&self) -> &'static str {
        match self {
            Style::Lofi => LOFI_TEMPLATE,
            Style::Cutout => CUTOUT_TEMPLATE,
        }
    }

    pub fn accepted() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Style {
    type Err = RestyleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| {
                RestyleError::Validation(format!(
                    "Invalid style '{}'; expected one of: {}",
                    s,
                    Self::accepted()
                ))
            })
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
