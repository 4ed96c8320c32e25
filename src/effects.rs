/// A pre-authored instruction sent verbatim to the enhancement service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub id: &'static str,
    pub name: &'static str,
    pub instruction: &'static str,
}

/// Effects in display order. The first entry is the fallback selection.
pub const PHOTO_EFFECTS: &[Effect] = &[
    Effect {
        id: "enhance-details",
        name: "Enhance Details",
        instruction: "Dramatically enhance the details, sharpness, and clarity of this image. Make it look like a high-resolution professional photograph without adding unnatural artifacts.",
    },
    Effect {
        id: "cinematic-look",
        name: "Cinematic Look",
        instruction: "Apply a cinematic color grade to this image. Deepen the shadows, add a subtle teal and orange look, and increase the contrast for a moody, movie-like feel.",
    },
    Effect {
        id: "vintage-vibe",
        name: "Vintage Vibe",
        instruction: "Give this photo a warm, vintage, retro look. Add a subtle film grain, slightly fade the blacks, and shift the colors towards a nostalgic, 1970s film-like palette.",
    },
    Effect {
        id: "vintage-fade",
        name: "Vintage Fade",
        instruction: "Give this photo a subtle, faded, retro look. Mute the colors, slightly crush the blacks, add a soft, fine grain, and give it a gentle warm tint to emulate the look of a well-loved, aged photograph from the past.",
    },
    Effect {
        id: "studio-lighting",
        name: "Studio Lighting",
        instruction: "Relight this image as if it were taken in a professional photo studio. Add a soft key light on the main subject, a gentle fill light to reduce harsh shadows, and a subtle rim light to create separation from the background.",
    },
    Effect {
        id: "remove-noise",
        name: "Remove Noise & Upscale",
        instruction: "Analyze this image for digital noise and compression artifacts. Remove them cleanly, then intelligently upscale the image to a higher resolution while preserving and enhancing natural details.",
    },
    Effect {
        id: "vibrant-colors",
        name: "Vibrant Colors",
        instruction: "Boost the vibrancy and saturation of the colors in this image to make them pop. Enhance the blues, greens, and reds to create a lively and energetic feel, without making skin tones look unnatural.",
    },
    Effect {
        id: "upscale-4k",
        name: "Upscale to 4K",
        instruction: "Intelligently upscale this image to 4K resolution (3840x2160), enhancing details, removing compression artifacts, and ensuring the result is sharp and clear without looking artificial. Maintain the original color and lighting as much as possible.",
    },
    Effect {
        id: "cartoonify",
        name: "Cartoonify",
        instruction: "Transform this photo into a cute 3D cartoon character. Exaggerate features to create an adorable, animated look, similar to modern animated movie characters. Maintain the likeness of the subject but render it in a playful, stylized, and vibrant cartoon style.",
    },
    Effect {
        id: "black-and-white",
        name: "Black & White",
        instruction: "Convert this image to a high-contrast, dramatic black and white photograph. Emphasize textures and shapes by deepening the blacks and brightening the whites, creating a timeless, classic look.",
    },
    Effect {
        id: "sepia-tone",
        name: "Sepia Tone",
        instruction: "Apply a classic sepia tone to this image. Give it a warm, brownish tint reminiscent of early photography to evoke a sense of nostalgia and historical feeling.",
    },
    Effect {
        id: "high-contrast",
        name: "High Contrast",
        instruction: "Significantly increase the contrast of this image. Make the dark areas much darker and the bright areas much brighter to create a bold, punchy, and dramatic visual impact.",
    },
];

pub fn catalog() -> &'static [Effect] {
    PHOTO_EFFECTS
}

pub fn find_by_id(id: &str) -> Option<&'static Effect> {
    PHOTO_EFFECTS.iter().find(|e| e.id == id)
}

pub fn default_effect() -> &'static Effect {
    &PHOTO_EFFECTS[0]
}

/// Resolve the startup selection from a stored id, falling back to the
/// first catalog entry when nothing usable was stored.
pub fn initial_effect(stored: Option<&str>) -> &'static Effect {
    stored.and_then(find_by_id).unwrap_or_else(default_effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = catalog().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn lookup_by_id() {
        let effect = find_by_id("sepia-tone").unwrap();
        assert_eq!(effect.name, "Sepia Tone");
        assert!(find_by_id("does-not-exist").is_none());
    }

    #[test]
    fn unknown_stored_id_falls_back_to_first() {
        assert_eq!(initial_effect(Some("gone")).id, "enhance-details");
        assert_eq!(initial_effect(None).id, "enhance-details");
        assert_eq!(initial_effect(Some("cartoonify")).id, "cartoonify");
    }
}
