//! Best-effort reading of a free-text emotion label.
//!
//! The model answers in free text, so these helpers only look for keywords.
//! They pick an icon and decide whether to suggest a clearer photo; they are
//! not a parser and never reject a label.

/// Keyword groups checked in order; the first group with a hit wins.
const ICON_GROUPS: &[(&[&str], &str)] = &[
    (&["happy", "joy"], "😊"),
    (&["sad", "sorrow"], "😢"),
    (&["angry", "rage"], "😠"),
    (&["surprised", "astonished"], "😮"),
    (&["neutral"], "😐"),
    (&["fear"], "😨"),
    (&["disgust"], "🤢"),
    (&["contempt"], "😒"),
    (&["love"], "😍"),
];

pub const UNKNOWN_ICON: &str = "🤔";

pub const CLEARER_IMAGE_HINT: &str =
    "Try uploading a clearer image of a face, or ensure the face is well-lit and visible.";

pub fn emotion_icon(label: &str) -> &'static str {
    let lower = label.to_lowercase();
    ICON_GROUPS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(_, icon)| *icon)
        .unwrap_or(UNKNOWN_ICON)
}

/// True when the label says no face or emotion could be read.
pub fn needs_clearer_image(label: &str) -> bool {
    let lower = label.to_lowercase();
    lower.contains("could not determine") || lower.contains("no clear face")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_icon_by_keyword() {
        assert_eq!(emotion_icon("Happy"), "😊");
        assert_eq!(emotion_icon("Joyful"), "😊");
        assert_eq!(emotion_icon("SAD"), "😢");
        assert_eq!(emotion_icon("Angry"), "😠");
        assert_eq!(emotion_icon("Surprised"), "😮");
        assert_eq!(emotion_icon("Neutral"), "😐");
        assert_eq!(emotion_icon("Fearful"), "😨");
        assert_eq!(emotion_icon("Disgusted"), "🤢");
        assert_eq!(emotion_icon("Contempt"), "😒");
        assert_eq!(emotion_icon("In love"), "😍");
    }

    #[test]
    fn earlier_groups_win() {
        // "happy" is checked before "sad"
        assert_eq!(emotion_icon("happy but sad"), "😊");
    }

    #[test]
    fn unknown_labels_get_default_icon() {
        assert_eq!(emotion_icon("Pensive"), UNKNOWN_ICON);
        assert_eq!(emotion_icon(""), UNKNOWN_ICON);
    }

    #[test]
    fn hint_shown_for_either_phrase() {
        assert!(needs_clearer_image("Could not determine emotion"));
        assert!(needs_clearer_image("No clear face detected"));
        assert!(needs_clearer_image(
            "AI could not determine an emotion. The response was empty."
        ));
        assert!(!needs_clearer_image("Happy"));
    }
}
