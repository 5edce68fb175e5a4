use std::fmt;

use serde::{Deserialize, Serialize};

/// Emotion label reported by a classifier.
///
/// The seven basic emotions form a closed set; anything else a model emits
/// (e.g. FER+'s "contempt") becomes [`Emotion::Other`], trimmed and
/// lowercased like the known labels.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Emotion {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
    Other(String),
}

impl Emotion {
    /// Canonical order. Also the tie-break order when two emotions share the
    /// top probability.
    pub const ALL: [Emotion; 7] = [
        Emotion::Angry,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "angry" | "anger" => Emotion::Angry,
            "disgust" => Emotion::Disgust,
            "fear" => Emotion::Fear,
            "happy" | "happiness" => Emotion::Happy,
            "sad" | "sadness" => Emotion::Sad,
            "surprise" => Emotion::Surprise,
            "neutral" => Emotion::Neutral,
            other => Emotion::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Emotion::Angry => "angry",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
            Emotion::Other(label) => label,
        }
    }

    /// Label with the first letter upper-cased, as shown on cards and overlays.
    pub fn capitalized(&self) -> String {
        let mut chars = self.label().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Encouraging one-liner shown under the emotion on a card.
    pub fn message(&self) -> String {
        match self {
            Emotion::Happy => "😊 You're radiating joy!".to_string(),
            Emotion::Sad => "😢 It's okay to feel down sometimes.".to_string(),
            Emotion::Angry => "😠 Breathe deep. You're strong.".to_string(),
            Emotion::Fear => "😨 You're safe and supported.".to_string(),
            Emotion::Surprise => "😮 Something unexpected?".to_string(),
            Emotion::Neutral => "😐 Steady and balanced.".to_string(),
            Emotion::Disgust => "😖 Something doesn't feel right.".to_string(),
            Emotion::Other(label) => format!("😐 You seem {label}."),
        }
    }

    fn canonical_rank(&self) -> usize {
        Emotion::ALL
            .iter()
            .position(|e| e == self)
            .unwrap_or(Emotion::ALL.len())
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Emotion {
    fn from(label: String) -> Self {
        Emotion::parse(&label)
    }
}

impl From<Emotion> for String {
    fn from(emotion: Emotion) -> Self {
        emotion.label().to_string()
    }
}

/// Emotion → probability mapping for one face, in the classifier's output order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmotionScores {
    scores: Vec<(Emotion, f64)>,
}

impl EmotionScores {
    pub fn new(scores: Vec<(Emotion, f64)>) -> Self {
        Self { scores }
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// The most probable emotion and its probability.
    ///
    /// Equal probabilities resolve to the emotion that comes first in
    /// [`Emotion::ALL`]; unrecognized labels rank after all known ones, in
    /// output order. NaN scores never win.
    pub fn dominant(&self) -> Option<(&Emotion, f64)> {
        let mut best: Option<(usize, &Emotion, f64)> = None;
        for (pos, (emotion, p)) in self.scores.iter().enumerate() {
            if p.is_nan() {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_pos, best_emotion, best_p)) => {
                    *p > best_p
                        || (*p == best_p
                            && (emotion.canonical_rank(), pos)
                                < (best_emotion.canonical_rank(), best_pos))
                }
            };
            if better {
                best = Some((pos, emotion, *p));
            }
        }
        best.map(|(_, e, p)| (e, p))
    }
}

impl FromIterator<(Emotion, f64)> for EmotionScores {
    fn from_iter<I: IntoIterator<Item = (Emotion, f64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
