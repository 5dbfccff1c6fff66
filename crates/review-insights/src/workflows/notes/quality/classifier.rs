use serde::{Deserialize, Serialize};

/// Human-readable quality tier for a 0-100 note score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLabel {
    Excellent,
    Good,
    Average,
    BelowAverage,
    Poor,
}

impl QualityLabel {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Excellent,
            Self::Good,
            Self::Average,
            Self::BelowAverage,
            Self::Poor,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::BelowAverage => "Below Average",
            Self::Poor => "Poor",
        }
    }

    pub const fn band(self) -> QualityBand {
        match self {
            Self::Excellent => QualityBand::Green,
            Self::Good => QualityBand::Cyan,
            Self::Average => QualityBand::Yellow,
            Self::BelowAverage => QualityBand::Orange,
            Self::Poor => QualityBand::Red,
        }
    }
}

/// Display band used for color and urgency cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBand {
    Green,
    Cyan,
    Yellow,
    Orange,
    Red,
}

impl QualityBand {
    pub const fn color(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Cyan => "cyan",
            Self::Yellow => "yellow",
            Self::Orange => "orange",
            Self::Red => "red",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityClassification {
    pub label: QualityLabel,
    pub label_text: &'static str,
    pub band: QualityBand,
}

/// Classify an overall (or averaged) note score. Non-finite input is `Poor`.
pub fn classify(score: f64) -> QualityClassification {
    let label = if score >= 80.0 {
        QualityLabel::Excellent
    } else if score >= 65.0 {
        QualityLabel::Good
    } else if score >= 50.0 {
        QualityLabel::Average
    } else if score >= 35.0 {
        QualityLabel::BelowAverage
    } else {
        QualityLabel::Poor
    };

    QualityClassification {
        label,
        label_text: label.label(),
        band: label.band(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_match_display_tiers() {
        assert_eq!(classify(100.0).label, QualityLabel::Excellent);
        assert_eq!(classify(80.0).label_text, "Excellent");
        assert_eq!(classify(79.0).label_text, "Good");
        assert_eq!(classify(65.0).label_text, "Good");
        assert_eq!(classify(64.0).label_text, "Average");
        assert_eq!(classify(50.0).label_text, "Average");
        assert_eq!(classify(49.0).label_text, "Below Average");
        assert_eq!(classify(35.0).label_text, "Below Average");
        assert_eq!(classify(34.0).label_text, "Poor");
        assert_eq!(classify(0.0).label_text, "Poor");
    }

    #[test]
    fn bands_follow_labels() {
        for label in QualityLabel::ordered() {
            let expected = label.band();
            let score = match label {
                QualityLabel::Excellent => 90.0,
                QualityLabel::Good => 70.0,
                QualityLabel::Average => 55.0,
                QualityLabel::BelowAverage => 40.0,
                QualityLabel::Poor => 10.0,
            };
            assert_eq!(classify(score).band, expected);
        }
        assert_eq!(classify(f64::NAN).band.color(), "red");
    }
}
