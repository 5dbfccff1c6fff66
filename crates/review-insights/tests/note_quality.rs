use chrono::{TimeZone, Utc};
use review_insights::workflows::notes::{
    classify, compute_note_quality, score_text, ManualReview, QualityLabel,
};
use review_insights::workflows::records::{MemberId, MemberRef, Note, NoteId};

fn note(text: &str) -> Note {
    Note {
        id: NoteId(1),
        text: text.to_string(),
        date_created: Utc
            .with_ymd_and_hms(2024, 4, 2, 14, 0, 0)
            .single()
            .expect("valid timestamp"),
        ticket_id: None,
        project_id: None,
        member: MemberRef {
            id: MemberId(8),
            identifier: "ops".to_string(),
            name: "Ops Tech".to_string(),
        },
        internal_flag: true,
    }
}

const RICH_NOTE: &str = "Summary: user reported VPN drops since 04/01/2024.\n\
1. Diagnosed the tunnel timeout on firewall 2 and updated the keepalive to 30 seconds.\n\
2. Installed the new client build, configured split tunnelling and tested from home.\n\
3. Verified stable connection for 45 minutes and documented the fix in the wiki.\n\
Resolved. Next steps: follow up Friday to confirm nothing is pending.";

#[test]
fn overall_stays_within_bounds_and_equals_component_sum() {
    let long = vec!["resolved - step 1. done"; 400].join("\n");
    let samples = [
        "",
        "   \n\t ",
        "ok",
        "\u{2022}\u{2022}\u{2022}",
        "1.\n2.\n3.",
        "Ünïcödé nötes wïth émojis 🚀🚀 and no structure at all",
        RICH_NOTE,
        long.as_str(),
    ];

    for text in samples {
        let breakdown = score_text(text);
        let sum = u16::from(breakdown.length_score)
            + u16::from(breakdown.detail_score)
            + u16::from(breakdown.structure_score)
            + u16::from(breakdown.keyword_score);
        assert!(breakdown.overall_score <= 100, "overall above 100 for {text:?}");
        assert!(breakdown.length_score <= 25);
        assert!(breakdown.detail_score <= 30);
        assert!(breakdown.structure_score <= 25);
        assert!(breakdown.keyword_score <= 20);
        assert_eq!(u16::from(breakdown.overall_score), sum.min(100));
    }
}

#[test]
fn empty_note_scores_the_minimum() {
    let score = compute_note_quality(&note(""));
    assert_eq!(score.length_score, 5);
    assert_eq!(score.overall_score, 10);
    assert_eq!(score.classification().label, QualityLabel::Poor);
}

/// The same note with its detail, structure and keyword markers removed.
fn strip_markers(text: &str) -> String {
    let mut plain = text.to_lowercase();
    for (marker, neutral) in [
        ("summary", "report"),
        ("diagnosed", "saw"),
        ("updated", "set"),
        ("installed", "put"),
        ("configured", "set"),
        ("tested", "tried"),
        ("verified", "saw"),
        ("documented", "wrote"),
        ("fix", "change"),
        ("resolved", "ok"),
        ("next steps", "later"),
        ("follow up", "check"),
        ("pending", "open"),
    ] {
        plain = plain.replace(marker, neutral);
    }

    let flattened: String = plain
        .chars()
        .map(|ch| {
            if ch.is_ascii_digit() || matches!(ch, '.' | '/' | ':' | '-' | '*' | '\n' | '\r') {
                ' '
            } else {
                ch
            }
        })
        .collect();
    flattened.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn rich_note_outscores_its_stripped_variant() {
    let stripped_text = strip_markers(RICH_NOTE);
    let rich = compute_note_quality(&note(RICH_NOTE));
    let stripped = compute_note_quality(&note(&stripped_text));

    // both sit in the 50-200 word band, so length does not decide the comparison
    assert_eq!(rich.length_score, 25);
    assert_eq!(stripped.length_score, rich.length_score);

    assert!(rich.overall_score > stripped.overall_score);
    assert!(rich.detail_score > stripped.detail_score);
    assert!(rich.structure_score > stripped.structure_score);
    assert!(rich.keyword_score > stripped.keyword_score);

    assert_eq!(rich.structure_score, 25);
    assert_eq!(stripped.detail_score, 0);
    assert_eq!(stripped.structure_score, 5);
    assert_eq!(stripped.keyword_score, 0);
}

#[test]
fn classifier_boundaries_are_exact() {
    assert_eq!(classify(80.0).label_text, "Excellent");
    assert_eq!(classify(79.0).label_text, "Good");
    assert_eq!(classify(50.0).label_text, "Average");
    assert_eq!(classify(49.0).label_text, "Below Average");
    assert_eq!(classify(0.0).label_text, "Poor");
    assert_eq!(classify(49.0).band.color(), "orange");
}

#[test]
fn manual_review_leaves_automated_scores_untouched() {
    let automated = compute_note_quality(&note(RICH_NOTE));
    let review = ManualReview::new(8, Some("Good detail".to_string())).expect("valid review");

    let reviewed = automated.clone().with_manual_review(&review);
    assert_eq!(reviewed.breakdown(), automated.breakdown());
    assert_eq!(reviewed.manual_rating, Some(8));
    assert_eq!(reviewed.manual_comments.as_deref(), Some("Good detail"));
}

#[test]
fn scoring_is_deterministic() {
    assert_eq!(score_text(RICH_NOTE), score_text(RICH_NOTE));
}
