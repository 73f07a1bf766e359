use arcana_core::{all_cards_in, all_spreads_in, find_spread, Locale, ReadingResult};

pub fn spread_name(id: &str, locale: Locale) -> String {
    find_spread(id, locale)
        .map(|spread| spread.name)
        .unwrap_or_else(|| id.to_string())
}

fn timestamp_label(reading: &ReadingResult) -> String {
    i64::try_from(reading.timestamp)
        .ok()
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|at| {
            at.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| reading.id.clone())
}

/// Full text of a reading. Meanings are left out when `meanings` is false.
pub fn render_reading(locale: Locale, reading: &ReadingResult, meanings: bool) -> String {
    let mut lines = vec![
        format!("{}: {}", locale.text("Question", "问题"), reading.question),
        format!(
            "{} | {} | #{} | {}",
            spread_name(&reading.spread_id, locale),
            reading.tone.label(locale),
            reading.id,
            timestamp_label(reading)
        ),
        String::new(),
    ];
    lines.extend(reading.cards.iter().map(|card| {
        format!(
            "  {}. {}: {} ({})",
            card.position_index + 1,
            card.position_name,
            card.name(),
            card.orientation_label(locale)
        )
    }));
    if let Some(interpretation) = &reading.interpretation {
        lines.push(String::new());
        lines.push(interpretation.summary.clone());
        if meanings {
            lines.push(String::new());
            for analysis in &interpretation.card_analysis {
                lines.push(format!("[{}] {}", analysis.position, analysis.card_name));
                lines.push(analysis.meaning.clone());
            }
        }
        lines.push(String::new());
        lines.push(format!(
            "{}: {}",
            locale.text("Advice", "建议"),
            interpretation.advice
        ));
    }
    to_block(lines)
}

pub fn history_line(locale: Locale, reading: &ReadingResult) -> String {
    format!(
        "{:<15} {} | {} | {} | {}",
        reading.id,
        timestamp_label(reading),
        spread_name(&reading.spread_id, locale),
        reading.tone.label(locale),
        reading.question
    )
}

pub fn cards_table(locale: Locale) -> String {
    to_block(
        all_cards_in(locale)
            .into_iter()
            .map(|card| format!("{:<12} {}", card.id, card.name)),
    )
}

pub fn spreads_table(locale: Locale) -> String {
    to_block(all_spreads_in(locale).into_iter().flat_map(|spread| {
        [
            format!("{:<14} {} ({})", spread.id, spread.name, spread.card_count),
            format!("    {}", spread.description),
            format!("    {}", spread.positions.join(" / ")),
        ]
    }))
}

/// Joins lines with a trailing newline after each.
fn to_block(lines: impl IntoIterator<Item = String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcana_core::{
        find_card, CardAnalysis, DrawnCard, Interpretation, Tone, DECK_SIZE,
    };

    fn sample() -> ReadingResult {
        let card = find_card("major-0", Locale::EnUs).expect("fool");
        ReadingResult {
            id: "1700000000000".to_string(),
            timestamp: 1_700_000_000_000,
            question: "Where next?".to_string(),
            spread_id: "single".to_string(),
            cards: vec![DrawnCard {
                card,
                is_reversed: true,
                position_index: 0,
                position_name: "Guidance".to_string(),
            }],
            interpretation: Some(Interpretation {
                summary: "A leap.".to_string(),
                card_analysis: vec![CardAnalysis {
                    card_name: "The Fool".to_string(),
                    position: "Guidance".to_string(),
                    meaning: "Hesitation before the jump.".to_string(),
                }],
                advice: "Look first.".to_string(),
            }),
            tone: Tone::Rational,
        }
    }

    #[test]
    fn reading_lists_cards_and_interpretation() {
        let text = render_reading(Locale::EnUs, &sample(), true);
        assert!(text.contains("Question: Where next?"));
        assert!(text.contains("1. Guidance: The Fool (reversed)"));
        assert!(text.contains("Hesitation before the jump."));
        assert!(text.contains("Advice: Look first."));
        assert!(text.contains("Rational"));
    }

    #[test]
    fn meanings_can_be_hidden() {
        let text = render_reading(Locale::EnUs, &sample(), false);
        assert!(text.contains("A leap."));
        assert!(!text.contains("Hesitation"));
    }

    #[test]
    fn reading_without_interpretation_stops_after_cards() {
        let mut reading = sample();
        reading.interpretation = None;
        let text = render_reading(Locale::EnUs, &reading, true);
        assert!(text.ends_with("  1. Guidance: The Fool (reversed)\n"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn unknown_spread_falls_back_to_id() {
        let mut reading = sample();
        reading.spread_id = "lost".to_string();
        assert!(history_line(Locale::EnUs, &reading).contains("| lost |"));
        assert!(history_line(Locale::EnUs, &sample()).starts_with("1700000000000"));
    }

    #[test]
    fn tables_cover_catalog() {
        assert_eq!(cards_table(Locale::EnUs).lines().count(), DECK_SIZE);
        assert!(cards_table(Locale::ZhCn).contains("愚者"));
        assert_eq!(spreads_table(Locale::EnUs).lines().count(), 4 * 3);
    }
}
