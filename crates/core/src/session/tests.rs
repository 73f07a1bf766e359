use super::*;
use crate::{find_spread, Event, FixedSource, Interpretation, ReadingStamp, DECK_SIZE};
use std::collections::HashSet;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn at_draw(spread_id: &str, seed: u64) -> (Session, EventBus) {
    let mut events = EventBus::default();
    let mut session = Session::new(
        SessionConfig::default(),
        Locale::EnUs,
        RngState::from_seed(seed),
    );
    session.start(&mut events).expect("start");
    session
        .submit_question("What comes next?", &mut events)
        .expect("question");
    session
        .select_spread_id(spread_id, &mut events)
        .expect("spread");
    (session, events)
}

fn at_reveal(spread_id: &str) -> (Session, EventBus) {
    let (mut session, mut events) = at_draw(spread_id, 42);
    session.auto_draw_remaining(&mut events).expect("auto");
    session.advance(ms(500), &mut events);
    assert_eq!(session.step(), Step::Reveal);
    (session, events)
}

fn revealed_indices(events: &mut EventBus) -> Vec<usize> {
    events
        .drain()
        .filter_map(|event| match event {
            Event::CardRevealed { index } => Some(index),
            _ => None,
        })
        .collect()
}

fn dummy_interpretation(cards: usize) -> Interpretation {
    Interpretation {
        summary: "summary".to_string(),
        card_analysis: Vec::with_capacity(cards),
        advice: "advice".to_string(),
    }
}

#[test]
fn blank_questions_are_rejected_without_transition() {
    let mut events = EventBus::default();
    let mut session = Session::new(SessionConfig::default(), Locale::EnUs, RngState::from_seed(1));
    assert_eq!(
        session.submit_question("hello", &mut events),
        Err(SessionError::InvalidStep(Step::Welcome))
    );
    session.start(&mut events).expect("start");
    assert_eq!(
        session.submit_question("   \n\t", &mut events),
        Err(SessionError::EmptyQuestion)
    );
    assert_eq!(session.step(), Step::Question);
    session
        .submit_question("  Will it rain?  ", &mut events)
        .expect("question");
    assert_eq!(session.question(), "Will it rain?");
    assert_eq!(session.step(), Step::SpreadSelect);
}

#[test]
fn selecting_a_spread_shuffles_the_full_catalog() {
    let (session, _) = at_draw("three-time", 9);
    assert_eq!(session.step(), Step::ShuffleAndDraw);
    assert_eq!(session.deck().len(), DECK_SIZE);
    assert_eq!(session.deck().visuals().len(), DECK_SIZE);
    assert!(session.drawn_cards().is_empty());
    assert_eq!(session.revealed_count(), 0);
    let ids: HashSet<_> = session.deck().cards().iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids.len(), DECK_SIZE);
}

#[test]
fn same_seed_same_shuffle() {
    let (a, _) = at_draw("single", 1234);
    let (b, _) = at_draw("single", 1234);
    assert_eq!(a.deck().cards(), b.deck().cards());
}

#[test]
fn manual_draws_fill_positions_then_auto_advance() {
    let (mut session, mut events) = at_draw("three-time", 5);
    for expected_len in 1..=3 {
        let top = session.deck().cards()[0].clone();
        session.draw_at(0, &mut events).expect("draw");
        assert_eq!(session.drawn_cards().len(), expected_len);
        assert_eq!(session.drawn_cards()[expected_len - 1].card, top);
        assert_eq!(session.deck().len() + session.drawn_cards().len(), DECK_SIZE);
        assert_eq!(session.deck().visuals().len(), session.deck().len());
    }
    let drawn = session.drawn_cards();
    assert_eq!(drawn[0].position_name, "Past");
    assert_eq!(drawn[1].position_name, "Present");
    assert_eq!(drawn[2].position_name, "Future");
    for (idx, card) in drawn.iter().enumerate() {
        assert_eq!(card.position_index, idx);
    }

    session.advance(ms(799), &mut events);
    assert_eq!(session.step(), Step::ShuffleAndDraw);
    session.advance(ms(1), &mut events);
    assert_eq!(session.step(), Step::Reveal);
}

#[test]
fn draws_beyond_the_spread_or_deck_are_rejected() {
    let (mut session, mut events) = at_draw("single", 3);
    assert_eq!(
        session.draw_at(DECK_SIZE, &mut events),
        Err(SessionError::DeckIndex {
            index: DECK_SIZE,
            len: DECK_SIZE
        })
    );
    assert!(session.drawn_cards().is_empty());
    session.draw_at(10, &mut events).expect("draw");
    assert_eq!(
        session.draw_at(0, &mut events),
        Err(SessionError::SpreadFull(1))
    );
    assert_eq!(
        session.auto_draw_remaining(&mut events),
        Err(SessionError::SpreadFull(1))
    );
    assert_eq!(session.deck().len(), DECK_SIZE - 1);
}

#[test]
fn orientation_follows_the_threshold() {
    for (roll, reversed) in [(0.81, true), (0.8, false), (0.2, false), (0.99, true)] {
        let mut events = EventBus::default();
        let mut session = Session::new(SessionConfig::default(), Locale::EnUs, FixedSource(roll));
        session.start(&mut events).expect("start");
        session.submit_question("q", &mut events).expect("question");
        session
            .select_spread_id("single", &mut events)
            .expect("spread");
        session.draw_at(0, &mut events).expect("draw");
        assert_eq!(session.drawn_cards()[0].is_reversed, reversed, "roll {roll}");
    }
}

#[test]
fn auto_draw_celtic_yields_ten_unique_cards() {
    let (mut session, mut events) = at_draw("celtic", 77);
    session.auto_draw_remaining(&mut events).expect("auto");
    let drawn = session.drawn_cards();
    assert_eq!(drawn.len(), 10);
    let ids: HashSet<_> = drawn.iter().map(|card| card.card.id.clone()).collect();
    assert_eq!(ids.len(), 10);
    for (idx, card) in drawn.iter().enumerate() {
        assert_eq!(card.position_index, idx);
    }
    assert_eq!(drawn[9].position_name, "Final Outcome");
    assert_eq!(session.deck().len(), DECK_SIZE - 10);

    session.advance(ms(499), &mut events);
    assert_eq!(session.step(), Step::ShuffleAndDraw);
    session.advance(ms(1), &mut events);
    assert_eq!(session.step(), Step::Reveal);
}

#[test]
fn auto_draw_completes_a_partial_manual_draw() {
    let (mut session, mut events) = at_draw("relationship", 8);
    session.draw_at(3, &mut events).expect("draw");
    session.auto_draw_remaining(&mut events).expect("auto");
    assert_eq!(session.drawn_cards().len(), 4);
    assert_eq!(session.drawn_cards()[3].position_index, 3);
    assert_eq!(session.deck().len() + 4, DECK_SIZE);
}

#[test]
fn auto_draw_stops_when_the_deck_runs_dry() {
    let mut events = EventBus::default();
    let mut session = Session::new(SessionConfig::default(), Locale::EnUs, RngState::from_seed(4));
    session.start(&mut events).expect("start");
    session.submit_question("q", &mut events).expect("question");
    let oversized = Spread {
        id: "oversized".to_string(),
        name: "Oversized".to_string(),
        description: String::new(),
        card_count: DECK_SIZE + 2,
        positions: Vec::new(),
    };
    session.select_spread(oversized, &mut events).expect("spread");
    session.auto_draw_remaining(&mut events).expect("auto");
    assert_eq!(session.drawn_cards().len(), DECK_SIZE);
    assert!(session.deck().is_empty());
    assert_eq!(session.drawn_cards()[0].position_name, "Position 1");
    session.advance(ms(500), &mut events);
    assert_eq!(session.step(), Step::Reveal);
}

#[test]
fn reveal_is_strictly_left_to_right() {
    let (mut session, mut events) = at_reveal("three-time");
    assert_eq!(
        session.reveal_next(1, &mut events),
        Err(SessionError::OutOfOrderReveal {
            expected: 0,
            got: 1
        })
    );
    assert_eq!(session.revealed_count(), 0);
    session.reveal_next(0, &mut events).expect("reveal");
    session.reveal_next(1, &mut events).expect("reveal");
    assert!(session.reveal_next(0, &mut events).is_err());
    assert_eq!(session.revealed_count(), 2);
    session.reveal_next(2, &mut events).expect("reveal");
    assert!(session.reveal_next(3, &mut events).is_err());
    assert_eq!(session.revealed_count(), 3);
}

#[test]
fn reveal_all_flips_one_card_per_interval() {
    let (mut session, mut events) = at_reveal("relationship");
    let _ = events.drain().count();
    session.reveal_all(&mut events).expect("reveal all");
    assert_eq!(session.revealed_count(), 1);
    session.advance(ms(299), &mut events);
    assert_eq!(session.revealed_count(), 1);
    session.advance(ms(1), &mut events);
    assert_eq!(session.revealed_count(), 2);
    session.advance(ms(1000), &mut events);
    assert_eq!(session.revealed_count(), 4);
    assert!(!session.has_scheduled_work());
    assert_eq!(revealed_indices(&mut events), vec![0, 1, 2, 3]);
}

#[test]
fn reset_mid_sequence_does_not_resurrect_the_session() {
    let (mut session, mut events) = at_reveal("celtic");
    session.reveal_all(&mut events).expect("reveal all");
    session.advance(ms(300), &mut events);
    assert_eq!(session.revealed_count(), 2);
    session.reset(&mut events);
    session.advance(ms(5000), &mut events);
    assert_eq!(session.step(), Step::Welcome);
    assert_eq!(session.revealed_count(), 0);
    assert!(session.drawn_cards().is_empty());
    assert!(!session.has_scheduled_work());
}

#[test]
fn restarting_reveal_all_replaces_the_running_sequence() {
    let (mut session, mut events) = at_reveal("celtic");
    session.reveal_all(&mut events).expect("reveal all");
    session.reveal_next(1, &mut events).expect("manual reveal");
    session.reveal_all(&mut events).expect("restart");
    assert_eq!(session.revealed_count(), 3);
    assert!(events
        .drain()
        .any(|event| event == Event::RevealSequenceCancelled));
    session.advance(ms(300), &mut events);
    assert_eq!(session.revealed_count(), 4);
    session.advance(ms(10_000), &mut events);
    assert_eq!(session.revealed_count(), 10);
}

#[test]
fn going_back_cancels_the_pending_advance() {
    let (mut session, mut events) = at_draw("single", 2);
    session.draw_at(0, &mut events).expect("draw");
    session.go_back(&mut events).expect("back");
    assert_eq!(session.step(), Step::SpreadSelect);
    session.advance(ms(2000), &mut events);
    assert_eq!(session.step(), Step::SpreadSelect);
    session.go_back(&mut events).expect("back");
    session.go_back(&mut events).expect("back");
    assert_eq!(session.step(), Step::Welcome);
    assert_eq!(
        session.go_back(&mut events),
        Err(SessionError::NoBackTransition(Step::Welcome))
    );
}

#[test]
fn reveal_has_no_way_back() {
    let (mut session, mut events) = at_reveal("single");
    assert_eq!(
        session.go_back(&mut events),
        Err(SessionError::NoBackTransition(Step::Reveal))
    );
    assert_eq!(session.step(), Step::Reveal);
}

#[test]
fn interpretation_needs_every_card_face_up() {
    let (mut session, mut events) = at_reveal("three-time");
    assert_eq!(
        session.begin_interpretation(&mut events),
        Err(SessionError::RevealIncomplete {
            revealed: 0,
            drawn: 3
        })
    );
    session.reveal_all(&mut events).expect("reveal");
    session.advance(ms(1000), &mut events);
    let request = session.begin_interpretation(&mut events).expect("begin");
    assert!(session.is_loading());
    assert_eq!(request.cards, session.drawn_cards());
    assert_eq!(request.question, "What comes next?");
    assert_eq!(
        session.begin_interpretation(&mut events),
        Err(SessionError::InterpretationPending)
    );

    let reading = session
        .complete_interpretation(
            request.ticket,
            dummy_interpretation(3),
            ReadingStamp::at(1_700_000_000_000),
            &mut events,
        )
        .expect("complete");
    assert!(!session.is_loading());
    assert_eq!(session.step(), Step::Reading);
    assert_eq!(reading.id, "1700000000000");
    assert_eq!(reading.spread_id, "three-time");
    assert_eq!(reading.cards.len(), 3);
    assert_eq!(session.reading(), Some(&reading));
}

#[test]
fn reading_keeps_the_tone_it_was_requested_with() {
    let (mut session, mut events) = at_reveal("single");
    session.set_tone(Tone::Rational);
    session.reveal_next(0, &mut events).expect("reveal");
    let request = session.begin_interpretation(&mut events).expect("begin");
    assert_eq!(request.tone, Tone::Rational);

    session.set_tone(Tone::Spiritual);
    let reading = session
        .complete_interpretation(
            request.ticket,
            dummy_interpretation(1),
            ReadingStamp::at(2),
            &mut events,
        )
        .expect("complete");
    assert_eq!(reading.tone, Tone::Rational);
    assert_eq!(session.tone(), Tone::Spiritual);
}

#[test]
fn late_interpretation_after_reset_is_refused() {
    let (mut session, mut events) = at_reveal("single");
    session.reveal_next(0, &mut events).expect("reveal");
    let request = session.begin_interpretation(&mut events).expect("begin");
    session.reset(&mut events);
    assert!(!session.is_loading());
    let result = session.complete_interpretation(
        request.ticket,
        dummy_interpretation(1),
        ReadingStamp::at(1),
        &mut events,
    );
    assert_eq!(result, Err(SessionError::StaleInterpretation));
    assert_eq!(session.step(), Step::Welcome);
    assert!(session.reading().is_none());
}

#[test]
fn restore_jumps_to_reading() {
    let (mut session, mut events) = at_reveal("three-time");
    let reading = ReadingResult {
        id: "42".to_string(),
        timestamp: 42,
        question: "Old question".to_string(),
        spread_id: "three-time".to_string(),
        cards: session.drawn_cards().to_vec(),
        interpretation: None,
        tone: Tone::Spiritual,
    };
    session.reset(&mut events);
    session.restore(reading.clone(), &mut events);
    assert_eq!(session.step(), Step::Reading);
    assert_eq!(session.question(), "Old question");
    assert_eq!(session.tone(), Tone::Spiritual);
    assert_eq!(session.revealed_count(), 3);
    assert_eq!(session.spread().id, "three-time");
    assert_eq!(session.reading(), Some(&reading));
}

#[test]
fn restore_of_unknown_spread_rebuilds_positions_from_cards() {
    let (mut session, mut events) = at_reveal("three-time");
    let reading = ReadingResult {
        id: "1".to_string(),
        timestamp: 1,
        question: "q".to_string(),
        spread_id: "retired-spread".to_string(),
        cards: session.drawn_cards().to_vec(),
        interpretation: None,
        tone: Tone::Gentle,
    };
    session.restore(reading, &mut events);
    assert_eq!(session.spread().card_count, 3);
    assert_eq!(session.spread().positions, vec!["Past", "Present", "Future"]);
}

#[test]
fn reset_clears_the_session() {
    let (mut session, mut events) = at_reveal("single");
    session.reset(&mut events);
    assert_eq!(session.step(), Step::Welcome);
    assert!(session.question().is_empty());
    assert!(session.deck().is_empty());
    assert!(session.drawn_cards().is_empty());
    assert!(session.reading().is_none());
    assert!(events.drain().any(|event| event == Event::SessionReset));
    let fresh = find_spread("single", Locale::EnUs).expect("spread");
    session.start(&mut events).expect("start");
    session.submit_question("again", &mut events).expect("question");
    session.select_spread(fresh, &mut events).expect("spread");
    assert_eq!(session.deck().len(), DECK_SIZE);
}
