use arcana_core::{
    all_spreads, CardAnalysis, Event, EventBus, HistoryStore, Interpretation, Locale, MemoryStore,
    RngState, ScriptedSource, Session, SessionConfig, SessionError, Step, Tone, DECK_SIZE,
};
use std::collections::HashSet;
use std::time::Duration;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn fresh(seed: u64, locale: Locale) -> (Session, EventBus) {
    (
        Session::new(SessionConfig::default(), locale, RngState::from_seed(seed)),
        EventBus::default(),
    )
}

fn steps(events: &mut EventBus) -> Vec<Step> {
    events
        .drain()
        .filter_map(|event| match event {
            Event::StepChanged { to, .. } => Some(to),
            _ => None,
        })
        .collect()
}

macro_rules! auto_draw_case {
    ($name:ident, $spread:expr, $count:expr) => {
        #[test]
        fn $name() {
            let (mut session, mut events) = fresh(31, Locale::EnUs);
            session.start(&mut events).expect("start");
            session.submit_question("q", &mut events).expect("question");
            session
                .select_spread_id($spread, &mut events)
                .expect("spread");
            session.auto_draw_remaining(&mut events).expect("auto");
            let drawn = session.drawn_cards();
            assert_eq!(drawn.len(), $count);
            let unique: HashSet<_> = drawn.iter().map(|c| c.card.id.as_str()).collect();
            assert_eq!(unique.len(), $count);
            assert_eq!(session.deck().len() + drawn.len(), DECK_SIZE);
            for (idx, card) in drawn.iter().enumerate() {
                assert_eq!(card.position_index, idx);
                assert_eq!(card.position_name, session.spread().positions[idx]);
            }
        }
    };
}

auto_draw_case!(auto_draw_single, "single", 1);
auto_draw_case!(auto_draw_three_time, "three-time", 3);
auto_draw_case!(auto_draw_relationship, "relationship", 4);
auto_draw_case!(auto_draw_celtic, "celtic", 10);

#[test]
fn manual_three_card_reading_end_to_end() {
    let (mut session, mut events) = fresh(2024, Locale::EnUs);
    let mut history = HistoryStore::open(MemoryStore::new());

    session.start(&mut events).expect("start");
    session
        .submit_question("Where is my career heading?", &mut events)
        .expect("question");
    session
        .select_spread_id("three-time", &mut events)
        .expect("spread");
    session.set_tone(Tone::Rational);
    assert_eq!(
        steps(&mut events),
        vec![Step::Question, Step::SpreadSelect, Step::ShuffleAndDraw]
    );

    for pick in [5, 0, 60] {
        session.draw_at(pick, &mut events).expect("draw");
    }
    assert_eq!(session.drawn_cards()[0].position_name, "Past");
    assert_eq!(session.drawn_cards()[2].position_name, "Future");

    session.advance(ms(400), &mut events);
    assert_eq!(session.step(), Step::ShuffleAndDraw);
    session.advance(ms(400), &mut events);
    assert_eq!(session.step(), Step::Reveal);

    session.reveal_next(0, &mut events).expect("reveal");
    session.reveal_all(&mut events).expect("reveal all");
    session.advance(ms(300), &mut events);
    assert!(session.all_revealed());

    let request = session.begin_interpretation(&mut events).expect("begin");
    assert_eq!(request.tone, Tone::Rational);
    let interpretation = Interpretation {
        summary: "Change is coming.".to_string(),
        card_analysis: request
            .cards
            .iter()
            .map(|card| CardAnalysis {
                card_name: card.name().to_string(),
                position: card.position_name.clone(),
                meaning: "meaning".to_string(),
            })
            .collect(),
        advice: "Prepare.".to_string(),
    };
    let stamp = history.stamp(1_700_000_000_123);
    let reading = session
        .complete_interpretation(request.ticket, interpretation, stamp, &mut events)
        .expect("complete");
    history.append(reading.clone()).expect("append");

    assert_eq!(session.step(), Step::Reading);
    assert_eq!(history.load_all()[0], reading);
    assert_eq!(reading.tone, Tone::Rational);
    assert_eq!(reading.question, "Where is my career heading?");

    session.reset(&mut events);
    let replay = history.select_for_replay(&reading.id).expect("replay");
    session.restore(replay, &mut events);
    assert_eq!(session.step(), Step::Reading);
    assert_eq!(session.reading(), Some(&reading));
}

#[test]
fn each_draw_keeps_the_card_count_constant() {
    let rolls = vec![0.1, 0.95, 0.5, 0.81, 0.79, 0.3];
    let mut events = EventBus::default();
    let mut session = Session::new(SessionConfig::default(), Locale::ZhCn, ScriptedSource::new(rolls));
    session.start(&mut events).expect("start");
    session.submit_question("我的未来？", &mut events).expect("question");
    session
        .select_spread_id("celtic", &mut events)
        .expect("spread");
    let mut seen = HashSet::new();
    while session.needed() > 0 {
        let before = session.deck().len();
        session.draw_at(before - 1, &mut events).expect("draw");
        assert_eq!(session.deck().len(), before - 1);
        assert_eq!(session.deck().len() + session.drawn_cards().len(), DECK_SIZE);
        let last = session.drawn_cards().last().expect("drawn");
        assert!(seen.insert(last.card.id.clone()));
        assert!(!session.deck().cards().contains(&last.card));
    }
    assert_eq!(session.drawn_cards()[0].position_name, "当前状态");
}

#[test]
fn every_spread_shuffles_a_permutation_of_the_catalog() {
    for spread in all_spreads() {
        let (mut session, mut events) = fresh(99, Locale::EnUs);
        session.start(&mut events).expect("start");
        session.submit_question("q", &mut events).expect("question");
        session
            .select_spread(spread.clone(), &mut events)
            .expect("spread");
        let ids: HashSet<_> = session.deck().cards().iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), DECK_SIZE, "{}", spread.id);
    }
}

#[test]
fn reset_during_auto_advance_window_stays_on_welcome() {
    let (mut session, mut events) = fresh(5, Locale::EnUs);
    session.start(&mut events).expect("start");
    session.submit_question("q", &mut events).expect("question");
    session
        .select_spread_id("celtic", &mut events)
        .expect("spread");
    session.auto_draw_remaining(&mut events).expect("auto");
    session.advance(ms(250), &mut events);
    session.reset(&mut events);
    session.advance(ms(1000), &mut events);
    assert_eq!(session.step(), Step::Welcome);
    assert!(!steps(&mut events).contains(&Step::Reveal));
}

#[test]
fn respread_after_going_back_starts_a_fresh_draw() {
    let (mut session, mut events) = fresh(12, Locale::EnUs);
    session.start(&mut events).expect("start");
    session.submit_question("q", &mut events).expect("question");
    session
        .select_spread_id("single", &mut events)
        .expect("spread");
    session.draw_at(0, &mut events).expect("draw");
    session.go_back(&mut events).expect("back");
    session
        .select_spread_id("three-time", &mut events)
        .expect("spread");
    assert!(session.drawn_cards().is_empty());
    assert_eq!(session.deck().len(), DECK_SIZE);
    session.advance(ms(2000), &mut events);
    assert_eq!(session.step(), Step::ShuffleAndDraw);
}

#[test]
fn intents_from_the_wrong_step_change_nothing() {
    let (mut session, mut events) = fresh(1, Locale::EnUs);
    assert_eq!(
        session.draw_at(0, &mut events),
        Err(SessionError::InvalidStep(Step::Welcome))
    );
    assert_eq!(
        session.reveal_all(&mut events),
        Err(SessionError::InvalidStep(Step::Welcome))
    );
    assert_eq!(
        session.select_spread_id("single", &mut events),
        Err(SessionError::InvalidStep(Step::Welcome))
    );
    session.start(&mut events).expect("start");
    session.submit_question("q", &mut events).expect("question");
    assert_eq!(
        session.select_spread_id("nine-card", &mut events),
        Err(SessionError::UnknownSpread("nine-card".to_string()))
    );
    assert_eq!(session.step(), Step::SpreadSelect);
    assert!(session.begin_interpretation(&mut events).is_err());
}
