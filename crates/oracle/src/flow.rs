use crate::Interpreter;
use arcana_core::{
    EventBus, HistoryStore, Interpretation, InterpretationTicket, KeyValueStore, RandomSource,
    ReadingResult, Session, SessionError,
};

/// Runs the whole `Reveal -> Reading` step: asks the interpreter, builds the
/// reading and records it in history.
pub async fn request_interpretation<R, S>(
    session: &mut Session<R>,
    interpreter: &Interpreter,
    history: &mut HistoryStore<S>,
    now_millis: u64,
    events: &mut EventBus,
) -> Result<ReadingResult, SessionError>
where
    R: RandomSource,
    S: KeyValueStore,
{
    let request = session.begin_interpretation(events)?;
    let interpretation = interpreter.interpret(&request).await;
    record_interpretation(
        session,
        history,
        request.ticket,
        interpretation,
        now_millis,
        events,
    )
}

/// Completes an interpretation that finished elsewhere and appends the
/// reading to history. A history write failure is logged, not returned.
pub fn record_interpretation<R, S>(
    session: &mut Session<R>,
    history: &mut HistoryStore<S>,
    ticket: InterpretationTicket,
    interpretation: Interpretation,
    now_millis: u64,
    events: &mut EventBus,
) -> Result<ReadingResult, SessionError>
where
    R: RandomSource,
    S: KeyValueStore,
{
    let stamp = history.stamp(now_millis);
    let reading = session.complete_interpretation(ticket, interpretation, stamp, events)?;
    if let Err(err) = history.append(reading.clone()) {
        tracing::warn!(%err, id = %reading.id, "reading not saved to history");
    }
    Ok(reading)
}
