//! Engine event sink

use crate::engine::EngineEvent;

/// Receives the events the engine reports to its host
///
/// `E` is the transport error type. Any `FnMut(EngineEvent<E>)` closure is an
/// observer.
pub trait EngineObserver<E> {
    /// Handle one event
    fn notify(&mut self, event: EngineEvent<E>);
}

impl<E, F> EngineObserver<E> for F
where
    F: FnMut(EngineEvent<E>),
{
    fn notify(&mut self, event: EngineEvent<E>) {
        self(event)
    }
}
