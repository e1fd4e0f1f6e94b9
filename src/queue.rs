use crate::dispatch::dispatch;
use crate::engine::Engine;
use crate::event::Event;
use crate::sink::Sink;
use crate::types::EventType;

/// Refers to an event in the [`EventQueue`] that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EventHandle(usize);

/// The events raised by one operation, in creation order.
///
/// A queue is built up while an operation runs and consumed by [`notify`](EventQueue::notify)
/// when it completes:
///
/// ```
/// use imap_notify::{Config, Engine, EventGroup, EventType};
/// use imap_notify::sink::LogSink;
///
/// let engine = Engine::new(Config::new("log").group(EventGroup::Mailbox));
/// let mut queue = engine.queue();
/// let create = queue.enqueue(EventType::MailboxCreate);
/// if let Some(event) = queue.get_mut(create) {
///     event.set_access(None, None, None, Some("user.bob.Work"));
/// }
/// // Login is not enabled, so nothing is queued and the handle is None
/// let login = queue.enqueue(EventType::Login);
/// assert!(queue.get_mut(login).is_none());
/// assert_eq!(queue.notify(&mut LogSink), 1);
/// ```
#[derive(Debug)]
pub struct EventQueue<'e> {
    engine: &'e Engine,
    events: Vec<Event<'e>>,
}

impl<'e> EventQueue<'e> {
    pub(crate) fn new(engine: &'e Engine) -> Self {
        EventQueue {
            engine,
            events: Vec::new(),
        }
    }

    /// Create an event of type `ty` and append it to the queue.
    ///
    /// Returns `None`, and queues nothing, when the event type is not enabled.
    pub fn enqueue(&mut self, ty: EventType) -> Option<EventHandle> {
        let event = self.engine.new_event(ty)?;
        Some(self.push(event))
    }

    pub(crate) fn push(&mut self, event: Event<'e>) -> EventHandle {
        self.events.push(event);
        EventHandle(self.events.len() - 1)
    }

    /// The event behind `handle`. `None` gives `None`.
    pub fn get(&self, handle: Option<EventHandle>) -> Option<&Event<'e>> {
        self.events.get(handle?.0)
    }

    /// The event behind `handle`, for filling. `None` gives `None`.
    pub fn get_mut(&mut self, handle: Option<EventHandle>) -> Option<&mut Event<'e>> {
        self.events.get_mut(handle?.0)
    }

    /// Number of queued events, cancelled ones included.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing was queued.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Queued events in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Event<'e>> {
        self.events.iter()
    }

    /// Report a `FlagsClear` of `\Seen` before the `FlagsSet` it follows, so that consumers see
    /// unseen counts change in the right order.
    ///
    /// Only the first two events are ever swapped.
    fn reorder_seen_clear(&mut self) {
        let swap = match self.events.as_slice() {
            [first, second, ..] => {
                first.is(EventType::FlagsSet)
                    && second.is(EventType::FlagsClear)
                    && second
                        .flag_names
                        .iter()
                        .any(|f| f.eq_ignore_ascii_case("\\Seen"))
            }
            _ => false,
        };
        if swap {
            self.events.swap(0, 1);
        }
    }

    /// Send every event of the queue to `sink`, consuming the queue.
    ///
    /// Cancelled events and events lacking the data they report on are dropped silently. One
    /// event may produce several payloads (see [`dispatch`](crate::dispatch)). Returns the
    /// number of payloads the sink accepted.
    pub fn notify(mut self, sink: &mut dyn Sink) -> usize {
        self.reorder_seen_clear();
        self.events
            .into_iter()
            .map(|event| dispatch(event, sink))
            .sum()
    }
}

impl<'q, 'e> IntoIterator for &'q EventQueue<'e> {
    type Item = &'q Event<'e>;
    type IntoIter = std::slice::Iter<'q, Event<'e>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::EventGroup;

    fn engine() -> Engine {
        Engine::new(Config::new("log").group(EventGroup::Flags))
    }

    fn order(queue: &EventQueue<'_>) -> Vec<EventType> {
        queue.iter().map(Event::event_type).collect()
    }

    #[test]
    fn disabled_types_are_not_queued() {
        let engine = engine();
        let mut queue = engine.queue();
        let handle = queue.enqueue(EventType::MessageNew);
        assert!(handle.is_none());
        assert!(queue.get(handle).is_none());
        assert!(queue.get_mut(handle).is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn seen_clear_moves_first() {
        let engine = engine();
        let mut queue = engine.queue();
        queue.enqueue(EventType::FlagsSet);
        let clear = queue.enqueue(EventType::FlagsClear);
        queue.get_mut(clear).unwrap().add_flag("\\seen");
        queue.reorder_seen_clear();
        assert_eq!(order(&queue), vec![EventType::FlagsClear, EventType::FlagsSet]);
    }

    #[test]
    fn other_clears_keep_their_place() {
        let engine = engine();
        let mut queue = engine.queue();
        queue.enqueue(EventType::FlagsSet);
        let clear = queue.enqueue(EventType::FlagsClear);
        queue.get_mut(clear).unwrap().add_flag("\\Flagged");
        queue.reorder_seen_clear();
        assert_eq!(order(&queue), vec![EventType::FlagsSet, EventType::FlagsClear]);
    }

    #[test]
    fn only_the_head_pair_is_reordered() {
        let engine = engine();
        let mut queue = engine.queue();
        queue.enqueue(EventType::FlagsClear);
        queue.enqueue(EventType::FlagsSet);
        let clear = queue.enqueue(EventType::FlagsClear);
        queue.get_mut(clear).unwrap().add_flag("\\Seen");
        queue.reorder_seen_clear();
        assert_eq!(
            order(&queue),
            vec![EventType::FlagsClear, EventType::FlagsSet, EventType::FlagsClear]
        );
    }
}
