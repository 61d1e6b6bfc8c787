use ahash::AHashMap;
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    TransitionReady,
    ArrivalCountdownStarted,
    Arrival,
    MonsterKill,
    LocationReset,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// The maze is generated and the transition has lasted long enough.
    TransitionReady,
    /// The current maze has a reaper, which will arrive after the given amount of seconds.
    ArrivalCountdownStarted(u32),
    /// The reaper has arrived.
    Arrival,
    /// The player has been caught by a monster.
    MonsterKill,
    /// The player has been moved back to the given location.
    LocationReset(Vec3),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::TransitionReady => EventKind::TransitionReady,
            Event::ArrivalCountdownStarted(_) => EventKind::ArrivalCountdownStarted,
            Event::Arrival => EventKind::Arrival,
            Event::MonsterKill => EventKind::MonsterKill,
            Event::LocationReset(_) => EventKind::LocationReset,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type Listener = Box<dyn FnMut(&Event)>;

/// Publish/subscribe registry for maze notifications.
///
/// Listeners of the same kind are called in no particular order.
#[derive(Default)]
pub struct EventBus {
    listeners: AHashMap<EventKind, Vec<(ListenerId, Listener)>>,
    next_id: usize,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&Event) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Returns whether a listener was actually removed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        for listeners in self.listeners.values_mut() {
            if let Some(idx) = listeners.iter().position(|(lid, _)| *lid == id) {
                drop(listeners.swap_remove(idx));
                return true;
            }
        }
        false
    }

    pub fn publish(&mut self, event: &Event) {
        if let Some(listeners) = self.listeners.get_mut(&event.kind()) {
            for (_, listener) in listeners.iter_mut() {
                listener(event);
            }
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map(Vec::len).unwrap_or(0)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field(
                "listeners",
                &self
                    .listeners
                    .iter()
                    .map(|(kind, l)| (kind, l.len()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod test {
    use std::{cell::RefCell, rc::Rc};

    use super::{Event, EventBus, EventKind};

    #[test]
    fn delivers_only_to_matching_kind() {
        let mut bus = EventBus::new();
        let received = Rc::new(RefCell::new(vec![]));
        let sink = received.clone();
        bus.subscribe(EventKind::ArrivalCountdownStarted, move |e| {
            sink.borrow_mut().push(*e)
        });
        bus.publish(&Event::TransitionReady);
        bus.publish(&Event::ArrivalCountdownStarted(100));
        assert_eq!(*received.borrow(), vec![Event::ArrivalCountdownStarted(100)]);
    }

    #[test]
    fn every_listener_is_called() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        for _ in 0..3 {
            let count = count.clone();
            bus.subscribe(EventKind::Arrival, move |_| *count.borrow_mut() += 1);
        }
        bus.publish(&Event::Arrival);
        assert_eq!(*count.borrow(), 3);
    }

    #[test]
    fn unsubscribe() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        let id = bus.subscribe(EventKind::MonsterKill, move |_| *c.borrow_mut() += 1);
        assert_eq!(bus.listener_count(EventKind::MonsterKill), 1);
        assert_eq!(Rc::strong_count(&count), 2);
        assert!(bus.unsubscribe(id));
        // The removed listener is dropped along with its captures
        assert_eq!(Rc::strong_count(&count), 1);
        assert!(!bus.unsubscribe(id));
        bus.publish(&Event::MonsterKill);
        assert_eq!(*count.borrow(), 0);
        assert_eq!(bus.listener_count(EventKind::MonsterKill), 0);
    }
}
