//! Lifecycle events and listener registry

use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Open,
    Select,
    Close,
    Destroy,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Select => "select",
            Self::Close => "close",
            Self::Destroy => "destroy",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEvent(pub String);

impl fmt::Display for UnknownEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown lightbox event '{}'", self.0)
    }
}

impl std::error::Error for UnknownEvent {}

impl FromStr for EventKind {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "select" => Ok(Self::Select),
            "close" => Ok(Self::Close),
            "destroy" => Ok(Self::Destroy),
            other => Err(UnknownEvent(other.to_string())),
        }
    }
}

/// One dispatched event. Listeners may cancel it with [`prevent_default`].
///
/// [`prevent_default`]: LightboxEvent::prevent_default
#[derive(Clone, Debug, PartialEq)]
pub struct LightboxEvent<E> {
    pub kind: EventKind,
    /// Trigger element of the slide involved, if any
    pub source: Option<E>,
    /// Slide index at dispatch time
    pub index: Option<usize>,
    default_prevented: bool,
}

impl<E> LightboxEvent<E> {
    pub fn new(kind: EventKind, source: Option<E>, index: Option<usize>) -> Self {
        Self {
            kind,
            source,
            index,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Handle returned by `on`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler<E> = Box<dyn FnMut(&mut LightboxEvent<E>)>;

struct Listener<E> {
    id: ListenerId,
    kind: EventKind,
    handler: Handler<E>,
}

pub struct EventBus<E> {
    next_id: u64,
    listeners: Vec<Listener<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn on(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&mut LightboxEvent<E>) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// Returns `false` when no listener with this id was subscribed to `kind`.
    pub fn off(&mut self, kind: EventKind, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners
            .retain(|listener| !(listener.id == id && listener.kind == kind));
        self.listeners.len() != before
    }

    /// Run every listener for the event's kind, in subscription order.
    pub fn emit(&mut self, event: &mut LightboxEvent<E>) {
        let kind = event.kind;
        for listener in self
            .listeners
            .iter_mut()
            .filter(|listener| listener.kind == kind)
        {
            (listener.handler)(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
