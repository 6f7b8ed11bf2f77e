//! Change notifications for presentation layers.

use crate::canvas::CanvasDocument;
use crate::elements::ElementId;
use crate::snap::SnapGuide;

/// Something observable about the editor changed.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The element collection or the canvas settings changed.
    ElementsChanged,
    SelectionChanged(Vec<ElementId>),
    /// Guides to draw; empty when a gesture ends.
    GuidesChanged(Vec<SnapGuide>),
    HistoryChanged { can_undo: bool, can_redo: bool },
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&EditorEvent, &CanvasDocument)>;

/// Ordered list of listeners. Listeners get a read-only view of the document.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent, &CanvasDocument) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn emit(&mut self, event: &EditorEvent, doc: &CanvasDocument) {
        for (_, listener) in &mut self.listeners {
            listener(event, doc);
        }
    }
}
