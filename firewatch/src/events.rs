//! Typed event fan-out.
//!
//! Each subscriber gets its own unbounded channel and receives every event
//! published after it subscribed, exactly once. Dropping a [`Subscription`]
//! detaches it. Channels work without a running runtime through `try_next`.

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

#[derive(Debug)]
pub struct EventBus<T> {
    subscribers: Vec<UnboundedSender<T>>,
}

/// Receiving end of an [`EventBus`].
#[derive(Debug)]
pub struct Subscription<T> {
    rx: UnboundedReceiver<T>,
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
        }
    }
}

impl<T: Clone> EventBus<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Subscription<T> {
        let (tx, rx) = unbounded_channel();
        self.subscribers.push(tx);
        Subscription { rx }
    }

    pub fn publish(&mut self, event: T) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.iter().filter(|tx| !tx.is_closed()).count()
    }
}

impl<T> Subscription<T> {
    /// Next queued event, without waiting.
    pub fn try_next(&mut self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Everything queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<T> {
        std::iter::from_fn(|| self.try_next()).collect()
    }

    /// Waits for the next event; `None` once the bus is gone and the queue is empty.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_gets_each_event_once() {
        let mut bus = EventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(1);
        bus.publish(2);

        assert_eq!(a.drain(), vec![1, 2]);
        assert_eq!(b.drain(), vec![1, 2]);
        assert!(a.try_next().is_none());
    }

    #[test]
    fn late_subscriber_misses_earlier_events() {
        let mut bus = EventBus::new();
        bus.publish("early");
        let mut late = bus.subscribe();
        bus.publish("late");

        assert_eq!(late.drain(), vec!["late"]);
    }

    #[test]
    fn dropped_subscription_is_detached() {
        let mut bus = EventBus::new();
        let kept = bus.subscribe();
        let dropped = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(dropped);
        assert_eq!(bus.subscriber_count(), 1);
        bus.publish(7);
        assert_eq!(bus.subscribers.len(), 1);

        let mut kept = kept;
        assert_eq!(kept.drain(), vec![7]);
    }

    #[tokio::test]
    async fn recv_ends_when_bus_is_dropped() {
        let mut bus = EventBus::new();
        let mut sub = bus.subscribe();
        bus.publish(3u8);
        drop(bus);

        assert_eq!(sub.recv().await, Some(3));
        assert_eq!(sub.recv().await, None);
    }
}
