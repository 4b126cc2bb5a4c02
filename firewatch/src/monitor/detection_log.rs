use std::collections::VecDeque;

use crate::hazard::DetectionEvent;

/// In-memory FIFO of confirmed detections, oldest first.
#[derive(Debug, Clone)]
pub struct DetectionLog {
    capacity: usize,
    entries: VecDeque<DetectionEvent>,
}

impl DetectionLog {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "DetectionLog capacity must be positive");
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: DetectionEvent) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&DetectionEvent> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DetectionEvent> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
