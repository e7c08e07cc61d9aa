//! The on-screen message queue.

/// Number of messages the queue holds before dropping the least important one.
pub const MESSAGE_QUEUE_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Message {
    text: String,
    priority: u32,
    frames: u32,
}

/// A bounded priority queue of timed messages.
///
/// [`pull`](MessageQueue::pull) returns the highest priority message and counts one frame off
/// its duration; a message is removed once its duration is used up.
#[derive(Debug, Clone)]
pub struct MessageQueue {
    capacity: usize,
    messages: Vec<Message>,
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new(MESSAGE_QUEUE_SIZE)
    }
}

impl MessageQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            messages: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Queues `text` for `frames` frames. When full, the lowest priority message is dropped
    /// if it ranks below the new one; otherwise the new message is.
    pub fn push(&mut self, text: &str, priority: u32, frames: u32) {
        if frames == 0 {
            return;
        }
        if self.messages.len() == self.capacity {
            match self.messages.last() {
                Some(last) if last.priority < priority => {
                    self.messages.pop();
                }
                _ => return,
            }
        }
        // Stable for equal priorities: older messages stay in front.
        let at = self
            .messages
            .iter()
            .position(|m| m.priority < priority)
            .unwrap_or(self.messages.len());
        self.messages.insert(
            at,
            Message {
                text: text.to_owned(),
                priority,
                frames,
            },
        );
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// The message to show this frame.
    pub fn pull(&mut self) -> Option<String> {
        let front = self.messages.first_mut()?;
        front.frames -= 1;
        if front.frames == 0 {
            Some(self.messages.remove(0).text)
        } else {
            Some(front.text.clone())
        }
    }

    /// The message that [`pull`](MessageQueue::pull) would return, without consuming a frame.
    pub fn peek(&self) -> Option<&str> {
        self.messages.first().map(|m| m.text.as_str())
    }
}
