use std::collections::{VecDeque, vec_deque};

use serde::{Deserialize, Serialize};

/// A discrete input token passed from an agent to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Starts, pauses, resumes, or restarts the game depending on its phase.
    #[display("start")]
    Start,
    #[display("left")]
    MoveLeft,
    #[display("right")]
    MoveRight,
    #[display("rotate CW")]
    RotateCw,
    #[display("rotate CCW")]
    RotateCcw,
}

/// FIFO of [`Action`]s filled by an agent and drained by the game each tick.
///
/// The queue is owned by the game; agents receive a mutable reference while
/// planning.
///
/// # Example
///
/// ```
/// use tabutris_engine::{Action, ActionQueue};
///
/// let mut queue = ActionQueue::new();
/// queue.enqueue(Action::RotateCw);
/// queue.extend([Action::MoveLeft, Action::MoveLeft]);
///
/// assert_eq!(queue.len(), 3);
/// assert_eq!(queue.dequeue(), Some(Action::RotateCw));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionQueue {
    actions: VecDeque<Action>,
}

impl ActionQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, action: Action) {
        self.actions.push_back(action);
    }

    /// Removes the oldest action, or returns `None` if the queue is empty.
    pub fn dequeue(&mut self) -> Option<Action> {
        self.actions.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Returns an iterator over pending actions, oldest first.
    pub fn iter(&self) -> vec_deque::Iter<'_, Action> {
        self.actions.iter()
    }
}

impl Extend<Action> for ActionQueue {
    fn extend<I: IntoIterator<Item = Action>>(&mut self, iter: I) {
        self.actions.extend(iter);
    }
}

impl FromIterator<Action> for ActionQueue {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ActionQueue {
    type Item = &'a Action;
    type IntoIter = vec_deque::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
