//! Undo/Redo command stack.
//!
//! Every stroke-list change is wrapped in a reversible `Command`. Commands
//! are pushed to a stack; undo pops and reverts, redo re-applies.
//!
//! Erasing records the removed strokes together with their original
//! indices, so undo puts them back at the same paint depth.

use ink_core::{Stroke, StrokeId};

/// A reversible change to the stroke list.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// A stroke appended on top.
    Add { stroke: Stroke },
    /// Strokes removed by one eraser gesture, as `(index, stroke)` with
    /// ascending indices into the list before removal.
    Erase { removed: Vec<(usize, Stroke)> },
}

impl Command {
    pub fn description(&self) -> &'static str {
        match self {
            Command::Add { stroke: Stroke::Draw(_) } => "draw stroke",
            Command::Add { stroke: Stroke::Text(_) } => "add text",
            Command::Erase { .. } => "erase",
        }
    }

    /// Apply the forward change.
    pub fn apply(&self, strokes: &mut Vec<Stroke>) {
        match self {
            Command::Add { stroke } => strokes.push(stroke.clone()),
            Command::Erase { removed } => {
                // Descending so earlier indices stay valid.
                for (index, _) in removed.iter().rev() {
                    if *index < strokes.len() {
                        strokes.remove(*index);
                    }
                }
            }
        }
    }

    /// Apply the inverse change.
    pub fn revert(&self, strokes: &mut Vec<Stroke>) {
        match self {
            Command::Add { stroke } => {
                let id = stroke.id();
                if let Some(pos) = strokes.iter().rposition(|s| s.id() == id) {
                    strokes.remove(pos);
                }
            }
            Command::Erase { removed } => {
                for (index, stroke) in removed {
                    let at = (*index).min(strokes.len());
                    strokes.insert(at, stroke.clone());
                }
            }
        }
    }

    /// Build an erase command for `ids`, or `None` if none of them exist.
    pub fn erase(strokes: &[Stroke], ids: &[StrokeId]) -> Option<Command> {
        let removed: Vec<(usize, Stroke)> = strokes
            .iter()
            .enumerate()
            .filter(|(_, s)| ids.contains(&s.id()))
            .map(|(i, s)| (i, s.clone()))
            .collect();
        (!removed.is_empty()).then_some(Command::Erase { removed })
    }
}

/// Manages undo/redo stacks.
pub struct CommandStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Maximum undo depth.
    max_depth: usize,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::new(),
            max_depth,
        }
    }

    /// Apply `cmd` and push it to the undo stack. Clears redo.
    pub fn execute(&mut self, strokes: &mut Vec<Stroke>, cmd: Command) {
        log::debug!("execute: {}", cmd.description());
        cmd.apply(strokes);
        self.undo_stack.push(cmd);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Undo the last command. Returns `true` if something was undone.
    pub fn undo(&mut self, strokes: &mut Vec<Stroke>) -> bool {
        let Some(cmd) = self.undo_stack.pop() else {
            return false;
        };
        log::debug!("undo: {}", cmd.description());
        cmd.revert(strokes);
        self.redo_stack.push(cmd);
        true
    }

    /// Redo the last undone command. Returns `true` if something was redone.
    pub fn redo(&mut self, strokes: &mut Vec<Stroke>) -> bool {
        let Some(cmd) = self.redo_stack.pop() else {
            return false;
        };
        log::debug!("redo: {}", cmd.description());
        cmd.apply(strokes);
        self.undo_stack.push(cmd);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for CommandStack {
    fn default() -> Self {
        Self::new(100)
    }
}
