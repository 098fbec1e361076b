//! Nesting trackers for the reader and the writer.
//!
//! Both stacks are growable arrays of frames indexed by depth; the root
//! frame is always present and never popped. The read side additionally
//! tracks the current field name per level and, when strict duplicate
//! detection is on, the set of names already seen at that level.

use alloc::{
    collections::BTreeSet,
    string::{String, ToString},
    vec,
    vec::Vec,
};
use core::fmt;

/// The kind of a nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ContextKind {
    /// The outermost level, outside any container.
    Root,
    /// Inside `[` … `]`.
    Array,
    /// Inside `{` … `}`.
    Object,
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Root => "root",
            Self::Array => "array",
            Self::Object => "object",
        })
    }
}

#[derive(Debug)]
struct ReadFrame {
    kind: ContextKind,
    /// Values (and for objects, members) completed at this level so far.
    count: usize,
    /// Name of the member currently being read, objects only.
    name: Option<String>,
    /// Names already seen at this level; allocated only in strict mode.
    seen: Option<BTreeSet<String>>,
}

impl ReadFrame {
    fn new(kind: ContextKind, detect_duplicates: bool) -> Self {
        Self {
            kind,
            count: 0,
            name: None,
            seen: (detect_duplicates && kind == ContextKind::Object).then(BTreeSet::new),
        }
    }
}

/// Nesting tracker for [`crate::JsonReader`].
#[derive(Debug)]
pub(crate) struct ReadContextStack {
    frames: Vec<ReadFrame>,
    detect_duplicates: bool,
}

impl ReadContextStack {
    pub(crate) fn new(detect_duplicates: bool) -> Self {
        Self {
            frames: vec![ReadFrame::new(ContextKind::Root, detect_duplicates)],
            detect_duplicates,
        }
    }

    pub(crate) fn kind(&self) -> ContextKind {
        self.top().kind
    }

    /// Containers currently open; 0 at root.
    pub(crate) fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub(crate) fn entry_count(&self) -> usize {
        self.top().count
    }

    pub(crate) fn push_object(&mut self) {
        self.frames
            .push(ReadFrame::new(ContextKind::Object, self.detect_duplicates));
    }

    pub(crate) fn push_array(&mut self) {
        self.frames
            .push(ReadFrame::new(ContextKind::Array, self.detect_duplicates));
    }

    /// Pops the innermost container and reports the kind of the exposed
    /// parent. Returns `None` when already at root.
    pub(crate) fn pop(&mut self) -> Option<ContextKind> {
        if self.frames.len() == 1 {
            return None;
        }
        self.frames.pop();
        Some(self.top().kind)
    }

    /// Records a member name at the current level. `Err(name)` signals a
    /// duplicate under strict detection.
    pub(crate) fn set_name(&mut self, name: &str) -> Result<(), String> {
        let frame = self.top_mut();
        if let Some(seen) = frame.seen.as_mut() {
            if !seen.insert(name.to_string()) {
                return Err(name.to_string());
            }
        }
        frame.name = Some(name.to_string());
        Ok(())
    }

    pub(crate) fn current_name(&self) -> Option<&str> {
        self.top().name.as_deref()
    }

    pub(crate) fn note_value(&mut self) {
        self.top_mut().count += 1;
    }

    pub(crate) fn clear(&mut self) {
        self.frames.truncate(1);
        self.frames[0] = ReadFrame::new(ContextKind::Root, self.detect_duplicates);
    }

    fn top(&self) -> &ReadFrame {
        // Invariant: the root frame is never popped.
        &self.frames[self.frames.len() - 1]
    }

    fn top_mut(&mut self) -> &mut ReadFrame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

#[derive(Debug)]
struct WriteFrame {
    kind: ContextKind,
    /// Values written at this level, drives separator placement.
    count: usize,
    /// Field name awaiting its value, objects only.
    pending_name: Option<String>,
}

impl WriteFrame {
    fn new(kind: ContextKind) -> Self {
        Self {
            kind,
            count: 0,
            pending_name: None,
        }
    }
}

/// Nesting tracker for [`crate::JsonWriter`].
#[derive(Debug)]
pub(crate) struct WriteContextStack {
    frames: Vec<WriteFrame>,
}

impl WriteContextStack {
    pub(crate) fn new() -> Self {
        Self {
            frames: vec![WriteFrame::new(ContextKind::Root)],
        }
    }

    pub(crate) fn kind(&self) -> ContextKind {
        self.top().kind
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub(crate) fn entry_count(&self) -> usize {
        self.top().count
    }

    pub(crate) fn push(&mut self, kind: ContextKind) {
        self.frames.push(WriteFrame::new(kind));
    }

    pub(crate) fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub(crate) fn pending_name(&self) -> Option<&str> {
        self.top().pending_name.as_deref()
    }

    pub(crate) fn set_pending_name(&mut self, name: &str) {
        self.top_mut().pending_name = Some(name.to_string());
    }

    pub(crate) fn note_value(&mut self) {
        let frame = self.top_mut();
        frame.count += 1;
        frame.pending_name = None;
    }

    fn top(&self) -> &WriteFrame {
        &self.frames[self.frames.len() - 1]
    }

    fn top_mut(&mut self) -> &mut WriteFrame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_stack_tracks_depth_and_kind() {
        let mut stack = ReadContextStack::new(false);
        assert_eq!(stack.kind(), ContextKind::Root);
        assert_eq!(stack.depth(), 0);

        stack.push_object();
        stack.push_array();
        assert_eq!(stack.kind(), ContextKind::Array);
        assert_eq!(stack.depth(), 2);

        assert_eq!(stack.pop(), Some(ContextKind::Object));
        assert_eq!(stack.pop(), Some(ContextKind::Root));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn duplicate_names_rejected_only_in_strict_mode() {
        let mut lenient = ReadContextStack::new(false);
        lenient.push_object();
        assert!(lenient.set_name("a").is_ok());
        assert!(lenient.set_name("a").is_ok());

        let mut strict = ReadContextStack::new(true);
        strict.push_object();
        assert!(strict.set_name("a").is_ok());
        assert_eq!(strict.set_name("a"), Err("a".into()));
        // A nested object is a fresh level.
        strict.push_object();
        assert!(strict.set_name("a").is_ok());
    }

    #[test]
    fn write_stack_counts_values_per_level() {
        let mut stack = WriteContextStack::new();
        stack.push(ContextKind::Array);
        stack.note_value();
        stack.note_value();
        assert_eq!(stack.entry_count(), 2);
        stack.pop();
        assert_eq!(stack.entry_count(), 0);
        assert_eq!(stack.kind(), ContextKind::Root);
    }

    #[test]
    fn pending_name_cleared_by_value() {
        let mut stack = WriteContextStack::new();
        stack.push(ContextKind::Object);
        stack.set_pending_name("x");
        assert_eq!(stack.pending_name(), Some("x"));
        stack.note_value();
        assert_eq!(stack.pending_name(), None);
    }
}
