//! Conversation-related types.

/// The speaker of a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The human side of the conversation.
    User,
    /// The model side of the conversation.
    Assistant,
}

impl Role {
    /// Returns the label used when rendering this role into a prompt.
    ///
    /// The assistant label is empty, so prior assistant lines render as
    /// `": {text}"` while user lines render as `"User: {text}"`.
    #[inline]
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "",
        }
    }
}

/// An entry in the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry {
    pub(crate) role: Role,
    pub(crate) text: String,
}

impl Entry {
    /// Returns the role of this entry.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text of this entry.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// An append-only record of the conversation so far.
///
/// Entries are never mutated or removed; each successful exchange
/// appends exactly one user entry followed by one assistant entry.
#[derive(Clone, Default, Debug)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    /// Returns the entries in insertion order.
    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the transcript has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn push(&mut self, role: Role, text: String) {
        self.entries.push(Entry { role, text });
    }

    /// Renders the linear prompt: every existing entry as
    /// `"{label}: {text}"` joined by newlines, followed by the new user
    /// message.
    pub fn render_prompt(&self, next_message: &str) -> String {
        let mut lines: Vec<String> = self
            .entries
            .iter()
            .map(|entry| format!("{}: {}", entry.role.label(), entry.text))
            .collect();
        lines.push(format!("User: {next_message}"));
        lines.join("\n")
    }
}
