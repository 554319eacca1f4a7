/// Grammar text with a movable read cursor.
///
/// The cursor is a byte offset that always sits on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct SourceBuffer {
    text: String,
    pos: usize,
}

impl SourceBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pos: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move the cursor, clamping to the buffer and backing off to a char boundary.
    pub fn set_pos(&mut self, pos: usize) {
        let mut pos = pos.min(self.text.len());
        while !self.text.is_char_boundary(pos) {
            pos -= 1;
        }
        self.pos = pos;
    }

    /// Read the char under the cursor and advance past it.
    pub fn read(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    pub fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    /// Run `f` and put the cursor back where it was, whatever `f` did with it.
    pub fn preserving_cursor<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.pos;
        let result = f(self);
        self.pos = saved;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_multibyte_chars_whole() {
        let mut buffer = SourceBuffer::new("aé\n");
        assert_eq!(buffer.read(), Some('a'));
        assert_eq!(buffer.read(), Some('é'));
        assert_eq!(buffer.pos(), 3);
        assert_eq!(buffer.read(), Some('\n'));
        assert_eq!(buffer.read(), None);
    }

    #[test]
    fn set_pos_backs_off_to_char_boundary() {
        let mut buffer = SourceBuffer::new("aé");
        buffer.set_pos(2);
        assert_eq!(buffer.pos(), 1);
        buffer.set_pos(99);
        assert_eq!(buffer.pos(), 3);
    }

    #[test]
    fn preserving_cursor_restores_position() {
        let mut buffer = SourceBuffer::new("COMPILER X");
        buffer.set_pos(4);
        let first = buffer.preserving_cursor(|buf| {
            buf.set_pos(0);
            buf.read()
        });
        assert_eq!(first, Some('C'));
        assert_eq!(buffer.pos(), 4);
    }
}
