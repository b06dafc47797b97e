//! Line framing
//!
//! Datagrams are framed independently. Connection streams keep a carry-over
//! buffer so a line split across reads is reassembled.

/// Split one datagram into its non-empty lines.
///
/// Returns `None` if the datagram is not valid UTF-8; it is then dropped whole.
pub fn split_datagram(datagram: &[u8]) -> Option<Vec<String>> {
    let text = std::str::from_utf8(datagram).ok()?;
    Some(
        text.lines()
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect(),
    )
}

/// Outcome of feeding one read into a `LineFramer`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Framed {
    /// Lines completed by this chunk (possibly none)
    Lines(Vec<String>),
    /// The chunk was not valid UTF-8 and was discarded
    Undecodable,
    /// A zero-length read: the peer closed the connection
    EndOfStream,
}

/// Per-connection line reassembly
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: String,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one read's worth of bytes.
    ///
    /// Each chunk is decoded on its own; a chunk that fails to decode is
    /// dropped and the carry-over is left untouched. Every `\n` completes a
    /// line. A trailing `\r` is kept for the parser to trim.
    pub fn push(&mut self, chunk: &[u8]) -> Framed {
        if chunk.is_empty() {
            return Framed::EndOfStream;
        }
        let Ok(text) = std::str::from_utf8(chunk) else {
            return Framed::Undecodable;
        };
        self.buffer.push_str(text);

        let Some(last_newline) = self.buffer.rfind('\n') else {
            return Framed::Lines(Vec::new());
        };
        let rest = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);

        Framed::Lines(
            complete
                .split('\n')
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Bytes waiting for a terminating newline
    pub fn pending(&self) -> &str {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Framed {
        Framed::Lines(items.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_datagram_multiple_lines() {
        let lines = split_datagram(b"Right Wrist,1\nLeft Wrist,2\n\n").unwrap();
        assert_eq!(lines, vec!["Right Wrist,1", "Left Wrist,2"]);
    }

    #[test]
    fn test_datagram_without_newline() {
        assert_eq!(split_datagram(b"Right Wrist,1").unwrap(), vec!["Right Wrist,1"]);
        assert!(split_datagram(b"").unwrap().is_empty());
    }

    #[test]
    fn test_datagram_invalid_utf8_dropped() {
        assert!(split_datagram(b"Right Wrist,1\n\xff\xfe").is_none());
    }

    #[test]
    fn test_stream_reassembles_split_line() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push(b"Right Wr"), lines(&[]));
        assert_eq!(framer.pending(), "Right Wr");
        assert_eq!(framer.push(b"ist,1,2\nLeft"), lines(&["Right Wrist,1,2"]));
        assert_eq!(framer.pending(), "Left");
    }

    #[test]
    fn test_stream_several_lines_in_one_chunk() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push(b"a\n\nb\nc\n"), lines(&["a", "b", "c"]));
        assert_eq!(framer.pending(), "");
    }

    #[test]
    fn test_stream_keeps_carriage_return() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push(b"Left Wrist,1\r\n"), lines(&["Left Wrist,1\r"]));
    }

    #[test]
    fn test_stream_undecodable_chunk_keeps_buffer() {
        let mut framer = LineFramer::new();
        framer.push(b"Right ");
        assert_eq!(framer.push(b"\xffWrist\n"), Framed::Undecodable);
        assert_eq!(framer.pending(), "Right ");
        assert_eq!(framer.push(b"Wrist,1\n"), lines(&["Right Wrist,1"]));
    }

    #[test]
    fn test_stream_end_of_stream() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.push(b""), Framed::EndOfStream);
    }
}
