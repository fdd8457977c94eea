use roster::View;
use std::{fmt::Write as _, io};

/// Render a snapshot as the text the user sees after every change.
pub fn render(view: &View) -> String {
    let mut out = String::from("Users\n");

    if view.show_loading() {
        out.push_str("Loading users...\n");
    }
    if let Some(error) = view.fetch_error() {
        let _ = writeln!(out, "Error: {}", error);
    }
    for record in &view.records {
        let _ = writeln!(out, "  [{}] {} - {}", record.id, record.name, record.email);
    }
    if view.updating {
        out.push_str("Updating user...\n");
    }
    if view.deleting {
        out.push_str("Deleting user...\n");
    }
    if let Some(ref error) = view.update_error {
        let _ = writeln!(out, "Error: {}", error);
    }
    if let Some(ref error) = view.delete_error {
        let _ = writeln!(out, "Error: {}", error);
    }

    out
}

/// Write a rendered snapshot and flush, so output from background tasks shows up right away.
pub fn show<W: io::Write>(mut out: W, view: &View) -> io::Result<()> {
    out.write_all(render(view).as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::{render, show};
    use roster::{FetchState, MirrorError, Record, RecordId, View};
    use std::io;

    fn view() -> View {
        View {
            records: Vec::new(),
            fetch: FetchState::Idle,
            updating: false,
            deleting: false,
            update_error: None,
            delete_error: None
        }
    }

    #[test]
    fn loading_without_records() {
        let view = View {
            fetch: FetchState::Loading,
            ..view()
        };
        assert_eq!(render(&view), "Users\nLoading users...\n");
    }

    #[test]
    fn records_in_order_with_indicators() {
        let view = View {
            records: vec![Record::new("1", "A", "a@x"), Record::new("2", "B", "b@x")],
            fetch: FetchState::Loaded,
            updating: true,
            deleting: true,
            ..view()
        };
        assert_eq!(
            render(&view),
            "Users\n  [1] A - a@x\n  [2] B - b@x\nUpdating user...\nDeleting user...\n"
        );
    }

    #[test]
    fn errors_are_shown() {
        let view = View {
            fetch: FetchState::Failed(MirrorError::FetchFailed {
                reason: "timed out".to_string()
            }),
            delete_error: Some(MirrorError::DeleteFailed {
                id: RecordId::new("2"),
                reason: "nope".to_string()
            }),
            ..view()
        };
        let text = render(&view);

        assert!(text.contains("Error: could not load users: timed out\n"));
        assert!(text.contains("Error: could not delete user 2: nope\n"));
        assert!(!text.contains("Loading"));
    }

    /// Buffers until flushed, like a line-buffered terminal that has not seen the end of a prompt.
    #[derive(Default)]
    struct Terminal {
        pending: Vec<u8>,
        shown: Vec<u8>
    }

    impl io::Write for Terminal {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.pending.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            let pending = std::mem::take(&mut self.pending);
            self.shown.extend(pending);
            Ok(())
        }
    }

    #[test]
    fn show_flushes_the_whole_view() {
        let view = View {
            records: vec![Record::new("1", "A", "a@x")],
            fetch: FetchState::Loaded,
            ..view()
        };
        let mut terminal = Terminal::default();

        show(&mut terminal, &view).unwrap();

        assert!(terminal.pending.is_empty());
        assert_eq!(String::from_utf8(terminal.shown).unwrap(), render(&view));
    }
}
