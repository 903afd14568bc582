//! Output plumbing shared by commands

use crate::config;
use derive_new::new;
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::{self, Write};

/// Adapts the `minus` pager to `std::io::Write`
///
/// Commands write into the pager buffer like any other writer. `Pager` handles share their
/// buffer, so the binary keeps a clone and hands it to `minus::page_all` once the command is
/// done.
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(text).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Long outputs are paged only for an interactive terminal, and never with `NO_PAGER`
pub fn should_page() -> bool {
    !config::pager_disabled() && io::stdout().is_terminal()
}
