use std::io::{self, Write};

use anstyle::{AnsiColor, Color, Style};
use itertools::Itertools;

use allocator_api2::alloc::Allocator;
use utf8_scrub::{invalid_spans, Utf8Buf, Utf8Chunks, Utf8Error};

pub const ERROR: Style = fg(AnsiColor::Red).bold();
const OK: Style = fg(AnsiColor::Green).bold();
const NOTE: Style = fg(AnsiColor::Cyan);
const MARKER: Style = fg(AnsiColor::Black).bg_color(Some(Color::Ansi(AnsiColor::Yellow)));

// Longer spans are cut short when printed.
const SPAN_PREVIEW: usize = 16;

const fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

/// One line per input for `--check`.
pub fn write_check(out: &mut impl Write, name: &str, result: &Result<(), Utf8Error>) -> io::Result<()> {
    match result {
        Ok(()) => writeln!(out, "{name}: {}ok{}", OK.render(), OK.render_reset()),
        Err(err) => writeln!(out, "{name}: {}{err}{}", ERROR.render(), ERROR.render_reset()),
    }
}

/// Lists the maximal invalid spans of `bytes`, returning how many there were.
pub fn write_spans(out: &mut impl Write, name: &str, bytes: &[u8]) -> io::Result<usize> {
    let mut count = 0;
    for span in invalid_spans(bytes) {
        let broken = &bytes[span.clone()];
        let hex = broken.iter().take(SPAN_PREVIEW).map(|b| format!("{b:02X}")).join(" ");
        let more = if broken.len() > SPAN_PREVIEW { " ..." } else { "" };
        writeln!(
            out,
            "{name}: {}bytes {}..{}{}: {hex}{more}",
            NOTE.render(),
            span.start,
            span.end,
            NOTE.render_reset()
        )?;
        count += 1;
    }
    Ok(count)
}

/// Shows `bytes` the way the sanitizer sees it: valid text as is and each
/// replaced span as a highlighted U+FFFD.
pub fn write_highlighted(out: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
    for chunk in Utf8Chunks::new(bytes) {
        write!(out, "{}", chunk.valid.escape_debug())?;
        if !chunk.broken.is_empty() {
            write!(out, "{}\u{FFFD}{}", MARKER.render(), MARKER.render_reset())?;
        }
    }
    writeln!(out)
}

pub fn write_summary<A: Allocator>(out: &mut impl Write, input_len: usize, sanitized: &Utf8Buf<A>) -> io::Result<()> {
    writeln!(
        out,
        "{}{} bytes in, {} bytes out, {} replaced{}",
        NOTE.render(),
        input_len,
        sanitized.len(),
        sanitized.replacements(),
        NOTE.render_reset()
    )
}
