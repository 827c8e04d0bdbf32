//! Terminal I/O: raw mode session, event reader thread, frame output

use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;

use crossterm::event::{
    self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::style::{
    Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use crossterm::{ExecutableCommand, QueueableCommand, cursor, terminal};

use super::raster::Framebuffer;

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '\u{2580}';

/// Raw mode + alternate screen for the lifetime of the value
pub struct TerminalSession<W: Write> {
    pub out: W,
    keyboard_enhanced: bool,
}

impl<W: Write> TerminalSession<W> {
    pub fn enter(mut out: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        // Release events let held keys end promptly; not every terminal has them
        let keyboard_enhanced = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        log::debug!("Keyboard enhancement: {}", keyboard_enhanced);
        Ok(Self {
            out,
            keyboard_enhanced,
        })
    }

    /// Current size in cells
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl<W: Write> Drop for TerminalSession<W> {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = self.out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.out.execute(ResetColor);
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Read terminal events on a dedicated thread so the game loop never blocks
pub fn spawn_event_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });
    rx
}

pub fn to_term_color(rgb: [f32; 3]) -> TermColor {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    TermColor::Rgb {
        r: c(rgb[0]),
        g: c(rgb[1]),
        b: c(rgb[2]),
    }
}

/// Write one frame: half-block pixels, then text overlays
pub fn present<W: Write>(out: &mut W, fb: &Framebuffer) -> io::Result<()> {
    let mut last: Option<(TermColor, TermColor)> = None;
    for row in 0..fb.rows {
        out.queue(cursor::MoveTo(0, row))?;
        for col in 0..fb.cols {
            let (top, bottom) = fb.cell(col, row);
            let colors = (to_term_color(top), to_term_color(bottom));
            if last != Some(colors) {
                out.queue(SetForegroundColor(colors.0))?;
                out.queue(SetBackgroundColor(colors.1))?;
                last = Some(colors);
            }
            out.queue(Print(HALF_BLOCK))?;
        }
    }

    for text in &fb.texts {
        let (_, bottom) = fb.cell(text.col, text.row);
        out.queue(cursor::MoveTo(text.col, text.row))?;
        out.queue(SetBackgroundColor(to_term_color(bottom)))?;
        out.queue(SetForegroundColor(to_term_color([
            text.color[0],
            text.color[1],
            text.color[2],
        ])))?;
        if text.bold {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        out.queue(Print(&text.text))?;
        if text.bold {
            out.queue(SetAttribute(Attribute::NormalIntensity))?;
        }
    }

    out.queue(ResetColor)?;
    out.flush()
}
