use std::{
    io::{self, Write},
    sync::Mutex,
};

use page_core::{
    view::{
        Chime, ClockReadout, ConsoleView, ContactForm, Notifier, Overlay, ProgressBar,
        ResultCard, SendButton, TypingTarget,
    },
    ChimeTone,
};
use shared::{domain::ButtonPhase, error::ChimeError, protocol::Notice};
use tokio::sync::broadcast;

use crate::{controller::events::PageEvent, ui::markup::strip_markup};

const PROGRESS_WIDTH: usize = 24;

/// Every page surface rendered as lines on stdout.
pub struct TerminalPage {
    events: broadcast::Sender<PageEvent>,
    readout: Mutex<String>,
    typed: Mutex<usize>,
}

impl TerminalPage {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            events,
            readout: Mutex::new("00:00:00".to_string()),
            typed: Mutex::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PageEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: PageEvent) {
        let _ = self.events.send(event);
    }

    fn readout(&self) -> String {
        self.readout
            .lock()
            .map(|readout| readout.clone())
            .unwrap_or_default()
    }
}

impl Default for TerminalPage {
    fn default() -> Self {
        Self::new()
    }
}

pub fn progress_bar(percent: f32) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * PROGRESS_WIDTH as f32).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled),
        clamped
    )
}

impl Overlay for TerminalPage {
    fn hide_now(&self) {
        self.emit(PageEvent::OverlayDetached);
    }

    fn begin_hide(&self) {
        println!("-- intro complete ({}) --", self.readout());
    }

    fn detach(&self) {
        println!();
        self.emit(PageEvent::OverlayDetached);
    }
}

impl ConsoleView for TerminalPage {
    fn append_line(&self, _index: usize, markup: &str) {
        println!("{}", strip_markup(markup));
    }

    fn move_cursor(&self, _from: Option<usize>, _to: usize) {}
}

impl ProgressBar for TerminalPage {
    fn set_percent(&self, percent: f32) {
        println!("   {} {}", progress_bar(percent), self.readout());
    }
}

impl ClockReadout for TerminalPage {
    fn show(&self, readout: &str) {
        if let Ok(mut current) = self.readout.lock() {
            *current = readout.to_string();
        }
    }
}

impl Chime for TerminalPage {
    fn play(&self, _tone: &ChimeTone) -> Result<(), ChimeError> {
        let mut stdout = io::stdout();
        stdout
            .write_all(b"\x07")
            .and_then(|()| stdout.flush())
            .map_err(|err| ChimeError(err.to_string()))
    }
}

impl TypingTarget for TerminalPage {
    fn set_text(&self, text: &str) {
        let Ok(mut typed) = self.typed.lock() else {
            return;
        };
        let chars = text.chars().count();
        if chars < *typed {
            *typed = 0;
        }
        let fresh: String = text.chars().skip(*typed).collect();
        *typed = chars;

        let mut stdout = io::stdout();
        let _ = stdout.write_all(fresh.as_bytes()).and_then(|()| stdout.flush());
    }

    fn set_cursor(&self, _blinking: bool) {}
}

impl ContactForm for TerminalPage {
    fn reset(&self) {
        println!("   (form cleared)");
    }
}

impl SendButton for TerminalPage {
    fn set_scale(&self, _scale: f32) {}

    fn set_phase(&self, phase: ButtonPhase) {
        if phase == ButtonPhase::Idle {
            self.emit(PageEvent::ButtonReverted);
        }
    }

    fn set_label(&self, label: &str) {
        println!("   [{label}]");
    }

    fn set_icon(&self, _icon: Option<&str>) {}
}

impl ResultCard for TerminalPage {
    fn fade_in(&self) {
        println!("   +--------------------------------+");
        println!("   | Message received. Talk soon!   |");
        println!("   +--------------------------------+");
    }

    fn fade_out(&self) {}

    fn hide(&self) {
        self.emit(PageEvent::CardHidden);
    }
}

impl Notifier for TerminalPage {
    fn notify(&self, notice: Notice) {
        match &notice {
            Notice::Success(message) => println!("   {message}"),
            Notice::Error(message) => eprintln!("   ! {message}"),
        }
        self.emit(PageEvent::Notice(notice));
    }
}
