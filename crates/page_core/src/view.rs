//! Seams between the timeline controllers and whatever renders the page.
//!
//! Every method is a synchronous, infallible presentation update except
//! [`Chime::play`], which is best-effort, and [`FormTransport::deliver`], the
//! only network boundary.

use async_trait::async_trait;
use shared::{
    domain::{ButtonPhase, ElementId, LayerId},
    error::{ChimeError, DeliveryError},
    protocol::{FormSnapshot, Notice},
};

use crate::intro::ChimeTone;

/// Full-screen boot console overlay.
pub trait Overlay: Send + Sync {
    /// Hide without any transition.
    fn hide_now(&self);
    /// Start the hide transition (`intro-hidden`).
    fn begin_hide(&self);
    /// Remove the overlay once its transition has run.
    fn detach(&self);
}

pub trait ConsoleView: Send + Sync {
    fn append_line(&self, index: usize, markup: &str);
    /// Moves the blinking cursor from the previously active line to `to`.
    fn move_cursor(&self, from: Option<usize>, to: usize);
}

pub trait ProgressBar: Send + Sync {
    fn set_percent(&self, percent: f32);
}

pub trait ClockReadout: Send + Sync {
    fn show(&self, readout: &str);
}

pub trait Chime: Send + Sync {
    fn play(&self, tone: &ChimeTone) -> Result<(), ChimeError>;
}

pub trait ContactForm: Send + Sync {
    /// Clears every field.
    fn reset(&self);
}

pub trait SendButton: Send + Sync {
    /// Apply the transient press scale; `1.0` releases it.
    fn set_scale(&self, scale: f32);
    fn set_phase(&self, phase: ButtonPhase);
    fn set_label(&self, label: &str);
    /// `None` hides the icon.
    fn set_icon(&self, icon: Option<&str>);
}

pub trait ResultCard: Send + Sync {
    fn fade_in(&self);
    fn fade_out(&self);
    fn hide(&self);
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

#[async_trait]
pub trait FormTransport: Send + Sync {
    async fn deliver(&self, form: &FormSnapshot) -> Result<(), DeliveryError>;
}

pub trait TypingTarget: Send + Sync {
    fn set_text(&self, text: &str);
    fn set_cursor(&self, blinking: bool);
}

pub trait Revealable: Send + Sync {
    fn element_id(&self) -> ElementId;
    /// Adds the `is-visible` presentation state.
    fn mark_visible(&self);
}

pub trait ParallaxLayer: Send + Sync {
    fn layer_id(&self) -> LayerId;
    fn set_offset(&self, x: f32, y: f32);
}
