//! Timeline controllers for the portfolio page: boot console intro, contact
//! form submission, hero typewriter, reveal-on-scroll and pointer parallax.

pub mod clock;
pub mod intro;
pub mod parallax;
pub mod reveal;
pub mod submission;
pub mod timers;
pub mod typewriter;
pub mod view;

pub use clock::{format_elapsed, ElapsedClock};
pub use intro::{
    boot_script, ChimeTone, FinishTrigger, IntroConfig, IntroSequencer, IntroStart, IntroView,
    Waveform,
};
pub use parallax::{LayerOffset, PointerParallax, Rect};
pub use reveal::{IntersectionEntry, RevealController};
pub use submission::{SubmissionConfig, SubmissionSequencer, SubmissionView};
pub use timers::{TimerHandle, TimerSet};
pub use typewriter::{Typewriter, TypewriterConfig};
