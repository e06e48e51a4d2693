//! Session controller for the Gaydar page.
//!
//! Holds the transient UI state (uploaded image, generated level, loading and
//! celebration flags) and exposes the phase transitions the view drives. The
//! controller is framework independent: timers, object URLs and randomness are
//! reached through small seams so the whole flow can be exercised natively.

use log::{debug, info, warn};
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use std::fmt;
use std::ops::{Range, RangeInclusive};

pub mod confetti;

/// Default timing and range parameters
pub mod defaults {
    /// Lower bound (inclusive) of the simulated analysis delay.
    pub const MIN_DELAY_MS: u32 = 2000;
    /// Upper bound (exclusive) of the simulated analysis delay.
    pub const MAX_DELAY_MS: u32 = 8000;
    pub const MIN_LEVEL: u8 = 1;
    pub const MAX_LEVEL: u8 = 100;
    /// How long the celebratory effect stays on screen.
    pub const CELEBRATION_MS: u32 = 5000;
    pub const IMAGE_MIME_PREFIX: &str = "image/";
}

// ──────────────────────────────────────────────────────────────────────────────
// Errors

/// Failure while accepting a user-selected file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// The file's MIME type does not start with `image/`.
    InvalidFileType { mime: String },
    /// The browser refused to create an object URL for the file.
    ObjectUrl(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::InvalidFileType { .. } => write!(f, "Please select an image file"),
            UploadError::ObjectUrl(_) => write!(
                f,
                "There was an error uploading your image. Please try again."
            ),
        }
    }
}

impl std::error::Error for UploadError {}

/// Returns true when `mime` names an image type.
pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with(defaults::IMAGE_MIME_PREFIX)
}

// ──────────────────────────────────────────────────────────────────────────────
// Seams

/// Creates and releases browser-level object URLs for selected files.
pub trait ObjectUrls {
    type Blob: ?Sized;

    fn create(&mut self, blob: &Self::Blob) -> Result<String, UploadError>;
    fn revoke(&mut self, url: &str);
}

/// Source of the fake latency and the generated level.
pub trait AnalysisSource {
    fn delay_ms(&mut self) -> u32;
    fn level(&mut self) -> u8;
}

/// Uniform random analysis source.
#[derive(Debug, Clone)]
pub struct RandomSource<R: Rng> {
    rng: R,
    delay: Range<u32>,
    levels: RangeInclusive<u8>,
}

impl RandomSource<ThreadRng> {
    /// Source backed by the thread-local generator, as used in the browser.
    pub fn from_entropy() -> Self {
        Self::with_rng(rand::rng())
    }
}

impl RandomSource<StdRng> {
    /// Deterministic source for tests and reproducible sessions.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            delay: defaults::MIN_DELAY_MS..defaults::MAX_DELAY_MS,
            levels: defaults::MIN_LEVEL..=defaults::MAX_LEVEL,
        }
    }

    /// Drop the simulated latency entirely.
    pub fn instant(mut self) -> Self {
        self.delay = 0..0;
        self
    }
}

impl<R: Rng> AnalysisSource for RandomSource<R> {
    fn delay_ms(&mut self) -> u32 {
        if self.delay.is_empty() {
            return self.delay.start;
        }
        self.rng.random_range(self.delay.clone())
    }

    fn level(&mut self) -> u8 {
        self.rng.random_range(self.levels.clone())
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// State

/// The image currently shown in the upload zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub name: String,
    pub url: String,
}

/// UI phase, always derived from the session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Welcome,
    Idle,
    ImageSelected,
    Analyzing,
    ResultShown,
}

/// Label and enabled state of the main action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionButton {
    pub label: &'static str,
    pub enabled: bool,
}

impl Phase {
    pub fn action_button(self) -> ActionButton {
        match self {
            Phase::Analyzing => ActionButton {
                label: "Analyzing...",
                enabled: false,
            },
            Phase::ResultShown => ActionButton {
                label: "Level Generated",
                enabled: false,
            },
            Phase::ImageSelected => ActionButton {
                label: "Check Gayness Level",
                enabled: true,
            },
            Phase::Welcome | Phase::Idle => ActionButton {
                label: "Check Gayness Level",
                enabled: false,
            },
        }
    }

    /// Whether the "Try Again" action is visible.
    pub fn shows_reset(self) -> bool {
        self == Phase::ResultShown
    }
}

/// Generation token attached to a deferred callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// An analysis waiting for its timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAnalysis {
    pub ticket: Ticket,
    pub delay_ms: u32,
}

/// A started celebratory effect and when it should stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Celebration {
    pub ticket: Ticket,
    pub level: u8,
    pub duration_ms: u32,
}

/// All mutable state of the single page view.
#[derive(Debug, Default)]
pub struct Session {
    image: Option<UploadedImage>,
    result: Option<u8>,
    loading: bool,
    welcome_dismissed: bool,
    celebrating: bool,
    analysis_generation: u64,
    celebration_generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<u8> {
        self.result
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebrating
    }

    pub fn welcome_dismissed(&self) -> bool {
        self.welcome_dismissed
    }

    pub fn phase(&self) -> Phase {
        if !self.welcome_dismissed {
            Phase::Welcome
        } else if self.loading {
            Phase::Analyzing
        } else if self.result.is_some() {
            Phase::ResultShown
        } else if self.image.is_some() {
            Phase::ImageSelected
        } else {
            Phase::Idle
        }
    }

    pub fn dismiss_welcome(&mut self) {
        if !self.welcome_dismissed {
            debug!("Welcome overlay dismissed");
        }
        self.welcome_dismissed = true;
    }

    /// Accept a user-selected file.
    ///
    /// On error nothing changes: no URL is created and the current image,
    /// result and pending analysis are kept.
    pub fn select_image<U: ObjectUrls>(
        &mut self,
        name: &str,
        mime: &str,
        blob: &U::Blob,
        urls: &mut U,
    ) -> Result<(), UploadError> {
        if !is_image_mime(mime) {
            warn!("Rejected '{}' with MIME type '{}'", name, mime);
            return Err(UploadError::InvalidFileType {
                mime: mime.to_string(),
            });
        }

        let url = urls.create(blob)?;

        if let Some(previous) = self.image.take() {
            urls.revoke(&previous.url);
        }
        if self.loading {
            debug!("New image selected during analysis, cancelling it");
            self.loading = false;
            self.analysis_generation += 1;
        }
        self.stop_celebration();

        info!("Image '{}' selected", name);
        self.image = Some(UploadedImage {
            name: name.to_string(),
            url,
        });
        self.result = None;
        Ok(())
    }

    /// Begin the simulated analysis. Returns `None` unless an image is
    /// selected, no result is shown and nothing is already running.
    pub fn start_analysis(&mut self, source: &mut impl AnalysisSource) -> Option<PendingAnalysis> {
        if self.image.is_none() || self.result.is_some() || self.loading {
            debug!("Ignoring analysis request in phase {:?}", self.phase());
            return None;
        }

        self.loading = true;
        self.analysis_generation += 1;
        let delay_ms = source.delay_ms();
        info!("Analysis started, revealing in {} ms", delay_ms);

        Some(PendingAnalysis {
            ticket: Ticket(self.analysis_generation),
            delay_ms,
        })
    }

    /// Finish the analysis identified by `ticket`.
    ///
    /// Stale tickets (after a reset or a new selection) are ignored.
    pub fn complete_analysis(
        &mut self,
        ticket: Ticket,
        source: &mut impl AnalysisSource,
    ) -> Option<Celebration> {
        if !self.loading || ticket.0 != self.analysis_generation {
            debug!("Dropping stale analysis completion {:?}", ticket);
            return None;
        }

        let level = source
            .level()
            .clamp(defaults::MIN_LEVEL, defaults::MAX_LEVEL);
        self.result = Some(level);
        self.loading = false;
        self.celebrating = true;
        self.celebration_generation += 1;
        info!("Analysis finished with level {}%", level);

        Some(Celebration {
            ticket: Ticket(self.celebration_generation),
            level,
            duration_ms: defaults::CELEBRATION_MS,
        })
    }

    /// Auto-stop for the celebratory effect. Returns true if it was running
    /// under this ticket.
    pub fn end_celebration(&mut self, ticket: Ticket) -> bool {
        if !self.celebrating || ticket.0 != self.celebration_generation {
            return false;
        }
        self.stop_celebration();
        true
    }

    /// Return to `Idle`, releasing the image and invalidating every
    /// outstanding ticket. Safe in any phase, also used on unmount.
    pub fn reset<U: ObjectUrls>(&mut self, urls: &mut U) {
        if let Some(image) = self.image.take() {
            urls.revoke(&image.url);
        }
        self.result = None;
        self.loading = false;
        self.analysis_generation += 1;
        self.stop_celebration();
        info!("Session reset");
    }

    fn stop_celebration(&mut self) {
        self.celebrating = false;
        self.celebration_generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every created and revoked URL.
    #[derive(Default)]
    struct RecordingUrls {
        created: Vec<String>,
        revoked: Vec<String>,
        fail: bool,
    }

    impl ObjectUrls for RecordingUrls {
        type Blob = str;

        fn create(&mut self, blob: &str) -> Result<String, UploadError> {
            if self.fail {
                return Err(UploadError::ObjectUrl("quota exceeded".into()));
            }
            let url = format!("blob:test/{}/{}", self.created.len(), blob);
            self.created.push(url.clone());
            Ok(url)
        }

        fn revoke(&mut self, url: &str) {
            self.revoked.push(url.to_string());
        }
    }

    fn ready_session() -> Session {
        let mut session = Session::new();
        session.dismiss_welcome();
        session
    }

    fn select(session: &mut Session, urls: &mut RecordingUrls, name: &str) {
        session
            .select_image(name, "image/png", name, urls)
            .expect("image accepted");
    }

    #[test]
    fn starts_on_welcome_and_dismiss_is_idempotent() {
        let mut session = Session::new();
        assert_eq!(session.phase(), Phase::Welcome);
        session.dismiss_welcome();
        session.dismiss_welcome();
        assert!(session.welcome_dismissed());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn non_image_file_is_rejected_without_state_change() {
        let mut session = ready_session();
        let mut urls = RecordingUrls::default();

        let err = session
            .select_image("document.pdf", "application/pdf", "pdf", &mut urls)
            .unwrap_err();

        assert_eq!(
            err,
            UploadError::InvalidFileType {
                mime: "application/pdf".into()
            }
        );
        assert_eq!(err.to_string(), "Please select an image file");
        assert!(session.image().is_none());
        assert!(urls.created.is_empty());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn rejected_file_keeps_existing_result() {
        let mut session = ready_session();
        let mut urls = RecordingUrls::default();
        let mut source = RandomSource::seeded(7).instant();
        select(&mut session, &mut urls, "photo.png");
        let pending = session.start_analysis(&mut source).unwrap();
        session.complete_analysis(pending.ticket, &mut source).unwrap();
        let before = session.result();

        for mime in ["", "text/plain", "video/mp4", "application/octet-stream"] {
            assert!(session
                .select_image("x", mime, "x", &mut urls)
                .is_err());
        }

        assert_eq!(session.result(), before);
        assert_eq!(session.image().map(|i| i.name.as_str()), Some("photo.png"));
        assert!(urls.revoked.is_empty());
    }

    #[test]
    fn object_url_failure_leaves_state_unchanged() {
        let mut session = ready_session();
        let mut urls = RecordingUrls::default();
        select(&mut session, &mut urls, "first.png");

        urls.fail = true;
        let err = session
            .select_image("second.png", "image/png", "second", &mut urls)
            .unwrap_err();

        assert!(matches!(err, UploadError::ObjectUrl(_)));
        assert_eq!(session.image().map(|i| i.name.as_str()), Some("first.png"));
        assert!(urls.revoked.is_empty());
    }

    #[test]
    fn replacing_an_image_revokes_the_previous_url_once() {
        let mut session = ready_session();
        let mut urls = RecordingUrls::default();

        select(&mut session, &mut urls, "a.png");
        select(&mut session, &mut urls, "b.jpg");
        select(&mut session, &mut urls, "c.gif");

        assert_eq!(urls.revoked, vec![urls.created[0].clone(), urls.created[1].clone()]);
        assert_eq!(session.image().map(|i| i.url.clone()), Some(urls.created[2].clone()));
        assert_eq!(session.phase(), Phase::ImageSelected);
    }

    #[test]
    fn selecting_after_result_clears_it() {
        let mut session = ready_session();
        let mut urls = RecordingUrls::default();
        let mut source = RandomSource::seeded(1).instant();

        select(&mut session, &mut urls, "photo.png");
        let pending = session.start_analysis(&mut source).unwrap();
        session.complete_analysis(pending.ticket, &mut source).unwrap();
        assert!(session.result().is_some());

        select(&mut session, &mut urls, "other.png");
        assert!(session.result().is_none());
        assert!(!session.is_celebrating());
        assert_eq!(session.phase(), Phase::ImageSelected);
    }

    #[test]
    fn start_analysis_requires_image_and_no_result() {
        let mut session = ready_session();
        let mut urls = RecordingUrls::default();
        let mut source = RandomSource::seeded(3).instant();

        assert!(session.start_analysis(&mut source).is_none());
        assert!(!session.is_loading());

        select(&mut session, &mut urls, "photo.png");
        let pending = session.start_analysis(&mut source).unwrap();
        assert!(session.is_loading());

        // already running
        assert!(session.start_analysis(&mut source).is_none());

        session.complete_analysis(pending.ticket, &mut source).unwrap();
        // result shown
        assert!(session.start_analysis(&mut source).is_none());
        assert!(!session.is_loading());
    }

    #[test]
    fn default_delay_stays_in_range() {
        let mut source = RandomSource::seeded(42);
        for _ in 0..1000 {
            let delay = source.delay_ms();
            assert!((defaults::MIN_DELAY_MS..defaults::MAX_DELAY_MS).contains(&delay));
        }
        assert_eq!(RandomSource::seeded(42).instant().delay_ms(), 0);
    }

    #[test]
    fn thousand_runs_produce_levels_in_range() {
        let mut urls = RecordingUrls::default();
        let mut source = RandomSource::seeded(2024).instant();
        let mut seen_low = false;
        let mut seen_high = false;

        for _ in 0..1000 {
            let mut session = ready_session();
            select(&mut session, &mut urls, "photo.png");
            let pending = session.start_analysis(&mut source).unwrap();
            let celebration = session.complete_analysis(pending.ticket, &mut source).unwrap();

            let level = session.result().unwrap();
            assert!((1..=100).contains(&level));
            assert_eq!(celebration.level, level);
            assert!(!session.is_loading());
            seen_low |= level <= 10;
            seen_high |= level >= 90;
        }
        assert!(seen_low && seen_high);
    }

    #[test]
    fn stale_completion_after_reset_is_ignored() {
        let mut session = ready_session();
        let mut urls = RecordingUrls::default();
        let mut source = RandomSource::seeded(9).instant();

        select(&mut session, &mut urls, "photo.png");
        let pending = session.start_analysis(&mut source).unwrap();
        session.reset(&mut urls);

        assert!(session.complete_analysis(pending.ticket, &mut source).is_none());
        assert!(session.result().is_none());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn new_selection_cancels_pending_analysis() {
        let mut session = ready_session();
        let mut urls = RecordingUrls::default();
        let mut source = RandomSource::seeded(11).instant();

        select(&mut session, &mut urls, "first.png");
        let stale = session.start_analysis(&mut source).unwrap();
        select(&mut session, &mut urls, "second.png");

        assert!(!session.is_loading());
        assert!(session.complete_analysis(stale.ticket, &mut source).is_none());
        assert!(session.result().is_none());

        let fresh = session.start_analysis(&mut source).unwrap();
        assert_ne!(fresh.ticket, stale.ticket);
        assert!(session.complete_analysis(fresh.ticket, &mut source).is_some());
    }

    #[test]
    fn celebration_stops_only_for_current_ticket() {
        let mut session = ready_session();
        let mut urls = RecordingUrls::default();
        let mut source = RandomSource::seeded(5).instant();

        select(&mut session, &mut urls, "photo.png");
        let pending = session.start_analysis(&mut source).unwrap();
        let celebration = session.complete_analysis(pending.ticket, &mut source).unwrap();
        assert_eq!(celebration.duration_ms, defaults::CELEBRATION_MS);
        assert!(session.is_celebrating());

        assert!(session.end_celebration(celebration.ticket));
        assert!(!session.is_celebrating());
        assert!(!session.end_celebration(celebration.ticket));
        // the result outlives the effect
        assert_eq!(session.phase(), Phase::ResultShown);
    }

    #[test]
    fn reset_from_every_phase_returns_to_idle() {
        let mut source = RandomSource::seeded(13).instant();

        for steps in 0..4 {
            let mut session = ready_session();
            let mut urls = RecordingUrls::default();
            if steps >= 1 {
                select(&mut session, &mut urls, "photo.png");
            }
            let mut pending = None;
            if steps >= 2 {
                pending = session.start_analysis(&mut source);
            }
            if steps >= 3 {
                session.complete_analysis(pending.unwrap().ticket, &mut source);
            }

            session.reset(&mut urls);

            assert!(session.image().is_none());
            assert!(session.result().is_none());
            assert!(!session.is_loading());
            assert!(!session.is_celebrating());
            assert_eq!(session.phase(), Phase::Idle);
            assert_eq!(urls.revoked.len(), urls.created.len());
        }
    }

    #[test]
    fn reset_during_celebration_invalidates_auto_stop() {
        let mut session = ready_session();
        let mut urls = RecordingUrls::default();
        let mut source = RandomSource::seeded(17).instant();

        select(&mut session, &mut urls, "photo.png");
        let pending = session.start_analysis(&mut source).unwrap();
        let celebration = session.complete_analysis(pending.ticket, &mut source).unwrap();
        session.reset(&mut urls);

        assert!(!session.end_celebration(celebration.ticket));
    }

    #[test]
    fn action_button_follows_phase() {
        let labels: Vec<_> = [
            Phase::Welcome,
            Phase::Idle,
            Phase::ImageSelected,
            Phase::Analyzing,
            Phase::ResultShown,
        ]
        .iter()
        .map(|p| (p.action_button().label, p.action_button().enabled, p.shows_reset()))
        .collect();

        assert_eq!(
            labels,
            vec![
                ("Check Gayness Level", false, false),
                ("Check Gayness Level", false, false),
                ("Check Gayness Level", true, false),
                ("Analyzing...", false, false),
                ("Level Generated", false, true),
            ]
        );
    }

    #[test]
    fn photo_scenario_end_to_end() {
        let mut session = ready_session();
        let mut urls = RecordingUrls::default();
        let mut source = RandomSource::seeded(99).instant();

        select(&mut session, &mut urls, "photo.png");
        assert!(session.image().is_some());
        assert!(session.result().is_none());

        let pending = session.start_analysis(&mut source).unwrap();
        assert_eq!(pending.delay_ms, 0);
        assert_eq!(session.phase(), Phase::Analyzing);

        let celebration = session.complete_analysis(pending.ticket, &mut source).unwrap();
        assert!((1..=100).contains(&session.result().unwrap()));
        assert!(session.is_celebrating());
        assert!(session.end_celebration(celebration.ticket));

        session.reset(&mut urls);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(urls.revoked, urls.created);
    }
}
