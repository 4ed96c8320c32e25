//! Top-level controller tying intake, effect selection, enhancement and
//! preference persistence together. Free of any UI code so it can be
//! driven directly from tests.

use crate::effects::{self, Effect};
use crate::encoded::EncodedImage;
use crate::enhance::{Enhance, EnhancementError};
use crate::export;
use crate::intake::{self, ImageBlob, InvalidInputError, PendingIntake, SourceImage};
use crate::preferences::PreferenceStore;
use crate::task::{self, Pending, Poll, Waker};
use std::sync::Arc;

/// What the result pane should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPane {
    Busy,
    Failed(String),
    Comparison,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ImageLoaded(String),
    IntakeFailed(String),
    Enhanced,
    EnhancementFailed(String),
}

struct InFlight {
    generation: u64,
    effect_id: &'static str,
    pending: Pending<Result<EncodedImage, EnhancementError>>,
}

pub struct Session {
    store: Box<dyn PreferenceStore>,
    selected: &'static Effect,
    source: Option<SourceImage>,
    /// Bumped whenever the source image changes.
    generation: u64,
    result: Option<EncodedImage>,
    /// Bumped whenever a new result is stored.
    result_revision: u64,
    error: Option<String>,
    in_flight: Option<InFlight>,
    intake: Option<PendingIntake>,
    waker: Option<Waker>,
}

impl Session {
    pub fn new(store: Box<dyn PreferenceStore>) -> Self {
        let stored = store.load();
        let selected = effects::initial_effect(stored.as_deref());
        tracing::debug!(stored = ?stored, selected = selected.id, "restored effect selection");
        Self {
            store,
            selected,
            source: None,
            generation: 0,
            result: None,
            result_revision: 0,
            error: None,
            in_flight: None,
            intake: None,
            waker: None,
        }
    }

    /// Called from worker threads when intake or enhancement completes.
    pub fn set_waker(&mut self, waker: Waker) {
        self.waker = Some(waker);
    }

    pub fn selected_effect(&self) -> &'static Effect {
        self.selected
    }

    /// Select an effect by id and persist the choice. Unknown ids are
    /// ignored and return `false`.
    pub fn select_effect(&mut self, id: &str) -> bool {
        let Some(effect) = effects::find_by_id(id) else {
            tracing::warn!("ignoring unknown effect id '{id}'");
            return false;
        };
        if effect.id != self.selected.id {
            self.selected = effect;
            self.store.save(effect.id);
        }
        true
    }

    pub fn reset_preferences(&mut self) {
        self.store.clear();
        self.selected = effects::default_effect();
    }

    /// Start reading an uploaded file. A non-image is rejected without
    /// touching any image state.
    pub fn submit(&mut self, blob: ImageBlob) -> Result<(), InvalidInputError> {
        let pending = intake::submit(blob, self.waker.clone())?;
        self.intake = Some(pending);
        Ok(())
    }

    pub fn is_reading(&self) -> bool {
        self.intake.is_some()
    }

    /// Replace the source image, superseding any result, error or in-flight
    /// enhancement that belonged to the previous one.
    pub fn accept_image(&mut self, image: SourceImage) {
        tracing::info!(name = %image.display_name, media_type = %image.media_type, "image loaded");
        self.source = Some(image);
        self.reset_image_state();
    }

    pub fn remove_image(&mut self) {
        self.source = None;
        self.reset_image_state();
    }

    fn reset_image_state(&mut self) {
        self.generation += 1;
        self.result = None;
        self.error = None;
        if let Some(job) = self.in_flight.take() {
            tracing::debug!(generation = job.generation, "dropping enhancement for replaced image");
        }
    }

    pub fn can_enhance(&self) -> bool {
        self.source.is_some() && self.in_flight.is_none()
    }

    /// Start one enhancement of the current source with the selected effect.
    /// Returns `false` when there is nothing to enhance or a call is already
    /// running.
    pub fn enhance(&mut self, enhancer: Arc<dyn Enhance>) -> bool {
        if !self.can_enhance() {
            return false;
        }
        let Some(source) = self.source.clone() else {
            return false;
        };
        self.result = None;
        self.error = None;

        let effect = self.selected;
        tracing::info!(
            effect = effect.id,
            media_type = %source.media_type,
            payload_len = source.encoded.payload().map(str::len).unwrap_or(0),
            "starting enhancement"
        );
        let pending = task::spawn("enhancement", self.waker.clone(), move || {
            enhancer.enhance(&source, effect.instruction)
        });
        self.in_flight = Some(InFlight {
            generation: self.generation,
            effect_id: effect.id,
            pending,
        });
        true
    }

    /// Collect finished background work. Call once per frame.
    pub fn poll(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        if let Some(pending) = &self.intake {
            match pending.try_take() {
                Poll::Waiting => {}
                Poll::Ready(Ok(image)) => {
                    self.intake = None;
                    events.push(SessionEvent::ImageLoaded(image.display_name.clone()));
                    self.accept_image(image);
                }
                Poll::Ready(Err(e)) => {
                    self.intake = None;
                    tracing::error!("failed to read upload: {e:#}");
                    events.push(SessionEvent::IntakeFailed(format!("Could not read the file: {e}")));
                }
                Poll::Lost => {
                    self.intake = None;
                    events.push(SessionEvent::IntakeFailed("Could not read the file.".into()));
                }
            }
        }

        if let Some(job) = &self.in_flight {
            let outcome = match job.pending.try_take() {
                Poll::Waiting => None,
                Poll::Ready(outcome) => Some(outcome),
                Poll::Lost => Some(Err(EnhancementError::Unknown)),
            };
            if let Some(outcome) = outcome {
                let job = self.in_flight.take();
                let current = job.as_ref().map(|j| j.generation) == Some(self.generation);
                if !current {
                    tracing::debug!("discarding enhancement result for a replaced image");
                } else {
                    match outcome {
                        Ok(image) => {
                            tracing::info!(
                                effect = job.map(|j| j.effect_id).unwrap_or_default(),
                                "enhancement finished"
                            );
                            self.result = Some(image);
                            self.result_revision += 1;
                            events.push(SessionEvent::Enhanced);
                        }
                        Err(e) => {
                            tracing::error!("enhancement failed: {e}");
                            let message = e.to_string();
                            self.error = Some(message.clone());
                            events.push(SessionEvent::EnhancementFailed(message));
                        }
                    }
                }
            }
        }

        events
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result(&self) -> Option<&EncodedImage> {
        self.result.as_ref()
    }

    pub fn result_revision(&self) -> u64 {
        self.result_revision
    }

    /// The source and result that belong together, if both exist.
    pub fn comparison(&self) -> Option<(&SourceImage, &EncodedImage)> {
        Some((self.source.as_ref()?, self.result.as_ref()?))
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pane(&self) -> ResultPane {
        if self.is_busy() {
            ResultPane::Busy
        } else if let Some(error) = &self.error {
            ResultPane::Failed(error.clone())
        } else if self.comparison().is_some() {
            ResultPane::Comparison
        } else {
            ResultPane::Empty
        }
    }

    pub fn download_name(&self) -> String {
        export::download_file_name(self.source.as_ref())
    }
}
