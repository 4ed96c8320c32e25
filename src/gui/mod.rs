pub mod theme;

use crate::comparator::pointer::PointerHub;
use crate::comparator::Comparator;
use crate::effects;
use crate::enhance::Enhance;
use crate::export;
use crate::intake::ImageBlob;
use crate::session::{ResultPane, Session, SessionEvent};
use crate::settings::Settings;
use eframe::egui::{self, vec2, RichText, Sense, Stroke};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::sync::Arc;
use theme::Palette;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];
const CONTROLS_WIDTH: f32 = 360.0;

fn push_toast(toasts: &mut Toasts, enabled: bool, toast: Toast) {
    if enabled {
        toasts.add(toast);
    }
}

/// Thumbnail of the current source image, keyed by session generation.
struct Preview {
    generation: u64,
    uri: String,
    bytes: Option<egui::load::Bytes>,
}

pub struct EnhancerApp {
    session: Session,
    enhancer: Arc<dyn Enhance>,
    pointer_hub: PointerHub,
    comparator: Option<Comparator>,
    mounted_revision: u64,
    preview: Option<Preview>,
    palette: Palette,
    toasts: Toasts,
    enable_toasts: bool,
    toast_duration: f32,
}

impl EnhancerApp {
    pub fn new(
        ctx: &egui::Context,
        mut session: Session,
        enhancer: Arc<dyn Enhance>,
        settings: &Settings,
    ) -> Self {
        let palette = Palette::enhancer();
        ctx.set_visuals(theme::palette_to_visuals(&palette, &egui::Visuals::dark()));
        let repaint = ctx.clone();
        session.set_waker(Arc::new(move || repaint.request_repaint()));
        Self {
            session,
            enhancer,
            pointer_hub: PointerHub::new(),
            comparator: None,
            mounted_revision: 0,
            preview: None,
            palette,
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]),
            enable_toasts: settings.enable_toasts,
            toast_duration: settings.toast_duration,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn pointer_hub(&self) -> &PointerHub {
        &self.pointer_hub
    }

    pub fn comparator(&self) -> Option<&Comparator> {
        self.comparator.as_ref()
    }

    fn toast(&mut self, kind: ToastKind, text: impl Into<String>) {
        let text: String = text.into();
        push_toast(
            &mut self.toasts,
            self.enable_toasts,
            Toast {
                text: text.into(),
                kind,
                options: ToastOptions::default().duration_in_seconds(self.toast_duration as f64),
            },
        );
    }

    fn submit(&mut self, blob: ImageBlob) {
        if let Err(e) = self.session.submit(blob) {
            tracing::debug!("{e}");
            self.toast(ToastKind::Error, "Please upload an image file.");
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        // Only one source image at a time; the first drop wins.
        if let Some(blob) = dropped.iter().find_map(ImageBlob::from_dropped) {
            self.submit(blob);
        }
    }

    fn handle_session_events(&mut self) {
        for event in self.session.poll() {
            match event {
                SessionEvent::ImageLoaded(name) => {
                    self.toast(ToastKind::Info, format!("Loaded {name}"));
                }
                SessionEvent::IntakeFailed(message) => self.toast(ToastKind::Error, message),
                SessionEvent::Enhanced => self.toast(ToastKind::Success, "Image enhanced"),
                SessionEvent::EnhancementFailed(_) => {}
            }
        }
    }

    /// Mount a comparator for each new result and unmount it as soon as the
    /// result or the source it belongs to goes away.
    fn sync_comparator(&mut self, ctx: &egui::Context) {
        match self.session.comparison() {
            None => {
                self.comparator = None;
            }
            Some((source, result)) => {
                let revision = self.session.result_revision();
                if self.comparator.is_none() || self.mounted_revision != revision {
                    // The previous widget has to release its listener first.
                    self.comparator = None;
                    self.comparator = Some(Comparator::mount(
                        ctx,
                        &self.pointer_hub,
                        &source.encoded,
                        result,
                    ));
                    self.mounted_revision = revision;
                }
            }
        }
    }

    fn sync_preview(&mut self, ctx: &egui::Context) {
        let generation = self.session.generation();
        if self.preview.as_ref().map(|p| p.generation) == Some(generation) {
            return;
        }
        if let Some(old) = self.preview.take() {
            ctx.forget_image(&old.uri);
        }
        self.preview = self.session.source().map(|source| Preview {
            generation,
            uri: format!(
                "bytes://source/{generation}.{}",
                source.encoded.file_extension()
            ),
            bytes: source.encoded.decode().ok().map(egui::load::Bytes::from),
        });
    }

    /// Everything `update` does except talking to the native frame.
    pub fn ui(&mut self, ctx: &egui::Context) {
        self.handle_dropped_files(ctx);
        self.handle_session_events();
        self.sync_comparator(ctx);
        self.sync_preview(ctx);
        self.pointer_hub.dispatch_input(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                ui.heading(
                    RichText::new("AI Photo Enhancer")
                        .size(28.0)
                        .strong()
                        .color(self.palette.accent),
                );
                ui.label(
                    RichText::new("Upload a photo, pick an effect, and compare the result.")
                        .color(self.palette.muted),
                );
            });
            ui.add_space(8.0);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("Powered by Gemini").small().color(self.palette.muted));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("Reset Preferences").clicked() {
                        self.session.reset_preferences();
                        self.toast(ToastKind::Info, "Preferences reset");
                    }
                });
            });
        });

        egui::SidePanel::left("controls")
            .resizable(false)
            .exact_width(CONTROLS_WIDTH)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.photo_section(ui);
                    ui.add_space(16.0);
                    self.effect_section(ui);
                    ui.add_space(16.0);
                    self.enhance_button(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| self.result_section(ui));

        self.toasts.show(ctx);
    }

    fn photo_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("1. Your Photo");
        ui.add_space(4.0);
        if self.session.source().is_some() {
            self.source_preview(ui);
        } else {
            self.upload_zone(ui);
        }
    }

    fn upload_zone(&mut self, ui: &mut egui::Ui) {
        let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        let stroke = if hovering {
            self.palette.accent
        } else {
            self.palette.muted
        };
        let reading = self.session.is_reading();
        let frame = egui::Frame::none()
            .stroke(Stroke::new(2.0, stroke))
            .rounding(8.0)
            .inner_margin(24.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    if reading {
                        ui.spinner();
                    } else {
                        ui.label(RichText::new("Click to upload or drag and drop").strong());
                        ui.label(
                            RichText::new("PNG, JPG, WEBP and more")
                                .small()
                                .color(self.palette.muted),
                        );
                    }
                });
            });
        let response = ui
            .interact(frame.response.rect, ui.id().with("upload_zone"), Sense::click())
            .on_hover_cursor(egui::CursorIcon::PointingHand);
        if response.clicked() && !reading {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Images", IMAGE_EXTENSIONS)
                .pick_file()
            {
                self.submit(ImageBlob::from_path(path));
            }
        }
    }

    fn source_preview(&mut self, ui: &mut egui::Ui) {
        let name = self
            .session
            .source()
            .map(|s| s.display_name.clone())
            .unwrap_or_default();
        if let Some(Preview {
            uri,
            bytes: Some(bytes),
            ..
        }) = &self.preview
        {
            ui.add(
                egui::Image::from_bytes(uri.clone(), bytes.clone())
                    .max_width(ui.available_width())
                    .max_height(240.0)
                    .rounding(8.0),
            );
        }
        ui.horizontal(|ui| {
            ui.label(RichText::new(name).color(self.palette.muted));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Remove").clicked() {
                    self.session.remove_image();
                }
            });
        });
    }

    fn effect_section(&mut self, ui: &mut egui::Ui) {
        ui.heading("2. Choose Effect");
        ui.add_space(4.0);
        let has_image = self.session.source().is_some();
        let selected = self.session.selected_effect().id;
        let width = (ui.available_width() - ui.spacing().item_spacing.x) / 2.0;
        let mut chosen = None;
        egui::Grid::new("effects")
            .num_columns(2)
            .spacing(ui.spacing().item_spacing)
            .show(ui, |ui| {
                for (i, effect) in effects::catalog().iter().enumerate() {
                    let button = egui::Button::new(effect.name)
                        .selected(effect.id == selected)
                        .min_size(vec2(width, 36.0));
                    let response = ui
                        .add_enabled(has_image, button)
                        .on_hover_text(effect.instruction);
                    if response.clicked() {
                        chosen = Some(effect.id);
                    }
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
        if let Some(id) = chosen {
            self.session.select_effect(id);
        }
    }

    fn enhance_button(&mut self, ui: &mut egui::Ui) {
        let label = if self.session.is_busy() {
            "Enhancing..."
        } else {
            "Enhance Image"
        };
        let button = egui::Button::new(
            RichText::new(label)
                .size(18.0)
                .strong()
                .color(self.palette.accent_text),
        )
        .fill(self.palette.accent)
        .min_size(vec2(ui.available_width(), 44.0));
        if ui.add_enabled(self.session.can_enhance(), button).clicked() {
            self.session.enhance(self.enhancer.clone());
        }
    }

    fn result_section(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("3. Result");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let ready = self.session.result().is_some();
                if ui.add_enabled(ready, egui::Button::new("Download")).clicked() {
                    self.download();
                }
            });
        });
        ui.add_space(8.0);

        match self.session.pane() {
            ResultPane::Busy => {
                centered(ui, |ui| {
                    ui.spinner();
                    ui.label(RichText::new("AI is working its magic...").strong());
                    ui.label(RichText::new("This can take a moment.").color(self.palette.muted));
                });
            }
            ResultPane::Failed(message) => {
                centered(ui, |ui| {
                    ui.label(
                        RichText::new("Enhancement Failed")
                            .strong()
                            .size(18.0)
                            .color(self.palette.error),
                    );
                    ui.label(message);
                });
            }
            ResultPane::Comparison => match &mut self.comparator {
                Some(comparator) => {
                    comparator.show(ui);
                }
                None => {
                    centered(ui, |ui| {
                        ui.spinner();
                    });
                }
            },
            ResultPane::Empty => {
                centered(ui, |ui| {
                    ui.label(RichText::new("Your enhanced image will appear here").strong());
                    ui.label(
                        RichText::new("Upload a photo and apply an effect to get started")
                            .color(self.palette.muted),
                    );
                });
            }
        }
    }

    fn download(&mut self) {
        let Some(result) = self.session.result().cloned() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(self.session.download_name())
            .save_file()
        else {
            return;
        };
        match export::write_result(&path, &result) {
            Ok(()) => self.toast(ToastKind::Success, format!("Saved {}", path.display())),
            Err(e) => {
                tracing::error!("failed to save enhanced image: {e:#}");
                self.toast(ToastKind::Error, format!("Failed to save image: {e}"));
            }
        }
    }
}

fn centered(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() / 3.0);
        add_contents(ui);
    });
}

impl eframe::App for EnhancerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}
