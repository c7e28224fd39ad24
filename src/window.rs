// ReelPress Single-Screen GUI
// Copyright (c) 2026 Xing_The_Creator | ReelPress
//
// A scrolling list of looping previews with their sizes, and one button that
// starts the pick -> compress workflow.

use eframe::egui;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::warn;

use crate::media::{PickOutcome, VideoWorkflow};
use crate::preview::{LoopingPreview, PREVIEW_HEIGHT};
use crate::state::{RecordList, VideoRecord};

const COLOR_BG: egui::Color32 = egui::Color32::WHITE;
const COLOR_BUTTON: egui::Color32 = egui::Color32::from_rgb(0, 128, 0);
const COLOR_TEXT: egui::Color32 = egui::Color32::from_rgb(30, 30, 30);

/// Per-row preview state, created the first time a row is drawn.
struct PreviewSlot {
    player: Option<LoopingPreview>,
    texture: Option<egui::TextureHandle>,
    error: Option<String>,
}

impl PreviewSlot {
    fn open(ffmpeg: &Path, record: &VideoRecord) -> Self {
        match LoopingPreview::new(ffmpeg, Path::new(&record.url)) {
            Ok(player) => Self {
                player: Some(player),
                texture: None,
                error: None,
            },
            Err(e) => {
                warn!("[PREVIEW] {}: {}", record.url, e);
                Self {
                    player: None,
                    texture: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

pub struct ReelPressApp {
    workflow: Arc<VideoWorkflow>,
    runtime: Handle,
    ffmpeg: PathBuf,
    records: RecordList,
    previews: HashMap<usize, PreviewSlot>,
}

impl ReelPressApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        workflow: Arc<VideoWorkflow>,
        runtime: Handle,
        ffmpeg: PathBuf,
    ) -> Self {
        Self::configure_style(&cc.egui_ctx);

        // Repaint whenever a record lands, even while the window is idle.
        let mut changes = workflow.records().subscribe();
        let ctx = cc.egui_ctx.clone();
        runtime.spawn(async move {
            while changes.changed().await.is_ok() {
                ctx.request_repaint();
            }
        });

        let records = workflow.records().snapshot();
        Self {
            workflow,
            runtime,
            ffmpeg,
            records,
            previews: HashMap::new(),
        }
    }

    fn configure_style(ctx: &egui::Context) {
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = COLOR_BG;
        visuals.window_fill = COLOR_BG;
        ctx.set_visuals(visuals);

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(20.0, 20.0);
        ctx.set_style(style);
    }

    fn open_picker(&self) {
        let workflow = self.workflow.clone();
        self.runtime.spawn(async move {
            // Outcomes are already logged by the workflow; the list is the UI.
            if let PickOutcome::Acquired { compression, .. } = workflow.open_picker().await {
                let _ = compression.await;
            }
        });
    }

    fn draw_row(&mut self, ui: &mut egui::Ui, index: usize, record: &VideoRecord) {
        let width = ui.available_width();
        let ffmpeg = &self.ffmpeg;
        let slot = self
            .previews
            .entry(index)
            .or_insert_with(|| PreviewSlot::open(ffmpeg, record));

        if let Some(player) = slot.player.as_mut() {
            let (w, h) = (player.width, player.height);
            if let Some(frame) = player.poll_new_frame() {
                let image = egui::ColorImage::from_rgb([w, h], frame);
                match slot.texture.as_mut() {
                    Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                    None => {
                        slot.texture = Some(ui.ctx().load_texture(
                            format!("preview-{}", index),
                            image,
                            egui::TextureOptions::LINEAR,
                        ))
                    }
                }
            }
        }

        let size = egui::vec2(width, PREVIEW_HEIGHT as f32);
        match (&slot.texture, &slot.error) {
            (Some(texture), _) => {
                ui.add(egui::Image::new(egui::load::SizedTexture::new(texture.id(), size)));
            }
            (None, Some(error)) => {
                ui.add_sized(size, egui::Label::new(format!("Preview unavailable: {}", error)));
            }
            (None, None) => {
                ui.add_sized(size, egui::Spinner::new());
            }
        }

        ui.horizontal(|ui| {
            if let Some(player) = slot.player.as_mut() {
                let label = if player.is_paused() { "▶" } else { "⏸" };
                if ui.small_button(label).clicked() {
                    player.toggle_pause();
                }
            }
            ui.label(egui::RichText::new(format!("{} MB", record.size)).color(COLOR_TEXT));
        });
    }
}

impl eframe::App for ReelPressApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.records = self.workflow.records().snapshot();

        egui::TopBottomPanel::bottom("picker_bar")
            .frame(egui::Frame::none().fill(COLOR_BG).inner_margin(egui::Margin::symmetric(20.0, 12.0)))
            .show(ctx, |ui| {
                let button = egui::Button::new(
                    egui::RichText::new("Open Picker")
                        .size(16.0)
                        .strong()
                        .color(egui::Color32::WHITE),
                )
                .fill(COLOR_BUTTON)
                .rounding(20.0)
                .min_size(egui::vec2(ui.available_width(), 0.0));
                if ui.add(button).clicked() {
                    self.open_picker();
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let records = self.records.clone();
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for (index, record) in records.iter().enumerate() {
                        ui.push_id(index, |ui| self.draw_row(ui, index, record));
                    }
                });
        });

        let playing = self
            .previews
            .values()
            .filter_map(|slot| slot.player.as_ref())
            .find(|player| !player.is_paused() && !player.has_ended());
        if let Some(player) = playing {
            ctx.request_repaint_after(player.frame_interval());
        }
    }
}

/// Blocks until the window closes. Needs a live tokio runtime behind `runtime`.
pub fn run_gui(workflow: Arc<VideoWorkflow>, runtime: Handle, ffmpeg: PathBuf) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 820.0])
            .with_title("ReelPress"),
        ..Default::default()
    };

    eframe::run_native(
        "ReelPress",
        options,
        Box::new(move |cc| Ok(Box::new(ReelPressApp::new(cc, workflow, runtime, ffmpeg)))),
    )
}
