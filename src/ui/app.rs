//! Main application struct and eframe integration

use crate::controller::{ControllerHandle, InputMode, ViewUpdate};
use crate::ui::components::{InputBar, MessageList};
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use crossbeam_channel::Receiver;
use egui::{self, CentralPanel, RichText, TopBottomPanel};
use std::time::Duration;

/// Main Natter application
pub struct NatterApp {
    /// Application state
    state: AppState,
    /// Visual theme
    theme: Theme,
}

impl NatterApp {
    /// Create the application wired to a running controller
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        handle: ControllerHandle,
        view_rx: Receiver<ViewUpdate>,
    ) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self {
            state: AppState::new().connect(handle, view_rx),
            theme,
        }
    }

    /// Show the top header bar
    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .inner_margin(12.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("Natter")
                            .size(20.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );

                    ui.label(
                        RichText::new("Assistant chat")
                            .size(14.0)
                            .color(self.theme.text_muted),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("🗑").on_hover_text("Clear chat").clicked() {
                            self.state.clear_conversation();
                        }

                        // The mode switch only exists when a recognition
                        // engine is present.
                        if self.state.voice_supported {
                            let mut voice_on = self.state.mode == InputMode::Voice;
                            if ui
                                .toggle_value(&mut voice_on, "🎤 Voice")
                                .on_hover_text("Switch between typing and talking")
                                .changed()
                            {
                                self.state.set_voice_mode(voice_on);
                            }
                        }
                    });
                });
            });
    }

    /// Show the bottom input area
    fn show_input_area(&mut self, ctx: &egui::Context) {
        TopBottomPanel::bottom("input_area")
            .frame(
                egui::Frame::none()
                    .fill(self.theme.bg_primary)
                    .inner_margin(self.theme.spacing),
            )
            .show(ctx, |ui| {
                InputBar::new(&mut self.state, &self.theme).show(ui);
            });
    }

    /// Show the main content area (message list)
    fn show_content(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary))
            .show(ctx, |ui| {
                MessageList::new(&self.state, &self.theme).show(ui);
            });
    }
}

impl eframe::App for NatterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drain controller updates before rendering this frame.
        self.state.poll_events();

        self.show_header(ctx);
        self.show_input_area(ctx);
        self.show_content(ctx);

        if self.state.is_listening || self.state.is_speaking {
            ctx.request_repaint();
        } else {
            // Keep polling the view channel even while the window is idle.
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.state.shutdown();
    }
}
