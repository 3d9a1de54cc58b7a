//! Message list component
//!
//! Renders the transcript as labeled chat bubbles, newest entry pinned
//! into view. Entries are only ever appended.

use crate::history::Role;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Align, Color32, RichText, Vec2};

/// Message list component
pub struct MessageList<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.add_space(self.theme.spacing);

                    if self.state.transcript.is_empty() {
                        self.show_empty_state(ui);
                    } else {
                        for entry in &self.state.transcript {
                            self.show_entry(ui, entry.role, &entry.text);
                            ui.add_space(self.theme.spacing_sm);
                        }
                    }

                    ui.add_space(self.theme.spacing);
                });
            });
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(100.0);

            ui.label(
                RichText::new("Welcome to Natter")
                    .size(24.0)
                    .color(self.theme.text_primary),
            );

            ui.add_space(self.theme.spacing);

            let hint = if self.state.voice_supported {
                "Start a conversation by typing a message, or switch to voice mode."
            } else {
                "Start a conversation by typing a message."
            };
            ui.label(RichText::new(hint).size(14.0).color(self.theme.text_muted));

            ui.add_space(self.theme.spacing_lg);

            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing = Vec2::splat(self.theme.spacing);

                self.show_hint_card(ui, "Type", "Enter your message below");
                if self.state.voice_supported {
                    self.show_hint_card(ui, "Talk", "Tap the mic and speak");
                    self.show_hint_card(ui, "Listen", "Replies are spoken aloud");
                }
            });
        });
    }

    fn show_hint_card(&self, ui: &mut egui::Ui, title: &str, description: &str) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.set_width(150.0);
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(title)
                            .size(14.0)
                            .strong()
                            .color(self.theme.primary),
                    );
                    ui.label(
                        RichText::new(description)
                            .size(12.0)
                            .color(self.theme.text_muted),
                    );
                });
            });
    }

    fn show_entry(&self, ui: &mut egui::Ui, role: Role, text: &str) {
        let is_user = role == Role::User;

        let bubble_color = if is_user {
            self.theme.user_bubble
        } else {
            self.theme.assistant_bubble
        };

        let text_color = if is_user {
            Color32::WHITE
        } else {
            self.theme.text_primary
        };

        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(if is_user { "You" } else { "Assistant" })
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(2.0);

            let max_width = ui.available_width() * 0.75;

            egui::Frame::none()
                .fill(bubble_color)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    ui.label(RichText::new(text).color(text_color));
                });
        });
    }
}
