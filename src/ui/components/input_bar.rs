//! Input bar component
//!
//! Shows one of two surfaces depending on the mode: a text box with a send
//! button, or a mic button with the voice status line.

use crate::controller::InputMode;
use crate::ui::state::AppState;
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};

/// Input bar component for text and voice input
pub struct InputBar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> InputBar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| match self.state.mode {
                InputMode::Text => self.show_text_surface(ui),
                InputMode::Voice => self.show_voice_surface(ui),
            });
    }

    fn show_text_surface(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let available_width = ui.available_width() - 60.0;

            let text_edit = egui::TextEdit::singleline(&mut self.state.input_text)
                .hint_text("Type a message...")
                .desired_width(available_width)
                .font(egui::TextStyle::Body)
                .margin(egui::Margin::symmetric(12.0, 8.0));

            let response = ui.add(text_edit);

            if response.has_focus()
                && !self.state.input_text.trim().is_empty()
                && ui.input(|i| i.key_pressed(Key::Enter))
            {
                self.state.send_message();
                response.request_focus();
            }

            self.show_send_button(ui);
        });
    }

    fn show_send_button(&mut self, ui: &mut egui::Ui) {
        let can_send = !self.state.input_text.trim().is_empty();

        let button_color = if can_send {
            self.theme.primary
        } else {
            self.theme.text_muted
        };

        let button = egui::Button::new(RichText::new("➤").size(18.0).color(egui::Color32::WHITE))
            .min_size(Vec2::splat(44.0))
            .rounding(self.theme.button_rounding)
            .fill(button_color);

        let response = ui.add_enabled(can_send, button);

        if response.clicked() {
            self.state.send_message();
        }

        response.on_hover_text("Send message (Enter)");
    }

    fn show_voice_surface(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            self.show_mic_button(ui);

            ui.add_space(self.theme.spacing_sm);

            ui.label(
                RichText::new(&self.state.voice_status)
                    .size(13.0)
                    .color(self.theme.text_secondary),
            );
        });
    }

    fn show_mic_button(&mut self, ui: &mut egui::Ui) {
        let active = self.state.is_conversation_active();

        let (icon, color) = if self.state.is_listening {
            ("🎤", self.theme.listening)
        } else if active {
            ("⏹", self.theme.text_primary)
        } else {
            ("🎤", self.theme.text_secondary)
        };

        let button = egui::Button::new(RichText::new(icon).size(24.0).color(color))
            .min_size(Vec2::splat(56.0))
            .rounding(self.theme.button_rounding);

        let button = if active {
            button.fill(self.theme.listening.gamma_multiply(0.2))
        } else {
            button
        };

        let response = ui.add(button);
        let button_rect = response.rect;

        if response.clicked() {
            self.state.toggle_mic();
        }

        response.on_hover_text(if active {
            "Stop the conversation"
        } else {
            "Start the conversation"
        });

        // Pulsing ring while listening, steady ring while speaking.
        if self.state.is_listening {
            let t = ui.ctx().input(|i| i.time);
            let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;

            let painter = ui.painter();
            let center = button_rect.center();
            let radius = button_rect.width() / 2.0 + 2.0 + pulse * 3.0;

            painter.circle_stroke(
                center,
                radius,
                egui::Stroke::new(
                    2.0 * pulse,
                    self.theme.listening.gamma_multiply(1.0 - pulse * 0.5),
                ),
            );

            ui.ctx().request_repaint();
        } else if self.state.is_speaking {
            let painter = ui.painter();
            let center = button_rect.center();
            let radius = button_rect.width() / 2.0 + 4.0;

            painter.circle_stroke(center, radius, egui::Stroke::new(2.0, self.theme.speaking));
        }
    }
}
