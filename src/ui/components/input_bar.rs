use eframe::egui;

/// The `chat-form`: returns true when the user submitted. Trimming and
/// clearing are left to the controller.
pub fn render(ui: &mut egui::Ui, input_text: &mut String) -> bool {
    let mut submitted = false;
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(input_text)
                .id_salt("user-input")
                .hint_text("Type your message...")
                .desired_width(ui.available_width() - 64.0),
        );
        if ui.button("Send").clicked() {
            submitted = true;
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submitted = true;
            response.request_focus();
        }
    });

    submitted
}
