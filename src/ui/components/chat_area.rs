use eframe::egui;
use egui::text::LayoutJob;

use crate::common::Sender;
use crate::ui::markup::RenderedText;
use crate::ui::view::{AVATAR_SIZE, Avatar, ChatContainer, Element, MessageNode};

const BUBBLE_WIDTH_RATIO: f32 = 0.75;

pub fn render(ui: &mut egui::Ui, container: &mut ChatContainer) {
    let scroll_requested = container.take_scroll_request();

    let output = egui::ScrollArea::vertical()
        .id_salt("chat-container")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if container.is_empty() {
                ui.label(egui::RichText::new("No messages yet").weak());
            }

            for node in container.nodes() {
                // Message id keeps widget ids stable as the list grows.
                ui.push_id(&node.message.id, |ui| render_node(ui, node));
                ui.add_space(8.0);
            }

            if scroll_requested {
                ui.scroll_to_cursor_animation(
                    Some(egui::Align::BOTTOM),
                    egui::style::ScrollAnimation::none(),
                );
            }
        });

    container.observe_layout(
        output.content_size.y,
        output.inner_rect.height(),
        output.state.offset.y,
    );
}

fn render_node(ui: &mut egui::Ui, node: &MessageNode) {
    let layout = match node.sender() {
        Sender::User => egui::Layout::right_to_left(egui::Align::TOP),
        Sender::Bot => egui::Layout::left_to_right(egui::Align::TOP),
    };

    ui.with_layout(layout, |ui| {
        for element in &node.elements {
            match element {
                Element::Avatar(avatar) => render_avatar(ui, avatar),
                Element::Bubble(bubble) => {
                    let response = render_bubble(ui, node.sender(), &bubble.body);
                    if let Some(sent_at) = node.sent_at() {
                        response.on_hover_text(sent_at);
                    }
                }
            }
        }
    });
}

/// Avatar được vẽ hình tròn.
fn render_avatar(ui: &mut egui::Ui, avatar: &Avatar) {
    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(AVATAR_SIZE, AVATAR_SIZE), egui::Sense::hover());
    let painter = ui.painter();
    painter.circle_filled(rect.center(), AVATAR_SIZE / 2.0, egui::Color32::from_rgb(24, 64, 120));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        "X",
        egui::FontId::proportional(16.0),
        egui::Color32::WHITE,
    );
    response.on_hover_text(avatar.src.as_str());
}

fn render_bubble(ui: &mut egui::Ui, sender: Sender, body: &RenderedText) -> egui::Response {
    let visuals = ui.visuals();
    let (fill, text_color) = match sender {
        Sender::User => (visuals.selection.bg_fill, visuals.strong_text_color()),
        Sender::Bot => (visuals.faint_bg_color, visuals.text_color()),
    };
    let strong_color = visuals.strong_text_color();
    let link_color = visuals.hyperlink_color;
    let max_width = ui.available_width() * BUBBLE_WIDTH_RATIO;

    egui::Frame::new()
        .fill(fill)
        .corner_radius(egui::CornerRadius::same(10))
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            ui.set_max_width(max_width);
            let mut job = LayoutJob::default();
            for span in body.spans() {
                let mut format = egui::TextFormat {
                    font_id: if span.style.code {
                        egui::FontId::monospace(13.0)
                    } else {
                        egui::FontId::proportional(14.0)
                    },
                    color: if span.style.bold {
                        strong_color
                    } else {
                        text_color
                    },
                    italics: span.style.italic,
                    ..Default::default()
                };
                if span.style.link.is_some() {
                    format.color = link_color;
                    format.underline = egui::Stroke::new(1.0, link_color);
                }
                job.append(&span.text, 0.0, format);
            }
            job.wrap.max_width = max_width;
            ui.label(job);
        })
        .response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ChatMessage;
    use crate::ui::markup::RenderMode;

    fn node(n: usize) -> MessageNode {
        let message = ChatMessage {
            id: format!("msg-{n}"),
            sender: if n % 2 == 0 { Sender::User } else { Sender::Bot },
            text: format!("message number {n}"),
            timestamp: 1_700_000_000,
        };
        MessageNode::new(message, RenderMode::Trusted, "http://localhost/avatar.jpg")
    }

    fn frame(ctx: &egui::Context, container: &mut ChatContainer) {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(400.0, 200.0),
            )),
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| render(ui, container));
        });
    }

    #[test]
    fn painted_frame_reports_geometry_and_lands_on_last_message() {
        let ctx = egui::Context::default();
        let mut container = ChatContainer::new();
        for n in 0..30 {
            container.append(node(n));
        }

        frame(&ctx, &mut container);
        frame(&ctx, &mut container);

        assert!(container.scroll_height() > 200.0);
        assert!(container.max_scroll_offset() > 0.0);
        assert!(container.is_at_bottom());
    }

    #[test]
    fn empty_list_paints_without_scrolling() {
        let ctx = egui::Context::default();
        let mut container = ChatContainer::new();

        frame(&ctx, &mut container);

        assert_eq!(container.scroll_top(), 0.0);
        assert!(container.is_at_bottom());
    }
}
