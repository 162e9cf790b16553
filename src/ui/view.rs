use crate::common::{ChatMessage, Sender};

use super::markup::{self, RenderMode, RenderedText};

pub const AVATAR_SIZE: f32 = 32.0;
const LINE_HEIGHT: f32 = 18.0;
const BUBBLE_PADDING: f32 = 16.0;
const MESSAGE_SPACING: f32 = 8.0;

/// Bot avatar; drawn circular next to the bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
    pub src: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub body: RenderedText,
}

/// Children of a message node, in paint order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Avatar(Avatar),
    Bubble(Bubble),
}

#[derive(Debug, Clone)]
pub struct MessageNode {
    pub message: ChatMessage,
    pub elements: Vec<Element>,
}

impl MessageNode {
    pub fn new(message: ChatMessage, mode: RenderMode, avatar_src: &str) -> Self {
        let mut elements = Vec::with_capacity(2);
        if message.sender == Sender::Bot {
            elements.push(Element::Avatar(Avatar {
                src: avatar_src.to_string(),
            }));
        }
        elements.push(Element::Bubble(Bubble {
            body: markup::render(&message.text, mode),
        }));
        Self { message, elements }
    }

    /// Creation time as local wall-clock text, for the bubble tooltip.
    pub fn sent_at(&self) -> Option<String> {
        chrono::DateTime::from_timestamp(self.message.timestamp, 0)
            .map(|utc| utc.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
    }

    pub fn sender(&self) -> Sender {
        self.message.sender
    }

    pub fn avatar(&self) -> Option<&Avatar> {
        self.elements.iter().find_map(|element| match element {
            Element::Avatar(avatar) => Some(avatar),
            Element::Bubble(_) => None,
        })
    }

    pub fn bubble(&self) -> Option<&Bubble> {
        self.elements.iter().find_map(|element| match element {
            Element::Bubble(bubble) => Some(bubble),
            Element::Avatar(_) => None,
        })
    }

    /// Visible text of the node.
    pub fn text_content(&self) -> String {
        self.bubble()
            .map(|bubble| bubble.body.plain_text())
            .unwrap_or_default()
    }

    fn estimated_height(&self) -> f32 {
        let lines = self.text_content().lines().count().max(1) as f32;
        let text_height = lines * LINE_HEIGHT + BUBBLE_PADDING;
        let height = if self.avatar().is_some() {
            text_height.max(AVATAR_SIZE)
        } else {
            text_height
        };
        height + MESSAGE_SPACING
    }
}

/// The scrolling message list. Append-only; every append re-anchors the
/// scroll position to the bottom.
///
/// Geometry comes from the painter: `observe_layout` records what egui
/// actually laid out. Nodes appended since that frame are counted with an
/// estimated height until the next frame measures them.
#[derive(Debug, Default)]
pub struct ChatContainer {
    nodes: Vec<MessageNode>,
    viewport_height: f32,
    measured_height: f32,
    measured_nodes: usize,
    scroll_top: f32,
    scroll_requested: bool,
}

impl ChatContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, node: MessageNode) {
        self.nodes.push(node);
        self.scroll_to_bottom();
    }

    pub fn nodes(&self) -> &[MessageNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn scroll_height(&self) -> f32 {
        let pending: f32 = self.nodes[self.measured_nodes..]
            .iter()
            .map(MessageNode::estimated_height)
            .sum();
        self.measured_height + pending
    }

    pub fn max_scroll_offset(&self) -> f32 {
        (self.scroll_height() - self.viewport_height).max(0.0)
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn is_at_bottom(&self) -> bool {
        self.max_scroll_offset() - self.scroll_top < 1.0
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_top = self.max_scroll_offset();
        self.scroll_requested = true;
    }

    /// Record the geometry of the frame just painted: total content height,
    /// visible height and the scroll offset egui settled on.
    pub fn observe_layout(&mut self, content_height: f32, viewport_height: f32, offset: f32) {
        self.measured_height = content_height.max(0.0);
        self.measured_nodes = self.nodes.len();
        self.viewport_height = viewport_height.max(0.0);
        self.scroll_top = offset.clamp(0.0, self.max_scroll_offset());
    }

    /// True once per append; the painter uses it to jump to the last message.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /// Everything a reader of the list can see, in order.
    #[cfg(test)]
    pub fn text_content(&self) -> String {
        self.nodes
            .iter()
            .map(MessageNode::text_content)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One `sender: text` line per message, for terminal output.
    pub fn transcript(&self) -> Vec<String> {
        self.nodes
            .iter()
            .map(|node| format!("{}: {}", node.sender(), node.text_content()))
            .collect()
    }
}
