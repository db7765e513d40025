//! Background block that groups other elements. Panels register no states,
//! so the pointer can hit them without changing their appearance.

use super::element::InteractiveElement;
use super::style::{Color, ElementStyle};

/// Builder for a stateless block.
#[derive(Debug, Clone)]
pub struct Panel {
    width: f32,
    height: f32,
    /// Outer margin used by the layout.
    pub margin: f32,
    /// Inner padding around children.
    pub padding: f32,
    color: Color,
    opacity: f32,
    text: Option<String>,
}

impl Panel {
    /// Create a panel of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            margin: 0.0,
            padding: 0.0,
            color: Color::BLACK,
            opacity: 0.5,
            text: None,
        }
    }

    /// Builder: set margin.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Builder: set padding.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Builder: set background colour and opacity.
    pub fn with_background(mut self, color: Color, opacity: f32) -> Self {
        self.color = color;
        self.opacity = opacity;
        self
    }

    /// Builder: set text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Area left for children once padding is removed.
    pub fn content_size(&self) -> (f32, f32) {
        (
            (self.width - 2.0 * self.padding).max(0.0),
            (self.height - 2.0 * self.padding).max(0.0),
        )
    }

    /// Finish the panel as an element named `name`.
    pub fn build(self, name: impl Into<String>) -> InteractiveElement {
        let style = ElementStyle {
            background_color: self.color,
            background_opacity: self.opacity,
            ..ElementStyle::default()
        };
        let element = InteractiveElement::new(name, self.width, self.height).with_style(style);
        match self.text {
            Some(text) => element.with_text(text),
            None => element,
        }
    }
}
