//! Interactive 3D button built on [`InteractiveElement`].

use super::element::{ElementState, InteractiveElement, StateHook};
use super::style::{Color, ElementStyle, VisualAttribute};

/// Palette family for a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonStyle {
    /// Grey buttons.
    #[default]
    Standard,
    /// Red buttons used for mandatory acknowledgements.
    Alert,
}

impl ButtonStyle {
    /// Visual attributes registered for `state`.
    pub fn attributes(self, state: ElementState) -> Vec<VisualAttribute> {
        use VisualAttribute::*;

        let (disabled, hovered, idle, selected) = match self {
            ButtonStyle::Standard => (0x999999, 0x999999, 0x666666, 0x777777),
            ButtonStyle::Alert => (0x990000, 0x990000, 0x660000, 0x770000),
        };
        match state {
            ElementState::Disabled => vec![
                Offset(0.02),
                BackgroundColor(Color::from_hex(disabled)),
                BackgroundOpacity(0.1),
                FontColor(Color::from_hex(0x555555)),
            ],
            ElementState::Hovered => vec![
                Offset(0.035),
                BackgroundColor(Color::from_hex(hovered)),
                BackgroundOpacity(1.0),
                FontColor(Color::WHITE),
            ],
            ElementState::Idle => vec![
                Offset(0.035),
                BackgroundColor(Color::from_hex(idle)),
                BackgroundOpacity(0.3),
                FontColor(Color::WHITE),
            ],
            // Selected keeps whatever opacity the previous state left.
            ElementState::Selected => vec![
                Offset(0.02),
                BackgroundColor(Color::from_hex(selected)),
                FontColor(Color::from_hex(0x222222)),
            ],
        }
    }
}

/// Builder for a button element with all four states registered.
pub struct Button {
    text: String,
    width: f32,
    height: f32,
    margin: f32,
    style: ButtonStyle,
    initial: ElementState,
    on_selected: Option<StateHook>,
}

impl Button {
    /// Default button geometry: 0.4 x 0.15 with a 0.02 margin.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            width: 0.4,
            height: 0.15,
            margin: 0.02,
            style: ButtonStyle::Standard,
            initial: ElementState::Idle,
            on_selected: None,
        }
    }

    /// Builder: set width, keeping the default height.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Builder: set both dimensions.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Builder: set the palette family.
    pub fn with_style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    /// Builder: state the button starts in.
    pub fn with_initial_state(mut self, state: ElementState) -> Self {
        self.initial = state;
        self
    }

    /// Builder: callback run each time the button enters `Selected`.
    pub fn with_on_selected(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_selected = Some(Box::new(hook));
        self
    }

    /// Outer margin used by the layout.
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Finish the button as an element named `name`.
    pub fn build(self, name: impl Into<String>) -> InteractiveElement {
        let mut element = InteractiveElement::new(name, self.width, self.height)
            .with_text(self.text)
            .with_style(ElementStyle::default());
        element.setup_state(
            ElementState::Selected,
            &self.style.attributes(ElementState::Selected),
            self.on_selected,
        );
        for state in [
            ElementState::Hovered,
            ElementState::Idle,
            ElementState::Disabled,
        ] {
            element.setup_state(state, &self.style.attributes(state), None);
        }
        element.set_state(self.initial);
        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_button_registers_every_state() {
        let button = Button::new("Next").with_width(0.7).build("next");
        for state in ElementState::ALL {
            assert!(button.has_state(state), "{state} missing");
        }
        assert_eq!(button.current_state(), Some(ElementState::Idle));
        assert_eq!(button.text(), Some("Next"));
        assert_eq!(button.shape().size.x, 0.7);
        assert_eq!(button.shape().size.y, 0.15);
    }

    #[test]
    fn test_standard_palette() {
        let mut button = Button::new("Back").build("back");
        button.set_state(ElementState::Hovered);
        assert_eq!(button.style().background_color.to_hex(), 0x999999);
        assert_eq!(button.style().background_opacity, 1.0);
        assert_eq!(button.style().offset, 0.035);

        button.set_state(ElementState::Selected);
        assert_eq!(button.style().background_color.to_hex(), 0x777777);
        assert_eq!(button.style().font_color.to_hex(), 0x222222);
        // Opacity carried over from hovered.
        assert_eq!(button.style().background_opacity, 1.0);
    }

    #[test]
    fn test_alert_palette() {
        let mut button = Button::new("ALERT")
            .with_style(ButtonStyle::Alert)
            .with_initial_state(ElementState::Disabled)
            .build("emph");
        assert_eq!(button.style().background_color.to_hex(), 0x990000);
        assert_eq!(button.style().font_color.to_hex(), 0x555555);

        button.set_state(ElementState::Idle);
        assert_eq!(button.style().background_color.to_hex(), 0x660000);
    }

    #[test]
    fn test_selected_callback() {
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        let mut button = Button::new("Read Aloud")
            .with_on_selected(move || counter.set(counter.get() + 1))
            .build("read");
        button.set_state(ElementState::Selected);
        assert_eq!(clicks.get(), 1);
    }
}
